//! Low-level PDF layout: a cursor-based page writer over printpdf.
//!
//! Text measurement uses a static Helvetica width table (AFM widths in
//! 1/1000 em). Static tables are an intentional approximation: they catch
//! real overflow while tolerating ±1-2% ambiguity, and the conservative
//! line-height factor absorbs the residual error.

use chrono::Utc;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

pub const PAGE_WIDTH_MM: f32 = 215.9; // US letter
pub const PAGE_HEIGHT_MM: f32 = 279.4;
pub const MARGIN_MM: f32 = 12.7; // 0.5"
const FOOTER_Y_MM: f32 = 6.35;
const PT_TO_MM: f32 = 0.352_778;
const LINE_HEIGHT_FACTOR: f32 = 1.4;
/// Helvetica-Bold runs a little wider than regular; a flat factor over the
/// regular table is close enough for wrapping decisions.
const BOLD_WIDTH_FACTOR: f32 = 1.08;

/// Helvetica character widths in 1/1000 em for ASCII 0x20..=0x7E.
/// Index = (char as usize) - 32.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];
const AVERAGE_CHAR_WIDTH: u16 = 556;

pub fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

pub fn dark_blue() -> Color {
    rgb(0.0, 0.0, 0.55)
}
pub fn black() -> Color {
    rgb(0.0, 0.0, 0.0)
}
pub fn white() -> Color {
    rgb(1.0, 1.0, 1.0)
}
pub fn grey() -> Color {
    rgb(0.5, 0.5, 0.5)
}
pub fn light_grey() -> Color {
    rgb(0.83, 0.83, 0.83)
}
pub fn whitesmoke() -> Color {
    rgb(0.96, 0.96, 0.96)
}
pub fn light_green() -> Color {
    rgb(0.56, 0.93, 0.56)
}
pub fn salmon() -> Color {
    rgb(0.98, 0.5, 0.45)
}
pub fn red() -> Color {
    rgb(0.8, 0.1, 0.1)
}
pub fn orange() -> Color {
    rgb(1.0, 0.65, 0.0)
}
pub fn green() -> Color {
    rgb(0.0, 0.6, 0.2)
}

/// Measures rendered text width in millimeters at the given size.
/// Non-ASCII characters fall back to the average width.
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    let em_thousandths: u32 = text
        .chars()
        .map(|c| {
            let code = c as usize;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[code - 32] as u32
            } else {
                AVERAGE_CHAR_WIDTH as u32
            }
        })
        .sum();
    let mut width = em_thousandths as f32 / 1000.0 * size_pt * PT_TO_MM;
    if bold {
        width *= BOLD_WIDTH_FACTOR;
    }
    width
}

/// Greedy word wrap to a maximum line width. Words longer than the line are
/// emitted on their own line rather than split mid-word.
pub fn wrap_text(text: &str, size_pt: f32, bold: bool, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, size_pt, bold) <= max_width_mm || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * LINE_HEIGHT_FACTOR
}

/// Cursor-based writer: tracks the current y position (mm from page bottom)
/// and starts a new page when a block does not fit. Every page gets a
/// footer with the page number and generation date.
pub struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    page_number: usize,
    generated_on: String,
}

impl PageWriter {
    pub fn new(title: &str) -> Result<Self, printpdf::Error> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            page_number: 1,
            generated_on: Utc::now().format("%B %d, %Y").to_string(),
        })
    }

    pub fn generated_on(&self) -> &str {
        &self.generated_on
    }

    pub fn content_width(&self) -> f32 {
        PAGE_WIDTH_MM - 2.0 * MARGIN_MM
    }

    pub fn left_margin(&self) -> f32 {
        MARGIN_MM
    }

    pub fn current_y(&self) -> f32 {
        self.y
    }

    pub fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Starts a new page if fewer than `needed_mm` remain above the footer.
    pub fn ensure_space(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.draw_footer();
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_number += 1;
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn draw_footer(&self) {
        self.layer.set_fill_color(grey());
        self.layer.use_text(
            format!("Generated on: {}", self.generated_on),
            9.0,
            Mm(MARGIN_MM),
            Mm(FOOTER_Y_MM),
            &self.regular,
        );
        let page_text = format!("Page {}", self.page_number);
        let x = PAGE_WIDTH_MM - MARGIN_MM - text_width_mm(&page_text, 9.0, false);
        self.layer
            .use_text(page_text, 9.0, Mm(x), Mm(FOOTER_Y_MM), &self.regular);
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Places text at an absolute position without moving the cursor.
    pub fn text_at(&self, text: &str, size_pt: f32, bold: bool, x: f32, y: f32, color: Color) {
        self.layer.set_fill_color(color);
        self.layer
            .use_text(text, size_pt, Mm(x), Mm(y), self.font(bold));
    }

    /// Places text horizontally centered on `center_x`.
    pub fn text_centered(
        &self,
        text: &str,
        size_pt: f32,
        bold: bool,
        center_x: f32,
        y: f32,
        color: Color,
    ) {
        let x = center_x - text_width_mm(text, size_pt, bold) / 2.0;
        self.text_at(text, size_pt, bold, x, y, color);
    }

    /// Strokes a single line segment (used by rules and the gauge arcs).
    pub fn stroke_segment(&self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y1)), false),
                (Point::new(Mm(x2), Mm(y2)), false),
            ],
            is_closed: false,
        });
    }

    /// Draws a rectangle with optional fill and stroke. `y` is the bottom edge.
    pub fn rect(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Color>,
        stroke: Option<(Color, f32)>,
    ) {
        let corners = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y + height)), false),
            (Point::new(Mm(x), Mm(y + height)), false),
        ];
        if let Some(color) = fill {
            self.layer.set_fill_color(color);
            self.layer.add_polygon(Polygon {
                rings: vec![corners.clone()],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });
        }
        if let Some((color, thickness)) = stroke {
            self.layer.set_outline_color(color);
            self.layer.set_outline_thickness(thickness);
            self.layer.add_line(Line {
                points: corners,
                is_closed: true,
            });
        }
    }

    /// Writes a wrapped paragraph at the left margin and advances the cursor.
    pub fn paragraph(&mut self, text: &str, size_pt: f32, bold: bool, color: Color) {
        self.paragraph_indented(text, size_pt, bold, color, 0.0);
    }

    /// Wrapped paragraph with a fixed left indent (used for bullets).
    pub fn paragraph_indented(
        &mut self,
        text: &str,
        size_pt: f32,
        bold: bool,
        color: Color,
        indent_mm: f32,
    ) {
        let width = self.content_width() - indent_mm;
        let line_height = line_height_mm(size_pt);
        for line in wrap_text(text, size_pt, bold, width) {
            self.ensure_space(line_height);
            self.advance(line_height);
            self.text_at(&line, size_pt, bold, MARGIN_MM + indent_mm, self.y, color.clone());
        }
    }

    /// Bullet list item: marker at the margin, hanging-indented body.
    pub fn bullet(&mut self, text: &str, size_pt: f32) {
        let line_height = line_height_mm(size_pt);
        self.ensure_space(line_height);
        let bullet_y = self.y - line_height;
        self.paragraph_indented(text, size_pt, false, black(), 5.0);
        self.text_at("\u{2022}", size_pt, false, MARGIN_MM + 1.5, bullet_y, black());
    }

    /// Full-width banner heading: filled bar with centered white bold text.
    pub fn heading(&mut self, text: &str) {
        const BAR_HEIGHT: f32 = 9.0;
        self.ensure_space(BAR_HEIGHT + 4.0);
        self.advance(BAR_HEIGHT);
        self.rect(
            MARGIN_MM,
            self.y,
            self.content_width(),
            BAR_HEIGHT,
            Some(dark_blue()),
            None,
        );
        self.text_centered(
            text,
            14.0,
            true,
            PAGE_WIDTH_MM / 2.0,
            self.y + 2.8,
            white(),
        );
        self.advance(4.0);
    }

    /// Smaller dark-blue subheading.
    pub fn subheading(&mut self, text: &str) {
        let line_height = line_height_mm(13.0);
        self.ensure_space(line_height);
        self.advance(line_height);
        self.text_at(text, 13.0, true, MARGIN_MM, self.y, dark_blue());
        self.advance(1.5);
    }

    pub fn spacer(&mut self, mm: f32) {
        self.advance(mm);
    }

    pub fn rule(&mut self, color: Color, thickness: f32) {
        self.ensure_space(2.0);
        self.advance(1.0);
        self.stroke_segment(
            MARGIN_MM,
            self.y,
            PAGE_WIDTH_MM - MARGIN_MM,
            self.y,
            color,
            thickness,
        );
        self.advance(1.0);
    }

    /// Draws a bordered table. The first row is a header rendered bold over
    /// per-column fill colors; body cells wrap within their column.
    pub fn table(
        &mut self,
        headers: &[&str],
        header_fills: &[Color],
        rows: &[Vec<String>],
        col_widths_mm: &[f32],
        size_pt: f32,
    ) {
        const CELL_PAD: f32 = 2.0;
        let line_height = line_height_mm(size_pt);

        // Header row.
        let header_height = line_height + 2.0 * CELL_PAD;
        self.ensure_space(header_height);
        self.advance(header_height);
        let mut x = MARGIN_MM;
        for (i, header) in headers.iter().enumerate() {
            let w = col_widths_mm[i];
            let fill = header_fills.get(i).cloned().unwrap_or_else(whitesmoke);
            self.rect(x, self.y, w, header_height, Some(fill), Some((black(), 0.6)));
            self.text_at(header, size_pt, true, x + CELL_PAD, self.y + CELL_PAD + 1.0, black());
            x += w;
        }

        // Body rows: height of a row is its tallest wrapped cell.
        for row in rows {
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    wrap_text(cell, size_pt, false, col_widths_mm[i] - 2.0 * CELL_PAD)
                })
                .collect();
            let row_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let row_height = row_lines as f32 * line_height + 2.0 * CELL_PAD;

            self.ensure_space(row_height);
            self.advance(row_height);
            let mut x = MARGIN_MM;
            for (i, cell_lines) in wrapped.iter().enumerate() {
                let w = col_widths_mm[i];
                self.rect(x, self.y, w, row_height, None, Some((black(), 0.6)));
                for (line_idx, line) in cell_lines.iter().enumerate() {
                    let line_y =
                        self.y + row_height - CELL_PAD - (line_idx as f32 + 1.0) * line_height + 1.0;
                    self.text_at(line, size_pt, false, x + CELL_PAD, line_y, black());
                }
                x += w;
            }
        }
    }

    /// Finalizes the document and returns the PDF bytes.
    pub fn save(self) -> Result<Vec<u8>, printpdf::Error> {
        self.draw_footer();
        self.doc.save_to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_table_covers_printable_ascii() {
        assert_eq!(HELVETICA_WIDTHS.len(), 95);
        // Spot checks against the Helvetica AFM.
        assert_eq!(text_width_mm(" ", 1000.0 / PT_TO_MM, false).round(), 278.0);
        assert_eq!(text_width_mm("m", 1000.0 / PT_TO_MM, false).round(), 833.0);
        assert_eq!(text_width_mm("i", 1000.0 / PT_TO_MM, false).round(), 222.0);
    }

    #[test]
    fn test_wrap_respects_max_width() {
        let lines = wrap_text(
            "one two three four five six seven eight nine ten",
            10.0,
            false,
            30.0,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 10.0, false) <= 30.0);
        }
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        let lines = wrap_text("supercalifragilisticexpialidocious", 12.0, false, 5.0);
        assert_eq!(lines, vec!["supercalifragilisticexpialidocious"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("", 10.0, false, 100.0).is_empty());
    }

    #[test]
    fn test_writer_produces_pdf_bytes() {
        let mut writer = PageWriter::new("test").unwrap();
        writer.heading("Heading");
        writer.paragraph("Some body text.", 10.0, false, black());
        writer.bullet("A bullet item", 10.0);
        let bytes = writer.save().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_many_paragraphs_paginate() {
        let mut writer = PageWriter::new("test").unwrap();
        for i in 0..400 {
            writer.paragraph(&format!("Line {i}"), 10.0, false, black());
        }
        // Cursor must have wrapped onto later pages rather than running off.
        assert!(writer.current_y() >= 0.0);
        assert!(writer.save().unwrap().starts_with(b"%PDF"));
    }
}
