//! Radial score gauge.
//!
//! A semicircular dial built from short stroked tick segments, grey for the
//! full range and colored up to the score. The four-tier threshold table
//! below is the single authoritative one for the whole report: the legacy
//! sources disagreed at the 40/60/80 boundaries, so orange deliberately
//! spans 40-79 (Moderate, then Good) with green reserved for 80+.

use printpdf::Color;

use crate::report::layout::{dark_blue, green, light_grey, orange, red, PageWriter};

const GAUGE_HEIGHT_MM: f32 = 58.0;
const RADIUS_MM: f32 = 32.0;
const TICK_LEN_MM: f32 = 4.0;
/// Vertical room under the dial center for the score, band and label
/// lines. The center sits this far above the reserved block's bottom so
/// nothing draws past what `ensure_space` reserved.
const LABEL_STACK_MM: f32 = 16.0;

/// Quality band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=39 => ScoreBand::Poor,
            40..=59 => ScoreBand::Moderate,
            60..=79 => ScoreBand::Good,
            _ => ScoreBand::Excellent,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Poor => "Poor",
            ScoreBand::Moderate => "Moderate",
            ScoreBand::Good => "Good",
            ScoreBand::Excellent => "Excellent",
        }
    }

    pub fn color(self) -> Color {
        match self {
            ScoreBand::Poor => red(),
            ScoreBand::Moderate | ScoreBand::Good => orange(),
            ScoreBand::Excellent => green(),
        }
    }
}

/// Draws the gauge centered on the page and advances the cursor past it.
pub fn draw_gauge(writer: &mut PageWriter, score: u8, label: &str) {
    writer.ensure_space(GAUGE_HEIGHT_MM);

    let band = ScoreBand::for_score(score);
    let cx = writer.left_margin() + writer.content_width() / 2.0;
    let cy = writer.current_y() - GAUGE_HEIGHT_MM + LABEL_STACK_MM;

    // Background arc, then the colored score arc over it. One tick per two
    // score points, sweeping 180 degrees right-to-left.
    for i in (0..=100u16).step_by(2) {
        draw_tick(writer, cx, cy, i, light_grey(), 1.2);
    }
    for i in (0..=u16::from(score)).step_by(2) {
        draw_tick(writer, cx, cy, i, band.color(), 1.8);
    }

    writer.text_centered(&format!("{score}%"), 28.0, true, cx, cy - 2.0, band.color());
    writer.text_centered(band.label(), 12.0, false, cx, cy - 9.0, crate::report::layout::black());
    writer.text_centered(label, 14.0, true, cx, cy - LABEL_STACK_MM, dark_blue());

    writer.advance(GAUGE_HEIGHT_MM);
}

fn draw_tick(writer: &PageWriter, cx: f32, cy: f32, value: u16, color: Color, thickness: f32) {
    let angle = (180.0 - f32::from(value) * 1.8).to_radians();
    let (sin, cos) = angle.sin_cos();
    let x1 = cx + (RADIUS_MM - TICK_LEN_MM / 2.0) * cos;
    let y1 = cy + (RADIUS_MM - TICK_LEN_MM / 2.0) * sin;
    let x2 = cx + (RADIUS_MM + TICK_LEN_MM / 2.0) * cos;
    let y2 = cy + (RADIUS_MM + TICK_LEN_MM / 2.0) * sin;
    writer.stroke_segment(x1, y1, x2, y2, color, thickness);
}
