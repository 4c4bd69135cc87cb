//! Analysis report assembly.
//!
//! Builds the paginated PDF from a [`CanonicalAnalysis`] plus candidate
//! metadata. Sections are emitted only when their triggering data is
//! non-empty; they vanish silently rather than rendering as empty shells.
//! Any assembly failure surfaces as `RenderError` with no partial bytes.

use thiserror::Error;

use crate::analysis::models::{CanonicalAnalysis, NOT_DETECTED};
use crate::report::gauge::{draw_gauge, ScoreBand};
use crate::report::layout::{
    black, dark_blue, light_green, light_grey, salmon, wrap_text, PageWriter,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Data-driven report sections, in assembly order. Title, info table and
/// gauge are unconditional and not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ExecutiveSummary,
    SkillGap,
    JobContext,
    Formatting,
    Recommendations,
    Ats,
}

/// Decides which conditional sections the analysis triggers.
pub fn enabled_sections(analysis: &CanonicalAnalysis) -> Vec<Section> {
    let mut sections = Vec::new();
    if !analysis.overall_assessment.trim().is_empty() {
        sections.push(Section::ExecutiveSummary);
    }
    if !analysis.matched_skills.is_empty() || !analysis.missing_skills.is_empty() {
        sections.push(Section::SkillGap);
    }
    if !analysis.job_context.requirements_summary.trim().is_empty() {
        sections.push(Section::JobContext);
    }
    if analysis.formatting_score > 0 || !analysis.formatting_issues.is_empty() {
        sections.push(Section::Formatting);
    }
    if !analysis.recommendations.is_empty() {
        sections.push(Section::Recommendations);
    }
    if analysis.ats_score > 0 || !analysis.ats_keywords_missing.is_empty() {
        sections.push(Section::Ats);
    }
    sections
}

/// Renders the full analysis report. Deterministic for identical inputs,
/// up to the embedded generation date.
pub fn render_report(
    analysis: &CanonicalAnalysis,
    candidate_name: &str,
    job_role: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut writer = PageWriter::new("Resume Analysis Report")?;

    // 1. Title and generation date.
    writer.spacer(4.0);
    writer.text_centered(
        "Resume Analysis Report",
        24.0,
        true,
        crate::report::layout::PAGE_WIDTH_MM / 2.0,
        writer.current_y() - 8.0,
        dark_blue(),
    );
    writer.advance(12.0);
    let dated = format!("Generated on {}", writer.generated_on());
    writer.paragraph(&dated, 10.0, false, black());
    writer.spacer(5.0);

    // 2. Candidate / job info table. The structured name wins over the
    // caller-supplied one when the model actually detected something.
    let display_name = if analysis.candidate_info.name != NOT_DETECTED {
        analysis.candidate_info.name.as_str()
    } else {
        candidate_name
    };
    info_table(
        &mut writer,
        &[
            [
                "Candidate Name:",
                display_name,
                "Detected Role:",
                analysis.candidate_info.role.as_str(),
            ],
            [
                "Target Job Role:",
                job_role,
                "Experience:",
                analysis.candidate_info.experience.as_str(),
            ],
            ["", "", "Education:", analysis.candidate_info.education.as_str()],
        ],
    );
    writer.spacer(7.0);

    // 3. Score gauge.
    writer.heading("Overall Match Score");
    draw_gauge(&mut writer, analysis.match_score, "Match Score");
    writer.spacer(5.0);

    for section in enabled_sections(analysis) {
        match section {
            Section::ExecutiveSummary => executive_summary(&mut writer, analysis),
            Section::SkillGap => skill_gap(&mut writer, analysis),
            Section::JobContext => job_context(&mut writer, analysis),
            Section::Formatting => formatting(&mut writer, analysis),
            Section::Recommendations => recommendations(&mut writer, analysis),
            Section::Ats => ats(&mut writer, analysis),
        }
    }

    Ok(writer.save()?)
}

fn executive_summary(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.subheading("Executive Summary");
    writer.paragraph(&clean_markdown(&analysis.overall_assessment), 10.0, false, black());
    writer.spacer(5.0);
}

fn skill_gap(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.heading("Skill Gap Analysis");

    // Pad both columns to equal row counts so the grid stays rectangular.
    let rows = analysis
        .matched_skills
        .len()
        .max(analysis.missing_skills.len());
    let body: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                skill_cell(analysis.matched_skills.get(i)),
                skill_cell(analysis.missing_skills.get(i)),
            ]
        })
        .collect();

    let half = writer.content_width() / 2.0;
    writer.table(
        &["Matched Skills (Strengths)", "Missing Skills (Gap)"],
        &[light_green(), salmon()],
        &body,
        &[half, half],
        10.0,
    );
    writer.spacer(7.0);
}

fn skill_cell(skill: Option<&String>) -> String {
    match skill {
        Some(s) => format!("\u{2022} {}", clean_markdown(s)),
        None => String::new(),
    }
}

fn job_context(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.subheading("Job Role Context");
    let title = if analysis.job_context.title.trim().is_empty() {
        "N/A"
    } else {
        analysis.job_context.title.as_str()
    };
    writer.paragraph(&format!("Title: {title}"), 10.0, false, black());
    writer.paragraph(
        &format!(
            "Requirements Summary: {}",
            clean_markdown(&analysis.job_context.requirements_summary)
        ),
        10.0,
        false,
        black(),
    );
    writer.spacer(5.0);
}

fn formatting(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.heading("Formatting & Structure");
    let band = ScoreBand::for_score(analysis.formatting_score);
    writer.paragraph(
        &format!("Formatting Score: {}/100", analysis.formatting_score),
        11.0,
        true,
        band.color(),
    );
    if analysis.formatting_issues.is_empty() {
        writer.bullet("No major formatting issues detected.", 10.0);
    } else {
        writer.paragraph("Identified Issues:", 10.0, true, black());
        for issue in &analysis.formatting_issues {
            writer.bullet(&clean_markdown(issue), 10.0);
        }
    }
    writer.spacer(5.0);
}

fn recommendations(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.heading("Recommended Learning Path");
    for rec in &analysis.recommendations {
        writer.bullet(&clean_markdown(rec), 10.0);
    }
    writer.spacer(5.0);
}

fn ats(writer: &mut PageWriter, analysis: &CanonicalAnalysis) {
    writer.heading("ATS Optimization");
    writer.paragraph(
        &format!("ATS Score: {}/100", analysis.ats_score),
        11.0,
        true,
        ScoreBand::for_score(analysis.ats_score).color(),
    );
    if !analysis.ats_keywords_missing.is_empty() {
        writer.paragraph("Missing Keywords:", 10.0, true, black());
        for keyword in &analysis.ats_keywords_missing {
            writer.bullet(&clean_markdown(keyword), 10.0);
        }
    }
    writer.spacer(5.0);
}

/// Four-column label/value grid used for the candidate info block.
fn info_table(writer: &mut PageWriter, rows: &[[&str; 4]]) {
    const COL_WIDTHS: [f32; 4] = [40.0, 52.0, 40.0, 58.5];
    const CELL_PAD: f32 = 2.0;
    let size = 10.0;
    let line_height = crate::report::layout::line_height_mm(size);

    for row in rows {
        let wrapped: Vec<Vec<String>> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| wrap_text(cell, size, i % 2 == 0, COL_WIDTHS[i] - 2.0 * CELL_PAD))
            .collect();
        let row_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        let row_height = row_lines as f32 * line_height + 2.0 * CELL_PAD;

        writer.ensure_space(row_height);
        writer.advance(row_height);
        let mut x = writer.left_margin();
        for (i, cell_lines) in wrapped.iter().enumerate() {
            writer.rect(
                x,
                writer.current_y(),
                COL_WIDTHS[i],
                row_height,
                Some(crate::report::layout::whitesmoke()),
                Some((light_grey(), 0.5)),
            );
            for (line_idx, line) in cell_lines.iter().enumerate() {
                let line_y = writer.current_y() + row_height
                    - CELL_PAD
                    - (line_idx as f32 + 1.0) * line_height
                    + 1.0;
                writer.text_at(line, size, i % 2 == 0, x + CELL_PAD, line_y, black());
            }
            x += COL_WIDTHS[i];
        }
    }
}

/// Strips stray Markdown markers the model leaves in free-text fields.
fn clean_markdown(text: &str) -> String {
    text.replace("**", "")
        .replace("##", "")
        .replace('*', "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{CandidateInfo, JobContext};

    fn full_analysis() -> CanonicalAnalysis {
        CanonicalAnalysis {
            match_score: 82,
            ats_score: 74,
            matched_skills: vec!["Rust".into(), "SQL".into()],
            missing_skills: vec!["Kubernetes".into()],
            recommendations: vec!["Learn container orchestration".into()],
            overall_assessment: "Strong candidate.".into(),
            candidate_info: CandidateInfo {
                name: "Jane Doe".into(),
                role: "Backend Engineer".into(),
                experience: "4 years".into(),
                education: "BSc".into(),
            },
            formatting_score: 70,
            formatting_issues: vec!["Dense summary paragraph".into()],
            job_context: JobContext {
                title: "Senior Engineer".into(),
                requirements_summary: "Rust at scale".into(),
            },
            ats_keywords_missing: vec!["Docker".into()],
        }
    }

    fn empty_analysis() -> CanonicalAnalysis {
        CanonicalAnalysis {
            overall_assessment: String::new(),
            ..CanonicalAnalysis::default()
        }
    }

    #[test]
    fn test_all_sections_enabled_for_full_analysis() {
        let sections = enabled_sections(&full_analysis());
        assert_eq!(
            sections,
            vec![
                Section::ExecutiveSummary,
                Section::SkillGap,
                Section::JobContext,
                Section::Formatting,
                Section::Recommendations,
                Section::Ats,
            ]
        );
    }

    #[test]
    fn test_empty_analysis_disables_every_data_driven_section() {
        assert!(enabled_sections(&empty_analysis()).is_empty());
    }

    #[test]
    fn test_skill_gap_triggers_on_either_column() {
        let mut analysis = empty_analysis();
        analysis.missing_skills = vec!["Go".into()];
        assert!(enabled_sections(&analysis).contains(&Section::SkillGap));
    }

    #[test]
    fn test_formatting_triggers_on_score_alone() {
        let mut analysis = empty_analysis();
        analysis.formatting_score = 55;
        assert!(enabled_sections(&analysis).contains(&Section::Formatting));
    }

    #[test]
    fn test_render_full_report() {
        let bytes = render_report(&full_analysis(), "Jane Doe", "Senior Engineer").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_analysis_still_produces_document() {
        // Title, date and gauge render even when every section is skipped.
        let bytes = render_report(&empty_analysis(), "Candidate", "Job Role").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_clean_markdown() {
        assert_eq!(clean_markdown("**bold** and *starred*"), "bold and starred");
        assert_eq!(clean_markdown("## Header"), "Header");
    }
}
