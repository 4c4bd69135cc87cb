//! Resume PDF assembly from builder form data.
//!
//! Same page primitives as the analysis report, different document: a
//! name header with a contact line, then only the sections the form
//! actually filled in.

use crate::builder::models::{EducationItem, ExperienceItem, ProjectItem, ResumeFormData};
use crate::report::layout::{
    black, dark_blue, grey, line_height_mm, text_width_mm, PageWriter, PAGE_WIDTH_MM,
};
use crate::report::RenderError;

/// Renders the form data into a single-column resume PDF.
pub fn render_resume(data: &ResumeFormData) -> Result<Vec<u8>, RenderError> {
    let mut writer = PageWriter::new(&format!("{} - Resume", data.full_name))?;

    writer.spacer(2.0);
    writer.text_centered(
        &data.full_name,
        20.0,
        true,
        PAGE_WIDTH_MM / 2.0,
        writer.current_y() - 7.0,
        dark_blue(),
    );
    writer.advance(10.0);

    let contact = contact_line(data);
    if !contact.is_empty() {
        writer.text_centered(
            &contact,
            10.0,
            false,
            PAGE_WIDTH_MM / 2.0,
            writer.current_y() - 4.0,
            black(),
        );
        writer.advance(6.0);
    }
    writer.rule(dark_blue(), 1.0);
    writer.spacer(4.0);

    if let Some(summary) = non_empty(data.summary.as_deref()) {
        writer.subheading("Professional Summary");
        writer.paragraph(summary, 10.0, false, black());
        writer.spacer(4.0);
    }

    if !data.experience.is_empty() {
        writer.subheading("Experience");
        for item in &data.experience {
            experience_entry(&mut writer, item);
        }
        writer.spacer(2.0);
    }

    if !data.education.is_empty() {
        writer.subheading("Education");
        for item in &data.education {
            education_entry(&mut writer, item);
        }
        writer.spacer(2.0);
    }

    if let Some(skills) = non_empty(data.skills.as_deref()) {
        writer.subheading("Skills");
        writer.paragraph(skills, 10.0, false, black());
        writer.spacer(4.0);
    }

    if !data.projects.is_empty() {
        writer.subheading("Projects");
        for item in &data.projects {
            project_entry(&mut writer, item);
        }
    }

    Ok(writer.save()?)
}

fn experience_entry(writer: &mut PageWriter, item: &ExperienceItem) {
    entry_header(
        writer,
        &format!("{} - {}", item.title, item.company),
        &date_range(item.start_date.as_deref(), item.end_date.as_deref()),
    );
    if let Some(description) = non_empty(item.description.as_deref()) {
        for line in description.lines().filter(|l| !l.trim().is_empty()) {
            writer.paragraph(line.trim(), 10.0, false, black());
        }
    }
    writer.spacer(3.0);
}

fn education_entry(writer: &mut PageWriter, item: &EducationItem) {
    entry_header(
        writer,
        &item.school,
        item.year.as_deref().unwrap_or_default(),
    );
    if let Some(degree) = non_empty(item.degree.as_deref()) {
        writer.paragraph(degree, 10.0, false, black());
    }
    writer.spacer(3.0);
}

fn project_entry(writer: &mut PageWriter, item: &ProjectItem) {
    entry_header(writer, &item.name, "");
    if let Some(description) = non_empty(item.description.as_deref()) {
        for line in description.lines().filter(|l| !l.trim().is_empty()) {
            writer.paragraph(line.trim(), 10.0, false, black());
        }
    }
    writer.spacer(3.0);
}

/// Bold title flush left, optional date text flush right on the same line.
fn entry_header(writer: &mut PageWriter, left: &str, right: &str) {
    let size = 11.0;
    let height = line_height_mm(size);
    writer.ensure_space(height);
    writer.advance(height);
    let y = writer.current_y();
    writer.text_at(left, size, true, writer.left_margin(), y, black());
    if !right.is_empty() {
        let width = text_width_mm(right, 10.0, false);
        let x = writer.left_margin() + writer.content_width() - width;
        writer.text_at(right, 10.0, false, x, y, grey());
    }
}

/// " | "-joined contact details, in form order, skipping absent fields.
fn contact_line(data: &ResumeFormData) -> String {
    let mut parts = vec![data.email.as_str()];
    for field in [&data.phone, &data.location, &data.linkedin] {
        if let Some(value) = non_empty(field.as_deref()) {
            parts.push(value);
        }
    }
    parts.join(" | ")
}

fn date_range(start: Option<&str>, end: Option<&str>) -> String {
    match (non_empty(start), non_empty(end)) {
        (Some(s), Some(e)) => format!("{s} - {e}"),
        (Some(s), None) => format!("{s} - Present"),
        (None, Some(e)) => e.to_string(),
        (None, None) => String::new(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_form() -> ResumeFormData {
        serde_json::from_str(r#"{"fullName": "Jane Doe", "email": "jane@example.com"}"#).unwrap()
    }

    #[test]
    fn test_minimal_form_renders() {
        let bytes = render_resume(&minimal_form()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_full_form_renders() {
        let data: ResumeFormData = serde_json::from_str(
            r#"{
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1 555 010 2233",
                "location": "Lisbon",
                "linkedin": "linkedin.com/in/janedoe",
                "summary": "Backend engineer.",
                "experience": [{
                    "title": "Engineer",
                    "company": "Acme",
                    "startDate": "2021",
                    "description": "Built services.\nRan them too."
                }],
                "education": [{"school": "State University", "degree": "BSc", "year": "2019"}],
                "skills": "Rust, SQL",
                "projects": [{"name": "Side Project", "description": "A tool."}]
            }"#,
        )
        .unwrap();
        let bytes = render_resume(&data).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_contact_line_skips_blank_fields() {
        let mut data = minimal_form();
        data.phone = Some("  ".to_string());
        data.location = Some("Lisbon".to_string());
        assert_eq!(contact_line(&data), "jane@example.com | Lisbon");
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range(Some("2021"), Some("2023")), "2021 - 2023");
        assert_eq!(date_range(Some("2021"), None), "2021 - Present");
        assert_eq!(date_range(None, None), "");
    }
}
