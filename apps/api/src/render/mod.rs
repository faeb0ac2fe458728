//! PDF Renderer — plain-text layout of a report document onto US-letter
//! pages with the built-in Helvetica faces.
//!
//! Input is HTML (the report page or a generated resume); it is flattened
//! through the report formatter's stripping pass, then laid out top-down
//! with greedy wrapping and page breaks. Lines matching the heading lexicon
//! get the bold face at a larger size, mirroring the web view's structure.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use thiserror::Error;

use crate::models::resume::GeneratedResume;
use crate::report::strip_html;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 25.4;

const HEADING_SIZE_PT: f32 = 14.0;
const BODY_SIZE_PT: f32 = 11.0;
const HEADING_LEADING_MM: f32 = 8.0;
const BODY_LEADING_MM: f32 = 5.5;
const PARAGRAPH_GAP_MM: f32 = 2.5;

// Greedy wrap widths, tuned for the two face sizes on a 165mm text column.
const BODY_WRAP_CHARS: usize = 90;
const HEADING_WRAP_CHARS: usize = 70;

const HEADING_LEXICON: &[&str] = &[
    "Resume Analysis",
    "Job Role",
    "Score",
    "Skills",
    "Strengths",
    "Areas for Improvement",
    "Missing",
    "Summary",
    "Experience",
    "Education",
];

/// Converts an HTML document into PDF bytes.
pub fn render_pdf(html: &str) -> Result<Vec<u8>, RenderError> {
    let text = strip_html(html);

    let (doc, first_page, first_layer) =
        PdfDocument::new("Resume Analysis", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let body_font = builtin(&doc, BuiltinFont::Helvetica)?;
    let heading_font = builtin(&doc, BuiltinFont::HelveticaBold)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            cursor_mm -= PARAGRAPH_GAP_MM;
            continue;
        }

        let is_heading = HEADING_LEXICON.iter().any(|h| paragraph.contains(h));
        let (font, size, leading, wrap) = if is_heading {
            (&heading_font, HEADING_SIZE_PT, HEADING_LEADING_MM, HEADING_WRAP_CHARS)
        } else {
            (&body_font, BODY_SIZE_PT, BODY_LEADING_MM, BODY_WRAP_CHARS)
        };

        for line in wrap_line(paragraph, wrap) {
            if cursor_mm < MARGIN_MM {
                let (page, layer_index) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(layer_index);
                cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            draw_line(&layer, &line, size, cursor_mm, font);
            cursor_mm -= leading;
        }
    }

    doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}

fn builtin(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, RenderError> {
    doc.add_builtin_font(font)
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

fn draw_line(layer: &PdfLayerReference, line: &str, size: f32, cursor_mm: f32, font: &IndirectFontRef) {
    layer.use_text(line, size, Mm(MARGIN_MM), Mm(cursor_mm), font);
}

/// Greedy whitespace wrap. A single word longer than the width gets its own
/// line rather than being split.
fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Renders a generated resume as the HTML document fed to [`render_pdf`].
pub fn resume_html(resume: &GeneratedResume) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Resume</title></head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", resume.name));
    html.push_str(&format!(
        "<p>{} | {} | {}</p>\n",
        resume.email, resume.phone, resume.job_role
    ));

    if !resume.summary.is_empty() {
        html.push_str("<h2>Summary</h2>\n");
        html.push_str(&format!("<p>{}</p>\n", resume.summary));
    }

    if !resume.skills.is_empty() {
        html.push_str("<h2>Skills</h2>\n");
        for (category, skills) in &resume.skills {
            html.push_str(&format!("<p>{}: {}</p>\n", category, skills.join(", ")));
        }
    }

    if !resume.experience.is_empty() {
        html.push_str("<h2>Experience</h2>\n");
        for entry in &resume.experience {
            html.push_str(&format!(
                "<h3>{} — {} ({})</h3>\n<ul>\n",
                entry.title, entry.company, entry.dates
            ));
            for achievement in &entry.achievements {
                html.push_str(&format!("<li>{achievement}</li>\n"));
            }
            html.push_str("</ul>\n");
        }
    }

    if !resume.education.is_empty() {
        html.push_str("<h2>Education</h2>\n");
        for entry in &resume.education {
            html.push_str(&format!(
                "<p>{}, {} ({})</p>\n",
                entry.degree, entry.institution, entry.year
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry};
    use crate::report::{format_for_web, report_page};
    use chrono::Utc;

    fn sample_resume() -> GeneratedResume {
        GeneratedResume {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+44 1234 567890".to_string(),
            job_role: "Backend Engineer".to_string(),
            summary: "Engineer with a decade of systems experience.".to_string(),
            skills: [("Technical".to_string(), vec!["Rust".to_string(), "SQL".to_string()])]
                .into_iter()
                .collect(),
            experience: vec![ExperienceEntry {
                title: "Senior Engineer".to_string(),
                company: "Analytical Engines Ltd".to_string(),
                dates: "2019 - present".to_string(),
                achievements: vec!["Cut build times by 40%".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc Mathematics".to_string(),
                institution: "University of London".to_string(),
                year: "2012".to_string(),
            }],
        }
    }

    #[test]
    fn test_report_renders_to_pdf_bytes() {
        let page = report_page(
            &format_for_web("**Resume Score:**\n85/100\n\n- Solid fundamentals"),
            "Backend Engineer",
            Utc::now(),
        );
        let pdf = render_pdf(&page).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_generated_resume_roundtrips_to_pdf() {
        let resume = sample_resume();
        let html = resume_html(&resume);
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("Technical: Rust, SQL"));

        let pdf = render_pdf(&html).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_document_paginates() {
        let body: String = (0..200)
            .map(|i| format!("<p>Paragraph number {i} with some filler text.</p>\n"))
            .collect();
        let pdf = render_pdf(&body).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_line_respects_width() {
        let lines = wrap_line("one two three four five six", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six");
    }

    #[test]
    fn test_wrap_line_keeps_overlong_word_whole() {
        let lines = wrap_line("tiny supercalifragilisticexpialidocious", 10);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "supercalifragilisticexpialidocious");
    }
}
