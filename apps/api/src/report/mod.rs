//! Report Formatter — turns the unstructured AI critique into HTML for the
//! web response and into flattened plain text for the PDF layout.
//!
//! There is no document model. Formatting is textual substitution over the
//! shapes the model actually emits (`**Heading**`, bullet lines, `NN/100`),
//! so it is deliberately best-effort: an unexpected phrasing degrades to a
//! plain paragraph, never an error.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

struct Patterns {
    score_heading: Regex,
    strengths_heading: Regex,
    improvement_heading: Regex,
    missing_heading: Regex,
    generic_heading: Regex,
    emphasis: Regex,
    score_badge: Regex,
    tag: Regex,
    blank_runs: Regex,
    spaces: Regex,
    score_value: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        score_heading: Regex::new(r"(?i)\*\*(Resume Score.*?)\*\*").unwrap(),
        strengths_heading: Regex::new(r"(?i)\*\*(Strengths.*?)\*\*").unwrap(),
        improvement_heading: Regex::new(r"(?i)\*\*(Areas for Improvement.*?)\*\*").unwrap(),
        missing_heading: Regex::new(r"(?i)\*\*(Missing Skills.*?)\*\*").unwrap(),
        generic_heading: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
        emphasis: Regex::new(r"\*(.*?)\*").unwrap(),
        score_badge: Regex::new(r"\b(\d{1,3})\s*/\s*100\b").unwrap(),
        tag: Regex::new(r"<[^>]+>").unwrap(),
        blank_runs: Regex::new(r"\n\s*\n+").unwrap(),
        spaces: Regex::new(r" {2,}").unwrap(),
        score_value: Regex::new(r"(?i)score[^0-9]*(\d{1,3})").unwrap(),
    })
}

/// Structured best-effort view of a critique, for the dashboard and charts.
#[derive(Debug, Default, Serialize)]
pub struct ReportSummary {
    pub score: Option<u32>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Annotates the raw AI text as an HTML fragment for the web view: known
/// bold headers become icon headings, bullets become info boxes, score
/// substrings become badges, and blank-line-delimited runs become boxed
/// paragraphs.
pub fn format_for_web(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return r#"<div class="analysis-content"><p>No analysis data available.</p></div>"#
            .to_string();
    }

    let p = patterns();
    let text = p
        .score_heading
        .replace_all(text, r#"<h5><i class="fas fa-star"></i> $1</h5>"#);
    let text = p
        .strengths_heading
        .replace_all(&text, r#"<h5><i class="fas fa-thumbs-up"></i> $1</h5>"#);
    let text = p
        .improvement_heading
        .replace_all(&text, r#"<h5><i class="fas fa-lightbulb"></i> $1</h5>"#);
    let text = p
        .missing_heading
        .replace_all(&text, r#"<h5><i class="fas fa-exclamation-triangle"></i> $1</h5>"#);
    let text = p
        .generic_heading
        .replace_all(&text, r#"<h5><i class="fas fa-info-circle"></i> $1</h5>"#);
    let text = p.emphasis.replace_all(&text, "<strong>$1</strong>");
    let text = p
        .score_badge
        .replace_all(&text, r#"<span class="score-badge">$1/100</span>"#);

    let mut formatted: Vec<String> = Vec::new();
    let mut in_section = false;
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            if in_section {
                formatted.push("</div>".to_string());
                in_section = false;
            }
            continue;
        }
        if line.starts_with("<h5>") {
            if in_section {
                formatted.push("</div>".to_string());
            }
            formatted.push(line.to_string());
            formatted.push(r#"<div class="highlight-box">"#.to_string());
            in_section = true;
        } else if line.starts_with('•') || line.starts_with('-') || line.starts_with('*') {
            let mut chars = line.chars();
            chars.next();
            let bullet = chars.as_str().trim();
            formatted.push(format!(
                r#"<div class="info-box"><i class="fas fa-check-circle"></i> {bullet}</div>"#
            ));
        } else {
            if !in_section {
                formatted.push(r#"<div class="highlight-box">"#.to_string());
                in_section = true;
            }
            formatted.push(format!("<p>{line}</p>"));
        }
    }
    if in_section {
        formatted.push("</div>".to_string());
    }

    format!(
        r#"<div class="analysis-content">{}</div>"#,
        formatted.join("\n")
    )
}

/// Flattens formatted HTML back to plain text for the PDF layout: tags
/// stripped, common entities decoded, whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    let p = patterns();
    let mut text = p.tag.replace_all(html, "").to_string();
    for (entity, plain) in [
        ("&nbsp;", " "),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&amp;", "&"),
    ] {
        text = text.replace(entity, plain);
    }
    let text = p.blank_runs.replace_all(&text, "\n\n");
    let text = p.spaces.replace_all(&text, " ");
    text.trim().to_string()
}

/// Pattern-matches the critique into a [`ReportSummary`]. Sections are
/// located by their bold headers; up to five items are kept per section.
pub fn extract_summary(text: &str) -> ReportSummary {
    let p = patterns();
    let mut summary = ReportSummary {
        score: p
            .score_value
            .captures(text)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(|s| s.min(100)),
        ..Default::default()
    };

    let headers: Vec<(String, usize, usize)> = p
        .generic_heading
        .captures_iter(text)
        .map(|c| {
            let m = c.get(0).unwrap();
            (c[1].to_lowercase(), m.start(), m.end())
        })
        .collect();

    for (i, (header, _, body_start)) in headers.iter().enumerate() {
        let body_end = headers
            .get(i + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(text.len());
        let items = section_items(&text[*body_start..body_end]);

        if header.contains("strength") {
            summary.strengths = items;
        } else if header.contains("improvement") {
            summary.improvements = items;
        } else if header.contains("missing") || header.contains("skill") {
            summary.missing_skills = items;
        }
    }

    summary
}

fn section_items(body: &str) -> Vec<String> {
    body.lines()
        .map(|line| line.trim().trim_start_matches(['•', '-', '*']).trim())
        .filter(|line| !line.is_empty())
        .take(5)
        .map(str::to_string)
        .collect()
}

/// Wraps a formatted fragment into the standalone report document used for
/// PDF rendering and the email attachment.
pub fn report_page(result_html: &str, job_role: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Resume Analysis</title></head>\n<body>\n\
         <h1>Resume Analysis</h1>\n\
         <p>Job Role: {job_role}</p>\n\
         <p>Generated: {}</p>\n\
         {result_html}\n</body>\n</html>",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRITIQUE: &str = "**Resume Score:**\n85/100\n\n\
        **Strengths:**\n- Strong Rust background\n- Clear project outcomes\n\n\
        **Areas for Improvement:**\n- Quantify achievements with metrics\n\n\
        **Missing Skills/Keywords:**\n- Kubernetes\n- Terraform\n";

    #[test]
    fn test_known_headings_get_icons() {
        let html = format_for_web(CRITIQUE);
        assert!(html.contains(r#"<h5><i class="fas fa-star"></i> Resume Score:</h5>"#));
        assert!(html.contains(r#"<h5><i class="fas fa-thumbs-up"></i> Strengths:</h5>"#));
        assert!(html.contains(r#"<h5><i class="fas fa-lightbulb"></i> Areas for Improvement:</h5>"#));
        assert!(html
            .contains(r#"<h5><i class="fas fa-exclamation-triangle"></i> Missing Skills/Keywords:</h5>"#));
    }

    #[test]
    fn test_unknown_bold_heading_gets_info_icon() {
        let html = format_for_web("**Final Verdict:**\nLooks good.");
        assert!(html.contains(r#"<h5><i class="fas fa-info-circle"></i> Final Verdict:</h5>"#));
    }

    #[test]
    fn test_bullets_become_info_boxes() {
        let html = format_for_web(CRITIQUE);
        assert_eq!(html.matches(r#"<div class="info-box">"#).count(), 5);
        assert!(html.contains("fa-check-circle\"></i> Strong Rust background"));
    }

    #[test]
    fn test_score_becomes_badge() {
        let html = format_for_web(CRITIQUE);
        assert!(html.contains(r#"<span class="score-badge">85/100</span>"#));
    }

    #[test]
    fn test_empty_input_placeholder() {
        let html = format_for_web("   ");
        assert!(html.contains("No analysis data available."));
    }

    #[test]
    fn test_strip_html_removes_tags_and_decodes_entities() {
        let text = strip_html("<h5>Score</h5>\n\n\n<p>85 &amp; rising&nbsp;fast</p>");
        assert_eq!(text, "Score\n\n85 & rising fast");
    }

    #[test]
    fn test_strip_html_inverts_web_format() {
        let text = strip_html(&format_for_web(CRITIQUE));
        assert!(text.contains("Resume Score:"));
        assert!(text.contains("Strong Rust background"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_extract_summary() {
        let summary = extract_summary(CRITIQUE);
        assert_eq!(summary.score, Some(85));
        assert_eq!(
            summary.strengths,
            vec!["Strong Rust background", "Clear project outcomes"]
        );
        assert_eq!(summary.improvements, vec!["Quantify achievements with metrics"]);
        assert_eq!(summary.missing_skills, vec!["Kubernetes", "Terraform"]);
    }

    #[test]
    fn test_extract_summary_on_unstructured_text() {
        let summary = extract_summary("The model rambled with no sections at all.");
        assert_eq!(summary.score, None);
        assert!(summary.strengths.is_empty());
    }

    #[test]
    fn test_report_page_embeds_fragment_and_role() {
        let page = report_page("<p>body</p>", "Backend Engineer", Utc::now());
        assert!(page.contains("<p>body</p>"));
        assert!(page.contains("Job Role: Backend Engineer"));
    }
}
