//! Form parsing for the resume builder.
//!
//! The detailed AI form posts dynamic entry lists as index-suffixed keys
//! (`exp-title-0`, `exp-title-1`, ..., `edu-degree-0`, ...); entries are
//! collected from index 0 until the first gap.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::resume::{EducationEntry, ExperienceEntry, GeneratedResume};

/// Manual resume builder form. Everything optional; missing fields become
/// empty sections.
#[derive(Debug, Deserialize)]
pub struct BuildForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub achievements: String,
}

/// Assembles a manual form into the structured resume shape: comma-split
/// skills under a single category, free-text experience as one entry with
/// line-per-achievement, certifications and achievements as extra skill
/// categories.
pub fn manual_resume(form: &BuildForm) -> GeneratedResume {
    let mut resume = GeneratedResume {
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        job_role: form.job_role.clone(),
        ..Default::default()
    };

    let skills = split_list(&form.skills, ',');
    if !skills.is_empty() {
        resume.skills.insert("Skills".to_string(), skills);
    }
    let certifications = split_list(&form.certifications, '\n');
    if !certifications.is_empty() {
        resume.skills.insert("Certifications".to_string(), certifications);
    }
    let achievements = split_list(&form.achievements, '\n');
    if !achievements.is_empty() {
        resume.skills.insert("Achievements".to_string(), achievements);
    }

    if !form.experience.trim().is_empty() {
        resume.experience.push(ExperienceEntry {
            title: form.job_role.clone(),
            achievements: split_list(&form.experience, '\n'),
            ..Default::default()
        });
    }
    if !form.education.trim().is_empty() {
        resume.education.push(EducationEntry {
            degree: form.education.trim().to_string(),
            ..Default::default()
        });
    }

    resume
}

/// Collects the indexed experience and education entries from the detailed
/// form. `exp-achievements-N` is newline-split into individual bullets.
pub fn parse_detailed_entries(
    form: &HashMap<String, String>,
) -> (Vec<ExperienceEntry>, Vec<EducationEntry>) {
    let mut experience = Vec::new();
    let mut index = 0;
    while let Some(title) = form.get(&format!("exp-title-{index}")) {
        experience.push(ExperienceEntry {
            title: title.trim().to_string(),
            company: field(form, &format!("exp-company-{index}")),
            dates: field(form, &format!("exp-dates-{index}")),
            achievements: split_list(&field(form, &format!("exp-achievements-{index}")), '\n'),
        });
        index += 1;
    }

    let mut education = Vec::new();
    let mut index = 0;
    while let Some(degree) = form.get(&format!("edu-degree-{index}")) {
        education.push(EducationEntry {
            degree: degree.trim().to_string(),
            institution: field(form, &format!("edu-institution-{index}")),
            year: field(form, &format!("edu-year-{index}")),
        });
        index += 1;
    }

    (experience, education)
}

pub fn field(form: &HashMap<String, String>, key: &str) -> String {
    form.get(key).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn split_list(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
