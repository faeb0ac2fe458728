//! Resume builder — manual form assembly and AI generation of a complete
//! resume from user-provided facts.
//!
//! The generated resume is session-scoped only: stored under the browser
//! session for the follow-up PDF download, overwritten by each new request,
//! never persisted.

pub mod forms;
pub mod handlers;
pub mod prompts;

use crate::models::resume::{EducationEntry, ExperienceEntry, GeneratedResume};

/// Raw user input to the AI generation prompt. Experience and education
/// arrive either as free text (simple form) or structured entries
/// (detailed form with indexed fields).
#[derive(Debug, Clone)]
pub struct BuilderInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_role: String,
    pub skills: String,
    pub experience: ExperienceInput,
    pub education: EducationInput,
}

#[derive(Debug, Clone)]
pub enum ExperienceInput {
    FreeText(String),
    Structured(Vec<ExperienceEntry>),
}

#[derive(Debug, Clone)]
pub enum EducationInput {
    FreeText(String),
    Structured(Vec<EducationEntry>),
}

/// Whether the simple form carries enough material for a useful generation.
/// Below these thresholds the client is asked for the detailed form instead.
pub fn needs_more_detail(experience: &str, education: &str) -> bool {
    experience.chars().count() < 50 || education.chars().count() < 20
}

/// Graceful degradation when the model response cannot be parsed: echo the
/// user's identity fields with an apologetic summary and empty sections.
pub fn fallback_resume(input: &BuilderInput) -> GeneratedResume {
    GeneratedResume {
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        job_role: input.job_role.clone(),
        summary: "Sorry, the AI could not generate a resume at this time. Please try again."
            .to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_more_detail_thresholds() {
        let long_experience = "Led the storage team at Acme for five years, shipping three majors.";
        let long_education = "BSc Computer Science, MIT, 2019";
        assert!(long_experience.chars().count() >= 50);
        assert!(long_education.chars().count() >= 20);
        assert!(needs_more_detail("short", long_education));
        assert!(needs_more_detail(long_experience, "BSc"));
        // 17 chars of education is still below the threshold.
        assert!(needs_more_detail(long_experience, "BSc CS, MIT, 2019"));
        assert!(!needs_more_detail(long_experience, long_education));
    }

    #[test]
    fn test_fallback_echoes_identity_with_empty_sections() {
        let input = BuilderInput {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "123".to_string(),
            job_role: "Backend Engineer".to_string(),
            skills: "Rust, SQL".to_string(),
            experience: ExperienceInput::FreeText("some text".to_string()),
            education: EducationInput::FreeText("some text".to_string()),
        };
        let resume = fallback_resume(&input);
        assert_eq!(resume.name, "Ada Lovelace");
        assert_eq!(resume.job_role, "Backend Engineer");
        assert!(resume.summary.contains("could not generate"));
        assert!(resume.skills.is_empty());
        assert!(resume.experience.is_empty());
        assert!(resume.education.is_empty());
    }
}
