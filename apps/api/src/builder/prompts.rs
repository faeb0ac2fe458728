//! Prompt construction for whole-resume generation.
//!
//! The model is instructed to return a single JSON object matching the
//! [`crate::models::resume::GeneratedResume`] schema; `LlmClient::call_json`
//! handles fence stripping and parsing.

use super::{BuilderInput, EducationInput, ExperienceInput};

/// Builds the generation prompt from the user's provided facts. Structured
/// experience/education entries are flattened into labeled blocks; free text
/// is passed through as-is.
pub fn build_generation_prompt(input: &BuilderInput) -> String {
    let experience_str = match &input.experience {
        ExperienceInput::FreeText(text) => text.clone(),
        ExperienceInput::Structured(entries) => entries
            .iter()
            .map(|exp| {
                let achievements: String = exp
                    .achievements
                    .iter()
                    .map(|a| format!("- {a}\n"))
                    .collect();
                format!(
                    "Title: {}\nCompany: {}\nDates: {}\nAchievements:\n{}",
                    exp.title, exp.company, exp.dates, achievements
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };

    let education_str = match &input.education {
        EducationInput::FreeText(text) => text.clone(),
        EducationInput::Structured(entries) => entries
            .iter()
            .map(|edu| {
                format!(
                    "Degree: {}\nInstitution: {}\nYear: {}",
                    edu.degree, edu.institution, edu.year
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };

    format!(
        r#"You are an expert career coach and professional resume writer. Based on the user's provided information, generate a complete, professional, and ATS-friendly resume.
The final output MUST be a single, valid JSON object. Do not include any text, notes, or markdown formatting outside of the JSON object.

**User's Information:**
- Name: {name}
- Email: {email}
- Phone: {phone}
- Target Job Role: {job_role}
- Provided Skills: {skills}
- Provided Experience: {experience}
- Provided Education: {education}

**Your Task:**
1. **Professional Summary:** Write a compelling 3-4 sentence summary tailored to the target job role.
2. **Skills:** Expand the user's skills into a categorized list (Technical, Soft Skills, Tools).
3. **Experience:** Convert the provided experience into a professional format. Ensure each role has 3-5 achievement-oriented bullet points. If the user provided bullet points, refine them. If they provided a paragraph, extract achievements and write them in the STAR method.
4. **Education:** Format the education details professionally.

**JSON Output Structure:**
{{
  "name": "{name}",
  "email": "{email}",
  "phone": "{phone}",
  "job_role": "{job_role}",
  "summary": "...",
  "skills": {{ "Technical": [...], "Soft Skills": [...], "Tools": [...] }},
  "experience": [ {{ "title": "...", "company": "...", "dates": "...", "achievements": [...] }} ],
  "education": [ {{ "degree": "...", "institution": "...", "year": "..." }} ]
}}"#,
        name = input.name,
        email = input.email,
        phone = input.phone,
        job_role = input.job_role,
        skills = input.skills,
        experience = experience_str.trim(),
        education = education_str.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry};

    fn structured_input() -> BuilderInput {
        BuilderInput {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "123".to_string(),
            job_role: "Backend Engineer".to_string(),
            skills: "Rust, SQL".to_string(),
            experience: ExperienceInput::Structured(vec![ExperienceEntry {
                title: "Senior Engineer".to_string(),
                company: "Acme".to_string(),
                dates: "2019 - 2024".to_string(),
                achievements: vec!["Shipped the widget pipeline".to_string()],
            }]),
            education: EducationInput::Structured(vec![EducationEntry {
                degree: "BSc CS".to_string(),
                institution: "MIT".to_string(),
                year: "2015".to_string(),
            }]),
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let input = structured_input();
        assert_eq!(build_generation_prompt(&input), build_generation_prompt(&input));
    }

    #[test]
    fn test_structured_entries_are_flattened() {
        let prompt = build_generation_prompt(&structured_input());
        assert!(prompt.contains("Title: Senior Engineer"));
        assert!(prompt.contains("- Shipped the widget pipeline"));
        assert!(prompt.contains("Degree: BSc CS"));
    }

    #[test]
    fn test_free_text_passes_through() {
        let mut input = structured_input();
        input.experience = ExperienceInput::FreeText("Five years at Acme doing Rust.".to_string());
        let prompt = build_generation_prompt(&input);
        assert!(prompt.contains("Provided Experience: Five years at Acme doing Rust."));
    }
}
