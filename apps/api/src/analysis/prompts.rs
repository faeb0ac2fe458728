//! Prompt construction for resume review.
//!
//! The prompt is a deterministic interpolation of the resume text and the
//! job role. Inputs are passed through verbatim; sanitizing against prompt
//! injection is an explicit non-goal.

/// Builds the review prompt for a resume and target job role. The reviewer
/// persona is asked for a 0-100 score, strengths, actionable improvements,
/// and missing keywords — the section headers here drive the downstream
/// report formatter.
pub fn build_review_prompt(resume_text: &str, job_role: &str) -> String {
    format!(
        r#"As a senior HR reviewer and career coach at a top technology firm, please provide a professional analysis of the following resume for the job role of "{job_role}".

Your response should be structured as a real HR professional would provide feedback to a candidate.

**Resume Score:**
Provide a score out of 100, based on relevance, skills, structure, and overall presentation.

**Strengths:**
Identify 2-3 key strengths of the resume that align with the target role.

**Areas for Improvement:**
List specific, actionable suggestions for what the candidate can do to improve their resume. Focus on clarity, professionalism, and alignment with the job description.

**Missing Skills/Keywords:**
Based on the job role of "{job_role}", list any critical skills or keywords that are missing from the resume.

**Resume Text to Analyze:**
{resume_text}

Please provide a comprehensive and supportive analysis."#
    )
}
