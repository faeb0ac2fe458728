use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A generated resume. Session-scoped only: stored under the browser session
/// and overwritten by each new build/generate request, never persisted to the
/// database.
///
/// Every field carries `#[serde(default)]` so a model response that omits a
/// key still deserializes; a response that is not JSON at all falls back to
/// [`crate::builder::fallback_resume`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedResume {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub summary: String,
    /// Skills keyed by category ("Technical", "Soft Skills", "Tools", ...).
    /// BTreeMap keeps rendering order deterministic.
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
}
