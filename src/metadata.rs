use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptive fields of a project plus the date scheduling anchors to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    pub project_description: String,
    pub start_date: NaiveDate,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_description: "No description".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }
}
