use serde::{Deserialize, Serialize};

/// A unit of work in a construction plan.
///
/// Durations are measured in days and may be fractional. Dependencies
/// reference other task ids; a task cannot start before every dependency
/// has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Stage label the task belongs to, e.g. "Foundation". Free-form.
    #[serde(default)]
    pub stage: String,
    pub duration_days: f64,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_days: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stage: String::new(),
            duration_days,
            dependencies: Vec::new(),
        }
    }
}
