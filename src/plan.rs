use crate::task::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug)]
pub enum PlanError {
    /// The reply text contained nothing that looks like a JSON object.
    EmptyReply,
    Json(serde_json::Error),
    /// A duration that could not be read as a positive day count, with
    /// no fallback configured.
    MalformedDuration { task: String, value: String },
    DuplicateTaskName { name: String },
    /// A dependency naming a task that appears nowhere in the plan.
    UnknownTaskReference { task: String, reference: String },
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::EmptyReply => write!(f, "reply contained no JSON payload"),
            PlanError::Json(err) => write!(f, "invalid plan json: {err}"),
            PlanError::MalformedDuration { task, value } => {
                write!(f, "task '{task}' has unusable duration '{value}'")
            }
            PlanError::DuplicateTaskName { name } => {
                write!(f, "duplicate task name '{name}'")
            }
            PlanError::UnknownTaskReference { task, reference } => {
                write!(f, "task '{task}' depends on unknown task '{reference}'")
            }
        }
    }
}

impl std::error::Error for PlanError {}

impl From<serde_json::Error> for PlanError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Staged construction plan as produced by a planning model. Field
/// aliases absorb the camelCase the models tend to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    #[serde(default, alias = "projectName")]
    pub project_name: String,
    #[serde(default)]
    pub stages: Vec<PlanStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStage {
    #[serde(default, alias = "stageName")]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<PlanTask>,
}

/// Task as it appears in a plan: referenced by name, with a free-text
/// duration. The duration is kept as raw JSON since replies mix bare
/// numbers, strings like "3 days" and nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTask {
    pub name: String,
    #[serde(default, alias = "durationDays", alias = "duration_days")]
    pub duration: Value,
    #[serde(default, alias = "dependsOn", alias = "dependencies")]
    pub depends_on: Vec<String>,
}

/// How aggressively to repair an incomplete plan. The default is
/// strict: nothing is invented and unusable durations are errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsPolicy {
    /// Replacement for unusable durations; `None` makes them an error.
    pub fallback_duration_days: Option<f64>,
    /// Treat numeric zeros as absent when merging defaults.
    pub fill_zero_numbers: bool,
    /// Treat blank strings as absent when merging defaults.
    pub fill_empty_strings: bool,
}

impl Default for DefaultsPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

impl DefaultsPolicy {
    pub fn strict() -> Self {
        Self {
            fallback_duration_days: None,
            fill_zero_numbers: false,
            fill_empty_strings: false,
        }
    }

    pub fn lenient() -> Self {
        Self {
            fallback_duration_days: Some(3.0),
            fill_zero_numbers: true,
            fill_empty_strings: true,
        }
    }
}

/// Pull the JSON object out of a model reply. Prefers a fenced
/// ``` block when one is properly closed, otherwise falls back to the
/// outermost brace pair. Returns `None` when neither is present.
pub fn extract_json_payload(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();

    if let Some(open) = trimmed.find("```") {
        let mut body = &trimmed[open + 3..];
        for tag in ["json", "JSON"] {
            if let Some(rest) = body.strip_prefix(tag) {
                body = rest;
                break;
            }
        }
        if let Some(close) = body.find("```") {
            let inner = body[..close].trim();
            if inner.starts_with('{') {
                return Some(inner);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        return None;
    }
    Some(trimmed[start..=end].trim())
}

/// Parse a model reply into a plan without any repair.
pub fn parse_model_reply(raw: &str) -> Result<ProjectPlan, PlanError> {
    let payload = extract_json_payload(raw).ok_or(PlanError::EmptyReply)?;
    let plan = serde_json::from_str(payload)?;
    Ok(plan)
}

/// Parse a model reply, filling holes from a defaults template before
/// reading it as a plan.
pub fn parse_model_reply_with_defaults(
    raw: &str,
    defaults: &Value,
    policy: &DefaultsPolicy,
) -> Result<ProjectPlan, PlanError> {
    let payload = extract_json_payload(raw).ok_or(PlanError::EmptyReply)?;
    let mut value: Value = serde_json::from_str(payload)?;
    merge_defaults(&mut value, defaults, policy);
    let plan = serde_json::from_value(value)?;
    Ok(plan)
}

/// Recursively fill holes in `value` from `defaults`. Nulls and missing
/// object keys always come from the template; zeros, blank strings and
/// empty arrays only when the policy says to treat them as absent. For
/// arrays the first template element serves as the per-item template.
pub fn merge_defaults(value: &mut Value, defaults: &Value, policy: &DefaultsPolicy) {
    if defaults.is_null() {
        return;
    }

    let replace = match &*value {
        Value::Null => true,
        Value::Number(number) => policy.fill_zero_numbers && number.as_f64() == Some(0.0),
        Value::String(text) => policy.fill_empty_strings && text.trim().is_empty(),
        Value::Array(items) => items.is_empty() && defaults.is_array(),
        _ => false,
    };
    if replace {
        *value = defaults.clone();
        return;
    }

    match (value, defaults) {
        (Value::Object(map), Value::Object(default_map)) => {
            for (key, default_value) in default_map {
                match map.get_mut(key) {
                    Some(child) => merge_defaults(child, default_value, policy),
                    None => {
                        map.insert(key.clone(), default_value.clone());
                    }
                }
            }
        }
        (Value::Array(items), Value::Array(default_items)) => {
            if let Some(template) = default_items.first() {
                for item in items {
                    merge_defaults(item, template, policy);
                }
            }
        }
        _ => {}
    }
}

/// Read a duration out of free text: a bare number, or a number with a
/// day/week suffix. Anything else, including non-positive values,
/// returns `None`.
pub fn parse_duration_days(text: &str) -> Option<f64> {
    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let (number_part, multiplier) = if let Some(stripped) = normalized.strip_suffix("weeks") {
        (stripped, 7.0)
    } else if let Some(stripped) = normalized.strip_suffix("week") {
        (stripped, 7.0)
    } else if let Some(stripped) = normalized.strip_suffix("days") {
        (stripped, 1.0)
    } else if let Some(stripped) = normalized.strip_suffix("day") {
        (stripped, 1.0)
    } else {
        (normalized.as_str(), 1.0)
    };

    let value: f64 = number_part.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(value * multiplier)
}

/// Flatten a staged plan into schedulable tasks.
///
/// Tasks get ids t1, t2, ... in declaration order across stages, and
/// name references in `depends_on` are rewritten to those ids. Names
/// may reference tasks declared later in the plan.
pub fn flatten_plan(plan: &ProjectPlan, policy: &DefaultsPolicy) -> Result<Vec<Task>, PlanError> {
    // First pass assigns ids so dependencies can point forward.
    let mut id_by_name: HashMap<&str, String> = HashMap::new();
    let mut counter = 0usize;
    for stage in &plan.stages {
        for plan_task in &stage.tasks {
            counter += 1;
            if id_by_name
                .insert(plan_task.name.as_str(), format!("t{counter}"))
                .is_some()
            {
                return Err(PlanError::DuplicateTaskName {
                    name: plan_task.name.clone(),
                });
            }
        }
    }

    let mut tasks = Vec::with_capacity(counter);
    let mut counter = 0usize;
    for stage in &plan.stages {
        for plan_task in &stage.tasks {
            counter += 1;
            let duration_days = settle_duration(plan_task, policy)?;

            let mut dependencies = Vec::with_capacity(plan_task.depends_on.len());
            for reference in &plan_task.depends_on {
                let id = id_by_name.get(reference.as_str()).ok_or_else(|| {
                    PlanError::UnknownTaskReference {
                        task: plan_task.name.clone(),
                        reference: reference.clone(),
                    }
                })?;
                dependencies.push(id.clone());
            }

            let mut task = Task::new(format!("t{counter}"), plan_task.name.clone(), duration_days);
            task.stage = stage.name.clone();
            task.dependencies = dependencies;
            tasks.push(task);
        }
    }

    Ok(tasks)
}

fn settle_duration(plan_task: &PlanTask, policy: &DefaultsPolicy) -> Result<f64, PlanError> {
    let parsed = match &plan_task.duration {
        Value::Number(number) => number
            .as_f64()
            .filter(|value| value.is_finite() && *value > 0.0),
        Value::String(text) => parse_duration_days(text),
        _ => None,
    };

    match parsed {
        Some(days) => Ok(days),
        None => policy
            .fallback_duration_days
            .ok_or_else(|| PlanError::MalformedDuration {
                task: plan_task.name.clone(),
                value: duration_display(&plan_task.duration),
            }),
    }
}

fn duration_display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
