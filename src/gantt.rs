use crate::schedule::Schedule;
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bar of a Gantt chart: task identity plus the schedule window it
/// occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttRow {
    pub id: String,
    pub name: String,
    pub stage: String,
    pub start_day: f64,
    pub end_day: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub dependencies: Vec<String>,
    pub is_critical: bool,
}

/// Pair schedule entries with their tasks into chart rows, one per
/// entry in entry order. Entries without a matching task are skipped.
pub fn generate_gantt_data(tasks: &[Task], schedule: &Schedule) -> Vec<GanttRow> {
    let task_by_id: HashMap<&str, &Task> =
        tasks.iter().map(|task| (task.id.as_str(), task)).collect();

    schedule
        .entries
        .iter()
        .filter_map(|entry| {
            let task = task_by_id.get(entry.task_id.as_str())?;
            Some(GanttRow {
                id: entry.task_id.clone(),
                name: task.name.clone(),
                stage: task.stage.clone(),
                start_day: entry.earliest_start,
                end_day: entry.earliest_finish,
                start_date: entry.start_date,
                end_date: entry.end_date,
                dependencies: task.dependencies.clone(),
                is_critical: entry.is_critical,
            })
        })
        .collect()
}
