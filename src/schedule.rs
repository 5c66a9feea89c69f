use crate::calculations::backward_pass::BackwardPass;
use crate::calculations::forward_pass::ForwardPass;
use crate::calendar::ProjectCalendar;
use crate::graph::task_dag::TaskDag;
use crate::task::Task;
use crate::task_validation;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack within this distance of zero counts as exactly zero.
const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    InvalidDuration { task_id: String, duration_days: f64 },
    DuplicateTaskId { task_id: String },
    UnknownDependency { task_id: String, dependency: String },
    CycleDetected { task_id: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::InvalidDuration {
                task_id,
                duration_days,
            } => write!(
                f,
                "task {task_id} has invalid duration {duration_days} (must be a positive number of days)"
            ),
            ScheduleError::DuplicateTaskId { task_id } => {
                write!(f, "duplicate task id {task_id}")
            }
            ScheduleError::UnknownDependency {
                task_id,
                dependency,
            } => write!(f, "task {task_id} depends on unknown task {dependency}"),
            ScheduleError::CycleDetected { task_id } => {
                write!(f, "dependency cycle detected involving task {task_id}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// What to do with a dependency that names no task in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingDependencyPolicy {
    /// Reject the task list with `ScheduleError::UnknownDependency`.
    #[default]
    Error,
    /// Treat the reference as no constraint at all.
    Ignore,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    pub dangling_dependencies: DanglingDependencyPolicy,
}

/// Computed timing for one task. Offsets are working days from project
/// start; dates are only filled in once the schedule is anchored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_id: String,
    pub earliest_start: f64,
    pub earliest_finish: f64,
    pub latest_start: f64,
    pub latest_finish: f64,
    pub slack: f64,
    pub is_critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Result of a critical path computation. Entries keep the input task
/// order; the critical path is ordered by earliest start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub project_duration_days: f64,
    pub critical_path: Vec<String>,
    pub entries: Vec<ScheduleEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Compute a schedule with default options: dangling dependencies are
/// an error.
pub fn compute_schedule(tasks: &[Task]) -> Result<Schedule, ScheduleError> {
    compute_schedule_with(tasks, &ScheduleOptions::default())
}

/// Compute earliest/latest offsets, slack and the critical path for a
/// task list. The input is not modified; every call builds a fresh
/// schedule.
pub fn compute_schedule_with(
    tasks: &[Task],
    options: &ScheduleOptions,
) -> Result<Schedule, ScheduleError> {
    task_validation::validate_task_collection(tasks)?;

    let dag = TaskDag::build(tasks, options)?;
    let order = dag.topo_order(tasks)?;

    let early = ForwardPass::new(tasks, &dag).execute(&order);
    let project_duration_days = early.iter().map(|&(_, finish)| finish).fold(0.0, f64::max);
    let late = BackwardPass::new(tasks, &dag).execute(&order, project_duration_days);

    let mut entries = Vec::with_capacity(tasks.len());
    let mut critical: Vec<(f64, usize)> = Vec::new();
    for (position, task) in tasks.iter().enumerate() {
        let (earliest_start, earliest_finish) = early[position];
        let (latest_start, latest_finish) = late[position];
        let mut slack = latest_start - earliest_start;
        if slack.abs() <= EPSILON {
            slack = 0.0;
        }
        let is_critical = slack == 0.0;
        if is_critical {
            critical.push((earliest_start, position));
        }
        entries.push(ScheduleEntry {
            task_id: task.id.clone(),
            earliest_start,
            earliest_finish,
            latest_start,
            latest_finish,
            slack,
            is_critical,
            start_date: None,
            end_date: None,
        });
    }

    critical.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let critical_path = critical
        .into_iter()
        .map(|(_, position)| tasks[position].id.clone())
        .collect();

    Ok(Schedule {
        project_duration_days,
        critical_path,
        entries,
        start_date: None,
        end_date: None,
    })
}

/// Compute a schedule anchored at `start_date` with every calendar day
/// counting as a working day, and return the dated entries.
pub fn calculate_task_schedule(
    tasks: &[Task],
    start_date: NaiveDate,
) -> Result<Vec<ScheduleEntry>, ScheduleError> {
    let schedule = compute_schedule(tasks)?.with_start_date(start_date, &ProjectCalendar::every_day());
    Ok(schedule.entries)
}

impl Schedule {
    pub fn entry(&self, task_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|entry| entry.task_id == task_id)
    }

    pub fn is_critical(&self, task_id: &str) -> bool {
        self.critical_path.iter().any(|id| id == task_id)
    }

    /// Anchor the schedule at a real date. The anchor snaps forward to
    /// the first working day; entry start dates advance by
    /// `floor(earliest_start)` working days and end dates by
    /// `ceil(earliest_finish)`.
    pub fn with_start_date(mut self, start_date: NaiveDate, calendar: &ProjectCalendar) -> Schedule {
        let anchor = calendar.workday_on_or_after(start_date);
        for entry in &mut self.entries {
            entry.start_date =
                Some(calendar.add_workdays(anchor, entry.earliest_start.floor() as i64));
            entry.end_date =
                Some(calendar.add_workdays(anchor, entry.earliest_finish.ceil() as i64));
        }
        self.start_date = Some(anchor);
        self.end_date = Some(calendar.add_workdays(anchor, self.project_duration_days.ceil() as i64));
        self
    }

    /// One-line summary for CLI output, e.g.
    /// `tasks=3, critical=2, duration=6, crit_path=t1->t3`.
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.entries.len()));
        parts.push(format!("critical={}", self.critical_path.len()));
        parts.push(format!("duration={}", self.project_duration_days));
        if let Some(date) = self.end_date {
            parts.push(format!("finish={date}"));
        }
        if !self.critical_path.is_empty() {
            parts.push(format!("crit_path={}", self.critical_path.join("->")));
        }
        parts.join(", ")
    }

    /// Tabular view of the schedule, one row per entry in input order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let task_ids: Vec<&str> = self.entries.iter().map(|e| e.task_id.as_str()).collect();
        let earliest_start: Vec<f64> = self.entries.iter().map(|e| e.earliest_start).collect();
        let earliest_finish: Vec<f64> = self.entries.iter().map(|e| e.earliest_finish).collect();
        let latest_start: Vec<f64> = self.entries.iter().map(|e| e.latest_start).collect();
        let latest_finish: Vec<f64> = self.entries.iter().map(|e| e.latest_finish).collect();
        let slack: Vec<f64> = self.entries.iter().map(|e| e.slack).collect();
        let is_critical: Vec<bool> = self.entries.iter().map(|e| e.is_critical).collect();
        let start_dates: Vec<Option<i32>> = self
            .entries
            .iter()
            .map(|e| e.start_date.map(date_to_i32))
            .collect();
        let end_dates: Vec<Option<i32>> = self
            .entries
            .iter()
            .map(|e| e.end_date.map(date_to_i32))
            .collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("task_id"), task_ids).into_column(),
            Series::new(PlSmallStr::from_static("earliest_start"), earliest_start).into_column(),
            Series::new(PlSmallStr::from_static("earliest_finish"), earliest_finish).into_column(),
            Series::new(PlSmallStr::from_static("latest_start"), latest_start).into_column(),
            Series::new(PlSmallStr::from_static("latest_finish"), latest_finish).into_column(),
            Series::new(PlSmallStr::from_static("slack"), slack).into_column(),
            Series::new(PlSmallStr::from_static("is_critical"), is_critical).into_column(),
            Series::new(PlSmallStr::from_static("start_date"), start_dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("end_date"), end_dates)
                .cast(&DataType::Date)?
                .into_column(),
        ];

        DataFrame::new(columns)
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, duration_days: f64, dependencies: &[&str]) -> Task {
        let mut task = Task::new(id, id, duration_days);
        task.dependencies = dependencies.iter().map(|s| s.to_string()).collect();
        task
    }

    #[test]
    fn dataframe_contains_expected_columns() {
        let tasks = vec![task("a", 2.0, &[]), task("b", 3.0, &["a"])];
        let schedule = compute_schedule(&tasks).unwrap();
        let df = schedule.to_dataframe().unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        for expected in [
            "task_id",
            "earliest_start",
            "earliest_finish",
            "latest_start",
            "latest_finish",
            "slack",
            "is_critical",
            "start_date",
            "end_date",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn cli_summary_lists_critical_chain() {
        let tasks = vec![
            task("t1", 5.0, &[]),
            task("t2", 2.0, &[]),
            task("t3", 1.0, &["t1", "t2"]),
        ];
        let schedule = compute_schedule(&tasks).unwrap();
        let summary = schedule.to_cli_summary();

        assert!(summary.starts_with("tasks=3, critical=2, duration=6"));
        assert!(summary.ends_with("crit_path=t1->t3"));
    }

    #[test]
    fn slack_snaps_to_zero_within_epsilon() {
        let tasks = vec![
            task("a", 0.1, &[]),
            task("b", 0.2, &["a"]),
            task("c", 0.3, &[]),
            task("d", 0.4, &["b", "c"]),
        ];
        let schedule = compute_schedule(&tasks).unwrap();

        // 0.1 + 0.2 == 0.3 only within float tolerance; both branches
        // must still count as critical.
        for id in ["a", "b", "c", "d"] {
            let entry = schedule.entry(id).unwrap();
            assert_eq!(entry.slack, 0.0, "task {id}");
            assert!(entry.is_critical, "task {id}");
        }
    }
}
