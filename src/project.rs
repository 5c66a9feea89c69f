use crate::calendar::ProjectCalendar;
use crate::metadata::ProjectMetadata;
use crate::plan::{DefaultsPolicy, PlanError, ProjectPlan, flatten_plan};
use crate::schedule::{Schedule, ScheduleError, ScheduleOptions, compute_schedule_with};
use crate::task::Task;
use crate::task_validation;
use chrono::NaiveDate;

/// In-memory project: metadata, calendar and the task list. Scheduling
/// never mutates the project; it derives a fresh `Schedule` on demand.
#[derive(Debug, Clone)]
pub struct Project {
    metadata: ProjectMetadata,
    calendar: ProjectCalendar,
    tasks: Vec<Task>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self {
            metadata: ProjectMetadata::default(),
            calendar: ProjectCalendar::default(),
            tasks: Vec::new(),
        }
    }

    pub fn with_metadata(metadata: ProjectMetadata) -> Self {
        Self {
            metadata,
            calendar: ProjectCalendar::default(),
            tasks: Vec::new(),
        }
    }

    /// Assemble a project from already-validated parts, re-checking the
    /// task list on the way in.
    pub fn from_parts(
        metadata: ProjectMetadata,
        calendar: ProjectCalendar,
        tasks: Vec<Task>,
    ) -> Result<Self, ScheduleError> {
        task_validation::validate_task_collection(&tasks)?;
        Ok(Self {
            metadata,
            calendar,
            tasks,
        })
    }

    /// Build a project from a staged plan. The plan's project name wins
    /// over the default when present.
    pub fn from_plan(plan: &ProjectPlan, policy: &DefaultsPolicy) -> Result<Self, PlanError> {
        let tasks = flatten_plan(plan, policy)?;
        let mut metadata = ProjectMetadata::default();
        if !plan.project_name.trim().is_empty() {
            metadata.project_name = plan.project_name.clone();
        }
        Ok(Self {
            metadata,
            calendar: ProjectCalendar::default(),
            tasks,
        })
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: ProjectMetadata) {
        self.metadata = metadata;
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) {
        self.metadata.project_name = name.into();
    }

    pub fn set_project_description(&mut self, description: impl Into<String>) {
        self.metadata.project_description = description.into();
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.metadata.start_date = date;
    }

    pub fn calendar(&self) -> &ProjectCalendar {
        &self.calendar
    }

    pub fn set_calendar(&mut self, calendar: ProjectCalendar) {
        self.calendar = calendar;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Insert a task, or replace the existing one with the same id.
    pub fn upsert_task(&mut self, task: Task) -> Result<(), ScheduleError> {
        task_validation::validate_task(&task)?;
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        Ok(())
    }

    /// Remove a task and strip it from other tasks' dependencies.
    /// Returns false when no task had the id.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        if self.tasks.len() == before {
            return false;
        }
        for task in &mut self.tasks {
            task.dependencies.retain(|dependency| dependency != task_id);
        }
        true
    }

    /// Schedule the project anchored at its metadata start date, using
    /// the project calendar.
    pub fn schedule(&self) -> Result<Schedule, ScheduleError> {
        self.schedule_with(&ScheduleOptions::default())
    }

    pub fn schedule_with(&self, options: &ScheduleOptions) -> Result<Schedule, ScheduleError> {
        Ok(compute_schedule_with(&self.tasks, options)?
            .with_start_date(self.metadata.start_date, &self.calendar))
    }
}
