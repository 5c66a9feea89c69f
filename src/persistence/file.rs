use super::{PersistenceError, PersistenceResult};
use crate::calendar::{ProjectCalendar, ProjectCalendarConfig};
use crate::metadata::ProjectMetadata;
use crate::project::Project;
use crate::schedule::Schedule;
use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// On-disk form of a project. The calendar is optional so files written
/// before a calendar was configured still load, falling back to the
/// every-day default.
#[derive(Serialize, Deserialize)]
struct ProjectSnapshot {
    metadata: ProjectMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calendar: Option<ProjectCalendarConfig>,
    tasks: Vec<Task>,
}

impl ProjectSnapshot {
    fn from_project(project: &Project) -> Self {
        Self {
            metadata: project.metadata().clone(),
            calendar: Some(project.calendar().to_config()),
            tasks: project.tasks().to_vec(),
        }
    }

    fn into_project(self) -> PersistenceResult<Project> {
        let calendar = self
            .calendar
            .map(|config| ProjectCalendar::from_config(&config))
            .unwrap_or_default();
        Project::from_parts(self.metadata, calendar, self.tasks)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))
    }
}

/// Write a project to pretty-printed JSON.
pub fn save_project_to_json<P: AsRef<Path>>(project: &Project, path: P) -> PersistenceResult<()> {
    super::validate_tasks(project.tasks())?;
    let snapshot = ProjectSnapshot::from_project(project);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

/// Read a project back, validating the task list before accepting it.
pub fn load_project_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(file)?;
    snapshot.into_project()
}

/// Write a computed schedule to pretty-printed JSON.
pub fn save_schedule_to_json<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let schedule = serde_json::from_reader(file)?;
    Ok(schedule)
}
