use crate::schedule::ScheduleError;
use crate::task::Task;
use std::collections::HashSet;

/// Validate a single task: the duration must be a finite, positive
/// number of days.
pub(crate) fn validate_task(task: &Task) -> Result<(), ScheduleError> {
    if !task.duration_days.is_finite() || task.duration_days <= 0.0 {
        return Err(ScheduleError::InvalidDuration {
            task_id: task.id.clone(),
            duration_days: task.duration_days,
        });
    }
    Ok(())
}

/// Validate a collection of tasks: every task must pass `validate_task`
/// and ids must be unique.
pub(crate) fn validate_task_collection(tasks: &[Task]) -> Result<(), ScheduleError> {
    let mut seen_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_ids.insert(task.id.as_str()) {
            return Err(ScheduleError::DuplicateTaskId {
                task_id: task.id.clone(),
            });
        }
        validate_task(task)?;
    }
    Ok(())
}
