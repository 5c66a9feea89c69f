pub mod calculations;
pub mod calendar;
pub mod gantt;
pub mod graph;
pub mod metadata;
pub mod persistence;
pub mod plan;
pub mod project;
pub mod schedule;
pub mod task;
pub(crate) mod task_validation;

pub use calendar::{ProjectCalendar, ProjectCalendarConfig};
pub use gantt::{GanttRow, generate_gantt_data};
pub use metadata::ProjectMetadata;
pub use persistence::{
    PersistenceError, PersistenceResult, load_project_from_json, load_schedule_from_json,
    save_project_to_json, save_schedule_to_json, validate_tasks,
};
pub use plan::{
    DefaultsPolicy, PlanError, PlanStage, PlanTask, ProjectPlan, extract_json_payload,
    flatten_plan, merge_defaults, parse_duration_days, parse_model_reply,
    parse_model_reply_with_defaults,
};
pub use project::Project;
pub use schedule::{
    DanglingDependencyPolicy, Schedule, ScheduleEntry, ScheduleError, ScheduleOptions,
    calculate_task_schedule, compute_schedule, compute_schedule_with,
};
pub use task::Task;
