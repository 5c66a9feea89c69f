use buildplan::metadata::ProjectMetadata;
use buildplan::plan::{DefaultsPolicy, parse_model_reply};
use buildplan::project::Project;
use buildplan::schedule::{DanglingDependencyPolicy, ScheduleError, ScheduleOptions};
use buildplan::task::Task;
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn task(id: &str, duration_days: f64, dependencies: &[&str]) -> Task {
    let mut task = Task::new(id, id, duration_days);
    task.dependencies = dependencies.iter().map(|s| s.to_string()).collect();
    task
}

#[test]
fn upsert_inserts_then_replaces() {
    let mut project = Project::new();
    project.upsert_task(task("a", 2.0, &[])).unwrap();
    project.upsert_task(task("b", 3.0, &["a"])).unwrap();
    assert_eq!(project.tasks().len(), 2);

    let mut replacement = task("a", 4.0, &[]);
    replacement.name = "Regrade".to_string();
    project.upsert_task(replacement).unwrap();

    assert_eq!(project.tasks().len(), 2);
    let a = project.find_task("a").unwrap();
    assert_eq!(a.duration_days, 4.0);
    assert_eq!(a.name, "Regrade");
}

#[test]
fn upsert_rejects_non_positive_durations() {
    let mut project = Project::new();
    let err = project.upsert_task(task("a", 0.0, &[])).unwrap_err();

    assert!(matches!(err, ScheduleError::InvalidDuration { .. }));
    assert!(project.tasks().is_empty());
}

#[test]
fn remove_strips_references_from_other_tasks() {
    let mut project = Project::new();
    project.upsert_task(task("a", 2.0, &[])).unwrap();
    project.upsert_task(task("b", 3.0, &["a"])).unwrap();
    project.upsert_task(task("c", 1.0, &["a", "b"])).unwrap();

    assert!(project.remove_task("a"));
    assert!(!project.remove_task("a"));

    assert!(project.find_task("b").unwrap().dependencies.is_empty());
    assert_eq!(project.find_task("c").unwrap().dependencies, vec!["b"]);
    // With the reference gone the schedule computes cleanly.
    project.schedule().unwrap();
}

#[test]
fn schedule_anchors_at_the_metadata_start_date() {
    let mut project = Project::new();
    project.set_start_date(d(2024, 1, 1));
    project.upsert_task(task("a", 3.0, &[])).unwrap();
    project.upsert_task(task("b", 2.0, &["a"])).unwrap();
    project.upsert_task(task("c", 4.0, &["b"])).unwrap();

    let schedule = project.schedule().unwrap();

    assert_eq!(schedule.start_date, Some(d(2024, 1, 1)));
    assert_eq!(schedule.end_date, Some(d(2024, 1, 10)));
    let c = schedule.entry("c").unwrap();
    assert_eq!(c.start_date, Some(d(2024, 1, 6)));
    assert_eq!(c.end_date, Some(d(2024, 1, 10)));
}

#[test]
fn from_plan_carries_name_stage_and_tasks() {
    let raw = r#"{
        "projectName": "Garden Office",
        "stages": [
            {"name": "Base", "tasks": [
                {"name": "Slab", "duration": "2 days"},
                {"name": "Cure", "duration": "5 days", "dependsOn": ["Slab"]}
            ]}
        ]
    }"#;
    let plan = parse_model_reply(raw).unwrap();
    let project = Project::from_plan(&plan, &DefaultsPolicy::strict()).unwrap();

    assert_eq!(project.metadata().project_name, "Garden Office");
    assert_eq!(project.tasks().len(), 2);
    assert_eq!(project.tasks()[1].dependencies, vec!["t1"]);

    let schedule = project.schedule().unwrap();
    assert_eq!(schedule.project_duration_days, 7.0);
}

#[test]
fn schedule_with_can_ignore_dangling_references() {
    let mut project = Project::new();
    project.upsert_task(task("a", 2.0, &[])).unwrap();
    project.upsert_task(task("b", 3.0, &["ghost"])).unwrap();

    let err = project.schedule().unwrap_err();
    assert!(matches!(err, ScheduleError::UnknownDependency { .. }));

    let options = ScheduleOptions {
        dangling_dependencies: DanglingDependencyPolicy::Ignore,
    };
    let schedule = project.schedule_with(&options).unwrap();
    assert_eq!(schedule.project_duration_days, 3.0);
}

#[test]
fn from_parts_validates_the_task_list() {
    let err = Project::from_parts(
        ProjectMetadata::default(),
        Default::default(),
        vec![task("a", 2.0, &[]), task("a", 3.0, &[])],
    )
    .unwrap_err();

    assert!(matches!(err, ScheduleError::DuplicateTaskId { .. }));
}
