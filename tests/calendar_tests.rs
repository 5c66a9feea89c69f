use buildplan::calendar::{ProjectCalendar, ProjectCalendarConfig};
use buildplan::schedule::{calculate_task_schedule, compute_schedule};
use buildplan::task::Task;
use chrono::{NaiveDate, Weekday};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn task(id: &str, duration_days: f64, dependencies: &[&str]) -> Task {
    let mut task = Task::new(id, id, duration_days);
    task.dependencies = dependencies.iter().map(|s| s.to_string()).collect();
    task
}

#[test]
fn default_calendar_counts_every_day() {
    let calendar = ProjectCalendar::default();

    // 2025-01-04 is a Saturday, 2025-01-05 a Sunday.
    assert!(calendar.is_workday(d(2025, 1, 4)));
    assert!(calendar.is_workday(d(2025, 1, 5)));
    assert_eq!(calendar.add_workdays(d(2025, 1, 1), 10), d(2025, 1, 11));
    assert_eq!(calendar.count_workdays(d(2025, 1, 1), d(2025, 1, 10)), 10);
}

#[test]
fn offsets_map_to_dates_counting_every_day() {
    let tasks = vec![
        task("a", 3.0, &[]),
        task("b", 2.0, &["a"]),
        task("c", 4.0, &["b"]),
    ];
    let entries = calculate_task_schedule(&tasks, d(2024, 1, 1)).unwrap();

    let a = entries.iter().find(|e| e.task_id == "a").unwrap();
    assert_eq!(a.start_date, Some(d(2024, 1, 1)));
    assert_eq!(a.end_date, Some(d(2024, 1, 4)));

    // Offset 5 lands on Jan 6, offset 9 on Jan 10, weekends included.
    let c = entries.iter().find(|e| e.task_id == "c").unwrap();
    assert_eq!(c.start_date, Some(d(2024, 1, 6)));
    assert_eq!(c.end_date, Some(d(2024, 1, 10)));
}

#[test]
fn workweek_skips_weekends() {
    let calendar = ProjectCalendar::standard_workweek();

    assert!(calendar.is_workday(d(2025, 1, 6)));
    assert!(!calendar.is_workday(d(2025, 1, 4)));
    assert_eq!(calendar.next_workday(d(2025, 1, 10)), d(2025, 1, 13));
    assert_eq!(calendar.workday_on_or_after(d(2025, 1, 4)), d(2025, 1, 6));
    assert_eq!(calendar.add_workdays(d(2025, 1, 6), 5), d(2025, 1, 13));
    assert_eq!(calendar.count_workdays(d(2025, 1, 6), d(2025, 1, 12)), 5);
}

#[test]
fn holidays_push_dates_out() {
    let mut calendar = ProjectCalendar::standard_workweek();
    calendar.add_holiday(d(2025, 1, 8));

    assert!(!calendar.is_workday(d(2025, 1, 8)));
    assert_eq!(calendar.add_workdays(d(2025, 1, 6), 2), d(2025, 1, 9));
}

#[test]
fn anchored_schedule_respects_the_workweek() {
    let tasks = vec![task("a", 4.0, &[]), task("b", 1.0, &["a"])];
    let schedule = compute_schedule(&tasks)
        .unwrap()
        .with_start_date(d(2025, 1, 6), &ProjectCalendar::standard_workweek());

    let a = schedule.entry("a").unwrap();
    assert_eq!(a.start_date, Some(d(2025, 1, 6)));
    assert_eq!(a.end_date, Some(d(2025, 1, 10)));

    // b's fifth working day falls past the weekend.
    let b = schedule.entry("b").unwrap();
    assert_eq!(b.start_date, Some(d(2025, 1, 10)));
    assert_eq!(b.end_date, Some(d(2025, 1, 13)));

    assert_eq!(schedule.start_date, Some(d(2025, 1, 6)));
    assert_eq!(schedule.end_date, Some(d(2025, 1, 13)));
}

#[test]
fn anchor_snaps_forward_to_a_working_day() {
    let tasks = vec![task("a", 2.0, &[])];
    let schedule = compute_schedule(&tasks)
        .unwrap()
        .with_start_date(d(2025, 1, 4), &ProjectCalendar::standard_workweek());

    assert_eq!(schedule.start_date, Some(d(2025, 1, 6)));
    let a = schedule.entry("a").unwrap();
    assert_eq!(a.start_date, Some(d(2025, 1, 6)));
    assert_eq!(a.end_date, Some(d(2025, 1, 8)));
}

#[test]
fn fractional_offsets_round_to_whole_days() {
    let tasks = vec![task("a", 2.5, &[])];
    let entries = calculate_task_schedule(&tasks, d(2024, 3, 1)).unwrap();

    let a = entries.iter().find(|e| e.task_id == "a").unwrap();
    assert_eq!(a.start_date, Some(d(2024, 3, 1)));
    // 2.5 days of work still occupies three calendar days.
    assert_eq!(a.end_date, Some(d(2024, 3, 4)));
}

#[test]
fn config_round_trips_through_serde_shape() {
    let calendar = ProjectCalendar::custom(
        [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu],
        [d(2025, 7, 4)],
    );
    let config = calendar.to_config();
    let restored = ProjectCalendar::from_config(&config);

    assert_eq!(calendar, restored);
    assert!(!restored.is_workday(d(2025, 7, 4)));
    assert!(!restored.is_workday(d(2025, 1, 3)));
}

#[test]
fn config_sorts_and_dedups_working_days() {
    let config = ProjectCalendarConfig::new(
        [Weekday::Fri, Weekday::Mon, Weekday::Mon],
        [d(2025, 12, 25), d(2025, 12, 25)],
    );

    assert_eq!(config.working_days, vec![Weekday::Mon, Weekday::Fri]);
    assert_eq!(config.holidays, vec![d(2025, 12, 25)]);
}

#[test]
fn empty_working_day_list_means_no_restriction() {
    let config = ProjectCalendarConfig::new([], []);
    let calendar = ProjectCalendar::from_config(&config);

    assert!(calendar.is_workday(d(2025, 1, 4)));
    assert_eq!(calendar.add_workdays(d(2025, 1, 1), 3), d(2025, 1, 4));
}
