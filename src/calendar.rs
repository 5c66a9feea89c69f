use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Working-day calendar used when anchoring day offsets to real dates.
///
/// The default calendar has no exclusions at all: every calendar day,
/// weekends included, counts as a working day. Weekend-aware or
/// holiday-aware behavior is opt-in via `standard_workweek`, `custom`
/// or the mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCalendar {
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

impl Default for ProjectCalendar {
    fn default() -> Self {
        Self::every_day()
    }
}

impl ProjectCalendar {
    /// Calendar with no exclusions: every day is a working day.
    pub fn every_day() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::new(),
        }
    }

    /// Monday through Friday working, weekends off.
    pub fn standard_workweek() -> Self {
        Self {
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    /// Calendar from explicit working weekdays and holiday dates.
    pub fn custom<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        Self::from_config(&ProjectCalendarConfig::new(working_days, holidays))
    }

    /// Build a calendar from its serialized config. An empty working-day
    /// list means no weekday restriction.
    pub fn from_config(config: &ProjectCalendarConfig) -> Self {
        let mut calendar = Self::every_day();
        calendar.set_working_days(config.working_days.clone());
        calendar.holidays = config.holidays.iter().copied().collect();
        calendar
    }

    pub fn to_config(&self) -> ProjectCalendarConfig {
        ProjectCalendarConfig::from(self)
    }

    /// Mark a single date as non-working.
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates.iter().copied());
    }

    /// Restrict working days to the given weekdays. An empty list
    /// clears the restriction instead of excluding every weekday.
    pub fn set_working_days(&mut self, days: Vec<Weekday>) {
        self.non_working_days.clear();
        if days.is_empty() {
            return;
        }
        for weekday in ALL_WEEKDAYS {
            if !days.contains(&weekday) {
                self.non_working_days.insert(weekday);
            }
        }
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday()) && !self.holidays.contains(&date)
    }

    fn has_exclusions(&self) -> bool {
        !self.holidays.is_empty() || !self.non_working_days.is_empty()
    }

    /// The given date if it is a working day, otherwise the next one
    /// that is.
    pub fn workday_on_or_after(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_workday(current) {
            current = current + Duration::days(1);
        }
        current
    }

    /// First working day strictly after `from`.
    pub fn next_workday(&self, from: NaiveDate) -> NaiveDate {
        let mut current = from + Duration::days(1);
        while !self.is_workday(current) {
            current = current + Duration::days(1);
        }
        current
    }

    /// Date reached by advancing `days` working days from `from`.
    /// Zero days returns `from` unchanged.
    pub fn add_workdays(&self, from: NaiveDate, days: i64) -> NaiveDate {
        if !self.has_exclusions() {
            return from + Duration::days(days.max(0));
        }
        let mut current = from;
        let mut stepped = 0;
        while stepped < days {
            current = current + Duration::days(1);
            if self.is_workday(current) {
                stepped += 1;
            }
        }
        current
    }

    /// Number of working days in `[start, end]`, inclusive on both ends.
    pub fn count_workdays(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if start > end {
            return 0;
        }
        if !self.has_exclusions() {
            return (end - start).num_days() + 1;
        }
        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_workday(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }
}

/// Serializable form of a calendar: the weekdays that count as working
/// days plus explicit holiday dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCalendarConfig {
    #[serde(default)]
    pub working_days: Vec<Weekday>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
}

impl ProjectCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut working_days: Vec<Weekday> = working_days.into_iter().collect();
        working_days.sort_by_key(|day| day.num_days_from_monday());
        working_days.dedup();

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days,
            holidays,
        }
    }
}

impl From<&ProjectCalendar> for ProjectCalendarConfig {
    fn from(calendar: &ProjectCalendar) -> Self {
        let working_days = ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day));
        Self::new(working_days, calendar.holidays.iter().copied())
    }
}
