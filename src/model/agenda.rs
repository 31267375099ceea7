// Day views built on top of the recurrence engine.
//
// `events_on` answers "what is on this day", `upcoming_events` drops what has
// already finished, `task_list` is the filtered, ordered reminders list
// around a selected day, and `search` finds records by text.

use crate::model::item::{Event, Priority, Task};
use crate::model::recurrence::RecurrenceEngine;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString};

/// Default distance, in days, a task may sit from the selected day.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Important,
    LowPriority,
    Completed,
}

impl TaskFilter {
    fn accepts(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Important => task.priority == Priority::High,
            TaskFilter::LowPriority => task.priority == Priority::Low,
            TaskFilter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    pub completed: usize,
    pub unfinished: usize,
}

/// Events occurring on `day`, earliest start first.
pub fn events_on(events: &[Event], day: NaiveDate) -> Vec<&Event> {
    let mut out: Vec<&Event> = events
        .iter()
        .filter(|e| RecurrenceEngine::occurs_on(*e, day))
        .collect();
    out.sort_by_key(|e| e.start_time);
    out
}

/// Today's events that have not ended yet. The first one is the "next" event.
pub fn upcoming_events(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    let today = now.date();
    events_on(events, today)
        .into_iter()
        .filter(|e| e.ends_at(today) > now)
        .collect()
}

/// Tasks within `window_days` of `selected`, narrowed by `filter`.
/// Open tasks come before completed ones, then by date and time.
pub fn task_list<'a>(
    tasks: &'a [Task],
    selected: NaiveDate,
    filter: TaskFilter,
    window_days: u32,
) -> Vec<&'a Task> {
    let window = i64::from(window_days);
    let mut out: Vec<&Task> = tasks
        .iter()
        .filter(|t| (t.date - selected).num_days().abs() <= window)
        .filter(|t| filter.accepts(t))
        .collect();
    out.sort_by(|a, b| compare_tasks(a, b));
    out
}

fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.time.cmp(&b.time))
}

/// Records whose title or notes contain a search query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchHits<'a> {
    pub events: Vec<&'a Event>,
    pub tasks: Vec<&'a Task>,
}

impl SearchHits<'_> {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.tasks.is_empty()
    }
}

fn text_matches(title: &str, notes: &str, needle: &str) -> bool {
    title.to_lowercase().contains(needle) || notes.to_lowercase().contains(needle)
}

/// Case-insensitive substring search over titles and notes, in input order.
/// A blank query finds nothing.
pub fn search<'a>(events: &'a [Event], tasks: &'a [Task], query: &str) -> SearchHits<'a> {
    if query.trim().is_empty() {
        return SearchHits::default();
    }
    let needle = query.to_lowercase();
    SearchHits {
        events: events
            .iter()
            .filter(|e| text_matches(&e.title, &e.notes, &needle))
            .collect(),
        tasks: tasks
            .iter()
            .filter(|t| text_matches(&t.title, &t.notes, &needle))
            .collect(),
    }
}

pub fn count_tasks(tasks: &[Task]) -> TaskCounts {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskCounts {
        completed,
        unfinished: tasks.len() - completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn filter_names_round_trip() {
        for f in TaskFilter::iter() {
            assert_eq!(TaskFilter::from_str(&f.to_string()).unwrap(), f);
        }
        assert_eq!(TaskFilter::LowPriority.to_string(), "low-priority");
    }
}
