// File: src/model/parser.rs
//
// Quick-entry parsing: turns a typed or dictated phrase such as
// "Physics test tomorrow at 5pm" into a draft with title, date, time and
// priority.
//
// The pipeline is a fixed sequence of stages. Each stage looks at the text
// left over by the previous one and returns what it found together with the
// residual text, so recognized words never end up in the title:
//
//   priority -> relative date -> time -> title cleanup
//
// Nothing here fails. Input that matches no stage becomes a title due on the
// reference date at 23:59 with normal priority.

use crate::config::Config;
use crate::model::item::{Event, Priority, Task, hhmm};
use crate::model::recurrence::RepeatRule;
use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

pub const FALLBACK_TITLE: &str = "New Task";

static HIGH_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)high priority|urgent|important").expect("valid high priority regex")
});
static LOW_PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)low priority").expect("valid low priority regex"));
static TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btomorrow\b").expect("valid tomorrow regex"));
static TODAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btoday\b").expect("valid today regex"));
// "at 5", "at 5pm", "at 5:30", "at 7 p.m."
static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bat\s+([0-9]{1,2})(?::([0-9]{2}))?\s*(a\.?m\.?|p\.?m\.?)?")
        .expect("valid time regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickEntry {
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "startTime", with = "hhmm")]
    pub start_time: NaiveTime,
    pub priority: Priority,
}

impl QuickEntry {
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_time_string(&self) -> String {
        self.start_time.format("%H:%M").to_string()
    }

    /// Completes the draft into a task record with a fresh id.
    pub fn into_task(self, config: &Config) -> Task {
        Task {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            date: self.date,
            time: self.start_time,
            completed: false,
            priority: self.priority,
            repeat: RepeatRule::None,
            reminder: "none".to_string(),
            notes: config.quick_add_note.clone(),
        }
    }

    /// Completes the draft into a calendar event with a fresh id.
    /// Events carry no priority, so it is dropped.
    pub fn into_event(self, config: &Config) -> Event {
        Event {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            date: self.date,
            start_time: self.start_time,
            duration: config.default_duration_mins,
            location: String::new(),
            repeat: RepeatRule::None,
            reminder: "none".to_string(),
            notes: config.quick_add_note.clone(),
        }
    }
}

/// End of day, used when the phrase names no time.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Stage 1. "high priority", "urgent" and "important" win over "low priority".
/// Every occurrence of the winning tier's phrases is removed.
pub fn detect_priority(text: &str) -> (Priority, String) {
    if HIGH_PRIORITY.is_match(text) {
        (Priority::High, HIGH_PRIORITY.replace_all(text, "").into_owned())
    } else if LOW_PRIORITY.is_match(text) {
        (Priority::Low, LOW_PRIORITY.replace_all(text, "").into_owned())
    } else {
        (Priority::Normal, text.to_string())
    }
}

/// Stage 2. Only one keyword is honored; "tomorrow" is checked first.
pub fn detect_relative_date(text: &str, reference: NaiveDate) -> (NaiveDate, String) {
    if TOMORROW.is_match(text) {
        let date = reference
            .checked_add_signed(Duration::days(1))
            .unwrap_or(reference);
        (date, TOMORROW.replace_all(text, "").into_owned())
    } else if TODAY.is_match(text) {
        (reference, TODAY.replace_all(text, "").into_owned())
    } else {
        (reference, text.to_string())
    }
}

/// Stage 3. Looks at the first "at <hour>[:<min>][am|pm]" phrase only.
pub fn detect_time(text: &str) -> (Option<NaiveTime>, String) {
    let Some(caps) = TIME.captures(text) else {
        return (None, text.to_string());
    };

    let hours: u32 = match caps[1].parse() {
        Ok(h) => h,
        Err(_) => return (None, text.to_string()),
    };
    let minutes: u32 = match caps.get(2).map(|m| m.as_str().parse()) {
        Some(Ok(m)) => m,
        Some(Err(_)) => return (None, text.to_string()),
        None => 0,
    };
    let period = caps.get(3).map(|m| m.as_str().replace('.', "").to_lowercase());

    let Some(time) = to_24h(hours, minutes, period.as_deref()) else {
        log::debug!("Ignoring out of range time '{}'", &caps[0]);
        return (None, text.to_string());
    };

    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let mut residual = String::with_capacity(text.len());
    residual.push_str(&text[..whole.start]);
    residual.push_str(&text[whole.end..]);
    (Some(time), residual)
}

fn to_24h(hours: u32, minutes: u32, period: Option<&str>) -> Option<NaiveTime> {
    let h = match period {
        Some("pm") if hours < 12 => hours + 12,
        Some("am") if hours == 12 => 0,
        Some(_) => hours,
        // Without a marker, 1-8 are afternoon/evening and 9-11 morning.
        // 12 stays noon.
        None if (1..=8).contains(&hours) => hours + 12,
        None => hours,
    };
    NaiveTime::from_hms_opt(h, minutes, 0)
}

/// Stage 4. Collapses whitespace left by removals.
pub fn clean_title(text: &str) -> String {
    let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

pub fn parse_quick_entry(text: &str, reference: NaiveDate) -> QuickEntry {
    let (priority, rest) = detect_priority(text);
    let (date, rest) = detect_relative_date(&rest, reference);
    let (time, rest) = detect_time(&rest);

    QuickEntry {
        title: clean_title(&rest),
        date,
        start_time: time.unwrap_or_else(default_start_time),
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn priority_strips_every_high_phrase() {
        let (p, rest) = detect_priority("URGENT and important: high priority stuff");
        assert_eq!(p, Priority::High);
        assert_eq!(clean_title(&rest), "and : stuff");
    }

    #[test]
    fn high_priority_shadows_low() {
        let (p, rest) = detect_priority("urgent low priority chores");
        assert_eq!(p, Priority::High);
        assert_eq!(clean_title(&rest), "low priority chores");
    }

    #[test]
    fn priority_is_substring_based() {
        let (p, rest) = detect_priority("Importantly");
        assert_eq!(p, Priority::High);
        assert_eq!(rest, "ly");
    }

    #[test]
    fn tomorrow_beats_today() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let (date, rest) = detect_relative_date("today or Tomorrow", reference);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(clean_title(&rest), "today or");
    }

    #[test]
    fn relative_words_need_boundaries() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let (date, rest) = detect_relative_date("todays plan", reference);
        assert_eq!(date, reference);
        assert_eq!(rest, "todays plan");
    }

    #[test]
    fn month_end_rollover() {
        let reference = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let (date, _) = detect_relative_date("tomorrow", reference);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn explicit_periods() {
        assert_eq!(detect_time("at 5pm").0, Some(t(17, 0)));
        assert_eq!(detect_time("at 12 a.m.").0, Some(t(0, 0)));
        assert_eq!(detect_time("at 12pm").0, Some(t(12, 0)));
        assert_eq!(detect_time("at 7:45 P.M.").0, Some(t(19, 45)));
        assert_eq!(detect_time("at 9 am").0, Some(t(9, 0)));
    }

    #[test]
    fn bare_hours_use_heuristic() {
        assert_eq!(detect_time("at 1").0, Some(t(13, 0)));
        assert_eq!(detect_time("at 8:15").0, Some(t(20, 15)));
        assert_eq!(detect_time("at 9").0, Some(t(9, 0)));
        assert_eq!(detect_time("at 11").0, Some(t(11, 0)));
        assert_eq!(detect_time("at 12").0, Some(t(12, 0)));
        assert_eq!(detect_time("at 0").0, Some(t(0, 0)));
        assert_eq!(detect_time("at 18").0, Some(t(18, 0)));
    }

    #[test]
    fn out_of_range_times_stay_in_title() {
        let (time, rest) = detect_time("Gate at 99");
        assert_eq!(time, None);
        assert_eq!(rest, "Gate at 99");

        let (time, _) = detect_time("at 10:75");
        assert_eq!(time, None);
    }

    #[test]
    fn only_first_time_phrase_is_used() {
        let (time, rest) = detect_time("at 3 then at 4");
        assert_eq!(time, Some(t(15, 0)));
        assert_eq!(clean_title(&rest), "then at 4");
    }

    #[test]
    fn at_must_start_a_word() {
        assert_eq!(detect_time("chat 5").0, None);
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(clean_title("   \t "), FALLBACK_TITLE);
    }
}
