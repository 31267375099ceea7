// File: ./src/model/recurrence.rs
use crate::model::item::Recurring;
use chrono::{Datelike, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CUSTOM_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)every\s+(\d+)\s+(day|week|month|year)").expect("valid custom rule regex")
});

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Three-letter code as written in stored rules ("Sun".."Sat").
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatUnit {
    Day,
    Week,
    Month,
    Year,
}

impl RepeatUnit {
    fn as_str(&self) -> &'static str {
        match self {
            RepeatUnit::Day => "day",
            RepeatUnit::Week => "week",
            RepeatUnit::Month => "month",
            RepeatUnit::Year => "year",
        }
    }

    fn from_word(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" => Some(RepeatUnit::Day),
            "week" => Some(RepeatUnit::Week),
            "month" => Some(RepeatUnit::Month),
            "year" => Some(RepeatUnit::Year),
            _ => None,
        }
    }
}

/// "Every N <unit>[ on <days>]".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRule {
    pub interval: u32,
    pub unit: RepeatUnit,
    /// Only populated for weekly rules. Empty means "the anchor's weekday".
    pub days: Vec<Weekday>,
}

impl CustomRule {
    /// Builds a rule the way the recurrence picker does: days only survive for
    /// weekly rules and are kept in Sun..Sat order without duplicates.
    pub fn new(interval: u32, unit: RepeatUnit, days: &[Weekday]) -> Option<Self> {
        if interval == 0 {
            return None;
        }
        let days = if unit == RepeatUnit::Week {
            WEEK.iter().copied().filter(|d| days.contains(d)).collect()
        } else {
            Vec::new()
        };
        Some(Self {
            interval,
            unit,
            days,
        })
    }

    fn parse(raw: &str) -> Option<Self> {
        let caps = CUSTOM_RULE.captures(raw)?;
        let interval = caps[1].parse::<u32>().ok()?;
        let unit = RepeatUnit::from_word(&caps[2])?;
        if interval == 0 {
            return None;
        }

        let mut days = Vec::new();
        if unit == RepeatUnit::Week {
            let lower = raw.to_lowercase();
            // Only the text between the first and a second " on " lists days.
            if let Some(list) = lower.split(" on ").nth(1) {
                days = WEEK
                    .iter()
                    .copied()
                    .filter(|d| list.contains(&weekday_code(*d).to_lowercase()))
                    .collect();
                // A day list naming nothing can never match.
                if days.is_empty() {
                    return None;
                }
            }
        }

        Some(Self {
            interval,
            unit,
            days,
        })
    }

    fn matches(&self, anchor: NaiveDate, target: NaiveDate) -> bool {
        let n = i64::from(self.interval);
        let diff_days = (target - anchor).num_days();

        match self.unit {
            RepeatUnit::Day => diff_days % n == 0,
            RepeatUnit::Week => {
                let diff_weeks = diff_days.div_euclid(7);
                if diff_weeks % n != 0 {
                    return false;
                }
                if self.days.is_empty() {
                    target.weekday() == anchor.weekday()
                } else {
                    self.days.contains(&target.weekday())
                }
            }
            RepeatUnit::Month => {
                let diff_months = (i64::from(target.year()) - i64::from(anchor.year())) * 12
                    + (i64::from(target.month()) - i64::from(anchor.month()));
                diff_months % n == 0 && target.day() == anchor.day()
            }
            RepeatUnit::Year => {
                let diff_years = i64::from(target.year()) - i64::from(anchor.year());
                diff_years % n == 0
                    && target.month() == anchor.month()
                    && target.day() == anchor.day()
            }
        }
    }
}

impl fmt::Display for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.interval > 1 { "s" } else { "" };
        write!(f, "Every {} {}{}", self.interval, self.unit.as_str(), plural)?;
        if self.unit == RepeatUnit::Week && !self.days.is_empty() {
            let codes: Vec<&str> = self.days.iter().map(|d| weekday_code(*d)).collect();
            write!(f, " on {}", codes.join(", "))?;
        }
        Ok(())
    }
}

/// How an event or task repeats.
///
/// Stored as a plain string ("weekly", "Every 2 weeks on Mon, Wed", ...) and
/// parsed once at load time. Strings that cannot be understood are kept
/// verbatim as `Unrecognized` so they survive a save, but never occur.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RepeatRule {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom(CustomRule),
    Unrecognized(String),
}

impl RepeatRule {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "none" => RepeatRule::None,
            "daily" => RepeatRule::Daily,
            "weekly" => RepeatRule::Weekly,
            "monthly" => RepeatRule::Monthly,
            "yearly" => RepeatRule::Yearly,
            _ if raw.starts_with("Every") => match CustomRule::parse(raw) {
                Some(rule) => RepeatRule::Custom(rule),
                None => {
                    log::debug!("Malformed custom repeat rule: '{}'", raw);
                    RepeatRule::Unrecognized(raw.to_string())
                }
            },
            _ => {
                log::debug!("Unknown repeat rule: '{}'", raw);
                RepeatRule::Unrecognized(raw.to_string())
            }
        }
    }
}

impl FromStr for RepeatRule {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for RepeatRule {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<RepeatRule> for String {
    fn from(rule: RepeatRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatRule::None => write!(f, "none"),
            RepeatRule::Daily => write!(f, "daily"),
            RepeatRule::Weekly => write!(f, "weekly"),
            RepeatRule::Monthly => write!(f, "monthly"),
            RepeatRule::Yearly => write!(f, "yearly"),
            RepeatRule::Custom(rule) => write!(f, "{}", rule),
            RepeatRule::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Whether the item falls on `target`. Nothing ever occurs before its
    /// anchor date, and unrecognized rules never occur.
    pub fn occurs_on<R: Recurring + ?Sized>(item: &R, target: NaiveDate) -> bool {
        let anchor = item.anchor_date();

        if target < anchor {
            return false;
        }

        match item.repeat() {
            RepeatRule::None => target == anchor,
            RepeatRule::Daily => true,
            RepeatRule::Weekly => target.weekday() == anchor.weekday(),
            // No end-of-month clamping: a 31st anchor skips shorter months.
            RepeatRule::Monthly => target.day() == anchor.day(),
            RepeatRule::Yearly => target.month() == anchor.month() && target.day() == anchor.day(),
            RepeatRule::Custom(rule) => rule.matches(anchor, target),
            RepeatRule::Unrecognized(_) => false,
        }
    }

    /// All dates in `from..=to` on which the item occurs.
    pub fn occurrences_between<R: Recurring + ?Sized>(
        item: &R,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<NaiveDate> {
        if from > to {
            return Vec::new();
        }
        let start = std::cmp::max(from, item.anchor_date());
        start
            .iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| Self::occurs_on(item, *d))
            .collect()
    }
}
