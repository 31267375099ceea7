// File: ./src/model/item.rs
use crate::model::recurrence::RepeatRule;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

/// The read-only view of a record that recurrence evaluation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDescriptor {
    pub anchor_date: NaiveDate,
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl RecurrenceDescriptor {
    pub fn new(anchor_date: NaiveDate, repeat: RepeatRule) -> Self {
        Self {
            anchor_date,
            repeat,
        }
    }
}

/// Anything that can be placed on a calendar day. Both parts are borrowed
/// from the record.
pub trait Recurring {
    fn anchor_date(&self) -> NaiveDate;
    fn repeat(&self) -> &RepeatRule;
}

fn default_duration() -> u32 {
    60
}

// Times are persisted as "HH:MM" strings.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "startTime", with = "hhmm")]
    pub start_time: NaiveTime,
    /// Minutes. Zero means "unset" and is treated as the default hour.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub repeat: RepeatRule,
    #[serde(default = "none_string")]
    pub reminder: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub repeat: RepeatRule,
    #[serde(default = "none_string")]
    pub reminder: String,
    #[serde(default)]
    pub notes: String,
}

fn none_string() -> String {
    "none".to_string()
}

impl Event {
    pub fn starts_at(&self, day: NaiveDate) -> NaiveDateTime {
        day.and_time(self.start_time)
    }

    /// End of the occurrence on `day`.
    pub fn ends_at(&self, day: NaiveDate) -> NaiveDateTime {
        let mins = if self.duration == 0 {
            default_duration()
        } else {
            self.duration
        };
        self.starts_at(day) + Duration::minutes(i64::from(mins))
    }
}

impl Recurring for Event {
    fn anchor_date(&self) -> NaiveDate {
        self.date
    }

    fn repeat(&self) -> &RepeatRule {
        &self.repeat
    }
}

impl Recurring for Task {
    fn anchor_date(&self) -> NaiveDate {
        self.date
    }

    fn repeat(&self) -> &RepeatRule {
        &self.repeat
    }
}

impl Recurring for RecurrenceDescriptor {
    fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    fn repeat(&self) -> &RepeatRule {
        &self.repeat
    }
}
