//! Domain types for type safety and clarity

use anyhow::{Result, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::reminders::DUE_SOON_HOURS;

/// A position in screen space (logical points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// When a todo is due
///
/// A calendar date, a time of day (meaning "today"), or an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Due {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%H:%M"];
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Hint shown next to due-date inputs
pub const DUE_INPUT_HINT: &str = "10:00 AM, MM/DD/YYYY or YYYY-MM-DD HH:MM";

impl Due {
    /// Parse user or legacy input
    ///
    /// Full timestamps win over bare times, bare times over bare dates.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if s.is_empty() {
            bail!("Due date is empty");
        }

        if let Ok(ts) = s.parse::<NaiveDateTime>() {
            return Ok(Due::DateTime(ts));
        }
        for fmt in DATE_TIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Due::DateTime(ts));
            }
        }
        for fmt in TIME_FORMATS {
            if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
                return Ok(Due::Time(t));
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(Due::Date(d));
            }
        }

        bail!("Unrecognised due date '{s}' (expected {DUE_INPUT_HINT})")
    }

    /// Calendar day this due value belongs to
    pub fn on_day(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Due::Date(d) => *d,
            Due::Time(_) => today,
            Due::DateTime(ts) => ts.date(),
        }
    }

    /// Instant at which a reminder should fire, if this value carries a time
    pub fn reminder_at(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        match self {
            Due::Date(_) => None,
            Due::Time(t) => Some(today.and_time(*t)),
            Due::DateTime(ts) => Some(*ts),
        }
    }

    /// Classify against the current local time
    pub fn status(&self, now: NaiveDateTime) -> DueStatus {
        let horizon = now + Duration::hours(DUE_SOON_HOURS);
        match self {
            Due::Time(t) => {
                let at = now.date().and_time(*t);
                if at > now && at < horizon {
                    DueStatus::DueSoon
                } else {
                    DueStatus::Overdue
                }
            }
            Due::Date(d) => {
                let at = d.and_time(NaiveTime::MIN);
                if at > now && at < horizon {
                    DueStatus::DueSoon
                } else if *d < now.date() {
                    DueStatus::Overdue
                } else {
                    DueStatus::Pending
                }
            }
            Due::DateTime(ts) => {
                if *ts <= now {
                    DueStatus::Overdue
                } else if *ts < horizon {
                    DueStatus::DueSoon
                } else {
                    DueStatus::Pending
                }
            }
        }
    }
}

impl FromStr for Due {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Due::parse(s)
    }
}

impl fmt::Display for Due {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Due::Date(d) => write!(f, "{}", d.format("%m/%d/%Y")),
            Due::Time(t) => write!(f, "{}", t.format("%I:%M %p")),
            Due::DateTime(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M")),
        }
    }
}

/// How urgent a todo is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    NoDue,
    Pending,
    DueSoon,
    Overdue,
}

/// Accepts both the tagged form and the older plain-string form
/// (`"10:00 AM"`, `"4/14/2024"`, `"2024-04-14T10:00:00"`)
pub fn deserialize_due<'de, D>(deserializer: D) -> Result<Option<Due>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TaggedOrString {
        Tagged(Due),
        Legacy(String),
    }

    match Option::<TaggedOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(TaggedOrString::Tagged(due)) => Ok(Some(due)),
        Some(TaggedOrString::Legacy(s)) if s.trim().is_empty() => Ok(None),
        Some(TaggedOrString::Legacy(s)) => match Due::parse(&s) {
            Ok(due) => Ok(Some(due)),
            Err(e) => {
                warn!(value = %s, error = %e, "Dropping unparseable due date");
                Ok(None)
            }
        },
    }
}
