//! Day/night classification.
//!
//! The decision itself is a single comparison: it is day when `now` lies
//! strictly between `sunrise - offset` and `sunset - offset`. The offset makes
//! both switches happen early, so the day theme is already in place when the
//! sun comes up and the night theme when it goes down.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::SolarTimes;

/// Which theme pair is (or should be) active.
///
/// `Unknown` is the state before the first successful poll and after a forced
/// refresh. It differs from both `Day` and `Night`, so the next evaluation
/// always assigns a theme.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Unknown,
    Day,
    Night,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Unknown => write!(f, "Unknown"),
            Period::Day => write!(f, "Day"),
            Period::Night => write!(f, "Night"),
        }
    }
}

impl Period {
    /// Map the result of [`is_day`] to a period.
    pub fn from_is_day(is_day: bool) -> Self {
        if is_day { Period::Day } else { Period::Night }
    }

    /// Returns true once a theme has been assigned.
    pub fn is_known(&self) -> bool {
        !matches!(self, Period::Unknown)
    }

    /// Lowercase name used in command placeholders and serialized state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Unknown => "unknown",
            Period::Day => "day",
            Period::Night => "night",
        }
    }
}

/// Whether `now` counts as day for the given solar times and offset.
pub fn is_day(now: DateTime<Utc>, solar: &SolarTimes, offset: Duration) -> bool {
    let switch_to_day = solar.sunrise - offset;
    let switch_to_night = solar.sunset - offset;
    now > switch_to_day && now < switch_to_night
}

/// The next instant at which [`is_day`] changes its answer, if it changes
/// again on this solar day.
pub fn next_switch(now: DateTime<Utc>, solar: &SolarTimes, offset: Duration) -> Option<DateTime<Utc>> {
    let switch_to_day = solar.sunrise - offset;
    let switch_to_night = solar.sunset - offset;
    if now <= switch_to_day {
        Some(switch_to_day)
    } else if now < switch_to_night {
        Some(switch_to_night)
    } else {
        None
    }
}
