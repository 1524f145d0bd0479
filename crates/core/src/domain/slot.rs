//! Time slot parsing and working-hour checks
//!
//! A slot is written `H:MM-H:MM` on a 24h clock: the hour takes one or two
//! digits, the minute exactly two. Slots are half-open `[start, end)` and must
//! be non-empty. Everything here is pure and safe to call without holding the
//! engine lock.

use crate::domain::error::{DomainError, Result};
use crate::domain::resource::Resource;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Half-open time interval within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Slot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start >= end {
            return Err(DomainError::InvalidSlotFormat(format!(
                "{}-{}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(text: &str) -> Result<Self> {
        parse_slot(text)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

impl FromStr for Slot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        parse_slot(s)
    }
}

/// Parse `H:MM-H:MM` into a [`Slot`].
pub fn parse_slot(text: &str) -> Result<Slot> {
    let invalid = || DomainError::InvalidSlotFormat(text.to_string());

    let (start, end) = text.trim().split_once('-').ok_or_else(invalid)?;
    let start = parse_clock(start).ok_or_else(invalid)?;
    let end = parse_clock(end).ok_or_else(invalid)?;

    if start >= end {
        return Err(invalid());
    }
    Ok(Slot { start, end })
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    let (hour, minute) = text.split_once(':')?;

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(hour) || hour.len() > 2 || !digits(minute) || minute.len() != 2 {
        return None;
    }

    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// True iff the slot lies inside the resource's `[start, end)` working window.
pub fn within_working_hours(slot: &Slot, resource: &Resource) -> bool {
    slot.start >= resource.start_time && slot.end <= resource.end_time
}
