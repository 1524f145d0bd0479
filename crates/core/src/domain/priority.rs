// Priority Domain Model

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Booking priority (lower level = more urgent)
///
/// Ordering is defined by [`Priority::level`], so sorting ascending yields the
/// queue order: EMERGENCY, VIP, REGULAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Emergency,
    Vip,
    Regular,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Emergency, Priority::Vip, Priority::Regular];

    /// Numeric urgency level (1 = most urgent)
    pub const fn level(self) -> u8 {
        match self {
            Priority::Emergency => 1,
            Priority::Vip => 2,
            Priority::Regular => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.level() == level)
    }

    /// True if `self` preempts an incumbent holding `other`.
    /// Equal priorities never preempt each other.
    pub fn outranks(self, other: Priority) -> bool {
        self.level() < other.level()
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.level().cmp(&other.level())
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Emergency => write!(f, "EMERGENCY"),
            Priority::Vip => write!(f, "VIP"),
            Priority::Regular => write!(f, "REGULAR"),
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emergency" => Ok(Priority::Emergency),
            "vip" => Ok(Priority::Vip),
            "regular" => Ok(Priority::Regular),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}
