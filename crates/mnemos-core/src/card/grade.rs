//! Grades
//!
//! The learner's self-assessment of one exposure, ordered by correctness.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review grade, ordered `Fail < Hard < Good < Easy`.
///
/// Persisted as its numeric value (0-3). Values outside that range clamp to
/// the nearest grade when read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", from = "i64")]
pub enum Grade {
    /// Not recalled
    Fail = 0,
    /// Recalled with serious effort
    Hard = 1,
    /// Recalled
    Good = 2,
    /// Recalled instantly
    Easy = 3,
}

impl Grade {
    /// Every grade, weakest first
    pub const ALL: [Grade; 4] = [Grade::Fail, Grade::Hard, Grade::Good, Grade::Easy];

    /// Numeric value (0-3)
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Strict conversion from a numeric grade.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Grade::Fail),
            1 => Some(Grade::Hard),
            2 => Some(Grade::Good),
            3 => Some(Grade::Easy),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Fail => "fail",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// Parse from a name or a digit. Accepts `again` as a synonym for `fail`.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "fail" | "again" | "0" => Some(Grade::Fail),
            "hard" | "1" => Some(Grade::Hard),
            "good" | "2" => Some(Grade::Good),
            "easy" | "3" => Some(Grade::Easy),
            _ => None,
        }
    }

    /// Anything but `Fail` counts as a successful recall.
    #[inline]
    pub fn is_success(self) -> bool {
        self != Grade::Fail
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.value()
    }
}

impl From<i64> for Grade {
    fn from(value: i64) -> Self {
        match value {
            i64::MIN..=0 => Grade::Fail,
            1 => Grade::Hard,
            2 => Grade::Good,
            _ => Grade::Easy,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
