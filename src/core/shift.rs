use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for shift keys and input files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identity of a shift: one time slot on one date
///
/// Keys order by date first, then by time slot code, so sets of keys
/// iterate in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftKey {
    pub date: NaiveDate,
    pub time_slot_code: String,
}

impl ShiftKey {
    pub fn new(date: NaiveDate, time_slot_code: impl Into<String>) -> Self {
        Self {
            date,
            time_slot_code: time_slot_code.into(),
        }
    }
}

impl std::fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.date.format(DATE_FORMAT), self.time_slot_code)
    }
}

impl FromStr for ShiftKey {
    type Err = String;

    /// Parse the canonical `YYYY-MM-DD|CODE` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, code) = s
            .split_once('|')
            .ok_or_else(|| format!("Shift key '{s}' is missing the '|' separator"))?;
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
            .map_err(|e| format!("Invalid date in shift key '{s}': {e}"))?;
        let code = code.trim();
        if code.is_empty() {
            return Err(format!("Shift key '{s}' has an empty time slot code"));
        }
        Ok(Self::new(date, code))
    }
}

/// A shift needing coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub date: NaiveDate,

    /// Recurring weekly slot within the day (e.g. "EM" for early morning)
    pub time_slot_code: String,

    #[serde(default)]
    pub diaper_changing_required: bool,

    #[serde(default)]
    pub lifting_children_required: bool,

    /// Classroom tag, display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Shift {
    pub fn new(date: NaiveDate, time_slot_code: impl Into<String>) -> Self {
        Self {
            date,
            time_slot_code: time_slot_code.into(),
            diaper_changing_required: false,
            lifting_children_required: false,
            class_name: None,
        }
    }

    #[must_use]
    pub fn requiring_diaper_changing(mut self) -> Self {
        self.diaper_changing_required = true;
        self
    }

    #[must_use]
    pub fn requiring_lifting(mut self) -> Self {
        self.lifting_children_required = true;
        self
    }

    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn key(&self) -> ShiftKey {
        ShiftKey::new(self.date, self.time_slot_code.clone())
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}",
            self.date.format("%a %Y-%m-%d"),
            self.time_slot_code
        )?;
        if let Some(class_name) = &self.class_name {
            write!(f, " ({class_name})")?;
        }
        Ok(())
    }
}

/// A shift the candidate cannot take, with the reason reported upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedShift {
    #[serde(flatten)]
    pub shift: Shift,
    pub reason: String,
}

impl BlockedShift {
    pub fn new(shift: Shift, reason: impl Into<String>) -> Self {
        Self {
            shift,
            reason: reason.into(),
        }
    }
}
