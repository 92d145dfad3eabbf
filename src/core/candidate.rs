use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::shift::{BlockedShift, Shift, ShiftKey};
use crate::core::types::CandidateId;

/// A substitute staff member being evaluated for shift coverage
///
/// The three shift lists come from the upstream availability resolver and
/// are trusted as-is. `assigned_shifts` holds shifts already committed to
/// this candidate; those count as solved for every candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub can_change_diapers: bool,

    #[serde(default)]
    pub can_lift_children: bool,

    /// Class/age-group qualifications satisfied (opaque upstream check)
    #[serde(default)]
    pub qualification_matches: u32,

    /// Class/age-group qualifications checked
    #[serde(default)]
    pub qualification_total: u32,

    /// Fraction of remaining eligible shifts the candidate is free for (0-100)
    #[serde(default)]
    pub coverage_percent: u8,

    #[serde(default)]
    pub can_cover: Vec<Shift>,

    #[serde(default)]
    pub cannot_cover: Vec<BlockedShift>,

    #[serde(default)]
    pub assigned_shifts: Vec<Shift>,

    // === Derived, see rebuild_indexes ===
    /// Any qualification mismatch at all. Applied to every shift the
    /// candidate covers, not per shift.
    #[serde(skip_deserializing)]
    pub has_qualification_mismatch: bool,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CandidateId::new(id),
            name: name.into(),
            phone: None,
            can_change_diapers: false,
            can_lift_children: false,
            qualification_matches: 0,
            qualification_total: 0,
            coverage_percent: 0,
            can_cover: Vec::new(),
            cannot_cover: Vec::new(),
            assigned_shifts: Vec::new(),
            has_qualification_mismatch: false,
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_capabilities(mut self, can_change_diapers: bool, can_lift_children: bool) -> Self {
        self.can_change_diapers = can_change_diapers;
        self.can_lift_children = can_lift_children;
        self
    }

    #[must_use]
    pub fn with_qualifications(mut self, matches: u32, total: u32) -> Self {
        self.qualification_matches = matches;
        self.qualification_total = total;
        self.rebuild_indexes();
        self
    }

    #[must_use]
    pub fn with_coverage_percent(mut self, coverage_percent: u8) -> Self {
        self.coverage_percent = coverage_percent;
        self
    }

    #[must_use]
    pub fn with_can_cover(mut self, shifts: Vec<Shift>) -> Self {
        self.can_cover = shifts;
        self
    }

    #[must_use]
    pub fn with_cannot_cover(mut self, shifts: Vec<BlockedShift>) -> Self {
        self.cannot_cover = shifts;
        self
    }

    #[must_use]
    pub fn with_assigned_shifts(mut self, shifts: Vec<Shift>) -> Self {
        self.assigned_shifts = shifts;
        self
    }

    /// Recompute derived fields after deserializing or editing qualifications
    pub fn rebuild_indexes(&mut self) {
        self.has_qualification_mismatch = self.qualification_total > 0
            && self.qualification_matches < self.qualification_total;
    }

    #[must_use]
    pub fn can_cover_keys(&self) -> BTreeSet<ShiftKey> {
        self.can_cover.iter().map(Shift::key).collect()
    }

    #[must_use]
    pub fn assigned_keys(&self) -> BTreeSet<ShiftKey> {
        self.assigned_shifts.iter().map(Shift::key).collect()
    }

    /// Keys this candidate has any opinion on, coverable or blocked
    #[must_use]
    pub fn eligible_keys(&self) -> BTreeSet<ShiftKey> {
        self.can_cover
            .iter()
            .map(Shift::key)
            .chain(self.cannot_cover.iter().map(|b| b.shift.key()))
            .collect()
    }

    /// Look up the full shift record for a key in `can_cover`
    #[must_use]
    pub fn coverable_shift(&self, key: &ShiftKey) -> Option<&Shift> {
        self.can_cover
            .iter()
            .find(|s| s.date == key.date && s.time_slot_code == key.time_slot_code)
    }

    /// Look up the block reason for a key in `cannot_cover`
    #[must_use]
    pub fn block_reason(&self, key: &ShiftKey) -> Option<&str> {
        self.cannot_cover
            .iter()
            .find(|b| b.shift.date == key.date && b.shift.time_slot_code == key.time_slot_code)
            .map(|b| b.reason.as_str())
    }
}
