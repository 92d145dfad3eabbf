use serde::{Deserialize, Serialize};

/// Unique identifier for a substitute candidate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requirement gaps between one shift and one candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftConflicts {
    /// Shift requires diaper changing, candidate cannot
    pub missing_diaper_changing: bool,

    /// Shift requires lifting children, candidate cannot
    pub missing_lifting: bool,

    /// Candidate has a class/age-group qualification mismatch somewhere
    pub missing_qualification: bool,
}

impl ShiftConflicts {
    /// Number of conflicting requirements (0-3)
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.missing_diaper_changing)
            + usize::from(self.missing_lifting)
            + usize::from(self.missing_qualification)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.count() == 0
    }
}

/// Aggregate conflict tally across several shifts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCounts {
    pub missing_diaper_changing: usize,
    pub missing_lifting: usize,
    pub missing_qualifications: usize,
    pub total: usize,
}

impl ConflictCounts {
    pub fn add(&mut self, conflicts: ShiftConflicts) {
        self.missing_diaper_changing += usize::from(conflicts.missing_diaper_changing);
        self.missing_lifting += usize::from(conflicts.missing_lifting);
        self.missing_qualifications += usize::from(conflicts.missing_qualification);
        self.total += conflicts.count();
    }

    pub fn merge(&mut self, other: &ConflictCounts) {
        self.missing_diaper_changing += other.missing_diaper_changing;
        self.missing_lifting += other.missing_lifting;
        self.missing_qualifications += other.missing_qualifications;
        self.total += other.total;
    }
}

impl FromIterator<ShiftConflicts> for ConflictCounts {
    fn from_iter<I: IntoIterator<Item = ShiftConflicts>>(iter: I) -> Self {
        let mut counts = Self::default();
        for conflicts in iter {
            counts.add(conflicts);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_conflicts_count() {
        let none = ShiftConflicts::default();
        assert_eq!(none.count(), 0);
        assert!(none.is_clean());

        let all = ShiftConflicts {
            missing_diaper_changing: true,
            missing_lifting: true,
            missing_qualification: true,
        };
        assert_eq!(all.count(), 3);
        assert!(!all.is_clean());
    }

    #[test]
    fn test_conflict_counts_from_iter() {
        let counts: ConflictCounts = [
            ShiftConflicts {
                missing_lifting: true,
                ..Default::default()
            },
            ShiftConflicts {
                missing_lifting: true,
                missing_qualification: true,
                ..Default::default()
            },
            ShiftConflicts::default(),
        ]
        .into_iter()
        .collect();

        assert_eq!(counts.missing_lifting, 2);
        assert_eq!(counts.missing_qualifications, 1);
        assert_eq!(counts.missing_diaper_changing, 0);
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn test_candidate_id_serializes_as_plain_string() {
        let id = CandidateId::new("sub-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sub-42\"");
        assert_eq!(id.to_string(), "sub-42");
    }
}
