use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::candidate::Candidate;
use crate::core::shift::{Shift, ShiftKey};
use crate::core::types::CandidateId;
use crate::matching::engine::uncovered_shift_keys;

/// Per-shift view of who can and cannot take an uncovered shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCoverage {
    pub key: ShiftKey,

    /// Candidates with positive coverage who list the shift as coverable
    pub coverers: Vec<CandidateId>,

    /// Candidates who list the shift as blocked, with their reasons
    pub blocked: Vec<BlockedBy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedBy {
    pub candidate_id: CandidateId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// Some shifts have nobody; no combination can cover everything
    FindMoreSubs { shifts: Vec<ShiftKey> },
    /// A single candidate can take every open shift
    SingleSubAvailable { candidate_id: CandidateId },
    /// Every shift is already assigned
    NothingToCover,
}

/// Explains coverage of the uncovered-shift set across a candidate pool.
///
/// The combination search only returns full solutions; this is where
/// partial coverage becomes visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageDiagnosis {
    /// Distinct shifts listed by any candidate, assigned or not
    pub total_shifts: usize,

    /// Shifts already assigned to some candidate
    pub assigned_shifts: usize,

    /// One entry per uncovered shift, in calendar order
    pub shifts: Vec<ShiftCoverage>,

    /// Uncovered shifts nobody eligible can take
    pub uncoverable: Vec<ShiftKey>,

    pub suggestions: Vec<Suggestion>,
}

impl CoverageDiagnosis {
    #[must_use]
    pub fn analyze(candidates: &[Candidate]) -> Self {
        let uncovered = uncovered_shift_keys(candidates);

        let mut all_keys: BTreeSet<ShiftKey> = BTreeSet::new();
        for candidate in candidates {
            all_keys.extend(candidate.eligible_keys());
            all_keys.extend(candidate.assigned_shifts.iter().map(Shift::key));
        }
        let assigned_shifts = all_keys.len() - uncovered.len();

        let eligible: Vec<(&Candidate, BTreeSet<ShiftKey>)> = candidates
            .iter()
            .filter(|c| c.coverage_percent > 0)
            .map(|c| (c, c.can_cover_keys()))
            .collect();

        let shifts: Vec<ShiftCoverage> = uncovered
            .iter()
            .map(|key| {
                let coverers = eligible
                    .iter()
                    .filter(|(_, keys)| keys.contains(key))
                    .map(|(c, _)| c.id.clone())
                    .collect();
                let blocked = candidates
                    .iter()
                    .filter_map(|c| {
                        c.block_reason(key).map(|reason| BlockedBy {
                            candidate_id: c.id.clone(),
                            reason: reason.to_string(),
                        })
                    })
                    .collect();
                ShiftCoverage {
                    key: key.clone(),
                    coverers,
                    blocked,
                }
            })
            .collect();

        let uncoverable: Vec<ShiftKey> = shifts
            .iter()
            .filter(|s| s.coverers.is_empty())
            .map(|s| s.key.clone())
            .collect();

        let mut suggestions = Vec::new();
        if uncovered.is_empty() {
            suggestions.push(Suggestion::NothingToCover);
        } else if !uncoverable.is_empty() {
            suggestions.push(Suggestion::FindMoreSubs {
                shifts: uncoverable.clone(),
            });
        } else {
            // Candidate order decides which single sub is named
            if let Some((candidate, _)) = eligible
                .iter()
                .find(|(_, keys)| uncovered.is_subset(keys))
            {
                suggestions.push(Suggestion::SingleSubAvailable {
                    candidate_id: candidate.id.clone(),
                });
            }
        }

        Self {
            total_shifts: all_keys.len(),
            assigned_shifts,
            shifts,
            uncoverable,
            suggestions,
        }
    }

    /// Whether a full-coverage combination can exist at all
    #[must_use]
    pub fn is_coverable(&self) -> bool {
        !self.shifts.is_empty() && self.uncoverable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shift::BlockedShift;
    use crate::matching::engine::find_top_combinations;
    use chrono::NaiveDate;

    fn shift(day: u32, code: &str) -> Shift {
        Shift::new(NaiveDate::from_ymd_opt(2026, 2, day).unwrap(), code)
    }

    #[test]
    fn test_uncoverable_shift_reported() {
        let candidates = vec![
            Candidate::new("a", "A")
                .with_coverage_percent(50)
                .with_can_cover(vec![shift(10, "EM")])
                .with_cannot_cover(vec![BlockedShift::new(shift(11, "EM"), "Own class")]),
            Candidate::new("b", "B")
                .with_coverage_percent(0)
                .with_can_cover(vec![shift(11, "EM")]),
        ];

        let diagnosis = CoverageDiagnosis::analyze(&candidates);

        assert_eq!(diagnosis.total_shifts, 2);
        assert_eq!(diagnosis.assigned_shifts, 0);
        assert_eq!(diagnosis.uncoverable, vec![shift(11, "EM").key()]);
        assert_eq!(diagnosis.shifts[1].blocked[0].reason, "Own class");
        assert!(!diagnosis.is_coverable());
        assert!(matches!(
            diagnosis.suggestions[0],
            Suggestion::FindMoreSubs { .. }
        ));
        // Consistent with the search
        assert!(find_top_combinations(&candidates, 5).is_empty());
    }

    #[test]
    fn test_single_sub_suggestion() {
        let candidates = vec![
            Candidate::new("part", "Part")
                .with_coverage_percent(50)
                .with_can_cover(vec![shift(10, "EM")]),
            Candidate::new("full", "Full")
                .with_coverage_percent(100)
                .with_can_cover(vec![shift(10, "EM"), shift(11, "EM")]),
        ];

        let diagnosis = CoverageDiagnosis::analyze(&candidates);

        assert!(diagnosis.is_coverable());
        assert_eq!(
            diagnosis.suggestions,
            vec![Suggestion::SingleSubAvailable {
                candidate_id: CandidateId::new("full")
            }]
        );
    }

    #[test]
    fn test_all_assigned() {
        let candidates = vec![Candidate::new("a", "A")
            .with_coverage_percent(100)
            .with_can_cover(vec![shift(10, "EM")])
            .with_assigned_shifts(vec![shift(10, "EM")])];

        let diagnosis = CoverageDiagnosis::analyze(&candidates);

        assert_eq!(diagnosis.total_shifts, 1);
        assert_eq!(diagnosis.assigned_shifts, 1);
        assert!(diagnosis.shifts.is_empty());
        assert_eq!(diagnosis.suggestions, vec![Suggestion::NothingToCover]);
    }
}
