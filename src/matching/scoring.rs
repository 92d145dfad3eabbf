use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::candidate::Candidate;
use crate::core::shift::{BlockedShift, Shift, ShiftKey};
use crate::core::types::{CandidateId, ConflictCounts, ShiftConflicts};

/// Safely convert usize to f64 for percentage calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Classify requirement gaps between a shift and a candidate.
///
/// Diaper changing and lifting are checked against the shift's own flags.
/// The qualification flag is candidate-global: a candidate with one
/// mismatched class qualification out of ten is flagged on every shift it
/// covers. Making this shift-specific needs qualification data scoped to
/// the shift's class, which upstream does not provide yet.
#[must_use]
pub fn classify_shift_conflicts(shift: &Shift, candidate: &Candidate) -> ShiftConflicts {
    ShiftConflicts {
        missing_diaper_changing: shift.diaper_changing_required && !candidate.can_change_diapers,
        missing_lifting: shift.lifting_children_required && !candidate.can_lift_children,
        missing_qualification: candidate.has_qualification_mismatch,
    }
}

/// `round(covered / total * 100)`, or 0 when there is nothing to cover
#[must_use]
pub fn coverage_percent(covered: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (count_to_f64(covered) / count_to_f64(total) * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0-100
    {
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Status of one target shift for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Already assigned to someone; not part of the remaining work
    Assigned,
    /// Candidate is free for the shift
    Coverable { conflicts: ShiftConflicts },
    /// Candidate is unavailable or conflicted
    Blocked { reason: String },
    /// Candidate has no record for the shift
    NotApplicable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredShift {
    pub shift: Shift,
    #[serde(flatten)]
    pub status: ShiftStatus,
}

/// Coverage of a shift set by one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageScore {
    pub candidate_id: CandidateId,

    /// One entry per distinct target shift, in input order
    pub shifts: Vec<ScoredShift>,

    /// Shifts the candidate is free for
    pub shifts_covered: usize,

    /// Remaining eligible shifts (coverable + blocked), excluding assigned ones
    pub total_shifts: usize,

    pub coverage_percent: u8,

    /// Conflicts summed over coverable shifts
    pub conflicts: ConflictCounts,
}

impl CoverageScore {
    pub fn blocked(&self) -> impl Iterator<Item = (&Shift, &str)> {
        self.shifts.iter().filter_map(|s| match &s.status {
            ShiftStatus::Blocked { reason } => Some((&s.shift, reason.as_str())),
            _ => None,
        })
    }
}

/// Scores candidates against a fixed target shift set
pub struct CoverageScorer<'a> {
    shifts: &'a [Shift],
    /// Keys assigned to anyone; excluded for every candidate
    assigned: BTreeSet<ShiftKey>,
}

impl<'a> CoverageScorer<'a> {
    pub fn new(shifts: &'a [Shift]) -> Self {
        Self {
            shifts,
            assigned: BTreeSet::new(),
        }
    }

    /// Treat these keys as already assigned for every candidate
    #[must_use]
    pub fn with_assigned(mut self, assigned: BTreeSet<ShiftKey>) -> Self {
        self.assigned = assigned;
        self
    }

    #[must_use]
    pub fn score(&self, candidate: &Candidate) -> CoverageScore {
        let own_assigned = candidate.assigned_keys();
        let coverable = candidate.can_cover_keys();

        let mut seen: BTreeSet<ShiftKey> = BTreeSet::new();
        let mut shifts = Vec::with_capacity(self.shifts.len());
        let mut shifts_covered = 0usize;
        let mut total_shifts = 0usize;
        let mut conflicts = ConflictCounts::default();

        for shift in self.shifts {
            let key = shift.key();
            if !seen.insert(key.clone()) {
                continue;
            }

            let status = if self.assigned.contains(&key) || own_assigned.contains(&key) {
                ShiftStatus::Assigned
            } else if coverable.contains(&key) {
                let shift_conflicts = classify_shift_conflicts(shift, candidate);
                conflicts.add(shift_conflicts);
                shifts_covered += 1;
                total_shifts += 1;
                ShiftStatus::Coverable {
                    conflicts: shift_conflicts,
                }
            } else if let Some(reason) = candidate.block_reason(&key) {
                total_shifts += 1;
                ShiftStatus::Blocked {
                    reason: reason.to_string(),
                }
            } else {
                ShiftStatus::NotApplicable
            };

            shifts.push(ScoredShift {
                shift: shift.clone(),
                status,
            });
        }

        CoverageScore {
            candidate_id: candidate.id.clone(),
            shifts,
            shifts_covered,
            total_shifts,
            coverage_percent: coverage_percent(shifts_covered, total_shifts),
            conflicts,
        }
    }
}

/// Union of every candidate's assigned shift keys
#[must_use]
pub fn globally_assigned_keys(candidates: &[Candidate]) -> BTreeSet<ShiftKey> {
    candidates
        .iter()
        .flat_map(|c| c.assigned_shifts.iter().map(Shift::key))
        .collect()
}

/// Narrow every candidate's shift lists to the keys in `shifts`.
///
/// Kept records are replaced by the matching `shifts` entry, so requirement
/// flags and class names always come from the shift list. The first entry
/// wins when `shifts` repeats a key. An empty `shifts` leaves candidates
/// unchanged.
pub fn restrict_to_shifts(shifts: &[Shift], candidates: &mut [Candidate]) {
    if shifts.is_empty() {
        return;
    }

    let mut by_key: HashMap<ShiftKey, &Shift> = HashMap::with_capacity(shifts.len());
    for shift in shifts {
        by_key.entry(shift.key()).or_insert(shift);
    }
    let listed = |shift: &Shift| by_key.get(&shift.key()).map(|s| (*s).clone());

    for candidate in candidates.iter_mut() {
        candidate.can_cover = candidate.can_cover.iter().filter_map(|s| listed(s)).collect();
        candidate.cannot_cover = candidate
            .cannot_cover
            .iter()
            .filter_map(|b| {
                listed(&b.shift).map(|shift| BlockedShift::new(shift, b.reason.clone()))
            })
            .collect();
        candidate.assigned_shifts = candidate
            .assigned_shifts
            .iter()
            .filter_map(|s| listed(s))
            .collect();
    }
}

/// Score every candidate against `shifts` and store the resulting
/// coverage percent on each candidate.
///
/// Candidates are first passed through [`restrict_to_shifts`], so a search
/// run afterwards targets the same shifts the scores were computed over.
/// Returns the scores in candidate order.
pub fn score_candidates(shifts: &[Shift], candidates: &mut [Candidate]) -> Vec<CoverageScore> {
    restrict_to_shifts(shifts, candidates);
    let scorer = CoverageScorer::new(shifts).with_assigned(globally_assigned_keys(candidates));

    candidates
        .iter_mut()
        .map(|candidate| {
            let score = scorer.score(candidate);
            candidate.coverage_percent = score.coverage_percent;
            score
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::engine::find_top_combinations;
    use chrono::NaiveDate;

    fn shift(day: u32, code: &str) -> Shift {
        Shift::new(NaiveDate::from_ymd_opt(2026, 2, day).unwrap(), code)
    }

    #[test]
    fn test_classify_shift_conflicts() {
        let shift = shift(10, "EM").requiring_diaper_changing().requiring_lifting();

        let capable = Candidate::new("a", "A").with_capabilities(true, true);
        assert!(classify_shift_conflicts(&shift, &capable).is_clean());

        let no_lift = Candidate::new("b", "B").with_capabilities(true, false);
        let conflicts = classify_shift_conflicts(&shift, &no_lift);
        assert!(conflicts.missing_lifting);
        assert!(!conflicts.missing_diaper_changing);
        assert_eq!(conflicts.count(), 1);

        let nothing = Candidate::new("c", "C").with_qualifications(1, 2);
        assert_eq!(classify_shift_conflicts(&shift, &nothing).count(), 3);
    }

    #[test]
    fn test_qualification_conflict_applies_to_every_shift() {
        // One mismatch out of ten flags even shifts with no requirements
        let candidate = Candidate::new("a", "A")
            .with_capabilities(true, true)
            .with_qualifications(9, 10);
        let plain = shift(10, "EM");
        assert!(classify_shift_conflicts(&plain, &candidate).missing_qualification);
    }

    #[test]
    fn test_coverage_percent() {
        assert_eq!(coverage_percent(0, 0), 0);
        assert_eq!(coverage_percent(0, 4), 0);
        assert_eq!(coverage_percent(1, 3), 33);
        assert_eq!(coverage_percent(2, 3), 67);
        assert_eq!(coverage_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(coverage_percent(5, 5), 100);
    }

    #[test]
    fn test_score_excludes_assigned_from_total() {
        let shifts = vec![shift(10, "EM"), shift(10, "PM"), shift(11, "EM"), shift(12, "EM")];
        let candidate = Candidate::new("a", "A")
            .with_can_cover(vec![shift(10, "EM"), shift(10, "PM")])
            .with_cannot_cover(vec![BlockedShift::new(shift(11, "EM"), "Own class")])
            .with_assigned_shifts(vec![shift(10, "PM")]);

        let score = CoverageScorer::new(&shifts).score(&candidate);

        // 10|PM is assigned, 12|EM is not applicable
        assert_eq!(score.shifts_covered, 1);
        assert_eq!(score.total_shifts, 2);
        assert_eq!(score.coverage_percent, 50);
        assert_eq!(score.shifts.len(), 4);
        assert_eq!(score.shifts[1].status, ShiftStatus::Assigned);
        assert_eq!(score.shifts[3].status, ShiftStatus::NotApplicable);
        assert_eq!(
            score.blocked().collect::<Vec<_>>(),
            vec![(&shift(11, "EM"), "Own class")]
        );
    }

    #[test]
    fn test_score_uses_global_assignments() {
        let shifts = vec![shift(10, "EM"), shift(10, "PM")];
        let candidate =
            Candidate::new("a", "A").with_can_cover(vec![shift(10, "EM"), shift(10, "PM")]);

        let assigned: BTreeSet<ShiftKey> = [shift(10, "PM").key()].into_iter().collect();
        let score = CoverageScorer::new(&shifts)
            .with_assigned(assigned)
            .score(&candidate);

        assert_eq!(score.shifts_covered, 1);
        assert_eq!(score.total_shifts, 1);
        assert_eq!(score.coverage_percent, 100);
    }

    #[test]
    fn test_score_tallies_conflicts_on_coverable_shifts_only() {
        let shifts = vec![
            shift(10, "EM").requiring_lifting(),
            shift(11, "EM").requiring_lifting(),
        ];
        let candidate = Candidate::new("a", "A")
            .with_can_cover(vec![shift(10, "EM")])
            .with_cannot_cover(vec![BlockedShift::new(shift(11, "EM"), "Time off")]);

        let score = CoverageScorer::new(&shifts).score(&candidate);
        assert_eq!(score.conflicts.missing_lifting, 1);
        assert_eq!(score.conflicts.total, 1);
    }

    #[test]
    fn test_score_deduplicates_target_shifts() {
        let shifts = vec![shift(10, "EM"), shift(10, "EM")];
        let candidate = Candidate::new("a", "A").with_can_cover(vec![shift(10, "EM")]);
        let score = CoverageScorer::new(&shifts).score(&candidate);
        assert_eq!(score.shifts.len(), 1);
        assert_eq!(score.total_shifts, 1);
    }

    #[test]
    fn test_score_candidates_writes_back_percent() {
        let shifts = vec![shift(10, "EM"), shift(11, "EM")];
        let mut candidates = vec![
            Candidate::new("a", "A")
                .with_can_cover(vec![shift(10, "EM")])
                .with_cannot_cover(vec![BlockedShift::new(shift(11, "EM"), "Time off")]),
            Candidate::new("b", "B")
                .with_can_cover(vec![shift(11, "EM")])
                .with_assigned_shifts(vec![shift(10, "EM")]),
        ];

        let scores = score_candidates(&shifts, &mut candidates);

        // 10|EM is assigned to B, so A only has 11|EM left, which is blocked
        assert_eq!(scores[0].total_shifts, 1);
        assert_eq!(candidates[0].coverage_percent, 0);
        assert_eq!(candidates[1].coverage_percent, 100);
    }

    #[test]
    fn test_restrict_to_shifts_takes_flags_from_list() {
        let shifts = vec![shift(10, "EM").requiring_lifting().with_class_name("Toddlers")];
        let mut candidates = vec![Candidate::new("a", "A")
            .with_can_cover(vec![shift(10, "EM"), shift(11, "EM")])
            .with_cannot_cover(vec![BlockedShift::new(shift(10, "EM"), "Own class")])
            .with_assigned_shifts(vec![shift(12, "EM")])];

        restrict_to_shifts(&shifts, &mut candidates);

        let candidate = &candidates[0];
        assert_eq!(candidate.can_cover, shifts);
        assert!(candidate.cannot_cover[0].shift.lifting_children_required);
        assert_eq!(candidate.cannot_cover[0].reason, "Own class");
        assert!(candidate.assigned_shifts.is_empty());
    }

    #[test]
    fn test_restrict_to_empty_list_is_noop() {
        let mut candidates = vec![Candidate::new("a", "A").with_can_cover(vec![shift(10, "EM")])];
        restrict_to_shifts(&[], &mut candidates);
        assert_eq!(candidates[0].can_cover.len(), 1);
    }

    #[test]
    fn test_rescored_candidates_remain_searchable() {
        // B's only free shift is outside the list, so it drops out of the
        // target along with B
        let shifts = vec![shift(10, "EM")];
        let mut candidates = vec![
            Candidate::new("a", "A")
                .with_coverage_percent(100)
                .with_can_cover(vec![shift(10, "EM")]),
            Candidate::new("b", "B")
                .with_coverage_percent(100)
                .with_can_cover(vec![shift(11, "EM")]),
        ];

        score_candidates(&shifts, &mut candidates);
        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(candidates[0].coverage_percent, 100);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].canonical_key(), "a");
    }

    #[test]
    fn test_score_and_search_agree_on_conflicts() {
        // The candidate's own record omits the lifting requirement
        let shifts = vec![shift(10, "EM").requiring_lifting()];
        let mut candidates = vec![Candidate::new("a", "A")
            .with_capabilities(true, false)
            .with_can_cover(vec![shift(10, "EM")])];

        let scores = score_candidates(&shifts, &mut candidates);
        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(scores[0].conflicts.total, 1);
        assert_eq!(combos[0].total_conflicts, scores[0].conflicts.total);
        assert_eq!(combos[0].assignments[0].conflicts.missing_lifting, 1);
    }
}
