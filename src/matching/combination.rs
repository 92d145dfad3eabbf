use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::candidate::Candidate;
use crate::core::shift::{Shift, ShiftKey};
use crate::core::types::{CandidateId, ConflictCounts, ShiftConflicts};
use crate::matching::scoring::{classify_shift_conflicts, coverage_percent};

/// A shift allocated to a candidate within a combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredShift {
    pub shift: Shift,
    pub conflicts: ShiftConflicts,
}

/// One candidate and the shifts it takes in a combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub candidate_id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub coverage_percent: u8,
    pub shifts: Vec<CoveredShift>,
    pub conflicts: ConflictCounts,
}

impl Assignment {
    fn new(candidate: &Candidate, shifts: Vec<CoveredShift>) -> Self {
        let conflicts = shifts.iter().map(|s| s.conflicts).collect();
        Self {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            phone: candidate.phone.clone(),
            coverage_percent: candidate.coverage_percent,
            shifts,
            conflicts,
        }
    }

    #[must_use]
    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }
}

/// A set of candidates whose allocated shifts are disjoint and together
/// cover the uncovered-shift set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub assignments: Vec<Assignment>,
    pub total_shifts_covered: usize,
    pub total_shifts_needed: usize,
    pub total_conflicts: usize,
    pub coverage_percent: u8,
}

impl Combination {
    /// Allocate every uncovered shift to one of the selected candidates.
    ///
    /// Each shift goes to the selected candidate with the fewest conflicts
    /// for it, then the highest coverage percent, then the earliest in
    /// `selected`. Candidates left without shifts are dropped. Returns
    /// `None` if some shift has no able candidate in `selected`.
    #[must_use]
    pub fn materialize(selected: &[&Candidate], uncovered: &BTreeSet<ShiftKey>) -> Option<Self> {
        let mut buckets: Vec<Vec<CoveredShift>> = vec![Vec::new(); selected.len()];

        for key in uncovered {
            let mut best: Option<(usize, &Shift, ShiftConflicts)> = None;

            for (idx, candidate) in selected.iter().enumerate() {
                let Some(shift) = candidate.coverable_shift(key) else {
                    continue;
                };
                let conflicts = classify_shift_conflicts(shift, candidate);

                let better = match &best {
                    None => true,
                    Some((best_idx, _, best_conflicts)) => {
                        match conflicts.count().cmp(&best_conflicts.count()) {
                            Ordering::Less => true,
                            Ordering::Greater => false,
                            Ordering::Equal => {
                                candidate.coverage_percent > selected[*best_idx].coverage_percent
                            }
                        }
                    }
                };
                if better {
                    best = Some((idx, shift, conflicts));
                }
            }

            let Some((idx, shift, conflicts)) = best else {
                debug!("No selected candidate can cover {key}, discarding combination");
                return None;
            };
            buckets[idx].push(CoveredShift {
                shift: shift.clone(),
                conflicts,
            });
        }

        let assignments: Vec<Assignment> = selected
            .iter()
            .zip(buckets)
            .filter(|(_, shifts)| !shifts.is_empty())
            .map(|(candidate, shifts)| Assignment::new(candidate, shifts))
            .collect();

        let total_shifts_covered = assignments.iter().map(Assignment::shift_count).sum();
        let total_conflicts = assignments.iter().map(|a| a.conflicts.total).sum();
        let total_shifts_needed = uncovered.len();

        Some(Self {
            assignments,
            total_shifts_covered,
            total_shifts_needed,
            total_conflicts,
            coverage_percent: coverage_percent(total_shifts_covered, total_shifts_needed),
        })
    }

    /// Number of substitutes in the combination
    #[must_use]
    pub fn sub_count(&self) -> usize {
        self.assignments.len()
    }

    /// A single substitute covering everything
    #[must_use]
    pub fn is_single_sub(&self) -> bool {
        self.assignments.len() == 1
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_shifts_covered == self.total_shifts_needed
    }

    /// Candidate IDs sorted, independent of allocation order
    #[must_use]
    pub fn candidate_ids(&self) -> Vec<&CandidateId> {
        let mut ids: Vec<&CandidateId> = self.assignments.iter().map(|a| &a.candidate_id).collect();
        ids.sort();
        ids
    }

    /// Identity of the combination: its sorted candidate set
    #[must_use]
    pub fn canonical_key(&self) -> String {
        self.candidate_ids()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    #[must_use]
    pub fn covered_keys(&self) -> BTreeSet<ShiftKey> {
        self.assignments
            .iter()
            .flat_map(|a| a.shifts.iter().map(|s| s.shift.key()))
            .collect()
    }

    #[must_use]
    pub fn conflict_counts(&self) -> ConflictCounts {
        let mut counts = ConflictCounts::default();
        for assignment in &self.assignments {
            counts.merge(&assignment.conflicts);
        }
        counts
    }

    /// Ranking order: fewest conflicts, fewest subs, most shifts covered
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total_conflicts
            .cmp(&other.total_conflicts)
            .then_with(|| self.sub_count().cmp(&other.sub_count()))
            .then_with(|| other.total_shifts_covered.cmp(&self.total_shifts_covered))
    }
}
