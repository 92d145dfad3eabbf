use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::candidate::Candidate;
use crate::core::shift::{Shift, ShiftKey};
use crate::matching::combination::Combination;

/// Default number of combinations returned by a search
pub const DEFAULT_LIMIT: usize = 5;

/// Default cap on DFS node visits
pub const DEFAULT_MAX_NODES: usize = 200_000;

/// Configuration for the combination search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of combinations to collect and return
    pub limit: usize,
    /// Maximum number of candidate extensions the DFS may try
    pub max_nodes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}

/// Result of a search along with bookkeeping about how it ran
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Full-coverage combinations, best first
    pub combinations: Vec<Combination>,
    /// Size of the uncovered-shift set
    pub shifts_needed: usize,
    /// Candidates that entered the DFS
    pub candidates_considered: usize,
    pub nodes_visited: usize,
    /// True if the search stopped on the node cap rather than finishing
    pub node_limit_reached: bool,
}

/// Every shift key any candidate lists as coverable or blocked, minus every
/// key assigned to any candidate.
#[must_use]
pub fn uncovered_shift_keys(candidates: &[Candidate]) -> BTreeSet<ShiftKey> {
    let assigned: BTreeSet<ShiftKey> = candidates
        .iter()
        .flat_map(|c| c.assigned_shifts.iter().map(Shift::key))
        .collect();

    candidates
        .iter()
        .flat_map(Candidate::eligible_keys)
        .filter(|key| !assigned.contains(key))
        .collect()
}

/// Find up to `limit` combinations of candidates that jointly cover every
/// uncovered shift, best first.
#[must_use]
pub fn find_top_combinations(candidates: &[Candidate], limit: usize) -> Vec<Combination> {
    CombinationEngine::with_config(candidates, SearchConfig::default().with_limit(limit))
        .find_top_combinations()
}

/// A candidate with its share of the uncovered-shift set
struct PoolEntry<'c> {
    candidate: &'c Candidate,
    coverage: BTreeSet<ShiftKey>,
}

/// Accumulates results across the DFS. Covered sets and selections are
/// passed down the call stack instead.
struct Collector {
    found: Vec<Combination>,
    seen: HashSet<String>,
    nodes_visited: usize,
    limit: usize,
    max_nodes: usize,
    node_limit_reached: bool,
}

impl Collector {
    fn is_done(&self) -> bool {
        self.found.len() >= self.limit || self.node_limit_reached
    }

    fn offer(&mut self, pool: &[PoolEntry<'_>], selected: &[usize], target: &BTreeSet<ShiftKey>) {
        let chosen: Vec<&Candidate> = selected.iter().map(|&i| pool[i].candidate).collect();
        let Some(combination) = Combination::materialize(&chosen, target) else {
            return;
        };
        if self.seen.insert(combination.canonical_key()) {
            self.found.push(combination);
        }
    }
}

/// Exhaustive search for minimal candidate sets covering all open shifts
pub struct CombinationEngine<'a> {
    candidates: &'a [Candidate],
    config: SearchConfig,
}

impl<'a> CombinationEngine<'a> {
    /// Create an engine with default configuration
    pub fn new(candidates: &'a [Candidate]) -> Self {
        Self {
            candidates,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(candidates: &'a [Candidate], config: SearchConfig) -> Self {
        Self { candidates, config }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn find_top_combinations(&self) -> Vec<Combination> {
        self.search().combinations
    }

    #[must_use]
    pub fn search(&self) -> SearchOutcome {
        let target = uncovered_shift_keys(self.candidates);
        let mut outcome = SearchOutcome {
            combinations: Vec::new(),
            shifts_needed: target.len(),
            candidates_considered: 0,
            nodes_visited: 0,
            node_limit_reached: false,
        };

        if target.is_empty() || self.config.limit == 0 {
            debug!("Nothing to search: {} uncovered shifts", target.len());
            return outcome;
        }

        let pool = self.build_pool(&target);
        outcome.candidates_considered = pool.len();
        debug!(
            "Searching {} candidates for {} uncovered shifts",
            pool.len(),
            target.len()
        );

        let mut collector = Collector {
            found: Vec::new(),
            seen: HashSet::new(),
            nodes_visited: 0,
            limit: self.config.limit,
            max_nodes: self.config.max_nodes,
            node_limit_reached: false,
        };
        extend(&pool, &target, 0, &[], &BTreeSet::new(), &mut collector);

        if collector.node_limit_reached {
            warn!(
                "Combination search stopped after {} nodes with {} of {} combinations found",
                collector.nodes_visited,
                collector.found.len(),
                self.config.limit
            );
        }
        debug!(
            "Visited {} nodes, found {} combinations",
            collector.nodes_visited,
            collector.found.len()
        );

        let mut combinations = collector.found;
        combinations.sort_by(Combination::rank_cmp);
        combinations.truncate(self.config.limit);

        outcome.combinations = combinations;
        outcome.nodes_visited = collector.nodes_visited;
        outcome.node_limit_reached = collector.node_limit_reached;
        outcome
    }

    /// Candidates with positive coverage and a non-empty share of `target`,
    /// largest share first. This order only prunes the search early; it is
    /// not the final ranking.
    fn build_pool(&self, target: &BTreeSet<ShiftKey>) -> Vec<PoolEntry<'a>> {
        let mut pool: Vec<PoolEntry<'a>> = self
            .candidates
            .iter()
            .filter(|c| c.coverage_percent > 0)
            .filter_map(|candidate| {
                let coverage: BTreeSet<ShiftKey> = candidate
                    .can_cover_keys()
                    .into_iter()
                    .filter(|key| target.contains(key))
                    .collect();
                (!coverage.is_empty()).then_some(PoolEntry {
                    candidate,
                    coverage,
                })
            })
            .collect();

        pool.sort_by(|a, b| {
            b.coverage
                .len()
                .cmp(&a.coverage.len())
                .then_with(|| b.candidate.coverage_percent.cmp(&a.candidate.coverage_percent))
        });
        pool
    }
}

/// Try each candidate from `start` on as the next member of the selection.
///
/// A candidate that adds no new shifts is skipped. A selection whose union
/// reaches `target` is offered to the collector and not extended further.
fn extend(
    pool: &[PoolEntry<'_>],
    target: &BTreeSet<ShiftKey>,
    start: usize,
    selected: &[usize],
    covered: &BTreeSet<ShiftKey>,
    collector: &mut Collector,
) {
    for idx in start..pool.len() {
        if collector.is_done() {
            return;
        }
        if collector.nodes_visited >= collector.max_nodes {
            collector.node_limit_reached = true;
            return;
        }
        collector.nodes_visited += 1;

        let entry = &pool[idx];
        if entry.coverage.is_subset(covered) {
            continue;
        }

        let next_covered: BTreeSet<ShiftKey> = covered.union(&entry.coverage).cloned().collect();
        let mut next_selected = selected.to_vec();
        next_selected.push(idx);

        if next_covered.len() == target.len() {
            collector.offer(pool, &next_selected, target);
        } else {
            extend(pool, target, idx + 1, &next_selected, &next_covered, collector);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shift::BlockedShift;
    use chrono::NaiveDate;

    fn shift(day: u32, code: &str) -> Shift {
        Shift::new(NaiveDate::from_ymd_opt(2026, 2, day).unwrap(), code)
    }

    fn sub(id: &str, pct: u8, shifts: Vec<Shift>) -> Candidate {
        Candidate::new(id, id.to_uppercase())
            .with_capabilities(true, true)
            .with_coverage_percent(pct)
            .with_can_cover(shifts)
    }

    #[test]
    fn test_single_sub_covers_single_shift() {
        let candidates = vec![sub("a", 100, vec![shift(10, "EM")])];

        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].sub_count(), 1);
        assert_eq!(combos[0].assignments[0].shift_count(), 1);
        assert_eq!(combos[0].total_shifts_covered, 1);
        assert_eq!(combos[0].total_conflicts, 0);
        assert!(combos[0].is_single_sub());
    }

    #[test]
    fn test_two_complementary_subs() {
        let candidates = vec![
            sub("a", 100, vec![shift(10, "EM")]),
            sub("b", 100, vec![shift(11, "EM")]),
        ];

        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].sub_count(), 2);
        assert_eq!(combos[0].total_shifts_covered, 2);
        assert_eq!(combos[0].canonical_key(), "a,b");
    }

    #[test]
    fn test_conflicted_coverage_still_returned() {
        let candidates = vec![Candidate::new("a", "A")
            .with_capabilities(true, false)
            .with_coverage_percent(100)
            .with_can_cover(vec![shift(10, "EM").requiring_lifting()])];

        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].total_conflicts, 1);
        assert_eq!(combos[0].assignments[0].conflicts.missing_lifting, 1);
    }

    #[test]
    fn test_assigned_shift_excluded_globally() {
        let candidates = vec![
            sub("a", 100, vec![shift(10, "EM"), shift(11, "EM")]),
            sub("b", 100, vec![shift(12, "EM")]).with_assigned_shifts(vec![shift(11, "EM")]),
        ];

        let target = uncovered_shift_keys(&candidates);
        assert!(!target.contains(&shift(11, "EM").key()));

        let combos = find_top_combinations(&candidates, 5);
        assert!(!combos.is_empty());
        for combo in &combos {
            assert!(!combo.covered_keys().contains(&shift(11, "EM").key()));
            assert_eq!(combo.total_shifts_needed, 2);
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_top_combinations(&[], 5).is_empty());

        let zero = vec![sub("a", 0, vec![shift(10, "EM")])];
        assert!(find_top_combinations(&zero, 5).is_empty());

        let all_assigned = vec![sub("a", 100, vec![shift(10, "EM")])
            .with_assigned_shifts(vec![shift(10, "EM")])];
        assert!(find_top_combinations(&all_assigned, 5).is_empty());
    }

    #[test]
    fn test_zero_limit_returns_nothing() {
        let candidates = vec![sub("a", 100, vec![shift(10, "EM")])];
        assert!(find_top_combinations(&candidates, 0).is_empty());
    }

    #[test]
    fn test_no_partial_combinations() {
        // 12|EM is only ever blocked, so nobody can complete the set
        let candidates = vec![
            sub("a", 50, vec![shift(10, "EM")])
                .with_cannot_cover(vec![BlockedShift::new(shift(12, "EM"), "Time off")]),
            sub("b", 100, vec![shift(11, "EM")]),
        ];
        assert!(find_top_combinations(&candidates, 5).is_empty());
    }

    #[test]
    fn test_ranking_prefers_fewer_conflicts_then_fewer_subs() {
        let s1 = shift(10, "EM").requiring_lifting();
        let s2 = shift(11, "EM");
        let candidates = vec![
            // Covers both but cannot lift
            Candidate::new("solo", "Solo")
                .with_capabilities(true, false)
                .with_coverage_percent(100)
                .with_can_cover(vec![s1.clone(), s2.clone()]),
            sub("lift", 100, vec![s1.clone()]),
            sub("late", 100, vec![s2.clone()]),
        ];

        let combos = find_top_combinations(&candidates, 5);

        assert_eq!(combos[0].total_conflicts, 0);
        assert_eq!(combos[0].canonical_key(), "late,lift");
        assert!(combos.iter().any(|c| c.canonical_key() == "solo"));
        for pair in combos.windows(2) {
            assert_ne!(pair[0].rank_cmp(&pair[1]), std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn test_limit_caps_results() {
        let s = shift(10, "EM");
        let candidates: Vec<Candidate> = (0..10)
            .map(|i| sub(&format!("c{i}"), 100, vec![s.clone()]))
            .collect();

        let combos = find_top_combinations(&candidates, 3);
        assert_eq!(combos.len(), 3);
    }

    #[test]
    fn test_redundant_candidate_not_added() {
        let candidates = vec![
            sub("wide", 100, vec![shift(10, "EM"), shift(11, "EM")]),
            sub("narrow", 100, vec![shift(10, "EM")]),
        ];
        let combos = find_top_combinations(&candidates, 5);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].canonical_key(), "wide");
    }

    #[test]
    fn test_node_cap_stops_search() {
        let candidates: Vec<Candidate> = (0..12)
            .map(|i| sub(&format!("c{i:02}"), 50, vec![shift(1 + i, "EM")]))
            .collect();

        let engine = CombinationEngine::with_config(
            &candidates,
            SearchConfig::default().with_max_nodes(5),
        );
        let outcome = engine.search();

        assert!(outcome.node_limit_reached);
        assert_eq!(outcome.nodes_visited, 5);
        assert!(outcome.combinations.is_empty());
    }

    #[test]
    fn test_search_outcome_bookkeeping() {
        let candidates = vec![
            sub("a", 100, vec![shift(10, "EM")]),
            sub("b", 100, vec![shift(11, "EM")]),
            sub("idle", 0, vec![shift(11, "EM")]),
        ];
        let outcome = CombinationEngine::new(&candidates).search();
        assert_eq!(outcome.shifts_needed, 2);
        assert_eq!(outcome.candidates_considered, 2);
        assert!(!outcome.node_limit_reached);
        assert_eq!(outcome.combinations.len(), 1);
    }
}
