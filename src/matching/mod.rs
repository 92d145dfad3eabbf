//! Coverage scoring and combination search.
//!
//! - [`CoverageScorer`]: classifies one candidate's shifts and computes its coverage percent
//! - [`CombinationEngine`]: finds candidate sets that jointly cover every open shift
//! - [`Combination`]: a ranked, fully allocated set of substitutes
//! - [`CoverageDiagnosis`]: per-shift explanation when no combination exists
//!
//! ## Search Algorithm
//!
//! 1. **Uncovered set**: every shift any candidate lists, minus every shift
//!    assigned to anyone
//! 2. **Pool**: candidates with positive coverage and a non-empty share of
//!    the uncovered set, largest share first
//! 3. **DFS**: index-increasing subsets of the pool; a candidate joins only
//!    if it adds new shifts, and a subset stops growing once it covers
//!    everything
//! 4. **Allocation**: each shift goes to the member with the fewest
//!    conflicts for it, ties to higher coverage percent
//! 5. **Ranking**: fewest conflicts, then fewest subs, then most shifts
//!
//! Partial solutions are never returned. An empty result means no subset of
//! candidates covers every open shift.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sub_finder::{find_top_combinations, Candidate, Shift};
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
//! let candidates = vec![
//!     Candidate::new("s1", "Sam")
//!         .with_coverage_percent(100)
//!         .with_can_cover(vec![Shift::new(monday, "EM")]),
//! ];
//!
//! let combinations = find_top_combinations(&candidates, 5);
//! assert_eq!(combinations.len(), 1);
//! assert!(combinations[0].is_single_sub());
//! ```

pub mod combination;
pub mod diagnosis;
pub mod engine;
pub mod scoring;

pub use combination::{Assignment, Combination, CoveredShift};
pub use diagnosis::{CoverageDiagnosis, Suggestion};
pub use engine::{CombinationEngine, SearchConfig, SearchOutcome};
pub use scoring::{CoverageScore, CoverageScorer, ShiftStatus};
