//! # sub-finder
//!
//! A library for finding substitute staff to cover shifts left open by a
//! childcare teacher's time off.
//!
//! When a teacher is out, the director needs subs for every early-morning,
//! mid-day and late slot they would have worked. Each substitute can take
//! some of those shifts and not others, and some lack the lifting or
//! diaper-changing ability a room needs. Often no single sub is free for
//! everything, so the director needs a small team whose availability adds up.
//!
//! `sub-finder` scores each candidate against the open shifts and searches
//! for the smallest, least-conflicted groups of candidates that cover all of
//! them.
//!
//! ## Features
//!
//! - **Coverage scoring**: Per-candidate coverage percent over the shifts still open
//! - **Conflict classification**: Diaper-changing, lifting and qualification gaps per shift
//! - **Combination search**: Exact search for candidate sets covering every open shift
//! - **Global assignment**: Shifts already assigned to anyone are removed from the search
//! - **Diagnosis**: Which shifts nobody can take, and why
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sub_finder::{find_top_combinations, Candidate, Shift};
//!
//! let tuesday = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
//! let early = Shift::new(tuesday, "EM");
//! let late = Shift::new(tuesday, "LA").requiring_lifting();
//!
//! let candidates = vec![
//!     Candidate::new("s1", "Sam")
//!         .with_coverage_percent(50)
//!         .with_can_cover(vec![early]),
//!     Candidate::new("s2", "Riley")
//!         .with_capabilities(true, true)
//!         .with_coverage_percent(50)
//!         .with_can_cover(vec![late]),
//! ];
//!
//! let combinations = find_top_combinations(&candidates, 5);
//! assert_eq!(combinations.len(), 1);
//! assert_eq!(combinations[0].sub_count(), 2);
//! assert_eq!(combinations[0].total_conflicts, 0);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Shifts, candidates and conflict types
//! - [`matching`]: Coverage scoring, combination search and diagnosis
//! - [`parsing`]: JSON request and TSV/CSV shift list loaders
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::candidate::Candidate;
pub use crate::core::shift::{BlockedShift, Shift, ShiftKey};
pub use crate::core::types::*;
pub use matching::combination::{Assignment, Combination};
pub use matching::engine::{
    find_top_combinations, uncovered_shift_keys, CombinationEngine, SearchConfig,
};
pub use matching::scoring::{restrict_to_shifts, score_candidates, CoverageScore, CoverageScorer};
