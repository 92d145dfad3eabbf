//! Centralized validation and helper functions.

use std::collections::HashSet;

use crate::core::candidate::Candidate;
use crate::core::shift::Shift;

/// Maximum number of candidates allowed in a single request (DOS protection)
pub const MAX_CANDIDATES: usize = 10_000;

/// Maximum number of shifts allowed in a single shift list (DOS protection)
pub const MAX_SHIFTS: usize = 10_000;

/// Maximum length of a time slot code
pub const MAX_TIME_SLOT_CODE_LENGTH: usize = 16;

/// Validate a time slot code: 1-16 ASCII letters, digits, '-' or '_'.
///
/// # Examples
///
/// ```
/// use sub_finder::utils::validation::is_valid_time_slot_code;
///
/// assert!(is_valid_time_slot_code("EM"));
/// assert!(is_valid_time_slot_code("late_pm"));
/// assert!(!is_valid_time_slot_code(""));
/// assert!(!is_valid_time_slot_code("EM|PM"));
/// ```
#[must_use]
pub fn is_valid_time_slot_code(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_TIME_SLOT_CODE_LENGTH
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse a yes/no style flag from a tabular field. Empty means false.
#[must_use]
pub fn parse_bool_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Some(false),
        "true" | "yes" | "y" | "1" => Some(true),
        _ => None,
    }
}

/// Check if adding another shift would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new shift.
#[must_use]
pub fn check_shift_limit(count: usize) -> Option<String> {
    if count >= MAX_SHIFTS {
        Some(format!(
            "Too many shifts: adding another would exceed maximum of {MAX_SHIFTS}"
        ))
    } else {
        None
    }
}

/// Input validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Candidate at position {0} has an empty id")]
    EmptyCandidateId(usize),
    #[error("Duplicate candidate id: {0}")]
    DuplicateCandidateId(String),
    #[error("Invalid time slot code '{code}' on {date}")]
    InvalidTimeSlotCode { date: String, code: String },
    #[error("Candidate {id}: {matches} qualification matches exceed total of {total}")]
    QualificationCountMismatch { id: String, matches: u32, total: u32 },
    #[error("Candidate {id}: coverage percent {percent} is above 100")]
    CoveragePercentOutOfRange { id: String, percent: u8 },
}

fn validate_shift(shift: &Shift) -> Result<(), ValidationError> {
    if is_valid_time_slot_code(&shift.time_slot_code) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeSlotCode {
            date: shift.date.to_string(),
            code: shift.time_slot_code.clone(),
        })
    }
}

/// Validate a list of shifts
///
/// # Errors
///
/// Returns `ValidationError::InvalidTimeSlotCode` for the first shift with a
/// malformed time slot code.
pub fn validate_shifts(shifts: &[Shift]) -> Result<(), ValidationError> {
    shifts.iter().try_for_each(validate_shift)
}

/// Validate candidate records before they reach the scorer or search.
///
/// Overlapping lists (a key both coverable and assigned) are left alone;
/// the search resolves those by letting the assignment win.
///
/// # Errors
///
/// Returns the first `ValidationError` found, in candidate order.
pub fn validate_candidates(candidates: &[Candidate]) -> Result<(), ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, candidate) in candidates.iter().enumerate() {
        let id = candidate.id.as_str();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyCandidateId(i));
        }
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateCandidateId(id.to_string()));
        }
        if candidate.qualification_matches > candidate.qualification_total {
            return Err(ValidationError::QualificationCountMismatch {
                id: id.to_string(),
                matches: candidate.qualification_matches,
                total: candidate.qualification_total,
            });
        }
        if candidate.coverage_percent > 100 {
            return Err(ValidationError::CoveragePercentOutOfRange {
                id: id.to_string(),
                percent: candidate.coverage_percent,
            });
        }

        validate_shifts(&candidate.can_cover)?;
        validate_shifts(&candidate.assigned_shifts)?;
        candidate
            .cannot_cover
            .iter()
            .try_for_each(|b| validate_shift(&b.shift))?;
    }

    Ok(())
}
