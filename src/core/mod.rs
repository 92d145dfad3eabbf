//! Core data types for substitute coverage.
//!
//! - [`Shift`] and [`ShiftKey`]: a time slot on a date needing coverage
//! - [`BlockedShift`]: a shift a candidate cannot take, with the reason
//! - [`Candidate`]: a substitute with capability flags and shift lists
//! - [`CandidateId`], [`ShiftConflicts`], [`ConflictCounts`]: scoring types
//!
//! ## Shift Identity
//!
//! Shifts are identified by `(date, time_slot_code)` only. Requirement flags
//! and class names ride along but never affect identity, so the same slot
//! listed by two candidates is one shift.
//!
//! [`Shift`]: shift::Shift
//! [`ShiftKey`]: shift::ShiftKey
//! [`BlockedShift`]: shift::BlockedShift
//! [`Candidate`]: candidate::Candidate
//! [`CandidateId`]: types::CandidateId
//! [`ShiftConflicts`]: types::ShiftConflicts
//! [`ConflictCounts`]: types::ConflictCounts

pub mod candidate;
pub mod shift;
pub mod types;
