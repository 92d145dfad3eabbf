//! Loaders for coverage requests and shift lists.
//!
//! - **JSON requests** ([`request`]): shifts, candidates and an optional
//!   result limit in one document
//! - **TSV/CSV shift lists** ([`tsv`]): one shift per line
//!
//! ## Example
//!
//! ```rust,no_run
//! use sub_finder::parsing::request::parse_request_file;
//! use sub_finder::find_top_combinations;
//! use std::path::Path;
//!
//! let request = parse_request_file(Path::new("absence.json")).unwrap();
//! let combinations = find_top_combinations(&request.candidates, 5);
//! ```
//!
//! ## Shift List Columns
//!
//! | Column | Description | Required |
//! |--------|-------------|----------|
//! | date | ISO date (`YYYY-MM-DD`) | Yes |
//! | time_slot_code | Slot within the day, e.g. `EM` | Yes |
//! | diaper_changing_required | yes/no, true/false, 1/0 | No |
//! | lifting_children_required | yes/no, true/false, 1/0 | No |
//! | class_name | Classroom tag | No |

use crate::utils::validation::ValidationError;

pub mod request;
pub mod tsv;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid date on line {line}: '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("Too many candidates: exceeds maximum of {0}")]
    TooManyCandidates(usize),

    #[error("Too many shifts: exceeds maximum of {0}")]
    TooManyShifts(usize),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}
