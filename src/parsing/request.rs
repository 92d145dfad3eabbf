use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::candidate::Candidate;
use crate::core::shift::Shift;
use crate::parsing::ParseError;
use crate::utils::validation::{validate_candidates, validate_shifts, MAX_CANDIDATES, MAX_SHIFTS};

/// Everything one coverage search needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoverageRequest {
    /// Shifts needing coverage. When present, candidates are rescored
    /// against them before searching.
    #[serde(default)]
    pub shifts: Vec<Shift>,

    pub candidates: Vec<Candidate>,

    /// Number of combinations wanted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Parse a JSON coverage request from a file, or from stdin when the path is `-`
///
/// # Errors
///
/// Returns `ParseError::Io` if the input cannot be read, or other parse
/// errors if the content is invalid.
pub fn parse_request_file(path: &Path) -> Result<CoverageRequest, ParseError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_request_text(&content)
}

/// Parse a JSON coverage request, rebuild candidate indexes and validate it
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON, `TooManyCandidates` /
/// `TooManyShifts` when limits are exceeded, or `Validation` for invalid
/// records.
pub fn parse_request_text(text: &str) -> Result<CoverageRequest, ParseError> {
    let mut request: CoverageRequest = serde_json::from_str(text)?;

    if request.candidates.len() > MAX_CANDIDATES {
        return Err(ParseError::TooManyCandidates(MAX_CANDIDATES));
    }
    if request.shifts.len() > MAX_SHIFTS {
        return Err(ParseError::TooManyShifts(MAX_SHIFTS));
    }

    for candidate in &mut request.candidates {
        candidate.rebuild_indexes();
    }

    validate_shifts(&request.shifts)?;
    validate_candidates(&request.candidates)?;

    Ok(request)
}
