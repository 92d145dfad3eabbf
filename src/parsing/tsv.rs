use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::core::shift::{Shift, DATE_FORMAT};
use crate::parsing::ParseError;
use crate::utils::validation::{
    check_shift_limit, is_valid_time_slot_code, parse_bool_flag, MAX_SHIFTS,
};

/// Parse a TSV/CSV file with columns: date, time_slot_code, [diaper], [lifting], [class]
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_shift_file(path: &Path, delimiter: char) -> Result<Vec<Shift>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_shift_text(&content, delimiter)
}

/// Parse TSV/CSV text with columns: date, time_slot_code, [diaper], [lifting], [class]
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if lines have fewer than 2 fields,
/// contain invalid codes or flags, or no shifts are found,
/// `ParseError::InvalidDate` for unparseable dates, or
/// `ParseError::TooManyShifts` if the limit is exceeded.
pub fn parse_shift_text(text: &str, delimiter: char) -> Result<Vec<Shift>, ParseError> {
    let mut shifts = Vec::new();
    let mut seen = HashSet::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "date" || first == "day" {
                continue;
            }
        }

        // Line numbers in errors are 1-based
        let line_num = i + 1;

        if fields.len() < 2 {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than 2 fields"
            )));
        }

        let date = NaiveDate::parse_from_str(fields[0], DATE_FORMAT).map_err(|_| {
            ParseError::InvalidDate {
                line: line_num,
                value: fields[0].to_string(),
            }
        })?;

        let code = fields[1];
        if !is_valid_time_slot_code(code) {
            return Err(ParseError::InvalidFormat(format!(
                "Invalid time slot code on line {line_num}: '{code}'"
            )));
        }

        let flag = |idx: usize, column: &str| -> Result<bool, ParseError> {
            let Some(value) = fields.get(idx) else {
                return Ok(false);
            };
            parse_bool_flag(value).ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid {column} flag on line {line_num}: '{value}'"
                ))
            })
        };

        let mut shift = Shift::new(date, code);
        shift.diaper_changing_required = flag(2, "diaper_changing_required")?;
        shift.lifting_children_required = flag(3, "lifting_children_required")?;
        if let Some(class_name) = fields.get(4).filter(|s| !s.is_empty()) {
            shift.class_name = Some((*class_name).to_string());
        }

        if !seen.insert(shift.key()) {
            warn!(line = line_num, shift = %shift.key(), "Duplicate shift, ignoring");
            continue;
        }

        if check_shift_limit(shifts.len()).is_some() {
            return Err(ParseError::TooManyShifts(MAX_SHIFTS));
        }

        shifts.push(shift);
    }

    if shifts.is_empty() {
        return Err(ParseError::InvalidFormat("No shifts found in file".to_string()));
    }

    Ok(shifts)
}
