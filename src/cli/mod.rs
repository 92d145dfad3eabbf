//! Command-line interface for sub-finder.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **find**: Find combinations of substitutes covering every open shift
//! - **score**: Report each candidate's coverage of the shift set
//! - **diagnose**: Explain which shifts can and cannot be covered
//!
//! ## Usage
//!
//! ```text
//! # Top 5 combinations for an absence
//! sub-finder find absence.json
//!
//! # Replace the request's shifts with a shift list
//! sub-finder find absence.json --shifts week.tsv -n 3
//!
//! # JSON output for scripting
//! sub-finder find absence.json --format json
//!
//! # Why is there no combination?
//! sub-finder diagnose absence.json
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::core::types::ShiftConflicts;
use crate::parsing::request::{parse_request_file, CoverageRequest};
use crate::parsing::tsv::parse_shift_file;

pub mod diagnose;
pub mod find;
pub mod score;

#[derive(Parser)]
#[command(name = "sub-finder")]
#[command(version)]
#[command(about = "Find substitute staff to cover vacated childcare shifts")]
#[command(
    long_about = "sub-finder matches a pool of substitute candidates against the shifts left open by a teacher's absence.\n\nIt reports:\n- Each candidate's coverage of the open shifts\n- The best combinations of subs that cover every shift, fewest conflicts first\n- Which shifts nobody can take when no combination exists"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find combinations of subs that cover every open shift
    Find(find::FindArgs),

    /// Score each candidate's coverage of the shift set
    Score(score::ScoreArgs),

    /// Explain per-shift coverage
    Diagnose(diagnose::DiagnoseArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a request, replacing its shifts with a TSV/CSV shift list if given
fn load_request(request: &Path, shifts: Option<&Path>) -> anyhow::Result<CoverageRequest> {
    let mut loaded = parse_request_file(request)?;

    if let Some(path) = shifts {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ',',
            _ => '\t',
        };
        loaded.shifts = parse_shift_file(path, delimiter)?;
    }

    Ok(loaded)
}

/// Short human-readable labels for a shift's conflicts
fn conflict_labels(conflicts: &ShiftConflicts) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if conflicts.missing_diaper_changing {
        labels.push("no diaper changing");
    }
    if conflicts.missing_lifting {
        labels.push("no lifting");
    }
    if conflicts.missing_qualification {
        labels.push("qualification gap");
    }
    labels
}
