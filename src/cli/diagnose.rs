//! Diagnose command - explain per-shift coverage of the open shifts.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_request, OutputFormat};
use crate::matching::diagnosis::{CoverageDiagnosis, Suggestion};
use crate::matching::scoring::{restrict_to_shifts, score_candidates};

/// Arguments for the diagnose command
#[derive(Args)]
pub struct DiagnoseArgs {
    /// Coverage request (JSON with shifts and candidates)
    /// Use '-' for stdin
    #[arg(required = true)]
    pub request: PathBuf,

    /// Shift list (TSV or CSV) replacing the request's shifts
    #[arg(long)]
    pub shifts: Option<PathBuf>,

    /// Use the coverage percents in the request instead of rescoring
    #[arg(long)]
    pub no_rescore: bool,
}

/// Execute the diagnose command
///
/// # Errors
///
/// Returns an error if the request cannot be loaded or output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiagnoseArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut request = load_request(&args.request, args.shifts.as_deref())?;

    restrict_to_shifts(&request.shifts, &mut request.candidates);
    if !request.shifts.is_empty() && !args.no_rescore {
        score_candidates(&request.shifts, &mut request.candidates);
    }

    let diagnosis = CoverageDiagnosis::analyze(&request.candidates);

    if verbose {
        eprintln!(
            "{} shifts listed, {} already assigned",
            diagnosis.total_shifts, diagnosis.assigned_shifts
        );
    }

    match format {
        OutputFormat::Text => print_text(&diagnosis),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diagnosis)?),
        OutputFormat::Tsv => print_tsv(&diagnosis),
    }

    Ok(())
}

fn print_text(diagnosis: &CoverageDiagnosis) {
    println!(
        "Shifts: {} total, {} assigned, {} open",
        diagnosis.total_shifts,
        diagnosis.assigned_shifts,
        diagnosis.shifts.len()
    );

    for shift in &diagnosis.shifts {
        let ids: Vec<&str> = shift.coverers.iter().map(|id| id.as_str()).collect();
        if ids.is_empty() {
            println!("\n   {}: NO AVAILABLE SUB", shift.key);
        } else {
            println!("\n   {}: {} available ({})", shift.key, ids.len(), ids.join(", "));
        }
        for blocked in &shift.blocked {
            println!("      {} cannot: {}", blocked.candidate_id, blocked.reason);
        }
    }

    if !diagnosis.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &diagnosis.suggestions {
            match suggestion {
                Suggestion::FindMoreSubs { shifts } => {
                    let keys: Vec<String> = shifts.iter().map(ToString::to_string).collect();
                    println!(
                        "   No combination can cover everything. Find more subs for: {}",
                        keys.join(", ")
                    );
                }
                Suggestion::SingleSubAvailable { candidate_id } => {
                    println!("   {candidate_id} can cover every open shift alone");
                }
                Suggestion::NothingToCover => {
                    println!("   Every shift is already assigned");
                }
            }
        }
    }
}

fn print_tsv(diagnosis: &CoverageDiagnosis) {
    println!("shift\tavailable\tcoverers\tblocked");
    for shift in &diagnosis.shifts {
        let ids: Vec<&str> = shift.coverers.iter().map(|id| id.as_str()).collect();
        let blocked: Vec<String> = shift
            .blocked
            .iter()
            .map(|b| format!("{}: {}", b.candidate_id, b.reason))
            .collect();
        println!(
            "{}\t{}\t{}\t{}",
            shift.key,
            ids.len(),
            ids.join(","),
            blocked.join("; ")
        );
    }
}
