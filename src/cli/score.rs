//! Score command - report each candidate's coverage of the shift set.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_request, OutputFormat};
use crate::core::candidate::Candidate;
use crate::matching::scoring::{score_candidates, CoverageScore};

/// Arguments for the score command
#[derive(Args)]
pub struct ScoreArgs {
    /// Coverage request (JSON with shifts and candidates)
    /// Use '-' for stdin
    #[arg(required = true)]
    pub request: PathBuf,

    /// Shift list (TSV or CSV) replacing the request's shifts
    #[arg(long)]
    pub shifts: Option<PathBuf>,

    /// Only show candidates with at least this coverage percent
    #[arg(long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_coverage: u8,
}

/// Execute the score command
///
/// # Errors
///
/// Returns an error if the request cannot be loaded, has no shifts, or
/// output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ScoreArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut request = load_request(&args.request, args.shifts.as_deref())?;

    if request.shifts.is_empty() {
        anyhow::bail!(
            "No shifts to score against: add \"shifts\" to the request or pass --shifts"
        );
    }

    let scores = score_candidates(&request.shifts, &mut request.candidates);

    if verbose {
        eprintln!(
            "Scored {} candidates against {} shifts",
            scores.len(),
            request.shifts.len()
        );
    }

    // Highest coverage first; input order breaks ties
    let mut rows: Vec<(&Candidate, &CoverageScore)> = request
        .candidates
        .iter()
        .zip(&scores)
        .filter(|(_, score)| score.coverage_percent >= args.min_coverage)
        .collect();
    rows.sort_by(|a, b| b.1.coverage_percent.cmp(&a.1.coverage_percent));

    match format {
        OutputFormat::Text => print_text(&rows),
        OutputFormat::Json => {
            let scores: Vec<&CoverageScore> = rows.iter().map(|(_, s)| *s).collect();
            println!("{}", serde_json::to_string_pretty(&scores)?);
        }
        OutputFormat::Tsv => print_tsv(&rows),
    }

    Ok(())
}

fn print_text(rows: &[(&Candidate, &CoverageScore)]) {
    if rows.is_empty() {
        println!("No candidates to show.");
        return;
    }

    for (candidate, score) in rows {
        println!(
            "\n{} ({}): {}% ({}/{} shifts)",
            candidate.name,
            candidate.id,
            score.coverage_percent,
            score.shifts_covered,
            score.total_shifts
        );

        let c = &score.conflicts;
        if c.total > 0 {
            println!(
                "   Conflicts: {} total ({} diaper changing, {} lifting, {} qualification)",
                c.total, c.missing_diaper_changing, c.missing_lifting, c.missing_qualifications
            );
        }
        for (shift, reason) in score.blocked() {
            println!("   Cannot cover {shift}: {reason}");
        }
    }
}

fn print_tsv(rows: &[(&Candidate, &CoverageScore)]) {
    println!(
        "candidate_id\tname\tcoverage_percent\tshifts_covered\ttotal_shifts\tmissing_diaper_changing\tmissing_lifting\tmissing_qualifications\ttotal_conflicts"
    );
    for (candidate, score) in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            candidate.id,
            candidate.name,
            score.coverage_percent,
            score.shifts_covered,
            score.total_shifts,
            score.conflicts.missing_diaper_changing,
            score.conflicts.missing_lifting,
            score.conflicts.missing_qualifications,
            score.conflicts.total,
        );
    }
}
