//! Find command - search for combinations of subs covering every open shift.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{conflict_labels, load_request, OutputFormat};
use crate::matching::engine::{
    CombinationEngine, SearchConfig, SearchOutcome, DEFAULT_LIMIT, DEFAULT_MAX_NODES,
};
use crate::matching::scoring::{restrict_to_shifts, score_candidates};

/// Arguments for the find command
#[derive(Args)]
pub struct FindArgs {
    /// Coverage request (JSON with shifts and candidates)
    /// Use '-' for stdin
    #[arg(required = true)]
    pub request: PathBuf,

    /// Shift list (TSV or CSV) replacing the request's shifts
    #[arg(long)]
    pub shifts: Option<PathBuf>,

    /// Number of combinations to show (default: request limit, then 5)
    #[arg(short = 'n', long)]
    pub max_combinations: Option<usize>,

    /// Stop searching after this many nodes
    #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,

    /// Use the coverage percents in the request instead of rescoring
    #[arg(long)]
    pub no_rescore: bool,
}

/// Execute the find command
///
/// # Errors
///
/// Returns an error if the request cannot be loaded or output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FindArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut request = load_request(&args.request, args.shifts.as_deref())?;

    // The search only sees shifts in the supplied list
    restrict_to_shifts(&request.shifts, &mut request.candidates);
    if !request.shifts.is_empty() && !args.no_rescore {
        score_candidates(&request.shifts, &mut request.candidates);
        if verbose {
            eprintln!(
                "Rescored {} candidates against {} shifts",
                request.candidates.len(),
                request.shifts.len()
            );
        }
    }

    let limit = args
        .max_combinations
        .or(request.limit)
        .unwrap_or(DEFAULT_LIMIT);
    let config = SearchConfig::default()
        .with_limit(limit)
        .with_max_nodes(args.max_nodes);

    let outcome = CombinationEngine::with_config(&request.candidates, config).search();

    if verbose {
        eprintln!(
            "Searched {} candidates over {} open shifts ({} nodes)",
            outcome.candidates_considered, outcome.shifts_needed, outcome.nodes_visited
        );
    }
    if outcome.node_limit_reached {
        eprintln!(
            "Warning: search stopped after {} nodes; results may be incomplete (raise --max-nodes)",
            outcome.nodes_visited
        );
    }

    match format {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Tsv => print_tsv(&outcome),
    }

    Ok(())
}

fn print_text(outcome: &SearchOutcome) {
    if outcome.shifts_needed == 0 {
        println!("All shifts are already assigned. Nothing to cover.");
        return;
    }

    if outcome.combinations.is_empty() {
        println!(
            "No combination of candidates covers all {} open shifts.",
            outcome.shifts_needed
        );
        println!("Run `sub-finder diagnose` to see which shifts have no available sub.");
        return;
    }

    println!(
        "Found {} combination{} covering {} open shift{}",
        outcome.combinations.len(),
        if outcome.combinations.len() == 1 { "" } else { "s" },
        outcome.shifts_needed,
        if outcome.shifts_needed == 1 { "" } else { "s" },
    );

    for (rank, combo) in outcome.combinations.iter().enumerate() {
        println!();
        if combo.is_single_sub() {
            println!(
                "#{}  Recommended sub: {} ({} conflicts)",
                rank + 1,
                combo.assignments[0].name,
                combo.total_conflicts
            );
        } else {
            println!(
                "#{}  {} subs, {} conflicts",
                rank + 1,
                combo.sub_count(),
                combo.total_conflicts
            );
        }

        for assignment in &combo.assignments {
            let phone = assignment
                .phone
                .as_deref()
                .map(|p| format!(", {p}"))
                .unwrap_or_default();
            println!(
                "   {} ({}{}) - {} shift{}, {}% coverage",
                assignment.name,
                assignment.candidate_id,
                phone,
                assignment.shift_count(),
                if assignment.shift_count() == 1 { "" } else { "s" },
                assignment.coverage_percent
            );
            for covered in &assignment.shifts {
                let labels = conflict_labels(&covered.conflicts);
                if labels.is_empty() {
                    println!("      {}", covered.shift);
                } else {
                    println!("      {}  [{}]", covered.shift, labels.join(", "));
                }
            }
        }
    }
}

fn print_tsv(outcome: &SearchOutcome) {
    println!(
        "rank\tcandidate_id\tname\tdate\ttime_slot_code\tmissing_diaper_changing\tmissing_lifting\tmissing_qualification\tcombination_conflicts\tcombination_subs"
    );

    for (rank, combo) in outcome.combinations.iter().enumerate() {
        for assignment in &combo.assignments {
            for covered in &assignment.shifts {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    rank + 1,
                    assignment.candidate_id,
                    assignment.name,
                    covered.shift.date,
                    covered.shift.time_slot_code,
                    covered.conflicts.missing_diaper_changing,
                    covered.conflicts.missing_lifting,
                    covered.conflicts.missing_qualification,
                    combo.total_conflicts,
                    combo.sub_count(),
                );
            }
        }
    }
}
