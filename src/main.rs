//! Automated tableau prover for first-order logic problems.
//!
//! Takes an input path to a problem file (lines prefixed `* ` are targets, the rest
//! are hypotheses) and optional theorem/definition libraries, and attempts to derive
//! a closed refutation. During (and after) the run, prints the selected amount of
//! information (default is the final tableau plus a one-line verdict).
//!

use fol_tableau_prover::analysis::analyse_problem;
use fol_tableau_prover::automation::{AutomationLimits, ProverOutcome};
use fol_tableau_prover::load_inputs::load_problem;
use fol_tableau_prover::result_print::PrintOptions;

use clap::builder::PossibleValuesParser;
use clap::Parser;

use std::path::Path;
use std::process::ExitCode;

/// Structure to collect CLI arguments.
#[derive(Parser)]
#[clap(
    version,
    about = "Automated tableau prover for first-order logic with set-theoretic primitives."
)]
struct Arguments {
    /// Path to a file with the problem formulae (`* ` prefix marks targets).
    problem_path: String,

    /// Base name of a theorem/definition library to load (without the `.dat`
    /// extension); may be given multiple times.
    #[clap(short, long)]
    library: Vec<String>,

    /// Choice of the amount of output regarding the computation and results.
    #[clap(short, long, default_value = "short", value_parser = PossibleValuesParser::new(["none", "short", "medium", "full"]))]
    print_option: String,

    /// Suppress per-rejected-move diagnostics on stderr.
    #[clap(short, long)]
    silent: bool,

    /// Maximum total number of moves before giving up.
    #[clap(long)]
    max_moves: Option<usize>,

    /// Wall-clock budget in seconds.
    #[clap(long)]
    max_seconds: Option<u64>,
}

/// Wrapper function to invoke the prover, works with CLI arguments.
fn main() -> ExitCode {
    let args = Arguments::parse();

    if !Path::new(args.problem_path.as_str()).is_file() {
        println!("{} is not valid file", args.problem_path);
        return ExitCode::FAILURE;
    }

    let problem = match load_problem(args.problem_path.as_str()) {
        Ok(problem) => problem,
        Err(error) => {
            println!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let print_opt = match args.print_option.as_str() {
        "none" => PrintOptions::NoPrint,
        "short" => PrintOptions::ShortPrint,
        "medium" => PrintOptions::MediumPrint,
        // this cant really happen, just here to be exhaustive
        _ => PrintOptions::FullPrint,
    };

    let limits = AutomationLimits {
        max_moves: args.max_moves,
        max_seconds: args.max_seconds,
    };

    match analyse_problem(problem, &args.library, print_opt, &limits, args.silent) {
        Ok(ProverOutcome::Proved) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            println!("{error}");
            ExitCode::FAILURE
        }
    }
}
