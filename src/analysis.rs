//! Proof analysis from start to finish, with progress output and result prints.

use crate::automation::{AutomationLimits, ProverOutcome, automate};
use crate::completion::check_done;
use crate::library::library_load;
use crate::load_inputs::ProblemLine;
use crate::manipulation::negation::negate_node;
use crate::moves::cleanup::cleanup_moves;
use crate::preprocessing::parser::parse_fol_formula;
use crate::result_print::{PrintOptions, print_if_allowed, print_tableau};
use crate::tableau::context::ProofContext;
use crate::tableau::tabline::TableauLine;

use std::time::SystemTime;

/// Run the whole proof attempt: load libraries, parse the problem lines into the
/// tableau, normalize, and hand over to the waterfall.
///
/// Prints the selected amount of progress information and, for everything above
/// `NoPrint`, the final tableau.
pub fn analyse_problem(
    problem: Vec<ProblemLine>,
    libraries: &[String],
    print_opt: PrintOptions,
    limits: &AutomationLimits,
    silent: bool,
) -> Result<ProverOutcome, String> {
    let start = SystemTime::now();
    let mut ctx = ProofContext::new();
    ctx.silent = silent;

    print_if_allowed("============ INITIAL PHASE ============".to_string(), print_opt);

    for library in libraries {
        library_load(&mut ctx, library.as_str())?;
        print_if_allowed(format!("Loaded library '{library}'."), print_opt);
    }

    print_if_allowed(format!("Read {} problem lines.", problem.len()), print_opt);
    print_if_allowed("-----".to_string(), print_opt);

    for (i, line) in problem.iter().enumerate() {
        let tree = parse_fol_formula(line.formula.as_str())
            .map_err(|e| format!("Error parsing line {}: {e}", i + 1))?;
        print_if_allowed(format!("Parsed formula n.{}: {tree}", i + 1), print_opt);

        if line.target {
            let negated = negate_node(tree.clone(), false)?;
            ctx.tableau.push(TableauLine::target(negated, tree));
        } else {
            ctx.tableau.push(TableauLine::hypothesis(tree));
        }
    }
    print_if_allowed("-----".to_string(), print_opt);

    ctx.initialize_hydras();
    ctx.get_hydra();
    ctx.select_targets();
    let problem_start = ctx.upto;
    cleanup_moves(&mut ctx, problem_start);

    print_if_allowed(
        format!(
            "Normalized the problem into {} tableau lines in {}ms.",
            ctx.tableau.len(),
            start.elapsed().map(|d| d.as_millis()).unwrap_or(0)
        ),
        print_opt,
    );
    print_if_allowed("=========== AUTOMATION PHASE ===========".to_string(), print_opt);

    let outcome = if check_done(&mut ctx) {
        ProverOutcome::Proved
    } else {
        automate(&mut ctx, limits)
    };

    if print_opt != PrintOptions::NoPrint {
        print_tableau(&ctx);
        println!();
        match outcome {
            ProverOutcome::Proved => println!("Theorem proved."),
            ProverOutcome::Stuck => println!("Prover got stuck."),
            ProverOutcome::BudgetExhausted => println!("Prover ran out of budget."),
        }
        println!(
            "Moves: {} cleanup, {} reasoning, {} rewrite, {} split. Time: {}ms.",
            ctx.cleanup_count,
            ctx.reasoning_count,
            ctx.rewrite_count,
            ctx.split_count,
            start.elapsed().map(|d| d.as_millis()).unwrap_or(0)
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use crate::analysis::analyse_problem;
    use crate::automation::{AutomationLimits, ProverOutcome};
    use crate::load_inputs::parse_problem_lines;
    use crate::result_print::PrintOptions;

    #[test]
    /// A full run over a textual problem proves a simple theorem.
    fn full_run() {
        let problem = parse_problem_lines("P(a)\nP(x) \\implies Q(x)\n* Q(a)\n");
        let outcome = analyse_problem(
            problem,
            &[],
            PrintOptions::NoPrint,
            &AutomationLimits::default(),
            true,
        )
        .unwrap();
        assert_eq!(outcome, ProverOutcome::Proved);
    }

    #[test]
    /// Parse errors surface as analysis errors.
    fn parse_error_reported() {
        let problem = parse_problem_lines("P(a\n* Q(a)\n");
        let result = analyse_problem(
            problem,
            &[],
            PrintOptions::NoPrint,
            &AutomationLimits::default(),
            true,
        );
        assert!(result.is_err());
    }
}
