use crate::automation::{AutomationLimits, ProverOutcome};
use crate::manipulation::negation::negate_node;
use crate::moves::cleanup::cleanup_moves;
use crate::preprocessing::parser::parse_fol_formula;
use crate::tableau::context::ProofContext;
use crate::tableau::tabline::TableauLine;

/// Build a context from parsed hypothesis and goal strings, initialize the hydra,
/// and run the initial cleanup, mirroring what the driver does before automation.
pub(super) fn prepare_context(hypotheses: &[&str], goals: &[&str]) -> ProofContext {
    let mut ctx = ProofContext::new();
    ctx.silent = true;

    for hypothesis in hypotheses {
        ctx.tableau
            .push(TableauLine::hypothesis(parse_fol_formula(hypothesis).unwrap()));
    }
    for goal in goals {
        let tree = parse_fol_formula(goal).unwrap();
        let negated = negate_node(tree.clone(), false).unwrap();
        ctx.tableau.push(TableauLine::target(negated, tree));
    }

    ctx.initialize_hydras();
    ctx.get_hydra();
    ctx.select_targets();
    cleanup_moves(&mut ctx, 0);
    ctx
}

/// Run a textual problem through the complete analysis pipeline.
pub(super) fn run_problem(problem_text: &str) -> ProverOutcome {
    let problem = crate::load_inputs::parse_problem_lines(problem_text);
    crate::analysis::analyse_problem(
        problem,
        &[],
        crate::result_print::PrintOptions::NoPrint,
        &AutomationLimits::default(),
        true,
    )
    .unwrap()
}
