//! The waterfall: a greedy fixed-priority loop that cleans the tableau, tries the
//! reasoning moves from cheapest to most branching, and stops when the proof closes
//! or a full pass makes no move.

use crate::completion::check_done;
use crate::manipulation::special::unwrap_special;
use crate::moves::cleanup::cleanup_moves;
use crate::moves::reasoning::{move_mpt, move_rewrite, move_sd};
use crate::tableau::context::ProofContext;

use std::time::SystemTime;

/// Resource budget checked at the top of each waterfall iteration.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutomationLimits {
    /// Maximum total number of moves (cleanup, reasoning, rewrite, split).
    pub max_moves: Option<usize>,
    /// Wall-clock budget in seconds.
    pub max_seconds: Option<u64>,
}

/// Result of running the waterfall.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProverOutcome {
    /// Every target closed against a hypothesis; the theorem is proved.
    Proved,
    /// A full pass made no move; the prover cannot reduce the problem further.
    Stuck,
    /// The move-count or wall-clock budget ran out.
    BudgetExhausted,
}

fn total_moves(ctx: &ProofContext) -> usize {
    ctx.cleanup_count + ctx.reasoning_count + ctx.rewrite_count + ctx.split_count
}

/// Run the waterfall until the proof closes, no move fires, or the budget runs out.
pub fn automate(ctx: &mut ProofContext, limits: &AutomationLimits) -> ProverOutcome {
    let start_time = SystemTime::now();

    loop {
        if let Some(max_moves) = limits.max_moves {
            if total_moves(ctx) >= max_moves {
                return ProverOutcome::BudgetExhausted;
            }
        }
        if let Some(max_seconds) = limits.max_seconds {
            let elapsed = start_time.elapsed().map(|d| d.as_secs()).unwrap_or(0);
            if elapsed >= max_seconds {
                return ProverOutcome::BudgetExhausted;
            }
        }

        // normalize the branch we are on (newly selected branches may still carry
        // raw formulae; cleanup is idempotent on lines already processed)
        ctx.get_hydra();
        ctx.select_targets();
        cleanup_moves(ctx, 0);
        if check_done(ctx) {
            return ProverOutcome::Proved;
        }

        // cleanup may have replaced targets in the hydra, so fetch the leaf now
        let targets = ctx.get_hydra();
        ctx.select_targets();

        let (_tableau_constants, _target_constants, implications, _units) =
            ctx.gather_tableau_data();

        // Level 1: backward modus ponens/tollens of implications against the
        // current targets, filtered by the constants cache and the applied pairs.
        let silent = ctx.silent;
        let mut move_made = false;
        'targets: for target in &targets {
            if ctx.tableau[*target].dead {
                continue;
            }
            let target_constants = ctx.tableau[*target].constants.clone();
            for implication in &implications {
                if ctx.tableau[*implication].applied_units.contains(target) {
                    continue;
                }
                let all_contained = target_constants
                    .iter()
                    .all(|c| ctx.tableau[*implication].constants.contains(c));
                if !all_contained {
                    continue;
                }

                let success = move_mpt(ctx, *implication, &[*target], &[], true, silent)
                    || move_mpt(ctx, *implication, &[*target], &[], false, silent);
                if success {
                    ctx.tableau[*implication].applied_units.push(*target);
                    let upto = ctx.upto;
                    cleanup_moves(ctx, upto);
                    if check_done(ctx) {
                        return ProverOutcome::Proved;
                    }
                    move_made = true;
                    break 'targets;
                }
            }
        }

        // Level 2: left-to-right equality rewrites of active lines, each
        // (equality, line) pair tried at most once.
        if !move_made {
            move_made = try_rewrites(ctx);
            if move_made && check_done(ctx) {
                return ProverOutcome::Proved;
            }
        }

        // Level 3: case-split an unsplit, variable-disjoint disjunction.
        if !move_made {
            move_made = try_disjunction_splits(ctx);
            if move_made && check_done(ctx) {
                return ProverOutcome::Proved;
            }
        }

        if !move_made {
            return ProverOutcome::Stuck;
        }
    }
}

/// Try one equality rewrite: an active equality hypothesis whose orientation makes
/// left-to-right safe, against any other active line it has not touched yet.
fn try_rewrites(ctx: &mut ProofContext) -> bool {
    let silent = ctx.silent;
    let equalities: Vec<usize> = (0..ctx.tableau.len())
        .filter(|i| {
            let line = &ctx.tableau[*i];
            line.active && !line.target && line.formula.is_equality()
        })
        .collect();

    for equality in equalities {
        let safe = ctx.tableau[equality]
            .orientation
            .map(|o| o.ltor && o.ltor_safe)
            .unwrap_or(false);
        if !safe {
            continue;
        }

        let candidates: Vec<usize> = (0..ctx.tableau.len())
            .filter(|i| {
                let line = &ctx.tableau[*i];
                *i != equality
                    && line.active
                    && !line.is_theorem()
                    && !line.is_definition()
                    && !ctx.tableau[equality].rewrites_applied.contains(i)
            })
            .collect();

        for line in candidates {
            ctx.tableau[equality].rewrites_applied.push(line);
            if !move_rewrite(ctx, line, equality, silent) {
                continue;
            }

            let new_index = ctx.tableau.len() - 1;
            if ctx.tableau[line].target {
                // the rewritten target replaces the original in the hydra
                ctx.tableau[line].active = false;
                ctx.tableau[line].dead = true;
                ctx.hydra_replace(line, new_index);
                ctx.restrictions_replace(line, new_index);
                ctx.select_targets();
            }
            let upto = ctx.upto;
            cleanup_moves(ctx, upto);
            return true;
        }
    }

    false
}

/// Try one disjunction split on an active, unsplit hypothesis whose canonical
/// implication form has variable-disjoint sides.
fn try_disjunction_splits(ctx: &mut ProofContext) -> bool {
    let candidates: Vec<usize> = (0..ctx.tableau.len())
        .filter(|i| {
            let line = &ctx.tableau[*i];
            line.active
                && !line.target
                && !line.split
                && !line.is_theorem()
                && !line.is_definition()
                && unwrap_special(&line.formula).is_implication()
        })
        .collect();

    for line in candidates {
        // move_sd itself validates the variable-disjointness
        ctx.tableau[line].split = true;
        if move_sd(ctx, line) {
            let upto = ctx.upto;
            cleanup_moves(ctx, upto);
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use crate::automation::{AutomationLimits, ProverOutcome, automate};
    use crate::manipulation::negation::negate_node;
    use crate::moves::cleanup::cleanup_moves;
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::tableau::context::ProofContext;
    use crate::tableau::tabline::TableauLine;

    fn prepare(hypotheses: &[&str], targets: &[&str]) -> ProofContext {
        let mut ctx = ProofContext::new();
        for hypothesis in hypotheses {
            ctx.tableau
                .push(TableauLine::hypothesis(parse_fol_formula(hypothesis).unwrap()));
        }
        for target in targets {
            let tree = parse_fol_formula(target).unwrap();
            let negated = negate_node(tree.clone(), false).unwrap();
            ctx.tableau.push(TableauLine::target(negated, tree));
        }
        ctx.silent = true;
        ctx.initialize_hydras();
        ctx.get_hydra();
        ctx.select_targets();
        cleanup_moves(&mut ctx, 0);
        ctx
    }

    #[test]
    /// A single modus ponens step closes the proof.
    fn simple_modus_ponens_proof() {
        let mut ctx = prepare(&["P(a)", "P(x) \\implies Q(x)"], &["Q(a)"]);
        let outcome = automate(&mut ctx, &AutomationLimits::default());
        assert_eq!(outcome, ProverOutcome::Proved);
    }

    #[test]
    /// An unprovable goal reports stuck, not success.
    fn unprovable_goal_is_stuck() {
        let mut ctx = prepare(&["P(a)"], &["Q(a)"]);
        let outcome = automate(&mut ctx, &AutomationLimits::default());
        assert_eq!(outcome, ProverOutcome::Stuck);
    }

    #[test]
    /// The move budget cuts the run short.
    fn budget_exhaustion() {
        let mut ctx = prepare(&["P(a)", "P(x) \\implies Q(x)"], &["Q(a)"]);
        let limits = AutomationLimits {
            max_moves: Some(0),
            max_seconds: None,
        };
        assert_eq!(automate(&mut ctx, &limits), ProverOutcome::BudgetExhausted);
    }
}
