//! Closure detection: after every move, negations of new lines are unified against
//! prior lines; a target is discharged when its goal unifies with a hypothesis, and a
//! hydra leaf is satisfied when all its targets are discharged under one consistent
//! assumption set.

use crate::manipulation::negation::negate_node;
use crate::tableau::context::{ProofContext, assumptions_compatible, combine_assumptions};
use crate::unification::substitution::Substitution;
use crate::unification::unify::unify;

/// Hard cap on the number of discharge combinations tried per leaf.
const MAX_DISCHARGE_COMBINATIONS: usize = 256;

/// Record unification pairs for every line appended since the last check, then try to
/// satisfy hydra leaves until one resists. Returns `true` when the root hydra
/// collapses to unconditionally proved.
pub fn check_done(ctx: &mut ProofContext) -> bool {
    record_unifications(ctx);
    satisfy_hydras(ctx)
}

/// Step 1: for each new non-target line, compute its negation and unify it against
/// every prior live line; for each new target line, unify its goal against every
/// prior live hypothesis. Matching pairs `(prior, new)` are recorded on the new line.
fn record_unifications(ctx: &mut ProofContext) {
    for j in ctx.upto..ctx.tableau.len() {
        if ctx.tableau[j].dead {
            continue;
        }

        if !ctx.tableau[j].target {
            let Ok(negation) = negate_node(ctx.tableau[j].formula.clone(), false) else {
                continue;
            };
            for i in 0..j {
                if ctx.tableau[i].dead {
                    continue;
                }
                let mut subst = Substitution::new();
                if unify(&negation, &ctx.tableau[i].formula, &mut subst) {
                    ctx.tableau[j].unifications.push((i, j));
                }
            }
            ctx.tableau[j].negation = Some(negation);
        } else {
            let Some(goal) = ctx.tableau[j].negation.clone() else {
                continue;
            };
            for i in 0..j {
                if ctx.tableau[i].dead || ctx.tableau[i].target {
                    continue;
                }
                let mut subst = Substitution::new();
                if unify(&ctx.tableau[i].formula, &goal, &mut subst) {
                    ctx.tableau[j].unifications.push((i, j));
                }
            }
        }
    }

    ctx.upto = ctx.tableau.len();
}

/// Discharge options of a single target: the combined assumption set of every
/// recorded pairing with a live, restriction-compatible hypothesis.
fn discharge_options(ctx: &ProofContext, target: usize) -> Vec<Vec<i32>> {
    let mut options = Vec::new();

    for line in &ctx.tableau {
        for (a, b) in &line.unifications {
            let hypothesis = if *a == target && !ctx.tableau[*b].target {
                *b
            } else if *b == target && !ctx.tableau[*a].target {
                *a
            } else {
                continue;
            };
            if ctx.tableau[hypothesis].dead {
                continue;
            }
            if !assumptions_compatible(
                &ctx.tableau[target].assumptions,
                &ctx.tableau[hypothesis].assumptions,
            ) {
                continue;
            }
            // the hypothesis must be in scope for this target
            let in_scope = ctx.tableau[hypothesis].restrictions.is_empty()
                || ctx.tableau[hypothesis].restrictions.contains(&target);
            if !in_scope {
                continue;
            }
            options.push(combine_assumptions(
                &ctx.tableau[target].assumptions,
                &ctx.tableau[hypothesis].assumptions,
            ));
        }
    }

    options
}

/// Enumerate the mutually compatible selections of one discharge option per target.
fn enumerate_combinations(
    options: &[Vec<Vec<i32>>],
    index: usize,
    accumulated: Vec<i32>,
    combinations: &mut Vec<Vec<i32>>,
) {
    if combinations.len() >= MAX_DISCHARGE_COMBINATIONS {
        return;
    }
    if index == options.len() {
        combinations.push(accumulated);
        return;
    }
    for option in &options[index] {
        if !assumptions_compatible(&accumulated, option) {
            continue;
        }
        let combined = combine_assumptions(&accumulated, option);
        enumerate_combinations(options, index + 1, combined, combinations);
    }
}

/// Step 2: repeatedly try to satisfy the current leaf; on success mark its targets
/// dead, prune the proved subtree, and move on to the next leaf. Returns `true` when
/// the root runs out of children.
fn satisfy_hydras(ctx: &mut ProofContext) -> bool {
    loop {
        let Some(root) = ctx.hydra.root else {
            return false;
        };
        if ctx.hydra.node(root).children.is_empty() {
            return true;
        }

        let Some(leaf) = ctx.hydra.current_leaf() else {
            return false;
        };
        let targets = ctx.hydra.node(leaf).target_indices.clone();
        if targets.is_empty() {
            return false;
        }

        // every target needs at least one discharge option
        let mut options = Vec::new();
        for target in &targets {
            let target_options = discharge_options(ctx, *target);
            if target_options.is_empty() {
                return false;
            }
            options.push(target_options);
        }

        let mut combinations = Vec::new();
        enumerate_combinations(&options, 0, Vec::new(), &mut combinations);

        let mut collapsed = false;
        for combination in combinations {
            if ctx.hydra.add_assumption(leaf, &combination) == 1 {
                collapsed = true;
                break;
            }
        }
        if !collapsed {
            return false;
        }

        // the leaf is unconditionally proved: retire its targets and prune the
        // proved subtree, bottom up along the current path
        for target in &targets {
            ctx.tableau[*target].dead = true;
            ctx.tableau[*target].active = false;
        }
        ctx.purge_dead();

        let path = ctx.hydra.current_path.clone();
        let mut child = leaf;
        for parent in path.iter().rev().skip(1) {
            ctx.hydra.remove_child(*parent, child);
            if !ctx.hydra.node(*parent).children.is_empty() || *parent == root {
                break;
            }
            child = *parent;
        }

        if ctx.hydra.node(root).children.is_empty() {
            return true;
        }

        // descend into the next open leaf and try again
        ctx.get_hydra();
        ctx.select_targets();
    }
}

#[cfg(test)]
mod tests {
    use crate::completion::check_done;
    use crate::manipulation::negation::negate_node;
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::tableau::context::ProofContext;
    use crate::tableau::tabline::TableauLine;

    fn push_hypothesis(ctx: &mut ProofContext, formula: &str) -> usize {
        ctx.tableau
            .push(TableauLine::hypothesis(parse_fol_formula(formula).unwrap()));
        ctx.tableau.len() - 1
    }

    fn push_target(ctx: &mut ProofContext, goal: &str) -> usize {
        let tree = parse_fol_formula(goal).unwrap();
        let negated = negate_node(tree.clone(), false).unwrap();
        ctx.tableau.push(TableauLine::target(negated, tree));
        ctx.tableau.len() - 1
    }

    #[test]
    /// A target whose goal matches a hypothesis exactly closes the proof.
    fn direct_closure() {
        let mut ctx = ProofContext::new();
        push_hypothesis(&mut ctx, "P(a)");
        push_target(&mut ctx, "P(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        assert!(check_done(&mut ctx));
        assert!(ctx.tableau[1].dead);
    }

    #[test]
    /// Closure works through unification, not just syntactic identity.
    fn closure_by_unification() {
        let mut ctx = ProofContext::new();
        push_hypothesis(&mut ctx, "P(x)");
        push_target(&mut ctx, "P(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        assert!(check_done(&mut ctx));
    }

    #[test]
    /// An open target keeps the proof open.
    fn open_target_not_closed() {
        let mut ctx = ProofContext::new();
        push_hypothesis(&mut ctx, "P(a)");
        push_target(&mut ctx, "Q(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        assert!(!check_done(&mut ctx));
        assert!(!ctx.tableau[1].dead);
    }

    #[test]
    /// Complementary case-split discharges collapse to an unconditional proof.
    fn case_split_closure() {
        let mut ctx = ProofContext::new();
        let first = push_hypothesis(&mut ctx, "P(a)");
        ctx.tableau[first].assumptions = vec![3];
        let second = push_hypothesis(&mut ctx, "P(a)");
        ctx.tableau[second].assumptions = vec![-3];
        push_target(&mut ctx, "P(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        assert!(check_done(&mut ctx));
    }

    #[test]
    /// A single signed discharge is recorded but does not close the proof.
    fn conditional_discharge_stays_open() {
        let mut ctx = ProofContext::new();
        let hypothesis = push_hypothesis(&mut ctx, "P(a)");
        ctx.tableau[hypothesis].assumptions = vec![3];
        push_target(&mut ctx, "P(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        assert!(!check_done(&mut ctx));
        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).proved, vec![vec![3]]);
    }

    #[test]
    /// Both branches of a two-target hydra must close before the proof is done.
    fn multiple_targets_cascade() {
        let mut ctx = ProofContext::new();
        push_hypothesis(&mut ctx, "P(a)");
        push_hypothesis(&mut ctx, "Q(b)");
        push_target(&mut ctx, "P(a)");
        push_target(&mut ctx, "Q(b)");
        ctx.initialize_hydras();
        ctx.get_hydra();
        ctx.select_targets();

        // both leaves close in one cascading pass
        assert!(check_done(&mut ctx));
        assert!(ctx.tableau[2].dead);
        assert!(ctx.tableau[3].dead);
    }

    #[test]
    /// Restriction-incompatible hypotheses cannot discharge a target.
    fn restriction_blocks_discharge() {
        let mut ctx = ProofContext::new();
        let hypothesis = push_hypothesis(&mut ctx, "P(a)");
        push_target(&mut ctx, "P(a)");
        push_target(&mut ctx, "Q(a)");
        // the hypothesis is only meaningful for the other target
        ctx.tableau[hypothesis].restrictions = vec![2];
        ctx.initialize_hydras();
        ctx.get_hydra();
        ctx.select_targets();

        assert!(!check_done(&mut ctx));
        assert!(!ctx.tableau[1].dead);
    }
}
