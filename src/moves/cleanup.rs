//! The cleanup moves: normalization steps that decompose compound formulas without
//! branching over assumptions, and the fixed-point driver applying them in order.

use crate::manipulation::equality::equal;
use crate::manipulation::negation::{disjunction_to_implication, negate_node};
use crate::manipulation::special::{reapply_special, split_special, unwrap_special};
use crate::manipulation::variables::{find_common_variables, rename_vars, vars_used};
use crate::moves::skolemize::skolemize_all;
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::LogicalBinaryOp;
use crate::tableau::context::{ProofContext, vars_rename_list};
use crate::tableau::tabline::{Reason, TableauLine};

use std::collections::BTreeSet;

/// Append a derived hypothesis inheriting the source line's assumptions and
/// restrictions. Returns its index.
fn push_hypothesis(
    ctx: &mut ProofContext,
    formula: FolTreeNode,
    source: usize,
    reason: Reason,
) -> usize {
    let mut line = TableauLine::hypothesis(formula);
    line.assumptions = ctx.tableau[source].assumptions.clone();
    line.restrictions = ctx.tableau[source].restrictions.clone();
    line.justification = (reason, vec![source]);
    ctx.tableau.push(line);
    ctx.tableau.len() - 1
}

/// Append a derived target (formula = refutation form, negation = goal form)
/// inheriting the source line's assumptions and restrictions. Returns its index.
fn push_target(
    ctx: &mut ProofContext,
    formula: FolTreeNode,
    negation: FolTreeNode,
    source: usize,
    reason: Reason,
) -> usize {
    let mut line = TableauLine::target(formula, negation);
    line.assumptions = ctx.tableau[source].assumptions.clone();
    line.restrictions = ctx.tableau[source].restrictions.clone();
    line.justification = (reason, vec![source]);
    ctx.tableau.push(line);
    ctx.tableau.len() - 1
}

fn skip_line(ctx: &ProofContext, i: usize) -> bool {
    !ctx.tableau[i].active || ctx.tableau[i].is_theorem() || ctx.tableau[i].is_definition()
}

/// Material equivalence: replace `P ↔ Q` with the two implications `P → Q` and
/// `Q → P`. The target form branches the hydra; the two branch targets get disjoint
/// variables so they can be proved independently.
pub fn move_me(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        if !ctx.tableau[i].target {
            let (specials, matrix) = split_special(&ctx.tableau[i].formula);
            if let NodeType::LogicalBinary(LogicalBinaryOp::Iff, left, right) = matrix.node_type
            {
                ctx.cleanup_count += 1;

                let p_implies_q = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(
                        LogicalBinaryOp::Implies,
                        left.as_ref().clone(),
                        right.as_ref().clone(),
                    ),
                );
                let q_implies_p = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, *right, *left),
                );

                ctx.tableau[i].active = false;
                ctx.tableau[i].dead = true;

                push_hypothesis(ctx, p_implies_q, i, Reason::MaterialEquivalence);
                push_hypothesis(ctx, q_implies_p, i, Reason::MaterialEquivalence);
                moved = true;
            }
        } else {
            let negation = ctx.tableau[i].negation.clone();
            let Some(negation) = negation else {
                i += 1;
                continue;
            };
            let (specials, matrix) = split_special(&negation);
            if let NodeType::LogicalBinary(LogicalBinaryOp::Iff, left, right) = matrix.node_type
            {
                ctx.cleanup_count += 1;

                let p_implies_q = FolTreeNode::mk_binary(
                    LogicalBinaryOp::Implies,
                    left.as_ref().clone(),
                    right.as_ref().clone(),
                );
                let mut q_implies_p =
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, *right, *left);

                // make the two branch targets variable-disjoint
                let common = find_common_variables(&p_implies_q, &q_implies_p);
                if !common.is_empty() {
                    let rename_list = vars_rename_list(ctx, &common);
                    rename_vars(&mut q_implies_p, &rename_list);
                }

                let (Ok(neg1), Ok(neg2)) = (
                    negate_node(p_implies_q.clone(), false),
                    negate_node(q_implies_p.clone(), false),
                ) else {
                    i += 1;
                    continue;
                };

                let formula1 = reapply_special(&specials, neg1);
                let goal1 = reapply_special(&specials, p_implies_q);
                let formula2 = reapply_special(&specials, neg2);
                let goal2 = reapply_special(&specials, q_implies_p);

                ctx.tableau[i].active = false;
                ctx.tableau[i].dead = true;

                let first = push_target(ctx, formula1, goal1, i, Reason::MaterialEquivalence);
                let second = push_target(ctx, formula2, goal2, i, Reason::MaterialEquivalence);

                ctx.hydra_split(i, first, second);
                ctx.restrictions_split(i, first, second);
                ctx.select_targets();
                moved = true;
            }
        }

        i += 1;
    }

    moved
}

/// Conditional premise on a single target whose goal is an implication `P → Q`: add
/// `P` as a hypothesis restricted to a new target `Q`, and hydra-replace.
pub fn conditional_premise(ctx: &mut ProofContext, index: usize) -> bool {
    if index >= ctx.tableau.len() {
        eprintln!("Error: line index {} is out of bounds.", index + 1);
        return false;
    }
    if !ctx.tableau[index].target {
        eprintln!("Error: selected formula is not a target.");
        return false;
    }

    let Some(negation) = ctx.tableau[index].negation.clone() else {
        return false;
    };
    let (specials, matrix) = split_special(&negation);
    let NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) = matrix.node_type
    else {
        eprintln!("Error: the target is not an implication.");
        return false;
    };

    let premise = disjunction_to_implication(left.as_ref().clone());
    let goal = disjunction_to_implication(right.as_ref().clone());
    let Ok(negated_goal) = negate_node(*right, false) else {
        return false;
    };

    let premise = reapply_special(&specials, premise);
    let goal = reapply_special(&specials, goal);
    let negated_goal = reapply_special(&specials, negated_goal);

    // the new target will sit one past the new hypothesis
    let new_target_index = ctx.tableau.len() + 1;

    ctx.tableau[index].active = false;

    let hypothesis = push_hypothesis(ctx, premise, index, Reason::ConditionalPremise);
    ctx.tableau[hypothesis].restrictions.push(new_target_index);
    let target = push_target(ctx, negated_goal, goal, index, Reason::ConditionalPremise);

    ctx.hydra_replace(index, target);
    ctx.restrictions_replace(index, target);
    ctx.select_targets();

    true
}

/// Conditional premise over all active targets from `start` onward.
pub fn move_cp(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;

    for i in start..ctx.tableau.len() {
        if skip_line(ctx, i) || !ctx.tableau[i].target {
            continue;
        }
        let is_implication = ctx.tableau[i]
            .negation
            .as_ref()
            .map(|negation| unwrap_special(negation).is_implication())
            .unwrap_or(false);
        if is_implication {
            ctx.cleanup_count += 1;
            ctx.tableau[i].active = false;
            ctx.tableau[i].dead = true;
            if conditional_premise(ctx, i) {
                moved = true;
            }
        }
    }

    moved
}

/// Split conjunctions: a hypothesis `A ∧ B` becomes two hypotheses; a target whose
/// refutation form is `A ∨ B` splits the hydra into two target branches.
pub fn move_sc(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        let is_target = ctx.tableau[i].target;
        let (specials, matrix) = split_special(&ctx.tableau[i].formula);

        let matches = (!is_target && matrix.is_conjunction())
            || (is_target && matrix.is_disjunction());
        if !matches {
            i += 1;
            continue;
        }
        let NodeType::LogicalBinary(_, left, right) = matrix.node_type else {
            i += 1;
            continue;
        };

        ctx.cleanup_count += 1;
        ctx.tableau[i].active = false;
        ctx.tableau[i].dead = true;

        if !is_target {
            let first = reapply_special(&specials, *left);
            let second = reapply_special(&specials, *right);
            push_hypothesis(ctx, first, i, Reason::SplitConjunction);
            push_hypothesis(ctx, second, i, Reason::SplitConjunction);
        } else {
            let (Ok(neg_left), Ok(neg_right)) = (
                negate_node(left.as_ref().clone(), true),
                negate_node(right.as_ref().clone(), true),
            ) else {
                i += 1;
                continue;
            };
            let formula1 = reapply_special(&specials, *left);
            let goal1 = reapply_special(&specials, neg_left);
            let formula2 = reapply_special(&specials, *right);
            let goal2 = reapply_special(&specials, neg_right);

            let first = push_target(ctx, formula1, goal1, i, Reason::SplitConjunction);
            let second = push_target(ctx, formula2, goal2, i, Reason::SplitConjunction);

            ctx.hydra_split(i, first, second);
            ctx.restrictions_split(i, first, second);
            ctx.select_targets();
        }

        moved = true;
        i += 1;
    }

    moved
}

/// Negated implication: a hypothesis `¬(P → Q)` decomposes into hypothesis `P` (in
/// scope only for the new target) plus target `Q`; a target whose refutation form is
/// `P → Q` splits into the two goals `P` and `¬Q`.
pub fn move_ni(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        let is_target = ctx.tableau[i].target;
        let (specials, matrix) = split_special(&ctx.tableau[i].formula);

        if !is_target {
            let NodeType::Negation(inner) = matrix.node_type else {
                i += 1;
                continue;
            };
            let NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) =
                inner.node_type
            else {
                i += 1;
                continue;
            };

            // every variable of the new goal must be grounded by the premise
            let mut vars_left = BTreeSet::new();
            vars_used(&mut vars_left, &left, true, true);
            let mut vars_right = BTreeSet::new();
            vars_used(&mut vars_right, &right, true, true);
            if !vars_right.iter().all(|var| vars_left.contains(var)) {
                i += 1;
                continue;
            }

            let Ok(negated_goal) = negate_node(right.as_ref().clone(), false) else {
                i += 1;
                continue;
            };

            ctx.cleanup_count += 1;
            ctx.tableau[i].active = false;
            ctx.tableau[i].dead = true;

            let premise = reapply_special(&specials, *left);
            let goal = reapply_special(&specials, *right);
            let negated_goal = reapply_special(&specials, negated_goal);

            let new_target_index = ctx.tableau.len() + 1;
            let hypothesis = push_hypothesis(ctx, premise, i, Reason::NegatedImplication);
            ctx.tableau[hypothesis].restrictions.push(new_target_index);
            push_target(ctx, negated_goal, goal, i, Reason::NegatedImplication);

            moved = true;
        } else {
            let NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) =
                matrix.node_type
            else {
                i += 1;
                continue;
            };

            ctx.cleanup_count += 1;

            let goal1 = disjunction_to_implication(left.as_ref().clone());
            let (Ok(formula1), Ok(goal2)) = (
                negate_node(left.as_ref().clone(), false),
                negate_node(right.as_ref().clone(), true),
            ) else {
                i += 1;
                continue;
            };
            let formula2 = *right;

            let formula1 = reapply_special(&specials, formula1);
            let goal1 = reapply_special(&specials, goal1);
            let formula2 = reapply_special(&specials, formula2);
            let goal2 = reapply_special(&specials, goal2);

            ctx.tableau[i].active = false;
            ctx.tableau[i].dead = true;

            let first = push_target(ctx, formula1, goal1, i, Reason::NegatedImplication);
            let second = push_target(ctx, formula2, goal2, i, Reason::NegatedImplication);

            ctx.hydra_split(i, first, second);
            ctx.restrictions_split(i, first, second);
            ctx.select_targets();

            moved = true;
        }

        i += 1;
    }

    moved
}

/// Split disjunctive implications `(P ∨ Q) → R` into `P → R` and `Q → R`, provided
/// every free variable of `R` occurs in both `P` and `Q`. The target dual works on
/// the refutation form `(P ∨ Q) ∧ ¬R` and splits the hydra.
pub fn move_sdi(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        let is_target = ctx.tableau[i].target;
        let (specials, matrix) = split_special(&ctx.tableau[i].formula);

        // extract P, Q, R from either the hypothesis or the target shape
        let parts = if !is_target {
            match matrix.node_type {
                NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) => {
                    match left.node_type {
                        NodeType::LogicalBinary(LogicalBinaryOp::Or, p, q) => {
                            Some((*p, *q, *right))
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        } else {
            match matrix.node_type {
                NodeType::LogicalBinary(LogicalBinaryOp::And, left, right) => {
                    match (left.node_type, right.node_type) {
                        (
                            NodeType::LogicalBinary(LogicalBinaryOp::Or, p, q),
                            NodeType::Negation(r),
                        ) => Some((*p, *q, *r)),
                        _ => None,
                    }
                }
                _ => None,
            }
        };
        let Some((p, q, r)) = parts else {
            i += 1;
            continue;
        };

        // all free variables of R must be usable from either disjunct
        let mut vars_r = BTreeSet::new();
        vars_used(&mut vars_r, &r, true, true);
        let mut vars_p = BTreeSet::new();
        vars_used(&mut vars_p, &p, true, true);
        let mut vars_q = BTreeSet::new();
        vars_used(&mut vars_q, &q, true, true);
        let valid = vars_r
            .iter()
            .all(|var| vars_p.contains(var) && vars_q.contains(var));
        if !valid {
            i += 1;
            continue;
        }

        ctx.cleanup_count += 1;
        ctx.tableau[i].active = false;
        ctx.tableau[i].dead = true;

        if !is_target {
            if !equal(&p, &r) {
                let implication = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, p, r.clone()),
                );
                push_hypothesis(ctx, implication, i, Reason::SplitDisjunctiveImplication);
            }
            if !equal(&q, &r) {
                let implication = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, q, r),
                );
                push_hypothesis(ctx, implication, i, Reason::SplitDisjunctiveImplication);
            }
            moved = true;
        } else {
            let mut new_targets = Vec::new();
            for disjunct in [p, q] {
                if equal(&disjunct, &r) {
                    continue;
                }
                let goal =
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, disjunct, r.clone());
                let Ok(formula) = negate_node(goal.clone(), false) else {
                    continue;
                };
                let formula = reapply_special(&specials, formula);
                let goal = reapply_special(&specials, goal);
                new_targets.push(push_target(
                    ctx,
                    formula,
                    goal,
                    i,
                    Reason::SplitDisjunctiveImplication,
                ));
            }

            match new_targets.as_slice() {
                [first, second] => {
                    ctx.hydra_split(i, *first, *second);
                    ctx.restrictions_split(i, *first, *second);
                    ctx.select_targets();
                    moved = true;
                }
                [only] => {
                    ctx.hydra_replace(i, *only);
                    ctx.restrictions_replace(i, *only);
                    ctx.select_targets();
                    moved = true;
                }
                _ => {}
            }
        }

        i += 1;
    }

    moved
}

/// Split conjunctive implications `P → (Q ∧ R)` into `P → Q` and `P → R`, provided
/// every free variable of `Q` and `R` occurs in `P`. The target dual works on the
/// refutation form `P ∧ (Q ∨ R)` and splits the hydra.
pub fn move_sci(ctx: &mut ProofContext, start: usize) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        let is_target = ctx.tableau[i].target;
        let (specials, matrix) = split_special(&ctx.tableau[i].formula);

        let parts = if !is_target {
            match matrix.node_type {
                NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) => {
                    match right.node_type {
                        NodeType::LogicalBinary(LogicalBinaryOp::And, q, r) => {
                            Some((*left, *q, *r))
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        } else {
            match matrix.node_type {
                NodeType::LogicalBinary(LogicalBinaryOp::And, left, right) => {
                    match right.node_type {
                        NodeType::LogicalBinary(LogicalBinaryOp::Or, q, r) => {
                            Some((*left, *q, *r))
                        }
                        _ => None,
                    }
                }
                _ => None,
            }
        };
        let Some((p, q, r)) = parts else {
            i += 1;
            continue;
        };

        // the premise must ground every variable of both conclusions
        let mut vars_p = BTreeSet::new();
        vars_used(&mut vars_p, &p, true, true);
        let mut vars_q = BTreeSet::new();
        vars_used(&mut vars_q, &q, true, true);
        let mut vars_r = BTreeSet::new();
        vars_used(&mut vars_r, &r, true, true);
        let valid = vars_q.iter().all(|var| vars_p.contains(var))
            && vars_r.iter().all(|var| vars_p.contains(var));
        if !valid {
            i += 1;
            continue;
        }

        ctx.cleanup_count += 1;
        ctx.tableau[i].active = false;
        ctx.tableau[i].dead = true;

        if !is_target {
            if !equal(&p, &q) {
                let implication = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, p.clone(), q),
                );
                push_hypothesis(ctx, implication, i, Reason::SplitConjunctiveImplication);
            }
            if !equal(&p, &r) {
                let implication = reapply_special(
                    &specials,
                    FolTreeNode::mk_binary(LogicalBinaryOp::Implies, p, r),
                );
                push_hypothesis(ctx, implication, i, Reason::SplitConjunctiveImplication);
            }
            moved = true;
        } else {
            let mut new_targets = Vec::new();
            for conjunct in [q, r] {
                if equal(&p, &conjunct) {
                    continue;
                }
                let formula =
                    FolTreeNode::mk_binary(LogicalBinaryOp::And, p.clone(), conjunct);
                let Ok(goal) = negate_node(formula.clone(), true) else {
                    continue;
                };
                let formula = reapply_special(&specials, formula);
                let goal = reapply_special(&specials, goal);
                new_targets.push(push_target(
                    ctx,
                    formula,
                    goal,
                    i,
                    Reason::SplitConjunctiveImplication,
                ));
            }

            match new_targets.as_slice() {
                [first, second] => {
                    ctx.hydra_split(i, *first, *second);
                    ctx.restrictions_split(i, *first, *second);
                    ctx.select_targets();
                    moved = true;
                }
                [only] => {
                    ctx.hydra_replace(i, *only);
                    ctx.restrictions_replace(i, *only);
                    ctx.select_targets();
                    moved = true;
                }
                _ => {}
            }
        }

        i += 1;
    }

    moved
}

/// Check for disjunctive idempotence `P ∨ P`.
fn disjunctive_idempotence(formula: &FolTreeNode) -> bool {
    match &formula.node_type {
        NodeType::LogicalBinary(LogicalBinaryOp::Or, left, right) => equal(left, right),
        _ => false,
    }
}

/// Check for implicative idempotence `¬P → P` (the canonical form of `P ∨ P`).
fn implicative_idempotence(formula: &FolTreeNode) -> bool {
    match &formula.node_type {
        NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) => {
            match negate_node(left.as_ref().clone(), false) {
                Ok(negated) => equal(&negated, right),
                Err(_) => false,
            }
        }
        _ => false,
    }
}

/// Check for conjunctive idempotence `P ∧ P`.
fn conjunctive_idempotence(formula: &FolTreeNode) -> bool {
    match &formula.node_type {
        NodeType::LogicalBinary(LogicalBinaryOp::And, left, right) => equal(left, right),
        _ => false,
    }
}

/// Collapse an idempotent line to one operand: `reason` labels the move, `matches`
/// selects the idempotence pattern per hypothesis/target role.
fn collapse_idempotence(
    ctx: &mut ProofContext,
    start: usize,
    reason: Reason,
    matches: fn(bool, &FolTreeNode) -> bool,
) -> bool {
    let mut moved = false;
    let mut i = start;

    while i < ctx.tableau.len() {
        if skip_line(ctx, i) {
            i += 1;
            continue;
        }

        let is_target = ctx.tableau[i].target;
        let (specials, matrix) = split_special(&ctx.tableau[i].formula);
        if !matches(is_target, &matrix) {
            i += 1;
            continue;
        }
        let NodeType::LogicalBinary(_, _, operand) = matrix.node_type else {
            i += 1;
            continue;
        };

        ctx.cleanup_count += 1;
        ctx.tableau[i].active = false;
        ctx.tableau[i].dead = true;

        if !is_target {
            let formula = reapply_special(&specials, *operand);
            push_hypothesis(ctx, formula, i, reason);
        } else {
            let Ok(goal) = negate_node(operand.as_ref().clone(), true) else {
                i += 1;
                continue;
            };
            let formula = reapply_special(&specials, *operand);
            let goal = reapply_special(&specials, goal);
            let target = push_target(ctx, formula, goal, i, reason);

            ctx.hydra_replace(i, target);
            ctx.restrictions_replace(i, target);
            ctx.select_targets();
        }

        moved = true;
        i += 1;
    }

    moved
}

/// Disjunctive idempotence: hypotheses `P ∨ P` / `¬P → P` and targets whose
/// refutation form is `P ∧ P` collapse to `P`.
pub fn move_di(ctx: &mut ProofContext, start: usize) -> bool {
    collapse_idempotence(
        ctx,
        start,
        Reason::DisjunctiveIdempotence,
        |is_target, matrix| {
            if is_target {
                conjunctive_idempotence(matrix)
            } else {
                disjunctive_idempotence(matrix) || implicative_idempotence(matrix)
            }
        },
    )
}

/// Conjunctive idempotence: hypotheses `P ∧ P` and targets whose refutation form is
/// `P ∨ P` collapse to `P`.
pub fn move_ci(ctx: &mut ProofContext, start: usize) -> bool {
    collapse_idempotence(
        ctx,
        start,
        Reason::ConjunctiveIdempotence,
        |is_target, matrix| {
            if is_target {
                disjunctive_idempotence(matrix)
            } else {
                conjunctive_idempotence(matrix)
            }
        },
    )
}

/// Apply the full cleanup catalogue from `start` onward until a fixed point:
/// Skolemize → ME → CP → SC → NI → SDI → SCI → DI → CI, processing only lines from
/// the advancing water-mark. Duplicate elimination and rewrite-orientation analysis
/// rerun after every pass, and the constants caches are refreshed at the end.
pub fn cleanup_moves(ctx: &mut ProofContext, start_line: usize) -> bool {
    let mut moved = false;
    let mut start = start_line;
    let mut current_size = ctx.tableau.len();

    ctx.kill_duplicates(start);
    ctx.update_orientations();

    while start < current_size {
        moved |= skolemize_all(ctx, start);
        moved |= move_me(ctx, start);
        moved |= move_cp(ctx, start);
        moved |= move_sc(ctx, start);
        moved |= move_ni(ctx, start);
        moved |= move_sdi(ctx, start);
        moved |= move_sci(ctx, start);
        moved |= move_di(ctx, start);
        moved |= move_ci(ctx, start);

        ctx.kill_duplicates(start);
        ctx.update_orientations();

        start = current_size;
        current_size = ctx.tableau.len();
    }

    ctx.update_constants();

    moved
}

/// Cleanup variant for library definitions: only Skolemization and material
/// equivalence run, so the defining equivalence keeps its shape.
pub fn cleanup_definition(ctx: &mut ProofContext, start_line: usize) -> bool {
    let mut moved = false;
    let mut start = start_line;
    let mut current_size = ctx.tableau.len();

    while start < current_size {
        moved |= skolemize_all(ctx, start);
        moved |= move_me(ctx, start);

        start = current_size;
        current_size = ctx.tableau.len();
    }

    ctx.update_constants();

    moved
}

#[cfg(test)]
mod tests {
    use crate::moves::cleanup::*;
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::tableau::context::ProofContext;
    use crate::tableau::tabline::{Reason, TableauLine};

    fn context_with_hypothesis(formula: &str) -> ProofContext {
        let mut ctx = ProofContext::new();
        ctx.tableau
            .push(TableauLine::hypothesis(parse_fol_formula(formula).unwrap()));
        ctx
    }

    fn context_with_target(goal: &str) -> ProofContext {
        let mut ctx = ProofContext::new();
        let tree = parse_fol_formula(goal).unwrap();
        let negated =
            crate::manipulation::negation::negate_node(tree.clone(), false).unwrap();
        ctx.tableau.push(TableauLine::target(negated, tree));
        ctx.initialize_hydras();
        ctx.select_targets();
        ctx
    }

    #[test]
    /// A hypothesis equivalence becomes two implications.
    fn me_on_hypothesis() {
        let mut ctx = context_with_hypothesis("P \\iff Q");
        assert!(move_me(&mut ctx, 0));
        assert!(ctx.tableau[0].dead);
        assert_eq!(ctx.tableau.len(), 3);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P \\implies Q");
        assert_eq!(ctx.tableau[2].formula.to_repr(), "Q \\implies P");
        assert_eq!(ctx.tableau[1].justification_string(), "ME[1]");
    }

    #[test]
    /// A target equivalence splits the hydra into the two implication branches.
    fn me_on_target() {
        let mut ctx = context_with_target("P \\iff Q");
        assert!(move_me(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 3);
        assert!(ctx.tableau[1].target && ctx.tableau[2].target);
        assert_eq!(
            ctx.tableau[1].negation.as_ref().unwrap().to_repr(),
            "P \\implies Q"
        );
        assert_eq!(
            ctx.tableau[2].negation.as_ref().unwrap().to_repr(),
            "Q \\implies P"
        );

        // the hydra split into two sibling branches, current path on the first
        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![1]);
        assert!(ctx.tableau[1].active);
        assert!(!ctx.tableau[2].active);
    }

    #[test]
    /// Conditional premise moves the antecedent into a restricted hypothesis.
    fn cp_on_target() {
        let mut ctx = context_with_target("P(a) \\implies Q(a)");
        assert!(move_cp(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 3);

        assert!(!ctx.tableau[1].target);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(a)");
        assert_eq!(ctx.tableau[1].restrictions, vec![2]);
        assert_eq!(ctx.tableau[1].justification_string(), "CP[1]");

        assert!(ctx.tableau[2].target);
        assert_eq!(ctx.tableau[2].negation.as_ref().unwrap().to_repr(), "Q(a)");

        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![2]);
    }

    #[test]
    /// A conjunction hypothesis splits into both conjuncts.
    fn sc_on_hypothesis() {
        let mut ctx = context_with_hypothesis("P(a) \\wedge Q(b)");
        assert!(move_sc(&mut ctx, 0));
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(a)");
        assert_eq!(ctx.tableau[2].formula.to_repr(), "Q(b)");
        assert_eq!(ctx.tableau[1].justification_string(), "SC[1]");
    }

    #[test]
    /// A negated-implication hypothesis yields a scoped premise and a new target.
    fn ni_on_hypothesis() {
        let mut ctx = context_with_hypothesis("\\neg (P(a) \\implies Q(a))");
        assert!(move_ni(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 3);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(a)");
        assert_eq!(ctx.tableau[1].restrictions, vec![2]);
        assert!(ctx.tableau[2].target);
        assert_eq!(ctx.tableau[2].negation.as_ref().unwrap().to_repr(), "Q(a)");
    }

    #[test]
    /// A disjunctive-implication hypothesis splits into one implication per case.
    fn sdi_on_hypothesis() {
        let mut ctx = context_with_hypothesis("(P(x) \\vee Q(x)) \\implies R(x)");
        assert!(move_sdi(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 3);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(x) \\implies R(x)");
        assert_eq!(ctx.tableau[2].formula.to_repr(), "Q(x) \\implies R(x)");
    }

    #[test]
    /// The variable side condition blocks the disjunctive-implication split.
    fn sdi_variable_condition() {
        let mut ctx = context_with_hypothesis("(P(x) \\vee Q(y)) \\implies R(x)");
        assert!(!move_sdi(&mut ctx, 0));
        assert!(ctx.tableau[0].active);
    }

    #[test]
    /// A conjunctive-implication hypothesis splits into one implication per conjunct.
    fn sci_on_hypothesis() {
        let mut ctx = context_with_hypothesis("P(x) \\implies (Q(x) \\wedge R(x))");
        assert!(move_sci(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 3);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(x) \\implies Q(x)");
        assert_eq!(ctx.tableau[2].formula.to_repr(), "P(x) \\implies R(x)");
    }

    #[test]
    /// A target `P(a) ∨ P(a)` collapses to the single target `P(a)` labeled `DI`.
    fn di_on_target() {
        let mut ctx = context_with_target("P(a) \\vee P(a)");
        assert!(move_di(&mut ctx, 0));
        assert_eq!(ctx.tableau.len(), 2);
        assert!(ctx.tableau[1].target);
        assert_eq!(ctx.tableau[1].negation.as_ref().unwrap().to_repr(), "P(a)");
        assert_eq!(ctx.tableau[1].justification, (Reason::DisjunctiveIdempotence, vec![0]));
        assert_eq!(ctx.tableau[1].justification_string(), "DI[1]");

        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![1]);
    }

    #[test]
    /// The canonical-implication form of `P ∨ P` also collapses.
    fn implicative_idempotence_collapses() {
        let mut ctx = context_with_hypothesis("\\neg P(a) \\implies P(a)");
        assert!(move_di(&mut ctx, 0));
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(a)");
    }

    #[test]
    /// A conjunction hypothesis `P ∧ P` collapses to `P` via CI.
    fn ci_on_hypothesis() {
        let mut ctx = context_with_hypothesis("P(a) \\wedge P(a)");
        assert!(move_ci(&mut ctx, 0));
        assert_eq!(ctx.tableau[1].formula.to_repr(), "P(a)");
        assert_eq!(ctx.tableau[1].justification_string(), "CI[1]");
    }

    #[test]
    /// The cleanup driver runs to a fixed point over freshly appended lines.
    fn cleanup_fixed_point() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(TableauLine::hypothesis(
            parse_fol_formula("\\forall x (P(x) \\wedge (Q(x) \\wedge Q(x)))").unwrap(),
        ));
        assert!(cleanup_moves(&mut ctx, 0));

        // the conjunction was skolemized apart and the idempotent part collapsed
        let active: Vec<String> = ctx
            .tableau
            .iter()
            .filter(|line| line.active)
            .map(|line| line.formula.to_repr())
            .collect();
        assert!(active.contains(&"P(x)".to_string()));
        assert!(active.contains(&"Q(x)".to_string()));
        assert_eq!(active.len(), 2);
    }

    #[test]
    /// Definitions only get Skolemization and material equivalence.
    fn definition_cleanup_is_shallow() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(TableauLine::hypothesis(
            parse_fol_formula("\\forall x (P(x) \\iff (Q(x) \\wedge R(x)))").unwrap(),
        ));
        assert!(cleanup_definition(&mut ctx, 0));

        let active: Vec<String> = ctx
            .tableau
            .iter()
            .filter(|line| line.active)
            .map(|line| line.formula.to_repr())
            .collect();
        // the equivalence is split, but the conjunctive implication is kept whole
        assert_eq!(active.len(), 2);
        assert!(active.contains(&"P(x) \\implies Q(x) \\wedge R(x)".to_string()));
    }
}
