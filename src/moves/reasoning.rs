//! The reasoning moves: modus ponens/tollens, equality rewriting, and the
//! case-splitting of variable-disjoint disjunctions.

use crate::manipulation::negation::{contrapositive, disjunction_to_implication, negate_node};
use crate::manipulation::special::{reapply_special, split_special};
use crate::manipulation::variables::{
    conjunction_to_list, find_common_variables, rename_vars, vars_used,
};
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::LogicalBinaryOp;
use crate::tableau::context::{
    ProofContext, assumptions_compatible, combine_assumptions, combine_restrictions,
    restrictions_compatible, vars_rename_list,
};
use crate::tableau::tabline::{Reason, TableauLine};
use crate::unification::substitution::{Substitution, extend_substitution, substitute};
use crate::unification::unify::unify;

use std::collections::BTreeSet;

/// Forward inference: unify the conjuncts of the implication's antecedent with the
/// unit clauses and return the substituted consequent. Variables the implication
/// shares with the units are renamed fresh first.
fn modus_ponens(
    combined_subst: &mut Substitution,
    ctx: &mut ProofContext,
    implication: &FolTreeNode,
    unit_clauses: &[&FolTreeNode],
    silent: bool,
) -> Option<FolTreeNode> {
    if !implication.is_implication() {
        eprintln!("Error: the first formula is not an implication.");
        return None;
    }

    let mut implication_copy = implication.clone();

    // rename implication variables that collide with the unit clauses
    let mut vars_implication = BTreeSet::new();
    vars_used(&mut vars_implication, implication, false, true);
    let mut vars_units = BTreeSet::new();
    for unit in unit_clauses {
        vars_used(&mut vars_units, unit, true, true);
    }
    let common: BTreeSet<String> = vars_implication
        .intersection(&vars_units)
        .cloned()
        .collect();
    if !common.is_empty() {
        let rename_list = vars_rename_list(ctx, &common);
        rename_vars(&mut implication_copy, &rename_list);
    }

    let NodeType::LogicalBinary(LogicalBinaryOp::Implies, antecedent, consequent) =
        &implication_copy.node_type
    else {
        return None;
    };

    let conjuncts = conjunction_to_list(antecedent);
    if conjuncts.len() != unit_clauses.len() {
        if !silent {
            eprintln!(
                "Error: number of unit clauses ({}) does not match number of antecedent conjuncts ({}).",
                unit_clauses.len(),
                conjuncts.len()
            );
        }
        return None;
    }

    for (conjunct, unit) in conjuncts.iter().zip(unit_clauses.iter()) {
        let mut subst = Substitution::new();
        if !unify(conjunct, unit, &mut subst) {
            if !silent {
                eprintln!(
                    "Error: unification failed between conjunct {conjunct} and unit clause {unit}."
                );
            }
            return None;
        }
        for (name, image) in &subst {
            if !extend_substitution(combined_subst, name, image) {
                if !silent {
                    eprintln!("Error: conflicting substitutions for variable '{name}'.");
                }
                return None;
            }
        }
    }

    Some(substitute(consequent, combined_subst))
}

/// Backward inference: modus ponens on the contrapositive.
fn modus_tollens(
    combined_subst: &mut Substitution,
    ctx: &mut ProofContext,
    implication: &FolTreeNode,
    unit_clauses: &[&FolTreeNode],
    silent: bool,
) -> Option<FolTreeNode> {
    let negated_implication = contrapositive(implication).ok()?;
    modus_ponens(combined_subst, ctx, &negated_implication, unit_clauses, silent)
}

/// Modus ponens/tollens between an implication hypothesis and a list of other lines.
///
/// The other lines must be uniformly hypotheses (forward: the result is a new
/// hypothesis) or uniformly targets (backward: the result replaces them in the
/// hydra). Special-implication guards are peeled off all participating lines first;
/// after substitution, every peeled guard must unify with one of the supplied
/// `special_lines`, and surviving guards are re-wrapped around the result. The check
/// is vacuously true without guards; the automated path passes no special lines, so
/// guarded implications do not fire there.
pub fn move_mpt(
    ctx: &mut ProofContext,
    implication_line: usize,
    other_lines: &[usize],
    special_lines: &[usize],
    ponens: bool,
    silent: bool,
) -> bool {
    if implication_line >= ctx.tableau.len() {
        eprintln!(
            "Error: implication line {} is out of bounds.",
            implication_line + 1
        );
        return false;
    }
    if ctx.tableau[implication_line].target {
        eprintln!("Error: line {} is not a hypothesis.", implication_line + 1);
        return false;
    }

    let (mut specials, implication) = split_special(&ctx.tableau[implication_line].formula);
    if !implication.is_implication() {
        eprintln!(
            "Error: line {} does not contain a valid implication.",
            implication_line + 1
        );
        return false;
    }

    let mut all_hypotheses = true;
    let mut all_targets = true;
    for line in other_lines {
        if *line >= ctx.tableau.len() {
            eprintln!("Error: line {} is out of bounds.", line + 1);
            return false;
        }
        if ctx.tableau[*line].target {
            all_hypotheses = false;
        } else {
            all_targets = false;
        }
        if !assumptions_compatible(
            &ctx.tableau[implication_line].assumptions,
            &ctx.tableau[*line].assumptions,
        ) {
            if !silent {
                eprintln!("Error: line {} has incompatible assumptions.", line + 1);
            }
            return false;
        }
        if !restrictions_compatible(
            &ctx.tableau[implication_line].restrictions,
            &ctx.tableau[*line].restrictions,
        ) {
            if !silent {
                eprintln!(
                    "Error: line {} has incompatible target restrictions.",
                    line + 1
                );
            }
            return false;
        }
    }

    let forward = if all_hypotheses && !all_targets {
        true
    } else if all_targets && !all_hypotheses {
        false
    } else {
        eprintln!("Error: antecedents must be all hypotheses or all targets.");
        return false;
    };

    // peel guards off the unit clauses into the same guard list
    let mut unit_clauses = Vec::new();
    for line in other_lines {
        let (unit_specials, unit) = split_special(&ctx.tableau[*line].formula);
        specials.extend(unit_specials);
        unit_clauses.push(unit);
    }
    let unit_refs: Vec<&FolTreeNode> = unit_clauses.iter().collect();

    let mut subst = Substitution::new();
    let result = if forward == ponens {
        modus_ponens(&mut subst, ctx, &implication, &unit_refs, silent)
    } else {
        modus_tollens(&mut subst, ctx, &implication, &unit_refs, silent)
    };
    let justification_reason = if ponens {
        Reason::ModusPonens
    } else {
        Reason::ModusTollens
    };

    let Some(result) = result else {
        if !silent {
            eprintln!(
                "Error: modus {} failed to infer a result.",
                if ponens { "ponens" } else { "tollens" }
            );
        }
        return false;
    };

    // apply the substitution to the peeled guards
    let specials: Vec<FolTreeNode> = specials
        .iter()
        .map(|special| substitute(special, &subst))
        .collect();

    // every guard must be justified by one of the supplied special lines
    for special in &specials {
        let special_found = special_lines.iter().any(|special_line| {
            let mut special_subst = Substitution::new();
            unify(
                &ctx.tableau[*special_line].formula,
                special,
                &mut special_subst,
            )
        });
        if !special_found {
            if !silent {
                eprintln!(
                    "Error: predicated structure constraints are not satisfied in modus {}.",
                    if ponens { "ponens" } else { "tollens" }
                );
            }
            return false;
        }
    }

    // re-wrap the surviving guards around the result
    let result = reapply_special(&specials, result);

    let mut new_line = if forward {
        TableauLine::hypothesis(disjunction_to_implication(result))
    } else {
        let Ok(goal) = negate_node(result.clone(), true) else {
            return false;
        };
        TableauLine::target(result, goal)
    };

    let mut justification_lines = vec![implication_line];
    justification_lines.extend_from_slice(other_lines);
    new_line.justification = (justification_reason, justification_lines);

    new_line.assumptions = ctx.tableau[implication_line].assumptions.clone();
    new_line.restrictions = ctx.tableau[implication_line].restrictions.clone();
    for line in other_lines {
        new_line.assumptions =
            combine_assumptions(&new_line.assumptions, &ctx.tableau[*line].assumptions);
        new_line.restrictions =
            combine_restrictions(&new_line.restrictions, &ctx.tableau[*line].restrictions);
    }

    if forward {
        // this implication has been used forward; do not case-split it later
        ctx.tableau[implication_line].split = true;
    }

    ctx.tableau.push(new_line);

    if !forward {
        let new_index = ctx.tableau.len() - 1;
        ctx.hydra_replace_list(other_lines, new_index);
        ctx.restrictions_replace_list(other_lines, new_index);
        ctx.select_targets();
    }

    ctx.reasoning_count += 1;

    true
}

/// Pre-order search for the first subterm of `current` unifying with `P`; replace it
/// with the correspondingly substituted `Q`. Returns whether a replacement was made.
///
/// Only variables of the rewrite rule itself may be bound by the unifier
/// (`pattern_vars`); a "match" that would instantiate a variable of the rewritten
/// formula is not a match.
fn rewrite(
    combined_subst: &mut Substitution,
    current: &mut FolTreeNode,
    pattern: &FolTreeNode,
    replacement: &FolTreeNode,
    pattern_vars: &BTreeSet<String>,
) -> bool {
    let mut local_subst = Substitution::new();
    if unify(pattern, current, &mut local_subst)
        && local_subst.keys().all(|name| pattern_vars.contains(name))
    {
        *current = substitute(replacement, &local_subst);
        combined_subst.extend(local_subst);
        return true;
    }

    match &mut current.node_type {
        NodeType::Quantifier(_, _, body) => {
            rewrite(combined_subst, body, pattern, replacement, pattern_vars)
        }
        NodeType::Negation(child) => {
            rewrite(combined_subst, child, pattern, replacement, pattern_vars)
        }
        NodeType::LogicalBinary(_, left, right) => {
            rewrite(combined_subst, left, pattern, replacement, pattern_vars)
                || rewrite(combined_subst, right, pattern, replacement, pattern_vars)
        }
        NodeType::Application(children) | NodeType::Tuple(children) => children
            .iter_mut()
            .any(|child| rewrite(combined_subst, child, pattern, replacement, pattern_vars)),
        _ => false,
    }
}

/// Rewrite a line using an equality hypothesis `P = Q`: the first subterm unifying
/// with `P` (pre-order) is replaced by the substituted `Q`, appending the rewritten
/// formula as a new line of the same polarity.
pub fn move_rewrite(
    ctx: &mut ProofContext,
    formula_line: usize,
    rewrite_line: usize,
    silent: bool,
) -> bool {
    if formula_line >= ctx.tableau.len() {
        eprintln!("Error: formula line {} is out of bounds.", formula_line + 1);
        return false;
    }
    if rewrite_line >= ctx.tableau.len() {
        eprintln!("Error: rewrite line {} is out of bounds.", rewrite_line + 1);
        return false;
    }
    if !ctx.tableau[formula_line].active {
        eprintln!("Error: formula line {} is not active.", formula_line + 1);
        return false;
    }
    if ctx.tableau[rewrite_line].target {
        eprintln!("Error: rewrite line {} is not a hypothesis.", rewrite_line + 1);
        return false;
    }

    let rewrite_formula = ctx.tableau[rewrite_line].formula.clone();
    if !rewrite_formula.is_equality() {
        eprintln!(
            "Error: rewrite line {} does not contain an equality formula P = Q.",
            rewrite_line + 1
        );
        return false;
    }
    let NodeType::Application(equality_children) = &rewrite_formula.node_type else {
        return false;
    };
    let pattern = &equality_children[1];
    let replacement = &equality_children[2];

    if !assumptions_compatible(
        &ctx.tableau[formula_line].assumptions,
        &ctx.tableau[rewrite_line].assumptions,
    ) {
        if !silent {
            eprintln!("Error: formula line and rewrite line have incompatible assumptions.");
        }
        return false;
    }
    if !restrictions_compatible(
        &ctx.tableau[formula_line].restrictions,
        &ctx.tableau[rewrite_line].restrictions,
    ) {
        if !silent {
            eprintln!("Error: formula line and rewrite line have incompatible restrictions.");
        }
        return false;
    }

    let mut formula_copy = ctx.tableau[formula_line].formula.clone();

    // rename variables shared with the rewrite rule to avoid accidental capture
    // (parameters are shared constants and must keep their names)
    let mut vars_formula = BTreeSet::new();
    vars_used(&mut vars_formula, &formula_copy, false, true);
    let mut vars_rewrite = BTreeSet::new();
    vars_used(&mut vars_rewrite, &rewrite_formula, false, true);
    let common: BTreeSet<String> = vars_formula
        .intersection(&vars_rewrite)
        .cloned()
        .collect();
    if !common.is_empty() {
        let rename_list = vars_rename_list(ctx, &common);
        rename_vars(&mut formula_copy, &rename_list);
    }

    let mut pattern_vars = BTreeSet::new();
    vars_used(&mut pattern_vars, &rewrite_formula, true, true);

    let mut combined_subst = Substitution::new();
    if !rewrite(
        &mut combined_subst,
        &mut formula_copy,
        pattern,
        replacement,
        &pattern_vars,
    ) {
        if !silent {
            eprintln!(
                "Error: no subformula of line {} unifies with the left side of the rewrite rule.",
                formula_line + 1
            );
        }
        return false;
    }

    let mut new_line = if ctx.tableau[formula_line].target {
        let Ok(negated) = negate_node(formula_copy.clone(), false) else {
            return false;
        };
        TableauLine::target(formula_copy, disjunction_to_implication(negated))
    } else {
        TableauLine::hypothesis(formula_copy)
    };

    new_line.assumptions = combine_assumptions(
        &ctx.tableau[formula_line].assumptions,
        &ctx.tableau[rewrite_line].assumptions,
    );
    new_line.restrictions = combine_restrictions(
        &ctx.tableau[formula_line].restrictions,
        &ctx.tableau[rewrite_line].restrictions,
    );
    new_line.justification = (Reason::EqualitySubst, vec![formula_line, rewrite_line]);

    ctx.tableau.push(new_line);
    ctx.rewrite_count += 1;

    true
}

/// Case-split a hypothesis whose canonical implication form `P → Q` stands for a
/// disjunction with variable-disjoint sides: `¬P` assuming the line true (`+n`), and
/// `P`, `Q` assuming it false (`-n`). This is the only move introducing signed
/// assumptions.
pub fn move_sd(ctx: &mut ProofContext, line: usize) -> bool {
    if line >= ctx.tableau.len() {
        eprintln!("Error: line {} is out of bounds.", line + 1);
        return false;
    }
    if ctx.tableau[line].target {
        eprintln!("Error: formula is not a hypothesis.");
        return false;
    }

    let (specials, matrix) = split_special(&ctx.tableau[line].formula);
    let NodeType::LogicalBinary(LogicalBinaryOp::Implies, left, right) = matrix.node_type
    else {
        eprintln!("Error: formula is not a disjunction.");
        return false;
    };

    if !find_common_variables(&left, &right).is_empty() {
        eprintln!("Error: disjunction has shared variables.");
        return false;
    }

    let Ok(negated_left) = negate_node(left.as_ref().clone(), false) else {
        return false;
    };

    ctx.split_count += 1;

    let case_true = reapply_special(&specials, negated_left);
    let case_false_left = reapply_special(&specials, *left);
    let case_false_right = reapply_special(&specials, *right);

    let marker = (line + 1) as i32;
    let assumptions = ctx.tableau[line].assumptions.clone();
    let restrictions = ctx.tableau[line].restrictions.clone();

    let mut first = TableauLine::hypothesis(case_true);
    first.assumptions = assumptions.clone();
    first.assumptions.push(marker);
    let mut second = TableauLine::hypothesis(case_false_left);
    second.assumptions = assumptions.clone();
    second.assumptions.push(-marker);
    let mut third = TableauLine::hypothesis(case_false_right);
    third.assumptions = assumptions;
    third.assumptions.push(-marker);

    for new_line in [&mut first, &mut second, &mut third] {
        new_line.restrictions = restrictions.clone();
        new_line.justification = (Reason::SplitDisjunction, vec![line]);
    }

    ctx.tableau[line].active = false;
    ctx.tableau[line].split = true;

    ctx.tableau.push(first);
    ctx.tableau.push(second);
    ctx.tableau.push(third);

    true
}

#[cfg(test)]
mod tests {
    use crate::manipulation::negation::negate_node;
    use crate::moves::reasoning::{move_mpt, move_rewrite, move_sd};
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
    /// Forward modus ponens instantiates the consequent (simple ground case).
    fn forward_modus_ponens() {
        let mut ctx = ProofContext::new();
        let unit = push_hypothesis(&mut ctx, "P(a)");
        let implication = push_hypothesis(&mut ctx, "P(x) \\implies Q(x)");

        assert!(move_mpt(&mut ctx, implication, &[unit], &[], true, true));
        let new_line = ctx.tableau.last().unwrap();
        assert!(!new_line.target);
        assert_eq!(new_line.formula.to_repr(), "Q(a)");
        assert_eq!(new_line.justification_string(), "MP[2, 1]");
        assert!(ctx.tableau[implication].split);
    }

    #[test]
    /// Forward inference with a two-conjunct antecedent and two unit lines.
    fn forward_two_units() {
        let mut ctx = ProofContext::new();
        let first = push_hypothesis(&mut ctx, "P(a)");
        let second = push_hypothesis(&mut ctx, "Q(b)");
        let implication =
            push_hypothesis(&mut ctx, "P(x) \\wedge Q(y) \\implies R(x, y)");

        assert!(move_mpt(&mut ctx, implication, &[first, second], &[], true, true));
        assert_eq!(ctx.tableau.last().unwrap().formula.to_repr(), "R(a, b)");
    }

    #[test]
    /// Backward inference replaces the target with the instantiated antecedent goal.
    fn backward_replaces_target() {
        let mut ctx = ProofContext::new();
        let implication = push_hypothesis(&mut ctx, "P(x) \\implies Q(x)");
        let target = push_target(&mut ctx, "Q(a)");
        ctx.initialize_hydras();
        ctx.select_targets();

        // backward + ponens flag runs through the contrapositive machinery
        assert!(move_mpt(&mut ctx, implication, &[target], &[], true, true));
        let new_line = ctx.tableau.last().unwrap();
        assert!(new_line.target);
        assert_eq!(new_line.negation.as_ref().unwrap().to_repr(), "P(a)");

        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![2]);
    }

    #[test]
    /// Colliding variables between implication and units are renamed apart.
    fn collision_renaming() {
        let mut ctx = ProofContext::new();
        let unit = push_hypothesis(&mut ctx, "P(x)");
        let implication = push_hypothesis(&mut ctx, "P(x) \\implies Q(f(x))");

        assert!(move_mpt(&mut ctx, implication, &[unit], &[], true, true));
        // the implication's x was renamed, then unified with the unit's x
        assert_eq!(ctx.tableau.last().unwrap().formula.to_repr(), "Q(f(x))");
    }

    #[test]
    /// An arity mismatch between conjuncts and units aborts the move.
    fn arity_mismatch_fails() {
        let mut ctx = ProofContext::new();
        let unit = push_hypothesis(&mut ctx, "P(a)");
        let implication =
            push_hypothesis(&mut ctx, "P(x) \\wedge Q(y) \\implies R(x, y)");

        let length_before = ctx.tableau.len();
        assert!(!move_mpt(&mut ctx, implication, &[unit], &[], true, true));
        assert_eq!(ctx.tableau.len(), length_before);
    }

    #[test]
    /// Incompatible assumptions silently block the move.
    fn incompatible_assumptions_fail() {
        let mut ctx = ProofContext::new();
        let unit = push_hypothesis(&mut ctx, "P(a)");
        ctx.tableau[unit].assumptions = vec![3];
        let implication = push_hypothesis(&mut ctx, "P(x) \\implies Q(x)");
        ctx.tableau[implication].assumptions = vec![-3];

        assert!(!move_mpt(&mut ctx, implication, &[unit], &[], true, true));
    }

    #[test]
    /// A guarded implication fails the structural check when no special lines are
    /// supplied, and fires when a matching special line is.
    fn special_guard_check() {
        let mut ctx = ProofContext::new();
        let unit = push_hypothesis(&mut ctx, "P(a)");
        let implication = push_hypothesis(
            &mut ctx,
            "\\mathrm{set}(x) \\implies (P(x) \\implies Q(x))",
        );
        let special = push_hypothesis(&mut ctx, "\\mathrm{set}(a)");

        assert!(!move_mpt(&mut ctx, implication, &[unit], &[], true, true));
        assert!(move_mpt(&mut ctx, implication, &[unit], &[special], true, true));
        // the guard survives on the still-live variable of the result
        assert_eq!(
            ctx.tableau.last().unwrap().formula.to_repr(),
            "\\mathrm{set}(a) \\implies Q(a)"
        );
    }

    #[test]
    /// Equality rewriting replaces the first matching subterm.
    fn rewrite_subterm() {
        let mut ctx = ProofContext::new();
        let formula = push_hypothesis(&mut ctx, "P(f(c), b)");
        let equality = push_hypothesis(&mut ctx, "f(x) = g(x)");

        assert!(move_rewrite(&mut ctx, formula, equality, true));
        assert_eq!(ctx.tableau.last().unwrap().formula.to_repr(), "P(g(c), b)");
        assert_eq!(ctx.tableau.last().unwrap().justification_string(), "ES[1, 2]");
    }

    #[test]
    /// Rewriting fails when nothing matches the left side of the rule.
    fn rewrite_no_match() {
        let mut ctx = ProofContext::new();
        let formula = push_hypothesis(&mut ctx, "P(b)");
        let equality = push_hypothesis(&mut ctx, "f(a) = g(a)");

        assert!(!move_rewrite(&mut ctx, formula, equality, true));
    }

    #[test]
    /// Splitting a variable-disjoint disjunction introduces signed assumptions.
    fn split_disjunction_assumptions() {
        let mut ctx = ProofContext::new();
        // A(x) ∨ B(y) in canonical implication form
        let line = push_hypothesis(&mut ctx, "\\neg A(x) \\implies B(y)");

        assert!(move_sd(&mut ctx, line));
        assert_eq!(ctx.tableau.len(), 4);
        assert!(!ctx.tableau[line].active);
        assert!(ctx.tableau[line].split);

        assert_eq!(ctx.tableau[1].formula.to_repr(), "A(x)");
        assert_eq!(ctx.tableau[1].assumptions, vec![1]);
        assert_eq!(ctx.tableau[2].formula.to_repr(), "\\neg A(x)");
        assert_eq!(ctx.tableau[2].assumptions, vec![-1]);
        assert_eq!(ctx.tableau[3].formula.to_repr(), "B(y)");
        assert_eq!(ctx.tableau[3].assumptions, vec![-1]);
        assert_eq!(ctx.tableau[3].justification_string(), "SD[1]");
    }

    #[test]
    /// Shared variables between the disjuncts block the split.
    fn split_disjunction_shared_vars() {
        let mut ctx = ProofContext::new();
        let line = push_hypothesis(&mut ctx, "\\neg A(x) \\implies B(x)");
        assert!(!move_sd(&mut ctx, line));
        assert!(ctx.tableau[line].active);
    }

    #[test]
    /// Same-named but independently bound variables do not count as shared, so the
    /// split of `∀x A(x) ∨ ∀x B(x)` goes through.
    fn split_disjunction_bound_name_collision() {
        let mut ctx = ProofContext::new();
        let line = push_hypothesis(
            &mut ctx,
            "\\neg (\\forall x A(x)) \\implies (\\forall x B(x))",
        );

        assert!(move_sd(&mut ctx, line));
        assert_eq!(ctx.tableau.len(), 4);
        assert_eq!(ctx.tableau[1].formula.to_repr(), "\\forall x A(x)");
        assert_eq!(ctx.tableau[1].assumptions, vec![1]);
        assert_eq!(ctx.tableau[2].formula.to_repr(), "\\neg \\forall x A(x)");
        assert_eq!(ctx.tableau[2].assumptions, vec![-1]);
        assert_eq!(ctx.tableau[3].formula.to_repr(), "\\forall x B(x)");
        assert_eq!(ctx.tableau[3].assumptions, vec![-1]);
    }
}
