//! Skolemization: stripping outer quantifiers, replacing existentials with Skolem
//! functions of the universals actually used, and the parameterization of free
//! variables in targets.

use crate::manipulation::negation::{disjunction_to_implication, negate_node};
use crate::manipulation::special::unwrap_special;
use crate::manipulation::variables::{
    append_subscript, remove_subscript, unbind_var, vars_used,
};
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::{LogicalBinaryOp, Quantifier, VariableKind};
use crate::tableau::context::ProofContext;
use crate::unification::substitution::{Substitution, substitute};

use std::collections::BTreeSet;

/// Build the Skolem term for an existential variable: a fresh function applied to the
/// in-scope universals actually used in the body, or a fresh parameter when none are.
fn skolem_term(
    ctx: &mut ProofContext,
    existential_var: &str,
    universals: &[String],
    body: &FolTreeNode,
) -> FolTreeNode {
    let mut used_vars = BTreeSet::new();
    vars_used(&mut used_vars, body, true, true);

    let used_universals: Vec<&String> = universals
        .iter()
        .filter(|u| used_vars.contains(u.as_str()))
        .collect();

    let base = remove_subscript(existential_var);
    let index = ctx.get_next_index(base.as_str());
    let skolem_name = append_subscript(base.as_str(), index);

    if used_universals.is_empty() {
        FolTreeNode::mk_variable_with_kind(skolem_name.as_str(), VariableKind::Parameter, 0)
    } else {
        let mut children = vec![FolTreeNode::mk_variable_with_kind(
            skolem_name.as_str(),
            VariableKind::Function,
            used_universals.len(),
        )];
        for universal in used_universals {
            children.push(FolTreeNode::mk_variable(universal.as_str()));
        }
        FolTreeNode::mk_application(children)
    }
}

/// Skolemize an arbitrary formula, consuming it.
///
/// Outer quantifiers are stripped: universals are dropped (their variables become
/// free), existentials are replaced via [skolem_term]. Special-binder guards are
/// peeled along the way and reattached (outermost first) before the accumulated
/// substitution is applied.
pub fn skolem_form(ctx: &mut ProofContext, formula: FolTreeNode) -> FolTreeNode {
    let mut subst = Substitution::new();
    let mut universals: Vec<String> = Vec::new();
    let mut guards: Vec<FolTreeNode> = Vec::new();

    let mut current = formula;
    while let NodeType::Quantifier(op, var, body) = current.node_type {
        let var_name = var.name().to_string();

        match op {
            Quantifier::Forall => universals.push(var_name.clone()),
            Quantifier::Exists => {
                let term = skolem_term(ctx, var_name.as_str(), &universals, &body);
                subst.insert(var_name.clone(), term);
            }
        }

        // peel a guard of the quantified variable itself, keeping it for reattachment
        let is_special = body.is_special_implication()
            && match &body.node_type {
                NodeType::LogicalBinary(_, left, _) => match &left.node_type {
                    NodeType::Application(children) => children[1].name() == var_name,
                    _ => false,
                },
                _ => false,
            };

        let mut inner = if is_special {
            match body.node_type {
                NodeType::LogicalBinary(_, left, right) => {
                    let mut guard = *left;
                    unbind_var(&mut guard, var_name.as_str());
                    guards.push(guard);
                    *right
                }
                _ => unreachable!(),
            }
        } else {
            *body
        };

        unbind_var(&mut inner, var_name.as_str());
        current = inner;
    }

    // reattach the special implications, outermost first
    for guard in guards.into_iter().rev() {
        current = FolTreeNode::mk_binary(LogicalBinaryOp::Implies, guard, current);
    }

    if subst.is_empty() {
        current
    } else {
        substitute(&current, &subst)
    }
}

/// Convert free individual variables of the formula to parameters, in place.
pub fn parameterize(formula: &mut FolTreeNode) {
    if let NodeType::Variable(data) = &mut formula.node_type {
        if data.kind == VariableKind::Individual && !data.bound {
            data.kind = VariableKind::Parameter;
        }
    }

    match &mut formula.node_type {
        NodeType::Quantifier(_, var, body) => {
            parameterize(var);
            parameterize(body);
        }
        NodeType::Negation(child) => parameterize(child),
        NodeType::LogicalBinary(_, left, right) => {
            parameterize(left);
            parameterize(right);
        }
        NodeType::Application(children) | NodeType::Tuple(children) => {
            for child in children {
                parameterize(child);
            }
        }
        _ => {}
    }
}

/// Convert the free individual variables of all active target lines to parameters.
/// Runs only once per context.
///
/// Only targets are parameterized: a target's free variables name the specific
/// objects of the goal, while free variables of a hypothesis are implicitly
/// universal and must stay available to unification.
pub fn parameterize_all(ctx: &mut ProofContext) {
    if ctx.parameterized {
        return;
    }
    // nothing to parameterize before the problem's targets arrive (library loads
    // run cleanup on hypothesis-only records first)
    if !ctx.tableau.iter().any(|line| line.target) {
        return;
    }

    let silent = ctx.silent;
    for line in ctx.tableau.iter_mut() {
        if line.active && line.target {
            if let Some(negation) = &mut line.negation {
                parameterize(negation);
                match negate_node(negation.clone(), false) {
                    Ok(negated) => line.formula = negated,
                    Err(error) => {
                        if !silent {
                            eprintln!("Error: {error}");
                        }
                    }
                }
            } else {
                parameterize(&mut line.formula);
            }
        }
    }

    ctx.parameterized = true;
}

/// Skolemize every active line from `start` onward. Targets get their negation field
/// renegated from the skolemized formula. Returns whether anything changed.
pub fn skolemize_all(ctx: &mut ProofContext, start: usize) -> bool {
    parameterize_all(ctx);

    let mut moved = false;

    for i in start..ctx.tableau.len() {
        if !ctx.tableau[i].active
            || ctx.tableau[i].is_theorem()
            || ctx.tableau[i].is_definition()
        {
            continue;
        }

        let quantified = matches!(
            unwrap_special(&ctx.tableau[i].formula).node_type,
            NodeType::Quantifier(_, _, _)
        );
        if !quantified {
            continue;
        }

        let formula = ctx.tableau[i].formula.clone();
        let skolemized = skolem_form(ctx, formula);
        moved = true;
        ctx.cleanup_count += 1;

        if !ctx.tableau[i].target {
            ctx.tableau[i].formula = disjunction_to_implication(skolemized);
        } else {
            ctx.tableau[i].formula = skolemized;
            match negate_node(ctx.tableau[i].formula.clone(), false) {
                Ok(negated) => {
                    ctx.tableau[i].negation = Some(disjunction_to_implication(negated));
                }
                Err(error) => {
                    if !ctx.silent {
                        eprintln!("Error: {error}");
                    }
                }
            }
        }
    }

    moved
}
