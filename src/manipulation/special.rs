//! Handling of special implications: guards of the shape `P(x) → φ` where `P` is a
//! structural (typing) predicate and `x` an individual variable. Moves peel these
//! guards off before pattern matching and reapply them to surviving variables after.

use crate::manipulation::variables::vars_used;
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::LogicalBinaryOp;

use std::collections::BTreeSet;

/// A reference to the matrix of a formula, skipping any outer special implications.
pub fn unwrap_special(formula: &FolTreeNode) -> &FolTreeNode {
    let mut matrix = formula;
    while matrix.is_special_implication() {
        if let NodeType::LogicalBinary(_, _, right) = &matrix.node_type {
            matrix = right;
        }
    }
    matrix
}

/// Split a formula into its outer special-implication guards and the matrix.
///
/// The guards (the predicate applications, not the implications) are returned
/// outermost first; both guards and matrix are deep copies.
pub fn split_special(formula: &FolTreeNode) -> (Vec<FolTreeNode>, FolTreeNode) {
    let mut specials = Vec::new();
    let mut matrix = formula;
    while matrix.is_special_implication() {
        if let NodeType::LogicalBinary(_, left, right) = &matrix.node_type {
            specials.push(left.as_ref().clone());
            matrix = right;
        }
    }
    (specials, matrix.clone())
}

/// Prepend the given special predicates to a formula as implications.
///
/// A guard is only reapplied when its argument variable actually occurs free in the
/// formula; guards whose variable disappeared are dropped, and duplicated guards are
/// applied once.
pub fn reapply_special(special_predicates: &[FolTreeNode], formula: FolTreeNode) -> FolTreeNode {
    let mut vars = BTreeSet::new();
    vars_used(&mut vars, &formula, false, false);

    let mut applied: BTreeSet<String> = BTreeSet::new();
    let mut result = formula;

    for special in special_predicates.iter().rev() {
        let argument = match &special.node_type {
            NodeType::Application(children) if children.len() == 2 => &children[1],
            _ => continue,
        };
        if !argument.is_variable() {
            continue;
        }
        if !vars.contains(argument.name()) {
            continue;
        }
        let special_repr = special.to_repr();
        if applied.contains(&special_repr) {
            continue;
        }
        applied.insert(special_repr);

        result = FolTreeNode::mk_binary(LogicalBinaryOp::Implies, special.clone(), result);
    }

    result
}
