//! Substitutions: finite maps from individual-variable names to terms, and their
//! application to formula trees.

use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};

use std::collections::HashMap;

/// A finite map from individual-variable names to terms.
pub type Substitution = HashMap<String, FolTreeNode>;

/// Apply `subst` to every free individual variable of `formula`, producing a new tree.
///
/// Quantifier binders are respected: a substitution on `x` does not descend into
/// `∀x φ`.
pub fn substitute(formula: &FolTreeNode, subst: &Substitution) -> FolTreeNode {
    if subst.is_empty() {
        return formula.clone();
    }
    match &formula.node_type {
        NodeType::Variable(data) => {
            if formula.is_free_variable() {
                if let Some(image) = subst.get(data.name.as_str()) {
                    return image.clone();
                }
            }
            formula.clone()
        }
        NodeType::Quantifier(op, var, body) => {
            // the binder shadows its own name
            if subst.contains_key(var.name()) {
                let mut inner = subst.clone();
                inner.remove(var.name());
                FolTreeNode::mk_quantifier(
                    *op,
                    var.as_ref().clone(),
                    substitute(body, &inner),
                )
            } else {
                FolTreeNode::mk_quantifier(*op, var.as_ref().clone(), substitute(body, subst))
            }
        }
        NodeType::Negation(child) => FolTreeNode::mk_negation(substitute(child, subst)),
        NodeType::LogicalBinary(op, left, right) => {
            FolTreeNode::mk_binary(*op, substitute(left, subst), substitute(right, subst))
        }
        NodeType::Application(children) => FolTreeNode::mk_application(
            children.iter().map(|child| substitute(child, subst)).collect(),
        ),
        NodeType::Tuple(children) => FolTreeNode::mk_tuple(
            children.iter().map(|child| substitute(child, subst)).collect(),
        ),
        _ => formula.clone(),
    }
}

/// Extend `combined` with a single binding, left-biased: an existing binding wins, and
/// the extension is rejected (returning `false`) if the new image conflicts with it.
pub fn extend_substitution(combined: &mut Substitution, name: &str, image: &FolTreeNode) -> bool {
    match combined.get(name) {
        Some(existing) => existing.to_repr() == image.to_repr(),
        None => {
            combined.insert(name.to_string(), image.clone());
            true
        }
    }
}

/// Merge `other` into `combined` binding by binding; any conflict rejects the whole
/// merge and leaves `combined` untouched.
pub fn merge_substitutions(combined: &mut Substitution, other: &Substitution) -> bool {
    for (name, image) in other {
        if let Some(existing) = combined.get(name) {
            if existing.to_repr() != image.to_repr() {
                return false;
            }
        }
    }
    for (name, image) in other {
        combined.entry(name.clone()).or_insert_with(|| image.clone());
    }
    true
}
