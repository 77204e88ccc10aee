//! First-order unification with occurs check.

use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::VariableKind;
use crate::unification::substitution::Substitution;

/// Follow variable-to-variable aliases in the substitution to a final name.
fn resolve_alias<'a>(name: &'a str, subst: &'a Substitution) -> &'a str {
    let mut current = name;
    while let Some(image) = subst.get(current) {
        match &image.node_type {
            NodeType::Variable(data) if data.name != current => current = data.name.as_str(),
            _ => break,
        }
    }
    current
}

/// Check whether the variable occurs anywhere in the given node (occurs check).
fn occurs_check(var: &FolTreeNode, node: &FolTreeNode) -> bool {
    if let NodeType::Variable(data) = &node.node_type {
        if data.name == var.name() {
            return true;
        }
    }
    node.children().iter().any(|child| occurs_check(var, child))
}

/// Try to unify a free individual variable with a term, extending `subst`.
fn unify_variable(var: &FolTreeNode, term: &FolTreeNode, subst: &mut Substitution) -> bool {
    let var_name = var.name().to_string();

    // if the variable is already bound, unify its image with the term
    if let Some(image) = subst.get(&var_name) {
        let image = image.clone();
        return unify(&image, term, subst);
    }

    // if the term is itself a bound variable, unify against its image
    if term.is_variable() {
        if let Some(image) = subst.get(term.name()) {
            let image = image.clone();
            return unify(var, &image, subst);
        }
    }

    // a variable unifies with itself
    if let NodeType::Variable(data) = &term.node_type {
        if data.name == var_name {
            return true;
        }
    }

    // the occurs check prevents circular bindings
    if occurs_check(var, term) {
        return false;
    }

    // only terms may enter the substitution, never formulae
    match &term.node_type {
        NodeType::Variable(_)
        | NodeType::Constant(_)
        | NodeType::Application(_)
        | NodeType::Tuple(_) => {
            subst.insert(var_name, term.clone());
            true
        }
        _ => false,
    }
}

/// Unify two nodes, extending `subst` with the variable bindings of the most general
/// unifier. Returns `false` (and possibly a partially extended `subst`, which callers
/// discard) when the nodes cannot be unified.
///
/// Free individual variables unify with terms subject to the occurs check; parameters,
/// functions, and predicates only unify with themselves by kind and name.
pub fn unify(node1: &FolTreeNode, node2: &FolTreeNode, subst: &mut Substitution) -> bool {
    // free individual variables are the only thing the substitution may bind
    if node1.is_free_variable() {
        return unify_variable(node1, node2, subst);
    }
    if node2.is_free_variable() {
        return unify_variable(node2, node1, subst);
    }

    match (&node1.node_type, &node2.node_type) {
        // parameters and other named symbols must agree exactly; bound individual
        // variables are compared through the local aliases set up by the
        // quantifier case below
        (NodeType::Variable(data1), NodeType::Variable(data2)) => {
            if data1.kind != data2.kind {
                return false;
            }
            if data1.kind == VariableKind::Individual {
                let name1 = resolve_alias(&data1.name, subst);
                let name2 = resolve_alias(&data2.name, subst);
                name1 == name2
            } else {
                data1.name == data2.name
            }
        }
        (NodeType::Application(children1), NodeType::Application(children2)) => {
            // heads must agree: same named symbol or the same operator/predicate
            let heads_match = match (&children1[0].node_type, &children2[0].node_type) {
                (NodeType::Variable(data1), NodeType::Variable(data2)) => {
                    data1.kind == data2.kind && data1.name == data2.name
                }
                (NodeType::UnaryOp(op1), NodeType::UnaryOp(op2)) => op1 == op2,
                (NodeType::BinaryOp(op1), NodeType::BinaryOp(op2)) => op1 == op2,
                (NodeType::UnaryPred(symbol1), NodeType::UnaryPred(symbol2)) => {
                    symbol1 == symbol2
                }
                (NodeType::BinaryPred(symbol1), NodeType::BinaryPred(symbol2)) => {
                    symbol1 == symbol2
                }
                _ => false,
            };
            if !heads_match || children1.len() != children2.len() {
                return false;
            }
            children1[1..]
                .iter()
                .zip(children2[1..].iter())
                .all(|(child1, child2)| unify(child1, child2, subst))
        }
        (NodeType::Tuple(children1), NodeType::Tuple(children2)) => {
            children1.len() == children2.len()
                && children1
                    .iter()
                    .zip(children2.iter())
                    .all(|(child1, child2)| unify(child1, child2, subst))
        }
        (NodeType::Constant(symbol1), NodeType::Constant(symbol2)) => symbol1 == symbol2,
        (NodeType::Negation(child1), NodeType::Negation(child2)) => {
            unify(child1, child2, subst)
        }
        (
            NodeType::LogicalBinary(op1, left1, right1),
            NodeType::LogicalBinary(op2, left2, right2),
        ) => op1 == op2 && unify(left1, left2, subst) && unify(right1, right2, subst),
        (
            NodeType::Quantifier(op1, var1, body1),
            NodeType::Quantifier(op2, var2, body2),
        ) => {
            if op1 != op2 {
                return false;
            }
            // alias the bound variables locally before recursing into the bodies
            let mut local_subst = subst.clone();
            let mut var1_free = var1.as_ref().clone();
            let mut var2_free = var2.as_ref().clone();
            if let Some(data) = var1_free.as_variable_mut() {
                data.bound = false;
            }
            if let Some(data) = var2_free.as_variable_mut() {
                data.bound = false;
            }
            if !unify_variable(&var1_free, &var2_free, &mut local_subst) {
                return false;
            }
            if !unify(body1, body2, &mut local_subst) {
                return false;
            }
            *subst = local_subst;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::manipulation::equality::equal;
    use crate::preprocessing::fol_tree::FolTreeNode;
    use crate::preprocessing::operator_enums::VariableKind;
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::unification::substitution::{Substitution, substitute};
    use crate::unification::unify::unify;

    fn parse(formula: &str) -> FolTreeNode {
        parse_fol_formula(formula).unwrap()
    }

    #[test]
    /// Test unification of predicate applications with variable arguments.
    fn unify_applications() {
        let general = parse("P(x, y)");
        let concrete = parse("P(a, b)");

        let mut subst = Substitution::new();
        assert!(unify(&general, &concrete, &mut subst));
        assert_eq!(subst.len(), 2);
        assert_eq!(subst.get("x").unwrap().to_repr(), "a");
        assert_eq!(subst.get("y").unwrap().to_repr(), "b");
    }

    #[test]
    /// A computed unifier makes both sides equal after substitution.
    fn unifier_soundness() {
        let cases = vec![
            ("P(x, b)", "P(a, y)"),
            ("P(f(x), x)", "P(f(a), a)"),
            ("P(x) \\implies Q(x)", "P(a) \\implies Q(y)"),
            ("x = f(y)", "z = f(b)"),
        ];
        for (formula1, formula2) in cases {
            let tree1 = parse(formula1);
            let tree2 = parse(formula2);
            let mut subst = Substitution::new();
            assert!(unify(&tree1, &tree2, &mut subst), "{formula1} ~ {formula2}");
            let image1 = substitute(&tree1, &subst);
            let image2 = substitute(&tree2, &subst);
            assert!(
                equal(&image1, &image2),
                "unifier of {formula1} and {formula2} is not sound: {image1} vs {image2}"
            );
        }
    }

    #[test]
    /// The occurs check rejects `x ~ f(x)`.
    fn occurs_check() {
        let var = FolTreeNode::mk_variable("x");
        let term = FolTreeNode::mk_application(vec![
            FolTreeNode::mk_variable_with_kind("f", VariableKind::Function, 1),
            FolTreeNode::mk_variable("x"),
        ]);
        let mut subst = Substitution::new();
        assert!(!unify(&var, &term, &mut subst));
    }

    #[test]
    /// Parameters and distinct symbols do not unify with anything else.
    fn mismatches_fail() {
        let mut param = FolTreeNode::mk_variable("a");
        if let Some(data) = param.as_variable_mut() {
            data.kind = VariableKind::Parameter;
        }
        let other = FolTreeNode::mk_variable_with_kind("b", VariableKind::Parameter, 0);
        let mut subst = Substitution::new();
        assert!(!unify(&param, &other, &mut subst));

        // a free variable still unifies with a parameter
        let free = FolTreeNode::mk_variable("x");
        let mut subst = Substitution::new();
        assert!(unify(&free, &param, &mut subst));

        // different predicates never unify
        let mut subst = Substitution::new();
        assert!(!unify(&parse("P(x)"), &parse("Q(x)"), &mut subst));
        // arity mismatch
        let mut subst = Substitution::new();
        assert!(!unify(&parse("P(x)"), &parse("P(x, y)"), &mut subst));
    }

    #[test]
    /// Transitive bindings through the substitution are followed.
    fn bound_variables_followed() {
        let left = parse("P(x, x)");
        let right = parse("P(y, a)");
        let mut subst = Substitution::new();
        assert!(unify(&left, &right, &mut subst));
        // both x and y must end up equal to a after substitution
        let image_left = substitute(&left, &subst);
        let image_right = substitute(&right, &subst);
        assert!(equal(&image_left, &image_right));
    }

    #[test]
    /// Quantified formulae unify by locally aliasing their bound variables.
    fn quantifier_unification() {
        let tree1 = parse("\\forall x P(x, z)");
        let tree2 = parse("\\forall y P(y, z)");
        let mut subst = Substitution::new();
        assert!(unify(&tree1, &tree2, &mut subst));

        let tree3 = parse("\\exists x P(x, z)");
        let mut subst = Substitution::new();
        assert!(!unify(&tree1, &tree3, &mut subst));
    }

    #[test]
    /// A formula never enters the substitution as a variable image.
    fn formula_image_rejected() {
        let var = FolTreeNode::mk_variable("x");
        let formula = parse("P(a) \\wedge Q(b)");
        let mut subst = Substitution::new();
        assert!(!unify(&var, &formula, &mut subst));
        assert!(subst.is_empty());
    }
}
