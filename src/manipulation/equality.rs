//! Structural equality of formula trees modulo consistent renaming of variables bound
//! by quantifiers.

use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::VariableKind;

use std::collections::HashMap;

/// Compare two trees for equality up to renaming of quantified variables.
///
/// Both trees are walked in lockstep; entering a quantifier extends a name mapping
/// from the left tree's bound variable to the right tree's. Free variables must match
/// by name exactly.
pub fn equal(a: &FolTreeNode, b: &FolTreeNode) -> bool {
    let mut var_map = HashMap::new();
    equal_helper(a, b, &mut var_map)
}

fn equal_helper(
    a: &FolTreeNode,
    b: &FolTreeNode,
    var_map: &mut HashMap<String, String>,
) -> bool {
    match (&a.node_type, &b.node_type) {
        (NodeType::Variable(data_a), NodeType::Variable(data_b)) => {
            if data_a.kind != data_b.kind {
                return false;
            }
            if data_a.kind == VariableKind::Individual {
                match var_map.get(data_a.name.as_str()) {
                    // variable was mapped by a quantifier, check consistency
                    Some(mapped) => *mapped == data_b.name,
                    // free variables must match exactly
                    None => data_a.name == data_b.name,
                }
            } else {
                data_a.name == data_b.name
            }
        }
        (NodeType::Constant(symbol_a), NodeType::Constant(symbol_b)) => symbol_a == symbol_b,
        (NodeType::Quantifier(op_a, var_a, body_a), NodeType::Quantifier(op_b, var_b, body_b)) => {
            if op_a != op_b {
                return false;
            }
            // map the bound variable of `a` to the one of `b`, restoring any
            // outer mapping of the same name afterwards
            let name_a = var_a.name().to_string();
            let previous = var_map.insert(name_a.clone(), var_b.name().to_string());
            let result = equal_helper(body_a, body_b, var_map);
            match previous {
                Some(old) => {
                    var_map.insert(name_a, old);
                }
                None => {
                    var_map.remove(&name_a);
                }
            }
            result
        }
        (NodeType::Negation(child_a), NodeType::Negation(child_b)) => {
            equal_helper(child_a, child_b, var_map)
        }
        (
            NodeType::LogicalBinary(op_a, left_a, right_a),
            NodeType::LogicalBinary(op_b, left_b, right_b),
        ) => {
            op_a == op_b
                && equal_helper(left_a, left_b, var_map)
                && equal_helper(right_a, right_b, var_map)
        }
        (NodeType::UnaryOp(op_a), NodeType::UnaryOp(op_b)) => op_a == op_b,
        (NodeType::BinaryOp(op_a), NodeType::BinaryOp(op_b)) => op_a == op_b,
        (NodeType::UnaryPred(symbol_a), NodeType::UnaryPred(symbol_b)) => symbol_a == symbol_b,
        (NodeType::BinaryPred(symbol_a), NodeType::BinaryPred(symbol_b)) => symbol_a == symbol_b,
        (NodeType::Application(children_a), NodeType::Application(children_b))
        | (NodeType::Tuple(children_a), NodeType::Tuple(children_b)) => {
            children_a.len() == children_b.len()
                && children_a
                    .iter()
                    .zip(children_b.iter())
                    .all(|(child_a, child_b)| equal_helper(child_a, child_b, var_map))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::manipulation::equality::equal;
    use crate::preprocessing::parser::parse_fol_formula;

    fn check_equal(formula1: &str, formula2: &str, expected: bool) {
        let tree1 = parse_fol_formula(formula1).unwrap();
        let tree2 = parse_fol_formula(formula2).unwrap();
        assert_eq!(
            equal(&tree1, &tree2),
            expected,
            "{formula1} vs {formula2}"
        );
    }

    #[test]
    /// Formulae differing only in bound-variable names are equal.
    fn equal_modulo_bound_renaming() {
        check_equal("\\forall x P(x)", "\\forall y P(y)", true);
        check_equal(
            "\\forall x \\exists y P(x, y)",
            "\\forall u \\exists v P(u, v)",
            true,
        );
        check_equal(
            "\\forall x (P(x) \\implies Q(x))",
            "\\forall z (P(z) \\implies Q(z))",
            true,
        );
    }

    #[test]
    /// Free variables must match by name exactly.
    fn free_variables_exact() {
        check_equal("P(x)", "P(y)", false);
        check_equal("P(x)", "P(x)", true);
        check_equal("\\forall x P(x, y)", "\\forall z P(z, w)", false);
    }

    #[test]
    /// Mismatched structure is never equal.
    fn structural_mismatch() {
        check_equal("P \\wedge Q", "P \\vee Q", false);
        check_equal("\\forall x P(x)", "\\exists x P(x)", false);
        check_equal("P(x)", "P(x, y)", false);
        check_equal("x = y", "x \\in y", false);
    }

    #[test]
    /// Shadowed quantifier mappings do not leak into sibling subtrees.
    fn shadowing_is_scoped() {
        check_equal(
            "(\\forall x P(x)) \\wedge Q(x)",
            "(\\forall y P(y)) \\wedge Q(x)",
            true,
        );
        check_equal(
            "(\\forall x P(x)) \\wedge Q(x)",
            "(\\forall y P(y)) \\wedge Q(y)",
            false,
        );
    }
}
