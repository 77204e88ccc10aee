//! Functionality regarding the variables of a formula: collection, renaming,
//! subscript handling, binding flags, and the structural measures derived from them.

use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::{LogicalBinaryOp, VariableKind};

use std::collections::BTreeSet;

/// Collect the names of individual variables (and parameters) occurring in `root` into
/// `variables`, filtered by the two flags.
pub fn vars_used(
    variables: &mut BTreeSet<String>,
    root: &FolTreeNode,
    include_params: bool,
    include_bound: bool,
) {
    if let NodeType::Variable(data) = &root.node_type {
        let relevant_kind = matches!(
            data.kind,
            VariableKind::Individual | VariableKind::Parameter
        );
        if relevant_kind
            && (include_params || data.kind != VariableKind::Parameter)
            && (include_bound || !data.bound)
        {
            variables.insert(data.name.clone());
        }
    }

    for child in root.children() {
        vars_used(variables, child, include_params, include_bound);
    }
}

/// The intersection of the free-variable sets of two formulae. Bound occurrences do
/// not count: quantified variables that merely share a name are not shared variables.
/// Parameters are excluded on the first formula, so a common parameter alone does not
/// count as sharing either.
pub fn find_common_variables(formula1: &FolTreeNode, formula2: &FolTreeNode) -> BTreeSet<String> {
    let mut vars1 = BTreeSet::new();
    let mut vars2 = BTreeSet::new();
    vars_used(&mut vars1, formula1, false, false);
    vars_used(&mut vars2, formula2, true, false);
    vars1.intersection(&vars2).cloned().collect()
}

/// Set the `bound` flag on every occurrence of the named variable.
pub fn bind_var(current: &mut FolTreeNode, var_name: &str) {
    set_bound_flag(current, var_name, true);
}

/// Clear the `bound` flag on every occurrence of the named variable.
pub fn unbind_var(current: &mut FolTreeNode, var_name: &str) {
    set_bound_flag(current, var_name, false);
}

fn set_bound_flag(current: &mut FolTreeNode, var_name: &str, bound: bool) {
    match &mut current.node_type {
        NodeType::Variable(data) => {
            if data.name == var_name {
                data.bound = bound;
            }
        }
        NodeType::Quantifier(_, var, body) => {
            set_bound_flag(var, var_name, bound);
            set_bound_flag(body, var_name, bound);
        }
        NodeType::Negation(child) => set_bound_flag(child, var_name, bound),
        NodeType::LogicalBinary(_, left, right) => {
            set_bound_flag(left, var_name, bound);
            set_bound_flag(right, var_name, bound);
        }
        NodeType::Application(children) | NodeType::Tuple(children) => {
            for child in children {
                set_bound_flag(child, var_name, bound);
            }
        }
        _ => {}
    }
}

/// Rename all variables according to a list of `(old, new)` pairs.
pub fn rename_vars(root: &mut FolTreeNode, renaming_pairs: &[(String, String)]) {
    if let NodeType::Variable(data) = &mut root.node_type {
        for (from, to) in renaming_pairs {
            if data.name == *from {
                data.name = to.clone();
                break;
            }
        }
    }

    match &mut root.node_type {
        NodeType::Quantifier(_, var, body) => {
            rename_vars(var, renaming_pairs);
            rename_vars(body, renaming_pairs);
        }
        NodeType::Negation(child) => rename_vars(child, renaming_pairs),
        NodeType::LogicalBinary(_, left, right) => {
            rename_vars(left, renaming_pairs);
            rename_vars(right, renaming_pairs);
        }
        NodeType::Application(children) | NodeType::Tuple(children) => {
            for child in children {
                rename_vars(child, renaming_pairs);
            }
        }
        _ => {}
    }
}

/// Strip a numeric `_N` subscript from a variable name, if present.
pub fn remove_subscript(var_name: &str) -> String {
    if let Some(pos) = var_name.rfind('_') {
        let suffix = &var_name[pos + 1..];
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return var_name[..pos].to_string();
        }
    }
    var_name.to_string()
}

/// Append a numeric subscript to a base name.
pub fn append_subscript(base: &str, index: usize) -> String {
    format!("{base}_{index}")
}

/// The numeric subscript of a variable name, or `None` if it has no subscript.
pub fn get_subscript(var_name: &str) -> Option<usize> {
    if let Some(pos) = var_name.rfind('_') {
        let suffix = &var_name[pos + 1..];
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            return suffix.parse().ok();
        }
    }
    None
}

/// Flatten a left-associated conjunction into the list of its conjuncts (deep copies,
/// in left-to-right order). A non-conjunction yields a singleton list.
pub fn conjunction_to_list(conjunction: &FolTreeNode) -> Vec<FolTreeNode> {
    let mut conjuncts = Vec::new();

    let mut current = conjunction;
    while let NodeType::LogicalBinary(LogicalBinaryOp::And, left, right) = &current.node_type {
        conjuncts.push(right.as_ref().clone());
        current = left.as_ref();
    }
    conjuncts.push(current.clone());

    conjuncts.reverse();
    conjuncts
}

/// The expression depth of a formula tree.
pub fn formula_depth(formula: &FolTreeNode) -> usize {
    let mut max_depth = 0;
    for child in formula.children() {
        let depth = formula_depth(child);
        if depth > max_depth {
            max_depth = depth;
        }
    }
    max_depth + 1
}

/// The maximum depth of any term occurring in a formula.
pub fn max_term_depth(formula: &FolTreeNode) -> usize {
    if formula.is_term() {
        return formula_depth(formula);
    }

    let mut max_depth = 0;
    for child in formula.children() {
        let depth = max_term_depth(child);
        if depth > max_depth {
            max_depth = depth;
        }
    }
    max_depth
}

/// Orientation flags of a rewrite rule with the given left and right sides.
///
/// `ltor` holds when every free variable of the right side occurs on the left, so a
/// left-to-right rewrite introduces no fresh variables; `ltor_safe` additionally
/// requires that the term depth does not grow. `rtol`/`rtol_safe` are the mirrored
/// flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RewriteOrientation {
    pub ltor: bool,
    pub rtol: bool,
    pub ltor_safe: bool,
    pub rtol_safe: bool,
}

/// Compute the rewrite-direction heuristic for a rule with sides `left` and `right`.
pub fn left_to_right(left: &FolTreeNode, right: &FolTreeNode) -> RewriteOrientation {
    let mut left_vars = BTreeSet::new();
    vars_used(&mut left_vars, left, false, false);
    let mut right_vars = BTreeSet::new();
    vars_used(&mut right_vars, right, false, false);

    let left_term_depth = max_term_depth(left);
    let right_term_depth = max_term_depth(right);

    RewriteOrientation {
        ltor: right_vars.iter().all(|var| left_vars.contains(var)),
        rtol: left_vars.iter().all(|var| right_vars.contains(var)),
        ltor_safe: right_term_depth <= left_term_depth,
        rtol_safe: left_term_depth <= right_term_depth,
    }
}

#[cfg(test)]
mod tests {
    use crate::manipulation::variables::*;
    use crate::preprocessing::parser::parse_fol_formula;
    use std::collections::BTreeSet;

    #[test]
    /// Test collection of variables with the bound/parameter filters.
    fn vars_used_filters() {
        let tree = parse_fol_formula("\\forall x (P(x, y) \\implies Q(z))").unwrap();

        let mut all_vars = BTreeSet::new();
        vars_used(&mut all_vars, &tree, true, true);
        assert_eq!(
            all_vars,
            BTreeSet::from(["x".to_string(), "y".to_string(), "z".to_string()])
        );

        let mut free_vars = BTreeSet::new();
        vars_used(&mut free_vars, &tree, true, false);
        assert_eq!(
            free_vars,
            BTreeSet::from(["y".to_string(), "z".to_string()])
        );
    }

    #[test]
    /// Test the free-variable intersection of two formulae.
    fn common_variables() {
        let tree1 = parse_fol_formula("P(x, y)").unwrap();
        let tree2 = parse_fol_formula("Q(y, z)").unwrap();
        assert_eq!(
            find_common_variables(&tree1, &tree2),
            BTreeSet::from(["y".to_string()])
        );

        let tree3 = parse_fol_formula("Q(w)").unwrap();
        assert!(find_common_variables(&tree1, &tree3).is_empty());
    }

    #[test]
    /// Independently bound variables that merely share a name are not common.
    fn common_variables_ignore_bound_names() {
        let tree1 = parse_fol_formula("\\forall x A(x)").unwrap();
        let tree2 = parse_fol_formula("\\forall x B(x)").unwrap();
        assert!(find_common_variables(&tree1, &tree2).is_empty());

        // a free occurrence on one side against a bound one on the other
        let tree3 = parse_fol_formula("A(x)").unwrap();
        assert!(find_common_variables(&tree3, &tree2).is_empty());
        assert_eq!(
            find_common_variables(&tree3, &parse_fol_formula("B(x)").unwrap()),
            BTreeSet::from(["x".to_string()])
        );
    }

    #[test]
    /// Test renaming of variables in a tree.
    fn renaming() {
        let mut tree = parse_fol_formula("P(x, y)").unwrap();
        rename_vars(
            &mut tree,
            &[("x".to_string(), "x_0".to_string())],
        );
        assert_eq!(tree.to_repr(), "P(x_0, y)");
    }

    #[test]
    /// Test the subscript helper functions.
    fn subscripts() {
        assert_eq!(remove_subscript("x_1"), "x");
        assert_eq!(remove_subscript("x_a"), "x_a");
        assert_eq!(remove_subscript("x"), "x");
        assert_eq!(append_subscript("x", 3), "x_3");
        assert_eq!(get_subscript("x_12"), Some(12));
        assert_eq!(get_subscript("x"), None);
        assert_eq!(get_subscript("my_var"), None);
    }

    #[test]
    /// Test flattening of left-associated conjunctions.
    fn conjunction_flattening() {
        let tree = parse_fol_formula("P(x) \\wedge Q(y) \\wedge R(z)").unwrap();
        let conjuncts = conjunction_to_list(&tree);
        assert_eq!(conjuncts.len(), 3);
        assert_eq!(conjuncts[0].to_repr(), "P(x)");
        assert_eq!(conjuncts[1].to_repr(), "Q(y)");
        assert_eq!(conjuncts[2].to_repr(), "R(z)");

        let atom = parse_fol_formula("P(x)").unwrap();
        assert_eq!(conjunction_to_list(&atom).len(), 1);
    }

    #[test]
    /// Test the depth measures and the rewrite-direction heuristic.
    fn depth_and_orientation() {
        let tree = parse_fol_formula("f(g(x)) = x").unwrap();
        assert_eq!(max_term_depth(&tree), 3);

        if let crate::preprocessing::fol_tree::NodeType::Application(children) = &tree.node_type
        {
            let orientation = left_to_right(&children[1], &children[2]);
            assert!(orientation.ltor);
            assert!(orientation.ltor_safe);
            assert!(orientation.rtol);
            assert!(!orientation.rtol_safe);
        } else {
            panic!("expected equality");
        }
    }
}
