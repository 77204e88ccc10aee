//! The proof context: the append-only tableau, the variable registry, the hydra
//! forest, and the bookkeeping shared by all moves.

use crate::manipulation::equality::equal;
use crate::manipulation::special::unwrap_special;
use crate::manipulation::variables::{
    left_to_right, remove_subscript, append_subscript, vars_used,
};
use crate::preprocessing::fol_tree::{FolTreeNode, NodeType};
use crate::preprocessing::operator_enums::VariableKind;
use crate::tableau::hydra::{HydraForest, HydraId};
use crate::tableau::tabline::TableauLine;

use std::collections::{BTreeSet, HashMap, HashSet};

/// The shared state of one prover instance.
///
/// The tableau is append-only: indices are stable once assigned, and moves only flip
/// the metadata flags of already-appended lines.
#[derive(Clone, Debug, Default)]
pub struct ProofContext {
    /// Array of tableau lines.
    pub tableau: Vec<TableauLine>,
    /// The hydra forest and the current root-to-leaf path.
    pub hydra: HydraForest,
    /// Water-mark index: lines below it were already processed by cleanup and the
    /// closure detector.
    pub upto: usize,
    /// Whether free variables have already been made into parameters.
    pub parameterized: bool,
    /// Suppress per-rejected-move diagnostics on stderr.
    pub silent: bool,
    /// Move counters, by family.
    pub cleanup_count: usize,
    pub reasoning_count: usize,
    pub rewrite_count: usize,
    pub split_count: usize,
    /// Maps variable base names to their latest allocated index.
    var_indices: HashMap<String, usize>,
}

impl ProofContext {
    pub fn new() -> ProofContext {
        ProofContext::default()
    }

    /// Retrieve and increment the next available index for a variable base name.
    /// The first allocation of a base yields index `0`.
    pub fn get_next_index(&mut self, var_name: &str) -> usize {
        match self.var_indices.get_mut(var_name) {
            Some(index) => {
                *index += 1;
                *index
            }
            None => {
                self.var_indices.insert(var_name.to_string(), 0);
                0
            }
        }
    }

    /// The current index of a variable base name, without incrementing.
    pub fn get_current_index(&self, var_name: &str) -> Option<usize> {
        self.var_indices.get(var_name).copied()
    }

    /// Reset the index of a variable base name to zero (initializing it if absent).
    pub fn reset_index(&mut self, var_name: &str) {
        self.var_indices.insert(var_name.to_string(), 0);
    }

    /// Whether the base name has been allocated before.
    pub fn has_variable(&self, var_name: &str) -> bool {
        self.var_indices.contains_key(var_name)
    }

    /// Mark hypotheses dead once all the targets they are restricted to are dead.
    pub fn purge_dead(&mut self) {
        for index in 0..self.tableau.len() {
            if self.tableau[index].target || self.tableau[index].restrictions.is_empty() {
                continue;
            }
            let all_targets_dead = self.tableau[index]
                .restrictions
                .iter()
                .all(|target_index| self.tableau[*target_index].dead);
            if all_targets_dead {
                self.tableau[index].dead = true;
                self.tableau[index].active = false;
            }
        }
    }

    /// Activate exactly the target lines in `targets`; a hypothesis is activated iff
    /// it is alive and its restrictions are empty or intersect the set.
    pub fn select_targets_from(&mut self, targets: &[usize]) {
        let target_set: HashSet<usize> = targets.iter().copied().collect();

        for (index, line) in self.tableau.iter_mut().enumerate() {
            if line.target {
                line.active = target_set.contains(&index);
            } else {
                let restrictions_match = line.restrictions.is_empty()
                    || line.restrictions.iter().any(|r| target_set.contains(r));
                line.active = !line.dead && restrictions_match;
            }
        }
    }

    /// Activate the targets of the current leaf hydra.
    pub fn select_targets(&mut self) {
        if let Some(leaf) = self.hydra.current_leaf() {
            let targets = self.hydra.node(leaf).target_indices.clone();
            self.select_targets_from(&targets);
        }
    }

    /// Initialize the hydra forest from the target lines of the tableau: an empty
    /// root with one child per target.
    pub fn initialize_hydras(&mut self) {
        if self.hydra.root.is_some() {
            return;
        }

        let root = self.hydra.add_node(Vec::new(), Vec::new());
        self.hydra.root = Some(root);

        for (index, line) in self.tableau.iter().enumerate() {
            if line.target {
                let child = self.hydra.add_node(vec![index], Vec::new());
                self.hydra.add_child(root, child);
            }
        }

        self.hydra.current_path = vec![root];
        if let Some(first) = self.hydra.node(root).children.first().copied() {
            self.hydra.current_path.push(first);
        }
    }

    /// Recompute the current path as root-to-first-leaf DFS and return the leaf's
    /// target list.
    pub fn get_hydra(&mut self) -> Vec<usize> {
        let Some(root) = self.hydra.root else {
            return Vec::new();
        };

        self.hydra.current_path.clear();
        self.hydra.current_path.push(root);

        let mut current = root;
        while let Some(child) = self.hydra.node(current).children.first().copied() {
            self.hydra.current_path.push(child);
            current = child;
        }

        self.hydra.node(current).target_indices.clone()
    }

    /// Partition a target list by shared free variables: a variable-to-targets
    /// multimap feeds a union-find, and each resulting component becomes one group.
    pub fn partition_targets(&self, targets: &[usize]) -> Vec<Vec<usize>> {
        let mut var_to_targets: HashMap<String, Vec<usize>> = HashMap::new();
        for target_index in targets {
            let mut variables = BTreeSet::new();
            vars_used(&mut variables, &self.tableau[*target_index].formula, false, true);
            for var in variables {
                var_to_targets.entry(var).or_default().push(*target_index);
            }
        }

        let mut parent: HashMap<usize, usize> =
            targets.iter().map(|t| (*t, *t)).collect();

        fn find_set(parent: &mut HashMap<usize, usize>, x: usize) -> usize {
            let p = parent[&x];
            if p != x {
                let root = find_set(parent, p);
                parent.insert(x, root);
                root
            } else {
                x
            }
        }

        for shared in var_to_targets.values() {
            for other in &shared[1..] {
                let root_a = find_set(&mut parent, shared[0]);
                let root_b = find_set(&mut parent, *other);
                if root_a != root_b {
                    parent.insert(root_a, root_b);
                }
            }
        }

        // group by root, preserving the original target order
        let mut partitions: Vec<(usize, Vec<usize>)> = Vec::new();
        for target_index in targets {
            let root = find_set(&mut parent, *target_index);
            match partitions.iter_mut().find(|(r, _)| *r == root) {
                Some((_, group)) => group.push(*target_index),
                None => partitions.push((root, vec![*target_index])),
            }
        }

        partitions.into_iter().map(|(_, group)| group).collect()
    }

    /// Partition the targets of a hydra node and attach one child per component.
    /// Returns the new children (partitioning preserves the `proved` DNF unchanged).
    fn attach_partitioned(&mut self, parent: HydraId, targets: Vec<usize>) -> Vec<HydraId> {
        let proved = self.hydra.node(parent).proved.clone();
        let partitions = self.partition_targets(&targets);

        let mut new_children = Vec::new();
        for group in partitions {
            if group.is_empty() {
                continue;
            }
            let child = self.hydra.add_node(group, proved.clone());
            self.hydra.add_child(parent, child);
            new_children.push(child);
        }
        new_children
    }

    /// Replace target `i` with `j` in the current leaf hydra, partitioning the result
    /// when multiple targets remain. Descends into the first new child.
    pub fn hydra_replace(&mut self, i: usize, j: usize) {
        let Some(leaf) = self.hydra.current_leaf() else {
            eprintln!("Error: no hydra available to replace targets.");
            return;
        };

        let mut new_targets = self.hydra.node(leaf).target_indices.clone();
        let Some(position) = new_targets.iter().position(|t| *t == i) else {
            eprintln!("Error: target {i} not found in the current leaf hydra.");
            return;
        };
        new_targets[position] = j;

        if new_targets.len() == 1 {
            let proved = self.hydra.node(leaf).proved.clone();
            let child = self.hydra.add_node(new_targets, proved);
            self.hydra.add_child(leaf, child);
            self.hydra.current_path.push(child);
        } else {
            let new_children = self.attach_partitioned(leaf, new_targets);
            if let Some(first) = new_children.first() {
                self.hydra.current_path.push(*first);
            }
        }
    }

    /// Split target `i` into `j1` and `j2`: two sibling children, one with `i → j1`,
    /// one with `i → j2`. Descends into the first.
    pub fn hydra_split(&mut self, i: usize, j1: usize, j2: usize) {
        let Some(leaf) = self.hydra.current_leaf() else {
            eprintln!("Error: no hydra available to split targets.");
            return;
        };

        let targets = self.hydra.node(leaf).target_indices.clone();
        if !targets.contains(&i) {
            eprintln!("Error: target {i} not found in the current leaf hydra.");
            return;
        }

        let proved = self.hydra.node(leaf).proved.clone();
        let mut new_children = Vec::new();
        for j in [j1, j2] {
            let new_targets: Vec<usize> = targets
                .iter()
                .map(|t| if *t == i { j } else { *t })
                .collect();
            let duplicate = self
                .hydra
                .node(leaf)
                .children
                .iter()
                .any(|child| self.hydra.node(*child).target_indices == new_targets);
            if !duplicate {
                let child = self.hydra.add_node(new_targets, proved.clone());
                self.hydra.add_child(leaf, child);
                new_children.push(child);
            }
        }

        if let Some(first) = new_children.first() {
            self.hydra.current_path.push(*first);
        }
    }

    /// Remove all listed targets from the current leaf, insert `j` once, then
    /// partition. Descends into the first new child.
    pub fn hydra_replace_list(&mut self, targets: &[usize], j: usize) {
        let Some(leaf) = self.hydra.current_leaf() else {
            eprintln!("Error: no hydra available to replace targets.");
            return;
        };

        let leaf_targets = self.hydra.node(leaf).target_indices.clone();
        for t in targets {
            if !leaf_targets.contains(t) {
                eprintln!("Error: target {t} not found in the current leaf hydra.");
                return;
            }
        }

        let mut new_targets: Vec<usize> = leaf_targets
            .iter()
            .filter(|t| !targets.contains(t))
            .copied()
            .collect();
        if !new_targets.contains(&j) {
            new_targets.push(j);
        }

        let duplicate = self
            .hydra
            .node(leaf)
            .children
            .iter()
            .any(|child| self.hydra.node(*child).target_indices == new_targets);
        if duplicate {
            return;
        }

        let new_children = self.attach_partitioned(leaf, new_targets);
        if let Some(first) = new_children.first() {
            self.hydra.current_path.push(*first);
        }
    }

    /// Extend the restriction lists mentioning `i` with the replacement target `j`.
    pub fn restrictions_replace(&mut self, i: usize, j: usize) {
        for line in self.tableau.iter_mut() {
            if !line.dead && line.restrictions.contains(&i) {
                line.restrictions.push(j);
            }
        }
    }

    /// Extend the restriction lists mentioning `i` with both split targets.
    pub fn restrictions_split(&mut self, i: usize, j1: usize, j2: usize) {
        for line in self.tableau.iter_mut() {
            if !line.dead && line.restrictions.contains(&i) {
                line.restrictions.push(j1);
                line.restrictions.push(j2);
            }
        }
    }

    /// Extend the restriction lists mentioning any of `targets` with `j`.
    pub fn restrictions_replace_list(&mut self, targets: &[usize], j: usize) {
        for line in self.tableau.iter_mut() {
            if !line.dead && targets.iter().any(|t| line.restrictions.contains(t)) {
                line.restrictions.push(j);
            }
        }
    }

    /// Deactivate hypotheses from `start` onward that duplicate an earlier live line
    /// (α-equal formula, identical assumptions and restrictions). Targets are kept:
    /// hydra nodes refer to them by index.
    pub fn kill_duplicates(&mut self, start: usize) {
        for j in start..self.tableau.len() {
            if self.tableau[j].target || !self.tableau[j].active {
                continue;
            }
            for i in 0..j {
                if self.tableau[i].target || !self.tableau[i].active {
                    continue;
                }
                let same_metadata = sorted(&self.tableau[i].assumptions)
                    == sorted(&self.tableau[j].assumptions)
                    && sorted(&self.tableau[i].restrictions)
                        == sorted(&self.tableau[j].restrictions);
                if same_metadata && equal(&self.tableau[i].formula, &self.tableau[j].formula) {
                    self.tableau[j].active = false;
                    self.tableau[j].dead = true;
                    break;
                }
            }
        }
    }

    /// Refresh the constants cache of every line.
    pub fn update_constants(&mut self) {
        for line in self.tableau.iter_mut() {
            let mut constants = Vec::new();
            collect_constants(&mut constants, &line.formula);
            line.constants = constants;
        }
    }

    /// Recompute the rewrite-orientation flags of equality and implication
    /// hypotheses.
    pub fn update_orientations(&mut self) {
        for line in self.tableau.iter_mut() {
            if line.target {
                continue;
            }
            let matrix = unwrap_special(&line.formula);
            line.orientation = if matrix.is_equality() {
                match &matrix.node_type {
                    NodeType::Application(children) => {
                        Some(left_to_right(&children[1], &children[2]))
                    }
                    _ => None,
                }
            } else if matrix.is_implication() {
                match &matrix.node_type {
                    NodeType::LogicalBinary(_, left, right) => {
                        Some(left_to_right(left, right))
                    }
                    _ => None,
                }
            } else {
                None
            };
        }
    }

    /// Gather the data the waterfall needs: constants of active problem lines,
    /// constants of active targets, indices of active implication hypotheses, and
    /// indices of active non-implication hypotheses.
    pub fn gather_tableau_data(&self) -> (Vec<String>, Vec<String>, Vec<usize>, Vec<usize>) {
        let mut tableau_constants = Vec::new();
        let mut target_constants = Vec::new();
        let mut implications = Vec::new();
        let mut units = Vec::new();

        for (index, line) in self.tableau.iter().enumerate() {
            if !line.active {
                continue;
            }
            if !line.is_theorem() && !line.is_definition() {
                for constant in &line.constants {
                    if !tableau_constants.contains(constant) {
                        tableau_constants.push(constant.clone());
                    }
                }
            }
            if line.target {
                for constant in &line.constants {
                    if !target_constants.contains(constant) {
                        target_constants.push(constant.clone());
                    }
                }
            } else if unwrap_special(&line.formula).is_implication() {
                implications.push(index);
            } else {
                units.push(index);
            }
        }

        (tableau_constants, target_constants, implications, units)
    }
}

/// Generate renaming pairs for the given common variables, minting fresh subscripted
/// names from the context's registry.
pub fn vars_rename_list(
    ctx: &mut ProofContext,
    common_vars: &BTreeSet<String>,
) -> Vec<(String, String)> {
    let mut renaming_pairs = Vec::new();

    for var in common_vars {
        let base = remove_subscript(var);
        let new_var = if ctx.has_variable(base.as_str()) {
            let new_index = ctx.get_next_index(base.as_str());
            append_subscript(base.as_str(), new_index)
        } else {
            ctx.reset_index(base.as_str());
            append_subscript(base.as_str(), 0)
        };
        renaming_pairs.push((var.clone(), new_var));
    }

    renaming_pairs
}

/// Combine a pair of restriction lists: the intersection, or the non-empty list when
/// the other is empty (the empty list means "all targets").
pub fn combine_restrictions(res1: &[usize], res2: &[usize]) -> Vec<usize> {
    if res1.is_empty() {
        return res2.to_vec();
    }
    if res2.is_empty() {
        return res1.to_vec();
    }
    let set2: HashSet<usize> = res2.iter().copied().collect();
    let mut combined: Vec<usize> = res1.iter().filter(|r| set2.contains(r)).copied().collect();
    combined.sort_unstable();
    combined.dedup();
    combined
}

/// Restrictions are compatible iff either list is empty or they share an element.
pub fn restrictions_compatible(res1: &[usize], res2: &[usize]) -> bool {
    if res1.is_empty() || res2.is_empty() {
        return true;
    }
    let set1: HashSet<usize> = res1.iter().copied().collect();
    res2.iter().any(|r| set1.contains(r))
}

/// Combine a pair of assumption lists into their sorted set-union.
pub fn combine_assumptions(assm1: &[i32], assm2: &[i32]) -> Vec<i32> {
    if assm1.is_empty() {
        return assm2.to_vec();
    }
    if assm2.is_empty() {
        return assm1.to_vec();
    }
    let mut combined: Vec<i32> = assm1.iter().chain(assm2.iter()).copied().collect();
    combined.sort_unstable();
    combined.dedup();
    combined
}

/// Assumptions are compatible iff no `n` appears in one list with `-n` in the other.
pub fn assumptions_compatible(assm1: &[i32], assm2: &[i32]) -> bool {
    if assm1.is_empty() || assm2.is_empty() {
        return true;
    }
    let set2: HashSet<i32> = assm2.iter().copied().collect();
    assm1.iter().all(|n| !set2.contains(&-n))
}

fn sorted<T: Copy + Ord>(values: &[T]) -> Vec<T> {
    let mut sorted_values = values.to_vec();
    sorted_values.sort_unstable();
    sorted_values
}

/// Collect the constant symbols of a formula: set operators, predicates, logical and
/// set constants, plus the names of function and predicate variables.
fn collect_constants(constants: &mut Vec<String>, formula: &FolTreeNode) {
    let symbol = match &formula.node_type {
        NodeType::UnaryOp(op) => Some(op.precedence_info().unicode.to_string()),
        NodeType::BinaryOp(op) => Some(op.precedence_info().unicode.to_string()),
        NodeType::UnaryPred(symbol) => Some(symbol.precedence_info().unicode.to_string()),
        NodeType::BinaryPred(symbol) => Some(symbol.precedence_info().unicode.to_string()),
        NodeType::Constant(symbol) => Some(symbol.precedence_info().unicode.to_string()),
        NodeType::Variable(data)
            if data.kind == VariableKind::Function || data.kind == VariableKind::Predicate =>
        {
            Some(data.name.clone())
        }
        _ => None,
    };
    if let Some(symbol) = symbol {
        if !constants.contains(&symbol) {
            constants.push(symbol);
        }
    }

    for child in formula.children() {
        collect_constants(constants, child);
    }
}

#[cfg(test)]
mod tests {
    use crate::preprocessing::parser::parse_fol_formula;
    use crate::tableau::context::*;
    use crate::tableau::tabline::TableauLine;

    fn hypothesis_line(formula: &str) -> TableauLine {
        TableauLine::hypothesis(parse_fol_formula(formula).unwrap())
    }

    fn target_line(goal: &str) -> TableauLine {
        let tree = parse_fol_formula(goal).unwrap();
        let negated =
            crate::manipulation::negation::negate_node(tree.clone(), false).unwrap();
        TableauLine::target(negated, tree)
    }

    #[test]
    /// Fresh indices are monotone per base name, starting at zero.
    fn variable_registry() {
        let mut ctx = ProofContext::new();
        assert_eq!(ctx.get_next_index("x"), 0);
        assert_eq!(ctx.get_next_index("x"), 1);
        assert_eq!(ctx.get_next_index("y"), 0);
        assert_eq!(ctx.get_current_index("x"), Some(1));
        ctx.reset_index("x");
        assert_eq!(ctx.get_next_index("x"), 1);
    }

    #[test]
    /// Test the assumption and restriction algebra.
    fn assumption_restriction_algebra() {
        assert!(assumptions_compatible(&[1, 2], &[2, 3]));
        assert!(!assumptions_compatible(&[1, 2], &[-2]));
        assert!(assumptions_compatible(&[], &[-2]));
        assert_eq!(combine_assumptions(&[2, 1], &[2, 3]), vec![1, 2, 3]);

        assert!(restrictions_compatible(&[], &[4]));
        assert!(restrictions_compatible(&[4, 5], &[5]));
        assert!(!restrictions_compatible(&[4], &[5]));
        assert_eq!(combine_restrictions(&[4, 5], &[5, 6]), vec![5]);
        assert_eq!(combine_restrictions(&[], &[5, 6]), vec![5, 6]);
    }

    #[test]
    /// Targets with disjoint free-variable sets end up in different partitions.
    fn partitioning() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(target_line("P(x)"));
        ctx.tableau.push(target_line("Q(x, y)"));
        ctx.tableau.push(target_line("R(z)"));

        let partitions = ctx.partition_targets(&[0, 1, 2]);
        assert_eq!(partitions.len(), 2);
        assert!(partitions.contains(&vec![0, 1]));
        assert!(partitions.contains(&vec![2]));
    }

    #[test]
    /// Dead targets drag restricted hypotheses down with them.
    fn purge_dead_hypotheses() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(target_line("P(a)"));
        let mut hyp = hypothesis_line("Q(a)");
        hyp.restrictions = vec![0];
        ctx.tableau.push(hyp);
        ctx.tableau.push(hypothesis_line("R(a)"));

        ctx.tableau[0].dead = true;
        ctx.purge_dead();

        assert!(ctx.tableau[1].dead);
        assert!(!ctx.tableau[1].active);
        assert!(!ctx.tableau[2].dead);
    }

    #[test]
    /// Selecting targets activates matching hypotheses and deactivates others.
    fn target_selection() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(target_line("P(a)"));
        ctx.tableau.push(target_line("Q(a)"));
        let mut restricted = hypothesis_line("R(a)");
        restricted.restrictions = vec![1];
        ctx.tableau.push(restricted);
        ctx.tableau.push(hypothesis_line("S(a)"));

        ctx.select_targets_from(&[0]);
        assert!(ctx.tableau[0].active);
        assert!(!ctx.tableau[1].active);
        assert!(!ctx.tableau[2].active);
        assert!(ctx.tableau[3].active);

        ctx.select_targets_from(&[1]);
        assert!(ctx.tableau[2].active);
    }

    #[test]
    /// Duplicate hypotheses are deactivated, targets never are.
    fn duplicates_killed() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(hypothesis_line("P(a)"));
        ctx.tableau.push(hypothesis_line("P(a)"));
        ctx.tableau.push(target_line("P(a)"));
        ctx.tableau.push(hypothesis_line("Q(a)"));

        ctx.kill_duplicates(1);
        assert!(ctx.tableau[0].active);
        assert!(ctx.tableau[1].dead);
        assert!(ctx.tableau[2].active);
        assert!(ctx.tableau[3].active);
    }

    #[test]
    /// The hydra replace/split operations keep the current path on the new leaves.
    fn hydra_operations() {
        let mut ctx = ProofContext::new();
        ctx.tableau.push(target_line("P(x)"));
        ctx.initialize_hydras();
        let targets = ctx.get_hydra();
        assert_eq!(targets, vec![0]);

        ctx.tableau.push(target_line("Q(x)"));
        ctx.hydra_replace(0, 1);
        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![1]);

        ctx.tableau.push(target_line("R(x)"));
        ctx.tableau.push(target_line("S(y)"));
        ctx.hydra_split(1, 2, 3);
        let leaf = ctx.hydra.current_leaf().unwrap();
        assert_eq!(ctx.hydra.node(leaf).target_indices, vec![2]);
    }
}
