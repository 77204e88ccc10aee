//! The hydra: a rooted tree describing the residual proof obligation. Each node holds
//! a conjunction of live targets and a DNF of assumption sets already known to
//! discharge them. Nodes live in an arena and are addressed by stable integer ids.

/// Stable identifier of a hydra node inside its forest (also its debugging id).
pub type HydraId = usize;

/// A single node of the hydra tree.
#[derive(Clone, Debug)]
pub struct HydraNode {
    /// The conjunction of tableau target indices this node stands for.
    pub target_indices: Vec<usize>,
    /// DNF of assumption sets under which the targets are already discharged.
    /// A single empty set means "unconditionally proved".
    pub proved: Vec<Vec<i32>>,
    pub children: Vec<HydraId>,
}

/// Arena of hydra nodes plus the current root-to-leaf working path.
#[derive(Clone, Debug, Default)]
pub struct HydraForest {
    nodes: Vec<HydraNode>,
    pub root: Option<HydraId>,
    /// Path from the root to the current leaf; the last element is the node all
    /// hydra operations act on.
    pub current_path: Vec<HydraId>,
}

impl HydraForest {
    pub fn new() -> HydraForest {
        HydraForest::default()
    }

    /// Allocate a new node and return its id.
    pub fn add_node(&mut self, target_indices: Vec<usize>, proved: Vec<Vec<i32>>) -> HydraId {
        self.nodes.push(HydraNode {
            target_indices,
            proved,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn node(&self, id: HydraId) -> &HydraNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: HydraId) -> &mut HydraNode {
        &mut self.nodes[id]
    }

    /// Attach `child` under `parent`.
    pub fn add_child(&mut self, parent: HydraId, child: HydraId) {
        self.nodes[parent].children.push(child);
    }

    /// Detach `child` from `parent` (the node itself stays in the arena).
    pub fn remove_child(&mut self, parent: HydraId, child: HydraId) {
        self.nodes[parent].children.retain(|c| *c != child);
    }

    /// The current leaf all hydra operations act on.
    pub fn current_leaf(&self) -> Option<HydraId> {
        self.current_path.last().copied()
    }

    /// Whether the node's `proved` collapsed to the unconditional form `[[]]`.
    pub fn is_unconditionally_proved(&self, id: HydraId) -> bool {
        let proved = &self.nodes[id].proved;
        proved.len() == 1 && proved[0].is_empty()
    }

    /// Absorb a new assumption set into the node's `proved` DNF.
    ///
    /// Returns `1` when `proved` collapses to unconditional, `-1` when the set was
    /// redundant (a more general set is already present), and `0` when it was added.
    ///
    /// Conflict resolution: an existing set differing from the new one by exactly one
    /// element `n` vs `-n` completes a case split; the signed element is removed from
    /// the existing set and absorption restarts with the merged set.
    pub fn add_assumption(&mut self, id: HydraId, assumption: &[i32]) -> i32 {
        if assumption.is_empty() {
            // proved without assumptions
            self.nodes[id].proved.clear();
            self.nodes[id].proved.push(Vec::new());
            return 1;
        }

        let mut sorted_new = assumption.to_vec();
        sorted_new.sort_unstable();
        sorted_new.dedup();

        for index in 0..self.nodes[id].proved.len() {
            let existing = &self.nodes[id].proved[index];
            // an existing subset makes the new set redundant
            if is_subset(existing, &sorted_new) {
                return -1;
            }
            if let Some(conflicting) = find_conflict(existing, &sorted_new) {
                // the case split on `conflicting` is complete: merge and restart
                let mut merged = existing.clone();
                merged.retain(|n| *n != -conflicting);
                self.nodes[id].proved.remove(index);
                return self.add_assumption(id, &merged);
            }
        }

        // drop existing sets the new one generalizes, then add it
        self.nodes[id]
            .proved
            .retain(|existing| !is_subset(&sorted_new, existing));
        self.nodes[id].proved.push(sorted_new);
        0
    }
}

/// Whether `smaller` is a subset of `larger` (both sorted).
fn is_subset(smaller: &[i32], larger: &[i32]) -> bool {
    smaller.iter().all(|n| larger.binary_search(n).is_ok())
}

/// Check for a conflict between two assumption sets: same size, identical except for
/// exactly one element present as `n` in `incoming` and `-n` in `existing`. Returns
/// that `n`.
fn find_conflict(existing: &[i32], incoming: &[i32]) -> Option<i32> {
    if existing.len() != incoming.len() {
        return None;
    }

    let existing_not_in_incoming: Vec<i32> = existing
        .iter()
        .filter(|n| !incoming.contains(n))
        .copied()
        .collect();
    let incoming_not_in_existing: Vec<i32> = incoming
        .iter()
        .filter(|n| !existing.contains(n))
        .copied()
        .collect();

    if existing_not_in_incoming.len() == 1 && incoming_not_in_existing.len() == 1 {
        let missing_in_incoming = existing_not_in_incoming[0];
        let missing_in_existing = incoming_not_in_existing[0];
        if missing_in_incoming == -missing_in_existing {
            return Some(missing_in_existing);
        }
    }
    None
}
