use crate::_test_proving::_test_util::prepare_context;
use crate::completion::check_done;
use crate::moves::cleanup::cleanup_moves;
use crate::moves::reasoning::{move_mpt, move_sd};
use crate::tableau::tabline::Reason;

#[test]
/// Backward inference through a two-conjunct antecedent: the contrapositive of
/// `P(x) ∧ Q(y) → R(x, y)` fires against the negated goal, and the resulting
/// target splits into two subgoals.
fn two_conjunct_backward_inference() {
    let mut ctx = prepare_context(&["P(x) \\wedge Q(y) \\implies R(x, y)"], &["R(a, b)"]);

    // the backward step runs through the contrapositive machinery
    assert!(move_mpt(&mut ctx, 0, &[1], &[], true, true));
    let new_target = &ctx.tableau[2];
    assert!(new_target.target);
    assert_eq!(
        new_target.negation.as_ref().unwrap().to_repr(),
        "P(a) \\wedge Q(b)"
    );

    // cleanup splits the disjunctive refutation form into two subgoals
    let upto = ctx.upto;
    cleanup_moves(&mut ctx, upto);
    assert_eq!(ctx.tableau.len(), 5);
    assert_eq!(ctx.tableau[3].negation.as_ref().unwrap().to_repr(), "P(a)");
    assert_eq!(ctx.tableau[4].negation.as_ref().unwrap().to_repr(), "Q(b)");

    let leaf = ctx.hydra.current_leaf().unwrap();
    assert_eq!(ctx.hydra.node(leaf).target_indices, vec![3]);
}

#[test]
/// A case split over `A ∨ B` discharges the goal under both signs and the two
/// conditional proofs merge into an unconditional one.
fn case_split_merges_to_unconditional() {
    let mut ctx = prepare_context(
        &["\\neg A \\implies B", "A \\implies C", "B \\implies C"],
        &["C"],
    );

    // split the disjunction: A under {+1}, ¬A and B under {-1}
    assert!(move_sd(&mut ctx, 0));
    assert_eq!(ctx.tableau[4].formula.to_repr(), "A");
    assert_eq!(ctx.tableau[4].assumptions, vec![1]);
    assert_eq!(ctx.tableau[5].formula.to_repr(), "\\neg A");
    assert_eq!(ctx.tableau[5].assumptions, vec![-1]);
    assert_eq!(ctx.tableau[6].formula.to_repr(), "B");
    assert_eq!(ctx.tableau[6].assumptions, vec![-1]);

    // forward modus ponens in each case derives C under the matching sign
    assert!(move_mpt(&mut ctx, 1, &[4], &[], true, true));
    assert_eq!(ctx.tableau[7].formula.to_repr(), "C");
    assert_eq!(ctx.tableau[7].assumptions, vec![1]);
    assert_eq!(ctx.tableau[7].justification.0, Reason::ModusPonens);

    assert!(move_mpt(&mut ctx, 2, &[6], &[], true, true));
    assert_eq!(ctx.tableau[8].formula.to_repr(), "C");
    assert_eq!(ctx.tableau[8].assumptions, vec![-1]);

    // the two signed discharges of the goal merge and close the proof
    assert!(check_done(&mut ctx));
}

#[test]
/// The signed cases of a split stay incompatible: no inference may combine them.
fn opposite_signs_never_combine() {
    let mut ctx = prepare_context(&["\\neg A \\implies B", "A \\implies C"], &["C"]);

    assert!(move_sd(&mut ctx, 0));
    // give the implication the sign of the wrong case
    ctx.tableau[1].assumptions = vec![-1];

    // line 3 is `A` under {+1}; the implication now carries {-1}
    assert!(!move_mpt(&mut ctx, 1, &[3], &[], true, true));
}
