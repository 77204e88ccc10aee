use crate::_test_proving::_test_util::run_problem;
use crate::analysis::analyse_problem;
use crate::automation::{AutomationLimits, ProverOutcome};
use crate::load_inputs::parse_problem_lines;
use crate::result_print::PrintOptions;

use std::fs::File;
use std::io::Write;

#[test]
/// A single modus ponens step plus closure proves the goal.
fn simple_modus_ponens() {
    let outcome = run_problem("P(a)\nP(x) \\implies Q(x)\n* Q(a)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// A universally quantified hypothesis instantiates against a ground goal.
fn universal_instantiation() {
    let outcome = run_problem("\\forall x P(x)\n* P(a)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// An existential goal is proved by finding a witness among the hypotheses.
fn existential_goal() {
    let outcome = run_problem("P(a)\n* \\exists x P(x)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// A chain of implications is followed backward through several targets.
fn implication_chain() {
    let outcome = run_problem(
        "P(a)\nP(x) \\implies Q(x)\nQ(x) \\implies R(x)\n* R(a)\n",
    );
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// An equivalence goal branches the hydra and both directions are discharged.
fn material_equivalence_goal() {
    let outcome = run_problem("P \\implies Q\nQ \\implies P\n* P \\iff Q\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// An implication goal is reduced via conditional premise.
fn conditional_premise_goal() {
    let outcome = run_problem("P(x) \\implies Q(x)\n* P(a) \\implies Q(a)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// An idempotent disjunctive goal collapses and then closes.
fn idempotence_goal() {
    let outcome = run_problem("P(a)\n* P(a) \\vee P(a)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// A conjunction goal with shared variables is proved as one partition.
fn conjunction_goal() {
    let outcome = run_problem("P(a)\nQ(a)\n* P(a) \\wedge Q(a)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// Independent goals are partitioned and proved branch by branch.
fn independent_goals_partitioned() {
    let outcome = run_problem("P(a)\nQ(b)\n* P(a)\n* Q(b)\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// Goals the hypotheses cannot reach report stuck with a non-success status.
fn unprovable_reports_stuck() {
    let outcome = run_problem("P(a)\n* Q(a)\n");
    assert_eq!(outcome, ProverOutcome::Stuck);
}

#[test]
/// Equality hypotheses rewrite the goal until it closes.
fn equality_rewrite_goal() {
    let outcome = run_problem("f(x) = g(x)\nP(g(a))\n* P(f(a))\n");
    assert_eq!(outcome, ProverOutcome::Proved);
}

#[test]
/// Theorems loaded from a library file take part in the proof.
fn library_theorem_used() {
    let base = std::env::temp_dir().join("fol_prover_e2e_library");
    let base = base.to_str().unwrap().to_string();
    let mut file = File::create(format!("{base}.dat")).unwrap();
    file.write_all(b"theorem\n\\forall x (P(x) \\implies Q(x))\n\n")
        .unwrap();

    let problem = parse_problem_lines("P(a)\n* Q(a)\n");
    let outcome = analyse_problem(
        problem,
        &[base],
        PrintOptions::NoPrint,
        &AutomationLimits::default(),
        true,
    )
    .unwrap();
    assert_eq!(outcome, ProverOutcome::Proved);
}
