//! Components regarding substitutions and first-order unification.

pub mod substitution;
pub mod unify;
