//! Components regarding the syntactic manipulation of formula trees: negation normal
//! form, structural equality, variable handling, and special-implication guards.

pub mod equality;
pub mod negation;
pub mod special;
pub mod variables;
