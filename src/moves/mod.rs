//! The proof moves: Skolemization, the cleanup catalogue, and the reasoning moves.

pub mod cleanup;
pub mod reasoning;
pub mod skolemize;
