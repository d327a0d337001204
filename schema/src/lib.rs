// Shared schema definitions for the pokebot battle core.
// This crate contains the immutable data types that describe species and
// moves, plus the growth-curve math both the engine and the persistence
// layer rely on. Nothing in here performs I/O or holds runtime state.

pub use move_data::*;
pub use pokemon_types::*;
pub use species::*;

pub mod move_data;
pub mod pokemon_types;
pub mod species;
