//! Hash containers built on *hashbrown*, hashed with a fixed *foldhash* seed.
//!
//! ## Menu
//!
//! - [`FixedHashState`]: deterministic hasher builder, the default state.
//! - [`NoOpHashState`]: passes a single `u64` through, for pre-hashed keys.
//! - [`HashMap`]: hashbrown map using [`FixedHashState`].

// -----------------------------------------------------------------------------
// Modules

mod hasher;

pub mod hash_map;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

pub use hash_map::HashMap;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
