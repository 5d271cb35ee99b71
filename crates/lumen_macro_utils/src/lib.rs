//! Helpers shared by the lumen proc-macro crates.
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro crate")]
#![allow(clippy::std_instead_of_core, reason = "proc-macro crate")]

extern crate proc_macro;

// -----------------------------------------------------------------------------
// Modules

mod case;
mod manifest;

// -----------------------------------------------------------------------------
// Exports

pub use case::to_pascal_case;
pub use manifest::Manifest;
