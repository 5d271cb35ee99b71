//! Bridge between native Rust types and runtime type descriptors.
//!
//! ## Menu
//!
//! - [`TypeKind`]: the closed set of storage kinds, each with a stable id and name.
//! - [`TypeInfo`]: the runtime descriptor of a declared type, including the
//!   value tables of enums and flag sets.
//! - [`VarType`]: implemented by every type an attribute or parameter can have.
//! - [`EnumType`] / [`Flags`]: enum introspection, usually via `#[derive(VarEnum)]`.

// -----------------------------------------------------------------------------
// Modules

mod enums;
mod info;
mod kind;
mod var_type;

// -----------------------------------------------------------------------------
// Exports

pub use enums::{EnumType, Flags};
pub use info::{EnumValue, TypeInfo};
pub use kind::TypeKind;
pub use var_type::{IntoVar, VarType};
