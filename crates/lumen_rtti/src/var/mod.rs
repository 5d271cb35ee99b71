//! Type-erased values.
//!
//! ## Menu
//!
//! - [`Var`]: a tagged value over the primitive set, with total conversions.
//! - [`DynVar`] / [`DynVarMut`]: uniform typed access to a value whose static
//!   type the caller does not know.
//! - [`Attribute`] / [`AttributeMut`]: [`DynVar`] handles bound to one
//!   attribute of one live object.

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod dyn_var;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use attribute::{Attribute, AttributeMut};
pub use dyn_var::{DynVar, DynVarMut};
pub use value::Var;
