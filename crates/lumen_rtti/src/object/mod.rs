//! Reflected objects.
//!
//! ## Menu
//!
//! - [`Object`]: implemented by every reflected type, normally via
//!   `#[derive(Object)]`.
//! - [`ObjectExt`]: the dynamic API available on every object: attributes by
//!   name, method calls, value strings and signals.
//! - [`ObjectRef`]: a shared, reference-counted handle that reports when the
//!   object is destroyed.

// -----------------------------------------------------------------------------
// Modules

mod dyn_object;
mod ext;
mod object_ref;
mod root;

// -----------------------------------------------------------------------------
// Exports

pub use dyn_object::Object;
pub use ext::{DefaultMode, ObjectExt};
pub use object_ref::{ObjectRef, SoftRelease};
pub use root::{OBJECT_CLASS, SIGNAL_DESTROYED};

pub(crate) use root::root_class;
