//! Signals and slots.
//!
//! ## Menu
//!
//! - [`Event`]: the per-instance storage of a signal with typed arguments.
//! - [`DynEventHandler`]: a type-erased callback, either a closure or a slot
//!   bound to an object.
//! - [`DynEvent`]: a signal of one object, looked up by name.
//! - [`EventStorage`]: the type-erased view of an [`Event`].

// -----------------------------------------------------------------------------
// Modules

mod dyn_event;
mod handler;
mod storage;

// -----------------------------------------------------------------------------
// Exports

pub use dyn_event::DynEvent;
pub use handler::{DynEventHandler, HandlerId};
pub use storage::{Event, EventStorage};
