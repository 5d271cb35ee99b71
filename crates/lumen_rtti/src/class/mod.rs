//! Classes and the registry that holds them.
//!
//! ## Menu
//!
//! - [`ClassManager`]: the process-wide registry of modules and classes,
//!   including `.plugin` descriptor loading.
//! - [`Class`]: the metadata of one class, with inherited members resolved
//!   lazily by base class name.
//! - [`ClassBuilder`]: assembles a [`Class`] from member descriptors.
//! - [`ObjectClass`]: connects a Rust type to its class.
//! - [`Module`]: a named group of classes.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod info;
mod manager;
mod module;
mod object_class;
mod plugin;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ClassBuilder;
pub use info::Class;
pub use manager::{AbstractFilter, BaseFilter, ClassEvent, ClassManager, ListenerId, Recursion};
pub use manager::CORE_MODULE_ID;
pub use module::Module;
pub use object_class::ObjectClass;
pub use plugin::{PLUGIN_EXTENSION, PluginError};
