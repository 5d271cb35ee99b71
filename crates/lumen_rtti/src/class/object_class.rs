use crate::class::{Class, ClassManager};
use crate::object::Object;

/// A Rust type with a statically known class, implemented by
/// `#[derive(Object)]`.
///
/// [`ClassManager::register`] builds and registers the class once per
/// process; [`Object::class`] implementations use
/// [`ClassManager::class_of`], which does so on first use.
pub trait ObjectClass: Object + Sized {
    /// The qualified class name.
    const CLASS_NAME: &'static str;

    /// The name of the module the class is registered in, normally the
    /// defining crate.
    const MODULE_NAME: &'static str;

    fn create_class() -> Class;

    /// Registers classes this class builds on, such as an embedded base.
    #[inline]
    fn register_dependencies(manager: &ClassManager) {
        let _ = manager;
    }
}
