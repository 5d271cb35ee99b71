use alloc::sync::Arc;
use core::fmt;

use crate::member::VarDesc;
use crate::object::Object;
use crate::types::TypeInfo;
use crate::var::{DynVar, DynVarMut, Var};

// -----------------------------------------------------------------------------
// Attribute

/// Read handle on one attribute of one object.
///
/// Obtained through [`ObjectExt::attribute`](crate::object::ObjectExt::attribute).
pub struct Attribute<'a> {
    object: &'a dyn Object,
    desc: Arc<VarDesc>,
}

impl<'a> Attribute<'a> {
    #[inline]
    pub fn new(object: &'a dyn Object, desc: Arc<VarDesc>) -> Self {
        Self { object, desc }
    }

    #[inline]
    pub fn desc(&self) -> &VarDesc {
        &self.desc
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    #[inline]
    pub fn object(&self) -> &'a dyn Object {
        self.object
    }
}

impl DynVar for Attribute<'_> {
    #[inline]
    fn type_info(&self) -> &'static TypeInfo {
        self.desc.type_info()
    }

    #[inline]
    fn get_var(&self) -> Var {
        self.desc.get(self.object)
    }

    #[inline]
    fn default_var(&self) -> Var {
        self.desc.default_var().clone()
    }
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("value", &self.get_string())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AttributeMut

/// Read-write handle on one attribute of one object.
///
/// Obtained through [`ObjectExt::attribute_mut`](crate::object::ObjectExt::attribute_mut).
pub struct AttributeMut<'a> {
    object: &'a mut dyn Object,
    desc: Arc<VarDesc>,
}

impl<'a> AttributeMut<'a> {
    #[inline]
    pub fn new(object: &'a mut dyn Object, desc: Arc<VarDesc>) -> Self {
        Self { object, desc }
    }

    #[inline]
    pub fn desc(&self) -> &VarDesc {
        &self.desc
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.desc.name()
    }
}

impl DynVar for AttributeMut<'_> {
    #[inline]
    fn type_info(&self) -> &'static TypeInfo {
        self.desc.type_info()
    }

    #[inline]
    fn get_var(&self) -> Var {
        self.desc.get(&*self.object)
    }

    #[inline]
    fn default_var(&self) -> Var {
        self.desc.default_var().clone()
    }
}

impl DynVarMut for AttributeMut<'_> {
    fn set_var(&mut self, value: &Var) {
        if !self.desc.set(&mut *self.object, value) {
            log::warn!(
                "attribute `{}` is not stored in a `{}`",
                self.desc.name(),
                self.object.class().name()
            );
        }
    }
}

impl fmt::Debug for AttributeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeMut")
            .field("name", &self.name())
            .field("value", &self.get_string())
            .finish()
    }
}
