use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;

use crate::class::Class;
use crate::object::{DefaultMode, ObjectExt};
use crate::xml::XmlElement;

/// A type with a runtime class.
///
/// Implement it with `#[derive(Object)]`. A type that embeds its base class
/// as a field returns it from [`base`](Object::base), which lets descriptors
/// of the base class reach their members inside the derived type.
///
/// The string and XML forms default to the object's attribute values and may
/// be overridden.
pub trait Object: Any {
    fn class(&self) -> Arc<Class>;

    fn as_object(&self) -> &dyn Object;

    fn as_object_mut(&mut self) -> &mut dyn Object;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The embedded base class instance, if any.
    #[inline]
    fn base(&self) -> Option<&dyn Object> {
        None
    }

    #[inline]
    fn base_mut(&mut self) -> Option<&mut dyn Object> {
        None
    }

    /// Every attribute value as a token string.
    fn to_string_value(&self) -> String {
        self.as_object().get_values(DefaultMode::WithDefault)
    }

    fn from_string_value(&mut self, text: &str) {
        self.as_object_mut().set_values(text);
    }

    /// An element named after the qualified class name, holding every
    /// attribute value.
    fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new(self.class().name());
        self.as_object().get_values_xml(&mut element, DefaultMode::WithDefault);
        element
    }

    /// Reads attributes from an element named after the class.
    ///
    /// Returns `false` and leaves the object untouched for other elements.
    fn from_xml(&mut self, element: &XmlElement) -> bool {
        let class = self.class();
        if element.name() != class.class_name() && element.name() != class.name() {
            return false;
        }
        self.as_object_mut().set_values_xml(element);
        true
    }
}

impl dyn Object {
    /// Returns `true` if the object is a `C` or embeds one as a base.
    #[inline]
    pub fn is<C: Object>(&self) -> bool {
        self.downcast_ref::<C>().is_some()
    }

    /// Finds the `C` in this object or along its chain of embedded bases.
    pub fn downcast_ref<C: Object>(&self) -> Option<&C> {
        match self.as_any().downcast_ref::<C>() {
            Some(this) => Some(this),
            None => self.base()?.downcast_ref::<C>(),
        }
    }

    pub fn downcast_mut<C: Object>(&mut self) -> Option<&mut C> {
        if self.as_any().is::<C>() {
            return self.as_any_mut().downcast_mut::<C>();
        }
        self.base_mut()?.downcast_mut::<C>()
    }
}
