use alloc::vec::Vec;

use serde_core::ser::SerializeMap;
use serde_core::{Serialize, Serializer};

use crate::object::{DefaultMode, Object, ObjectExt};
use crate::var::{DynVar, Var};

// -----------------------------------------------------------------------------
// Var

impl Serialize for Var {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Var::Void => serializer.serialize_unit(),
            Var::Bool(v) => serializer.serialize_bool(*v),
            Var::Int8(v) => serializer.serialize_i8(*v),
            Var::Int16(v) => serializer.serialize_i16(*v),
            Var::Int32(v) => serializer.serialize_i32(*v),
            Var::Int64(v) => serializer.serialize_i64(*v),
            Var::UInt8(v) => serializer.serialize_u8(*v),
            Var::UInt16(v) => serializer.serialize_u16(*v),
            Var::UInt32(v) => serializer.serialize_u32(*v),
            Var::UInt64(v) => serializer.serialize_u64(*v),
            Var::Float(v) => serializer.serialize_f32(*v),
            Var::Double(v) => serializer.serialize_f64(*v),
            Var::String(v) => serializer.serialize_str(v),
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectValues

/// Serializes the attributes of an object as a map.
///
/// ```
/// use lumen_rtti::prelude::*;
/// use lumen_rtti::serde::ObjectValues;
///
/// #[derive(Object, Default)]
/// #[class(name = "Camera", namespace = "doc")]
/// struct Camera {
///     #[attribute(default = 90.0)]
///     fov: f64,
///     #[attribute]
///     name: String,
/// }
///
/// let camera = Camera { fov: 90.0, name: String::from("Main") };
/// let json = serde_json::to_string(&ObjectValues::new(&camera, DefaultMode::NoDefault)).unwrap();
/// assert_eq!(json, r#"{"Name":"Main"}"#);
/// ```
pub struct ObjectValues<'a> {
    object: &'a dyn Object,
    mode: DefaultMode,
}

impl<'a> ObjectValues<'a> {
    #[inline]
    pub fn new(object: &'a dyn Object, mode: DefaultMode) -> Self {
        Self { object, mode }
    }
}

impl Serialize for ObjectValues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes: Vec<_> = self
            .object
            .attributes()
            .into_iter()
            .filter(|a| self.mode == DefaultMode::WithDefault || !a.is_default())
            .collect();

        let mut state = serializer.serialize_map(Some(attributes.len()))?;
        for attribute in &attributes {
            let info = attribute.type_info();
            if info.is_enum() || info.is_flags() {
                state.serialize_entry(attribute.name(), &attribute.get_string())?;
            } else {
                state.serialize_entry(attribute.name(), &attribute.get_var())?;
            }
        }
        state.end()
    }
}
