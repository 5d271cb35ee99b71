use alloc::string::String;
use core::fmt::{self, Formatter};

use serde_core::de::{DeserializeSeed, Error, IgnoredAny, MapAccess, Visitor};
use serde_core::{Deserialize, Deserializer};

use crate::object::Object;
use crate::var::{AttributeMut, DynVarMut, Var};

// -----------------------------------------------------------------------------
// Var

struct VarVisitor;

macro_rules! visit_primitive {
    ($($fn_name:ident($ty:ty) => $variant:ident,)*) => {$(
        #[inline]
        fn $fn_name<E: Error>(self, v: $ty) -> Result<Var, E> {
            Ok(Var::$variant(v))
        }
    )*};
}

impl<'de> Visitor<'de> for VarVisitor {
    type Value = Var;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a primitive value")
    }

    visit_primitive! {
        visit_bool(bool) => Bool,
        visit_i8(i8) => Int8,
        visit_i16(i16) => Int16,
        visit_i32(i32) => Int32,
        visit_i64(i64) => Int64,
        visit_u8(u8) => UInt8,
        visit_u16(u16) => UInt16,
        visit_u32(u32) => UInt32,
        visit_u64(u64) => UInt64,
        visit_f32(f32) => Float,
        visit_f64(f64) => Double,
        visit_string(String) => String,
    }

    #[inline]
    fn visit_str<E: Error>(self, v: &str) -> Result<Var, E> {
        Ok(Var::from(v))
    }

    #[inline]
    fn visit_unit<E: Error>(self) -> Result<Var, E> {
        Ok(Var::Void)
    }

    #[inline]
    fn visit_none<E: Error>(self) -> Result<Var, E> {
        Ok(Var::Void)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Var, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for Var {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VarVisitor)
    }
}

// -----------------------------------------------------------------------------
// ObjectValuesSeed

/// Writes a map of attribute values into an existing object.
///
/// Values are converted to each attribute's type, enum attributes accept
/// variant names. Unknown names are skipped.
///
/// ```
/// use lumen_rtti::prelude::*;
/// use lumen_rtti::serde::ObjectValuesSeed;
/// use serde_core::de::DeserializeSeed;
///
/// #[derive(Object, Default)]
/// #[class(name = "Sound", namespace = "doc")]
/// struct Sound {
///     #[attribute]
///     volume: f32,
///     #[attribute]
///     looped: bool,
/// }
///
/// let mut sound = Sound::default();
/// let mut de = serde_json::Deserializer::from_str(r#"{"Volume": 0.25, "Looped": "yes"}"#);
/// ObjectValuesSeed::new(&mut sound).deserialize(&mut de).unwrap();
/// assert_eq!(sound.volume, 0.25);
/// assert!(sound.looped);
/// ```
pub struct ObjectValuesSeed<'a> {
    object: &'a mut dyn Object,
}

impl<'a> ObjectValuesSeed<'a> {
    #[inline]
    pub fn new(object: &'a mut dyn Object) -> Self {
        Self { object }
    }
}

impl<'de> DeserializeSeed<'de> for ObjectValuesSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ObjectValuesSeed<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "attribute values of `{}`", self.object.class().name())
    }

    fn visit_map<V: MapAccess<'de>>(self, mut map: V) -> Result<(), V::Error> {
        let object = self.object;
        let class = object.class();
        while let Some(name) = map.next_key::<String>()? {
            match class.attribute(&name) {
                Some(desc) => {
                    let value: Var = map.next_value()?;
                    AttributeMut::new(&mut *object, desc).set_var(&value);
                }
                None => {
                    log::debug!("`{}` has no attribute `{name}`", class.name());
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(())
    }
}
