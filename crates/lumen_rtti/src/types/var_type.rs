use alloc::string::String;

use crate::types::{TypeInfo, TypeKind};
use crate::var::Var;

/// A native type that can back an attribute, a parameter or a return value.
///
/// `from_var` is total: a mismatched value is coerced, and unparsable input
/// gives the type's zero value.
///
/// ```
/// use lumen_rtti::types::VarType;
/// use lumen_rtti::var::Var;
///
/// assert_eq!(<i32 as VarType>::type_info().name(), "int");
/// assert_eq!(i32::from_var(&Var::from("17")), 17);
/// assert_eq!(String::from_var(&Var::Bool(false)), "false");
/// assert_eq!(f64::default_value(), 0.0);
/// ```
pub trait VarType: Sized + 'static {
    fn type_info() -> &'static TypeInfo;

    fn to_var(&self) -> Var;

    fn from_var(var: &Var) -> Self;

    /// The zero value of the declared type.
    #[inline]
    fn default_value() -> Self {
        Self::from_var(&Self::type_info().default_var())
    }
}

macro_rules! impl_var_type {
    ($($ty:ty => $kind:ident, $to:ident;)*) => {$(
        impl VarType for $ty {
            #[inline]
            fn type_info() -> &'static TypeInfo {
                TypeInfo::of_kind(TypeKind::$kind)
            }

            #[inline]
            fn to_var(&self) -> Var {
                Var::$kind(self.clone())
            }

            #[inline]
            fn from_var(var: &Var) -> Self {
                var.$to()
            }
        }
    )*};
}

impl_var_type! {
    bool => Bool, to_bool;
    i8 => Int8, to_int8;
    i16 => Int16, to_int16;
    i32 => Int32, to_int32;
    i64 => Int64, to_int64;
    u8 => UInt8, to_uint8;
    u16 => UInt16, to_uint16;
    u32 => UInt32, to_uint32;
    u64 => UInt64, to_uint64;
    f32 => Float, to_float;
    f64 => Double, to_double;
    String => String, to_string_value;
}

impl VarType for () {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        TypeInfo::of_kind(TypeKind::Void)
    }

    #[inline]
    fn to_var(&self) -> Var {
        Var::Void
    }

    #[inline]
    fn from_var(_: &Var) -> Self {}
}

// -----------------------------------------------------------------------------
// IntoVar

/// Values accepted as declared attribute defaults: any [`VarType`] and string
/// literals.
pub trait IntoVar {
    fn into_var(self) -> Var;
}

impl<T: VarType> IntoVar for T {
    #[inline]
    fn into_var(self) -> Var {
        self.to_var()
    }
}

impl IntoVar for &str {
    #[inline]
    fn into_var(self) -> Var {
        Var::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{IntoVar, VarType};
    use crate::var::Var;

    #[test]
    fn primitive_round_trip_through_var() {
        assert_eq!(u16::from_var(&7_u16.to_var()), 7);
        assert_eq!(f64::from_var(&Var::Float(0.5)), 0.5);
        assert_eq!(String::from_var(&Var::UInt8(200)), "200");
        assert!(bool::from_var(&Var::from("on")));
        assert_eq!(<() as VarType>::type_info().name(), "void");
    }

    #[test]
    fn literals_into_var() {
        assert_eq!(0.into_var(), Var::Int32(0));
        assert_eq!(1.5.into_var(), Var::Double(1.5));
        assert_eq!("abc".into_var(), Var::from("abc"));
    }
}
