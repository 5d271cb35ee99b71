use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::fmt;

use crate::types::TypeKind;

// -----------------------------------------------------------------------------
// Var

/// A value of one of the reflected primitive types.
///
/// Every `to_*` conversion is total: it answers any typed query, converting
/// between kinds where that is meaningful and falling back to the target's
/// zero value where it is not.
///
/// | from \ to   | numeric            | `bool`           | `String`          |
/// |-------------|--------------------|------------------|-------------------|
/// | `Void`      | `0`                | `false`          | `""`              |
/// | `bool`      | `0` / `1`          | itself           | `"true"/"false"`  |
/// | numeric     | `as` cast          | `!= 0`           | `Display`         |
/// | `String`    | parsed, else `0`   | parsed, else `false` | itself        |
///
/// ```
/// use lumen_rtti::var::Var;
///
/// let count = Var::Int32(5);
/// assert_eq!(count.to_string_value(), "5");
/// assert!(count.to_bool());
/// assert_eq!(count.to_double(), 5.0);
///
/// let name = Var::from("Bob");
/// assert_eq!(name.to_int32(), 0);
/// assert!(!name.to_bool());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Var {
    #[default]
    Void,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
}

/// Reads `yes`/`no` style words used in hand-written config files.
fn parse_bool_word(text: &str) -> Option<bool> {
    const TRUE: [&str; 4] = ["true", "yes", "on", "1"];
    const FALSE: [&str; 4] = ["false", "no", "off", "0"];
    if TRUE.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        Some(true)
    } else if FALSE.iter().any(|w| w.eq_ignore_ascii_case(text)) {
        Some(false)
    } else {
        None
    }
}

macro_rules! impl_to_number {
    ($($(#[$doc:meta])* $fn_name:ident => $ty:ty,)*) => {$(
        $(#[$doc])*
        pub fn $fn_name(&self) -> $ty {
            match self {
                Var::Void => 0 as $ty,
                Var::Bool(v) => *v as u8 as $ty,
                Var::Int8(v) => *v as $ty,
                Var::Int16(v) => *v as $ty,
                Var::Int32(v) => *v as $ty,
                Var::Int64(v) => *v as $ty,
                Var::UInt8(v) => *v as $ty,
                Var::UInt16(v) => *v as $ty,
                Var::UInt32(v) => *v as $ty,
                Var::UInt64(v) => *v as $ty,
                Var::Float(v) => *v as $ty,
                Var::Double(v) => *v as $ty,
                Var::String(text) => {
                    let text = text.trim();
                    text.parse::<$ty>()
                        .ok()
                        .or_else(|| text.parse::<f64>().ok().map(|v| v as $ty))
                        .or_else(|| parse_bool_word(text).map(|v| v as u8 as $ty))
                        .unwrap_or(0 as $ty)
                }
            }
        }
    )*};
}

impl Var {
    /// The storage kind of this value.
    pub const fn kind(&self) -> TypeKind {
        match self {
            Var::Void => TypeKind::Void,
            Var::Bool(_) => TypeKind::Bool,
            Var::Int8(_) => TypeKind::Int8,
            Var::Int16(_) => TypeKind::Int16,
            Var::Int32(_) => TypeKind::Int32,
            Var::Int64(_) => TypeKind::Int64,
            Var::UInt8(_) => TypeKind::UInt8,
            Var::UInt16(_) => TypeKind::UInt16,
            Var::UInt32(_) => TypeKind::UInt32,
            Var::UInt64(_) => TypeKind::UInt64,
            Var::Float(_) => TypeKind::Float,
            Var::Double(_) => TypeKind::Double,
            Var::String(_) => TypeKind::String,
        }
    }

    #[inline]
    pub const fn is_void(&self) -> bool {
        matches!(self, Var::Void)
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Var::Void => false,
            Var::Bool(v) => *v,
            Var::Float(v) => *v != 0.0,
            Var::Double(v) => *v != 0.0,
            Var::String(text) => {
                let text = text.trim();
                parse_bool_word(text)
                    .or_else(|| text.parse::<f64>().ok().map(|v| v != 0.0))
                    .unwrap_or(false)
            }
            _ => self.to_int64() != 0 || self.to_uint64() != 0,
        }
    }

    impl_to_number! {
        to_int8 => i8,
        to_int16 => i16,
        to_int32 => i32,
        to_int64 => i64,
        to_uint8 => u8,
        to_uint16 => u16,
        to_uint32 => u32,
        to_uint64 => u64,
        to_float => f32,
        to_double => f64,
    }

    /// The canonical string form, read back by the `String` to X conversions.
    pub fn to_string_value(&self) -> String {
        match self {
            Var::String(text) => text.clone(),
            _ => self.to_string(),
        }
    }

    /// Borrows the string form without allocating for string values.
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Var::String(text) => Cow::Borrowed(text),
            _ => Cow::Owned(self.to_string()),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Void => Ok(()),
            Var::Bool(v) => fmt::Display::fmt(v, f),
            Var::Int8(v) => fmt::Display::fmt(v, f),
            Var::Int16(v) => fmt::Display::fmt(v, f),
            Var::Int32(v) => fmt::Display::fmt(v, f),
            Var::Int64(v) => fmt::Display::fmt(v, f),
            Var::UInt8(v) => fmt::Display::fmt(v, f),
            Var::UInt16(v) => fmt::Display::fmt(v, f),
            Var::UInt32(v) => fmt::Display::fmt(v, f),
            Var::UInt64(v) => fmt::Display::fmt(v, f),
            Var::Float(v) => fmt::Display::fmt(v, f),
            Var::Double(v) => fmt::Display::fmt(v, f),
            Var::String(v) => f.write_str(v),
        }
    }
}

// -----------------------------------------------------------------------------
// From

macro_rules! impl_from {
    ($($ty:ty => $variant:ident,)*) => {$(
        impl From<$ty> for Var {
            #[inline]
            fn from(value: $ty) -> Self {
                Var::$variant(value)
            }
        }
    )*};
}

impl_from! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
}

impl From<&str> for Var {
    #[inline]
    fn from(value: &str) -> Self {
        Var::String(String::from(value))
    }
}

impl From<()> for Var {
    #[inline]
    fn from(_: ()) -> Self {
        Var::Void
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::Var;
    use crate::types::TypeKind;

    #[test]
    fn mismatched_queries_use_zero_values() {
        let text = Var::from("not a number");
        assert_eq!(text.to_int32(), 0);
        assert_eq!(text.to_uint64(), 0);
        assert_eq!(text.to_double(), 0.0);
        assert!(!text.to_bool());

        let void = Var::Void;
        assert_eq!(void.to_string_value(), "");
        assert_eq!(void.to_float(), 0.0);
        assert!(!void.to_bool());
    }

    #[test]
    fn numeric_conversions() {
        assert_eq!(Var::Double(3.75).to_int32(), 3);
        assert_eq!(Var::Int32(-1).to_uint8(), 255);
        assert_eq!(Var::Float(1e20).to_int16(), i16::MAX);
        assert!(Var::UInt64(u64::MAX).to_bool());
        assert_eq!(Var::Bool(true).to_double(), 1.0);
        assert_eq!(Var::from(" 42 ").to_int8(), 42);
        assert_eq!(Var::from("2.5").to_int64(), 2);
        assert_eq!(Var::from("yes").to_uint32(), 1);
        assert!(!Var::from("Off").to_bool());
        assert!(!Var::from("0.0").to_bool());
    }

    #[test]
    fn string_forms() {
        assert_eq!(Var::Bool(true).to_string_value(), "true");
        assert_eq!(Var::Float(0.1).to_string_value(), "0.1");
        assert_eq!(Var::Double(-2.0).to_string_value(), "-2");
        assert_eq!(Var::Int64(i64::MIN).as_str(), "-9223372036854775808");
        assert_eq!(Var::from("x").kind(), TypeKind::String);
    }

    #[test]
    fn float_string_round_trip() {
        for value in [0.1_f32, 1.0 / 3.0, f32::MAX, -7.25e-12] {
            let text = Var::Float(value).to_string_value();
            assert_eq!(Var::String(text).to_float(), value);
        }
    }
}
