use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::types::TypeKind;
use crate::var::Var;

// -----------------------------------------------------------------------------
// EnumValue

/// One named value of an enum or flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub name: &'static str,
    pub value: i64,
    pub description: &'static str,
}

impl EnumValue {
    #[inline]
    pub const fn new(name: &'static str, value: i64, description: &'static str) -> Self {
        Self {
            name,
            value,
            description,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Runtime descriptor of a declared value type.
///
/// Primitive types use one of the shared descriptors returned by
/// [`TypeInfo::of_kind`]. Enums and flag sets carry their value table, which
/// changes how values are formatted and parsed:
///
/// ```
/// use lumen_rtti::types::{EnumValue, TypeInfo, TypeKind};
/// use lumen_rtti::var::Var;
///
/// static MODES: [EnumValue; 3] = [
///     EnumValue::new("Read", 1, ""),
///     EnumValue::new("Write", 2, ""),
///     EnumValue::new("Append", 4, ""),
/// ];
/// static ACCESS: TypeInfo = TypeInfo::flags(TypeKind::UInt32, "Access", &MODES);
///
/// assert_eq!(ACCESS.format(&Var::UInt32(5)), "Read|Append");
/// assert_eq!(ACCESS.parse("Write|Read"), Var::UInt32(3));
/// ```
pub struct TypeInfo {
    kind: TypeKind,
    name: &'static str,
    values: &'static [EnumValue],
    flags: bool,
}

static PRIMITIVES: [TypeInfo; 13] = [
    TypeInfo::primitive(TypeKind::Void),
    TypeInfo::primitive(TypeKind::Bool),
    TypeInfo::primitive(TypeKind::Int8),
    TypeInfo::primitive(TypeKind::Int16),
    TypeInfo::primitive(TypeKind::Int32),
    TypeInfo::primitive(TypeKind::Int64),
    TypeInfo::primitive(TypeKind::UInt8),
    TypeInfo::primitive(TypeKind::UInt16),
    TypeInfo::primitive(TypeKind::UInt32),
    TypeInfo::primitive(TypeKind::UInt64),
    TypeInfo::primitive(TypeKind::Float),
    TypeInfo::primitive(TypeKind::Double),
    TypeInfo::primitive(TypeKind::String),
];

impl TypeInfo {
    pub const fn primitive(kind: TypeKind) -> Self {
        Self {
            kind,
            name: kind.name(),
            values: &[],
            flags: false,
        }
    }

    pub const fn enumeration(kind: TypeKind, name: &'static str, values: &'static [EnumValue]) -> Self {
        Self {
            kind,
            name,
            values,
            flags: false,
        }
    }

    pub const fn flags(kind: TypeKind, name: &'static str, values: &'static [EnumValue]) -> Self {
        Self {
            kind,
            name,
            values,
            flags: true,
        }
    }

    /// The shared descriptor of a primitive kind.
    #[inline]
    pub fn of_kind(kind: TypeKind) -> &'static TypeInfo {
        &PRIMITIVES[kind.id() as usize]
    }

    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn is_enum(&self) -> bool {
        !self.flags && !self.values.is_empty()
    }

    #[inline]
    pub const fn is_flags(&self) -> bool {
        self.flags
    }

    #[inline]
    pub const fn enum_values(&self) -> &'static [EnumValue] {
        self.values
    }

    pub fn enum_name(&self, value: i64) -> Option<&'static str> {
        self.values.iter().find(|v| v.value == value).map(|v| v.name)
    }

    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    #[inline]
    pub fn default_var(&self) -> Var {
        self.kind.default_var()
    }

    /// Converts `value` to this type.
    ///
    /// Strings go through [`parse`](Self::parse) so enum names are understood.
    pub fn coerce(&self, value: &Var) -> Var {
        match value {
            Var::String(text) if !self.values.is_empty() => self.parse(text),
            _ => self.kind.coerce(value),
        }
    }

    /// Parses the string form of a value. Unparsable input yields zero.
    pub fn parse(&self, text: &str) -> Var {
        if self.flags {
            let bits = text
                .split('|')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .fold(0_i64, |bits, part| bits | self.parse_enum_part(part));
            self.kind.coerce(&Var::Int64(bits))
        } else if !self.values.is_empty() {
            self.kind.coerce(&Var::Int64(self.parse_enum_part(text.trim())))
        } else {
            self.kind.coerce(&Var::String(String::from(text)))
        }
    }

    fn parse_enum_part(&self, part: &str) -> i64 {
        self.enum_value(part)
            .unwrap_or_else(|| Var::String(String::from(part)).to_int64())
    }

    /// Formats a value the way [`parse`](Self::parse) reads it back.
    pub fn format(&self, value: &Var) -> String {
        let value = self.kind.coerce(value);
        if self.flags {
            self.format_flags(value.to_int64())
        } else if !self.values.is_empty() {
            let number = value.to_int64();
            match self.enum_name(number) {
                Some(name) => String::from(name),
                None => value.to_string_value(),
            }
        } else {
            value.to_string_value()
        }
    }

    fn format_flags(&self, bits: i64) -> String {
        if bits == 0 {
            return String::from(self.enum_name(0).unwrap_or("0"));
        }
        let mut rest = bits;
        let mut names = Vec::new();
        for value in self.values {
            if value.value != 0 && bits & value.value == value.value {
                names.push(value.name);
                rest &= !value.value;
            }
        }
        let mut out = names.join("|");
        if rest != 0 {
            if !out.is_empty() {
                out.push('|');
            }
            out.push_str(&Var::Int64(rest).to_string_value());
        }
        out
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("values", &self.values.len())
            .field("flags", &self.flags)
            .finish()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name && self.flags == other.flags
    }
}

#[cfg(test)]
mod tests {
    use super::{EnumValue, TypeInfo};
    use crate::types::TypeKind;
    use crate::var::Var;

    static COLORS: [EnumValue; 3] = [
        EnumValue::new("Red", 0, "red"),
        EnumValue::new("Green", 1, "green"),
        EnumValue::new("Blue", 2, "blue"),
    ];
    static COLOR: TypeInfo = TypeInfo::enumeration(TypeKind::Int32, "Color", &COLORS);

    #[test]
    fn enum_names_round_trip() {
        assert!(COLOR.is_enum());
        assert_eq!(COLOR.format(&Var::Int32(2)), "Blue");
        assert_eq!(COLOR.parse("Green"), Var::Int32(1));
        assert_eq!(COLOR.coerce(&Var::from("Blue")), Var::Int32(2));
        // unknown values keep their number
        assert_eq!(COLOR.format(&Var::Int32(7)), "7");
        assert_eq!(COLOR.parse("7"), Var::Int32(7));
        assert_eq!(COLOR.parse("Purple"), Var::Int32(0));
    }

    #[test]
    fn primitive_descriptors_are_shared() {
        let info = TypeInfo::of_kind(TypeKind::Float);
        assert_eq!(info.name(), "float");
        assert!(core::ptr::eq(info, TypeInfo::of_kind(TypeKind::Float)));
        assert_eq!(info.format(&Var::from("1.5")), "1.5");
    }
}
