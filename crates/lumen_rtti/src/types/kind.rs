use core::fmt;

use crate::var::Var;

/// Storage kind of a reflected value.
///
/// The numeric id and the name are stable and appear in method signatures,
/// e.g. `int(float,String)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum TypeKind {
    Void = 0,
    Bool = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    UInt8 = 6,
    UInt16 = 7,
    UInt32 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
}

impl TypeKind {
    /// All kinds, ordered by id.
    pub const ALL: [TypeKind; 13] = [
        TypeKind::Void,
        TypeKind::Bool,
        TypeKind::Int8,
        TypeKind::Int16,
        TypeKind::Int32,
        TypeKind::Int64,
        TypeKind::UInt8,
        TypeKind::UInt16,
        TypeKind::UInt32,
        TypeKind::UInt64,
        TypeKind::Float,
        TypeKind::Double,
        TypeKind::String,
    ];

    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeKind::Void => "void",
            TypeKind::Bool => "bool",
            TypeKind::Int8 => "int8",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int",
            TypeKind::Int64 => "int64",
            TypeKind::UInt8 => "uint8",
            TypeKind::UInt16 => "uint16",
            TypeKind::UInt32 => "uint32",
            TypeKind::UInt64 => "uint64",
            TypeKind::Float => "float",
            TypeKind::Double => "double",
            TypeKind::String => "String",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns `true` for the integer and floating point kinds.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, TypeKind::Void | TypeKind::Bool | TypeKind::String)
    }

    /// The zero value of this kind: `0`, `false`, `""` or `Void`.
    pub fn default_var(self) -> Var {
        self.coerce(&Var::Void)
    }

    /// Converts `value` to this kind. Never fails.
    pub fn coerce(self, value: &Var) -> Var {
        match self {
            TypeKind::Void => Var::Void,
            TypeKind::Bool => Var::Bool(value.to_bool()),
            TypeKind::Int8 => Var::Int8(value.to_int8()),
            TypeKind::Int16 => Var::Int16(value.to_int16()),
            TypeKind::Int32 => Var::Int32(value.to_int32()),
            TypeKind::Int64 => Var::Int64(value.to_int64()),
            TypeKind::UInt8 => Var::UInt8(value.to_uint8()),
            TypeKind::UInt16 => Var::UInt16(value.to_uint16()),
            TypeKind::UInt32 => Var::UInt32(value.to_uint32()),
            TypeKind::UInt64 => Var::UInt64(value.to_uint64()),
            TypeKind::Float => Var::Float(value.to_float()),
            TypeKind::Double => Var::Double(value.to_double()),
            TypeKind::String => Var::String(value.to_string_value()),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::TypeKind;
    use crate::var::Var;

    #[test]
    fn ids_and_names_are_stable() {
        for kind in TypeKind::ALL {
            assert_eq!(TypeKind::from_id(kind.id()), Some(kind));
            assert_eq!(TypeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TypeKind::Int32.name(), "int");
        assert_eq!(TypeKind::from_id(13), None);
    }

    #[test]
    fn coerce_never_fails() {
        assert_eq!(TypeKind::Int32.coerce(&Var::from("12")), Var::Int32(12));
        assert_eq!(TypeKind::Int32.coerce(&Var::from("abc")), Var::Int32(0));
        assert_eq!(TypeKind::Bool.coerce(&Var::Double(0.5)), Var::Bool(true));
        assert_eq!(TypeKind::String.default_var(), Var::String(String::new()));
        assert_eq!(TypeKind::Void.coerce(&Var::Int8(3)), Var::Void);
    }
}
