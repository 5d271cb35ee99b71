use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::types::{EnumValue, TypeInfo, VarType};
use crate::var::Var;

// -----------------------------------------------------------------------------
// EnumType

/// A fieldless enum whose variants are known by name at runtime.
///
/// Implemented by `#[derive(VarEnum)]`, which also implements [`VarType`]
/// so the enum can back an attribute. Values travel as `int` and are written
/// as the variant name.
///
/// ```
/// use lumen_rtti::derive::VarEnum;
/// use lumen_rtti::types::{EnumType, VarType};
/// use lumen_rtti::var::Var;
///
/// #[derive(VarEnum, Clone, Copy, Debug, PartialEq)]
/// enum Filter {
///     Nearest,
///     Linear = 4,
/// }
///
/// assert_eq!(Filter::type_info().format(&Filter::Linear.to_var()), "Linear");
/// assert_eq!(Filter::from_var(&Var::from("Linear")), Filter::Linear);
/// // unknown values fall back to the first variant
/// assert_eq!(Filter::from_var(&Var::Int32(9)), Filter::Nearest);
/// ```
pub trait EnumType: Copy + 'static {
    const NAME: &'static str;

    const VALUES: &'static [EnumValue];

    /// Returned for values that match no variant.
    const FALLBACK: Self;

    fn to_i64(self) -> i64;

    fn from_i64(value: i64) -> Option<Self>;

    /// Descriptor used when the enum stands alone.
    fn enum_type_info() -> &'static TypeInfo;

    /// Descriptor used by [`Flags<Self>`].
    fn flags_type_info() -> &'static TypeInfo;

    /// Converts a dynamic value, accepting variant names and numbers.
    fn from_var_or_fallback(var: &Var) -> Self {
        let number = match var {
            Var::String(_) => Self::enum_type_info().coerce(var).to_int64(),
            _ => var.to_int64(),
        };
        Self::from_i64(number).unwrap_or(Self::FALLBACK)
    }
}

// -----------------------------------------------------------------------------
// Flags

/// A set of [`EnumType`] values stored as a bit mask.
///
/// Its string form joins the names of the contained values with `|`.
///
/// ```
/// use lumen_rtti::derive::VarEnum;
/// use lumen_rtti::types::{Flags, VarType};
/// use lumen_rtti::var::Var;
///
/// #[derive(VarEnum, Clone, Copy)]
/// enum Access {
///     Read = 1,
///     Write = 2,
///     Append = 4,
/// }
///
/// let flags = Flags::empty().with(Access::Read).with(Access::Append);
/// assert_eq!(Flags::<Access>::type_info().format(&flags.to_var()), "Read|Append");
///
/// let parsed = Flags::<Access>::from_var(&Var::from("Write|Read"));
/// assert!(parsed.contains(Access::Write));
/// assert!(!parsed.contains(Access::Append));
/// ```
pub struct Flags<E> {
    bits: u32,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EnumType> Flags<E> {
    #[inline]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    pub fn contains(self, value: E) -> bool {
        let mask = value.to_i64() as u32;
        self.bits & mask == mask
    }

    #[inline]
    pub fn insert(&mut self, value: E) {
        self.bits |= value.to_i64() as u32;
    }

    #[inline]
    pub fn remove(&mut self, value: E) {
        self.bits &= !(value.to_i64() as u32);
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, value: E) -> Self {
        self.insert(value);
        self
    }
}

impl<E: EnumType> VarType for Flags<E> {
    #[inline]
    fn type_info() -> &'static TypeInfo {
        E::flags_type_info()
    }

    #[inline]
    fn to_var(&self) -> Var {
        Var::UInt32(self.bits)
    }

    fn from_var(var: &Var) -> Self {
        Self::from_bits(Self::type_info().coerce(var).to_uint32())
    }
}

impl<E> Clone for Flags<E> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Flags<E> {}

impl<E> Default for Flags<E> {
    #[inline]
    fn default() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }
}

impl<E> PartialEq for Flags<E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for Flags<E> {}

impl<E> Hash for Flags<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<E: EnumType> fmt::Debug for Flags<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = E::flags_type_info().format(&Var::UInt32(self.bits));
        f.debug_tuple("Flags").field(&text).finish()
    }
}
