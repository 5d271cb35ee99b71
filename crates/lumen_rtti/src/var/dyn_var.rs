use alloc::string::String;

use crate::types::{TypeInfo, TypeKind};
use crate::var::Var;

// -----------------------------------------------------------------------------
// DynVar

/// Read access to a value of a declared type.
///
/// Implementors provide [`type_info`](DynVar::type_info) and
/// [`get_var`](DynVar::get_var); every typed getter converts from there, so a
/// getter that does not match the declared type still answers with a
/// converted value or the getter's zero value.
pub trait DynVar {
    fn type_info(&self) -> &'static TypeInfo;

    /// The current value, already of the declared kind.
    fn get_var(&self) -> Var;

    /// The value [`DynVarMut::set_default`] restores.
    fn default_var(&self) -> Var {
        self.type_info().default_var()
    }

    fn is_default(&self) -> bool {
        let info = self.type_info();
        info.coerce(&self.get_var()) == info.coerce(&self.default_var())
    }

    #[inline]
    fn type_kind(&self) -> TypeKind {
        self.type_info().kind()
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        self.type_info().name()
    }

    /// The string form of the value, enum and flag names included.
    fn get_string(&self) -> String {
        self.type_info().format(&self.get_var())
    }

    fn get_bool(&self) -> bool {
        self.get_var().to_bool()
    }

    fn get_int8(&self) -> i8 {
        self.get_var().to_int8()
    }

    fn get_int16(&self) -> i16 {
        self.get_var().to_int16()
    }

    fn get_int32(&self) -> i32 {
        self.get_var().to_int32()
    }

    fn get_int64(&self) -> i64 {
        self.get_var().to_int64()
    }

    fn get_uint8(&self) -> u8 {
        self.get_var().to_uint8()
    }

    fn get_uint16(&self) -> u16 {
        self.get_var().to_uint16()
    }

    fn get_uint32(&self) -> u32 {
        self.get_var().to_uint32()
    }

    fn get_uint64(&self) -> u64 {
        self.get_var().to_uint64()
    }

    fn get_float(&self) -> f32 {
        self.get_var().to_float()
    }

    fn get_double(&self) -> f64 {
        self.get_var().to_double()
    }
}

// -----------------------------------------------------------------------------
// DynVarMut

/// Write access to a value of a declared type.
///
/// Every setter converts its input to the declared type before storing it.
pub trait DynVarMut: DynVar {
    /// Stores `value` after converting it to the declared type.
    fn set_var(&mut self, value: &Var);

    /// Parses `text` with the declared type's string rule and stores the result.
    fn set_string(&mut self, text: &str) {
        let value = self.type_info().parse(text);
        self.set_var(&value);
    }

    fn set_default(&mut self) {
        let value = self.default_var();
        self.set_var(&value);
    }

    /// Copies the value of another variable, converting as needed.
    fn set_from(&mut self, other: &dyn DynVar) {
        if other.type_info().is_enum() || other.type_info().is_flags() {
            self.set_string(&other.get_string());
        } else {
            self.set_var(&other.get_var());
        }
    }

    fn set_bool(&mut self, value: bool) {
        self.set_var(&Var::Bool(value));
    }

    fn set_int8(&mut self, value: i8) {
        self.set_var(&Var::Int8(value));
    }

    fn set_int16(&mut self, value: i16) {
        self.set_var(&Var::Int16(value));
    }

    fn set_int32(&mut self, value: i32) {
        self.set_var(&Var::Int32(value));
    }

    fn set_int64(&mut self, value: i64) {
        self.set_var(&Var::Int64(value));
    }

    fn set_uint8(&mut self, value: u8) {
        self.set_var(&Var::UInt8(value));
    }

    fn set_uint16(&mut self, value: u16) {
        self.set_var(&Var::UInt16(value));
    }

    fn set_uint32(&mut self, value: u32) {
        self.set_var(&Var::UInt32(value));
    }

    fn set_uint64(&mut self, value: u64) {
        self.set_var(&Var::UInt64(value));
    }

    fn set_float(&mut self, value: f32) {
        self.set_var(&Var::Float(value));
    }

    fn set_double(&mut self, value: f64) {
        self.set_var(&Var::Double(value));
    }
}
