use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::fmt;

use crate::member::{MemberDesc, MemberKind};
use crate::object::Object;
use crate::types::{TypeInfo, VarType};
use crate::var::Var;

// -----------------------------------------------------------------------------
// VarAccess

/// Reads and writes one attribute on a type-erased object.
///
/// Both methods fail when the object does not contain the expected type.
pub trait VarAccess: Send + Sync + 'static {
    fn get(&self, object: &dyn Object) -> Option<Var>;

    fn set(&self, object: &mut dyn Object, value: &Var) -> bool;
}

/// Access to a plain field of `C`.
struct FieldAccess<C, T> {
    get: fn(&C) -> &T,
    get_mut: fn(&mut C) -> &mut T,
}

impl<C: Object, T: VarType> VarAccess for FieldAccess<C, T> {
    fn get(&self, object: &dyn Object) -> Option<Var> {
        object.downcast_ref::<C>().map(|this| (self.get)(this).to_var())
    }

    fn set(&self, object: &mut dyn Object, value: &Var) -> bool {
        match object.downcast_mut::<C>() {
            Some(this) => {
                *(self.get_mut)(this) = T::from_var(value);
                true
            }
            None => false,
        }
    }
}

/// Access through a getter and a setter of `C`.
struct PropertyAccess<C, T> {
    get: fn(&C) -> T,
    set: fn(&mut C, T),
}

impl<C: Object, T: VarType> VarAccess for PropertyAccess<C, T> {
    fn get(&self, object: &dyn Object) -> Option<Var> {
        object.downcast_ref::<C>().map(|this| (self.get)(this).to_var())
    }

    fn set(&self, object: &mut dyn Object, value: &Var) -> bool {
        match object.downcast_mut::<C>() {
            Some(this) => {
                (self.set)(this, T::from_var(value));
                true
            }
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// VarDesc

/// Descriptor of one attribute.
///
/// Values written through the descriptor are converted to the declared type.
/// The declared default is what `set_attribute_default` restores and what
/// `DefaultMode::NoDefault` compares against.
pub struct VarDesc {
    member: MemberDesc,
    info: &'static TypeInfo,
    default: Var,
    access: Box<dyn VarAccess>,
}

super::impl_member_accessors!(VarDesc);

impl VarDesc {
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        info: &'static TypeInfo,
        access: impl VarAccess,
    ) -> Self {
        Self {
            member: MemberDesc::new(MemberKind::Attribute, name),
            info,
            default: info.default_var(),
            access: Box::new(access),
        }
    }

    /// An attribute stored in a field of `C`.
    pub fn field<C: Object, T: VarType>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&C) -> &T,
        get_mut: fn(&mut C) -> &mut T,
    ) -> Self {
        Self::new(name, T::type_info(), FieldAccess { get, get_mut })
    }

    /// An attribute read and written through accessor functions of `C`.
    pub fn property<C: Object, T: VarType>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&C) -> T,
        set: fn(&mut C, T),
    ) -> Self {
        Self::new(name, T::type_info(), PropertyAccess { get, set })
    }

    /// Sets the declared default, converted to the attribute's type.
    pub fn with_default(mut self, value: Var) -> Self {
        self.default = self.info.coerce(&value);
        self
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn default_var(&self) -> &Var {
        &self.default
    }

    /// Reads the attribute, or the declared default if `object` does not hold it.
    pub fn get(&self, object: &dyn Object) -> Var {
        self.access
            .get(object)
            .map(|value| self.info.coerce(&value))
            .unwrap_or_else(|| self.default.clone())
    }

    /// Writes the attribute. Returns `false` if `object` does not hold it.
    pub fn set(&self, object: &mut dyn Object, value: &Var) -> bool {
        self.access.set(object, &self.info.coerce(value))
    }
}

impl fmt::Debug for VarDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarDesc")
            .field("name", &self.name())
            .field("type", &self.info.name())
            .field("default", &self.default)
            .finish()
    }
}
