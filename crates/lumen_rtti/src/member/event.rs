use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::event::{Event, EventStorage};
use crate::func::{DynParams, ParamList, signature};
use crate::member::{MemberDesc, MemberKind, names_of};
use crate::object::Object;
use crate::types::{TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// EventAccess

/// Finds the storage of one signal inside a type-erased object.
pub trait EventAccess: Send + Sync + 'static {
    fn event<'a>(&self, object: &'a dyn Object) -> Option<&'a dyn EventStorage>;

    fn event_mut<'a>(&self, object: &'a mut dyn Object) -> Option<&'a mut dyn EventStorage>;
}

struct FieldEvent<C, P> {
    get: fn(&C) -> &Event<P>,
    get_mut: fn(&mut C) -> &mut Event<P>,
}

impl<C: Object, P: ParamList> EventAccess for FieldEvent<C, P> {
    fn event<'a>(&self, object: &'a dyn Object) -> Option<&'a dyn EventStorage> {
        let this = object.downcast_ref::<C>()?;
        Some((self.get)(this))
    }

    fn event_mut<'a>(&self, object: &'a mut dyn Object) -> Option<&'a mut dyn EventStorage> {
        let this = object.downcast_mut::<C>()?;
        Some((self.get_mut)(this))
    }
}

// -----------------------------------------------------------------------------
// EventDesc

/// Descriptor of one signal.
///
/// A signal without access is not stored in the object itself; the root
/// class's destruction signal lives on the [`ObjectRef`](crate::object::ObjectRef).
pub struct EventDesc {
    member: MemberDesc,
    params: Vec<&'static TypeInfo>,
    param_names: Vec<Cow<'static, str>>,
    access: Option<Box<dyn EventAccess>>,
}

super::impl_member_accessors!(EventDesc);

impl EventDesc {
    /// A signal stored in an [`Event`] field of `C`.
    pub fn field<C: Object, P: ParamList>(
        name: impl Into<Cow<'static, str>>,
        get: fn(&C) -> &Event<P>,
        get_mut: fn(&mut C) -> &mut Event<P>,
    ) -> Self {
        Self {
            member: MemberDesc::new(MemberKind::Event, name),
            params: P::type_infos(),
            param_names: Vec::new(),
            access: Some(Box::new(FieldEvent { get, get_mut })),
        }
    }

    /// A signal stored outside the object.
    pub fn detached(name: impl Into<Cow<'static, str>>, params: Vec<&'static TypeInfo>) -> Self {
        Self {
            member: MemberDesc::new(MemberKind::Event, name),
            params,
            param_names: Vec::new(),
            access: None,
        }
    }

    pub fn with_param_names<N: Into<Cow<'static, str>>>(
        mut self,
        names: impl IntoIterator<Item = N>,
    ) -> Self {
        self.param_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn param_types(&self) -> &[&'static TypeInfo] {
        &self.params
    }

    pub fn param_names(&self) -> Vec<&str> {
        names_of(&self.param_names)
    }

    pub fn signature(&self) -> String {
        signature(TypeInfo::of_kind(TypeKind::Void), self.params.iter().copied())
    }

    pub fn new_params(&self) -> DynParams {
        DynParams::new(TypeInfo::of_kind(TypeKind::Void), &self.params)
    }

    #[inline]
    pub fn is_detached(&self) -> bool {
        self.access.is_none()
    }

    pub fn event<'a>(&self, object: &'a dyn Object) -> Option<&'a dyn EventStorage> {
        self.access.as_ref()?.event(object)
    }

    pub fn event_mut<'a>(&self, object: &'a mut dyn Object) -> Option<&'a mut dyn EventStorage> {
        self.access.as_ref()?.event_mut(object)
    }
}

impl fmt::Debug for EventDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDesc")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .finish()
    }
}
