use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::event::DynEventHandler;
use crate::func::{DynParams, ParamList, signature};
use crate::member::{MemberDesc, MemberKind};
use crate::object::{Object, ObjectRef};
use crate::types::{TypeInfo, TypeKind};

type Invoke = dyn Fn(&mut dyn Object, &mut DynParams) -> bool + Send + Sync;

/// Descriptor of one slot: a method of the class that can be connected to
/// signals with the same parameter types.
pub struct EventHandlerDesc {
    member: MemberDesc,
    params: Vec<&'static TypeInfo>,
    invoke: Arc<Invoke>,
}

super::impl_member_accessors!(EventHandlerDesc);

impl EventHandlerDesc {
    pub fn new<C: Object, P: ParamList>(
        name: impl Into<Cow<'static, str>>,
        handler: impl Fn(&mut C, P) + Send + Sync + 'static,
    ) -> Self {
        Self::dynamic(name, P::type_infos(), move |object, params| {
            match object.downcast_mut::<C>() {
                Some(this) => {
                    handler(this, P::read_from(params));
                    true
                }
                None => false,
            }
        })
    }

    pub fn dynamic(
        name: impl Into<Cow<'static, str>>,
        params: Vec<&'static TypeInfo>,
        invoke: impl Fn(&mut dyn Object, &mut DynParams) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            member: MemberDesc::new(MemberKind::EventHandler, name),
            params,
            invoke: Arc::new(invoke),
        }
    }

    #[inline]
    pub fn param_types(&self) -> &[&'static TypeInfo] {
        &self.params
    }

    pub fn signature(&self) -> String {
        signature(TypeInfo::of_kind(TypeKind::Void), self.params.iter().copied())
    }

    /// Calls the slot directly on an object.
    pub fn call(&self, object: &mut dyn Object, params: &mut DynParams) -> bool {
        params.matches(&self.params) && (self.invoke)(object, params)
    }

    /// Binds the slot to `target`.
    ///
    /// The handler holds the target weakly. Once the target is gone, or while
    /// it is already borrowed, invocations are skipped.
    pub fn slot(&self, target: &ObjectRef<dyn Object>) -> DynEventHandler {
        let weak = target.downgrade();
        let invoke = Arc::clone(&self.invoke);
        let name: Rc<str> = Rc::from(self.name());
        DynEventHandler::new(self.params.clone(), move |params| {
            let Some(target) = weak.upgrade() else {
                log::debug!("slot `{name}` skipped, its object is gone");
                return;
            };
            let Ok(mut object) = target.try_borrow_mut() else {
                log::warn!("slot `{name}` skipped, its object is busy");
                return;
            };
            invoke(&mut *object, params);
        })
    }
}

impl fmt::Debug for EventHandlerDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlerDesc")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .finish()
    }
}
