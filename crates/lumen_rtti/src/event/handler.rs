use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::func::{DynParams, ParamList, signature};
use crate::types::{TypeInfo, TypeKind};

// -----------------------------------------------------------------------------
// HandlerId

/// Identifies one connected handler, used to disconnect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        HandlerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// -----------------------------------------------------------------------------
// DynEventHandler

/// A callback that can be connected to signals with the same parameter types.
///
/// Cloning shares the callback and keeps the id.
#[derive(Clone)]
pub struct DynEventHandler {
    id: HandlerId,
    params: Rc<[&'static TypeInfo]>,
    callback: Rc<dyn Fn(&mut DynParams)>,
}

impl DynEventHandler {
    pub fn new(params: Vec<&'static TypeInfo>, callback: impl Fn(&mut DynParams) + 'static) -> Self {
        Self {
            id: HandlerId::next(),
            params: params.into(),
            callback: Rc::new(callback),
        }
    }

    /// Wraps a closure taking the typed arguments.
    ///
    /// ```
    /// use std::{cell::Cell, rc::Rc};
    /// use lumen_rtti::event::Event;
    ///
    /// let total = Rc::new(Cell::new(0));
    /// let sink = total.clone();
    ///
    /// let mut event = Event::<(i32,)>::new();
    /// event.connect_fn(move |(value,)| sink.set(sink.get() + value));
    /// event.emit((2,));
    /// event.emit((3,));
    /// assert_eq!(total.get(), 5);
    /// ```
    pub fn from_fn<P: ParamList>(callback: impl Fn(P) + 'static) -> Self {
        Self::new(P::type_infos(), move |params| callback(P::read_from(params)))
    }

    #[inline]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    #[inline]
    pub fn param_types(&self) -> &[&'static TypeInfo] {
        &self.params
    }

    pub fn signature(&self) -> String {
        signature(TypeInfo::of_kind(TypeKind::Void), self.params.iter().copied())
    }

    /// Returns `true` if the handler accepts arguments of these types.
    pub fn accepts(&self, params: &[&'static TypeInfo]) -> bool {
        *self.params == *params
    }

    #[inline]
    pub fn invoke(&self, params: &mut DynParams) {
        (self.callback)(params);
    }
}

impl fmt::Debug for DynEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynEventHandler")
            .field("id", &self.id)
            .field("signature", &self.signature())
            .finish()
    }
}
