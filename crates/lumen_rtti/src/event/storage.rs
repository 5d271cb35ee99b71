use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use crate::event::{DynEventHandler, HandlerId};
use crate::func::{DynParams, ParamList};
use crate::types::TypeInfo;

// -----------------------------------------------------------------------------
// EventStorage

/// Type-erased access to the handlers of one signal.
pub trait EventStorage {
    fn param_types(&self) -> Vec<&'static TypeInfo>;

    fn handlers(&self) -> &[DynEventHandler];

    /// Connects a handler. Returns `false` if its parameters do not match.
    fn connect(&mut self, handler: DynEventHandler) -> bool;

    fn disconnect(&mut self, id: HandlerId) -> bool;

    fn disconnect_all(&mut self);

    /// Calls every handler connected when the emission starts.
    fn emit_dyn(&self, params: &mut DynParams) {
        for handler in self.handlers().to_vec() {
            handler.invoke(params);
        }
    }
}

// -----------------------------------------------------------------------------
// Event

/// A signal carrying arguments of type `P`, stored in the object that emits it.
///
/// Handlers run in connection order.
pub struct Event<P> {
    handlers: Vec<DynEventHandler>,
    _marker: PhantomData<fn(P)>,
}

impl<P: ParamList> Event<P> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            handlers: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Connects a closure taking the typed arguments.
    pub fn connect_fn(&mut self, callback: impl Fn(P) + 'static) -> HandlerId {
        let handler = DynEventHandler::from_fn(callback);
        let id = handler.id();
        self.handlers.push(handler);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn emit(&self, args: P) {
        if self.handlers.is_empty() {
            return;
        }
        let mut params = DynParams::with_args::<(), P>(args);
        self.emit_dyn(&mut params);
    }
}

impl<P: ParamList> EventStorage for Event<P> {
    fn param_types(&self) -> Vec<&'static TypeInfo> {
        P::type_infos()
    }

    #[inline]
    fn handlers(&self) -> &[DynEventHandler] {
        &self.handlers
    }

    fn connect(&mut self, handler: DynEventHandler) -> bool {
        if !handler.accepts(&P::type_infos()) {
            log::warn!(
                "cannot connect handler `{}` to a signal with {} parameter(s)",
                handler.signature(),
                P::LEN
            );
            return false;
        }
        self.handlers.push(handler);
        true
    }

    fn disconnect(&mut self, id: HandlerId) -> bool {
        let len = self.handlers.len();
        self.handlers.retain(|h| h.id() != id);
        self.handlers.len() != len
    }

    fn disconnect_all(&mut self) {
        self.handlers.clear();
    }
}

impl<P: ParamList> Default for Event<P> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for Event<P> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            _marker: PhantomData,
        }
    }
}

impl<P> fmt::Debug for Event<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Event, EventStorage};
    use crate::event::DynEventHandler;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    #[test]
    fn connect_emit_disconnect() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut event = Event::<(i32, String)>::new();
        let sink = log.clone();
        let first = event.connect_fn(move |(n, s)| sink.borrow_mut().push(format!("a{n}{s}")));
        let sink = log.clone();
        event.connect_fn(move |(n, _)| sink.borrow_mut().push(format!("b{n}")));

        event.emit((1, String::from("x")));
        assert!(event.disconnect(first));
        assert!(!event.disconnect(first));
        event.emit((2, String::new()));

        assert_eq!(*log.borrow(), ["a1x", "b1", "b2"]);
    }

    #[test]
    fn rejects_mismatched_handlers() {
        let mut event = Event::<(bool,)>::new();
        assert!(!event.connect(DynEventHandler::from_fn(|(_,): (f32,)| {})));
        assert!(event.connect(DynEventHandler::from_fn(|(_,): (bool,)| {})));
        assert_eq!(event.len(), 1);
    }
}
