use alloc::rc::{Rc, Weak};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{BorrowError, BorrowMutError, Cell, Ref, RefCell, RefMut};
use core::fmt;

use crate::class::Class;
use crate::event::{DynEventHandler, Event, EventStorage, HandlerId};
use crate::func::DynParams;
use crate::member::EventHandlerDesc;
use crate::object::{Object, ObjectExt, SIGNAL_DESTROYED};

// -----------------------------------------------------------------------------
// ObjectRef

struct Shared {
    destroyed: RefCell<Event<()>>,
    detached: Cell<bool>,
}

/// Outcome of [`ObjectRef::soft_release`].
pub enum SoftRelease<T: ?Sized> {
    /// Other handles remain; the value is the remaining count.
    Shared(u32),
    /// This was the last handle. The object was not destroyed and its
    /// destruction handlers were dropped without running.
    Detached(Rc<RefCell<T>>),
}

/// A shared handle on a reflected object.
///
/// A new handle counts one reference. Cloning adds one, dropping removes one,
/// and dropping the last handle destroys the object after emitting
/// `SignalDestroyed` to the handlers connected at that moment.
///
/// Handles are single-threaded. Mutable access is checked at runtime like a
/// [`RefCell`].
///
/// ```
/// use std::{cell::Cell, rc::Rc};
/// use lumen_rtti::prelude::*;
///
/// #[derive(Object, Default)]
/// #[class(name = "Node", namespace = "doc")]
/// struct Node {}
///
/// let gone = Rc::new(Cell::new(false));
/// let flag = gone.clone();
///
/// let node = ObjectRef::new(Node::default());
/// node.on_destroyed(move || flag.set(true));
///
/// let second = node.clone();
/// assert_eq!(node.release(), 1);
/// assert!(!gone.get());
/// assert_eq!(second.release(), 0);
/// assert!(gone.get());
/// ```
pub struct ObjectRef<T: ?Sized + Object = dyn Object> {
    value: Rc<RefCell<T>>,
    shared: Rc<Shared>,
}

impl<T: Object> ObjectRef<T> {
    pub fn new(value: T) -> Self {
        Self::from_rc(Rc::new(RefCell::new(value)))
    }

    /// A type-erased handle on the same object.
    pub fn to_dyn(&self) -> ObjectRef<dyn Object> {
        let value: Rc<RefCell<dyn Object>> = self.value.clone();
        ObjectRef {
            value,
            shared: Rc::clone(&self.shared),
        }
    }

    /// Converts into a type-erased handle without changing the count.
    pub fn into_dyn(self) -> ObjectRef<dyn Object> {
        let handle = self.to_dyn();
        // Dropping `self` now leaves at least `handle`, so nothing is emitted.
        drop(self);
        handle
    }
}

impl<T: ?Sized + Object> ObjectRef<T> {
    /// Wraps an object detached by [`soft_release`](Self::soft_release).
    pub fn from_rc(value: Rc<RefCell<T>>) -> Self {
        Self {
            value,
            shared: Rc::new(Shared {
                destroyed: RefCell::new(Event::new()),
                detached: Cell::new(false),
            }),
        }
    }

    #[inline]
    pub fn add_reference(&self) -> Self {
        self.clone()
    }

    /// The number of live handles.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        u32::try_from(Rc::strong_count(&self.value)).unwrap_or(u32::MAX)
    }

    /// Drops this handle and returns the number of handles left.
    pub fn release(self) -> u32 {
        let left = self.ref_count() - 1;
        drop(self);
        left
    }

    /// Drops this handle without destroying the object when it is the last.
    pub fn soft_release(self) -> SoftRelease<T> {
        let left = self.ref_count() - 1;
        if left > 0 {
            drop(self);
            return SoftRelease::Shared(left);
        }
        self.shared.detached.set(true);
        SoftRelease::Detached(Rc::clone(&self.value))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.value.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.value.borrow_mut()
    }

    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.value.try_borrow()
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
        self.value.try_borrow_mut()
    }

    /// Returns `true` if both handles point to the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef<T>) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }

    /// A weak pointer to the object, which does not count as a handle.
    #[inline]
    pub fn downgrade(&self) -> Weak<RefCell<T>> {
        Rc::downgrade(&self.value)
    }

    /// Runs `callback` when the object is destroyed.
    pub fn on_destroyed(&self, callback: impl Fn() + 'static) -> HandlerId {
        self.shared.destroyed.borrow_mut().connect_fn(move |()| callback())
    }

    fn connect_destroyed(&self, handler: DynEventHandler) -> bool {
        self.shared.destroyed.borrow_mut().connect(handler)
    }
}

impl ObjectRef<dyn Object> {
    pub fn class(&self) -> Arc<Class> {
        self.value.borrow().class()
    }

    /// Borrows the object as `C`, or one of its embedded bases.
    pub fn borrow_as<C: Object>(&self) -> Option<Ref<'_, C>> {
        Ref::filter_map(self.value.borrow(), |object| object.downcast_ref::<C>()).ok()
    }

    pub fn borrow_as_mut<C: Object>(&self) -> Option<RefMut<'_, C>> {
        RefMut::filter_map(self.value.borrow_mut(), |object| object.downcast_mut::<C>()).ok()
    }

    /// A handler calling the named slot of this object.
    pub fn slot(&self, name: &str) -> Option<DynEventHandler> {
        let desc = self.class().slot(name)?;
        Some(desc.slot(self))
    }

    /// Handlers for every slot of this object, by slot name.
    pub fn slots(&self) -> Vec<(Arc<EventHandlerDesc>, DynEventHandler)> {
        self.class()
            .slots()
            .into_iter()
            .map(|desc| {
                let handler = desc.slot(self);
                (desc, handler)
            })
            .collect()
    }

    /// Connects a signal of this object to a slot of `target`.
    ///
    /// Returns `false` if either name is unknown or the parameters differ.
    pub fn connect(&self, signal: &str, target: &ObjectRef<dyn Object>, slot: &str) -> bool {
        let Some(handler) = target.slot(slot) else {
            log::warn!("`{}` has no slot `{slot}`", target.class().name());
            return false;
        };
        self.connect_handler(signal, handler)
    }

    /// Connects any handler to a signal of this object.
    pub fn connect_handler(&self, signal: &str, handler: DynEventHandler) -> bool {
        if signal == SIGNAL_DESTROYED {
            return self.connect_destroyed(handler);
        }
        let mut object = self.value.borrow_mut();
        match object.signal(signal) {
            Some(mut event) => event.connect(handler),
            None => {
                log::warn!("`{}` has no signal `{signal}`", object.class().name());
                false
            }
        }
    }

    pub fn disconnect(&self, signal: &str, id: HandlerId) -> bool {
        if signal == SIGNAL_DESTROYED {
            return self.shared.destroyed.borrow_mut().disconnect(id);
        }
        let mut object = self.value.borrow_mut();
        object.signal(signal).is_some_and(|mut event| event.disconnect(id))
    }

    /// Emits a signal of this object.
    ///
    /// The object is not borrowed while the handlers run, so they may use it,
    /// including through slots of the object itself.
    pub fn emit_signal(&self, signal: &str, params: &mut DynParams) -> bool {
        let handlers = if signal == SIGNAL_DESTROYED {
            self.shared.destroyed.borrow().handlers().to_vec()
        } else {
            let object = self.value.borrow();
            let Some(desc) = object.class().signal(signal) else {
                return false;
            };
            if !params.matches(desc.param_types()) {
                log::warn!(
                    "signal `{signal}` expects `{}`, got `{}`",
                    desc.signature(),
                    params.signature()
                );
                return false;
            }
            object.signal_handlers(signal).unwrap_or_default()
        };
        invoke_all(&handlers, params);
        true
    }
}

fn invoke_all(handlers: &[DynEventHandler], params: &mut DynParams) {
    for handler in handlers {
        handler.invoke(params);
    }
}

impl<T: ?Sized + Object> Clone for ObjectRef<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: ?Sized + Object> Drop for ObjectRef<T> {
    fn drop(&mut self) {
        if Rc::strong_count(&self.value) != 1 || self.shared.detached.get() {
            return;
        }
        let handlers: Vec<DynEventHandler> = self.shared.destroyed.borrow().handlers().to_vec();
        if handlers.is_empty() {
            return;
        }
        let mut params = DynParams::with_args::<(), ()>(());
        invoke_all(&handlers, &mut params);
    }
}

impl<T: ?Sized + Object> fmt::Debug for ObjectRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ObjectRef");
        match self.value.try_borrow() {
            Ok(object) => out.field("class", &object.class().name()),
            Err(_) => out.field("class", &"<borrowed>"),
        };
        out.field("refs", &self.ref_count()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use core::cell::{Cell, RefCell};

    use super::{ObjectRef, SoftRelease};
    use crate::event::Event;
    use crate::func::DynParams;
    use crate::member::EventHandlerDesc;
    use crate::object::{ObjectExt, SIGNAL_DESTROYED};
    use crate::prelude::*;

    #[derive(Object, Default)]
    #[class(name = "Emitter", namespace = "test_ref", members = Self::members)]
    struct Emitter {
        #[attribute]
        level: i32,
        #[signal(name = "SignalLevel")]
        changed: Event<(i32,)>,
    }

    impl Emitter {
        fn members(builder: ClassBuilder) -> ClassBuilder {
            builder.slot(EventHandlerDesc::new("OnLevel", |this: &mut Emitter, (level,): (i32,)| {
                this.level = level;
            }))
        }
    }

    #[test]
    fn counts_references() {
        let object = ObjectRef::new(Emitter::default());
        assert_eq!(object.ref_count(), 1);
        let other = object.add_reference();
        assert_eq!(object.ref_count(), 2);
        assert!(object.ptr_eq(&other));
        assert_eq!(other.release(), 1);
        assert_eq!(object.release(), 0);
    }

    #[test]
    fn soft_release_keeps_the_object() {
        let hits = Rc::new(Cell::new(0));
        let object = ObjectRef::new(Emitter { level: 7, ..Default::default() });
        let sink = hits.clone();
        object.on_destroyed(move || sink.set(sink.get() + 1));

        let other = object.clone();
        assert!(matches!(object.soft_release(), SoftRelease::Shared(1)));

        let SoftRelease::Detached(value) = other.soft_release() else {
            panic!("expected the last handle to detach");
        };
        assert_eq!(hits.get(), 0);
        assert_eq!(value.borrow().level, 7);

        // a fresh handle owns the object again
        let adopted = ObjectRef::from_rc(value);
        assert_eq!(adopted.ref_count(), 1);
        drop(adopted);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn signal_to_slot_across_objects() {
        let source = ObjectRef::new(Emitter::default()).into_dyn();
        let target = ObjectRef::new(Emitter::default()).into_dyn();
        assert!(source.connect("SignalLevel", &target, "OnLevel"));
        assert!(!source.connect("SignalLevel", &target, "Missing"));
        assert!(!source.connect("Missing", &target, "OnLevel"));
        assert_eq!(target.slots().len(), 1);

        let mut params = DynParams::with_args::<(), _>((42,));
        assert!(source.emit_signal("SignalLevel", &mut params));
        assert_eq!(target.borrow_as::<Emitter>().unwrap().level, 42);

        // the typed field fires the same handlers
        source.borrow().downcast_ref::<Emitter>().unwrap().changed.emit((5,));
        assert_eq!(target.borrow_as::<Emitter>().unwrap().level, 5);
    }

    #[test]
    fn slot_on_the_emitting_object() {
        let object = ObjectRef::new(Emitter::default()).into_dyn();
        assert!(object.connect("SignalLevel", &object, "OnLevel"));
        let mut params = DynParams::with_args::<(), _>((3,));
        assert!(object.emit_signal("SignalLevel", &mut params));
        assert_eq!(object.borrow_as::<Emitter>().unwrap().level, 3);
    }

    #[test]
    fn handlers_of_dropped_targets_are_skipped() {
        let source = ObjectRef::new(Emitter::default()).into_dyn();
        let target = ObjectRef::new(Emitter::default()).into_dyn();
        assert!(source.connect("SignalLevel", &target, "OnLevel"));
        drop(target);
        let mut params = DynParams::with_args::<(), _>((1,));
        assert!(source.emit_signal("SignalLevel", &mut params));
    }

    #[test]
    fn destruction_notifies_connected_handlers() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let object = ObjectRef::new(Emitter::default()).into_dyn();

        let sink = log.clone();
        let handler = crate::event::DynEventHandler::from_fn(move |()| {
            sink.borrow_mut().push(String::from("destroyed"))
        });
        let id = handler.id();
        assert!(object.connect_handler(SIGNAL_DESTROYED, handler));
        assert!(object.disconnect(SIGNAL_DESTROYED, id));

        let sink = log.clone();
        object.on_destroyed(move || sink.borrow_mut().push(String::from("closure")));
        assert!(object.class().signal(SIGNAL_DESTROYED).is_some());

        let copy = object.clone();
        drop(object);
        assert!(log.borrow().is_empty());
        drop(copy);
        assert_eq!(*log.borrow(), ["closure"]);
    }

    #[test]
    fn signals_by_name() {
        let mut emitter = Emitter::default();
        let hits = Rc::new(Cell::new(0));
        let sink = hits.clone();
        emitter
            .signal("SignalLevel")
            .unwrap()
            .connect(crate::event::DynEventHandler::from_fn(move |(v,): (i32,)| sink.set(v)));
        emitter.signal("SignalLevel").unwrap().emit_str("Param0='9'");
        assert_eq!(hits.get(), 9);
        assert!(emitter.signal("Nope").is_none());
        assert_eq!(emitter.signal_handlers("SignalLevel").map(|h| h.len()), Some(1));
    }
}
