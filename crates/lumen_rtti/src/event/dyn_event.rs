use alloc::sync::Arc;
use core::fmt;

use crate::event::{DynEventHandler, EventStorage, HandlerId};
use crate::func::DynParams;
use crate::member::EventDesc;

/// One signal of one object, found by name through
/// [`ObjectExt::signal`](crate::object::ObjectExt::signal).
pub struct DynEvent<'a> {
    desc: Arc<EventDesc>,
    storage: &'a mut dyn EventStorage,
}

impl<'a> DynEvent<'a> {
    #[inline]
    pub fn new(desc: Arc<EventDesc>, storage: &'a mut dyn EventStorage) -> Self {
        Self { desc, storage }
    }

    #[inline]
    pub fn desc(&self) -> &EventDesc {
        &self.desc
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    #[inline]
    pub fn connect(&mut self, handler: DynEventHandler) -> bool {
        self.storage.connect(handler)
    }

    #[inline]
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        self.storage.disconnect(id)
    }

    #[inline]
    pub fn disconnect_all(&mut self) {
        self.storage.disconnect_all();
    }

    #[inline]
    pub fn handlers(&self) -> &[DynEventHandler] {
        self.storage.handlers()
    }

    /// Emits with prepared arguments. Returns `false` on a type mismatch.
    pub fn emit(&self, params: &mut DynParams) -> bool {
        if !params.matches(self.desc.param_types()) {
            log::warn!(
                "signal `{}` expects `{}`, got `{}`",
                self.desc.name(),
                self.desc.signature(),
                params.signature()
            );
            return false;
        }
        self.storage.emit_dyn(params);
        true
    }

    /// Emits with arguments read from a `Name='Value'` token string.
    pub fn emit_str(&self, text: &str) {
        let mut params = self.desc.new_params();
        params.set_from_str(text, &self.desc.param_names());
        self.storage.emit_dyn(&mut params);
    }
}

impl fmt::Debug for DynEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynEvent")
            .field("name", &self.name())
            .field("handlers", &self.storage.handlers().len())
            .finish()
    }
}
