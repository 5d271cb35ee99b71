use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::class::Class;
use crate::class::info::DummyFlags;
use crate::member::{ConstructorDesc, EventDesc, EventHandlerDesc, MethodDesc, VarDesc};
use crate::object::{OBJECT_CLASS, Object};

/// Assembles a [`Class`].
///
/// Classes derive from `lumen::Object` unless told otherwise. Adding a
/// member with the name of an earlier member of the same kind replaces it.
///
/// ```
/// use lumen_rtti::class::ClassBuilder;
///
/// let class = ClassBuilder::new("Mesh")
///     .namespace("demo")
///     .description("Triangle mesh")
///     .property("Icon", "mesh.png")
///     .build();
/// assert_eq!(class.name(), "demo::Mesh");
/// assert_eq!(class.base_class_name(), Some("lumen::Object"));
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    class: Class,
}

fn upsert<D>(owner: &str, list: &mut Vec<Arc<D>>, desc: D, name: fn(&D) -> &str) {
    match list.iter_mut().find(|d| name(d) == name(&desc)) {
        Some(slot) => {
            log::warn!("`{owner}` declares member `{}` twice, the last one wins", name(&desc));
            *slot = Arc::new(desc);
        }
        None => list.push(Arc::new(desc)),
    }
}

impl ClassBuilder {
    pub fn new(class_name: impl Into<Cow<'static, str>>) -> Self {
        let mut class = Class::empty(class_name.into());
        class.base = Some(Cow::Borrowed(OBJECT_CLASS));
        Self { class }
    }

    /// Starts a class for the Rust type `T`.
    pub fn of<T: Object>(class_name: impl Into<Cow<'static, str>>) -> Self {
        let mut builder = Self::new(class_name);
        builder.class.type_id = Some(TypeId::of::<T>());
        builder
    }

    pub fn namespace(mut self, namespace: impl Into<Cow<'static, str>>) -> Self {
        self.class.namespace = namespace.into();
        self
    }

    /// Sets the qualified name of the base class.
    pub fn base(mut self, base: impl Into<Cow<'static, str>>) -> Self {
        self.class.base = Some(base.into());
        self
    }

    /// Makes this a class without base.
    pub fn root(mut self) -> Self {
        self.class.base = None;
        self
    }

    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.class.description = description.into();
        self
    }

    /// Adds a key/value property. A later value for the same key wins.
    pub fn property(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        let (key, value) = (key.into(), value.into());
        match self.class.properties.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.class.properties.push((key, value)),
        }
        self
    }

    pub fn attribute(mut self, desc: VarDesc) -> Self {
        upsert(&self.class.class_name, &mut self.class.attributes, desc, VarDesc::name);
        self
    }

    pub fn method(mut self, desc: MethodDesc) -> Self {
        upsert(&self.class.class_name, &mut self.class.methods, desc, MethodDesc::name);
        self
    }

    pub fn constructor(mut self, desc: ConstructorDesc) -> Self {
        upsert(&self.class.class_name, &mut self.class.constructors, desc, ConstructorDesc::name);
        self
    }

    pub fn signal(mut self, desc: EventDesc) -> Self {
        upsert(&self.class.class_name, &mut self.class.signals, desc, EventDesc::name);
        self
    }

    pub fn slot(mut self, desc: EventHandlerDesc) -> Self {
        upsert(&self.class.class_name, &mut self.class.slots, desc, EventHandlerDesc::name);
        self
    }

    /// Marks the class as a placeholder for a class of a plugin that is not
    /// loaded, with the constructor flags the plugin declared.
    pub fn dummy(mut self, has_constructor: bool, has_default_constructor: bool) -> Self {
        self.class.dummy = Some(DummyFlags {
            has_constructor,
            has_default_constructor,
        });
        self
    }

    pub fn build(mut self) -> Class {
        self.class.name = if self.class.namespace.is_empty() {
            String::from(&*self.class.class_name)
        } else {
            format!("{}::{}", self.class.namespace, self.class.class_name)
        };
        self.class
    }
}
