use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::ptr;
use std::sync::{PoisonError, RwLock};

use crate::class::{ClassManager, Module};
use crate::func::DynParams;
use crate::member::{ConstructorDesc, EventDesc, EventHandlerDesc, MethodDesc, VarDesc};
use crate::object::{Object, ObjectRef};

// -----------------------------------------------------------------------------
// Resolved

/// The members of a class merged with those of its bases.
struct Resolved {
    generation: u64,
    base: Option<Arc<Class>>,
    attributes: Vec<Arc<VarDesc>>,
    methods: Vec<Arc<MethodDesc>>,
    signals: Vec<Arc<EventDesc>>,
    slots: Vec<Arc<EventHandlerDesc>>,
    properties: Vec<(Cow<'static, str>, Cow<'static, str>)>,
    /// `false` while a base in the chain is not registered yet.
    complete: bool,
}

/// Own members first, then base members not shadowed by name.
fn merge<D>(own: &[Arc<D>], base: Option<&[Arc<D>]>, name: fn(&D) -> &str) -> Vec<Arc<D>> {
    let mut out = own.to_vec();
    if let Some(base) = base {
        out.extend(
            base.iter()
                .filter(|b| !own.iter().any(|o| name(o) == name(b)))
                .cloned(),
        );
    }
    out
}

// -----------------------------------------------------------------------------
// Class

#[derive(Debug, Clone, Copy)]
pub(super) struct DummyFlags {
    pub has_constructor: bool,
    pub has_default_constructor: bool,
}

/// Runtime metadata of one class.
///
/// Member lists include inherited members. The base class is looked up by
/// name on first use, so a class may be registered before its base; until
/// the base shows up the class answers with its own members only.
pub struct Class {
    pub(super) module_id: u32,
    pub(super) name: String,
    pub(super) class_name: Cow<'static, str>,
    pub(super) namespace: Cow<'static, str>,
    pub(super) base: Option<Cow<'static, str>>,
    pub(super) description: Cow<'static, str>,
    pub(super) type_id: Option<TypeId>,
    pub(super) dummy: Option<DummyFlags>,
    pub(super) properties: Vec<(Cow<'static, str>, Cow<'static, str>)>,
    pub(super) attributes: Vec<Arc<VarDesc>>,
    pub(super) methods: Vec<Arc<MethodDesc>>,
    pub(super) constructors: Vec<Arc<ConstructorDesc>>,
    pub(super) signals: Vec<Arc<EventDesc>>,
    pub(super) slots: Vec<Arc<EventHandlerDesc>>,
    resolved: RwLock<Option<Arc<Resolved>>>,
}

impl Class {
    pub(super) fn empty(class_name: Cow<'static, str>) -> Self {
        Self {
            module_id: 0,
            name: String::new(),
            class_name,
            namespace: Cow::Borrowed(""),
            base: None,
            description: Cow::Borrowed(""),
            type_id: None,
            dummy: None,
            properties: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            signals: Vec::new(),
            slots: Vec::new(),
            resolved: RwLock::new(None),
        }
    }

    /// The qualified name, `namespace::ClassName`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name without namespace.
    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[inline]
    pub fn base_class_name(&self) -> Option<&str> {
        self.base.as_deref()
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn module_id(&self) -> u32 {
        self.module_id
    }

    pub fn module(&self) -> Option<Arc<Module>> {
        ClassManager::get().module(self.module_id)
    }

    /// Returns `true` for placeholders created from plugin descriptors.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }

    /// The Rust type behind the class, if it has one.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    pub fn base_class(&self) -> Option<Arc<Class>> {
        self.resolved().base.clone()
    }

    /// Returns `true` if this class is `name` or inherits from it.
    ///
    /// Bases are matched by name, so this also answers for bases that are
    /// not registered yet.
    pub fn is_derived_from(&self, name: &str) -> bool {
        if self.name == name {
            return true;
        }
        let manager = ClassManager::get();
        let mut visited: Vec<Arc<Class>> = Vec::new();
        let mut next = self.base.clone();
        while let Some(base_name) = next {
            if base_name == name {
                return true;
            }
            match manager.class(&base_name) {
                Some(base) if !visited.iter().any(|c| Arc::ptr_eq(c, &base)) && !ptr::eq(&*base, self) => {
                    next = base.base.clone();
                    visited.push(base);
                }
                _ => return false,
            }
        }
        false
    }

    #[inline]
    pub fn is_derived_from_class(&self, class: &Class) -> bool {
        self.is_derived_from(class.name())
    }

    // -------------------------------------------------------------------------
    // Members

    pub fn attributes(&self) -> Vec<Arc<VarDesc>> {
        self.resolved().attributes.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<Arc<VarDesc>> {
        self.resolved().attributes.iter().find(|d| d.name() == name).cloned()
    }

    pub fn methods(&self) -> Vec<Arc<MethodDesc>> {
        self.resolved().methods.clone()
    }

    pub fn method(&self, name: &str) -> Option<Arc<MethodDesc>> {
        self.resolved().methods.iter().find(|d| d.name() == name).cloned()
    }

    /// The constructors of this class. Base constructors are not included.
    pub fn constructors(&self) -> Vec<Arc<ConstructorDesc>> {
        self.constructors.clone()
    }

    pub fn constructor(&self, name: &str) -> Option<Arc<ConstructorDesc>> {
        self.constructors.iter().find(|d| d.name() == name).cloned()
    }

    pub fn signals(&self) -> Vec<Arc<EventDesc>> {
        self.resolved().signals.clone()
    }

    pub fn signal(&self, name: &str) -> Option<Arc<EventDesc>> {
        self.resolved().signals.iter().find(|d| d.name() == name).cloned()
    }

    pub fn slots(&self) -> Vec<Arc<EventHandlerDesc>> {
        self.resolved().slots.clone()
    }

    pub fn slot(&self, name: &str) -> Option<Arc<EventHandlerDesc>> {
        self.resolved().slots.iter().find(|d| d.name() == name).cloned()
    }

    /// Key/value properties, base properties overridden by this class's.
    pub fn properties(&self) -> Vec<(Cow<'static, str>, Cow<'static, str>)> {
        self.resolved().properties.clone()
    }

    pub fn property(&self, key: &str) -> Option<Cow<'static, str>> {
        self.resolved()
            .properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    // -------------------------------------------------------------------------
    // Instances

    pub fn has_constructor(&self) -> bool {
        match self.dummy {
            Some(flags) => flags.has_constructor,
            None => !self.constructors.is_empty(),
        }
    }

    pub fn has_default_constructor(&self) -> bool {
        match self.dummy {
            Some(flags) => flags.has_default_constructor,
            None => self.constructors.iter().any(|c| c.is_default()),
        }
    }

    /// Creates an instance with the parameterless constructor.
    pub fn create(&self) -> Option<ObjectRef<dyn Object>> {
        self.warn_if_dummy()?;
        let constructor = self.constructors.iter().find(|c| c.is_default())?;
        constructor.create(&constructor.new_params())
    }

    /// Creates an instance with the first constructor taking these arguments.
    pub fn create_with(&self, params: &DynParams) -> Option<ObjectRef<dyn Object>> {
        self.warn_if_dummy()?;
        self.constructors.iter().find_map(|c| c.create(params))
    }

    /// Creates an instance with a constructor chosen by name.
    pub fn create_named(&self, name: &str, params: &DynParams) -> Option<ObjectRef<dyn Object>> {
        self.warn_if_dummy()?;
        self.constructor(name)?.create(params)
    }

    /// Creates an instance with a named constructor and a `Name='Value'` string.
    pub fn create_from_str(&self, name: &str, params: &str) -> Option<ObjectRef<dyn Object>> {
        self.warn_if_dummy()?;
        Some(self.constructor(name)?.create_from_str(params))
    }

    fn warn_if_dummy(&self) -> Option<()> {
        if self.is_dummy() {
            log::warn!(
                "class `{}` is only described by a plugin and cannot be instantiated",
                self.name
            );
            return None;
        }
        Some(())
    }

    // -------------------------------------------------------------------------
    // Resolution

    fn resolved(&self) -> Arc<Resolved> {
        self.resolve(ClassManager::get(), &mut Vec::new())
    }

    fn cached(&self, generation: u64) -> Option<Arc<Resolved>> {
        let cache = self.resolved.read().unwrap_or_else(PoisonError::into_inner);
        cache.as_ref().filter(|r| r.generation == generation).cloned()
    }

    fn resolve(&self, manager: &ClassManager, visiting: &mut Vec<*const Class>) -> Arc<Resolved> {
        let generation = manager.generation();
        if let Some(cached) = self.cached(generation) {
            return cached;
        }

        visiting.push(self);
        let base = self.base.as_deref().and_then(|name| manager.class(name));
        let base_resolved = match &base {
            Some(base) if visiting.contains(&Arc::as_ptr(base)) => {
                log::warn!("class `{}` is part of an inheritance cycle", self.name);
                None
            }
            Some(base) => Some(base.resolve(manager, visiting)),
            None => {
                if let Some(name) = &self.base {
                    log::trace!("base `{name}` of `{}` is not registered yet", self.name);
                }
                None
            }
        };
        visiting.pop();

        let complete = match (&self.base, &base_resolved) {
            (None, _) => true,
            (Some(_), Some(base)) => base.complete,
            (Some(_), None) => false,
        };
        let inherited = base_resolved.as_deref();

        let mut properties = inherited.map(|b| b.properties.clone()).unwrap_or_default();
        for (key, value) in &self.properties {
            match properties.iter_mut().find(|(k, _)| k == key) {
                Some(slot) => slot.1 = value.clone(),
                None => properties.push((key.clone(), value.clone())),
            }
        }

        let resolved = Arc::new(Resolved {
            generation,
            base,
            attributes: merge(&self.attributes, inherited.map(|b| &b.attributes[..]), VarDesc::name),
            methods: merge(&self.methods, inherited.map(|b| &b.methods[..]), MethodDesc::name),
            signals: merge(&self.signals, inherited.map(|b| &b.signals[..]), EventDesc::name),
            slots: merge(&self.slots, inherited.map(|b| &b.slots[..]), EventHandlerDesc::name),
            properties,
            complete,
        });

        crate::cfg::debug! {
            log::trace!(
                "members of `{}` resolved at generation {generation}: {} attributes, {} methods, complete: {complete}",
                self.name,
                resolved.attributes.len(),
                resolved.methods.len(),
            );
        }

        if complete {
            let mut cache = self.resolved.write().unwrap_or_else(PoisonError::into_inner);
            *cache = Some(Arc::clone(&resolved));
        }
        resolved
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("module_id", &self.module_id)
            .field("dummy", &self.is_dummy())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use crate::member::{ConstructorDesc, VarDesc};
    use crate::prelude::*;

    #[derive(Object, Default)]
    #[class(name = "Sample", namespace = "test_info")]
    struct Sample {
        value: i32,
    }

    fn value(sample: &Sample) -> &i32 {
        &sample.value
    }

    fn value_mut(sample: &mut Sample) -> &mut i32 {
        &mut sample.value
    }

    fn int_attribute(name: &'static str) -> VarDesc {
        VarDesc::field::<Sample, i32>(name, value, value_mut)
    }

    fn names(class: &Class) -> Vec<String> {
        class.attributes().iter().map(|a| String::from(a.name())).collect()
    }

    #[test]
    fn own_members_shadow_inherited_ones() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        manager.register_class(
            module,
            ClassBuilder::new("Base")
                .namespace("test_shadow")
                .attribute(int_attribute("A"))
                .attribute(int_attribute("B"))
                .build(),
        );
        let derived = manager.register_class(
            module,
            ClassBuilder::new("Derived")
                .namespace("test_shadow")
                .base("test_shadow::Base")
                .attribute(int_attribute("B").with_description("own"))
                .attribute(int_attribute("C"))
                .build(),
        );

        assert_eq!(names(&derived), ["B", "C", "A"]);
        assert_eq!(derived.attribute("B").unwrap().description(), "own");
        assert!(derived.attribute("A").is_some());
    }

    #[test]
    fn derivation_is_reflexive_and_transitive() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let mut chain = Vec::new();
        for (name, base) in [
            ("Root", "lumen::Object"),
            ("Middle", "test_derive::Root"),
            ("Leaf", "test_derive::Middle"),
        ] {
            let class = ClassBuilder::new(name).namespace("test_derive").base(base).build();
            chain.push(manager.register_class(module, class));
        }
        let [root, middle, leaf] = &chain[..] else {
            unreachable!();
        };

        for class in &chain {
            assert!(class.is_derived_from(class.name()));
            assert!(class.is_derived_from_class(class));
            assert!(class.is_derived_from("lumen::Object"));
        }
        assert!(leaf.is_derived_from_class(middle));
        assert!(middle.is_derived_from_class(root));
        assert!(leaf.is_derived_from_class(root));
        assert!(!root.is_derived_from_class(leaf));
        assert!(!middle.is_derived_from("test_derive::Leaf"));
    }

    #[test]
    fn properties_are_overlaid() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        manager.register_class(
            module,
            ClassBuilder::new("Base")
                .namespace("test_props")
                .property("Icon", "base.png")
                .property("Kind", "Resource")
                .build(),
        );
        let derived = manager.register_class(
            module,
            ClassBuilder::new("Derived")
                .namespace("test_props")
                .base("test_props::Base")
                .property("Icon", "derived.png")
                .property("Editor", "None")
                .build(),
        );

        assert_eq!(derived.property("Icon").as_deref(), Some("derived.png"));
        assert_eq!(derived.property("Kind").as_deref(), Some("Resource"));
        let keys: Vec<_> = derived.properties().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Icon", "Kind", "Editor"]);
    }

    #[test]
    fn base_may_be_registered_later() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let derived = manager.register_class(
            module,
            ClassBuilder::new("Derived")
                .namespace("test_lazy")
                .base("test_lazy::Base")
                .attribute(int_attribute("B"))
                .build(),
        );
        assert!(derived.base_class().is_none());
        assert_eq!(derived.attributes().len(), 1);
        assert!(derived.is_derived_from("test_lazy::Base"));
        assert!(!derived.is_derived_from(crate::object::OBJECT_CLASS));

        let base = manager.register_class(
            module,
            ClassBuilder::new("Base")
                .namespace("test_lazy")
                .attribute(int_attribute("A"))
                .build(),
        );
        assert!(Arc::ptr_eq(&derived.base_class().unwrap(), &base));
        assert_eq!(names(&derived), ["B", "A"]);
        assert!(derived.is_derived_from(crate::object::OBJECT_CLASS));
    }

    #[test]
    fn inheritance_cycles_terminate() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let first = manager.register_class(
            module,
            ClassBuilder::new("First")
                .namespace("test_cycle")
                .base("test_cycle::Second")
                .attribute(int_attribute("A"))
                .build(),
        );
        manager.register_class(
            module,
            ClassBuilder::new("Second")
                .namespace("test_cycle")
                .base("test_cycle::First")
                .attribute(int_attribute("B"))
                .build(),
        );

        assert!(first.is_derived_from("test_cycle::Second"));
        assert!(!first.is_derived_from(crate::object::OBJECT_CLASS));
        assert_eq!(names(&first), ["A", "B"]);
    }

    #[test]
    fn constructors_are_not_inherited() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let base = manager.register_class(
            module,
            ClassBuilder::new("Base")
                .namespace("test_ctor")
                .constructor(ConstructorDesc::default_of::<Sample>())
                .build(),
        );
        let derived = manager.register_class(
            module,
            ClassBuilder::new("Derived")
                .namespace("test_ctor")
                .base("test_ctor::Base")
                .build(),
        );

        assert!(base.has_default_constructor());
        let object = base.create().unwrap();
        assert!(object.borrow().is::<Sample>());

        assert!(!derived.has_constructor());
        assert!(derived.constructors().is_empty());
        assert!(derived.create().is_none());
    }

    #[test]
    fn dummies_cannot_be_created() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let dummy = manager.register_class(
            module,
            ClassBuilder::new("Ghost")
                .namespace("test_dummy_create")
                .dummy(true, true)
                .build(),
        );
        assert!(dummy.is_dummy());
        assert!(dummy.has_default_constructor());
        assert!(dummy.create().is_none());
    }
}
