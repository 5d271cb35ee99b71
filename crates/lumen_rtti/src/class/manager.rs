use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lumen_utils::TypeIdMap;
use lumen_utils::hash::HashMap;

use crate::class::{Class, Module, ObjectClass};
use crate::object::root_class;

// -----------------------------------------------------------------------------
// Filters

/// Whether [`ClassManager::get_classes`] follows the whole inheritance chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recursion {
    Recursive,
    NonRecursive,
}

/// Whether [`ClassManager::get_classes`] includes the base class itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseFilter {
    IncludeBase,
    NoBase,
}

/// Whether [`ClassManager::get_classes`] includes classes without constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbstractFilter {
    IncludeAbstract,
    NoAbstract,
}

// -----------------------------------------------------------------------------
// Listeners

/// A change of the registry, sent to subscribed listeners.
#[derive(Debug, Clone)]
pub enum ClassEvent {
    ModuleLoaded(Arc<Module>),
    ModuleUnloaded(Arc<Module>),
    ClassLoaded(Arc<Class>),
    ClassUnloaded(Arc<Class>),
}

/// Identifies a listener, used to unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&ClassEvent) + Send + Sync>;

// -----------------------------------------------------------------------------
// ClassManager

/// The id of the module holding the root class.
pub const CORE_MODULE_ID: u32 = 1;

/// Module ids handed out by [`ClassManager::unique_module_id`] start here.
const FIRST_UNIQUE_MODULE_ID: u32 = 10_000;

#[derive(Default)]
struct Registry {
    modules: Vec<Arc<Module>>,
    /// Every class in registration order, including ones shadowed by name.
    classes: Vec<Arc<Class>>,
    by_name: HashMap<String, Arc<Class>>,
    by_type: TypeIdMap<Arc<Class>>,
    next_module_id: u32,
}

impl Registry {
    fn module(&self, id: u32) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.id == id)
    }

    fn put_module(&mut self, module: Module) -> Arc<Module> {
        let module = Arc::new(module);
        match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(slot) => *slot = Arc::clone(&module),
            None => self.modules.push(Arc::clone(&module)),
        }
        module
    }

    fn ensure_module(&mut self, id: u32) -> Arc<Module> {
        match self.module(id) {
            Some(module) => Arc::clone(module),
            None => self.put_module(Module::new(id)),
        }
    }

    fn unique_module_id(&mut self) -> u32 {
        while self.module(self.next_module_id).is_some() {
            self.next_module_id += 1;
        }
        let id = self.next_module_id;
        self.next_module_id += 1;
        id
    }
}

/// The process-wide registry of modules and classes.
///
/// Lookups never fail hard: unknown names give `None`. Registering is
/// idempotent, and a class may be registered before its base class.
///
/// ```
/// use lumen_rtti::class::{AbstractFilter, BaseFilter, ClassManager, Recursion};
///
/// let manager = ClassManager::get();
/// assert!(manager.class("NoSuchClass").is_none());
///
/// let root = manager.class("lumen::Object").unwrap();
/// assert!(root.base_class_name().is_none());
///
/// let mut out = Vec::new();
/// manager.get_classes(&mut out, "lumen::Object", Recursion::Recursive,
///     BaseFilter::IncludeBase, AbstractFilter::IncludeAbstract, 0);
/// assert!(out.iter().any(|c| c.name() == "lumen::Object"));
/// ```
pub struct ClassManager {
    registry: RwLock<Registry>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    generation: AtomicU64,
}

impl ClassManager {
    /// The global registry, created on first use.
    pub fn get() -> &'static ClassManager {
        static MANAGER: LazyLock<ClassManager> = LazyLock::new(ClassManager::init);
        &MANAGER
    }

    fn init() -> Self {
        let manager = Self {
            registry: RwLock::new(Registry {
                next_module_id: FIRST_UNIQUE_MODULE_ID,
                ..Default::default()
            }),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            generation: AtomicU64::new(0),
        };
        manager.register_module(
            CORE_MODULE_ID,
            "lumen",
            "Lumen",
            "MIT OR Apache-2.0",
            "Core runtime type information",
        );
        manager.register_class(CORE_MODULE_ID, root_class());
        manager.auto_register();
        manager
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes whenever a class is registered or unregistered.
    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn changed(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    // -------------------------------------------------------------------------
    // Modules

    /// Creates or updates a module and announces it.
    pub fn register_module(
        &self,
        id: u32,
        name: &str,
        vendor: &str,
        license: &str,
        description: &str,
    ) -> Arc<Module> {
        let module = {
            let mut registry = self.write();
            let mut module = match registry.module(id) {
                Some(module) => Module::clone(module),
                None => Module::new(id),
            };
            module.name = String::from(name);
            module.vendor = String::from(vendor);
            module.license = String::from(license);
            module.description = String::from(description);
            registry.put_module(module)
        };
        log::debug!("module {id} `{name}` registered");
        self.notify(&ClassEvent::ModuleLoaded(Arc::clone(&module)));
        module
    }

    pub(super) fn register_plugin_module(&self, mut module: Module) -> Arc<Module> {
        let module = {
            let mut registry = self.write();
            module.id = registry.unique_module_id();
            registry.put_module(module)
        };
        self.notify(&ClassEvent::ModuleLoaded(Arc::clone(&module)));
        module
    }

    /// Returns the module with this id, creating an empty one if needed.
    pub fn create_module(&self, id: u32) -> Arc<Module> {
        self.write().ensure_module(id)
    }

    /// An id no module uses yet.
    pub fn unique_module_id(&self) -> u32 {
        self.write().unique_module_id()
    }

    /// The id of the module called `name`, registering it if needed.
    pub fn module_id_for(&self, name: &str) -> u32 {
        let module = {
            let mut registry = self.write();
            if let Some(module) = registry.modules.iter().find(|m| m.name == name) {
                return module.id;
            }
            let mut module = Module::new(registry.unique_module_id());
            module.name = String::from(name);
            registry.put_module(module)
        };
        log::debug!("module {} `{name}` registered", module.id);
        self.notify(&ClassEvent::ModuleLoaded(Arc::clone(&module)));
        module.id
    }

    pub fn module(&self, id: u32) -> Option<Arc<Module>> {
        self.read().module(id).cloned()
    }

    pub fn module_by_name(&self, name: &str) -> Option<Arc<Module>> {
        self.read().modules.iter().find(|m| m.name == name).cloned()
    }

    pub fn modules(&self) -> Vec<Arc<Module>> {
        self.read().modules.clone()
    }

    /// The classes of one module, in registration order.
    pub fn module_classes(&self, id: u32) -> Vec<Arc<Class>> {
        self.read()
            .classes
            .iter()
            .filter(|c| c.module_id == id)
            .cloned()
            .collect()
    }

    /// Unregisters the classes of a module, newest first, then the module.
    pub fn unregister_module(&self, id: u32) -> bool {
        let Some(module) = self.module(id) else {
            return false;
        };
        for class in self.module_classes(id).iter().rev() {
            self.unregister_class(id, class);
        }
        self.write().modules.retain(|m| m.id != id);
        log::debug!("module {id} `{}` unregistered", module.name);
        self.notify(&ClassEvent::ModuleUnloaded(module));
        true
    }

    // -------------------------------------------------------------------------
    // Classes

    /// Registers a class in a module.
    ///
    /// - Registering the same class twice returns the first registration.
    /// - A real class replaces a dummy of the same name.
    /// - A dummy for a name that is already taken is ignored.
    /// - A second real class with a taken name is listed, but lookups by
    ///   name keep finding the first.
    pub fn register_class(&self, module_id: u32, mut class: Class) -> Arc<Class> {
        class.module_id = module_id;
        let class = {
            let mut registry = self.write();
            registry.ensure_module(module_id);
            let old = registry.by_name.get(class.name()).cloned();
            match old {
                Some(old) if class.is_dummy() => return old,
                Some(old) if Self::same_class(&old, &class) => return old,
                Some(old) if old.is_dummy() => {
                    let class = Arc::new(class);
                    match registry.classes.iter_mut().find(|c| Arc::ptr_eq(c, &old)) {
                        Some(slot) => *slot = Arc::clone(&class),
                        None => registry.classes.push(Arc::clone(&class)),
                    }
                    registry.by_name.insert(String::from(class.name()), Arc::clone(&class));
                    Self::index_type(&mut registry, &class);
                    class
                }
                Some(old) => {
                    log::warn!(
                        "class `{}` in module {module_id} conflicts with the one in module {}",
                        class.name(),
                        old.module_id
                    );
                    let class = Arc::new(class);
                    registry.classes.push(Arc::clone(&class));
                    Self::index_type(&mut registry, &class);
                    class
                }
                None => {
                    let class = Arc::new(class);
                    registry.classes.push(Arc::clone(&class));
                    registry.by_name.insert(String::from(class.name()), Arc::clone(&class));
                    Self::index_type(&mut registry, &class);
                    class
                }
            }
        };
        self.changed();
        log::debug!("class `{}` registered in module {module_id}", class.name());
        self.notify(&ClassEvent::ClassLoaded(Arc::clone(&class)));
        class
    }

    fn same_class(old: &Class, new: &Class) -> bool {
        match (old.type_id(), new.type_id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => old.module_id == new.module_id && !old.is_dummy(),
            _ => false,
        }
    }

    fn index_type(registry: &mut Registry, class: &Arc<Class>) {
        if let Some(type_id) = class.type_id()
            && !registry.by_type.contains(&type_id)
        {
            registry.by_type.insert(type_id, Arc::clone(class));
        }
    }

    /// Registers the class of `T` once and returns it.
    pub fn register<T: ObjectClass>(&self) -> Arc<Class> {
        if let Some(class) = self.read().by_type.get_type::<T>() {
            return Arc::clone(class);
        }
        T::register_dependencies(self);
        let module_id = self.module_id_for(T::MODULE_NAME);
        self.register_class(module_id, T::create_class())
    }

    /// The class of `T`, registered on first use.
    #[inline]
    pub fn class_of<T: ObjectClass>(&self) -> Arc<Class> {
        self.register::<T>()
    }

    /// Removes a class. Does nothing if it is not registered in that module.
    pub fn unregister_class(&self, module_id: u32, class: &Arc<Class>) -> bool {
        {
            let mut registry = self.write();
            if class.module_id != module_id {
                return false;
            }
            let Some(index) = registry.classes.iter().position(|c| Arc::ptr_eq(c, class)) else {
                return false;
            };
            registry.classes.remove(index);
            if registry
                .by_name
                .get(class.name())
                .is_some_and(|c| Arc::ptr_eq(c, class))
            {
                registry.by_name.remove(class.name());
            }
            if let Some(type_id) = class.type_id()
                && registry
                    .by_type
                    .get(&type_id)
                    .is_some_and(|c| Arc::ptr_eq(c, class))
            {
                registry.by_type.remove(&type_id);
            }
        }
        self.changed();
        log::debug!("class `{}` unregistered", class.name());
        self.notify(&ClassEvent::ClassUnloaded(Arc::clone(class)));
        true
    }

    /// Looks a class up by its qualified name.
    pub fn class(&self, name: &str) -> Option<Arc<Class>> {
        self.read().by_name.get(name).cloned()
    }

    /// Every registered class in registration order.
    pub fn classes(&self) -> Vec<Arc<Class>> {
        self.read().classes.clone()
    }

    /// Appends the classes derived from `base` to `out`.
    ///
    /// An empty `base` selects every class. `NonRecursive` keeps direct
    /// subclasses only. A non-zero `module_id` keeps classes of that module.
    /// `out` is not cleared first.
    pub fn get_classes(
        &self,
        out: &mut Vec<Arc<Class>>,
        base: &str,
        recursion: Recursion,
        base_filter: BaseFilter,
        abstract_filter: AbstractFilter,
        module_id: u32,
    ) {
        let classes = self.classes();
        out.extend(classes.into_iter().filter(|class| {
            let related = base.is_empty()
                || (class.name() == base && base_filter == BaseFilter::IncludeBase)
                || class.base_class_name() == Some(base)
                || (recursion == Recursion::Recursive
                    && class.name() != base
                    && class.is_derived_from(base));
            related
                && (abstract_filter == AbstractFilter::IncludeAbstract || class.has_constructor())
                && (module_id == 0 || class.module_id() == module_id)
        }));
    }

    /// Runs the registrations submitted with `#[class(auto_register)]`.
    ///
    /// Returns `false` when the `auto_register` feature is disabled.
    pub fn auto_register(&self) -> bool {
        crate::cfg::auto_register! {
            if {{
                crate::__macro_exports::auto_register::register_all(self);
                true
            }} else {
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Listeners

    /// Calls `listener` on every later registry change.
    pub fn subscribe(&self, listener: impl Fn(&ClassEvent) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let len = listeners.len();
        listeners.retain(|(listener, _)| *listener != id);
        listeners.len() != len
    }

    fn notify(&self, event: &ClassEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use super::{AbstractFilter, BaseFilter, ClassEvent, ClassManager, Recursion};
    use crate::class::{Class, ClassBuilder};
    use crate::prelude::Object;

    #[derive(Object, Default)]
    #[class(name = "Registered", namespace = "test_manager")]
    struct Registered {}

    #[derive(Object, Default)]
    #[class(name = "Submitted", namespace = "test_auto", auto_register)]
    struct Submitted {}

    #[derive(Object, Default)]
    #[class(name = "Manual", namespace = "test_auto")]
    struct Manual {}

    crate::derive::impl_auto_register!(Manual);

    fn names(classes: &[Arc<Class>]) -> Vec<&str> {
        classes.iter().map(|c| c.name()).collect()
    }

    #[test]
    #[cfg(feature = "auto_register")]
    fn submitted_classes_are_registered_up_front() {
        let manager = ClassManager::get();
        let submitted = manager.class("test_auto::Submitted").unwrap();
        let manual = manager.class("test_auto::Manual").unwrap();
        assert_eq!(submitted.module_id(), manager.module_id_for("lumen_rtti"));
        assert!(!submitted.is_dummy());

        assert!(manager.auto_register());
        assert!(Arc::ptr_eq(&submitted, &manager.class("test_auto::Submitted").unwrap()));
        assert!(Arc::ptr_eq(&manual, &manager.class_of::<Manual>()));
        assert!(Arc::ptr_eq(&submitted, &manager.class_of::<Submitted>()));
    }

    #[test]
    fn get_classes_filters() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        for (name, base, constructible) in [
            ("Foo", "lumen::Object", false),
            ("Bar", "test_filter::Foo", false),
            ("Baz", "test_filter::Bar", true),
        ] {
            let mut builder = ClassBuilder::new(name).namespace("test_filter").base(base);
            if constructible {
                builder = builder.dummy(true, true);
            }
            manager.register_class(module, builder.build());
        }

        let query = |recursion, base_filter, abstract_filter| {
            let mut out = Vec::new();
            manager.get_classes(
                &mut out,
                "test_filter::Foo",
                recursion,
                base_filter,
                abstract_filter,
                module,
            );
            out
        };

        let direct = query(Recursion::NonRecursive, BaseFilter::NoBase, AbstractFilter::IncludeAbstract);
        assert_eq!(names(&direct), ["test_filter::Bar"]);

        let all = query(Recursion::Recursive, BaseFilter::NoBase, AbstractFilter::IncludeAbstract);
        assert_eq!(names(&all), ["test_filter::Bar", "test_filter::Baz"]);

        let with_base = query(Recursion::Recursive, BaseFilter::IncludeBase, AbstractFilter::IncludeAbstract);
        assert_eq!(names(&with_base), ["test_filter::Foo", "test_filter::Bar", "test_filter::Baz"]);

        let concrete = query(Recursion::Recursive, BaseFilter::IncludeBase, AbstractFilter::NoAbstract);
        assert_eq!(names(&concrete), ["test_filter::Baz"]);

        let mut everything = Vec::new();
        manager.get_classes(
            &mut everything,
            "",
            Recursion::Recursive,
            BaseFilter::IncludeBase,
            AbstractFilter::IncludeAbstract,
            module,
        );
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn typed_classes_register_once() {
        let manager = ClassManager::get();
        let first = manager.register::<Registered>();
        let second = manager.class_of::<Registered>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "test_manager::Registered");
        assert!(Arc::ptr_eq(&manager.class("test_manager::Registered").unwrap(), &first));

        let module = manager.module(first.module_id()).unwrap();
        assert_eq!(module.name(), "lumen_rtti");
        assert!(!first.is_dummy());
    }

    #[test]
    fn real_class_replaces_dummy() {
        let manager = ClassManager::get();
        let plugin = manager.unique_module_id();
        let dummy = manager.register_class(
            plugin,
            ClassBuilder::new("Widget")
                .namespace("test_replace")
                .dummy(true, false)
                .build(),
        );
        assert!(dummy.is_dummy());

        let native = manager.unique_module_id();
        let real = manager.register_class(
            native,
            ClassBuilder::new("Widget").namespace("test_replace").build(),
        );
        assert!(!real.is_dummy());
        assert_eq!(real.module_id(), native);
        assert!(Arc::ptr_eq(&manager.class("test_replace::Widget").unwrap(), &real));

        let listed = manager
            .classes()
            .into_iter()
            .filter(|c| c.name() == "test_replace::Widget")
            .count();
        assert_eq!(listed, 1);

        // a late dummy does not hide the real class
        let again = manager.register_class(
            plugin,
            ClassBuilder::new("Widget")
                .namespace("test_replace")
                .dummy(false, false)
                .build(),
        );
        assert!(Arc::ptr_eq(&again, &real));
    }

    #[test]
    fn first_real_class_keeps_its_name() {
        let manager = ClassManager::get();
        let first = manager.register_class(
            manager.unique_module_id(),
            ClassBuilder::new("Twice").namespace("test_conflict").build(),
        );
        let second = manager.register_class(
            manager.unique_module_id(),
            ClassBuilder::new("Twice").namespace("test_conflict").build(),
        );
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&manager.class("test_conflict::Twice").unwrap(), &first));
        assert!(!manager.unregister_class(first.module_id() + 1_000_000, &first));
    }

    #[test]
    fn unloading_a_module_notifies_listeners() {
        let manager = ClassManager::get();
        let module = manager.unique_module_id();
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let sink = Arc::clone(&log);
        let listener = manager.subscribe(move |event| {
            let line = match event {
                ClassEvent::ModuleLoaded(m) if m.id() == module => format!("+module {}", m.name()),
                ClassEvent::ModuleUnloaded(m) if m.id() == module => format!("-module {}", m.name()),
                ClassEvent::ClassLoaded(c) if c.module_id() == module => format!("+{}", c.name()),
                ClassEvent::ClassUnloaded(c) if c.module_id() == module => format!("-{}", c.name()),
                _ => return,
            };
            sink.lock().unwrap().push(line);
        });

        manager.register_module(module, "listened", "", "", "");
        for name in ["A", "B"] {
            manager.register_class(module, ClassBuilder::new(name).namespace("test_listen").build());
        }
        assert!(manager.unregister_module(module));
        assert!(manager.unsubscribe(listener));
        assert!(!manager.unsubscribe(listener));

        assert_eq!(
            *log.lock().unwrap(),
            [
                "+module listened",
                "+test_listen::A",
                "+test_listen::B",
                "-test_listen::B",
                "-test_listen::A",
                "-module listened",
            ]
        );
        assert!(manager.class("test_listen::A").is_none());
        assert!(manager.module(module).is_none());
        assert!(!manager.unregister_module(module));
    }

    #[test]
    fn module_ids_are_unique() {
        let manager = ClassManager::get();
        let a = manager.unique_module_id();
        let b = manager.unique_module_id();
        assert_ne!(a, b);
        assert_eq!(manager.module_id_for("test_module_by_name"), manager.module_id_for("test_module_by_name"));
        assert!(manager.module(super::CORE_MODULE_ID).is_some());
    }
}
