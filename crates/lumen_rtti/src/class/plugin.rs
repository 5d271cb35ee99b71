use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::path::{Path, PathBuf};
use std::{fs, io};

use thiserror::Error;

use crate::class::{ClassBuilder, ClassManager, Module, Recursion};
use crate::var::Var;
use crate::xml::{XmlElement, XmlError};

/// The file extension of plugin descriptors.
pub const PLUGIN_EXTENSION: &str = "plugin";

/// Errors raised while loading or unloading plugins.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PluginError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{0}` is not a `.plugin` file")]
    NotAPluginFile(PathBuf),
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("the document has no `Plugin` element")]
    MissingPluginElement,
    #[error("unknown plugin format version {0}")]
    UnknownVersion(i64),
    #[error("invalid plugin format version {0}")]
    InvalidVersion(i64),
    #[error("the plugin is inactive")]
    Inactive,
    #[error("`{0}` is not a directory")]
    NotADirectory(PathBuf),
    #[error("there is no module {0}")]
    UnknownModule(u32),
    #[error("module {0} is not a plugin")]
    NotAPluginModule(u32),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PluginError + '_ {
    move |source| PluginError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The library entry matching this build, `Debug` or `Release`.
fn library_of(plugin: &XmlElement, dir: &Path) -> Option<PathBuf> {
    let build = if cfg!(debug_assertions) { "Debug" } else { "Release" };
    plugin
        .elements()
        .filter(|e| e.name() == "Platform")
        .flat_map(XmlElement::elements)
        .filter(|e| e.name() == "Library")
        .find(|e| e.attribute("Type").is_none_or(|t| t == build))
        .map(|e| PathBuf::from(e.text().trim()))
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| if path.is_absolute() { path } else { dir.join(path) })
}

impl ClassManager {
    /// Loads every `.plugin` file in a directory and returns how many loaded.
    ///
    /// A plugin that fails to load is logged and skipped.
    pub fn scan_plugins(
        &self,
        path: impl AsRef<Path>,
        recursion: Recursion,
    ) -> Result<usize, PluginError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(PluginError::NotADirectory(path.to_path_buf()));
        }
        let mut entries: Vec<PathBuf> = fs::read_dir(path)
            .map_err(io_error(path))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        entries.sort();

        let mut loaded = 0;
        for entry in entries {
            if entry.extension().is_some_and(|ext| ext == PLUGIN_EXTENSION) {
                match self.load_plugin(&entry) {
                    Ok(_) => loaded += 1,
                    Err(PluginError::Inactive) => {}
                    Err(err) => log::error!("{}: {err}", entry.display()),
                }
            } else if recursion == Recursion::Recursive && entry.is_dir() {
                match self.scan_plugins(&entry, recursion) {
                    Ok(count) => loaded += count,
                    Err(err) => log::error!("{}: {err}", entry.display()),
                }
            }
        }
        Ok(loaded)
    }

    /// Loads a `.plugin` descriptor file.
    pub fn load_plugin(&self, file: impl AsRef<Path>) -> Result<Arc<Module>, PluginError> {
        let file = file.as_ref();
        if file.extension().is_none_or(|ext| ext != PLUGIN_EXTENSION) {
            return Err(PluginError::NotAPluginFile(file.to_path_buf()));
        }
        let text = fs::read_to_string(file).map_err(io_error(file))?;
        let dir = file.parent().unwrap_or(Path::new(""));
        self.load_plugin_str(&text, dir)
    }

    /// Loads a plugin descriptor from memory.
    ///
    /// The plugin becomes a module holding one dummy class per declared
    /// class. Relative library paths are resolved against `dir`.
    ///
    /// ```
    /// use std::path::Path;
    /// use lumen_rtti::class::ClassManager;
    ///
    /// let manager = ClassManager::get();
    /// let module = manager.load_plugin_str(r#"
    ///     <Plugin Version="1">
    ///         <Name>DocPlugin</Name>
    ///         <Classes>
    ///             <Class Name="Widget" Namespace="docplugin" BaseClassName="lumen::Object"
    ///                    HasConstructor="1" HasDefaultConstructor="1"/>
    ///         </Classes>
    ///     </Plugin>"#, Path::new("")).unwrap();
    ///
    /// let widget = manager.class("docplugin::Widget").unwrap();
    /// assert!(widget.is_dummy());
    /// assert!(widget.has_default_constructor());
    /// assert!(widget.create().is_none());
    ///
    /// manager.unload_plugin(module.id()).unwrap();
    /// assert!(manager.class("docplugin::Widget").is_none());
    /// ```
    pub fn load_plugin_str(&self, text: &str, dir: &Path) -> Result<Arc<Module>, PluginError> {
        let plugin = XmlElement::parse(text)?;
        if plugin.name() != "Plugin" {
            return Err(PluginError::MissingPluginElement);
        }

        let version = plugin
            .attribute("Version")
            .map_or(0, |v| Var::from(v).to_int64());
        match version {
            1 => {}
            0 => log::warn!("plugin format version 0 is deprecated, use version 1"),
            v if v > 1 => return Err(PluginError::UnknownVersion(v)),
            v => return Err(PluginError::InvalidVersion(v)),
        }

        if let Some(active) = plugin.child_text("Active")
            && !Var::from(active.trim()).to_bool()
        {
            log::info!("plugin is ignored because it is inactive");
            return Err(PluginError::Inactive);
        }

        let filename = library_of(&plugin, dir);
        if let Some(path) = &filename
            && let Some(module) = self
                .modules()
                .into_iter()
                .find(|m| m.filename() == Some(path.as_path()))
        {
            return Ok(module);
        }

        let text_of = |name: &str| {
            plugin
                .child_text(name)
                .map(|t| String::from(t.trim()))
                .unwrap_or_default()
        };
        let module = self.register_plugin_module(Module {
            name: text_of("Name"),
            vendor: text_of("Vendor"),
            license: text_of("License"),
            description: text_of("Description"),
            plugin: true,
            filename,
            ..Module::new(0)
        });

        let classes = plugin.child("Classes").into_iter().flat_map(XmlElement::elements);
        for entry in classes.filter(|e| e.name() == "Class") {
            let Some(name) = entry.attribute("Name").filter(|n| !n.is_empty()) else {
                continue;
            };
            let flag = |key: &str| entry.attribute(key).is_some_and(|v| Var::from(v).to_bool());

            let mut builder = ClassBuilder::new(String::from(name))
                .namespace(String::from(entry.attribute("Namespace").unwrap_or_default()))
                .description(String::from(entry.attribute("Description").unwrap_or_default()))
                .dummy(flag("HasConstructor"), flag("HasDefaultConstructor"));
            builder = match entry.attribute("BaseClassName").filter(|b| !b.is_empty()) {
                Some(base) => builder.base(String::from(base)),
                None => builder.root(),
            };
            let properties = entry.child("Properties").into_iter().flat_map(XmlElement::elements);
            for property in properties.filter(|e| e.name() == "Property") {
                if let Some(key) = property.attribute("Name").filter(|k| !k.is_empty()) {
                    builder = builder.property(String::from(key), property.text().into_owned());
                }
            }

            let class = builder.build();
            if self.class(class.name()).is_some() {
                continue;
            }
            self.register_class(module.id(), class);
        }

        log::info!("plugin `{}` loaded as module {}", module.name(), module.id());
        Ok(module)
    }

    /// Unregisters a plugin module and its classes.
    pub fn unload_plugin(&self, module_id: u32) -> Result<(), PluginError> {
        let module = self
            .module(module_id)
            .ok_or(PluginError::UnknownModule(module_id))?;
        if !module.is_plugin() {
            return Err(PluginError::NotAPluginModule(module_id));
        }
        self.unregister_module(module_id);
        Ok(())
    }

    /// Unloads every plugin module and returns how many there were.
    pub fn unload_all_plugins(&self) -> usize {
        let plugins: Vec<u32> = self
            .modules()
            .iter()
            .filter(|m| m.is_plugin())
            .map(|m| m.id())
            .collect();
        plugins
            .into_iter()
            .filter(|id| self.unregister_module(*id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::{env, fs, process};

    use super::PluginError;
    use crate::class::{ClassManager, Recursion};

    const GADGETS: &str = r#"<?xml version="1.0"?>
        <Plugin Version="1">
            <Active>1</Active>
            <Name>Gadgets</Name>
            <Vendor>Acme</Vendor>
            <License>MIT</License>
            <Description>Test gadgets</Description>
            <Platform Name="Any">
                <Library Type="Release">gadgets.so</Library>
                <Library Type="Debug">gadgets_d.so</Library>
            </Platform>
            <Classes>
                <Class Name="Gadget" Namespace="test_plugin" BaseClassName="lumen::Object"
                       Description="A gadget" HasConstructor="1" HasDefaultConstructor="0">
                    <Properties>
                        <Property Name="Icon">gadget.png</Property>
                    </Properties>
                </Class>
                <Class Name="Gizmo" Namespace="test_plugin" BaseClassName="test_plugin::Gadget"/>
                <Class Namespace="test_plugin"/>
            </Classes>
        </Plugin>"#;

    #[test]
    fn descriptor_becomes_dummy_classes() {
        let manager = ClassManager::get();
        let module = manager.load_plugin_str(GADGETS, Path::new("/plugins")).unwrap();
        assert!(module.is_plugin());
        assert_eq!(module.name(), "Gadgets");
        assert_eq!(module.vendor(), "Acme");
        let library = if cfg!(debug_assertions) { "gadgets_d.so" } else { "gadgets.so" };
        assert_eq!(module.filename(), Some(Path::new("/plugins").join(library).as_path()));

        let gadget = manager.class("test_plugin::Gadget").unwrap();
        assert!(gadget.is_dummy());
        assert_eq!(gadget.module_id(), module.id());
        assert_eq!(gadget.description(), "A gadget");
        assert!(gadget.has_constructor());
        assert!(!gadget.has_default_constructor());
        assert_eq!(gadget.property("Icon").as_deref(), Some("gadget.png"));

        let gizmo = manager.class("test_plugin::Gizmo").unwrap();
        assert!(gizmo.is_derived_from("test_plugin::Gadget"));
        assert_eq!(gizmo.property("Icon").as_deref(), Some("gadget.png"));
        assert_eq!(manager.module_classes(module.id()).len(), 2);

        // the same library is loaded once
        let again = manager.load_plugin_str(GADGETS, Path::new("/plugins")).unwrap();
        assert_eq!(again.id(), module.id());

        manager.unload_plugin(module.id()).unwrap();
        assert!(manager.class("test_plugin::Gadget").is_none());
        assert!(matches!(
            manager.unload_plugin(module.id()),
            Err(PluginError::UnknownModule(_))
        ));
    }

    #[test]
    fn rejects_bad_descriptors() {
        let manager = ClassManager::get();
        let load = |text: &str| manager.load_plugin_str(text, Path::new(""));

        assert!(matches!(load("<Other/>"), Err(PluginError::MissingPluginElement)));
        assert!(matches!(load(r#"<Plugin Version="2"/>"#), Err(PluginError::UnknownVersion(2))));
        assert!(matches!(load(r#"<Plugin Version="-1"/>"#), Err(PluginError::InvalidVersion(-1))));
        assert!(matches!(
            load(r#"<Plugin Version="1"><Active>0</Active></Plugin>"#),
            Err(PluginError::Inactive)
        ));
        assert!(matches!(load("<Plugin"), Err(PluginError::Xml(_))));

        let core = manager.module(crate::class::CORE_MODULE_ID).unwrap();
        assert!(matches!(
            manager.unload_plugin(core.id()),
            Err(PluginError::NotAPluginModule(_))
        ));
    }

    #[test]
    fn scans_directories() {
        let root = env::temp_dir().join(format!("lumen_rtti_scan_{}", process::id()));
        let nested = root.join("nested");
        fs::create_dir_all(&nested).unwrap();
        let descriptor = |class: &str| {
            format!(
                r#"<Plugin Version="1"><Name>{class}</Name><Classes>
                    <Class Name="{class}" Namespace="test_scan"/>
                </Classes></Plugin>"#
            )
        };
        fs::write(root.join("a.plugin"), descriptor("A")).unwrap();
        fs::write(nested.join("b.plugin"), descriptor("B")).unwrap();
        fs::write(root.join("broken.plugin"), "<Plugin").unwrap();
        fs::write(root.join("notes.txt"), "not a plugin").unwrap();

        let manager = ClassManager::get();
        assert_eq!(manager.scan_plugins(&root, Recursion::NonRecursive).unwrap(), 1);
        assert!(manager.class("test_scan::A").is_some());
        assert!(manager.class("test_scan::B").is_none());

        assert_eq!(manager.scan_plugins(&root, Recursion::Recursive).unwrap(), 2);
        assert!(manager.class("test_scan::B").is_some());

        assert!(matches!(
            manager.scan_plugins(root.join("notes.txt"), Recursion::Recursive),
            Err(PluginError::NotADirectory(_))
        ));
        assert!(matches!(
            manager.load_plugin(root.join("notes.txt")),
            Err(PluginError::NotAPluginFile(_))
        ));

        let scanned = manager
            .modules()
            .into_iter()
            .filter(|m| m.is_plugin() && ["A", "B"].contains(&m.name()));
        for module in scanned {
            manager.unload_plugin(module.id()).unwrap();
        }
        assert!(manager.class("test_scan::A").is_none());
        fs::remove_dir_all(&root).unwrap();
    }
}
