use alloc::string::String;
use std::path::{Path, PathBuf};

/// A named group of classes, usually one crate or one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Module {
    pub(super) id: u32,
    pub(super) name: String,
    pub(super) vendor: String,
    pub(super) license: String,
    pub(super) description: String,
    pub(super) plugin: bool,
    pub(super) filename: Option<PathBuf>,
}

impl Module {
    pub(super) fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    #[inline]
    pub fn license(&self) -> &str {
        &self.license
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if the module was declared by a plugin descriptor.
    #[inline]
    pub fn is_plugin(&self) -> bool {
        self.plugin
    }

    /// The library file named by the plugin descriptor.
    #[inline]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}
