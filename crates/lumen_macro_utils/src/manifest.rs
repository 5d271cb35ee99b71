use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The parsed `Cargo.toml` of the crate invoking a proc-macro.
///
/// Generated code must name lumen crates by a path that resolves from the
/// user's crate, which depends either on a member crate directly or on the
/// `lumen_core` facade.
///
/// ```rust
/// # use lumen_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("lumen_rtti"));
/// ```
///
/// # Resolution rules
///
/// Checked in `dependencies` first, then in `dev-dependencies`:
///
/// 1. `name` is a dependency: `::name`.
/// 2. `name` starts with `lumen_` and `lumen` is a dependency: `::lumen::rtti`.
/// 3. `name` starts with `lumen_` and `lumen_core` is a dependency: `::lumen_core::rtti`.
///
/// Otherwise `::name`. A crate that expands its own macros should declare
/// `extern crate self as name;` so the absolute path also works internally.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const ENGINE_NAME: &str = "lumen";
const CORE_NAME: &str = "lumen_core";
const CRATE_PREFIX: &str = "lumen_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .unwrap_or_else(|| panic!("CARGO_MANIFEST_DIR is not set, the macro must run under cargo"));
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        path
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("unable to read {}: {err}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|err| panic!("unable to parse {}: {err}", path.display()))
    }

    fn parse_path(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|err| panic!("invalid crate path `{text}`: {err}"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let short = name.strip_prefix(CRATE_PREFIX)?;
        [ENGINE_NAME, CORE_NAME]
            .into_iter()
            .find(|facade| deps.contains_key(facade))
            .map(|facade| Self::parse_path(&format!("::{facade}::{short}")))
    }

    /// Returns the path under which `name` is reachable from the invoking crate.
    ///
    /// See the type level documentation for the resolution order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::find_in_deps(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Runs `func` with the cached manifest of the invoking crate.
    ///
    /// Manifests are cached per path and reloaded when the file's modification
    /// time changes. Call once per macro invocation and pass the result around.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read_manifest(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use std::time::SystemTime;
    use toml_edit::Document;

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn path_str(path: syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency_wins() {
        let m = manifest("[dependencies]\nlumen_rtti = \"0.0.1\"\nlumen_core = \"0.0.1\"\n");
        assert_eq!(path_str(m.get_crate_path("lumen_rtti")), "lumen_rtti");
    }

    #[test]
    fn facade_dependency() {
        let m = manifest("[dev-dependencies]\nlumen_core = \"0.0.1\"\n");
        assert_eq!(path_str(m.get_crate_path("lumen_rtti")), "lumen_core::rtti");
    }

    #[test]
    fn fallback_to_absolute() {
        let m = manifest("[dependencies]\nserde = \"1\"\n");
        assert_eq!(path_str(m.get_crate_path("lumen_rtti")), "lumen_rtti");
    }
}
