//! Parsers for the helper attributes of `#[derive(Object)]` and
//! `#[derive(VarEnum)]`.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, LitStr, Path};

pub(crate) static CLASS_ATTRIBUTE_NAME: &str = "class";
pub(crate) static ATTRIBUTE_ATTRIBUTE_NAME: &str = "attribute";
pub(crate) static SIGNAL_ATTRIBUTE_NAME: &str = "signal";
pub(crate) static BASE_ATTRIBUTE_NAME: &str = "base";
pub(crate) static VAR_ENUM_ATTRIBUTE_NAME: &str = "var_enum";

fn lit_str(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate argument"));
    }
    *slot = Some(value);
    Ok(())
}

/// `description = "..."` and `annotation = "..."`, shared by all members.
#[derive(Default)]
pub(crate) struct MemberDocs {
    pub description: Option<LitStr>,
    pub annotation: Option<LitStr>,
}

impl MemberDocs {
    /// Returns `Ok(false)` if `meta` is not a doc argument.
    fn parse(&mut self, meta: &ParseNestedMeta) -> syn::Result<bool> {
        if meta.path.is_ident("description") {
            set_once(&mut self.description, lit_str(meta)?, meta)?;
        } else if meta.path.is_ident("annotation") {
            set_once(&mut self.annotation, lit_str(meta)?, meta)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

// -----------------------------------------------------------------------------
// Type attributes

/// Arguments of `#[class(...)]`.
///
/// Format:
///
/// ```ignore
/// #[class(
///     name = "Foo",
///     namespace = "demo",
///     base = "demo::Base",
///     description = "...",
///     property(Icon = "foo.png"),
///     constructor,
///     members = Self::members,
///     auto_register,
/// )]
/// ```
#[derive(Default)]
pub(crate) struct ClassAttributes {
    pub name: Option<LitStr>,
    pub namespace: Option<LitStr>,
    pub base: Option<LitStr>,
    pub description: Option<LitStr>,
    pub properties: Vec<(String, LitStr)>,
    pub constructor: Option<Span>,
    pub members: Option<Path>,
    pub auto_register: Option<Span>,
}

impl ClassAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(CLASS_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| out.parse_meta(meta))?;
        }
        Ok(out)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            set_once(&mut self.name, lit_str(&meta)?, &meta)
        } else if meta.path.is_ident("namespace") {
            set_once(&mut self.namespace, lit_str(&meta)?, &meta)
        } else if meta.path.is_ident("base") {
            set_once(&mut self.base, lit_str(&meta)?, &meta)
        } else if meta.path.is_ident("description") {
            set_once(&mut self.description, lit_str(&meta)?, &meta)
        } else if meta.path.is_ident("property") {
            meta.parse_nested_meta(|inner| {
                let Some(key) = inner.path.get_ident() else {
                    return Err(inner.error("expected a property name"));
                };
                let value = lit_str(&inner)?;
                self.properties.push((key.to_string(), value));
                Ok(())
            })
        } else if meta.path.is_ident("constructor") {
            set_once(&mut self.constructor, meta.path.require_ident()?.span(), &meta)
        } else if meta.path.is_ident("members") {
            let path: Path = meta.value()?.parse()?;
            set_once(&mut self.members, path, &meta)
        } else if meta.path.is_ident("auto_register") {
            set_once(&mut self.auto_register, meta.path.require_ident()?.span(), &meta)
        } else {
            Err(meta.error("unknown `class` argument"))
        }
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// What a field of an object type stands for.
pub(crate) enum FieldRole {
    /// Not reflected.
    Plain,
    /// `#[attribute(name = "...", default = expr, description = "...")]`
    Attribute {
        name: Option<LitStr>,
        default: Option<Expr>,
        docs: MemberDocs,
    },
    /// `#[signal(name = "...", params("A", "B"), description = "...")]`
    Signal {
        name: Option<LitStr>,
        params: Vec<LitStr>,
        docs: MemberDocs,
    },
    /// `#[base]`: the embedded instance of the base class.
    Base(Span),
}

impl FieldRole {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut role = FieldRole::Plain;
        for attr in attrs {
            let path = attr.path();
            let parsed = if path.is_ident(ATTRIBUTE_ATTRIBUTE_NAME) {
                Self::parse_attribute(attr)?
            } else if path.is_ident(SIGNAL_ATTRIBUTE_NAME) {
                Self::parse_signal(attr)?
            } else if path.is_ident(BASE_ATTRIBUTE_NAME) {
                attr.meta.require_path_only()?;
                FieldRole::Base(path.require_ident()?.span())
            } else {
                continue;
            };
            if !matches!(role, FieldRole::Plain) {
                return Err(syn::Error::new_spanned(
                    attr,
                    "a field can be one of `attribute`, `signal` or `base` only once",
                ));
            }
            role = parsed;
        }
        Ok(role)
    }

    fn parse_attribute(attr: &Attribute) -> syn::Result<Self> {
        let mut name = None;
        let mut default = None;
        let mut docs = MemberDocs::default();
        if matches!(attr.meta, syn::Meta::List(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    set_once(&mut name, lit_str(&meta)?, &meta)
                } else if meta.path.is_ident("default") {
                    let expr: Expr = meta.value()?.parse()?;
                    set_once(&mut default, expr, &meta)
                } else if docs.parse(&meta)? {
                    Ok(())
                } else {
                    Err(meta.error("unknown `attribute` argument"))
                }
            })?;
        }
        Ok(FieldRole::Attribute {
            name,
            default,
            docs,
        })
    }

    fn parse_signal(attr: &Attribute) -> syn::Result<Self> {
        let mut name = None;
        let mut params = Vec::new();
        let mut docs = MemberDocs::default();
        if matches!(attr.meta, syn::Meta::List(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    set_once(&mut name, lit_str(&meta)?, &meta)
                } else if meta.path.is_ident("params") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let names = content.parse_terminated(<LitStr as syn::parse::Parse>::parse, syn::Token![,])?;
                    params.extend(names);
                    Ok(())
                } else if docs.parse(&meta)? {
                    Ok(())
                } else {
                    Err(meta.error("unknown `signal` argument"))
                }
            })?;
        }
        Ok(FieldRole::Signal { name, params, docs })
    }
}

// -----------------------------------------------------------------------------
// Enum attributes

/// `#[var_enum(name = "...", description = "...")]` on an enum or a variant.
#[derive(Default)]
pub(crate) struct VarEnumAttributes {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

impl VarEnumAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(VAR_ENUM_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    set_once(&mut out.name, lit_str(&meta)?, &meta)
                } else if meta.path.is_ident("description") {
                    set_once(&mut out.description, lit_str(&meta)?, &meta)
                } else {
                    Err(meta.error("unknown `var_enum` argument"))
                }
            })?;
        }
        Ok(out)
    }
}
