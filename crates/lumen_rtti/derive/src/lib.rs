//! See following macros:
//!
//! - [`Object`]
//! - [`VarEnum`]
//! - [`impl_auto_register`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod auto_register;
mod object;
mod path;
mod var_enum;

// -----------------------------------------------------------------------------
// Macros

/// # Object Derivation
///
/// `#[derive(Object)]` implements `Object` and `ObjectClass` for a
/// non-generic struct. The class is built and registered in the global
/// `ClassManager` the first time it is needed.
///
/// ## Class attributes
///
/// ```rust, ignore
/// #[derive(Object, Default)]
/// #[class(
///     name = "Mesh",               // default: the struct name
///     namespace = "demo",          // qualified name becomes `demo::Mesh`
///     base = "demo::Resource",     // default: the `#[base]` field's class, or `lumen::Object`
///     description = "Triangle mesh",
///     property(Icon = "mesh.png", Editor = "MeshEditor"),
///     constructor,                 // adds the default constructor, requires `Default`
///     members = Self::members,     // `fn(ClassBuilder) -> ClassBuilder`, adds methods and slots
///     auto_register,               // registered by `ClassManager::auto_register`
/// )]
/// struct Mesh {
///     #[base]
///     resource: Resource,
///     #[attribute(default = 3, description = "Vertex count")]
///     vertices: u32,
///     #[attribute(name = "File")]
///     path: String,
///     #[signal(params("Vertices"))]
///     signal_changed: Event<(u32,)>,
///     cache: Vec<u8>,
/// }
/// ```
///
/// ## Field attributes
///
/// - `#[attribute(...)]`: the field is an attribute. Its name defaults to the
///   field name in `PascalCase`. `default = expr` takes any value type or a
///   string literal; `description` and `annotation` are free text.
/// - `#[signal(...)]`: the field is an `Event<P>` exposed as a signal. Accepts
///   `name`, `params("A", ...)`, `description` and `annotation`.
/// - `#[base]`: the field holds the embedded base class instance. Members of
///   the base class reach it through `Object::base`.
///
/// Other fields are not reflected.
#[proc_macro_derive(Object, attributes(class, attribute, signal, base))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match object::impl_object(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Enum Derivation
///
/// `#[derive(VarEnum)]` implements `EnumType` and `VarType` for a fieldless,
/// non-generic enum that is `Copy`. Variants may carry explicit discriminants;
/// the first variant is the fallback for unknown values.
///
/// ```rust, ignore
/// #[derive(VarEnum, Clone, Copy)]
/// #[var_enum(name = "TextureFilter")]
/// enum Filter {
///     #[var_enum(description = "No interpolation")]
///     Nearest,
///     Linear = 4,
///     #[var_enum(name = "Trilinear")]
///     Mipmap = 8,
/// }
/// ```
///
/// The same enum also works as a flag set through `Flags<Filter>`.
#[proc_macro_derive(VarEnum, attributes(var_enum))]
pub fn derive_var_enum(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match var_enum::impl_var_enum(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Submits a type implementing `ObjectClass` for automatic registration.
///
/// Equivalent to `#[class(auto_register)]`, for types whose `ObjectClass`
/// implementation is written by hand.
///
/// ```rust, ignore
/// impl_auto_register!(Material);
/// ```
///
/// Does nothing when the `auto_register` feature is disabled.
#[proc_macro]
pub fn impl_auto_register(input: TokenStream) -> TokenStream {
    let ident = parse_macro_input!(input as syn::Ident);
    let rtti = path::lumen_rtti();
    let tokens = auto_register::get_auto_register_impl(&rtti, &ident, Some(ident.span()));

    quote::quote! {
        const _: () = {
            #tokens
        };
    }
    .into()
}
