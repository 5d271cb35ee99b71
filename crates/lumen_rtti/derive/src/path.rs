//! Paths into `lumen_rtti` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `lumen_rtti` crate from the invoking crate.
///
/// Reading the manifest is relatively costly, so the path is resolved once
/// per macro invocation and passed around.
pub(crate) fn lumen_rtti() -> syn::Path {
    lumen_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("lumen_rtti"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn object_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::object::Object }
}

#[inline(always)]
pub(crate) fn object_class_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::class::ObjectClass }
}

#[inline(always)]
pub(crate) fn class_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::class::Class }
}

#[inline(always)]
pub(crate) fn class_builder_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::class::ClassBuilder }
}

#[inline(always)]
pub(crate) fn class_manager_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::class::ClassManager }
}

#[inline(always)]
pub(crate) fn member_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::member }
}

#[inline(always)]
pub(crate) fn types_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::types }
}

#[inline(always)]
pub(crate) fn var_(rtti: &syn::Path) -> TokenStream {
    quote! { #rtti::var::Var }
}
