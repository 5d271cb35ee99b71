//! `#[derive(VarEnum)]`: implements `EnumType` and `VarType` for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

use crate::attributes::VarEnumAttributes;
use crate::path;

pub(crate) fn impl_var_enum(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`VarEnum` cannot be derived for generic types",
        ));
    }
    let Data::Enum(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`VarEnum` can only be derived for enums",
        ));
    };
    let Some(first) = data.variants.first() else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`VarEnum` needs at least one variant",
        ));
    };

    let ident = &ast.ident;
    let attrs = VarEnumAttributes::parse_attrs(&ast.attrs)?;
    let type_name = attrs
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let mut values = Vec::with_capacity(data.variants.len());
    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "`VarEnum` variants cannot have fields",
            ));
        }
        let variant_attrs = VarEnumAttributes::parse_attrs(&variant.attrs)?;
        let variant_ident = &variant.ident;
        let name = variant_attrs
            .name
            .unwrap_or_else(|| LitStr::new(&variant_ident.to_string(), variant_ident.span()));
        let description = variant_attrs
            .description
            .unwrap_or_else(|| LitStr::new("", variant_ident.span()));
        values.push((name, description));
        variants.push(variant_ident);
    }

    let rtti = path::lumen_rtti();
    let types_ = path::types_(&rtti);
    let var_ = path::var_(&rtti);
    let exports_ = path::macro_exports_(&rtti);
    let first = &first.ident;

    let value_entries = values.iter().zip(&variants).map(|((name, description), variant)| {
        quote! { #types_::EnumValue::new(#name, #ident::#variant as i64, #description) }
    });

    Ok(quote! {
        const _: () = {
            impl #types_::EnumType for #ident {
                const NAME: &'static str = #type_name;

                const VALUES: &'static [#types_::EnumValue] = &[#(#value_entries),*];

                const FALLBACK: Self = #ident::#first;

                #[inline]
                fn to_i64(self) -> i64 {
                    self as i64
                }

                fn from_i64(value: i64) -> #exports_::Option<Self> {
                    #(
                        if value == #ident::#variants as i64 {
                            return #exports_::Option::Some(#ident::#variants);
                        }
                    )*
                    #exports_::Option::None
                }

                fn enum_type_info() -> &'static #types_::TypeInfo {
                    static INFO: #types_::TypeInfo = #types_::TypeInfo::enumeration(
                        #types_::TypeKind::Int32,
                        <#ident as #types_::EnumType>::NAME,
                        <#ident as #types_::EnumType>::VALUES,
                    );
                    &INFO
                }

                fn flags_type_info() -> &'static #types_::TypeInfo {
                    static INFO: #types_::TypeInfo = #types_::TypeInfo::flags(
                        #types_::TypeKind::UInt32,
                        <#ident as #types_::EnumType>::NAME,
                        <#ident as #types_::EnumType>::VALUES,
                    );
                    &INFO
                }
            }

            impl #types_::VarType for #ident {
                #[inline]
                fn type_info() -> &'static #types_::TypeInfo {
                    <#ident as #types_::EnumType>::enum_type_info()
                }

                #[inline]
                fn to_var(&self) -> #var_ {
                    #var_::Int32(<#ident as #types_::EnumType>::to_i64(*self) as i32)
                }

                #[inline]
                fn from_var(var: &#var_) -> Self {
                    <#ident as #types_::EnumType>::from_var_or_fallback(var)
                }
            }
        };
    })
}
