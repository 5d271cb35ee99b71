//! `#[derive(Object)]`: implements `Object` and `ObjectClass`.

use lumen_macro_utils::to_pascal_case;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Member, Type};

use crate::attributes::{ClassAttributes, FieldRole, MemberDocs};
use crate::path;

/// A field and what it stands for.
struct ReflectedField<'a> {
    member: Member,
    ty: &'a Type,
    role: FieldRole,
}

pub(crate) fn impl_object(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "`Object` cannot be derived for generic types",
        ));
    }
    let Data::Struct(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "`Object` can only be derived for structs",
        ));
    };

    let attrs = ClassAttributes::parse_attrs(&ast.attrs)?;
    let fields = collect_fields(&data.fields)?;

    let mut bases = fields.iter().filter(|f| matches!(f.role, FieldRole::Base(_)));
    let base_field = bases.next();
    if let Some(second) = bases.next()
        && let FieldRole::Base(span) = second.role
    {
        let mut err = syn::Error::new(span, "only one field can hold the base class");
        if let Some(FieldRole::Base(first)) = base_field.map(|f| &f.role) {
            err.combine(syn::Error::new(*first, "first base field declared here"));
        }
        return Err(err);
    }

    let rtti = path::lumen_rtti();
    let ident = &ast.ident;

    let object_impl = impl_trait_object(&rtti, ident, base_field);
    let object_class_impl = impl_trait_object_class(&rtti, ident, &attrs, &fields, base_field);
    let auto_register = crate::auto_register::get_auto_register_impl(&rtti, ident, attrs.auto_register);

    Ok(quote! {
        const _: () = {
            #object_impl
            #object_class_impl
            #auto_register
        };
    })
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<ReflectedField<'_>>> {
    let mut out = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(index.into()),
        };
        let role = FieldRole::parse_attrs(&field.attrs)?;
        out.push(ReflectedField {
            member,
            ty: &field.ty,
            role,
        });
    }
    Ok(out)
}

/// The member name used when no `name = "..."` is given.
fn default_member_name(member: &Member) -> LitStr {
    match member {
        Member::Named(ident) => LitStr::new(&to_pascal_case(&ident.to_string()), ident.span()),
        Member::Unnamed(index) => LitStr::new(&format!("Field{}", index.index), index.span),
    }
}

fn docs_tokens(docs: &MemberDocs) -> TokenStream {
    let description = docs.description.as_ref().map(|d| quote! { .with_description(#d) });
    let annotation = docs.annotation.as_ref().map(|a| quote! { .with_annotation(#a) });
    quote! { #description #annotation }
}

// -----------------------------------------------------------------------------
// Object

fn impl_trait_object(rtti: &syn::Path, ident: &Ident, base: Option<&ReflectedField>) -> TokenStream {
    let object_ = path::object_(rtti);
    let class_ = path::class_(rtti);
    let class_manager_ = path::class_manager_(rtti);
    let exports_ = path::macro_exports_(rtti);

    let base_impls = base.map(|field| {
        let member = &field.member;
        quote! {
            #[inline]
            fn base(&self) -> #exports_::Option<&dyn #object_> {
                #exports_::Option::Some(&self.#member)
            }

            #[inline]
            fn base_mut(&mut self) -> #exports_::Option<&mut dyn #object_> {
                #exports_::Option::Some(&mut self.#member)
            }
        }
    });

    quote! {
        impl #object_ for #ident {
            fn class(&self) -> #exports_::Arc<#class_> {
                #class_manager_::get().class_of::<Self>()
            }

            #[inline]
            fn as_object(&self) -> &dyn #object_ {
                self
            }

            #[inline]
            fn as_object_mut(&mut self) -> &mut dyn #object_ {
                self
            }

            #[inline]
            fn as_any(&self) -> &dyn #exports_::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn #exports_::Any {
                self
            }

            #base_impls
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectClass

fn impl_trait_object_class(
    rtti: &syn::Path,
    ident: &Ident,
    attrs: &ClassAttributes,
    fields: &[ReflectedField],
    base: Option<&ReflectedField>,
) -> TokenStream {
    let object_class_ = path::object_class_(rtti);
    let class_ = path::class_(rtti);
    let class_builder_ = path::class_builder_(rtti);
    let class_manager_ = path::class_manager_(rtti);
    let member_ = path::member_(rtti);

    let class_name = attrs
        .name
        .clone()
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let namespace = attrs.namespace.as_ref().map(LitStr::value).unwrap_or_default();
    let qualified = if namespace.is_empty() {
        class_name.value()
    } else {
        format!("{namespace}::{}", class_name.value())
    };

    let namespace_tokens = (!namespace.is_empty()).then(|| quote! { .namespace(#namespace) });
    let base_tokens = match (&attrs.base, base) {
        (Some(name), _) => Some(quote! { .base(#name) }),
        (None, Some(field)) => {
            let ty = field.ty;
            Some(quote! { .base(<#ty as #object_class_>::CLASS_NAME) })
        }
        (None, None) => None,
    };
    let description = attrs.description.as_ref().map(|d| quote! { .description(#d) });
    let properties = attrs
        .properties
        .iter()
        .map(|(key, value)| quote! { .property(#key, #value) });
    let constructor = attrs
        .constructor
        .map(|_| quote! { .constructor(#member_::ConstructorDesc::default_of::<#ident>()) });

    let members = fields
        .iter()
        .filter_map(|field| member_tokens(rtti, ident, field));

    let hook = match &attrs.members {
        Some(hook) => quote! { let builder = #hook(builder); },
        None => TokenStream::new(),
    };

    let dependencies = base.map(|field| {
        let ty = field.ty;
        quote! {
            fn register_dependencies(manager: &#class_manager_) {
                manager.register::<#ty>();
            }
        }
    });

    quote! {
        impl #object_class_ for #ident {
            const CLASS_NAME: &'static str = #qualified;

            const MODULE_NAME: &'static str = ::core::env!("CARGO_PKG_NAME");

            fn create_class() -> #class_ {
                let builder = #class_builder_::of::<Self>(#class_name)
                    #namespace_tokens
                    #base_tokens
                    #description
                    #(#properties)*
                    #constructor;
                #(let builder = #members;)*
                #hook
                builder.build()
            }

            #dependencies
        }
    }
}

/// A `builder.attribute(...)` or `builder.signal(...)` call for one field.
fn member_tokens(rtti: &syn::Path, ident: &Ident, field: &ReflectedField) -> Option<TokenStream> {
    let member_ = path::member_(rtti);
    let types_ = path::types_(rtti);
    let member = &field.member;
    let ty = field.ty;
    let get = format_ident!("__get");
    let get_mut = format_ident!("__get_mut");

    match &field.role {
        FieldRole::Plain | FieldRole::Base(_) => None,
        FieldRole::Attribute {
            name,
            default,
            docs,
        } => {
            let name = name.clone().unwrap_or_else(|| default_member_name(member));
            let default = default
                .as_ref()
                .map(|expr| quote! { .with_default(#types_::IntoVar::into_var(#expr)) });
            let docs = docs_tokens(docs);
            Some(quote! {
                builder.attribute({
                    fn #get(this: &#ident) -> &#ty {
                        &this.#member
                    }
                    fn #get_mut(this: &mut #ident) -> &mut #ty {
                        &mut this.#member
                    }
                    #member_::VarDesc::field::<#ident, #ty>(#name, #get, #get_mut)
                        #default
                        #docs
                })
            })
        }
        FieldRole::Signal { name, params, docs } => {
            let name = name.clone().unwrap_or_else(|| default_member_name(member));
            let params = (!params.is_empty()).then(|| quote! { .with_param_names([#(#params),*]) });
            let docs = docs_tokens(docs);
            Some(quote! {
                builder.signal({
                    fn #get(this: &#ident) -> &#ty {
                        &this.#member
                    }
                    fn #get_mut(this: &mut #ident) -> &mut #ty {
                        &mut this.#member
                    }
                    #member_::EventDesc::field::<#ident, _>(#name, #get, #get_mut)
                        #params
                        #docs
                })
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::impl_object;

    #[test]
    fn rejects_a_second_base_field() {
        let ast = parse_quote! {
            struct Twice {
                #[base]
                first: First,
                #[attribute]
                value: i32,
                #[base]
                second: Second,
            }
        };
        let err = impl_object(&ast).unwrap_err();
        let messages: Vec<String> = err.into_iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            ["only one field can hold the base class", "first base field declared here"]
        );
    }

    #[test]
    fn rejects_enums() {
        let ast = parse_quote! {
            enum Mode { A, B }
        };
        let err = impl_object(&ast).unwrap_err();
        assert_eq!(err.to_string(), "`Object` can only be derived for structs");
    }
}
