use proc_macro2::{Span, TokenStream};
use syn::Ident;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(rtti: &syn::Path, ident: &Ident, span: Option<Span>) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = span else {
        return TokenStream::new();
    };
    let auto_register_ = crate::path::auto_register_(rtti);

    quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                <#ident as #auto_register_::__RegisterType>::__register
            )
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &syn::Path, _: &Ident, _: Option<Span>) -> TokenStream {
    TokenStream::new()
}
