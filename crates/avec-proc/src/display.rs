use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DataEnum, DataStruct, DeriveInput, parse_macro_input};

use crate::util::{bindings, display_args, find_attr};

pub fn expand_enum(input: &DeriveInput, e: &DataEnum) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let arms = e.variants
        .iter()
        .map(|var| {
            let attr = find_attr(&var.attrs, "display")
                .ok_or_else(|| syn::Error::new(
                    var.ident.span(),
                    "missing 'display' attribute",
                ))?;
            let binds = bindings(&var.fields);
            let args = display_args(attr, binds.positional)?;
            let ident = &var.ident;
            let pattern = &binds.pattern;
            Ok(quote! { Self::#ident #pattern => write!(f, #args), })
        })
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(quote! {
        impl #impl_generics core::fmt::Display for #name #ty_generics #where_clause {

            #[allow(unused_variables)]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    #( #arms )*
                }
            }
        }
    })
}

pub fn expand_struct(input: &DeriveInput, s: &DataStruct) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let attr = find_attr(&input.attrs, "display")
        .ok_or_else(|| syn::Error::new(
            input.ident.span(),
            "missing 'display' attribute",
        ))?;
    let binds = bindings(&s.fields);
    let args = display_args(attr, binds.positional)?;
    let pattern = &binds.pattern;
    Ok(quote! {
        impl #impl_generics core::fmt::Display for #name #ty_generics #where_clause {

            #[allow(unused_variables)]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let Self #pattern = self;
                write!(f, #args)
            }
        }
    })
}

pub fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    match &input.data {
        Data::Enum(e) => expand_enum(input, e),
        Data::Struct(s) => expand_struct(input, s),
        Data::Union(_) => Err(syn::Error::new(Span::call_site(), "unions not supported")),
    }
}

pub fn display(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
