use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{
    Data, DataEnum, DataStruct, DeriveInput, Expr, Fields, Index, Meta,
    parse_macro_input,
    spanned::Spanned,
};

use crate::{
    display,
    util::find_attr,
};

fn source_field(fields: &Fields) -> syn::Result<Option<usize>> {
    let mut found = None;
    for (i, field) in fields.iter().enumerate() {
        if let Some(attr) = find_attr(&field.attrs, "source") {
            if found.is_some() {
                return Err(syn::Error::new(
                    attr.path().span(),
                    "'source' attribute can only be used for one field",
                ))
            }
            found = Some(i);
        }
    }
    Ok(found)
}

fn handle_enum(input: &DeriveInput, e: &DataEnum) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let impl_display = display::expand_enum(input, e)?;
    let mut sources = Vec::new();
    let mut from = Vec::new();
    for var in &e.variants {
        let var_name = &var.ident;
        if let Some(idx) = source_field(&var.fields)? {
            let err = format_ident!("err");
            let arm = match &var.fields {
                Fields::Named(_) => {
                    let field = var.fields
                        .iter()
                        .nth(idx)
                        .and_then(|f| f.ident.as_ref());
                    quote! { Self::#var_name { #field: #err, .. } => Some(#err as &(dyn core::error::Error + 'static)), }
                },
                _ => {
                    let pats = (0..var.fields.len())
                        .map(|i| if i == idx { quote! { #err } } else { quote! { _ } });
                    quote! { Self::#var_name( #( #pats ),* ) => Some(#err as &(dyn core::error::Error + 'static)), }
                },
            };
            sources.push(arm);
        }
        for field in &var.fields {
            let Some(attr) = find_attr(&field.attrs, "from") else {
                continue
            };
            if var.fields.len() != 1 {
                return Err(syn::Error::new(
                    attr.path().span(),
                    "'from' attribute can only be used with variants with one field",
                ))
            }
            let ty = &field.ty;
            let construct = match &field.ident {
                Some(ident) => quote! { Self::#var_name { #ident: value } },
                None => quote! { Self::#var_name(value) },
            };
            from.push(quote! {
                impl #impl_generics From<#ty> for #name #ty_generics #where_clause {

                    fn from(value: #ty) -> Self {
                        #construct
                    }
                }
            });
        }
    }
    Ok(quote! {
        #impl_display

        impl #impl_generics core::error::Error for #name #ty_generics #where_clause {

            #[allow(unreachable_patterns)]
            fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
                match self {
                    #( #sources )*
                    _ => None,
                }
            }
        }

        #( #from )*
    })
}

fn handle_struct(input: &DeriveInput, s: &DataStruct) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let impl_display = display::expand_struct(input, s)?;
    let field = source_field(&s.fields)?
        .and_then(|idx| s.fields.iter().nth(idx).map(|field| (idx, field)));
    let source = match field {
        Some((_, field)) if matches!(
            find_attr(&field.attrs, "source").map(|attr| &attr.meta),
            Some(Meta::List(_)),
        ) => {
            let expr = find_attr(&field.attrs, "source")
                .map(|attr| attr.parse_args::<Expr>())
                .transpose()?;
            quote! { #expr }
        },
        Some((idx, field)) => {
            let access = match &field.ident {
                Some(ident) => quote! { self.#ident },
                None => {
                    let idx = Index::from(idx);
                    quote! { self.#idx }
                },
            };
            quote! { Some(&#access as &(dyn core::error::Error + 'static)) }
        },
        None => quote! { None },
    };
    Ok(quote! {
        #impl_display

        impl #impl_generics core::error::Error for #name #ty_generics #where_clause {

            fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
                #source
            }
        }
    })
}

pub fn error(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let expanded = match &input.data {
        Data::Enum(e) => handle_enum(&input, e),
        Data::Struct(s) => handle_struct(&input, s),
        Data::Union(_) => Err(syn::Error::new(Span::call_site(), "unions not supported")),
    };
    match expanded {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
