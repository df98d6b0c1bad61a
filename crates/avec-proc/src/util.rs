use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Attribute, Expr, Fields, Ident, LitStr};

pub fn find_attr<'a>(attrs: &'a [Attribute], ident: &str) -> Option<&'a Attribute> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident(ident))
}

/// Names bound when destructuring a set of fields.
pub struct Bindings {
    pub pattern: TokenStream,
    pub positional: bool,
}

pub fn bindings(fields: &Fields) -> Bindings {
    match fields {
        Fields::Named(named) => {
            let idents: Vec<Ident> = named.named
                .iter()
                .filter_map(|field| field.ident.clone())
                .collect();
            Bindings {
                pattern: quote! { { #( #idents ),* } },
                positional: false,
            }
        },
        Fields::Unnamed(unnamed) => {
            let idents: Vec<Ident> = (0..unnamed.unnamed.len())
                .map(|i| format_ident!("_{}", i))
                .collect();
            Bindings {
                pattern: quote! { ( #( #idents ),* ) },
                positional: true,
            }
        },
        Fields::Unit => Bindings {
            pattern: TokenStream::new(),
            positional: false,
        },
    }
}

/// Turns `{0}` into `{_0}` so positional placeholders capture the tuple bindings.
pub fn positional_to_named(fmt: &str) -> String {
    let mut out = String::with_capacity(fmt.len() + 4);
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c != '{' {
            continue
        }
        match chars.peek() {
            Some('{') => {
                out.push('{');
                chars.next();
            },
            Some(d) if d.is_ascii_digit() => out.push('_'),
            _ => {},
        }
    }
    out
}

/// Arguments for `write!` taken from a `#[display(..)]` attribute.
pub fn display_args(attr: &Attribute, positional: bool) -> syn::Result<TokenStream> {
    if let Ok(lit) = attr.parse_args::<LitStr>() {
        if positional {
            let fmt = LitStr::new(&positional_to_named(&lit.value()), lit.span());
            Ok(quote! { #fmt })
        } else {
            Ok(quote! { #lit })
        }
    } else {
        let expr = attr.parse_args::<Expr>()?;
        Ok(quote! { "{}", #expr })
    }
}
