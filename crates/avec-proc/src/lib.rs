mod util;
mod display;
mod error;

extern crate proc_macro;

use proc_macro::TokenStream;

/// Derive macro for [Display]
///
/// Every variant (or the struct itself) needs a `#[display(..)]` attribute holding
/// either a format string or a single expression. Fields are in scope by name,
/// tuple fields as `{0}`, `{1}`, ...
#[proc_macro_derive(Display, attributes(display))]
pub fn display(item: TokenStream) -> TokenStream {
    display::display(item)
}

/// Derive macro for [Error]
///
/// Implements `Display` like [`macro@Display`] and `core::error::Error`, with
/// `source()` pointing at the field marked `#[source]`. On structs,
/// `#[source(expr)]` uses `expr` as the body of `source()` instead. A `#[from]`
/// field of a single-field variant also gets a `From` impl.
#[proc_macro_derive(Error, attributes(display, source, from))]
pub fn error(item: TokenStream) -> TokenStream {
    error::error(item)
}
