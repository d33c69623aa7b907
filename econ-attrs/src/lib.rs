mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// This trait can be derived for unit structs and structs with named fields.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use econ_attrs::ErrorKind;
/// use econ_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "missing `=` in equation", labels = ["add `Q =` before this"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | An array of label texts; the `i`th label points at the `i`th span.           |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
/// | `note`      | Optional note with extra context, shown after the help text.                 |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the members of the struct in scope, so they can be used in the expression (tuple structs
/// are not supported).
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            #target
        }
    }.into()
}
