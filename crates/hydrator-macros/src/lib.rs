//! Procedural macros for the hydrator.
//!
//! `#[derive(Hydratable)]` generates the field-setter table the hydration
//! engine writes through. Generated code refers to `hydrator_core`, so the
//! deriving crate must depend on it (the `hydrator` facade re-exports it).
//!
//! ```ignore
//! use hydrator::Hydratable;
//!
//! #[derive(Default, Hydratable)]
//! struct Signup {
//!     email: String,
//!     age: Option<i64>,
//!     #[hydratable(rename = "type")]
//!     kind: String,
//!     #[hydratable(skip)]
//!     cache: Vec<u8>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod hydratable_derive;

/// Derive `hydrator_core::Hydratable` for a struct with named fields.
///
/// Field attributes:
/// - `#[hydratable(skip)]`: the field is not hydratable.
/// - `#[hydratable(rename = "name")]`: expose the field under another name.
#[proc_macro_derive(Hydratable, attributes(hydratable))]
pub fn derive_hydratable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match hydratable_derive::parse_hydratable(&input) {
        Ok(def) => hydratable_derive::generate_hydratable_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
