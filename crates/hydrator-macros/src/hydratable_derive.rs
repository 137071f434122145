//! Implementation of the Hydratable derive macro.
//!
//! This module generates a field-setter table at compile time from the
//! struct's named fields and their `#[hydratable(...)]` attributes.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Lit, Result};

/// Parsed definition of a struct with `#[derive(Hydratable)]`.
#[derive(Debug)]
pub struct HydratableDef {
    /// The struct name.
    pub name: Ident,
    /// Hydratable fields, in declaration order.
    pub fields: Vec<HydratableFieldDef>,
    /// Generics from the struct.
    pub generics: syn::Generics,
}

/// One hydratable field.
#[derive(Debug)]
pub struct HydratableFieldDef {
    /// The Rust field identifier.
    pub ident: Ident,
    /// The name the field is exposed under.
    pub name: String,
}

/// Parse a `DeriveInput` into a `HydratableDef`.
pub fn parse_hydratable(input: &DeriveInput) -> Result<HydratableDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Hydratable can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Hydratable can only be derived for structs, not unions",
            ));
        }
    };

    let mut seen: Vec<&str> = Vec::new();
    for field in &fields {
        if seen.contains(&field.name.as_str()) {
            return Err(Error::new_spanned(
                &field.ident,
                format!("duplicate hydratable field name `{}`", field.name),
            ));
        }
        seen.push(&field.name);
    }

    Ok(HydratableDef {
        name,
        fields,
        generics,
    })
}

fn parse_fields(fields: &Fields) -> Result<Vec<HydratableFieldDef>> {
    match fields {
        Fields::Named(named) => {
            let mut parsed = Vec::new();
            for field in &named.named {
                if let Some(def) = parse_field(field)? {
                    parsed.push(def);
                }
            }
            Ok(parsed)
        }
        Fields::Unnamed(_) => Err(Error::new_spanned(
            fields,
            "Hydratable requires a struct with named fields",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Parse one field; `None` when it is skipped.
fn parse_field(field: &Field) -> Result<Option<HydratableFieldDef>> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut skip = false;
    let mut rename = None;

    for attr in &field.attrs {
        if !attr.path().is_ident("hydratable") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("skip") {
                skip = true;
            } else if path.is_ident("rename") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    let renamed = lit_str.value();
                    if renamed.is_empty() {
                        return Err(Error::new_spanned(lit_str, "rename must not be empty"));
                    }
                    rename = Some(renamed);
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for rename",
                    ));
                }
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown hydratable attribute `{attr_name}`. \
                         Valid attributes are: skip, rename"
                    ),
                ));
            }

            Ok(())
        })?;
    }

    if skip {
        return Ok(None);
    }

    let name = rename.unwrap_or_else(|| ident.unraw().to_string());
    Ok(Some(HydratableFieldDef { ident, name }))
}

/// Generate the Hydratable trait implementation.
pub fn generate_hydratable_impl(def: &HydratableDef) -> TokenStream {
    let name = &def.name;
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let field_names: Vec<&str> = def.fields.iter().map(|f| f.name.as_str()).collect();

    let setters: Vec<TokenStream> = def
        .fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            let field_name = &field.name;
            quote! {
                #field_name => {
                    self.#ident = hydrator_core::FromValue::from_value(value).map_err(|e| {
                        e.with_context(::std::format!(
                            "{}::{}",
                            ::std::any::type_name::<Self>(),
                            #field_name
                        ))
                    })?;
                    Ok(())
                }
            }
        })
        .collect();

    quote! {
        impl #impl_generics hydrator_core::Hydratable for #name #ty_generics #where_clause {
            fn class_name(&self) -> &str {
                ::std::any::type_name::<Self>()
            }

            fn field_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![#(#field_names),*]
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: hydrator_core::Value,
            ) -> hydrator_core::Result<()> {
                match name {
                    #(#setters)*
                    _ => Err(hydrator_core::Error::UnknownField {
                        class: ::std::any::type_name::<Self>().to_string(),
                        field: name.to_string(),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_parse_named_fields() {
        let input: DeriveInput = parse_quote! {
            struct Signup {
                email: String,
                age: Option<i64>,
            }
        };
        let def = parse_hydratable(&input).unwrap();
        assert_eq!(def.name, "Signup");
        let names: Vec<_> = def.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["email", "age"]);
    }

    #[test]
    fn test_skip_and_rename() {
        let input: DeriveInput = parse_quote! {
            struct Signup {
                #[hydratable(rename = "type")]
                kind: String,
                #[hydratable(skip)]
                cache: Vec<u8>,
                r#match: bool,
            }
        };
        let def = parse_hydratable(&input).unwrap();
        let names: Vec<_> = def.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["type", "match"]);
        assert_eq!(def.fields[0].ident, "kind");
    }

    #[test]
    fn test_rejects_enums_and_tuple_structs() {
        let input: DeriveInput = parse_quote! {
            enum Choice { A, B }
        };
        let err = parse_hydratable(&input).unwrap_err();
        assert!(err.to_string().contains("not enums"));

        let input: DeriveInput = parse_quote! {
            struct Pair(i64, i64);
        };
        let err = parse_hydratable(&input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let input: DeriveInput = parse_quote! {
            struct Signup {
                #[hydratable(cast = "int")]
                age: i64,
            }
        };
        let err = parse_hydratable(&input).unwrap_err();
        assert!(err.to_string().contains("unknown hydratable attribute `cast`"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let input: DeriveInput = parse_quote! {
            struct Signup {
                #[hydratable(rename = "age")]
                years: i64,
                age: i64,
            }
        };
        let err = parse_hydratable(&input).unwrap_err();
        assert!(err.to_string().contains("duplicate hydratable field name `age`"));
    }

    #[test]
    fn test_unit_struct_has_no_fields() {
        let input: DeriveInput = parse_quote! {
            struct Marker;
        };
        assert!(parse_hydratable(&input).unwrap().fields.is_empty());
    }

    #[test]
    fn test_generated_impl_mentions_fields() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> where T: Clone {
                inner: T,
                #[hydratable(rename = "label")]
                name: String,
            }
        };
        let def = parse_hydratable(&input).unwrap();
        let code = generate_hydratable_impl(&def).to_string();
        assert!(code.contains("hydrator_core :: Hydratable for Wrapper < T >"));
        assert!(code.contains("\"label\" =>"));
        assert!(code.contains("self . name ="));
        assert!(code.contains("UnknownField"));
    }
}
