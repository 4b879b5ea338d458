use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(FormFields, attributes(form))]
pub fn derive_form_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormFields derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormFields derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormFields derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let calmform = calmform_path();
    let mut names = Vec::new();
    let mut configs = Vec::new();

    for field in named_fields {
        let attrs = match FieldAttrs::parse(&field) {
            Ok(attrs) => attrs,
            Err(error) => return error.to_compile_error().into(),
        };
        if attrs.skip {
            continue;
        }
        let Some(field_ident) = field.ident else {
            continue;
        };
        let field_name = field_ident.to_string();

        let kind = attrs.kind.map(|kind| {
            let variant = Ident::new(kind, Span::call_site());
            quote!(.kind(#calmform::form::FieldKind::#variant))
        });
        let label = attrs.label.map(|label| quote!(.label(#label)));
        let placeholder = attrs
            .placeholder
            .map(|placeholder| quote!(.placeholder(#placeholder)));

        configs.push(quote! {
            #calmform::form::FieldConfig::new(
                #field_name,
                ::core::convert::Into::<#calmform::form::FieldValue>::into(
                    ::core::clone::Clone::clone(&self.#field_ident),
                ),
            )
            #kind
            #label
            #placeholder
        });
        names.push(field_name);
    }

    quote! {
        impl #calmform::form::FormFields for #model_ident {
            const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];

            fn field_configs(&self) -> ::std::vec::Vec<#calmform::form::FieldConfig> {
                ::std::vec![#(#configs),*]
            }
        }
    }
    .into()
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    kind: Option<&'static str>,
    label: Option<LitStr>,
    placeholder: Option<LitStr>,
}

impl FieldAttrs {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("form") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    Ok(())
                } else if meta.path.is_ident("kind") {
                    let value: LitStr = meta.value()?.parse()?;
                    attrs.kind = Some(kind_variant(&value)?);
                    Ok(())
                } else if meta.path.is_ident("label") {
                    attrs.label = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("placeholder") {
                    attrs.placeholder = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected one of `skip`, `kind`, `label`, `placeholder`"))
                }
            })?;
        }
        Ok(attrs)
    }
}

fn kind_variant(value: &LitStr) -> syn::Result<&'static str> {
    match value.value().as_str() {
        "text" => Ok("Text"),
        "select" => Ok("Select"),
        "textarea" => Ok("TextArea"),
        other => Err(syn::Error::new_spanned(
            value,
            format!("unknown field kind `{other}`, expected `text`, `select` or `textarea`"),
        )),
    }
}

fn calmform_path() -> TokenStream2 {
    match crate_name("calmform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::calmform),
    }
}
