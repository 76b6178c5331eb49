//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::{FieldAttrs, StructAttrs};

/// `Settings` derive macro
///
/// Generates the field descriptor table the binding engine walks, plus a
/// `from_env()` constructor. The struct must implement `Default`.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[env(self_validate)]`: run the struct's `SelfValidate` impl after binding
///
/// **Field-level**:
/// - `#[env(name = "VAR")]`: environment variable to bind
/// - `#[env(default = "value")]`: raw value used when the variable is not set
/// - `#[env(validate = "rules")]`: comma separated validation rules
/// - `#[env(omit)]` or `#[env(name = "-")]`: exclude the field
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(Settings, attributes(env))]
pub fn derive_settings(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();
    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;

    let fields: Vec<&syn::Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Settings only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Settings only supports structs",
            ));
        }
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = FieldAttrs::from_field(field)?;

        let field_name = ident.to_string();
        let field_type = field
            .ty
            .to_token_stream()
            .to_string()
            .replace(' ', "");

        if attrs.is_omitted() {
            descriptors.push(quote! {
                ::envbind::Field::omitted(#field_name, #field_type)
            });
            continue;
        }

        let mut tags = quote! { ::envbind::Tags::new() };
        if let Some(name) = &attrs.name {
            tags.extend(quote! { .with_key(#name) });
        }
        if let Some(default) = &attrs.default {
            tags.extend(quote! { .with_default(#default) });
        }
        if let Some(rules) = &attrs.validate {
            tags.extend(quote! { .with_rules(#rules) });
        }

        descriptors.push(quote! {
            ::envbind::Field::new(
                #field_name,
                #field_type,
                #tags,
                ::envbind::Slot::slot(&mut self.#ident),
            )
        });
    }

    let self_validate = struct_attrs.self_validate.then(|| {
        quote! {
            fn as_self_validate(&self) -> ::core::option::Option<&dyn ::envbind::SelfValidate> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    // Generic structs are only loadable for parameters that keep them `Default`.
    let loadable = (!input.generics.params.is_empty()).then(|| {
        quote! { where Self: ::core::default::Default }
    });

    Ok(quote! {
        impl #impl_generics ::envbind::Settings for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn fields(&mut self) -> ::std::vec::Vec<::envbind::Field<'_>> {
                ::std::vec![#(#descriptors),*]
            }

            #self_validate
        }

        impl #impl_generics ::envbind::Slot for #struct_name #ty_generics #where_clause {
            fn slot(&mut self) -> ::envbind::SlotMut<'_> {
                ::envbind::SlotMut::Record(self)
            }
        }

        impl #impl_generics #struct_name #ty_generics #where_clause {
            /// Load configuration from environment variables
            ///
            /// # Errors
            ///
            /// - A variable holds a value that cannot be coerced into its field
            /// - A field type has no coercion
            /// - A validation rule or the struct's own validation fails
            pub fn from_env() -> ::envbind::anyhow::Result<Self> #loadable {
                ::std::result::Result::Ok(::envbind::load::<Self>()?)
            }
        }
    })
}
