//! Derive macros for Wirebox.
//!
//! - `#[derive(Injectable)]` — generates `Injectable::declare` from fields
//!   marked `#[resolved]`
//! - `#[derive(Provider)]` — generates `Provider::register` from fields
//!   marked `#[cached]`
//!
//! Generated code refers to the `wirebox` facade crate.
//!
//! Slot flavour is read from how the field type is written:
//! `Option<Arc<X>>` is a reference slot keyed by `Arc<X>`, any other
//! `Option<V>` is an optional slot keyed by `Option<V>`, and anything else
//! is a value slot. Type aliases are not looked through, so
//! `Option<Shared>` with `type Shared = Arc<X>` is an optional slot keyed by
//! `Option<Arc<X>>`. Spell the `Arc` out to get a reference slot.
//!
//! `#[cached]` fields follow the same split: a present `Option<Arc<X>>` is
//! published as `Arc<X>` and an absent one publishes nothing.

use darling::FromMeta;
use darling::ast::NestedMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, Meta, PathArguments, Type,
    parse_macro_input,
};

/// Options of a `#[resolved(...)]` attribute.
#[derive(Debug, Default, FromMeta)]
#[darling(default)]
struct ResolvedArgs {
    /// Assign the default instead of failing when nothing is cached.
    permit_missing: bool,
    /// The slot is accessor-backed.
    property: bool,
    /// Set accessor visibility; implies `property`.
    setter: Option<String>,
    /// The field embeds a base level rather than being a slot.
    base: bool,
}

/// How a slot is declared, decided from the field type.
enum Flavour<'a> {
    /// `Option<Arc<X>>`
    Reference(&'a Type),
    /// `Option<V>`
    Optional(&'a Type),
    /// anything else
    Value(&'a Type),
}

#[proc_macro_derive(Injectable, attributes(resolved))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_injectable(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

#[proc_macro_derive(Provider, attributes(cached))]
pub fn derive_provider(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_provider(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

fn named_fields(input: &DeriveInput) -> darling::Result<&syn::FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(fields),
            other => Err(darling::Error::custom(
                "wirebox derives need a struct with named fields",
            )
            .with_span(other)),
        },
        _ => Err(darling::Error::custom("wirebox derives only support structs")
            .with_span(&input.ident)),
    }
}

fn expand_injectable(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut bases = Vec::new();
    let mut slots = Vec::new();

    for field in &named_fields(input)?.named {
        let Some(args) = resolved_args(&field.attrs)? else {
            continue;
        };
        let Some(name) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let member = name.unraw().to_string();

        if args.base {
            if args.permit_missing || args.property || args.setter.is_some() {
                return Err(darling::Error::custom(
                    "`base` cannot be combined with slot options",
                )
                .with_span(field));
            }
            bases.push(quote_spanned! {field.span()=>
                plan.base::<#ty>(|this| &mut this.#name);
            });
            continue;
        }

        let declare = match flavour(ty) {
            Flavour::Reference(inner) => quote! {
                plan.reference::<#inner>(#member, |this| &mut this.#name)
            },
            Flavour::Optional(inner) => quote! {
                plan.optional::<#inner>(#member, |this| &mut this.#name)
            },
            Flavour::Value(value) => quote! {
                plan.value::<#value>(#member, |this| &mut this.#name)
            },
        };

        let permit_missing = args.permit_missing.then(|| quote! { .permit_missing() });
        let property = property_tokens(&args, field)?;

        slots.push(quote_spanned! {field.span()=>
            #declare #permit_missing #property;
        });
    }

    Ok(quote! {
        impl #impl_generics ::wirebox::Injectable for #ident #ty_generics #where_clause {
            fn declare(plan: &mut ::wirebox::PlanBuilder<Self>) {
                #(#bases)*
                #(#slots)*
            }
        }
    })
}

fn expand_provider(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut contributions = Vec::new();
    for field in &named_fields(input)?.named {
        if !field.attrs.iter().any(|attr| attr.path().is_ident("cached")) {
            continue;
        }
        let Some(name) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let contribution = match flavour(ty) {
            // Published under the key a reference slot looks up.
            Flavour::Reference(pointee) => quote_spanned! {field.span()=>
                if let ::core::option::Option::Some(shared) = &self.#name {
                    registry.cache::<::std::sync::Arc<#pointee>>(::std::sync::Arc::clone(shared));
                }
            },
            Flavour::Optional(_) | Flavour::Value(_) => quote_spanned! {field.span()=>
                registry.cache::<#ty>(::core::clone::Clone::clone(&self.#name));
            },
        };
        contributions.push(contribution);
    }

    Ok(quote! {
        impl #impl_generics ::wirebox::Provider for #ident #ty_generics #where_clause {
            fn register(&self, registry: &mut dyn ::wirebox::ProviderRegistry) {
                #(#contributions)*
            }
        }
    })
}

/// Parses the field's `#[resolved]` attribute, if any.
fn resolved_args(attrs: &[Attribute]) -> darling::Result<Option<ResolvedArgs>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("resolved")) else {
        return Ok(None);
    };

    let args = match &attr.meta {
        Meta::Path(_) => ResolvedArgs::default(),
        Meta::List(list) => {
            let nested = NestedMeta::parse_meta_list(list.tokens.clone())?;
            ResolvedArgs::from_list(&nested)?
        }
        Meta::NameValue(meta) => {
            return Err(
                darling::Error::custom("expected `#[resolved]` or `#[resolved(...)]`")
                    .with_span(meta),
            );
        }
    };
    Ok(Some(args))
}

fn property_tokens(args: &ResolvedArgs, field: &syn::Field) -> darling::Result<Option<TokenStream2>> {
    let setter = match args.setter.as_deref() {
        None if !args.property => return Ok(None),
        None => quote! { ::core::option::Option::None },
        Some(visibility) => {
            let variant = visibility_variant(visibility).ok_or_else(|| {
                darling::Error::custom(format!(
                    "unknown setter visibility `{visibility}`; expected one of \
                     public, protected, internal, protected_internal, private"
                ))
                .with_span(field)
            })?;
            quote! { ::core::option::Option::Some(::wirebox::Visibility::#variant) }
        }
    };
    Ok(Some(quote! { .property(#setter) }))
}

fn visibility_variant(visibility: &str) -> Option<Ident> {
    let variant = match visibility {
        "public" => "Public",
        "protected" => "Protected",
        "internal" => "Internal",
        "protected_internal" => "ProtectedInternal",
        "private" => "Private",
        _ => return None,
    };
    Some(Ident::new(variant, proc_macro2::Span::call_site()))
}

fn flavour(ty: &Type) -> Flavour<'_> {
    match single_generic(ty, "Option") {
        Some(inner) => match single_generic(inner, "Arc") {
            Some(pointee) => Flavour::Reference(pointee),
            None => Flavour::Optional(inner),
        },
        None => Flavour::Value(ty),
    }
}

/// For `Wrapper<T>` (any path prefix), returns `T`.
fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if last.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
