use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Type};

enum FieldSource {
    Named(Ident),
    Skip,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "BeanCopy only supports structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "BeanCopy only supports structs with named fields",
        ));
    };

    let mut sources: Vec<Type> = Vec::new();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("from") {
                sources.push(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `from = Type`"))
            }
        })?;
    }
    if sources.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "BeanCopy needs at least one `#[bean(from = Type)]`",
        ));
    }

    let mut assignments = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let Some(ident) = &field.ident else { continue };
        let value = match field_source(field, ident)? {
            FieldSource::Named(src) => quote! {
                ::core::convert::Into::into(::core::clone::Clone::clone(&source.#src))
            },
            FieldSource::Skip => quote! { ::core::default::Default::default() },
        };
        assignments.push(quote! { #ident: #value });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let impls = sources.iter().map(|source_ty| {
        quote! {
            #[automatically_derived]
            impl #impl_generics ::core::convert::From<&#source_ty> for #name #ty_generics #where_clause {
                #[allow(unused_variables)]
                fn from(source: &#source_ty) -> Self {
                    Self { #(#assignments,)* }
                }
            }
        }
    });

    Ok(quote! { #(#impls)* })
}

fn field_source(field: &syn::Field, ident: &Ident) -> syn::Result<FieldSource> {
    let mut source = FieldSource::Named(ident.clone());
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                source = FieldSource::Skip;
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                source = FieldSource::Named(format_ident!("{}", lit.value(), span = lit.span()));
            } else {
                return Err(meta.error("expected `skip` or `rename = \"...\"`"));
            }
            Ok(())
        })?;
    }
    Ok(source)
}
