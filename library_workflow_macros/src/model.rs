use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let StructAttrs {
        collection,
        constraints,
    } = extract_struct_attrs(input)?;
    let fields = named_fields(input)?;
    let id_field = extract_id_field(input, fields)?;
    let relations = extract_relations(fields)?;

    let relation_entries = relations.iter().map(|(field, collection)| {
        quote! {
            library_workflow::Relation {
                field: #field,
                collection: #collection,
            }
        }
    });

    let constraints_method = match constraints {
        Some(path) => quote! {
            fn constraints() -> Vec<library_workflow::Constraint<Self>> {
                #path()
            }
        },
        None => quote! {},
    };

    Ok(quote! {
        impl library_workflow::Model for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }

            fn relations() -> &'static [library_workflow::Relation] {
                static RELATIONS: &[library_workflow::Relation] = &[
                    #(#relation_entries),*
                ];
                RELATIONS
            }

            #constraints_method
        }
    })
}

struct StructAttrs {
    collection: String,
    constraints: Option<syn::Path>,
}

fn extract_struct_attrs(input: &DeriveInput) -> syn::Result<StructAttrs> {
    let mut collection = None;
    let mut constraints = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("constraints") {
                let value: LitStr = meta.value()?.parse()?;
                constraints = Some(value.parse::<syn::Path>()?);
                Ok(())
            } else {
                Err(meta.error("expected `collection` or `constraints`"))
            }
        })?;
    }

    // Default: snake_case struct name + "s"
    let collection =
        collection.unwrap_or_else(|| format!("{}s", to_snake_case(&input.ident.to_string())));

    Ok(StructAttrs {
        collection,
        constraints,
    })
}

fn named_fields(
    input: &DeriveInput,
) -> syn::Result<&syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(&fields.named);
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "Model derive: only structs with named fields are supported",
    ))
}

fn extract_id_field(
    input: &DeriveInput,
    fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>,
) -> syn::Result<syn::Ident> {
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                } else if meta.path.is_ident("relation") {
                    let _: LitStr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
            if is_id {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    // Default: look for a field named "id"
    fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == "id")
        .cloned()
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Model derive: no field marked with #[model(id)] and no field named `id`",
            )
        })
}

fn extract_relations(
    fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>,
) -> syn::Result<Vec<(String, String)>> {
    let mut relations = Vec::new();

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        for attr in &field.attrs {
            if !attr.path().is_ident("model") {
                continue;
            }
            let mut target = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("relation") {
                    let value: LitStr = meta.value()?.parse()?;
                    target = Some(value.value());
                }
                Ok(())
            })?;
            if let Some(target) = target {
                relations.push((ident.to_string(), target));
            }
        }
    }

    Ok(relations)
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
