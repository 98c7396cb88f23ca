use proc_macro2::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Attribute, DeriveInput, LitStr, Token};

struct IndexSpec {
    fields: Vec<String>,
    unique: bool,
    name: Option<String>,
}

pub fn expand_index_model_provider(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let mut specs = Vec::new();
    for attr in ast.attrs.iter().filter(|a| a.path().is_ident("mongo_index")) {
        match parse_index_attr(attr) {
            Ok(spec) => specs.push(spec),
            Err(e) => return e.to_compile_error().into(),
        }
    }

    let models = specs.iter().map(index_model_tokens);
    let gen = quote! {
        impl ::common::index_trait::MongoIndexModelProvider for #name {
            fn index_models() -> ::std::vec::Vec<::mongodb::IndexModel> {
                ::std::vec![
                    #(#models),*
                ]
            }
        }
    };
    gen.into()
}

fn parse_index_attr(attr: &Attribute) -> syn::Result<IndexSpec> {
    let mut spec = IndexSpec { fields: Vec::new(), unique: false, name: None };

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("fields") {
            let content;
            syn::bracketed!(content in meta.input);
            let fields = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
            spec.fields.extend(fields.iter().map(LitStr::value));
        } else if meta.path.is_ident("unique") {
            spec.unique = true;
        } else if meta.path.is_ident("name") {
            let index_name: LitStr = meta.value()?.parse()?;
            spec.name = Some(index_name.value());
        } else {
            return Err(meta.error("unsupported #[mongo_index(...)] option"));
        }
        Ok(())
    })?;

    if spec.fields.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[mongo_index] needs at least one field"));
    }
    Ok(spec)
}

fn index_model_tokens(spec: &IndexSpec) -> TokenStream {
    let fields = &spec.fields;

    let mut options = quote! { ::mongodb::options::IndexOptions::builder() };
    if spec.unique {
        options = quote! { #options.unique(true) };
    }
    if let Some(index_name) = &spec.name {
        options = quote! { #options.name(#index_name.to_string()) };
    }

    quote! {
        {
            let mut keys = ::mongodb::bson::Document::new();
            #( keys.insert(#fields, 1i32); )*
            ::mongodb::IndexModel::builder()
                .keys(keys)
                .options(#options.build())
                .build()
        }
    }
}
