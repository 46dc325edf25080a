use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use std::collections::HashMap;
use syn::{parse_macro_input, FnArg, GenericArgument, Ident, ItemFn, LitStr, Pat, PathArguments, Type};

#[derive(Default)]
struct PromptAttributes {
    description: Option<String>,
    params: HashMap<String, String>,
    defaults: HashMap<String, LitStr>,
}

impl PromptAttributes {
    fn parse(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("description") {
            self.description = Some(meta.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else if meta.path.is_ident("params") {
            meta.parse_nested_meta(|param| {
                let name = param_name(&param)?;
                let description = param.value()?.parse::<LitStr>()?.value();
                self.params.insert(name, description);
                Ok(())
            })
        } else if meta.path.is_ident("defaults") {
            meta.parse_nested_meta(|param| {
                let name = param_name(&param)?;
                let value = param.value()?.parse::<LitStr>()?;
                self.defaults.insert(name, value);
                Ok(())
            })
        } else {
            Err(meta.error("unsupported prompt property"))
        }
    }
}

fn param_name(meta: &syn::meta::ParseNestedMeta) -> syn::Result<String> {
    meta.path
        .get_ident()
        .map(|ident| ident.to_string())
        .ok_or_else(|| meta.error("expected a parameter name"))
}

/// The `T` of an `Option<T>`, if `ty` is one.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn is_string(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "String"),
        _ => false,
    }
}

struct Param {
    ident: Ident,
    name: String,
    ty: Type,
    optional: bool,
    description: Option<String>,
    default: Option<LitStr>,
}

impl Param {
    fn argument(&self) -> TokenStream2 {
        let name = &self.name;
        let description = match (&self.description, &self.default) {
            (Some(desc), Some(default)) => {
                Some(format!("{} (default: \"{}\")", desc, default.value()))
            }
            (None, Some(default)) => Some(format!("(default: \"{}\")", default.value())),
            (desc, None) => desc.clone(),
        };
        let description = match description {
            Some(desc) => quote! { Some(#desc.to_string()) },
            None => quote! { None },
        };
        let required = !self.optional;
        quote! {
            ::folio::PromptArgument {
                name: #name.to_string(),
                description: #description,
                required: Some(#required),
            }
        }
    }

    /// Statement binding this parameter from the incoming arguments map.
    fn extraction(&self) -> TokenStream2 {
        let ident = &self.ident;
        let name = &self.name;
        let ty = &self.ty;
        let value_ty = option_inner(ty).unwrap_or(ty);

        // Yields `Option<value_ty>`, with a default substituted when one was declared.
        let lookup = if is_string(value_ty) {
            let default = self.default.as_ref().map(|lit| quote! { .or_else(|| Some(#lit.to_string())) });
            quote! {
                ::folio::__private::argument_text(&params, #name) #default
            }
        } else {
            let default = self.default.as_ref().map(|lit| {
                quote! {
                    .or_else(|| {
                        Some(
                            ::folio::__private::serde_json::from_str(#lit)
                                .unwrap_or_else(|_| ::folio::__private::serde_json::Value::String(#lit.to_string())),
                        )
                    })
                }
            });
            quote! {
                params
                    .get(#name)
                    .filter(|value| !value.is_null())
                    .cloned()
                    #default
                    .map(::folio::__private::serde_json::from_value::<#value_ty>)
                    .transpose()
                    .map_err(|e| {
                        ::folio::PromptError::InvalidParameters(format!("Invalid argument {}: {}", #name, e))
                    })?
            }
        };

        if self.optional {
            quote! { let #ident: #ty = #lookup; }
        } else {
            quote! {
                let #ident: #ty = match #lookup {
                    Some(value) => value,
                    None => {
                        return Err(::folio::PromptError::InvalidParameters(format!(
                            "Missing required argument: {}",
                            #name
                        )))
                    }
                };
            }
        }
    }
}

pub(crate) fn prompt(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut attrs = PromptAttributes::default();
    let parser = syn::meta::parser(|meta| attrs.parse(meta));
    parse_macro_input!(args with parser);

    let input_fn = parse_macro_input!(input as ItemFn);
    match expand(attrs, input_fn) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(mut attrs: PromptAttributes, input_fn: ItemFn) -> syn::Result<TokenStream2> {
    let fn_ident = &input_fn.sig.ident;
    let prompt_name = fn_ident.to_string();
    let struct_ident = Ident::new(&prompt_name.to_case(Case::Pascal), Span::call_site());
    let vis = &input_fn.vis;

    let mut params = Vec::new();
    for arg in &input_fn.sig.inputs {
        let FnArg::Typed(pat_type) = arg else {
            return Err(syn::Error::new_spanned(arg, "prompts cannot take `self`"));
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "prompt parameters must be plain identifiers",
            ));
        };
        let name = pat_ident.ident.to_string();
        params.push(Param {
            ident: pat_ident.ident.clone(),
            optional: option_inner(&pat_type.ty).is_some(),
            ty: (*pat_type.ty).clone(),
            description: attrs.params.remove(&name),
            default: attrs.defaults.remove(&name),
            name,
        });
    }

    if let Some(name) = attrs.params.keys().chain(attrs.defaults.keys()).next() {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("`{}` is not a parameter of `{}`", name, prompt_name),
        ));
    }

    let description = match &attrs.description {
        Some(desc) => quote! { Some(#desc) },
        None => quote! { None },
    };
    let arguments = if params.is_empty() {
        quote! { None }
    } else {
        let arguments = params.iter().map(Param::argument);
        quote! { Some(vec![#(#arguments),*]) }
    };
    let extractions = params.iter().map(Param::extraction);
    let idents = params.iter().map(|param| &param.ident);
    let await_output = input_fn.sig.asyncness.map(|_| quote! { .await });

    Ok(quote! {
        #input_fn

        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #struct_ident;

        #[::folio::__private::async_trait(?Send)]
        impl ::folio::PromptHandler for #struct_ident {
            fn name(&self) -> &'static str {
                #prompt_name
            }

            fn description(&self) -> Option<&'static str> {
                #description
            }

            fn arguments(&self) -> Option<Vec<::folio::PromptArgument>> {
                #arguments
            }

            #[allow(unused_variables)]
            async fn call(
                &self,
                params: ::std::collections::HashMap<String, ::folio::__private::serde_json::Value>,
            ) -> Result<Vec<::folio::PromptMessage>, ::folio::PromptError> {
                #(#extractions)*
                let output = #fn_ident(#(#idents),*) #await_output;
                ::folio::IntoPromptMessages::into_prompt_messages(output)
            }
        }
    })
}
