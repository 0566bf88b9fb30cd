use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, FnArg, GenericArgument, ItemFn, LitStr, PathArguments, ReturnType, Type,
};

/// Last path segment of `ty` when it is named `name`, with its single type
/// argument.
fn single_type_argument<'a>(ty: &'a Type, name: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Extracts `H` from `Option<&RefBox<Option<H>>>`.
fn forwarded_handle_type(ty: &Type) -> Option<&Type> {
    let reference = single_type_argument(ty, "Option")?;
    let Type::Reference(reference) = reference else {
        return None;
    };
    if reference.mutability.is_some() {
        return None;
    }
    let slot = single_type_argument(&reference.elem, "RefBox")?;
    single_type_argument(slot, "Option")
}

fn typed_inputs(func: &ItemFn) -> syn::Result<Vec<&Type>> {
    func.sig
        .inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Typed(pat_type) => Ok(pat_type.ty.as_ref()),
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "#[component] functions cannot take self",
            )),
        })
        .collect()
}

fn expand(name: Option<LitStr>, func: ItemFn) -> syn::Result<TokenStream2> {
    let sig = &func.sig;
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "#[component] functions cannot be generic",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "#[component] functions cannot be async",
        ));
    }

    let inputs = typed_inputs(&func)?;
    if inputs.len() > 2 {
        return Err(syn::Error::new_spanned(
            &sig.inputs,
            "#[component] functions take at most props and a forwarded ref",
        ));
    }

    let props_ty = match inputs.first() {
        None => quote! { () },
        Some(Type::Reference(reference)) if reference.mutability.is_none() => {
            let elem = &reference.elem;
            quote! { #elem }
        }
        Some(other) => {
            return Err(syn::Error::new_spanned(
                other,
                "#[component] props must be taken by shared reference, e.g. `props: &Props`",
            ));
        }
    };

    let handle_ty = match inputs.get(1) {
        None => quote! { () },
        Some(ty) => match forwarded_handle_type(ty) {
            Some(handle) => quote! { #handle },
            None => {
                return Err(syn::Error::new_spanned(
                    ty,
                    "#[component] forwarded ref must be `Option<&RefBox<Option<H>>>`",
                ));
            }
        },
    };

    let output_ty = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    let ident = &sig.ident;
    let vis = &func.vis;
    let factory = format_ident!("{}_component", ident);
    let name = name.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let call = match inputs.len() {
        0 => quote! { #ident() },
        1 => quote! { #ident(__props) },
        _ => quote! { #ident(__props, __forwarded) },
    };
    let doc = format!("Wraps [`{ident}`] for the class-component host.");

    Ok(quote! {
        #func

        #[doc = #doc]
        #vis fn #factory() -> ::retrohooks_core::HookComponent<#props_ty, #output_ty, #handle_ty> {
            ::retrohooks_core::with_hooks_named(
                #name,
                |__props: &#props_ty,
                 __forwarded: ::core::option::Option<
                    &::retrohooks_core::RefBox<::core::option::Option<#handle_ty>>,
                >| {
                    let _ = (&__props, &__forwarded);
                    #call
                },
            )
        }
    })
}

/// Turns a hook-using render function into a component factory.
///
/// Alongside the function, generates `<name>_component()` returning a
/// `HookComponent` that the class-component host can mount. The function
/// takes its props by shared reference and may take the forwarded ref as a
/// second argument:
///
/// ```ignore
/// #[component]
/// fn counter(step: &i32) -> i32 {
///     let (count, _) = use_state_value(0);
///     count + step
/// }
///
/// let component = counter_component();
/// ```
///
/// `#[component("Name")]` overrides the name used in `WithHooks(Name)`.
#[proc_macro_attribute]
pub fn component(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_tokens = TokenStream2::from(attr);
    let name = if attr_tokens.is_empty() {
        None
    } else {
        match syn::parse2::<LitStr>(attr_tokens) {
            Ok(name) => Some(name),
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let func = parse_macro_input!(item as ItemFn);
    match expand(name, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
