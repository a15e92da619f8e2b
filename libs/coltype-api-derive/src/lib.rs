use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Ident, LitStr, Type};

/// Derive the option schema of a user type adapter.
///
/// Adds to the annotated struct:
///
/// - `config_params()`: the `ConfigParam` list handed to `parse_options`.
/// - `from_config(&ConfigValues)`: typed options read back after parsing.
///
/// Options the mapping leaves out keep the struct's `Default` value, which is
/// also what `config_params()` advertises as the default.
///
/// ```ignore
/// #[derive(ConfigParams)]
/// pub struct BooleanOptions {
///     #[param(name = "trueValue", description = "Column token stored for true")]
///     pub true_value: String,
///
///     #[param(name = "ignoreCase", description = "Compare tokens ignoring case")]
///     pub ignore_case: bool,
/// }
/// ```
///
/// The option key is the field name unless `name` is given. `required`
/// options advertise no default. Fields are `bool` or `String`.
#[proc_macro_derive(ConfigParams, attributes(param))]
pub fn derive_config_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy)]
enum OptionKind {
    Flag,
    Text,
}

struct OptionField<'a> {
    ident: &'a Ident,
    key: String,
    description: String,
    required: bool,
    kind: OptionKind,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ConfigParams: adapter options must be a struct",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ConfigParams: adapter options need named fields",
        ));
    };

    let options = named
        .named
        .iter()
        .map(option_field)
        .collect::<syn::Result<Vec<_>>>()?;

    let declarations = options.iter().map(declaration);
    let readers = options.iter().map(reader);
    let name = &input.ident;

    Ok(quote! {
        impl #name {
            pub fn config_params() -> Vec<coltype_api::config::ConfigParam> {
                let defaults = <Self as Default>::default();
                let _ = &defaults;
                vec![#(#declarations),*]
            }

            pub fn from_config(
                values: &coltype_api::config::ConfigValues,
            ) -> Result<Self, coltype_api::error::AdapterError> {
                let mut options = <Self as Default>::default();
                #(#readers)*
                Ok(options)
            }
        }
    })
}

fn option_field(field: &Field) -> syn::Result<OptionField<'_>> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "ConfigParams: unnamed field"))?;

    let mut key = None;
    let mut description = None;
    let mut required = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("param")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                key = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("description") {
                description = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("required") {
                required = true;
            } else {
                return Err(meta.error("expected `name`, `description` or `required`"));
            }
            Ok(())
        })?;
    }

    let description = description.ok_or_else(|| {
        syn::Error::new_spanned(ident, "adapter option needs #[param(description = \"...\")]")
    })?;

    Ok(OptionField {
        ident,
        key: key.unwrap_or_else(|| ident.to_string()),
        description,
        required,
        kind: option_kind(&field.ty)?,
    })
}

fn option_kind(ty: &Type) -> syn::Result<OptionKind> {
    let last = match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    };
    match last.as_deref() {
        Some("bool") => Ok(OptionKind::Flag),
        Some("String") => Ok(OptionKind::Text),
        _ => Err(syn::Error::new_spanned(
            ty,
            "adapter option fields must be `bool` or `String`",
        )),
    }
}

fn declaration(option: &OptionField<'_>) -> TokenStream2 {
    let OptionField {
        ident,
        key,
        description,
        required,
        kind,
    } = option;

    let (param_type, default_value) = match kind {
        OptionKind::Flag => (
            quote! { coltype_api::config::ParamType::Bool },
            quote! { coltype_api::config::ParamValue::Bool(defaults.#ident) },
        ),
        OptionKind::Text => (
            quote! { coltype_api::config::ParamType::Str },
            quote! { coltype_api::config::ParamValue::Str(defaults.#ident.clone()) },
        ),
    };
    let default = if *required {
        quote! { None }
    } else {
        quote! { Some(#default_value) }
    };

    quote! {
        coltype_api::config::ConfigParam {
            name: #key.to_string(),
            param_type: #param_type,
            required: #required,
            default: #default,
            description: #description.to_string(),
        }
    }
}

fn reader(option: &OptionField<'_>) -> TokenStream2 {
    let OptionField {
        ident,
        key,
        required,
        kind,
        ..
    } = option;

    let read = match kind {
        OptionKind::Flag => quote! { values.get_bool(#key) },
        OptionKind::Text => quote! { values.get_str(#key).map(str::to_string) },
    };

    if *required {
        quote! {
            options.#ident = #read.ok_or_else(|| {
                coltype_api::error::AdapterError::config(
                    concat!("adapter option '", #key, "' is required"),
                )
            })?;
        }
    } else {
        quote! {
            if let Some(value) = #read {
                options.#ident = value;
            }
        }
    }
}
