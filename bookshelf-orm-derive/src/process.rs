use deluxe::ExtractAttributes;
use proc_macro2::TokenStream;
use quote::quote;

pub struct Output {
    pub primary_key: Option<TokenStream>,
    pub default_fields: Vec<TokenStream>,
    pub schema_fields: Vec<String>,
    pub create_args: Vec<TokenStream>,
    pub update_args: Vec<TokenStream>,
}

pub fn process_fields(fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>) -> Output {
    let mut primary_key = None;
    let mut default_fields = Vec::new();
    let mut schema_fields = Vec::new();

    let mut create_args = Vec::new();
    let mut update_args = Vec::new();

    for field in fields {
        let attributes = ModelField::extract_attributes(&mut field.clone()).unwrap_or_default();
        let field_name = field.ident.as_ref().expect("named field");
        let field_type = &field.ty;
        let inner_type = extract_inner_type(field_type);

        if attributes.primary_key.unwrap_or(false) {
            primary_key = Some(quote! { #field_name });
            // generated keys are left to the database
            if !attributes.auto.unwrap_or(false) && inner_type != "Serial" {
                create_args.push(quote! { #field_name });
            }
        } else {
            create_args.push(quote! { #field_name });
            update_args.push(quote! { #field_name });
        }

        schema_fields.push(generate_field_schema(&attributes, field_name, field_type));
        default_fields.push(generate_default_field(&attributes.default, field_name, field_type));
    }

    Output {
        primary_key,
        default_fields,
        schema_fields,
        create_args,
        update_args,
    }
}

#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(field))]
struct ModelField {
    primary_key: Option<bool>,
    auto: Option<bool>,
    unique: Option<bool>,
    size: Option<usize>,
    default: Option<TokenStream>,
}

fn generate_field_schema(
    attributes: &ModelField,
    field_name: &syn::Ident,
    field_type: &syn::Type,
) -> String {
    let inner_type = extract_inner_type(field_type);

    let mut parts = vec![field_name.to_string(), construct_sql_type(&inner_type, attributes.size)];
    if attributes.primary_key.unwrap_or(false) {
        parts.push("primary key".to_string());
        if attributes.auto.unwrap_or(false) && inner_type != "Serial" {
            parts.push("autoincrement".to_string());
        }
    }
    if attributes.unique.unwrap_or(false) {
        parts.push("unique".to_string());
    }
    if let Some(default) = construct_default_sql_value(&attributes.default, &inner_type) {
        parts.push(default);
    }
    if !is_nullable(field_type) {
        parts.push("not null".to_string());
    }
    parts.join(" ")
}

fn construct_sql_type(inner_type: &str, size: Option<usize>) -> String {
    match inner_type {
        "Text" => "text".to_string(),
        "Serial" => "serial".to_string(),
        "Integer" => "integer".to_string(),
        "String" => format!("varchar({})", size.unwrap_or(255)),
        other => panic!(
            "Unsupported type: {}, only 'Text' 'String' 'Serial' 'Integer' are available!",
            other
        ),
    }
}

fn is_nullable(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Path(type_path) if type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"))
}

fn default_literal(default: &TokenStream) -> String {
    default.to_string().replace('"', "")
}

// Default for SQL
fn construct_default_sql_value(default: &Option<TokenStream>, inner_type: &str) -> Option<String> {
    let value = default_literal(default.as_ref()?);
    Some(match inner_type {
        "Integer" | "Serial" => {
            if value.parse::<i64>().is_err() {
                panic!("Invalid integer default value: {value}");
            }
            format!("default {value}")
        }
        _ => format!("default '{}'", value.replace('\'', "''")),
    })
}

// Default for Rust `Default` impl
fn generate_default_field(
    default: &Option<TokenStream>,
    field_name: &syn::Ident,
    field_type: &syn::Type,
) -> TokenStream {
    let inner_type = extract_inner_type(field_type);
    let nullable = is_nullable(field_type);

    let default_value = match default {
        Some(value) => {
            let value = default_literal(value);
            match inner_type.as_str() {
                "Integer" | "Serial" => {
                    let number: i32 = value
                        .parse()
                        .unwrap_or_else(|_| panic!("Invalid integer default value: {value}"));
                    if nullable {
                        quote! { Some(#number) }
                    } else {
                        quote! { #number }
                    }
                }
                _ if nullable => quote! { Some(#value.into()) },
                _ => quote! { #value.into() },
            }
        }
        None if nullable => quote! { None },
        None => match inner_type.as_str() {
            "Serial" | "Integer" => quote! { 0 },
            "String" | "Text" => quote! { String::default() },
            _ => panic!("Unsupported type for default value"),
        },
    };

    quote! { #field_name: #default_value }
}

fn extract_inner_type(field_type: &syn::Type) -> String {
    if let syn::Type::Path(type_path) = field_type {
        if let Some(path_segment) = type_path.path.segments.last() {
            if path_segment.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &path_segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return extract_inner_type(inner_type);
                    }
                }
            }
            return path_segment.ident.to_string();
        }
    }
    panic!("Invalid type")
}
