//! Template generation code for Config derive macro.

use proc_macro2::TokenStream;
use quote::quote;

use super::FieldInfo;

/// Generate template code (TokenStream) for fields.
pub fn generate_template_code(fields: &[FieldInfo]) -> TokenStream {
    let codes = fields.iter().map(generate_field_template_code);
    quote! { #(#codes)* }
}

/// Generate TOML template code for a single field.
fn generate_field_template_code(info: &FieldInfo) -> TokenStream {
    let field_name = &info.name;
    let toml_name = &info.toml_name;

    let doc_code = match &info.doc {
        Some(doc) => {
            let doc_str: String = doc.lines().map(|l| format!("# {}\n", l.trim())).collect();
            quote! { out.push_str(#doc_str); }
        }
        None => quote! {},
    };

    let ty = &info.ty;
    let ty_str = quote!(#ty).to_string().replace(' ', "");

    // Optional fields without an explicit default stay commented out
    if ty_str.starts_with("Option<") && info.default.is_none() {
        let line = format!("# {} = \"\"\n", toml_name);
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    if let Some(default_val) = &info.default {
        let line = format!("{} = {}\n", toml_name, format_default(default_val, &ty_str));
        return quote! {
            #doc_code
            out.push_str(#line);
        };
    }

    quote! {
        #doc_code
        out.push_str(#toml_name);
        out.push_str(" = ");
        out.push_str(&toml::Value::try_from(default.#field_name.clone())
            .map(|v| v.to_string())
            .unwrap_or_default());
        out.push('\n');
    }
}

/// Quote string-like defaults, leave numbers and booleans bare.
fn format_default(value: &str, ty: &str) -> String {
    match ty {
        "bool" | "u8" | "u16" | "u32" | "u64" | "usize" | "i8" | "i16" | "i32" | "i64"
        | "isize" | "f32" | "f64" => value.to_string(),
        _ => format!("\"{}\"", value),
    }
}
