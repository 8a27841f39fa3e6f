//! Identifiers derived from endpoints and component names.

use std::fmt;

use heck::ToUpperCamelCase;

use crate::spec::Method;


/// Uppercases the first character and leaves the remainder untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pascal case of a method token, `GET` -> `Get`.
pub fn pascalize(token: &str) -> String {
    token.to_upper_camel_case()
}

/// `/pet/{petId}/upload-image` -> `PetPetIdUploadimage`
///
/// Anything that cannot appear in an identifier is dropped.
pub fn path_to_ident(path: &str) -> String {
    path.chars()
        .filter(|&c| c == '/' || is_identifier_char(c))
        .collect::<String>()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

pub fn component_schema_type_name(name: &str) -> String {
    format!("ComponentSchema{}", capitalize(name))
}

pub fn lookup_type_name(method: Method) -> String {
    format!("{}TypesLookup", pascalize(method.as_str()))
}

/// One `(method, path)` pair; every per-operation type name hangs off it.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub method: Method,
    pub path: &'a str,
}

impl<'a> Endpoint<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Endpoint { method, path }
    }

    pub fn ident(&self) -> String {
        format!(
            "{}{}",
            pascalize(self.method.as_str()),
            path_to_ident(self.path)
        )
    }

    pub fn param_type_name(&self) -> String {
        format!("Param{}", self.ident())
    }

    pub fn body_type_name(&self) -> String {
        format!("Body{}", self.ident())
    }

    pub fn request_type_name(&self) -> String {
        format!("Request{}", self.ident())
    }

    pub fn response_data_type_name(&self) -> String {
        format!("ResponseData{}", self.ident())
    }

    pub fn response_error_type_name(&self) -> String {
        format!("ResponseError{}", self.ident())
    }
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `name` can be used as a bare property key.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Body of a TypeScript string literal delimited by `quote`. Line terminators
/// and other control characters are written as escapes so the literal stays on
/// one line.
pub fn escape_string(value: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c if c == quote => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Double-quoted TypeScript string literal.
pub fn quote_string(value: &str) -> String {
    format!("\"{}\"", escape_string(value, '"'))
}

/// Property key as it must be written in an object type.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_owned()
    } else {
        quote_string(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_keeps_the_tail() {
        assert_eq!(capitalize("petStore"), "PetStore");
        assert_eq!(capitalize("USER"), "USER");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn pascalize_method_tokens() {
        assert_eq!(pascalize("GET"), "Get");
        assert_eq!(pascalize("OPTIONS"), "Options");
        assert_eq!(pascalize("delete"), "Delete");
    }

    #[test]
    fn path_to_ident_strips_and_capitalizes() {
        assert_eq!(path_to_ident("/ping"), "Ping");
        assert_eq!(path_to_ident("/pet/{id}"), "PetId");
        assert_eq!(path_to_ident("/store/order/{orderId}"), "StoreOrderOrderId");
        assert_eq!(path_to_ident("/a-b/c.d/~e%f"), "AbCdEf");
        assert_eq!(path_to_ident("/"), "");
        assert_eq!(path_to_ident(r#"/a"b\c/d e"#), "AbcDe");
    }

    #[test]
    fn endpoint_names() {
        let endpoint = Endpoint::new(Method::Get, "/pet/{id}");
        assert_eq!(endpoint.ident(), "GetPetId");
        assert_eq!(endpoint.param_type_name(), "ParamGetPetId");
        assert_eq!(endpoint.body_type_name(), "BodyGetPetId");
        assert_eq!(endpoint.request_type_name(), "RequestGetPetId");
        assert_eq!(endpoint.response_data_type_name(), "ResponseDataGetPetId");
        assert_eq!(endpoint.response_error_type_name(), "ResponseErrorGetPetId");
        assert_eq!(endpoint.to_string(), "GET /pet/{id}");
    }

    #[test]
    fn lookup_and_component_names() {
        assert_eq!(lookup_type_name(Method::Patch), "PatchTypesLookup");
        assert_eq!(component_schema_type_name("user"), "ComponentSchemaUser");
    }

    #[test]
    fn property_keys_are_quoted_when_needed() {
        assert_eq!(property_key("petId"), "petId");
        assert_eq!(property_key("$ref"), "$ref");
        assert_eq!(property_key("X-Request-ID"), "\"X-Request-ID\"");
        assert_eq!(property_key("2fa"), "\"2fa\"");
        assert_eq!(property_key("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(property_key("line\nbreak"), r#""line\nbreak""#);
    }

    #[test]
    fn escape_string_keeps_literals_on_one_line() {
        assert_eq!(escape_string("it's", '\''), r"it\'s");
        assert_eq!(escape_string("it's", '"'), "it's");
        assert_eq!(escape_string("a\r\n\tb", '\''), r"a\r\n\tb");
        assert_eq!(escape_string("x\u{2028}y\u{2029}", '\''), r"x\u2028y\u2029");
        assert_eq!(escape_string("\u{0}\u{1b}\u{7f}", '\''), r"\u0000\u001b\u007f");
        assert_eq!(escape_string("caf\u{e9}", '\''), "caf\u{e9}");
    }

    #[test]
    fn quote_string_escapes_paths() {
        assert_eq!(quote_string("/pet/{id}"), "\"/pet/{id}\"");
        assert_eq!(quote_string(r#"/a"b\c"#), r#""/a\"b\\c""#);
    }
}
