//! In-memory OpenAPI 3.1 document.
//!
//! Only the parts of the document the generator touches are modelled. Schemas
//! stay untyped [`serde_json::Value`] trees so the projector can report what
//! exactly is wrong with a node instead of failing the whole parse.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use openapiv3::ReferenceOr;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Untyped JSON Schema node.
pub type Schema = serde_json::Value;

/// Root of a parsed OpenAPI document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenApi {
    #[serde(default)]
    pub openapi: Option<String>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

impl OpenApi {
    /// Reads a document from disk, picking the parser from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let parse: fn(&str) -> Result<Self> = match path.extension().and_then(|ext| ext.to_str())
        {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => return Err(Error::UnsupportedFormat(path.to_path_buf())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded openapi document");

        parse(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, Schema>,
    #[serde(default)]
    pub parameters: IndexMap<String, ReferenceOr<Parameter>>,
    #[serde(default)]
    pub request_bodies: IndexMap<String, ReferenceOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, ReferenceOr<Response>>,
}

/// HTTP methods an operation can be bound to, in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    pub const ALL: [Method; 8] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Patch,
        Method::Trace,
    ];

    /// Uppercase method token, as used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations defined for one URL template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    /// Parameters shared by every operation of the path.
    #[serde(default)]
    pub parameters: Vec<Option<ReferenceOr<Parameter>>>,
}

impl PathItem {
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        match method {
            Method::Get => self.get.as_ref(),
            Method::Put => self.put.as_ref(),
            Method::Post => self.post.as_ref(),
            Method::Delete => self.delete.as_ref(),
            Method::Options => self.options.as_ref(),
            Method::Head => self.head.as_ref(),
            Method::Patch => self.patch.as_ref(),
            Method::Trace => self.trace.as_ref(),
        }
    }

    pub fn operations(&self) -> MethodsIterator<'_> {
        MethodsIterator::new(self)
    }
}

/// Walks the operations of a [`PathItem`] in [`Method::ALL`] order, skipping
/// empty slots.
pub struct MethodsIterator<'a> {
    path_item: &'a PathItem,
    step: usize,
}

impl<'a> MethodsIterator<'a> {
    fn new(path_item: &'a PathItem) -> Self {
        MethodsIterator { path_item, step: 0 }
    }
}

impl<'a> Iterator for MethodsIterator<'a> {
    type Item = (Method, &'a Operation);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&method) = Method::ALL.get(self.step) {
            self.step = self.step.saturating_add(1);
            if let Some(operation) = self.path_item.operation(method) {
                return Some((method, operation));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// A `null` entry is kept so it can be reported instead of dropped.
    #[serde(default)]
    pub parameters: Vec<Option<ReferenceOr<Parameter>>>,
    /// `None` when the key is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    pub request_body: Option<Option<ReferenceOr<RequestBody>>>,
    /// Status code (or `default`) to response.
    #[serde(default)]
    pub responses: Option<IndexMap<String, ReferenceOr<Response>>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub const ALL: [ParameterLocation; 4] = [
        ParameterLocation::Path,
        ParameterLocation::Query,
        ParameterLocation::Header,
        ParameterLocation::Cookie,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub example: Option<serde_json::Value>,
    #[serde(default)]
    pub schema: Schema,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Schema,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn methods_iterate_in_fixed_order() {
        let item: PathItem = serde_json::from_value(json!({
            "trace": { "responses": {} },
            "post": { "responses": {} },
            "get": { "responses": {} },
        }))
        .unwrap();

        let methods: Vec<_> = item.operations().map(|(method, _)| method).collect();
        assert_eq!(methods, vec![Method::Get, Method::Post, Method::Trace]);
    }

    #[test]
    fn request_body_distinguishes_null_from_absent() {
        let absent: Operation = serde_json::from_value(json!({ "responses": {} })).unwrap();
        assert!(absent.request_body.is_none());

        let null: Operation =
            serde_json::from_value(json!({ "requestBody": null, "responses": {} })).unwrap();
        assert!(matches!(null.request_body, Some(None)));

        let reference: Operation = serde_json::from_value(json!({
            "requestBody": { "$ref": "#/components/requestBodies/NewUser" },
            "responses": {}
        }))
        .unwrap();
        assert!(matches!(
            reference.request_body,
            Some(Some(ReferenceOr::Reference { .. }))
        ));
    }

    #[test]
    fn null_parameter_entries_are_kept() {
        let operation: Operation = serde_json::from_value(json!({
            "parameters": [
                null,
                { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
            ]
        }))
        .unwrap();

        assert!(operation.parameters[0].is_none());
        assert!(operation.responses.is_none());
        match &operation.parameters[1] {
            Some(ReferenceOr::Item(parameter)) => {
                assert_eq!(parameter.name, "id");
                assert_eq!(parameter.location, ParameterLocation::Path);
                assert!(parameter.required);
            }
            other => panic!("unexpected parameter: {other:?}"),
        }
    }

    #[test]
    fn yaml_documents_parse() {
        let spec = OpenApi::from_yaml_str(
            r#"
openapi: 3.1.0
paths:
  /ping:
    get:
      responses:
        "200":
          description: pong
components:
  schemas:
    Pet:
      type: object
      additionalProperties: ""
"#,
        )
        .unwrap();

        assert_eq!(spec.openapi.as_deref(), Some("3.1.0"));
        assert!(spec.paths["/ping"].get.is_some());
        assert_eq!(spec.components.schemas["Pet"]["additionalProperties"], json!(""));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = OpenApi::from_path("api.txt").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
