//! Projection of JSON Schema nodes onto TypeScript type expressions.

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{Map, Value};

use crate::error::{Error, Result, ResultExt};
use crate::naming::{component_schema_type_name, escape_string, property_key};
use crate::spec::{Components, Schema};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const MAX_SCHEMA_DEPTH: usize = 64;
const INDENT: &str = "    ";

/// Turns schema nodes into TypeScript type expressions.
///
/// Component references are checked against `components.schemas` so every
/// `ComponentSchema*` name the projector hands out is also declared.
#[derive(Debug, Clone, Copy)]
pub struct SchemaProjector<'a> {
    schemas: &'a IndexMap<String, Schema>,
}

impl<'a> SchemaProjector<'a> {
    pub fn new(components: &'a Components) -> Self {
        SchemaProjector {
            schemas: &components.schemas,
        }
    }

    pub fn project(&self, schema: &Schema) -> Result<String> {
        self.project_at(schema, 0)
    }

    fn project_at(&self, schema: &Schema, depth: usize) -> Result<String> {
        if depth > MAX_SCHEMA_DEPTH {
            return Err(Error::invalid_schema(format!(
                "schema nesting exceeds {MAX_SCHEMA_DEPTH} levels"
            )));
        }

        let node = schema
            .as_object()
            .ok_or_else(|| Error::invalid_schema(format!("expected a schema object: {schema}")))?;

        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            return self.component_reference(reference);
        }

        match node.get("type").and_then(Value::as_str) {
            Some("object") => self.object(node, depth),
            Some("array") => self.array(node, depth),
            Some("string") => string(node),
            Some("number" | "integer") => Ok("number".to_owned()),
            Some("boolean") => Ok("boolean".to_owned()),
            _ => Err(Error::invalid_schema(format!(
                "invalid type: {}",
                node.get("type").unwrap_or(&Value::Null)
            ))),
        }
    }

    fn component_reference(&self, reference: &str) -> Result<String> {
        let name = reference.strip_prefix(SCHEMA_REF_PREFIX).ok_or_else(|| {
            Error::UnsupportedReference {
                reference: reference.to_owned(),
                expected: SCHEMA_REF_PREFIX.to_owned(),
            }
        })?;

        if !self.schemas.contains_key(name) {
            return Err(Error::UnresolvedReference {
                section: "schemas",
                name: name.to_owned(),
            });
        }

        Ok(component_schema_type_name(name))
    }

    fn object(&self, node: &Map<String, Value>, depth: usize) -> Result<String> {
        let empty = Map::new();
        let properties = match node.get("properties") {
            None => &empty,
            Some(Value::Object(properties)) => properties,
            Some(other) => {
                return Err(Error::invalid_schema(format!(
                    "invalid properties: {other}"
                )))
            }
        };

        let index_signature = match node.get("additionalProperties") {
            None | Some(Value::Bool(false)) => None,
            Some(Value::Bool(true)) => Some("any".to_owned()),
            Some(Value::String(s)) if s.is_empty() => Some("any".to_owned()),
            Some(Value::Object(map)) if map.is_empty() => Some("any".to_owned()),
            Some(schema @ Value::Object(_)) => Some(
                self.project_at(schema, depth + 1)
                    .context(|| "additionalProperties")?,
            ),
            Some(other) => {
                return Err(Error::invalid_schema(format!(
                    "invalid additionalProperties: {other}"
                )))
            }
        };

        if properties.is_empty() && index_signature.is_none() {
            return Err(Error::invalid_schema(
                "missing properties or additionalProperties",
            ));
        }

        let required = required_properties(node)?;

        let mut lines = vec!["{".to_owned()];
        for (name, property) in properties.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            if !property.is_object() {
                return Err(Error::invalid_schema(format!(
                    "invalid property schema: {property}"
                )));
            }

            let property_type = self
                .project_at(property, depth + 1)
                .context(|| format!("property {name}"))?;
            let optional = if required.contains(&name.as_str()) {
                ""
            } else {
                "?"
            };

            if let Some(doc) = schema_doc_comment(property) {
                lines.push(format!("{INDENT}{doc}"));
            }
            lines.push(format!(
                "{INDENT}{}{optional}: {};",
                property_key(name),
                indent_continuation(&property_type, INDENT)
            ));
        }

        if let Some(value_type) = index_signature {
            lines.push(format!(
                "{INDENT}[key: string]: {};",
                indent_continuation(&value_type, INDENT)
            ));
        }

        lines.push("}".to_owned());
        Ok(lines.join("\n"))
    }

    fn array(&self, node: &Map<String, Value>, depth: usize) -> Result<String> {
        let items = node
            .get("items")
            .filter(|items| items.is_object())
            .ok_or_else(|| {
                Error::invalid_schema(format!(
                    "missing items: {}",
                    node.get("items").unwrap_or(&Value::Null)
                ))
            })?;

        let item_type = self.project_at(items, depth + 1)?;
        if is_literal_union(items) {
            Ok(format!("({item_type})[]"))
        } else {
            Ok(format!("{item_type}[]"))
        }
    }
}

fn string(node: &Map<String, Value>) -> Result<String> {
    let Some(Value::Array(values)) = node.get("enum") else {
        return Ok("string".to_owned());
    };

    if values.is_empty() {
        return Ok("never".to_owned());
    }

    let literals = values
        .iter()
        .map(|value| {
            value.as_str().map(string_literal).ok_or_else(|| {
                Error::invalid_schema(format!("expected enum value to be a string: {value}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(literals.join(" | "))
}

/// A string enum with more than one member projects to a bare union, which
/// needs parentheses before `[]`.
fn is_literal_union(schema: &Schema) -> bool {
    schema.get("$ref").is_none()
        && schema.get("type").and_then(Value::as_str) == Some("string")
        && schema
            .get("enum")
            .and_then(Value::as_array)
            .is_some_and(|values| values.len() > 1)
}

fn string_literal(value: &str) -> String {
    format!("'{}'", escape_string(value, '\''))
}

fn required_properties(node: &Map<String, Value>) -> Result<Vec<&str>> {
    let Some(Value::Array(required)) = node.get("required") else {
        return Ok(Vec::new());
    };

    required
        .iter()
        .map(|name| {
            name.as_str()
                .ok_or_else(|| Error::InvalidRequired(name.clone()))
        })
        .collect()
}

/// Indents every line but the first, so a multi-line type can be placed after
/// a key that already sits at `indent`.
pub(crate) fn indent_continuation(text: &str, indent: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_owned()
            } else {
                format!("{indent}{line}")
            }
        })
        .join("\n")
}

/// Single-line JSDoc built from a description and an example.
pub fn doc_comment(description: Option<&str>, example: Option<&str>) -> Option<String> {
    let description = description.map(comment_text).filter(|d| !d.is_empty());
    let example = example.map(comment_text).filter(|e| !e.is_empty());

    match (description, example) {
        (Some(description), Some(example)) => {
            Some(format!("/** {description}; Example: {example} */"))
        }
        (Some(description), None) => Some(format!("/** {description} */")),
        (None, Some(example)) => Some(format!("/** Example: {example} */")),
        (None, None) => None,
    }
}

pub fn schema_doc_comment(schema: &Schema) -> Option<String> {
    doc_comment(
        schema.get("description").and_then(Value::as_str),
        schema.get("example").and_then(Value::as_str),
    )
}

fn comment_text(text: &str) -> String {
    text.split_whitespace().join(" ").replace("*/", "*\\/")
}
