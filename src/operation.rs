//! Request and response types for a single operation.

use indexmap::IndexMap;
use itertools::Itertools;
use openapiv3::ReferenceOr;

use crate::error::{Error, Result, ResultExt};
use crate::naming::{property_key, Endpoint};
use crate::resolve::resolve;
use crate::schema::{doc_comment, indent_continuation, SchemaProjector};
use crate::spec::{
    Components, MediaType, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    Response,
};

/// Media types tried in order before falling back to the first declared one.
pub const PREFERRED_MEDIA_TYPES: [&str; 4] = [
    "application/json",
    "multipart/form-data",
    "application/x-www-form-urlencoded",
    "application/octet-stream",
];

const DATA_STATUS_PREFIXES: &[&str] = &["2"];
const ERROR_STATUS_PREFIXES: &[&str] = &["4", "5"];
const DEFAULT_RESPONSE: &str = "default";

#[derive(Debug, Clone)]
pub struct ParamInfo<'a> {
    pub type_name: String,
    pub required: bool,
    pub included: bool,
    pub resolved: Vec<&'a Parameter>,
}

#[derive(Debug, Clone)]
pub struct BodyInfo<'a> {
    pub type_name: String,
    pub required: bool,
    pub included: bool,
    pub resolved: Option<&'a RequestBody>,
}

/// Everything emitted for one operation.
#[derive(Debug, Clone)]
pub struct OperationTypes {
    pub lines: Vec<String>,
    /// Whether callers must pass an `init` argument.
    pub init_required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSynthesizer<'a> {
    components: &'a Components,
    projector: SchemaProjector<'a>,
}

impl<'a> OperationSynthesizer<'a> {
    pub fn new(components: &'a Components) -> Self {
        OperationSynthesizer {
            components,
            projector: SchemaProjector::new(components),
        }
    }

    /// Param, body, request, data response and error response types, in that
    /// order.
    pub fn synthesize(
        &self,
        endpoint: Endpoint<'_>,
        path_item: &'a PathItem,
        operation: &'a Operation,
    ) -> Result<OperationTypes> {
        let params = self.param_info(endpoint, path_item, operation)?;
        let body = self.body_info(endpoint, operation)?;

        let mut lines = self.param_type(endpoint, &params)?;
        lines.extend(self.body_type(endpoint, &body)?);
        lines.push(request_type(endpoint, &params, &body));
        lines.push(self.response_type(
            endpoint,
            operation,
            DATA_STATUS_PREFIXES,
            endpoint.response_data_type_name(),
        )?);
        lines.push(self.response_type(
            endpoint,
            operation,
            ERROR_STATUS_PREFIXES,
            endpoint.response_error_type_name(),
        )?);

        tracing::debug!(
            %endpoint,
            params = params.resolved.len(),
            params_required = params.required,
            body = body.included,
            body_required = body.required,
            "synthesized operation types"
        );

        Ok(OperationTypes {
            lines,
            init_required: params.required || body.required,
        })
    }

    /// Resolves path-level and operation-level parameters. An operation
    /// parameter replaces the path-level one with the same name and location.
    pub fn param_info(
        &self,
        endpoint: Endpoint<'_>,
        path_item: &'a PathItem,
        operation: &'a Operation,
    ) -> Result<ParamInfo<'a>> {
        let mut resolved: Vec<&'a Parameter> = Vec::new();
        for entry in &path_item.parameters {
            resolved.push(self.resolve_parameter(entry).context(|| endpoint.to_string())?);
        }

        for entry in &operation.parameters {
            let parameter = self.resolve_parameter(entry).context(|| endpoint.to_string())?;
            match resolved
                .iter_mut()
                .find(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(slot) => *slot = parameter,
                None => resolved.push(parameter),
            }
        }

        Ok(ParamInfo {
            type_name: endpoint.param_type_name(),
            required: resolved.iter().any(|p| p.required),
            included: !resolved.is_empty(),
            resolved,
        })
    }

    fn resolve_parameter(
        &self,
        entry: &'a Option<ReferenceOr<Parameter>>,
    ) -> Result<&'a Parameter> {
        let entry = entry.as_ref().ok_or(Error::NilParameter)?;
        resolve(self.components, entry)
    }

    pub fn body_info(
        &self,
        endpoint: Endpoint<'_>,
        operation: &'a Operation,
    ) -> Result<BodyInfo<'a>> {
        let resolved = match &operation.request_body {
            None => None,
            Some(None) => return Err(Error::NilRequestBody).context(|| endpoint.to_string()),
            Some(Some(body)) => {
                Some(resolve(self.components, body).context(|| endpoint.to_string())?)
            }
        };

        Ok(BodyInfo {
            type_name: endpoint.body_type_name(),
            required: resolved.is_some_and(|body| body.required),
            included: resolved.is_some(),
            resolved,
        })
    }

    /// `type Param<ident> = { ... };` grouped by parameter location.
    pub fn param_type(&self, endpoint: Endpoint<'_>, info: &ParamInfo<'a>) -> Result<Vec<String>> {
        if !info.included {
            return Ok(Vec::new());
        }

        let mut lines = vec![format!("type {} = {{", info.type_name)];
        for location in ParameterLocation::ALL {
            let group = info
                .resolved
                .iter()
                .filter(|p| p.location == location)
                .collect_vec();
            if group.is_empty() {
                continue;
            }

            let group_required = group.iter().any(|p| p.required);
            lines.push(format!(
                "    {}{}: {{",
                location.as_str(),
                optional_marker(group_required)
            ));
            for parameter in group {
                let parameter_type = self.projector.project(&parameter.schema).context(|| {
                    format!(
                        "{endpoint}, {} {} parameter {}",
                        info.type_name,
                        location.as_str(),
                        parameter.name
                    )
                })?;

                let example = parameter.example.as_ref().and_then(|e| e.as_str());
                if let Some(doc) = doc_comment(parameter.description.as_deref(), example) {
                    lines.push(format!("        {doc}"));
                }
                lines.push(format!(
                    "        {}{}: {};",
                    property_key(&parameter.name),
                    optional_marker(parameter.required),
                    indent_continuation(&parameter_type, "        ")
                ));
            }
            lines.push("    };".to_owned());
        }
        lines.push("};".to_owned());

        Ok(lines)
    }

    /// `type Body<ident> = ...;` from the preferred media type.
    pub fn body_type(&self, endpoint: Endpoint<'_>, info: &BodyInfo<'a>) -> Result<Vec<String>> {
        let Some(body) = info.resolved else {
            return Ok(Vec::new());
        };

        let (media_type, content) = preferred_content(&body.content)
            .ok_or(Error::MissingContent)
            .context(|| format!("{endpoint}, {}", info.type_name))?;
        let body_type = self
            .projector
            .project(&content.schema)
            .context(|| format!("{endpoint}, {} ({media_type})", info.type_name))?;

        Ok(vec![format!("type {} = {};", info.type_name, body_type)])
    }

    fn response_type(
        &self,
        endpoint: Endpoint<'_>,
        operation: &'a Operation,
        prefixes: &[&str],
        type_name: String,
    ) -> Result<String> {
        let response = self
            .pick_response(operation, prefixes)
            .context(|| endpoint.to_string())?;

        let response_type = match response.and_then(|r| preferred_content(&r.content)) {
            None => "{}".to_owned(),
            Some((media_type, content)) => self
                .projector
                .project(&content.schema)
                .context(|| format!("{endpoint}, {type_name} ({media_type})"))?,
        };

        Ok(format!("type {type_name} = {response_type};"))
    }

    /// First response whose status code starts with one of `prefixes`, tried
    /// in order, then the `default` response. `None` stands for a response
    /// without content.
    pub fn pick_response(
        &self,
        operation: &'a Operation,
        prefixes: &[&str],
    ) -> Result<Option<&'a Response>> {
        let responses = operation.responses.as_ref().ok_or(Error::NoResponses)?;

        let status_codes = responses
            .iter()
            .filter(|(code, _)| code.as_str() != DEFAULT_RESPONSE)
            .sorted_by(|a, b| a.0.cmp(b.0))
            .collect_vec();

        let picked = prefixes
            .iter()
            .find_map(|prefix| {
                status_codes
                    .iter()
                    .find(|(code, _)| code.starts_with(prefix))
                    .map(|(_, response)| *response)
            })
            .or_else(|| responses.get(DEFAULT_RESPONSE));

        picked
            .map(|response| resolve(self.components, response))
            .transpose()
    }
}

fn request_type(endpoint: Endpoint<'_>, params: &ParamInfo<'_>, body: &BodyInfo<'_>) -> String {
    let base = if body.included {
        "Omit<RequestInit, 'body'>"
    } else {
        "RequestInit"
    };

    let mut fields = Vec::new();
    if params.included {
        fields.push(format!(
            "params{}: {};",
            optional_marker(params.required),
            params.type_name
        ));
    }
    if body.included {
        fields.push(format!(
            "body{}: {};",
            optional_marker(body.required),
            body.type_name
        ));
    }

    let refinement = if fields.is_empty() {
        String::new()
    } else {
        format!(" & {{ {} }}", fields.join(" "))
    };

    format!(
        "type {} = {base}{refinement} & RequestInitExtended;",
        endpoint.request_type_name()
    )
}

pub(crate) fn optional_marker(required: bool) -> &'static str {
    if required {
        ""
    } else {
        "?"
    }
}

/// Picks the content entry used for a body or response.
pub fn preferred_content(content: &IndexMap<String, MediaType>) -> Option<(&str, &MediaType)> {
    PREFERRED_MEDIA_TYPES
        .iter()
        .find_map(|media_type| content.get_key_value(*media_type))
        .or_else(|| content.first())
        .map(|(media_type, content)| (media_type.as_str(), content))
}
