use std::collections::BTreeMap;

use itertools::Itertools;

use crate::error::{Error, Result, ResultExt};
use crate::naming::{component_schema_type_name, lookup_type_name, quote_string, Endpoint};
use crate::operation::{optional_marker, OperationSynthesizer};
use crate::schema::{schema_doc_comment, SchemaProjector};
use crate::spec::{Method, OpenApi};

const PREAMBLE: &str = include_str!("templates/preamble.ts");
const RUNTIME: &str = include_str!("templates/runtime.ts");

/// Knobs for library callers; the binary maps its flags onto this.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Append the fetch-based `createClient` runtime after the type surface.
    pub runtime: bool,
}

/// Bookkeeping for one `generate` call.
#[derive(Debug, Default)]
struct GeneratorState {
    /// Generated identifier -> what produced it.
    names: BTreeMap<String, String>,
    /// Lookup entries per method; `Method` orders by emission order.
    lookups: BTreeMap<Method, Vec<String>>,
}

impl GeneratorState {
    fn add_name(&mut self, name: impl Into<String>, owner: impl Into<String>) -> Result<()> {
        let name = name.into();
        let owner = owner.into();
        if let Some(first) = self.names.get(&name) {
            return Err(Error::NameCollision {
                name,
                first: first.clone(),
                second: owner,
            });
        }
        self.names.insert(name, owner);
        Ok(())
    }

    fn add_lookup(&mut self, method: Method, entry: String) {
        self.lookups.entry(method).or_default().push(entry);
    }
}

/// Generates the TypeScript client types for `spec`.
pub fn generate(spec: &OpenApi) -> Result<String> {
    generate_with(spec, &GenerateOptions::default())
}

pub fn generate_with(spec: &OpenApi, options: &GenerateOptions) -> Result<String> {
    let mut state = GeneratorState::default();

    let mut sections = vec![PREAMBLE.trim().lines().map(str::to_owned).collect_vec()];
    sections.push(generate_component_types(spec, &mut state)?);
    sections.push(generate_operation_types(spec, &mut state)?);
    if !state.lookups.is_empty() {
        sections.push(generate_lookup_types(&state));
    }
    sections.push(generate_client_interface(&state));
    if options.runtime {
        sections.push(RUNTIME.trim().lines().map(str::to_owned).collect_vec());
    }

    tracing::info!(
        components = spec.components.schemas.len(),
        paths = spec.paths.len(),
        methods = state.lookups.len(),
        runtime = options.runtime,
        "generated typescript client"
    );

    Ok(sections.iter().map(|lines| lines.join("\n")).join("\n\n"))
}

fn generate_component_types(spec: &OpenApi, state: &mut GeneratorState) -> Result<Vec<String>> {
    let projector = SchemaProjector::new(&spec.components);
    let mut lines = vec!["// Component types".to_owned()];

    for (name, schema) in spec.components.schemas.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        let type_name = component_schema_type_name(name);
        state.add_name(&type_name, format!("component schema {name}"))?;

        let type_decl = projector.project(schema).context(|| type_name.clone())?;
        tracing::debug!(component = %name, "projected component schema");

        lines.push(String::new());
        if let Some(doc) = schema_doc_comment(schema) {
            lines.push(doc);
        }
        lines.push(format!("type {type_name} = {type_decl};"));
    }

    Ok(lines)
}

fn generate_operation_types(spec: &OpenApi, state: &mut GeneratorState) -> Result<Vec<String>> {
    let synthesizer = OperationSynthesizer::new(&spec.components);
    let mut lines = vec!["// Request/Response types".to_owned()];

    for (path, path_item) in spec.paths.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        for (method, operation) in path_item.operations() {
            let endpoint = Endpoint::new(method, path);
            state.add_name(endpoint.ident(), endpoint.to_string())?;

            let types = synthesizer.synthesize(endpoint, path_item, operation)?;

            lines.push(String::new());
            lines.push(format!("// {endpoint}"));
            lines.extend(types.lines);

            state.add_lookup(
                method,
                format!(
                    "{}: {{ init{}: {}, response: FetchResponse<{}, {}> }},",
                    quote_string(path),
                    optional_marker(types.init_required),
                    endpoint.request_type_name(),
                    endpoint.response_data_type_name(),
                    endpoint.response_error_type_name(),
                ),
            );
        }
    }

    Ok(lines)
}

fn generate_lookup_types(state: &GeneratorState) -> Vec<String> {
    let mut lines = vec!["// Type lookups: url literal -> request and response types".to_owned()];

    for (method, entries) in &state.lookups {
        lines.push(String::new());
        lines.push(format!("type {} = {{", lookup_type_name(*method)));
        lines.extend(entries.iter().map(|entry| format!("    {entry}")));
        lines.push("};".to_owned());
    }

    lines
}

fn generate_client_interface(state: &GeneratorState) -> Vec<String> {
    let mut lines = vec!["export interface Client {".to_owned()];
    lines.extend(
        state
            .lookups
            .keys()
            .map(|method| format!("    {method}: ClientMethod<{}>;", lookup_type_name(*method))),
    );
    lines.push("}".to_owned());
    lines
}
