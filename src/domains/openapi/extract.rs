//! Extraction of operations from a parsed `openapiv3` document.
//!
//! Parameters and request bodies referenced from `#/components/...` are
//! resolved, and schema `$ref`s are inlined so every tool input schema is
//! self-contained.
//!
//! Schemas never go through the typed model: `openapiv3` only knows the 3.0
//! schema dialect, so they are lifted out of the raw document first
//! ([`RawSchemas::lift`]) and read back as plain JSON.

use std::collections::HashMap;

use openapiv3::{
    Components, OpenAPI, Operation as SpecOperation, Parameter as SpecParameter,
    ParameterSchemaOrContent, PathItem, ReferenceOr, Schema,
};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::model::{ApiDocument, Operation, ParamLocation, Parameter, RequestBody};

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";
const LIFTED_REF_PREFIX: &str = "#/x-lifted-schemas/";

/// Chained component references (`A -> B -> C`) are followed at most this far.
const MAX_REF_DEPTH: usize = 16;

/// Upper bound on JSON nodes one inlined schema may grow to.
const MAX_INLINED_NODES: usize = 10_000;

const JSON_MEDIA_TYPE: &str = "application/json";

/// Schemas taken out of a raw document before it is parsed by `openapiv3`.
#[derive(Debug, Default)]
pub(crate) struct RawSchemas {
    components: HashMap<String, Value>,
    lifted: Vec<Value>,
}

impl RawSchemas {
    /// Move every schema out of `raw`.
    ///
    /// `components.schemas` is removed; each `schema` field elsewhere is
    /// replaced by a reference into the lifted list.
    pub(crate) fn lift(raw: &mut Value) -> Self {
        let mut schemas = Self::default();

        let components = raw
            .get_mut("components")
            .and_then(Value::as_object_mut)
            .and_then(|components| components.remove("schemas"));
        if let Some(Value::Object(map)) = components {
            schemas.components = map.into_iter().collect();
        }

        schemas.lift_nested(raw);
        schemas
    }

    fn lift_nested(&mut self, value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if key == "schema" && (child.is_object() || child.is_boolean()) {
                        let reference = format!("{}{}", LIFTED_REF_PREFIX, self.lifted.len());
                        let schema = std::mem::replace(child, json!({ "$ref": reference }));
                        self.lifted.push(schema);
                    } else {
                        self.lift_nested(child);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|item| self.lift_nested(item)),
            _ => {}
        }
    }
}

/// Reduce a parsed document to an [`ApiDocument`].
pub(crate) fn extract_document(spec: &OpenAPI, schemas: RawSchemas) -> ApiDocument {
    let extractor = Extractor { spec, schemas };

    ApiDocument {
        title: spec.info.title.clone(),
        version: spec.info.version.clone(),
        base_url: base_url(spec),
        operations: extractor.operations(),
    }
}

/// First server URL with variables replaced by their defaults.
fn base_url(spec: &OpenAPI) -> Option<String> {
    let server = spec.servers.first()?;
    let mut url = server.url.clone();

    if let Some(variables) = &server.variables {
        for (name, variable) in variables {
            url = url.replace(&format!("{{{}}}", name), &variable.default);
        }
    }

    let url = url.trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

struct Extractor<'a> {
    spec: &'a OpenAPI,
    schemas: RawSchemas,
}

impl<'a> Extractor<'a> {
    fn components(&self) -> Option<&'a Components> {
        self.spec.components.as_ref()
    }

    fn operations(&self) -> Vec<Operation> {
        let mut out = Vec::new();

        for (path, item) in &self.spec.paths.paths {
            let item = match item {
                ReferenceOr::Item(item) => item,
                ReferenceOr::Reference { reference } => {
                    warn!("Skipping path {} defined by reference {}", path, reference);
                    continue;
                }
            };

            let shared = self.parameters(&item.parameters);

            for (method, operation) in methods(item) {
                if let Some(operation) = operation {
                    out.push(self.operation(path, method, operation, &shared));
                }
            }
        }

        out
    }

    fn operation(
        &self,
        path: &str,
        method: &str,
        operation: &SpecOperation,
        shared: &[Parameter],
    ) -> Operation {
        let mut parameters = shared.to_vec();
        for param in self.parameters(&operation.parameters) {
            match parameters
                .iter_mut()
                .find(|p| p.name == param.name && p.location == param.location)
            {
                Some(existing) => *existing = param,
                None => parameters.push(param),
            }
        }

        let request_body = operation.request_body.as_ref().and_then(|body| {
            let body = resolve(self.components(), body, REQUEST_BODY_REF_PREFIX, |c, name| {
                c.request_bodies.get(name)
            })?;
            let schema = body.content.get(JSON_MEDIA_TYPE)?.schema.as_ref()?;
            Some(RequestBody {
                required: body.required,
                schema: self.schema(schema),
            })
        });

        debug!("Extracted {} {}", method, path);

        Operation {
            path: path.to_string(),
            method: method.to_string(),
            operation_id: operation.operation_id.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            parameters,
            request_body,
        }
    }

    fn parameters(&self, params: &[ReferenceOr<SpecParameter>]) -> Vec<Parameter> {
        params
            .iter()
            .filter_map(|p| {
                let resolved = resolve(self.components(), p, PARAMETER_REF_PREFIX, |c, name| {
                    c.parameters.get(name)
                });
                if resolved.is_none() {
                    warn!("Dropping unresolvable parameter {:?}", p);
                }
                resolved
            })
            .map(|p| self.parameter(p))
            .collect()
    }

    fn parameter(&self, param: &SpecParameter) -> Parameter {
        let (data, location) = match param {
            SpecParameter::Query { parameter_data, .. } => (parameter_data, ParamLocation::Query),
            SpecParameter::Header { parameter_data, .. } => (parameter_data, ParamLocation::Header),
            SpecParameter::Path { parameter_data, .. } => (parameter_data, ParamLocation::Path),
            SpecParameter::Cookie { parameter_data, .. } => (parameter_data, ParamLocation::Cookie),
        };

        let schema = match &data.format {
            ParameterSchemaOrContent::Schema(schema) => Some(self.schema(schema)),
            ParameterSchemaOrContent::Content(content) => content
                .values()
                .next()
                .and_then(|media| media.schema.as_ref())
                .map(|schema| self.schema(schema)),
        };

        Parameter {
            name: data.name.clone(),
            location,
            // Path parameters are always required.
            required: data.required || location == ParamLocation::Path,
            description: data.description.clone(),
            schema,
        }
    }

    fn schema(&self, schema: &ReferenceOr<Schema>) -> Value {
        let value = match schema {
            ReferenceOr::Reference { reference } => json!({ "$ref": reference }),
            ReferenceOr::Item(item) => match serde_json::to_value(item) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Cannot serialize schema: {}", e);
                    return json!({});
                }
            },
        };

        let mut inliner = Inliner::new(&self.schemas);
        let inlined = inliner.inline(&value);
        if inliner.truncated {
            warn!(
                "Schema exceeded {} nodes; deeper references left unconstrained",
                MAX_INLINED_NODES
            );
        }
        inlined
    }
}

/// Replaces schema `$ref`s with their targets, within a node budget.
struct Inliner<'s> {
    schemas: &'s RawSchemas,
    stack: Vec<String>,
    remaining: usize,
    truncated: bool,
}

impl<'s> Inliner<'s> {
    fn new(schemas: &'s RawSchemas) -> Self {
        Self {
            schemas,
            stack: Vec::new(),
            remaining: MAX_INLINED_NODES,
            truncated: false,
        }
    }

    fn inline(&mut self, value: &Value) -> Value {
        self.remaining = self.remaining.saturating_sub(1);
        match value {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    return self.inline_ref(reference);
                }
                Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), self.inline(v)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.inline(v)).collect()),
            other => other.clone(),
        }
    }

    fn inline_ref(&mut self, reference: &str) -> Value {
        if let Some(index) = reference.strip_prefix(LIFTED_REF_PREFIX) {
            let schemas = self.schemas;
            return match index.parse::<usize>().ok().and_then(|i| schemas.lifted.get(i)) {
                Some(target) => self.inline(target),
                None => json!({}),
            };
        }

        let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) else {
            warn!("Unsupported schema reference: {}", reference);
            return json!({});
        };

        if self.stack.iter().any(|n| n == name) {
            debug!("Cyclic schema reference {} left unconstrained", reference);
            return json!({});
        }

        if self.remaining == 0 {
            self.truncated = true;
            return json!({});
        }

        let schemas = self.schemas;
        let Some(target) = schemas.components.get(name) else {
            warn!("Unresolvable schema reference: {}", reference);
            return json!({});
        };

        self.stack.push(name.to_string());
        let resolved = self.inline(target);
        self.stack.pop();
        resolved
    }
}

fn methods(item: &PathItem) -> [(&'static str, Option<&SpecOperation>); 8] {
    [
        ("GET", item.get.as_ref()),
        ("PUT", item.put.as_ref()),
        ("POST", item.post.as_ref()),
        ("DELETE", item.delete.as_ref()),
        ("OPTIONS", item.options.as_ref()),
        ("HEAD", item.head.as_ref()),
        ("PATCH", item.patch.as_ref()),
        ("TRACE", item.trace.as_ref()),
    ]
}

/// Follow `#/components/<kind>/<name>` references until an item is reached.
fn resolve<'a, T, F>(
    components: Option<&'a Components>,
    item: &'a ReferenceOr<T>,
    prefix: &str,
    lookup: F,
) -> Option<&'a T>
where
    F: Fn(&'a Components, &str) -> Option<&'a ReferenceOr<T>>,
{
    let mut current = item;
    for _ in 0..MAX_REF_DEPTH {
        match current {
            ReferenceOr::Item(value) => return Some(value),
            ReferenceOr::Reference { reference } => {
                let name = reference.strip_prefix(prefix)?;
                current = lookup(components?, name)?;
            }
        }
    }
    None
}
