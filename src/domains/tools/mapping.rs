//! Mapping of OpenAPI operations to tool definitions.
//!
//! One operation becomes one tool. Names come from the `operationId` when it
//! is usable and from the method and path otherwise.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use rmcp::model::{JsonObject, ToolAnnotations};
use serde_json::{Value, json};

use crate::domains::openapi::Operation;

static NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("identifier pattern is valid"));

/// Suffixes like `_1`, `_2` that frameworks append when operationIds collide.
static NUMERIC_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d+$").expect("numeric suffix pattern is valid"));

/// `listProducts` -> `list_Products`
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel boundary pattern is valid"));

/// Everything needed to register an operation as a tool.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: JsonObject,
    pub operation: Operation,
}

/// Map a single operation; the name is not deduplicated.
pub fn operation_to_definition(op: &Operation) -> ToolDefinition {
    let description = op
        .summary
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| op.description.clone().filter(|d| !d.is_empty()))
        .unwrap_or_else(|| format!("{} {}", op.method, op.path));

    let mut operation = op.clone();
    operation.method = op.method.to_uppercase();

    ToolDefinition {
        name: tool_name(op),
        description,
        input_schema: input_schema(op),
        operation,
    }
}

/// Map every operation, giving each tool a unique and descriptive name.
///
/// Names that collide or carry an auto-generated numeric suffix fall back to
/// the path-based name; collisions left after that get `_2`, `_3`, ...
pub fn operations_to_definitions(ops: &[Operation]) -> Vec<ToolDefinition> {
    let mut tools: Vec<ToolDefinition> = ops.iter().map(operation_to_definition).collect();

    let mut name_count: HashMap<String, usize> = HashMap::new();
    for tool in &tools {
        *name_count.entry(tool.name.clone()).or_default() += 1;
    }
    for tool in &mut tools {
        if name_count[&tool.name] > 1 || NUMERIC_SUFFIX.is_match(&tool.name) {
            tool.name = path_based_name(&tool.operation);
        }
    }

    let mut taken: HashSet<String> = HashSet::new();
    let mut repeated = Vec::new();
    for (index, tool) in tools.iter().enumerate() {
        if !taken.insert(tool.name.clone()) {
            repeated.push(index);
        }
    }
    // A suffixed name may itself be taken, e.g. by `GET /things/2`.
    for index in repeated {
        let base = tools[index].name.clone();
        let mut n = 2;
        let mut candidate = format!("{}_{}", base, n);
        while taken.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        taken.insert(candidate.clone());
        tools[index].name = candidate;
    }

    tools
}

/// Behaviour hints derived from the HTTP method.
pub fn annotations_for(method: &str) -> ToolAnnotations {
    let method = method.to_ascii_uppercase();
    let read_only = matches!(method.as_str(), "GET" | "HEAD" | "OPTIONS");
    let idempotent = read_only || matches!(method.as_str(), "PUT" | "DELETE");

    ToolAnnotations::new()
        .read_only(read_only)
        .destructive(method == "DELETE")
        .idempotent(idempotent)
        .open_world(true)
}

fn tool_name(op: &Operation) -> String {
    match op.operation_id.as_deref() {
        Some(id) if !id.is_empty() => sanitize_name(id),
        _ => path_based_name(op),
    }
}

/// `GET /users/{id}` -> `get_users_id`
fn path_based_name(op: &Operation) -> String {
    let path_part = path_to_name(&op.path);
    let path_part = path_part.trim_matches('_');
    let method_part = op.method.to_lowercase();
    if path_part.is_empty() {
        method_part
    } else {
        format!("{}_{}", method_part, path_part)
    }
}

fn path_to_name(path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return String::new();
    }
    let path = path.replace('/', "_").replace(['{', '}'], "");
    sanitize_name(&path)
}

fn sanitize_name(s: &str) -> String {
    let s = CAMEL_BOUNDARY.replace_all(s, "${1}_${2}");
    let s = NON_IDENT.replace_all(&s, "_");
    let s = s.trim_matches('_').to_lowercase();
    if s.is_empty() { "op".to_string() } else { s }
}

fn input_schema(op: &Operation) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut required = Vec::new();

    for param in &op.parameters {
        let mut schema = param.schema.clone().unwrap_or_else(|| json!({}));
        if let (Some(description), Value::Object(map)) = (&param.description, &mut schema) {
            map.entry("description")
                .or_insert_with(|| Value::String(description.clone()));
        }
        properties.insert(param.name.clone(), schema);
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    if let Some(body) = &op.request_body {
        properties.insert("body".to_string(), body.schema.clone());
        if body.required {
            required.push(Value::String("body".to_string()));
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::openapi::{ParamLocation, Parameter, RequestBody};

    fn op(operation_id: &str, path: &str, method: &str, summary: &str) -> Operation {
        Operation {
            operation_id: (!operation_id.is_empty()).then(|| operation_id.to_string()),
            path: path.to_string(),
            method: method.to_string(),
            summary: (!summary.is_empty()).then(|| summary.to_string()),
            ..Default::default()
        }
    }

    fn names(tools: &[ToolDefinition]) -> Vec<&str> {
        tools.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_name_from_operation_id() {
        let tool = operation_to_definition(&op("getUser", "/users/{id}", "GET", "Get user"));
        assert_eq!(tool.name, "get_user");
        assert_eq!(tool.description, "Get user");
    }

    #[test]
    fn test_name_from_path_and_method() {
        let tool = operation_to_definition(&op("", "/items", "POST", "Create item"));
        assert_eq!(tool.name, "post_items");
    }

    #[test]
    fn test_root_path_uses_method_only() {
        let tool = operation_to_definition(&op("", "/", "GET", ""));
        assert_eq!(tool.name, "get");
        assert_eq!(tool.description, "GET /");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("listProducts"), "list_products");
        assert_eq!(sanitize_name("getHTTPResponse"), "get_httpresponse");
        assert_eq!(sanitize_name("users.get-all"), "users_get_all");
        assert_eq!(sanitize_name("__"), "op");
        assert_eq!(sanitize_name("v2Items"), "v2_items");
    }

    #[test]
    fn test_description_falls_back_to_description_then_method_path() {
        let mut operation = op("", "/pets", "GET", "");
        operation.description = Some("All the pets".to_string());
        assert_eq!(operation_to_definition(&operation).description, "All the pets");

        operation.description = None;
        assert_eq!(operation_to_definition(&operation).description, "GET /pets");
    }

    #[test]
    fn test_input_schema() {
        let mut operation = op("search", "/search", "POST", "");
        operation.parameters = vec![
            Parameter::new("q", ParamLocation::Query, true).with_schema(json!({"type": "string"})),
            Parameter {
                description: Some("Page number".to_string()),
                ..Parameter::new("page", ParamLocation::Query, false)
            },
        ];
        operation.request_body = Some(RequestBody {
            required: true,
            schema: json!({"type": "object"}),
        });

        let schema = operation_to_definition(&operation).input_schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["q"], json!({"type": "string"}));
        assert_eq!(
            schema["properties"]["page"],
            json!({"description": "Page number"})
        );
        assert_eq!(schema["properties"]["body"], json!({"type": "object"}));
        assert_eq!(schema["required"], json!(["q", "body"]));
    }

    #[test]
    fn test_input_schema_without_required() {
        let schema = operation_to_definition(&op("ping", "/ping", "GET", "")).input_schema;
        assert_eq!(schema["properties"], json!({}));
        assert!(!schema.contains_key("required"));
    }

    #[test]
    fn test_method_is_normalised() {
        let tool = operation_to_definition(&op("", "/pets", "get", ""));
        assert_eq!(tool.operation.method, "GET");
        assert_eq!(tool.name, "get_pets");
    }

    #[test]
    fn test_numeric_suffix_falls_back_to_path() {
        let tools = operations_to_definitions(&[
            op("create_1", "/deeplink/domain", "POST", "Create domain param"),
            op("getAll_1", "/deeplink/domain", "GET", "List domain params"),
        ]);
        assert_eq!(
            names(&tools),
            vec!["post_deeplink_domain", "get_deeplink_domain"]
        );
    }

    #[test]
    fn test_numeric_suffix_update_by_id() {
        let tools = operations_to_definitions(&[
            op("updateById", "/deeplinks/{id}", "PUT", "Update deeplink"),
            op("updateById_1", "/deeplink/domain/update/{id}", "PUT", "Update domain param"),
        ]);
        assert_eq!(
            names(&tools),
            vec!["update_by_id", "put_deeplink_domain_update_id"]
        );
    }

    #[test]
    fn test_collision_falls_back_to_path() {
        let tools = operations_to_definitions(&[
            op("delete", "/products/{id}", "DELETE", "Delete product"),
            op("delete", "/orders/{id}", "DELETE", "Delete order"),
        ]);
        assert_eq!(names(&tools), vec!["delete_products_id", "delete_orders_id"]);
    }

    #[test]
    fn test_collision_same_path_final_dedup() {
        let tools = operations_to_definitions(&[
            op("doThing", "/things", "POST", "Do thing A"),
            op("doThing", "/things", "POST", "Do thing B"),
            op("doThing", "/things", "POST", "Do thing C"),
        ]);
        assert_eq!(
            names(&tools),
            vec!["post_things", "post_things_2", "post_things_3"]
        );
    }

    #[test]
    fn test_dedup_skips_names_already_taken() {
        let tools = operations_to_definitions(&[
            op("x", "/things", "GET", ""),
            op("x", "/things/", "GET", ""),
            op("", "/things/2", "GET", ""),
        ]);
        assert_eq!(
            names(&tools),
            vec!["get_things", "get_things_3", "get_things_2"]
        );
    }

    #[test]
    fn test_good_names_unchanged() {
        let tools = operations_to_definitions(&[
            op("listProducts", "/products", "GET", ""),
            op("createProduct", "/products", "POST", ""),
            op("getProductById", "/products/{id}", "GET", ""),
        ]);
        assert_eq!(
            names(&tools),
            vec!["list_products", "create_product", "get_product_by_id"]
        );
    }

    #[test]
    fn test_deeplink_api_full_scenario() {
        let tools = operations_to_definitions(&[
            op("updateById", "/deeplinks/{id}", "PUT", "Update a specific deeplink"),
            op("create_1", "/deeplink/domain", "POST", "Post Deeplink Params domain"),
            op("getAll_1", "/deeplink/domain", "GET", "Get All Deeplinks Params domain"),
            op("deleteById", "/deeplink/domain/delete/{id}", "DELETE", "Delete domain param"),
            op("updateById_1", "/deeplink/domain/update/{id}", "PUT", "Update domain param"),
        ]);
        assert_eq!(
            names(&tools),
            vec![
                "update_by_id",
                "post_deeplink_domain",
                "get_deeplink_domain",
                "delete_by_id",
                "put_deeplink_domain_update_id",
            ]
        );
        assert_eq!(tools[2].description, "Get All Deeplinks Params domain");
    }

    #[test]
    fn test_annotations_for_methods() {
        let get = annotations_for("get");
        assert_eq!(get.read_only_hint, Some(true));
        assert_eq!(get.open_world_hint, Some(true));

        let delete = annotations_for("DELETE");
        assert_eq!(delete.read_only_hint, Some(false));
        assert_eq!(delete.destructive_hint, Some(true));
        assert_eq!(delete.idempotent_hint, Some(true));

        let post = annotations_for("POST");
        assert_eq!(post.destructive_hint, Some(false));
        assert_eq!(post.idempotent_hint, Some(false));
    }
}
