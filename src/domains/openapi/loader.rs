//! Loading and version-checking OpenAPI documents.

use std::path::Path;

use openapiv3::OpenAPI;
use serde_json::Value;
use tracing::{debug, info};

use super::error::{OpenApiError, OpenApiResult};
use super::extract::{RawSchemas, extract_document};
use super::model::ApiDocument;

/// Parse an OpenAPI 3.x document from a string.
///
/// JSON is detected by a leading `{`; anything else is parsed as YAML.
/// Swagger / OpenAPI 2.0 documents are rejected with
/// [`OpenApiError::UnsupportedVersion`].
pub fn parse_document(content: &str) -> OpenApiResult<ApiDocument> {
    let mut raw: Value = if content.trim_start().starts_with('{') {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };

    check_version(&mut raw)?;

    let schemas = RawSchemas::lift(&mut raw);
    let spec: OpenAPI = serde_json::from_value(raw)?;
    let document = extract_document(&spec, schemas);
    debug!(
        "Parsed '{}' v{} with {} operation(s)",
        document.title,
        document.version,
        document.operations.len()
    );
    Ok(document)
}

/// Load an OpenAPI document from a file.
pub fn load_from_file(path: &Path) -> OpenApiResult<ApiDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => OpenApiError::NotFound(path.display().to_string()),
        _ => OpenApiError::Io(e),
    })?;
    parse_document(&content)
}

/// Fetch an OpenAPI document from a URL.
pub async fn fetch_from_url(url: &str) -> OpenApiResult<ApiDocument> {
    let response = reqwest::get(url).await?;

    if !response.status().is_success() {
        return Err(OpenApiError::fetch(format!(
            "HTTP {} fetching {}",
            response.status(),
            url
        )));
    }

    let content = response.text().await?;
    parse_document(&content)
}

/// Load a document from either a URL (`http://` / `https://`) or a file path.
pub async fn load(source: &str) -> OpenApiResult<ApiDocument> {
    if is_url(source) {
        info!("Fetching OpenAPI document from {}", source);
        fetch_from_url(source).await
    } else {
        info!("Reading OpenAPI document from {}", source);
        load_from_file(Path::new(source))
    }
}

fn is_url(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reject anything that is not an OpenAPI 3.x document.
///
/// YAML may read `openapi: 3.0` as a number; it is normalised to a string.
fn check_version(raw: &mut Value) -> OpenApiResult<()> {
    let Some(root) = raw.as_object_mut() else {
        return Err(OpenApiError::parse("document root is not an object"));
    };

    if root.contains_key("swagger") {
        return Err(OpenApiError::openapi2());
    }

    let version = match root.get("openapi") {
        Some(Value::String(v)) => v.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(OpenApiError::openapi2()),
    };

    if version.starts_with('2') {
        return Err(OpenApiError::openapi2());
    }
    if !version.starts_with('3') {
        return Err(OpenApiError::UnsupportedVersion(format!(
            "unsupported OpenAPI version {}; use OpenAPI 3.x",
            version
        )));
    }

    root.insert("openapi".to_string(), Value::String(version));
    // 3.1 documents may omit `paths` entirely.
    root.entry("paths").or_insert_with(|| Value::Object(Default::default()));
    Ok(())
}
