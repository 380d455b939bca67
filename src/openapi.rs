//! OpenAPI document fetching and endpoint schema reporting
//!
//! This module implements the `schema` subcommand's core: download a JSON
//! OpenAPI document, walk it by literal key path, and render a human-readable
//! report of one POST operation's request-body schema. The document is never
//! validated against the OpenAPI metaschema; a key that should be there and
//! is not fails the lookup, and the caller surfaces that as a fatal error.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fmt::Write;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from literal key-path navigation of the OpenAPI document
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("Missing key '{key}' at {at}")]
    MissingKey { key: String, at: String },
    #[error("Expected an object at {at}, found {found}")]
    NotAnObject { at: String, found: String },
}

/// Fetches an OpenAPI document from `url` and parses it as JSON.
///
/// Single GET, no retry, no caching. Any non-success status or malformed
/// body is an error for the caller to report.
pub async fn fetch_document(url: &str, timeout: Duration) -> Result<Value> {
    info!(url, "Fetching OpenAPI document");

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("GET {} returned an error status", url))?;

    let doc: Value = response
        .json()
        .await
        .context("Response body is not valid JSON")?;

    debug!("Fetched OpenAPI document ({} top-level keys)", doc.as_object().map_or(0, |o| o.len()));

    Ok(doc)
}

/// Navigates `doc` by the literal key path `keys`.
///
/// The first absent key produces [`SpecError::MissingKey`] naming the key and
/// the dotted path of everything successfully traversed before it.
pub fn lookup<'a>(doc: &'a Value, keys: &[&str]) -> Result<&'a Value, SpecError> {
    let mut current = doc;
    let mut visited: Vec<&str> = Vec::new();

    for &key in keys {
        let at = if visited.is_empty() {
            "document root".to_string()
        } else {
            visited.join(".")
        };

        if !current.is_object() {
            return Err(SpecError::NotAnObject {
                at,
                found: json_type_name(current).to_string(),
            });
        }

        current = current.get(key).ok_or_else(|| SpecError::MissingKey {
            key: key.to_string(),
            at,
        })?;
        visited.push(key);
    }

    Ok(current)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text_or_na(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "N/A".to_string(),
    }
}

fn bool_word(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Pretty-prints a JSON value with the 4-space indent the schema block of
/// the report has always used.
fn pretty_json(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Renders the report for the POST operation at `endpoint`.
///
/// The operation itself must exist (`paths.<endpoint>.post`); its request
/// body is optional, but once present the `application/json` schema under it
/// is looked up strictly and a missing schema is an error. Property rows show
/// type, description, and membership in the schema's `required` array.
pub fn endpoint_report(doc: &Value, endpoint: &str) -> Result<String> {
    let operation = lookup(doc, &["paths", endpoint, "post"])?;

    let mut out = String::new();
    writeln!(out, "=== {} POST endpoint ===", endpoint)?;
    writeln!(out, "Summary: {}", text_or_na(operation.get("summary")))?;
    writeln!(out, "OperationId: {}", text_or_na(operation.get("operationId")))?;
    writeln!(out)?;

    let Some(request_body) = operation.get("requestBody") else {
        writeln!(out, "No request body defined")?;
        return Ok(out);
    };

    writeln!(out, "Request Body:")?;
    writeln!(
        out,
        "  Required: {}",
        bool_word(
            request_body
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false)
        )
    )?;
    writeln!(out, "  Description: {}", text_or_na(request_body.get("description")))?;

    let schema = lookup(request_body, &["content", "application/json", "schema"])?;

    writeln!(out, "\n  Schema:")?;
    writeln!(out, "{}", pretty_json(schema)?)?;

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        writeln!(out, "\n  Properties:")?;
        for (name, details) in properties {
            writeln!(out, "    - {}:", name)?;
            writeln!(out, "        Type: {}", text_or_na(details.get("type")))?;
            writeln!(
                out,
                "        Description: {}",
                text_or_na(details.get("description"))
            )?;
            writeln!(
                out,
                "        Required: {}",
                bool_word(required.contains(&name.as_str()))
            )?;
        }
    }

    Ok(out)
}
