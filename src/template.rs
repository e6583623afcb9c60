//! Path templates for service operations
//!
//! Operation paths may embed request parameters as `{{ params.Name }}`, e.g.
//! `/queues-summary/{{ params.InstanceId }}`. Nested objects are reached with
//! further dots: `{{ params.Filters.Channel }}`.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

const PARAMS_ROOT: &str = "params";

/// Every placeholder in `template`, as written (e.g. `params.InstanceId`)
pub fn extract_variables(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Names of the top-level request parameters a template consumes
pub fn path_params(template: &str) -> Vec<String> {
    extract_variables(template)
        .iter()
        .filter_map(|var| var.strip_prefix("params."))
        .map(|rest| rest.split('.').next().unwrap_or(rest).to_string())
        .collect()
}

/// Substitute request parameters into `template`
///
/// Each value passes through `encode` before substitution. A placeholder
/// that resolves to nothing, or to `null`, is an error naming every such
/// placeholder.
pub fn render_with(
    template: &str,
    params: &JsonObject,
    encode: impl Fn(&str) -> String,
) -> Result<String> {
    let mut undefined = Vec::new();

    let rendered = PLACEHOLDER.replace_all(template, |cap: &regex::Captures<'_>| {
        match lookup(params, &cap[1]) {
            Some(JsonValue::Null) | None => {
                undefined.push(cap[1].to_string());
                String::new()
            }
            Some(value) => encode(&scalar_text(value)),
        }
    });

    if undefined.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(undefined.join(", ")))
    }
}

/// Substitute request parameters verbatim
pub fn render(template: &str, params: &JsonObject) -> Result<String> {
    render_with(template, params, str::to_string)
}

/// Percent-encode a single URL path segment
pub fn encode_path_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn lookup<'a>(params: &'a JsonObject, var: &str) -> Option<&'a JsonValue> {
    let mut parts = var.split('.');
    if parts.next() != Some(PARAMS_ROOT) {
        return None;
    }
    let mut current = params.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
