//! Rendering of LimitRange objects as YAML or JSON.

use crate::error::InputError;
use crate::options::OutputFormat;
use anyhow::Context;
use k8s_openapi::api::core::v1::LimitRange;
use pkg_constants::api::{API_VERSION, KIND};
use serde_json::Value;

/// Render a LimitRange in the requested format.
///
/// `apiVersion` and `kind` are filled in when the serialized document lacks
/// them. The returned text ends with a single newline.
pub fn render(limit_range: &LimitRange, format: OutputFormat) -> anyhow::Result<String> {
    let mut document = serde_json::to_value(limit_range).context("failed to format output")?;
    ensure_type_meta(&mut document);

    let mut text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&document).context("failed to format output")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&document).context("failed to format output")?
        }
        OutputFormat::None => {
            return Err(InputError::UnsupportedOutputFormat(String::new()).into());
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Set `apiVersion`/`kind` on a serialized object if they are missing or empty.
pub fn ensure_type_meta(document: &mut Value) {
    let Some(object) = document.as_object_mut() else {
        return;
    };
    for (key, value) in [("apiVersion", API_VERSION), ("kind", KIND)] {
        let missing = object
            .get(key)
            .and_then(Value::as_str)
            .is_none_or(str::is_empty);
        if missing {
            object.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
}
