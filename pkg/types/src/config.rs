use crate::options::{LimitField, LimitRangeOptions};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Plugin defaults file (YAML).
///
/// Values here fill in flags the user did not pass; flags always win.
///
/// Example file passed with `--config`:
/// ```yaml
/// output: yaml
/// max-cpu: "2"
/// min-cpu: 100m
/// default-request-cpu: 250m
/// max-memory: 1Gi
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitRangeConfigFile {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default, alias = "max-cpu", deserialize_with = "quantity_literal")]
    pub max_cpu: Option<String>,
    #[serde(default, alias = "min-cpu", deserialize_with = "quantity_literal")]
    pub min_cpu: Option<String>,
    #[serde(default, alias = "default-cpu", deserialize_with = "quantity_literal")]
    pub default_cpu: Option<String>,
    #[serde(
        default,
        alias = "default-request-cpu",
        deserialize_with = "quantity_literal"
    )]
    pub default_request_cpu: Option<String>,
    #[serde(default, alias = "max-memory", deserialize_with = "quantity_literal")]
    pub max_memory: Option<String>,
    #[serde(default, alias = "min-memory", deserialize_with = "quantity_literal")]
    pub min_memory: Option<String>,
}

impl LimitRangeConfigFile {
    fn limit(&self, field: LimitField) -> Option<&String> {
        match field {
            LimitField::MaxCpu => self.max_cpu.as_ref(),
            LimitField::MinCpu => self.min_cpu.as_ref(),
            LimitField::DefaultCpu => self.default_cpu.as_ref(),
            LimitField::DefaultRequestCpu => self.default_request_cpu.as_ref(),
            LimitField::MaxMemory => self.max_memory.as_ref(),
            LimitField::MinMemory => self.min_memory.as_ref(),
        }
    }

    /// Merge: options already set > config file.
    pub fn apply_defaults(&self, options: &mut LimitRangeOptions) {
        for field in LimitField::ALL {
            if options.limit(field).is_none() {
                if let Some(value) = self.limit(field) {
                    *options.limit_mut(field) = Some(value.clone());
                }
            }
        }
        if options.output.is_empty() {
            if let Some(output) = &self.output {
                options.output = output.clone();
            }
        }
    }
}

/// Quantities may be written bare in YAML (`max-cpu: 2`); keep them as text.
fn quantity_literal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Literal>::deserialize(deserializer)?.map(|literal| match literal {
        Literal::Text(s) => s,
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
    }))
}

/// Load a YAML config file, returning the default if the file doesn't exist.
pub fn load_config_file<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> anyhow::Result<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    let config: T = serde_yaml::from_str(&content)?;
    Ok(config)
}
