use crate::error::InputError;
use pkg_constants::api::{RESOURCE_CPU, RESOURCE_MEMORY};
use std::fmt;
use std::str::FromStr;

// ─── Limit fields ──────────────────────────────────────────────────────────

/// One of the six quantity flags.
///
/// `LimitField::ALL` is the order in which fields are validated, so when
/// several fields are invalid the first one in this order is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitField {
    MaxCpu,
    MinCpu,
    DefaultCpu,
    DefaultRequestCpu,
    MaxMemory,
    MinMemory,
}

/// Map of a `LimitRangeItem` a field's quantity is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitBucket {
    Max,
    Min,
    Default,
    DefaultRequest,
}

impl LimitField {
    pub const ALL: [LimitField; 6] = [
        LimitField::MaxCpu,
        LimitField::MinCpu,
        LimitField::DefaultCpu,
        LimitField::DefaultRequestCpu,
        LimitField::MaxMemory,
        LimitField::MinMemory,
    ];

    /// Command-line flag name, without the leading `--`.
    pub fn flag_name(self) -> &'static str {
        match self {
            LimitField::MaxCpu => "max-cpu",
            LimitField::MinCpu => "min-cpu",
            LimitField::DefaultCpu => "default-cpu",
            LimitField::DefaultRequestCpu => "default-request-cpu",
            LimitField::MaxMemory => "max-memory",
            LimitField::MinMemory => "min-memory",
        }
    }

    /// Resource name the quantity is keyed under.
    pub fn resource(self) -> &'static str {
        match self {
            LimitField::MaxCpu
            | LimitField::MinCpu
            | LimitField::DefaultCpu
            | LimitField::DefaultRequestCpu => RESOURCE_CPU,
            LimitField::MaxMemory | LimitField::MinMemory => RESOURCE_MEMORY,
        }
    }

    pub fn bucket(self) -> LimitBucket {
        match self {
            LimitField::MaxCpu | LimitField::MaxMemory => LimitBucket::Max,
            LimitField::MinCpu | LimitField::MinMemory => LimitBucket::Min,
            LimitField::DefaultCpu => LimitBucket::Default,
            LimitField::DefaultRequestCpu => LimitBucket::DefaultRequest,
        }
    }
}

impl fmt::Display for LimitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag_name())
    }
}

// ─── Modes ─────────────────────────────────────────────────────────────────

/// Value of `--dry-run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DryRunMode {
    /// Create the object for real.
    #[default]
    None,
    /// Render locally, never contact the API server.
    Client,
    /// Submit with `dryRun=All` and render what the server returns.
    Server,
}

impl FromStr for DryRunMode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(DryRunMode::None),
            "client" => Ok(DryRunMode::Client),
            "server" => Ok(DryRunMode::Server),
            other => Err(InputError::InvalidDryRun(other.to_string())),
        }
    }
}

/// Value of `-o/--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// No format requested; rendering is refused.
    #[default]
    None,
    Yaml,
    Json,
}

impl FromStr for OutputFormat {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(OutputFormat::None),
            "yaml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            other => Err(InputError::UnsupportedOutputFormat(other.to_string())),
        }
    }
}

// ─── Options ───────────────────────────────────────────────────────────────

/// Everything needed to create one LimitRange.
///
/// `dry_run` and `output` keep the raw flag text; they are parsed when the
/// command runs so an unknown value is reported by `run`, not by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitRangeOptions {
    pub namespace: String,
    pub name: String,
    pub max_cpu: Option<String>,
    pub min_cpu: Option<String>,
    pub default_cpu: Option<String>,
    pub default_request_cpu: Option<String>,
    pub max_memory: Option<String>,
    pub min_memory: Option<String>,
    pub dry_run: String,
    pub output: String,
}

impl LimitRangeOptions {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for one quantity field.
    pub fn with_limit(mut self, field: LimitField, value: impl Into<String>) -> Self {
        *self.limit_mut(field) = Some(value.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: impl Into<String>) -> Self {
        self.dry_run = dry_run.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    /// The value of a quantity field, or `None` when it is unset or empty.
    pub fn limit(&self, field: LimitField) -> Option<&str> {
        let value = match field {
            LimitField::MaxCpu => &self.max_cpu,
            LimitField::MinCpu => &self.min_cpu,
            LimitField::DefaultCpu => &self.default_cpu,
            LimitField::DefaultRequestCpu => &self.default_request_cpu,
            LimitField::MaxMemory => &self.max_memory,
            LimitField::MinMemory => &self.min_memory,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn limit_mut(&mut self, field: LimitField) -> &mut Option<String> {
        match field {
            LimitField::MaxCpu => &mut self.max_cpu,
            LimitField::MinCpu => &mut self.min_cpu,
            LimitField::DefaultCpu => &mut self.default_cpu,
            LimitField::DefaultRequestCpu => &mut self.default_request_cpu,
            LimitField::MaxMemory => &mut self.max_memory,
            LimitField::MinMemory => &mut self.min_memory,
        }
    }

    pub fn has_any_limit(&self) -> bool {
        LimitField::ALL.iter().any(|f| self.limit(*f).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_counts_as_unset() {
        let options = LimitRangeOptions::new("default", "lr").with_limit(LimitField::MaxCpu, "");
        assert_eq!(options.limit(LimitField::MaxCpu), None);
        assert!(!options.has_any_limit());

        let options = options.with_limit(LimitField::MinMemory, "64Mi");
        assert_eq!(options.limit(LimitField::MinMemory), Some("64Mi"));
        assert!(options.has_any_limit());
    }

    #[test]
    fn test_field_mapping() {
        assert_eq!(LimitField::DefaultRequestCpu.flag_name(), "default-request-cpu");
        assert_eq!(LimitField::DefaultRequestCpu.bucket(), LimitBucket::DefaultRequest);
        assert_eq!(LimitField::MaxMemory.resource(), "memory");
        assert_eq!(LimitField::MinCpu.resource(), "cpu");
        assert_eq!(LimitField::MinMemory.to_string(), "min-memory");
    }

    #[test]
    fn test_dry_run_parse() {
        assert_eq!("".parse::<DryRunMode>(), Ok(DryRunMode::None));
        assert_eq!("client".parse::<DryRunMode>(), Ok(DryRunMode::Client));
        assert_eq!("server".parse::<DryRunMode>(), Ok(DryRunMode::Server));
        assert_eq!(
            "invalid".parse::<DryRunMode>(),
            Err(InputError::InvalidDryRun("invalid".to_string()))
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("".parse::<OutputFormat>(), Ok(OutputFormat::None));
        assert_eq!("yaml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported output format: xml");
    }
}
