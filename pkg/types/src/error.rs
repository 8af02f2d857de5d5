use crate::options::LimitField;
use crate::quantity::QuantityError;
use thiserror::Error;

/// Problems with user input, detected before any API call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("namespace cannot be empty")]
    EmptyNamespace,
    #[error("name is required")]
    MissingName,
    #[error("at least one resource limit or request must be specified")]
    NoLimitsSpecified,
    #[error("invalid {field} value: {reason}")]
    InvalidQuantitySyntax {
        field: LimitField,
        reason: QuantityError,
    },
    /// Zero and negative values share this variant.
    #[error("invalid {field} value: must be greater than zero")]
    NonPositiveQuantity { field: LimitField },
    #[error("invalid value for --dry-run: {0}, must be 'client' or 'server'")]
    InvalidDryRun(String),
    #[error("unsupported output format: {0}")]
    UnsupportedOutputFormat(String),
}
