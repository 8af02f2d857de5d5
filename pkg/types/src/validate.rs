use crate::error::InputError;
use crate::limitrange::LimitRangeRequest;
use crate::options::{LimitField, LimitRangeOptions};
use crate::quantity::Quantity;

/// Check a set of options and parse its quantities.
///
/// Rules are applied in order and the first failure is returned:
/// namespace, name, at least one limit, then every set limit in
/// `LimitField::ALL` order must parse and be strictly positive.
pub fn validate(options: &LimitRangeOptions) -> Result<LimitRangeRequest, InputError> {
    if options.namespace.is_empty() {
        return Err(InputError::EmptyNamespace);
    }
    if options.name.is_empty() {
        return Err(InputError::MissingName);
    }
    if !options.has_any_limit() {
        return Err(InputError::NoLimitsSpecified);
    }

    let mut limits = Vec::new();
    for field in LimitField::ALL {
        let Some(value) = options.limit(field) else {
            continue;
        };
        let quantity = Quantity::parse(value)
            .map_err(|reason| InputError::InvalidQuantitySyntax { field, reason })?;
        if !quantity.is_positive() {
            return Err(InputError::NonPositiveQuantity { field });
        }
        limits.push((field, quantity));
    }

    Ok(LimitRangeRequest {
        namespace: options.namespace.clone(),
        name: options.name.clone(),
        limits,
    })
}

impl LimitRangeOptions {
    pub fn validate(&self) -> Result<LimitRangeRequest, InputError> {
        validate(self)
    }
}
