use crate::options::{LimitBucket, LimitField};
use crate::quantity::Quantity;
use k8s_openapi::api::core::v1::{LimitRange, LimitRangeItem, LimitRangeSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity as ApiQuantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use pkg_constants::api::LIMIT_TYPE_CONTAINER;
use std::collections::BTreeMap;
use tracing::debug;

/// A validated request: identity plus parsed quantities in `LimitField::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitRangeRequest {
    pub namespace: String,
    pub name: String,
    pub limits: Vec<(LimitField, Quantity)>,
}

impl LimitRangeRequest {
    /// Build the LimitRange object. Deterministic: same request, same object.
    pub fn build(&self) -> LimitRange {
        build_limit_range(self)
    }
}

/// Build a LimitRange with a single container-scoped item.
///
/// Only maps that receive at least one quantity are set; the others stay
/// `None` so they are omitted on the wire.
pub fn build_limit_range(request: &LimitRangeRequest) -> LimitRange {
    let mut item = LimitRangeItem {
        type_: LIMIT_TYPE_CONTAINER.to_string(),
        ..Default::default()
    };

    for (field, quantity) in &request.limits {
        let map = match field.bucket() {
            LimitBucket::Max => &mut item.max,
            LimitBucket::Min => &mut item.min,
            LimitBucket::Default => &mut item.default,
            LimitBucket::DefaultRequest => &mut item.default_request,
        };
        map.get_or_insert_with(BTreeMap::new)
            .insert(field.resource().to_string(), ApiQuantity::from(quantity));
    }

    debug!(
        "Built LimitRange {}/{} with {} quantities",
        request.namespace,
        request.name,
        request.limits.len()
    );

    LimitRange {
        metadata: ObjectMeta {
            name: Some(request.name.clone()),
            namespace: Some(request.namespace.clone()),
            ..Default::default()
        },
        spec: Some(LimitRangeSpec { limits: vec![item] }),
    }
}
