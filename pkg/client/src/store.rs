use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::LimitRange;
use pkg_constants::api::DRY_RUN_ALL;

/// Options sent with a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Dry-run stages; the API server only accepts `["All"]`. Empty means persist.
    pub dry_run: Vec<String>,
}

impl CreateOptions {
    pub fn server_dry_run() -> Self {
        Self {
            dry_run: vec![DRY_RUN_ALL.to_string()],
        }
    }

    pub fn is_dry_run(&self) -> bool {
        !self.dry_run.is_empty()
    }
}

/// Somewhere LimitRanges can be created.
/// Implementations: `KubeStore` (API server), `MemoryStore` (tests).
#[async_trait]
pub trait LimitRangeStore: Send + Sync {
    /// Create `limit_range` in `namespace`.
    /// Returns the object as stored (or as it would have been stored on a
    /// dry run), or `None` when the store echoes nothing back.
    async fn create(
        &self,
        namespace: &str,
        limit_range: &LimitRange,
        options: &CreateOptions,
    ) -> Result<Option<LimitRange>>;
}

/// Builds a store on demand. Only called when a request actually needs one,
/// so a client-side dry run never touches cluster configuration.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn LimitRangeStore>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_options() {
        assert!(!CreateOptions::default().is_dry_run());
        let opts = CreateOptions::server_dry_run();
        assert!(opts.is_dry_run());
        assert_eq!(opts.dry_run, vec!["All".to_string()]);
    }
}
