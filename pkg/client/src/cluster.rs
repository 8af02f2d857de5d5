//! LimitRange store backed by a Kubernetes API server.

use crate::kubeconfig::{ConnectionFlags, client_config};
use crate::store::{CreateOptions, LimitRangeStore, StoreFactory};
use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::LimitRange;
use kube::Client;
use kube::api::{Api, PostParams};
use tracing::info;

/// Creates LimitRanges through the API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LimitRangeStore for KubeStore {
    async fn create(
        &self,
        namespace: &str,
        limit_range: &LimitRange,
        options: &CreateOptions,
    ) -> Result<Option<LimitRange>> {
        let api: Api<LimitRange> = Api::namespaced(self.client.clone(), namespace);
        let params = PostParams {
            dry_run: options.is_dry_run(),
            ..Default::default()
        };

        info!(
            "Creating LimitRange {}/{} (dry_run={})",
            namespace,
            limit_range.metadata.name.as_deref().unwrap_or_default(),
            params.dry_run
        );
        let created = api.create(&params, limit_range).await?;
        Ok(Some(created))
    }
}

/// Connects a `KubeStore` using the kubeconfig selected by the connection flags.
#[derive(Debug, Clone, Default)]
pub struct KubeStoreFactory {
    flags: ConnectionFlags,
}

impl KubeStoreFactory {
    pub fn new(flags: ConnectionFlags) -> Self {
        Self { flags }
    }
}

#[async_trait]
impl StoreFactory for KubeStoreFactory {
    async fn connect(&self) -> Result<Box<dyn LimitRangeStore>> {
        let config = client_config(&self.flags).await?;
        info!("Connecting to cluster at {}", config.cluster_url);
        let client = Client::try_from(config)?;
        Ok(Box::new(KubeStore::new(client)))
    }
}
