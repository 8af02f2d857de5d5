//! In-memory LimitRange store.
//!
//! Behaves like the API server for the create path: duplicate names are
//! rejected, dry-run creates are validated but never retained. Every call is
//! recorded so callers can assert on what was sent.

use crate::store::{CreateOptions, LimitRangeStore, StoreFactory};
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::LimitRange;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded `create` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub namespace: String,
    pub name: String,
    pub options: CreateOptions,
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<(String, String), LimitRange>,
    calls: Vec<CreateCall>,
    next_version: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    silent: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that accepts creates but returns no object.
    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    /// Fetch a retained object by namespace and name.
    pub fn get(&self, namespace: &str, name: &str) -> Option<LimitRange> {
        let state = self.state.lock().ok()?;
        state
            .objects
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<CreateCall> {
        self.state
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LimitRangeStore for MemoryStore {
    async fn create(
        &self,
        namespace: &str,
        limit_range: &LimitRange,
        options: &CreateOptions,
    ) -> Result<Option<LimitRange>> {
        let name = limit_range
            .metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| anyhow!("LimitRange is invalid: metadata.name: Required value"))?;

        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        state.calls.push(CreateCall {
            namespace: namespace.to_string(),
            name: name.clone(),
            options: options.clone(),
        });

        let key = (namespace.to_string(), name.clone());
        if state.objects.contains_key(&key) {
            bail!("limitranges \"{}\" already exists", name);
        }

        let mut stored = limit_range.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        if !options.is_dry_run() {
            state.next_version += 1;
            stored.metadata.resource_version = Some(state.next_version.to_string());
            state.objects.insert(key, stored.clone());
        }

        Ok(if self.silent { None } else { Some(stored) })
    }
}

/// Hands out clones of one `MemoryStore` and counts how often it was asked.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreFactory {
    store: MemoryStore,
    connections: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MemoryStoreFactory {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// A factory whose `connect` always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    async fn connect(&self) -> Result<Box<dyn LimitRangeStore>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            bail!("{}", message);
        }
        Ok(Box::new(self.store.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn limit_range(name: &str) -> LimitRange {
        LimitRange {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let created = store
            .create("default", &limit_range("lr"), &CreateOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(created.metadata.resource_version.as_deref(), Some("1"));

        let fetched = store.get("default", "lr").unwrap();
        assert_eq!(fetched, created);
        assert!(store.get("other", "lr").is_none());
    }

    #[tokio::test]
    async fn test_dry_run_not_retained() {
        let store = MemoryStore::new();
        let echoed = store
            .create("default", &limit_range("lr"), &CreateOptions::server_dry_run())
            .await
            .unwrap();
        assert!(echoed.is_some());
        assert!(store.get("default", "lr").is_none());

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].options.is_dry_run());
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let store = MemoryStore::new();
        let opts = CreateOptions::default();
        store.create("default", &limit_range("lr"), &opts).await.unwrap();
        let err = store
            .create("default", &limit_range("lr"), &opts)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "limitranges \"lr\" already exists");
    }

    #[tokio::test]
    async fn test_missing_name_rejected() {
        let store = MemoryStore::new();
        let result = store
            .create("default", &limit_range(""), &CreateOptions::default())
            .await;
        assert!(result.is_err());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_silent_store_returns_nothing() {
        let store = MemoryStore::silent();
        let echoed = store
            .create("default", &limit_range("lr"), &CreateOptions::default())
            .await
            .unwrap();
        assert!(echoed.is_none());
        assert!(store.get("default", "lr").is_some());
    }

    #[tokio::test]
    async fn test_factory_counts_connections() {
        let factory = MemoryStoreFactory::new(MemoryStore::new());
        factory.connect().await.unwrap();
        factory.connect().await.unwrap();
        assert_eq!(factory.connections(), 2);

        let failing = MemoryStoreFactory::failing("no cluster");
        let err = failing.connect().await.err().unwrap();
        assert_eq!(err.to_string(), "no cluster");
        assert_eq!(failing.connections(), 1);
    }
}
