//! Cluster access for the limitrange plugin: namespace resolution, the
//! LimitRange store seam, and its kube-backed and in-memory implementations.

pub mod cluster;
pub mod kubeconfig;
pub mod memory;
pub mod store;

pub use cluster::{KubeStore, KubeStoreFactory};
pub use kubeconfig::{ConnectionFlags, resolve_namespace};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use store::{CreateOptions, LimitRangeStore, StoreFactory};
