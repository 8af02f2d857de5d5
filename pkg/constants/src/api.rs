//! Kubernetes API identity and resource naming constants.

// ─── Object identity ───────────────────────────────────────────────────────

/// `apiVersion` of the core group objects this plugin produces.
pub const API_VERSION: &str = "v1";

/// `kind` of the produced object.
pub const KIND: &str = "LimitRange";

/// Resource prefix used in the confirmation line (`limitrange.core "x" created`).
pub const RESOURCE_DISPLAY_NAME: &str = "limitrange.core";

// ─── LimitRange items ──────────────────────────────────────────────────────

/// Limit type for container-scoped enforcement.
pub const LIMIT_TYPE_CONTAINER: &str = "Container";

/// Resource name for CPU quantities.
pub const RESOURCE_CPU: &str = "cpu";

/// Resource name for memory quantities.
pub const RESOURCE_MEMORY: &str = "memory";

// ─── Requests ──────────────────────────────────────────────────────────────

/// Namespace used when neither a flag nor a kubeconfig context names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Value of the `dryRun` query parameter for a server-side dry run.
pub const DRY_RUN_ALL: &str = "All";
