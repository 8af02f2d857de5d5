//! Filesystem path constants.

/// Namespace file mounted into pods with a service account token.
pub const SERVICE_ACCOUNT_NAMESPACE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Kubeconfig location, relative to the user's home directory.
pub const DEFAULT_KUBECONFIG: &str = ".kube/config";

/// Environment variable holding an explicit kubeconfig path list.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";
