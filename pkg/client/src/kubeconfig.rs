//! Kubeconfig handling: which namespace a request targets and how to reach the cluster.

use anyhow::{Context, Result, bail};
use kube::Config;
use kube::config::{KubeConfigOptions, Kubeconfig};
use pkg_constants::api::DEFAULT_NAMESPACE;
use pkg_constants::paths::{DEFAULT_KUBECONFIG, KUBECONFIG_ENV, SERVICE_ACCOUNT_NAMESPACE};
use std::path::PathBuf;
use tracing::{debug, warn};

/// The generic kubectl connection flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFlags {
    pub namespace: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub cluster: Option<String>,
    pub user: Option<String>,
}

impl ConnectionFlags {
    fn kubeconfig_options(&self) -> KubeConfigOptions {
        KubeConfigOptions {
            context: self.context.clone(),
            cluster: self.cluster.clone(),
            user: self.user.clone(),
        }
    }

    /// Kubeconfig selector flags that were set.
    fn selectors(&self) -> Vec<&'static str> {
        [
            ("--context", &self.context),
            ("--cluster", &self.cluster),
            ("--user", &self.user),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| !v.is_empty()))
        .map(|(flag, _)| flag)
        .collect()
    }
}

/// Read the kubeconfig selected by the flags.
///
/// Returns `None` when no `--kubeconfig` was given and neither `$KUBECONFIG`
/// nor `~/.kube/config` points at an existing file.
pub fn load_kubeconfig(flags: &ConnectionFlags) -> Result<Option<Kubeconfig>> {
    if let Some(path) = &flags.kubeconfig {
        let kubeconfig = Kubeconfig::read_from(path)
            .with_context(|| format!("failed to read kubeconfig {}", path.display()))?;
        return Ok(Some(kubeconfig));
    }
    if !default_kubeconfig_present() {
        return Ok(None);
    }
    let kubeconfig = Kubeconfig::read().context("failed to read kubeconfig")?;
    Ok(Some(kubeconfig))
}

fn default_kubeconfig_present() -> bool {
    if let Some(paths) = std::env::var_os(KUBECONFIG_ENV) {
        if !paths.is_empty() {
            return std::env::split_paths(&paths).any(|p| p.is_file());
        }
    }
    dirs::home_dir().is_some_and(|home| home.join(DEFAULT_KUBECONFIG).is_file())
}

/// Namespace configured on the selected context (explicit, else current-context).
pub fn context_namespace(kubeconfig: &Kubeconfig, context: Option<&str>) -> Result<Option<String>> {
    let name = match context {
        Some(name) => name.to_string(),
        None => match &kubeconfig.current_context {
            Some(name) if !name.is_empty() => name.clone(),
            _ => return Ok(None),
        },
    };

    let Some(named) = kubeconfig.contexts.iter().find(|c| c.name == name) else {
        if context.is_some() {
            bail!("context \"{}\" does not exist", name);
        }
        return Ok(None);
    };

    Ok(named
        .context
        .as_ref()
        .and_then(|ctx| ctx.namespace.clone())
        .filter(|ns| !ns.is_empty()))
}

/// Work out the namespace a request targets.
///
/// Priority: `--namespace`, the kubeconfig context's namespace, the
/// in-cluster service account namespace, then `default`.
pub fn resolve_namespace(flags: &ConnectionFlags) -> Result<String> {
    if let Some(ns) = flags.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        return Ok(ns.to_string());
    }

    if let Some(kubeconfig) = load_kubeconfig(flags)? {
        let ns = context_namespace(&kubeconfig, flags.context.as_deref())?;
        debug!("Namespace from kubeconfig context: {:?}", ns);
        return Ok(ns.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()));
    }

    if let Ok(ns) = std::fs::read_to_string(SERVICE_ACCOUNT_NAMESPACE) {
        let ns = ns.trim();
        if !ns.is_empty() {
            debug!("Namespace from service account: {}", ns);
            return Ok(ns.to_string());
        }
    }

    Ok(DEFAULT_NAMESPACE.to_string())
}

/// Build a client configuration from the selected kubeconfig, or infer one
/// (in-cluster environment) when no kubeconfig exists.
pub async fn client_config(flags: &ConnectionFlags) -> Result<Config> {
    match load_kubeconfig(flags)? {
        Some(kubeconfig) => Config::from_custom_kubeconfig(kubeconfig, &flags.kubeconfig_options())
            .await
            .context("failed to load cluster configuration from kubeconfig"),
        None => {
            let ignored = flags.selectors();
            if !ignored.is_empty() {
                warn!(
                    "No kubeconfig found; ignoring {} and using the in-cluster configuration",
                    ignored.join(", ")
                );
            }
            Config::infer()
                .await
                .context("failed to infer cluster configuration")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: dev
clusters:
- name: local
  cluster:
    server: https://127.0.0.1:6443
users:
- name: admin
  user:
    token: not-a-real-token
contexts:
- name: dev
  context:
    cluster: local
    user: admin
    namespace: team-a
- name: bare
  context:
    cluster: local
    user: admin
"#;

    fn write_kubeconfig(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "limitrange-kubeconfig-{}-{}",
            std::process::id(),
            name
        ));
        std::fs::write(&path, KUBECONFIG).unwrap();
        path
    }

    #[test]
    fn test_explicit_namespace_wins() {
        let flags = ConnectionFlags {
            namespace: Some("test-namespace".to_string()),
            kubeconfig: Some(PathBuf::from("/nonexistent/kubeconfig")),
            ..Default::default()
        };
        assert_eq!(resolve_namespace(&flags).unwrap(), "test-namespace");
    }

    #[test]
    fn test_namespace_from_current_context() {
        let path = write_kubeconfig("current");
        let flags = ConnectionFlags {
            kubeconfig: Some(path.clone()),
            ..Default::default()
        };
        let ns = resolve_namespace(&flags);
        std::fs::remove_file(&path).ok();
        assert_eq!(ns.unwrap(), "team-a");
    }

    #[test]
    fn test_context_without_namespace_defaults() {
        let path = write_kubeconfig("bare");
        let flags = ConnectionFlags {
            kubeconfig: Some(path.clone()),
            context: Some("bare".to_string()),
            ..Default::default()
        };
        let ns = resolve_namespace(&flags);
        std::fs::remove_file(&path).ok();
        assert_eq!(ns.unwrap(), "default");
    }

    #[test]
    fn test_unknown_context_is_an_error() {
        let path = write_kubeconfig("unknown");
        let flags = ConnectionFlags {
            kubeconfig: Some(path.clone()),
            context: Some("prod".to_string()),
            ..Default::default()
        };
        let result = resolve_namespace(&flags);
        std::fs::remove_file(&path).ok();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("context \"prod\" does not exist"));
    }

    #[test]
    fn test_unreadable_explicit_kubeconfig() {
        let flags = ConnectionFlags {
            kubeconfig: Some(PathBuf::from("/nonexistent/limitrange/kubeconfig")),
            ..Default::default()
        };
        let err = resolve_namespace(&flags).unwrap_err();
        assert!(err.to_string().starts_with("failed to read kubeconfig"));
    }

    #[test]
    fn test_selectors_lists_set_flags() {
        assert!(ConnectionFlags::default().selectors().is_empty());

        let flags = ConnectionFlags {
            namespace: Some("team-a".to_string()),
            context: Some("dev".to_string()),
            cluster: Some(String::new()),
            user: Some("admin".to_string()),
            ..Default::default()
        };
        assert_eq!(flags.selectors(), vec!["--context", "--user"]);
    }

    #[tokio::test]
    async fn test_client_config_from_kubeconfig() {
        let path = write_kubeconfig("client");
        let flags = ConnectionFlags {
            kubeconfig: Some(path.clone()),
            ..Default::default()
        };
        let config = client_config(&flags).await;
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();
        assert_eq!(config.default_namespace, "team-a");
        assert_eq!(config.cluster_url.host(), Some("127.0.0.1"));
    }
}
