use crate::run::run;
use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use pkg_client::{ConnectionFlags, KubeStoreFactory, StoreFactory, resolve_namespace};
use pkg_types::config::{LimitRangeConfigFile, load_config_file};
use pkg_types::options::LimitRangeOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = r#"Examples:
  # Create a LimitRange with CPU and memory limits in the specified namespace
  kubectl create limitrange my-limitrange --namespace=my-namespace --max-cpu=1 --min-cpu=100m --default-cpu=500m --default-request-cpu=500m --max-memory=500Mi --min-memory=100Mi

  # Print a LimitRange with only CPU limits instead of creating it
  kubectl create limitrange my-cpu-limit --namespace=my-namespace --max-cpu=2 --min-cpu=500m --default-cpu=1 --default-request-cpu=500m --dry-run=client -o yaml"#;

#[derive(Parser, Debug, Clone)]
#[command(about = "Create a LimitRange resource", after_help = EXAMPLES)]
pub struct Cli {
    /// Name of the LimitRange
    pub name: String,

    /// Namespace to create the LimitRange in (defaults to the kubeconfig context's namespace)
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Name of the kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Name of the kubeconfig cluster to use
    #[arg(long)]
    pub cluster: Option<String>,

    /// Name of the kubeconfig user to use
    #[arg(long)]
    pub user: Option<String>,

    /// Maximum CPU limit for containers
    #[arg(long)]
    pub max_cpu: Option<String>,

    /// Minimum CPU limit for containers
    #[arg(long)]
    pub min_cpu: Option<String>,

    /// Default CPU limit for containers
    #[arg(long)]
    pub default_cpu: Option<String>,

    /// Default CPU request for containers
    #[arg(long)]
    pub default_request_cpu: Option<String>,

    /// Maximum memory limit for containers
    #[arg(long)]
    pub max_memory: Option<String>,

    /// Minimum memory limit for containers
    #[arg(long)]
    pub min_memory: Option<String>,

    /// Must be 'client' or 'server'. If set, only print the object that would be sent without persisting it.
    #[arg(long, default_value = "")]
    pub dry_run: String,

    /// Output format. One of: yaml|json
    #[arg(long, short = 'o', default_value = "")]
    pub output: String,

    /// YAML file with default values for the limit and output flags (not read unless given)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A parsed invocation: request options plus where to find the cluster.
#[derive(Debug, Clone, Default)]
pub struct LimitRangeCommand {
    pub options: LimitRangeOptions,
    pub connection: ConnectionFlags,
    /// Defaults file; `None` skips loading one.
    pub config_path: Option<PathBuf>,
}

impl From<Cli> for LimitRangeCommand {
    fn from(cli: Cli) -> Self {
        let options = LimitRangeOptions {
            namespace: cli.namespace.clone().unwrap_or_default(),
            name: cli.name,
            max_cpu: cli.max_cpu,
            min_cpu: cli.min_cpu,
            default_cpu: cli.default_cpu,
            default_request_cpu: cli.default_request_cpu,
            max_memory: cli.max_memory,
            min_memory: cli.min_memory,
            dry_run: cli.dry_run,
            output: cli.output,
        };
        let connection = ConnectionFlags {
            namespace: cli.namespace,
            kubeconfig: cli.kubeconfig,
            context: cli.context,
            cluster: cli.cluster,
            user: cli.user,
        };
        Self {
            options,
            connection,
            config_path: cli.config,
        }
    }
}

impl LimitRangeCommand {
    /// Fill in what the flags left out: the namespace from kubeconfig and
    /// any limits or output format from the defaults file.
    pub fn complete(&mut self) -> Result<()> {
        if self.options.namespace.is_empty() {
            self.options.namespace =
                resolve_namespace(&self.connection).context("failed to get current namespace")?;
        }

        if let Some(path) = &self.config_path {
            let file: LimitRangeConfigFile = load_config_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
            file.apply_defaults(&mut self.options);
        }

        debug!("Completed options: {:?}", self.options);
        Ok(())
    }
}

/// complete → validate → run, each stage's error labelled with the stage.
pub async fn execute(
    mut command: LimitRangeCommand,
    factory: &dyn StoreFactory,
    out: &mut dyn Write,
) -> Result<()> {
    command.complete().context("completion error")?;
    command.options.validate().context("validation error")?;
    run(&command.options, factory, out)
        .await
        .context("execution error")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Process entry point shared by both plugin binaries.
pub async fn main_with(bin: &'static str) -> ExitCode {
    init_tracing();

    let matches = Cli::command().name(bin).bin_name(bin).get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let command = LimitRangeCommand::from(cli);
    info!("Running {} for {}", bin, command.options.name);
    let factory = KubeStoreFactory::new(command.connection.clone());
    let mut out = std::io::stdout().lock();

    match execute(command, &factory, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error executing {}: {:#}", bin, err);
            ExitCode::FAILURE
        }
    }
}
