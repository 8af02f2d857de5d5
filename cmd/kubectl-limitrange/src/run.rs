use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::LimitRange;
use pkg_client::{CreateOptions, StoreFactory};
use pkg_constants::api::RESOURCE_DISPLAY_NAME;
use pkg_types::options::{DryRunMode, LimitRangeOptions, OutputFormat};
use pkg_types::output::render;
use std::io::Write;
use tracing::{debug, info};

/// Create, print, or dry-run the LimitRange described by `options`.
///
/// Validation runs again here so `run` is safe to call on its own. The store
/// factory is only consulted when the request leaves the client: an invalid
/// `--dry-run` value or a client-side dry run never connects.
pub async fn run(
    options: &LimitRangeOptions,
    factory: &dyn StoreFactory,
    out: &mut dyn Write,
) -> Result<()> {
    let request = options.validate()?;
    let limit_range = request.build();
    let mode: DryRunMode = options.dry_run.parse()?;
    debug!("Dry-run mode: {:?}", mode);

    let create_options = match mode {
        DryRunMode::Client => return print_object(&limit_range, &options.output, out),
        DryRunMode::Server => CreateOptions::server_dry_run(),
        DryRunMode::None => CreateOptions::default(),
    };

    let store = factory
        .connect()
        .await
        .context("failed to create Kubernetes client")?;
    let created = store
        .create(&request.namespace, &limit_range, &create_options)
        .await
        .context("failed to create LimitRange")?;

    if mode == DryRunMode::Server {
        // Some servers answer a dry run with an empty body.
        let shown = created.unwrap_or(limit_range);
        return print_object(&shown, &options.output, out);
    }

    info!("Created LimitRange {}/{}", request.namespace, request.name);
    writeln!(out, "{} {:?} created", RESOURCE_DISPLAY_NAME, request.name)?;
    Ok(())
}

fn print_object(limit_range: &LimitRange, output: &str, out: &mut dyn Write) -> Result<()> {
    let format: OutputFormat = output.parse()?;
    let text = render(limit_range, format)?;
    out.write_all(text.as_bytes())?;
    Ok(())
}
