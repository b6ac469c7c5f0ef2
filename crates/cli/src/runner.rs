// runner.rs
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use favscan_common::{ProbeOptions, Prober};
use favscan_fingerprint::SignatureStore;
use favscan_orchestrator::Orchestrator;
use favscan_scanner_http::HttpProber;
use favscan_target_resolver::{ResolverOptions, TargetResolver};

use crate::args::{EngineArgs, OutputFormat};
use crate::output::print_results;
use crate::server;

/// Load the signature database and wire up the engine.
///
/// The database is loaded here, before anything serves or probes, so a
/// missing or malformed file stops the process.
pub fn build_orchestrator(engine: &EngineArgs) -> Result<Orchestrator> {
    let store = SignatureStore::load(&engine.signatures).with_context(|| {
        format!(
            "Failed to load signature database {}",
            engine.signatures.display()
        )
    })?;
    info!("Signatures: {} loaded from {}", store.len(), engine.signatures.display());

    let prober = HttpProber::with_options(Arc::new(store), probe_options(engine))
        .context("Failed to build HTTP client")?;
    let opts = prober.options();
    info!(
        "Prober: {} (timeout {}s, port {}, user agent {})",
        prober.name(),
        opts.timeout.as_secs(),
        opts.port,
        opts.user_agent
    );

    let mut resolver_options = ResolverOptions::default();
    if let Some(max) = engine.max_addresses {
        resolver_options = resolver_options.with_max_addresses(max);
    }

    let mut orchestrator = Orchestrator::new(Arc::new(prober), TargetResolver::new(resolver_options));
    if let Some(concurrency) = engine.concurrency {
        orchestrator = orchestrator.with_concurrency(concurrency);
    }
    info!("Concurrency: {}", orchestrator.concurrency());

    Ok(orchestrator)
}

fn probe_options(engine: &EngineArgs) -> ProbeOptions {
    let options = ProbeOptions::default()
        .with_timeout(Duration::from_secs(engine.timeout))
        .with_port(engine.port)
        .with_max_body_bytes(engine.max_body_bytes);
    match &engine.user_agent {
        Some(user_agent) => options.with_user_agent(user_agent.as_str()),
        None => options,
    }
}

pub async fn run_check(
    engine: &EngineArgs,
    targets: Vec<String>,
    output_format: OutputFormat,
) -> Result<()> {
    let orchestrator = build_orchestrator(engine)?;
    info!("Targets: {}", targets.join(", "));

    let start = Instant::now();
    let results = orchestrator.fingerprint_all(targets.clone()).await;
    let duration = start.elapsed();

    print_results(&targets, &results, output_format, duration)?;
    Ok(())
}

pub async fn run_serve(engine: &EngineArgs, bind: SocketAddr) -> Result<()> {
    let orchestrator = build_orchestrator(engine)?;
    server::serve(Arc::new(orchestrator), bind).await
}
