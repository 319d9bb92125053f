// # dynzoned - dynzone daemon
//
// Thin integration layer only:
// 1. Load and validate the YAML job file
// 2. Initialize tracing
// 3. Register providers and build the runner
// 4. Run one reconcile cycle per interval until shutdown
//
// All reconciliation logic lives in dynzone-core. A failed cycle is logged
// and retried on the next tick; nothing here ever terminates the loop.
//
// ## Usage
//
// ```bash
// dynzoned /etc/dynzone/config.yml
// ```
//
// The job file:
//
// ```yaml
// interval_secs: 600
// log_level: info
// jobs:
//   - provider: hetzner
//     api_key: "..."
//     zone: "example.com"
//     names: ["www", "home"]
//     type: A
//     save_path: "/var/lib/dynzone/example-com.json"
// ```

use anyhow::{Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use dynzone_core::cache::StalenessPolicy;
use dynzone_core::{AppConfig, JobRunner, ProviderRegistry};
use dynzone_ip_http::HttpIpResolver;

/// Exit codes following systemd conventions
#[derive(Debug, Clone, Copy)]
enum ExitStatus {
    /// Clean shutdown
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

fn load_config(path: &str) -> Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let config: AppConfig =
        serde_yaml::from_str(&content).with_context(|| format!("failed to parse {path}"))?;
    Ok(config)
}

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yml".to_string());

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e:#}");
            return ExitStatus::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("configuration validation error: {e}");
        return ExitStatus::ConfigError.into();
    }

    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return ExitStatus::ConfigError.into();
    }

    info!("starting dynzoned with {} job(s)", config.jobs.len());

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return ExitStatus::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config).await {
            Ok(()) => ExitStatus::CleanShutdown,
            Err(e) => {
                error!("daemon error: {e:#}");
                ExitStatus::RuntimeError
            }
        }
    })
    .into()
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    let registry = Arc::new(ProviderRegistry::new());
    dynzone_provider_hetzner::register(&registry);
    info!("registered providers: {}", registry.names().join(", "));

    let resolver = Arc::new(HttpIpResolver::new(&config.resolver)?);
    let policy = StalenessPolicy::from_secs(
        config.engine.refresh_window_secs,
        config.engine.refresh_jitter_secs,
    );
    let runner = JobRunner::with_policy(registry, resolver, policy);

    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let summary = runner.run(&config.jobs).await;
                if summary.failed() > 0 {
                    warn!(
                        "cycle finished: {}/{} job(s) failed, retrying next cycle",
                        summary.failed(),
                        summary.jobs.len()
                    );
                } else {
                    info!("cycle finished: all {} job(s) ok", summary.jobs.len());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
