//! Serve command implementation

use crate::cli::{load_config, ServeArgs};
use crate::config::{ConfigError, OutpostConfig};
use crate::status::{build_cache, Scheduler, StatusState};
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &ServeArgs) -> Result<OutpostConfig, ConfigError> {
    let mut config = load_config(&args.config)?;

    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if let Some(ttl) = args.ttl {
        config.status.ttl_seconds = ttl;
    }
    if let Some(interval) = args.interval {
        config.scheduler.interval_seconds = interval;
    }
    if args.no_fallback {
        config.fallback.enabled = false;
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    crate::logging::init_tracing(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    tracing::info!(
        services = config.services.len(),
        ttl_seconds = config.status.ttl_seconds,
        fallback = config.fallback.enabled,
        "Starting Outpost"
    );
    tracing::debug!(?config, "Loaded configuration");

    if config.services.is_empty() {
        tracing::warn!("No services configured; nothing to refresh");
    }

    let cache = build_cache(config.services.clone(), &config.status, &config.fallback);
    let cancel_token = CancellationToken::new();

    let scheduler_handle = if config.scheduler.enabled {
        let handle = Scheduler::from_config(cache.clone(), &config.scheduler)
            .start(cancel_token.clone())
            .await;
        let snapshot = cache.snapshot();
        let degraded = snapshot.iter().filter(|s| s.state().is_degraded()).count();
        let unknown = snapshot
            .iter()
            .filter(|s| s.state() == StatusState::Unknown)
            .count();
        tracing::info!(
            services = snapshot.len(),
            degraded,
            unknown,
            "Initial status refresh completed"
        );
        Some(handle)
    } else {
        tracing::info!("Status scheduler disabled; entries refresh on read only");
        None
    };

    shutdown_signal(cancel_token.clone()).await;

    if let Some(handle) = scheduler_handle {
        tracing::info!("Waiting for status scheduler to stop");
        handle.await?;
    }

    tracing::info!("Outpost stopped");
    Ok(())
}
