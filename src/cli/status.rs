//! Status command implementation

use crate::cli::output::{format_status_json, format_status_table};
use crate::cli::{load_config, StatusArgs};
use crate::status::{build_cache, ServiceStatus, StatusCache};
use anyhow::{bail, Context};
use std::sync::Arc;

/// Refresh the requested services once and collect their status.
pub async fn collect_status(
    cache: &StatusCache,
    service: Option<&str>,
) -> anyhow::Result<Vec<Arc<ServiceStatus>>> {
    match service {
        Some(key) => {
            let status = cache
                .get_status(key)
                .await
                .with_context(|| format!("cannot show status of '{key}'"))?;
            Ok(vec![status])
        }
        None => Ok(cache.force_refresh_all().await),
    }
}

/// Handle `outpost status [SERVICE]`
pub async fn handle_status(args: &StatusArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config)?;
    config.validate()?;
    if config.services.is_empty() {
        bail!(
            "no services configured in {}; add [[services]] entries",
            args.config.display()
        );
    }

    let cache = build_cache(config.services.clone(), &config.status, &config.fallback);
    let statuses = collect_status(&cache, args.service.as_deref()).await?;

    Ok(if args.json {
        format_status_json(&statuses)
    } else {
        format_status_table(&statuses)
    })
}
