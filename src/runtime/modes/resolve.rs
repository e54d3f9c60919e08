//! Resolve mode
//!
//! Runs one lookup against the configured API with no pacing delay, the same
//! way the redirect view does, and prints where the code leads.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::client::{HttpLinkApi, LinkApi};
use crate::config::get_config;
use crate::resolver::{RedirectResolver, ResolveOutcome};

/// Returns `true` when the code resolved
pub async fn run_resolve(short_code: &str) -> Result<bool> {
    let config = get_config();
    let api: Arc<dyn LinkApi> = Arc::new(
        HttpLinkApi::from_config(&config.api).context("Failed to build link API client")?,
    );

    debug!("Resolving {} against {}", short_code, config.api.base_url);
    let resolver = RedirectResolver::new(api, Duration::ZERO);

    match resolver.resolve(short_code).await {
        ResolveOutcome::Navigate(target) => {
            println!("{}", target);
            Ok(true)
        }
        ResolveOutcome::NotFound => {
            eprintln!("not found: {}", short_code);
            Ok(false)
        }
    }
}
