//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use badge_common::BadgeConfig;
use badge_renderer::{AssetProvider, BadgeComposer, FsAssetProvider, HttpAssetProvider};

use crate::config::Args;
use crate::metrics::MetricsCollector;

/// Shared application state.
///
/// The composer holds only immutable configuration and an asset provider;
/// every render builds its own canvas.
pub struct AppState {
    pub composer: Arc<BadgeComposer>,
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    /// Build state from command-line arguments.
    ///
    /// Must run outside the async runtime: the HTTP asset provider creates a
    /// blocking client.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => BadgeConfig::from_file(path)
                .with_context(|| format!("loading badge config {}", path.display()))?,
            None => BadgeConfig::default(),
        };

        let assets: Arc<dyn AssetProvider> = match &args.asset_base_url {
            Some(url) => Arc::new(HttpAssetProvider::new(url.clone(), args.asset_timeout())?),
            None => Arc::new(FsAssetProvider::new(args.assets_dir.clone())),
        };
        info!(
            assets = %assets.describe(),
            width = config.canvas.target_width,
            height = config.canvas.target_height,
            scale = config.canvas.scale_factor,
            "Badge renderer configured"
        );

        Self::new(config, assets)
    }

    pub fn new(config: BadgeConfig, assets: Arc<dyn AssetProvider>) -> Result<Self> {
        let composer = BadgeComposer::new(config, assets)?;
        Ok(Self {
            composer: Arc::new(composer),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }
}
