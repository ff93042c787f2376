//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "badge-api")]
#[command(about = "Loyalty status badge image server")]
pub struct Args {
    /// Listen address
    #[arg(short, long, env = "BADGE_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Log level
    #[arg(long, env = "BADGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Directory holding fonts, backgrounds, cards and icons
    #[arg(long, env = "BADGE_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Fetch assets over HTTP from this base URL instead of the assets directory
    #[arg(long, env = "BADGE_ASSET_BASE_URL")]
    pub asset_base_url: Option<String>,

    /// Badge configuration file (YAML). Built-in defaults when omitted.
    #[arg(long, env = "BADGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Timeout for a single HTTP asset fetch
    #[arg(long, env = "BADGE_ASSET_TIMEOUT_MS", default_value_t = 2000)]
    pub asset_timeout_ms: u64,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Args {
    pub fn asset_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["badge-api"]).unwrap();
        assert_eq!(args.listen, "0.0.0.0:8080");
        assert_eq!(args.assets_dir, PathBuf::from("assets"));
        assert!(args.asset_base_url.is_none());
        assert_eq!(args.asset_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_http_assets() {
        let args = Args::try_parse_from([
            "badge-api",
            "--asset-base-url",
            "https://cdn.example.com/badge",
            "--asset-timeout-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(
            args.asset_base_url.as_deref(),
            Some("https://cdn.example.com/badge")
        );
        assert_eq!(args.asset_timeout(), Duration::from_millis(1));
    }
}
