//! Command-line entry point
//!
//! Every flag has an environment-variable alternative and a default, so the
//! binary walks the default source into `./data` when invoked bare. The
//! run prints its processed/skipped/failed summary and exits non-zero only
//! when the listing itself cannot be retrieved.

use clap::Parser;
use notice_dl::{Config, Pipeline, run_with_shutdown};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "notice-dl",
    version,
    about = "Download regulatory decision notices into numbered case directories"
)]
struct Cli {
    /// Source site base URL
    #[arg(long, env = "NOTICE_DL_BASE_URL")]
    base_url: Option<String>,

    /// Directory the case-<n> folders are written under
    #[arg(long, env = "NOTICE_DL_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Retries after the first attempt, for each network operation
    #[arg(long, env = "NOTICE_DL_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, env = "NOTICE_DL_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// Stop after this many listing pages (default: walk them all)
    #[arg(long, env = "NOTICE_DL_MAX_PAGES")]
    max_pages: Option<u32>,

    /// Delay between notices in seconds
    #[arg(long, env = "NOTICE_DL_POLITENESS_DELAY")]
    politeness_delay: Option<u64>,
}

impl Cli {
    /// Overlay the provided flags onto the configuration defaults
    fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(base_url) = self.base_url {
            config.source.base_url = base_url;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(max_retries) = self.max_retries {
            config.retry.max_attempts = max_retries;
        }
        if let Some(secs) = self.request_timeout {
            config.http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max_pages) = self.max_pages {
            config.source.max_pages = Some(max_pages);
        }
        if let Some(secs) = self.politeness_delay {
            config.http.politeness_delay = Duration::from_secs(secs);
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build pipeline");
            return ExitCode::FAILURE;
        }
    };

    match run_with_shutdown(pipeline).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_overlay_the_defaults() {
        let cli = Cli {
            base_url: Some("https://example.org".to_string()),
            output_dir: Some(PathBuf::from("/tmp/notices")),
            max_retries: Some(2),
            request_timeout: Some(10),
            max_pages: Some(3),
            politeness_delay: Some(0),
        };

        let config = cli.into_config();

        assert_eq!(config.source.base_url, "https://example.org");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/notices"));
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.http.request_timeout, Duration::from_secs(10));
        assert_eq!(config.source.max_pages, Some(3));
        assert_eq!(config.http.politeness_delay, Duration::ZERO);
    }

    #[test]
    fn absent_flags_keep_the_defaults() {
        let cli = Cli {
            base_url: None,
            output_dir: None,
            max_retries: None,
            request_timeout: None,
            max_pages: None,
            politeness_delay: None,
        };

        let config = cli.into_config();
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.retry.max_attempts, defaults.retry.max_attempts);
        assert_eq!(config.http.request_timeout, defaults.http.request_timeout);
        assert_eq!(config.source.max_pages, None);
    }
}
