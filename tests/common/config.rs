//! Pipeline configuration helpers for E2E tests

use notice_dl::Config;
use std::path::Path;
use std::time::Duration;

/// Build a pipeline configuration aimed at a mock source
///
/// The politeness delay is zeroed and the retry policy collapses to two
/// fast retries after the initial request, so failure tests exercise the
/// retry path without waiting out real backoff sleeps.
pub fn test_config(server_uri: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.base_url = server_uri.to_string();
    config.output_dir = output_dir.to_path_buf();
    config.http.politeness_delay = Duration::ZERO;
    config.http.request_timeout = Duration::from_secs(5);
    config.retry.max_attempts = 2;
    config.retry.initial_delay = Duration::from_millis(5);
    config.retry.max_delay = Duration::from_millis(20);
    config.retry.jitter = false;
    config
}
