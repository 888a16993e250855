//! `update` command and the automatic release check.

use std::time::Duration;

use semver::Version;

use crate::cli::dispatch::Services;
use crate::core::http::{UPDATE_CHECK_TIMEOUT, build_client, fetch_json};
use crate::core::models::Release;
use crate::error::{RainforestError, Result};
use crate::render::render_update_status;
use crate::storage::ResolvedConfig;

/// Version of this binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

fn parse_version(raw: &str) -> Result<Version> {
    Version::parse(raw.trim().trim_start_matches('v')).map_err(|e| {
        RainforestError::ParseResponse(format!("invalid version \"{raw}\": {e}"))
    })
}

/// Whether `latest` is newer than `current`.
///
/// # Errors
///
/// Returns `ParseResponse` if either is not a semantic version.
pub fn is_newer(current: &str, latest: &str) -> Result<bool> {
    Ok(parse_version(latest)? > parse_version(current)?)
}

/// Fetch the release manifest and return it if it is newer than this build.
///
/// # Errors
///
/// Returns error on network failure or a malformed manifest.
pub async fn check_for_update(
    update_url: &str,
    current: &str,
    timeout: Duration,
) -> Result<Option<Release>> {
    let client = build_client(timeout)?;
    let release: Release = fetch_json(&client, update_url, timeout).await?;
    tracing::debug!(latest = %release.version, current, "fetched release manifest");
    Ok(is_newer(current, &release.version)?.then_some(release))
}

/// Execute the update command.
///
/// # Errors
///
/// Returns error if the release manifest cannot be fetched or parsed.
pub async fn execute(services: &Services) -> Result<String> {
    let config = &services.config;
    match check_for_update(&config.update_url, CURRENT_VERSION, config.timeout).await? {
        Some(release) => Ok(render_update_status(
            CURRENT_VERSION,
            &release.version,
            release.url.as_deref(),
        )),
        None => Ok(format!("rainforest {CURRENT_VERSION} is up to date\n")),
    }
}

/// Background check run after other commands. Failures are only logged.
///
/// Returns the notice to show, if any.
pub async fn auto_check(config: &ResolvedConfig) -> Option<String> {
    if !config.check_updates {
        tracing::debug!(source = %config.sources.check_updates, "update check disabled");
        return None;
    }

    match check_for_update(&config.update_url, CURRENT_VERSION, UPDATE_CHECK_TIMEOUT).await {
        Ok(Some(release)) => Some(render_update_status(
            CURRENT_VERSION,
            &release.version,
            release.url.as_deref(),
        )),
        Ok(None) => None,
        Err(err) => {
            tracing::debug!(error = %err, "update check failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semver_comparison() {
        assert!(is_newer("0.1.0", "0.2.0").unwrap());
        assert!(is_newer("1.9.0", "v1.10.0").unwrap());
        assert!(!is_newer("1.0.0", "1.0.0").unwrap());
        assert!(!is_newer("1.0.0", "1.0.0-rc.1").unwrap());
        assert!(!is_newer("2.0.0", "1.9.9").unwrap());
    }

    #[test]
    fn malformed_version_is_parse_error() {
        let err = is_newer("1.0.0", "latest").unwrap_err();
        assert!(matches!(err, RainforestError::ParseResponse(_)));
    }
}
