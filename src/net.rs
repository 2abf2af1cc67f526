//! Shared HTTP plumbing: client construction and the connectivity probe.

use crate::error::Result;
use std::time::Duration;
use tracing::debug;

/// Default timeout for content fetches.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Probe target; returns 204 and is stable enough to treat as a reachability
/// oracle.
const PROBE_URL: &str = "https://www.gstatic.com/generate_204";

/// The probe gives up after this long.
const PROBE_TIMEOUT_SECS: u64 = 5;

const USER_AGENT: &str = concat!("kort/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used for page and transcript fetches.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Check network reachability with a short deadline.
///
/// Any response at all counts as reachable; only transport-level failure
/// means offline.
pub async fn check_connectivity(client: &reqwest::Client) -> bool {
    let result = client
        .head(PROBE_URL)
        .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
        .send()
        .await;

    match result {
        Ok(_) => true,
        Err(e) => {
            debug!("Connectivity probe failed: {}", e);
            false
        }
    }
}
