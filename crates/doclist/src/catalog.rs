use doclist_core::provider::parse_catalog;
use doclist_core::{FetchError, ProviderRecord};
use log::{debug, info};
use std::time::Duration;

/// Fetch the doctor catalog once
///
/// Transport, HTTP status and payload problems all become a [`FetchError`];
/// the controller treats any of them as terminal.
pub async fn fetch_catalog(url: String, timeout: u64) -> Result<Vec<ProviderRecord>, FetchError> {
    debug!("event=catalog_fetch module=catalog status=start url={url}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| FetchError::Request(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| map_transport_error(e, timeout))?;

    let records = parse_catalog(&body)?;
    info!(
        "event=catalog_fetch module=catalog status=ok records={}",
        records.len()
    );
    Ok(records)
}

fn map_transport_error(error: reqwest::Error, timeout: u64) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(timeout)
    } else {
        FetchError::Request(error.to_string())
    }
}
