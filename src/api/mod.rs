//! Falcon API access: OAuth2 token exchange, the combined installer query and
//! the installer download.

pub mod auth;
pub mod client;
pub mod models;
pub mod query;


pub use auth::AccessToken;
pub use client::{FalconClient, INSTALLER_DOWNLOAD_PATH, INSTALLER_QUERY_PATH};
pub use models::{
    ApiErrorDetail, DownloadRequest, DownloadResult, InstallerQueryResult, Pagination, QueryBody,
    QueryMeta, SensorInstaller,
};
pub use query::{InstallerQuery, RELEASE_DATE_DESC, SensorPlatform};

use crate::error::{FetchError, Result};
use models::ErrorEnvelope;

/// The two sensor-download operations the fetcher needs.
///
/// `FalconClient` talks to the real service; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
pub trait SensorDownloadApi {
    fn get_combined_sensor_installers_by_query(
        &self,
        query: &InstallerQuery,
    ) -> Result<InstallerQueryResult>;

    fn download_sensor_installer(&self, request: &DownloadRequest) -> Result<DownloadResult>;
}

/// Build the error for a non-2xx Falcon response.
///
/// Falcon error bodies carry `errors[].message`; those are preferred over a
/// generic message derived from the status.
pub fn failure_from_response(status: u16, body: &str) -> FetchError {
    let messages: Vec<String> = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| {
            envelope
                .errors
                .into_iter()
                .map(|e| e.message)
                .filter(|m| !m.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();

    let message = if messages.is_empty() {
        fallback_message(status)
    } else {
        messages.join("; ")
    };

    match status {
        401 => FetchError::Authentication(message),
        _ => FetchError::Api { status, message },
    }
}

fn fallback_message(status: u16) -> String {
    match status {
        401 | 403 => "Access denied. Check the API client credentials and scopes".to_string(),
        404 => "The requested resource was not found".to_string(),
        429 => "Rate limit exceeded".to_string(),
        500..=599 => "Server error occurred on the Falcon API. Please try again later".to_string(),
        _ => attohttpc::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

pub(crate) fn network_error(url: &str, error: attohttpc::Error) -> FetchError {
    FetchError::NetworkError(format!(
        "Failed to connect to {url}: {error}. Please check your internet connection and proxy settings"
    ))
}
