use crate::api::auth::{AccessToken, request_token};
use crate::api::models::{DownloadRequest, DownloadResult, InstallerQueryResult, QueryBody};
use crate::api::query::InstallerQuery;
use crate::api::{SensorDownloadApi, failure_from_response, network_error};
use crate::config::{ApiConfig, Credentials};
use crate::download::{DEFAULT_TIMEOUT, DownloadOptions, DownloadProgressAdapter, HttpFileDownloader};
use crate::error::{FetchError, Result};
use crate::paths::installer_destination;
use crate::user_agent;
use attohttpc::Session;
use chrono::Utc;
use log::{debug, info, trace};
use std::time::Duration;

pub const INSTALLER_QUERY_PATH: &str = "/sensors/combined/installers/v1";
pub const INSTALLER_DOWNLOAD_PATH: &str = "/sensors/entities/download-installer/v1";

/// Authenticated Falcon API client.
///
/// The bearer token is obtained once in [`FalconClient::connect`] and never
/// refreshed.
#[derive(Debug, Clone)]
pub struct FalconClient {
    pub(crate) session: Session,
    pub(crate) base_url: String,
    token: AccessToken,
    download_timeout: Duration,
    no_progress: bool,
}

impl FalconClient {
    pub fn connect(api: &ApiConfig, credentials: &Credentials) -> Result<Self> {
        credentials.validate()?;

        let base_url = api.resolved_base_url();
        let mut session = Session::new();
        session.header("User-Agent", user_agent::api_client());
        session.timeout(api.timeout());
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        let token = request_token(&session, &base_url, credentials)?;
        info!("Authenticated against {base_url}");

        Ok(Self {
            session,
            base_url,
            token,
            download_timeout: DEFAULT_TIMEOUT,
            no_progress: false,
        })
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn with_no_progress(mut self, no_progress: bool) -> Self {
        self.no_progress = no_progress;
        self
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    fn valid_token(&self) -> Result<&AccessToken> {
        if self.token.is_expired(Utc::now()) {
            return Err(FetchError::Authentication(format!(
                "Access token expired at {}",
                self.token
                    .expires_at()
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "an unknown time".to_string())
            )));
        }
        Ok(&self.token)
    }
}

impl SensorDownloadApi for FalconClient {
    fn get_combined_sensor_installers_by_query(
        &self,
        query: &InstallerQuery,
    ) -> Result<InstallerQueryResult> {
        let token = self.valid_token()?;
        let url = format!("{}{INSTALLER_QUERY_PATH}", self.base_url);
        let params = query.to_params();
        debug!("Querying sensor installers at {url} with {params:?}");

        let mut request = self
            .session
            .get(&url)
            .header("Authorization", token.authorization_header())
            .header("Accept", "application/json");
        for (name, value) in params {
            request = request.param(name, value);
        }

        let response = request.send().map_err(|e| network_error(&url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FetchError::NetworkError(format!("Failed to read response body: {e}")))?;

        if !(200..300).contains(&status) {
            debug!("Installer query failed with status {status}");
            trace!("Response body: {body}");
            return Err(failure_from_response(status, &body));
        }

        let body: QueryBody = serde_json::from_str(&body).inspect_err(|e| {
            debug!("Failed to parse installer query response: {e}");
            trace!("Response body: {body}");
        })?;
        debug!("Installer query returned {} record(s)", body.resources.len());

        Ok(InstallerQueryResult {
            status_code: status,
            body,
        })
    }

    fn download_sensor_installer(&self, request: &DownloadRequest) -> Result<DownloadResult> {
        let token = self.valid_token()?;
        let destination = installer_destination(&request.download_path, &request.file_name)?;
        let url = format!("{}{INSTALLER_DOWNLOAD_PATH}", self.base_url);
        info!("Downloading installer {} to {}", request.id, destination.display());

        let mut downloader = HttpFileDownloader::new().with_progress_reporter(Box::new(
            DownloadProgressAdapter::for_installer(self.no_progress, &request.file_name),
        ));

        let params = vec![("id".to_string(), request.id.clone())];
        let headers = vec![
            ("Authorization".to_string(), token.authorization_header()),
            ("Accept".to_string(), "application/octet-stream".to_string()),
        ];
        let options = DownloadOptions {
            timeout: self.download_timeout,
            ..Default::default()
        };

        let file = downloader.download(&url, &params, headers, &destination, &options)?;

        Ok(DownloadResult {
            id: request.id.clone(),
            path: file.path,
            bytes_written: file.bytes_written,
            status_code: file.status_code,
        })
    }
}
