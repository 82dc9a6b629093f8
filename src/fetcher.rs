// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The query → extract → download routine for the newest sensor installer.

use crate::api::{
    DownloadRequest, DownloadResult, InstallerQuery, InstallerQueryResult, SensorDownloadApi,
    SensorPlatform,
};
use crate::config::{DEFAULT_INSTALLER_FILE_NAME, DownloadConfig};
use crate::error::{FetchError, Result};
use crate::paths::default_download_dir;
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;

/// Directory and file name the installer is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Destination {
    /// Surrounding whitespace is stripped from `file_name`.
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        let file_name: String = file_name.into();
        Self {
            directory: directory.into(),
            file_name: file_name.trim().to_string(),
        }
    }

    /// `~/Downloads/cs_installer.exe`
    pub fn home_downloads() -> Result<Self> {
        Ok(Self::new(default_download_dir()?, DEFAULT_INSTALLER_FILE_NAME))
    }

    pub fn from_config(config: &DownloadConfig) -> Result<Self> {
        Ok(Self::new(config.resolve_directory()?, config.file_name.clone()))
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub query: InstallerQueryResult,
    pub download: DownloadResult,
}

pub struct InstallerFetcher<'a> {
    api: &'a dyn SensorDownloadApi,
    platform: SensorPlatform,
}

impl<'a> InstallerFetcher<'a> {
    pub fn new(api: &'a dyn SensorDownloadApi) -> Self {
        Self {
            api,
            platform: SensorPlatform::default(),
        }
    }

    pub fn with_platform(mut self, platform: SensorPlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> SensorPlatform {
        self.platform
    }

    /// The one query this routine ever sends.
    pub fn query(&self) -> InstallerQuery {
        InstallerQuery::latest_for(self.platform)
    }

    pub fn query_latest(&self) -> Result<InstallerQueryResult> {
        let query = self.query();
        debug!("Querying latest {} installer: {query:?}", self.platform);
        self.api.get_combined_sensor_installers_by_query(&query)
    }

    /// SHA-256 of the first installer record, returned exactly as received.
    pub fn latest_installer_id(&self, result: &InstallerQueryResult) -> Result<String> {
        let installer = result
            .first_installer()
            .ok_or_else(|| FetchError::NoInstallerFound {
                platform: self.platform.to_string(),
            })?;

        let id = installer
            .sha256
            .clone()
            .ok_or_else(|| FetchError::MissingField("sha256".to_string()))?;

        if !is_sha256_hex(&id) {
            warn!("Installer id '{id}' does not look like a SHA-256 digest");
        }
        Ok(id)
    }

    pub fn download_latest(&self, id: &str, destination: &Destination) -> Result<DownloadResult> {
        let request = DownloadRequest {
            id: id.to_string(),
            download_path: destination.directory.clone(),
            file_name: destination.file_name.clone(),
        };
        info!("Downloading installer {id} to {}", destination.path().display());
        self.api.download_sensor_installer(&request)
    }

    pub fn fetch_latest(&self, destination: &Destination) -> Result<FetchOutcome> {
        self.fetch_latest_with(destination, |_| Ok(()))
    }

    /// Like [`fetch_latest`](Self::fetch_latest), handing the query result to
    /// `on_query` before the download starts.
    pub fn fetch_latest_with<F>(
        &self,
        destination: &Destination,
        mut on_query: F,
    ) -> Result<FetchOutcome>
    where
        F: FnMut(&InstallerQueryResult) -> Result<()>,
    {
        let query = self.query_latest()?;
        on_query(&query)?;
        let id = self.latest_installer_id(&query)?;
        let download = self.download_latest(&id, destination)?;
        Ok(FetchOutcome { query, download })
    }
}

fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}
