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

use serde::{Deserialize, Serialize};
use std::fmt;

pub const RELEASE_DATE_DESC: &str = "release_date.desc";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SensorPlatform {
    #[default]
    Windows,
    Mac,
    Linux,
}

impl SensorPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorPlatform::Windows => "windows",
            SensorPlatform::Mac => "mac",
            SensorPlatform::Linux => "linux",
        }
    }

    /// FQL filter selecting installers for this platform.
    pub fn filter(&self) -> String {
        format!("platform:'{}'", self.as_str())
    }
}

impl fmt::Display for SensorPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallerQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

impl InstallerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// The newest installer for `platform`: first record, newest release first.
    pub fn latest_for(platform: SensorPlatform) -> Self {
        Self::new()
            .offset(0)
            .limit(1)
            .sort(RELEASE_DATE_DESC)
            .filter(platform.filter())
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Query string parameters in a stable order, unset fields omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(ref filter) = self.filter {
            params.push(("filter", filter.clone()));
        }
        params
    }
}
