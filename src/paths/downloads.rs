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

use crate::error::{FetchError, Result};
use dirs::home_dir;
use std::path::{Path, PathBuf};

pub const DOWNLOADS_DIR: &str = "Downloads";

/// `~/Downloads`, resolved from the current user's home directory.
pub fn default_download_dir() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join(DOWNLOADS_DIR))
        .ok_or_else(|| FetchError::DirectoryNotFound("user home directory".to_string()))
}

/// Join the installer file name onto its directory.
///
/// The name must be a single path component so the download cannot escape
/// the chosen directory. It is used verbatim.
pub fn installer_destination(directory: &Path, file_name: &str) -> Result<PathBuf> {
    if file_name.trim().is_empty() {
        return Err(FetchError::ValidationError(
            "Installer file name must not be empty".to_string(),
        ));
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(directory.join(file_name)),
        _ => Err(FetchError::ValidationError(format!(
            "Installer file name must be a plain file name, got '{file_name}'"
        ))),
    }
}
