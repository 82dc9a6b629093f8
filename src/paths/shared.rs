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
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Ensure the provided directory exists, returning it on success.
pub fn ensure_directory(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path).map_err(|error| match error.kind() {
        ErrorKind::PermissionDenied => FetchError::PermissionDenied(path.display().to_string()),
        _ => FetchError::Download(format!(
            "Failed to create directory {}: {error}",
            path.display()
        )),
    })?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_directory_creates_nested_path() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let created = ensure_directory(&nested).unwrap();

        assert_eq!(created, nested);
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_directory_accepts_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ensure_directory(temp_dir.path()).is_ok());
    }

    #[test]
    fn ensure_directory_fails_when_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("occupied");
        fs::write(&file, b"x").unwrap();

        assert!(ensure_directory(&file.join("child")).is_err());
    }
}
