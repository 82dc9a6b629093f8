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

use crate::error::FetchError;

pub struct ErrorContext<'a> {
    pub error: &'a FetchError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a FetchError) -> Self {
        let (suggestion, details) = match error {
            FetchError::MissingCredential(name) => {
                let suggestion = Some(format!(
                    "Set {name} in the environment or in a .env file in the current directory:\n  \
                     CLIENT_ID = <your API client id>\n  CLIENT_SECRET = <your API client secret>"
                ));
                let details = None;
                (suggestion, details)
            }
            FetchError::Authentication(msg) => {
                let suggestion = Some(
                    "Verify CLIENT_ID and CLIENT_SECRET, and that the API client has the \
                     'Sensor Download' read scope. Use SENSORFETCH_API__CLOUD to select the \
                     correct cloud region."
                        .to_string(),
                );
                let details = Some(format!("Token request rejected: {msg}"));
                (suggestion, details)
            }
            FetchError::Api { status, message } => {
                let suggestion = match status {
                    401 | 403 => Some(
                        "The API client is not authorized for this operation. Check its scopes \
                         in the Falcon console."
                            .to_string(),
                    ),
                    429 => Some(
                        "API rate limit exceeded. Please wait a few minutes and try again."
                            .to_string(),
                    ),
                    500..=599 => Some("The Falcon API reported a server error. Try again later.".to_string()),
                    _ => None,
                };
                let details = Some(format!("HTTP {status}: {message}"));
                (suggestion, details)
            }
            FetchError::NoInstallerFound { platform } => {
                let suggestion = Some(format!(
                    "The installer query returned no records. Confirm that '{platform}' \
                     installers are available to your tenant."
                ));
                let details = None;
                (suggestion, details)
            }
            FetchError::MissingField(field) => {
                let suggestion = None;
                let details = Some(format!(
                    "The first installer record does not carry a '{field}' value."
                ));
                (suggestion, details)
            }
            FetchError::Download(msg) => {
                let suggestion = Some(
                    "Check your internet connection and try again. Use --timeout to increase \
                     timeout if needed."
                        .to_string(),
                );
                let details = Some(format!("Download failed: {msg}"));
                (suggestion, details)
            }
            FetchError::PermissionDenied(path) => {
                let suggestion = Some(format!(
                    "Ensure you have write permissions to: {path}, or choose another directory \
                     with --output-dir."
                ));
                let details = None;
                (suggestion, details)
            }
            FetchError::NetworkError(msg) => {
                let suggestion =
                    Some("Check your internet connection and proxy settings.".to_string());
                let details = Some(format!("Network issue: {msg}"));
                (suggestion, details)
            }
            FetchError::Http(http_err) => {
                let error_string = http_err.to_string();
                let suggestion = if error_string.contains("timeout")
                    || error_string.contains("Timeout")
                {
                    Some(
                        "Try increasing the timeout with --timeout option (e.g., --timeout 600)."
                            .to_string(),
                    )
                } else {
                    Some("Check your internet connection and try again.".to_string())
                };
                let details = Some(format!("HTTP error: {http_err}"));
                (suggestion, details)
            }
            FetchError::ConfigError(msg) | FetchError::InvalidConfig(msg) => {
                let suggestion = Some(
                    "Review the config file passed with --config and any SENSORFETCH_* \
                     environment variables."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            FetchError::DirectoryNotFound(dir) => {
                let suggestion = Some(format!(
                    "Ensure the directory exists or pass --output-dir explicitly: {dir}"
                ));
                let details = None;
                (suggestion, details)
            }
            FetchError::Io(io_err) => {
                let suggestion = match io_err.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        Some("Check permissions on the destination directory.".to_string())
                    }
                    std::io::ErrorKind::NotFound => Some(
                        "Ensure the file or directory exists and the path is correct.".to_string(),
                    ),
                    _ => None,
                };
                let details = Some(format!("I/O error: {io_err}"));
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }
}
