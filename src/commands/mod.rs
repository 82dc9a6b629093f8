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

pub mod download;
pub mod query;

use crate::api::FalconClient;
use crate::config::FetchConfig;
use crate::error::Result;
use crate::indicator::{ProgressConfig, ProgressFactory, ProgressStyle};
use serde::Serialize;
use std::io::Write;

/// Pretty-print `value` as one JSON document followed by a newline.
pub(crate) fn print_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Run `step` behind a spinner, finishing it with the success message or
/// the error.
pub(crate) fn with_spinner<T, F, M>(
    no_progress: bool,
    operation: &str,
    context: &str,
    step: F,
    success: M,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    M: FnOnce(&T) -> String,
{
    let mut progress = ProgressFactory::create(no_progress);
    progress.start(ProgressConfig::new(operation, context, ProgressStyle::Count));
    match step() {
        Ok(value) => {
            progress.complete(Some(success(&value)));
            Ok(value)
        }
        Err(e) => {
            progress.error(e.to_string());
            Err(e)
        }
    }
}

/// Exchange the configured credentials for a token.
pub(crate) fn connect(config: &FetchConfig, no_progress: bool) -> Result<FalconClient> {
    let base_url = config.api.resolved_base_url();
    with_spinner(
        no_progress,
        "Authenticating",
        &base_url,
        || FalconClient::connect(&config.api, &config.credentials),
        |_| "Token acquired".to_string(),
    )
    .map(|client| client.with_no_progress(no_progress))
}
