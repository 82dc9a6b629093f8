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

use crate::indicator::{IndicatifProgress, ProgressIndicator, SilentProgress, SimpleProgress};
use std::env;
use std::io::IsTerminal;

pub const FORCE_TTY_PROGRESS_VAR: &str = "SENSORFETCH_FORCE_TTY_PROGRESS";
pub const NO_TTY_PROGRESS_VAR: &str = "SENSORFETCH_NO_TTY_PROGRESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressRendererKind {
    Silent,
    Simple,
    Tty,
}

pub struct ProgressFactory;

impl ProgressFactory {
    pub fn create(no_progress: bool) -> Box<dyn ProgressIndicator> {
        let kind = Self::renderer_kind(no_progress, |name| env::var(name).ok(), || {
            std::io::stderr().is_terminal()
        });
        match kind {
            ProgressRendererKind::Silent => Box::new(SilentProgress::new()),
            ProgressRendererKind::Simple => Box::new(SimpleProgress::new()),
            ProgressRendererKind::Tty => Box::new(IndicatifProgress::new()),
        }
    }

    /// Decide which renderer to use.
    ///
    /// `--no-progress` wins, then the force/no-TTY overrides, then terminal
    /// and environment detection.
    pub fn renderer_kind<E, T>(no_progress: bool, var: E, stderr_is_terminal: T) -> ProgressRendererKind
    where
        E: Fn(&str) -> Option<String>,
        T: Fn() -> bool,
    {
        if no_progress {
            ProgressRendererKind::Silent
        } else if env_flag(var(FORCE_TTY_PROGRESS_VAR)) {
            ProgressRendererKind::Tty
        } else if env_flag(var(NO_TTY_PROGRESS_VAR)) || should_use_simple(&var, stderr_is_terminal) {
            ProgressRendererKind::Simple
        } else {
            ProgressRendererKind::Tty
        }
    }
}

fn env_flag(value: Option<String>) -> bool {
    value
        .map(|value| match value.trim() {
            "" => true,
            v if v.eq_ignore_ascii_case("0") => false,
            v if v.eq_ignore_ascii_case("false") => false,
            _ => true,
        })
        .unwrap_or(false)
}

fn should_use_simple<E, T>(var: &E, stderr_is_terminal: T) -> bool
where
    E: Fn(&str) -> Option<String>,
    T: Fn() -> bool,
{
    // Pipe or redirect
    if !stderr_is_terminal() {
        return true;
    }

    if var("CI").is_some() {
        return true;
    }

    if let Some(term) = var("TERM")
        && term == "dumb"
    {
        return true;
    }

    // https://no-color.org/
    var("NO_COLOR").is_some()
}
