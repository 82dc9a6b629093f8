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

use crate::indicator::{ProgressConfig, ProgressIndicator};
use std::io::Write;

/// Plain one-line status output for pipes, CI logs and dumb terminals.
pub struct SimpleProgress {
    operation: String,
    context: String,
    out: Box<dyn Write + Send + Sync>,
}

impl SimpleProgress {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    pub fn with_writer(out: Box<dyn Write + Send + Sync>) -> Self {
        Self {
            operation: String::new(),
            context: String::new(),
            out,
        }
    }

    fn line(&mut self, marker: &str, message: &str) {
        // Status output is best effort
        let _ = writeln!(
            self.out,
            "{marker} {} {} - {message}",
            self.operation, self.context
        );
    }
}

impl Default for SimpleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator for SimpleProgress {
    fn start(&mut self, config: ProgressConfig) {
        // Only the outcome is printed
        self.operation = config.operation;
        self.context = config.context;
    }

    fn update(&mut self, _current: u64, _total: Option<u64>) {}

    fn complete(&mut self, message: Option<String>) {
        let msg = message.unwrap_or_else(|| "Complete".to_string());
        self.line("✓", &msg);
    }

    fn error(&mut self, message: String) {
        self.line("✗", &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::ProgressStyle;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn progress() -> (SimpleProgress, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (SimpleProgress::with_writer(Box::new(buffer.clone())), buffer)
    }

    #[test]
    fn test_complete_output_format() {
        let (mut progress, buffer) = progress();

        progress.start(
            ProgressConfig::new("Downloading", "cs_installer.exe", ProgressStyle::Bytes)
                .with_total(1024),
        );
        for i in 0..10 {
            progress.update(i * 100, None);
        }
        progress.complete(Some("Download complete".to_string()));

        assert_eq!(
            buffer.lines(),
            vec!["✓ Downloading cs_installer.exe - Download complete"]
        );
    }

    #[test]
    fn test_complete_without_message() {
        let (mut progress, buffer) = progress();

        progress.start(ProgressConfig::new("Querying", "windows installers", ProgressStyle::Count));
        progress.complete(None);

        assert_eq!(buffer.lines(), vec!["✓ Querying windows installers - Complete"]);
    }

    #[test]
    fn test_error_output_format() {
        let (mut progress, buffer) = progress();

        progress.start(ProgressConfig::new("Downloading", "cs_installer.exe", ProgressStyle::Bytes));
        progress.error("connection reset".to_string());

        assert_eq!(
            buffer.lines(),
            vec!["✗ Downloading cs_installer.exe - connection reset"]
        );
    }
}
