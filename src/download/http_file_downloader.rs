use crate::api::failure_from_response;
use crate::download::client::{AttohttpcClient, HttpClient, HttpResponse};
use crate::download::options::{DownloadOptions, DownloadedFile};
use crate::error::{FetchError, Result};
use crate::paths::ensure_directory;
use log::debug;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const DOWNLOAD_CHUNK_SIZE: usize = 8192;
const MAX_ERROR_BODY: u64 = 64 * 1024;

pub trait ProgressReporter: Send + Sync {
    fn on_start(&mut self, total_bytes: u64);

    fn on_progress(&mut self, bytes_downloaded: u64);

    fn on_complete(&mut self);

    fn on_error(&mut self, message: &str);
}

pub struct HttpFileDownloader {
    pub(crate) http_client: Box<dyn HttpClient>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl Default for HttpFileDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFileDownloader {
    pub fn new() -> Self {
        Self::with_client(Box::new(AttohttpcClient::new()))
    }

    pub fn with_client(http_client: Box<dyn HttpClient>) -> Self {
        Self {
            http_client,
            progress_reporter: None,
        }
    }

    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Stream `url` into `destination`, replacing any existing file.
    ///
    /// The body is written to a temporary file next to the destination and
    /// renamed into place once complete.
    pub fn download(
        &mut self,
        url: &str,
        params: &[(String, String)],
        headers: Vec<(String, String)>,
        destination: &Path,
        options: &DownloadOptions,
    ) -> Result<DownloadedFile> {
        let parent = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        ensure_directory(parent)?;

        self.http_client.set_timeout(options.timeout);
        let response = self.http_client.get(url, params, headers)?;
        let status = response.status();
        let response = self.validate_response(response, options.max_size)?;

        let total_size = self.get_total_size(response.as_ref());
        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_start(total_size);
        }

        let temp_file = NamedTempFile::new_in(parent).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                FetchError::PermissionDenied(parent.display().to_string())
            }
            _ => FetchError::Io(e),
        })?;

        let bytes_written = match self.download_to_file(response, &temp_file) {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Some(reporter) = &mut self.progress_reporter {
                    reporter.on_error(&e.to_string());
                }
                return Err(e);
            }
        };

        temp_file
            .persist(destination)
            .map_err(|e| FetchError::Io(e.error))?;
        debug!("Wrote {bytes_written} bytes to {destination:?}");

        if let Some(reporter) = &mut self.progress_reporter {
            reporter.on_complete();
        }

        Ok(DownloadedFile {
            path: destination.to_path_buf(),
            bytes_written,
            status_code: status,
        })
    }

    fn validate_response(
        &self,
        mut response: Box<dyn HttpResponse>,
        max_size: u64,
    ) -> Result<Box<dyn HttpResponse>> {
        let status = response.status();

        if !(200..300).contains(&status) {
            let mut body = String::new();
            // The body is only used to enrich the error message
            let _ = (&mut response).take(MAX_ERROR_BODY).read_to_string(&mut body);
            return Err(failure_from_response(status, &body));
        }

        if let Some(content_length) = response.header("Content-Length")
            && let Ok(length) = content_length.parse::<u64>()
            && length > max_size
        {
            return Err(FetchError::ValidationError(format!(
                "Download size {length} exceeds maximum allowed size {max_size}"
            )));
        }

        Ok(response)
    }

    fn get_total_size(&self, response: &dyn HttpResponse) -> u64 {
        // 0 means unknown
        response
            .header("Content-Length")
            .and_then(|length| length.parse::<u64>().ok())
            .unwrap_or(0)
    }

    fn download_to_file(
        &mut self,
        mut response: Box<dyn HttpResponse>,
        file: &NamedTempFile,
    ) -> Result<u64> {
        let mut writer = BufWriter::new(file.as_file());
        let mut downloaded = 0u64;
        let mut buffer = vec![0; DOWNLOAD_CHUNK_SIZE];

        loop {
            match response.read(&mut buffer) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    writer.write_all(&buffer[..n])?;
                    downloaded += n as u64;

                    if let Some(reporter) = &mut self.progress_reporter {
                        reporter.on_progress(downloaded);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(FetchError::Download(format!(
                        "Connection interrupted after {downloaded} bytes: {e}"
                    )));
                }
            }
        }

        writer.flush()?;
        Ok(downloaded)
    }
}

#[cfg(test)]
#[path = "http_file_downloader_tests.rs"]
mod http_file_downloader_tests;
