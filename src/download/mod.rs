/// Installer download plumbing
///
/// This module streams an HTTP response body to disk with:
/// - Progress reporting
/// - Atomic replacement of an existing file at the destination
/// - Configurable timeouts and size limits
mod client;
mod http_file_downloader;
mod options;
mod progress;

pub use client::{AttohttpcClient, HttpClient, HttpResponse};
pub use http_file_downloader::{HttpFileDownloader, ProgressReporter};
pub use options::{DEFAULT_TIMEOUT, DownloadOptions, DownloadedFile, MAX_DOWNLOAD_SIZE};
pub use progress::DownloadProgressAdapter;
