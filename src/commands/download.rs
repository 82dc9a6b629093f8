use crate::api::{SensorDownloadApi, SensorPlatform};
use crate::commands::{connect, print_json};
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::fetcher::{Destination, FetchOutcome, InstallerFetcher};
use colored::Colorize;
use log::debug;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line overrides for the download destination and timeout.
#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    pub platform: SensorPlatform,
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub timeout: Option<u64>,
}

/// `sensorfetch download`: query, print, download, print.
pub struct DownloadCommand<'a> {
    config: &'a FetchConfig,
    no_progress: bool,
}

impl<'a> DownloadCommand<'a> {
    pub fn new(config: &'a FetchConfig, no_progress: bool) -> Result<Self> {
        Ok(Self {
            config,
            no_progress,
        })
    }

    pub fn execute(&self, args: &DownloadArgs) -> Result<()> {
        let destination = self.destination(args)?;
        let timeout = self.timeout(args)?;
        debug!("Download destination {destination:?}, timeout {timeout:?}");

        let client = connect(self.config, self.no_progress)?.with_download_timeout(timeout);
        let stdout = std::io::stdout();
        self.run(&client, args.platform, &destination, &mut stdout.lock())?;
        Ok(())
    }

    pub fn run(
        &self,
        api: &dyn SensorDownloadApi,
        platform: SensorPlatform,
        destination: &Destination,
        out: &mut dyn Write,
    ) -> Result<FetchOutcome> {
        let fetcher = InstallerFetcher::new(api).with_platform(platform);

        let outcome = fetcher.fetch_latest_with(destination, |query| print_json(out, query))?;
        print_json(out, &outcome.download)?;

        eprintln!(
            "{} Downloaded {} ({} bytes) to {}",
            "✓".green().bold(),
            outcome.download.id.cyan(),
            outcome.download.bytes_written,
            outcome.download.path.display()
        );
        Ok(outcome)
    }

    /// CLI flags override the configured directory and file name.
    pub fn destination(&self, args: &DownloadArgs) -> Result<Destination> {
        let directory = match &args.output_dir {
            Some(dir) => dir.clone(),
            None => self.config.download.resolve_directory()?,
        };
        let file_name = args
            .file_name
            .clone()
            .unwrap_or_else(|| self.config.download.file_name.clone());
        Ok(Destination::new(directory, file_name))
    }

    fn timeout(&self, args: &DownloadArgs) -> Result<Duration> {
        match args.timeout {
            Some(0) => Err(FetchError::ValidationError(
                "--timeout must be greater than zero".to_string(),
            )),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(self.config.download.timeout()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        DownloadResult, InstallerQueryResult, MockSensorDownloadApi, QueryBody, SensorInstaller,
    };
    use crate::config::DownloadConfig;
    use serde_json::Value;

    const SHA: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";

    fn config_with_dir(dir: &str) -> FetchConfig {
        FetchConfig {
            download: DownloadConfig {
                directory: Some(PathBuf::from(dir)),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn parse_documents(out: &[u8]) -> Vec<Value> {
        serde_json::Deserializer::from_slice(out)
            .into_iter::<Value>()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_run_prints_query_then_download() {
        let mut api = MockSensorDownloadApi::new();
        api.expect_get_combined_sensor_installers_by_query()
            .times(1)
            .returning(|_| {
                Ok(InstallerQueryResult {
                    status_code: 200,
                    body: QueryBody {
                        resources: vec![SensorInstaller {
                            sha256: Some(SHA.to_string()),
                            ..Default::default()
                        }],
                        ..Default::default()
                    },
                })
            });
        api.expect_download_sensor_installer()
            .withf(|request| request.id == SHA && request.file_name == "cs_installer.exe")
            .times(1)
            .returning(|request| {
                Ok(DownloadResult {
                    id: request.id.clone(),
                    path: request.download_path.join(&request.file_name),
                    bytes_written: 1024,
                    status_code: 200,
                })
            });

        let config = config_with_dir("/tmp/Downloads");
        let command = DownloadCommand::new(&config, true).unwrap();
        let destination = command.destination(&DownloadArgs::default()).unwrap();
        let mut out = Vec::new();

        command
            .run(&api, SensorPlatform::Windows, &destination, &mut out)
            .unwrap();

        let documents = parse_documents(&out);
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["body"]["resources"][0]["sha256"], SHA);
        assert_eq!(documents[1]["id"], SHA);
        assert_eq!(documents[1]["bytes_written"], 1024);
    }

    #[test]
    fn test_empty_query_is_printed_before_failing() {
        let mut api = MockSensorDownloadApi::new();
        api.expect_get_combined_sensor_installers_by_query()
            .returning(|_| {
                Ok(InstallerQueryResult {
                    status_code: 200,
                    body: QueryBody::default(),
                })
            });
        api.expect_download_sensor_installer().times(0);

        let config = config_with_dir("/tmp/Downloads");
        let command = DownloadCommand::new(&config, true).unwrap();
        let destination = command.destination(&DownloadArgs::default()).unwrap();
        let mut out = Vec::new();

        let result = command.run(&api, SensorPlatform::Windows, &destination, &mut out);

        assert!(matches!(result, Err(FetchError::NoInstallerFound { .. })));
        assert_eq!(parse_documents(&out).len(), 1);
    }

    #[test]
    fn test_destination_overrides() {
        let config = config_with_dir("/srv/configured");
        let command = DownloadCommand::new(&config, true).unwrap();

        let configured = command.destination(&DownloadArgs::default()).unwrap();
        assert_eq!(configured.path(), PathBuf::from("/srv/configured/cs_installer.exe"));

        let overridden = command
            .destination(&DownloadArgs {
                output_dir: Some(PathBuf::from("/opt/out")),
                file_name: Some("falcon.exe".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(overridden.path(), PathBuf::from("/opt/out/falcon.exe"));
    }

    #[test]
    fn test_timeout_resolution() {
        let config = FetchConfig::default();
        let command = DownloadCommand::new(&config, true).unwrap();

        assert_eq!(
            command.timeout(&DownloadArgs::default()).unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            command
                .timeout(&DownloadArgs {
                    timeout: Some(42),
                    ..Default::default()
                })
                .unwrap(),
            Duration::from_secs(42)
        );
        assert!(matches!(
            command.timeout(&DownloadArgs {
                timeout: Some(0),
                ..Default::default()
            }),
            Err(FetchError::ValidationError(_))
        ));
    }
}
