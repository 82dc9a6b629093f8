use crate::api::{InstallerQueryResult, SensorDownloadApi, SensorPlatform};
use crate::commands::{connect, print_json, with_spinner};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::fetcher::InstallerFetcher;
use colored::Colorize;
use std::io::Write;

/// `sensorfetch query`: print the newest installer record without downloading.
pub struct QueryCommand<'a> {
    config: &'a FetchConfig,
    no_progress: bool,
}

impl<'a> QueryCommand<'a> {
    pub fn new(config: &'a FetchConfig, no_progress: bool) -> Result<Self> {
        Ok(Self {
            config,
            no_progress,
        })
    }

    pub fn execute(&self, platform: SensorPlatform) -> Result<()> {
        let client = connect(self.config, self.no_progress)?;
        let stdout = std::io::stdout();
        self.run(&client, platform, &mut stdout.lock())?;
        Ok(())
    }

    pub fn run(
        &self,
        api: &dyn SensorDownloadApi,
        platform: SensorPlatform,
        out: &mut dyn Write,
    ) -> Result<InstallerQueryResult> {
        let fetcher = InstallerFetcher::new(api).with_platform(platform);
        let result = with_spinner(
            self.no_progress,
            "Querying",
            &format!("latest {platform} installer"),
            || fetcher.query_latest(),
            |result| format!("{} record(s)", result.body.resources.len()),
        )?;

        print_json(out, &result)?;

        match result.first_installer() {
            Some(installer) => eprintln!(
                "{} Latest {platform} installer: {} {}",
                "✓".green().bold(),
                installer.name.as_deref().unwrap_or("(unnamed)"),
                installer.version.as_deref().unwrap_or("").cyan()
            ),
            None => eprintln!("{} No {platform} installer found", "!".yellow().bold()),
        }

        Ok(result)
    }
}
