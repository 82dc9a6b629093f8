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

use clap::{Parser, Subcommand};
use sensorfetch::api::SensorPlatform;
use sensorfetch::commands::download::{DownloadArgs, DownloadCommand};
use sensorfetch::commands::query::QueryCommand;
use sensorfetch::config::new_fetch_config;
use sensorfetch::error::{FetchError, Result, format_error_with_color, get_exit_code};
use sensorfetch::logging;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensorfetch")]
#[command(
    author,
    version,
    about = "Fetch the latest CrowdStrike Falcon sensor installer",
    long_about = "Fetch the latest CrowdStrike Falcon sensor installer

Credentials are read from CLIENT_ID and CLIENT_SECRET, either in the
environment or in a .env file in the working directory."
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable progress indicators
    #[arg(long, global = true)]
    no_progress: bool,

    /// Read settings from this TOML file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metadata of the newest installer without downloading it
    #[command(visible_alias = "q")]
    Query {
        /// Installer platform
        #[arg(long, value_enum, default_value_t = SensorPlatform::Windows)]
        platform: SensorPlatform,
    },

    /// Download the newest installer (defaults to ~/Downloads/cs_installer.exe)
    #[command(visible_alias = "d")]
    Download {
        /// Installer platform
        #[arg(long, value_enum, default_value_t = SensorPlatform::Windows)]
        platform: SensorPlatform,

        /// Directory to write the installer into
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// File name of the downloaded installer
        #[arg(long, value_name = "NAME")]
        file_name: Option<String>,

        /// Download timeout in seconds
        #[arg(long, value_name = "SECONDS")]
        timeout: Option<u64>,
    },
}

fn report(error: &FetchError) -> ! {
    let use_color = std::io::stderr().is_terminal();
    eprintln!("{}", format_error_with_color(error, use_color));
    std::process::exit(get_exit_code(error));
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    // Load configuration once at startup
    let config = match new_fetch_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => report(&e),
    };

    let result: Result<()> = (|| match cli.command {
        Commands::Query { platform } => {
            let command = QueryCommand::new(&config, cli.no_progress)?;
            command.execute(platform)
        }
        Commands::Download {
            platform,
            output_dir,
            file_name,
            timeout,
        } => {
            let command = DownloadCommand::new(&config, cli.no_progress)?;
            command.execute(&DownloadArgs {
                platform,
                output_dir,
                file_name,
                timeout,
            })
        }
    })();

    if let Err(e) = result {
        report(&e);
    }
}
