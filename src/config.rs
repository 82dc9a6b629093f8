use crate::error::{FetchError, Result};
use crate::paths::default_download_dir;
use config::{Config, Environment, File, FileFormat};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";
pub const CONFIG_PATH_VAR: &str = "SENSORFETCH_CONFIG";
pub const DEFAULT_INSTALLER_FILE_NAME: &str = "cs_installer.exe";

const ENV_PREFIX: &str = "SENSORFETCH";
const CONFIG_DIR_NAME: &str = "sensorfetch";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// API client credentials. Passed explicitly into the client; never read
/// from the environment by business logic.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Child CID for multi-tenant API clients
    #[serde(default)]
    pub member_cid: Option<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            member_cid: None,
        }
    }

    pub fn with_member_cid(mut self, member_cid: impl Into<String>) -> Self {
        self.member_cid = Some(member_cid.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(FetchError::MissingCredential(CLIENT_ID_VAR.to_string()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(FetchError::MissingCredential(CLIENT_SECRET_VAR.to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("member_cid", &self.member_cid)
            .finish()
    }
}

/// Falcon cloud the API client is registered in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CloudRegion {
    #[default]
    #[serde(rename = "us-1")]
    Us1,
    #[serde(rename = "us-2")]
    Us2,
    #[serde(rename = "eu-1")]
    Eu1,
    #[serde(rename = "us-gov-1")]
    UsGov1,
}

impl CloudRegion {
    pub fn base_url(&self) -> &'static str {
        match self {
            CloudRegion::Us1 => "https://api.crowdstrike.com",
            CloudRegion::Us2 => "https://api.us-2.crowdstrike.com",
            CloudRegion::Eu1 => "https://api.eu-1.crowdstrike.com",
            CloudRegion::UsGov1 => "https://api.laggar.gcw.crowdstrike.com",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub cloud: CloudRegion,

    /// Overrides the region's base URL when set
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cloud: CloudRegion::default(),
            base_url: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => self.cloud.base_url().to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory; `~/Downloads` when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_installer_file_name")]
    pub file_name: String,

    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: DEFAULT_INSTALLER_FILE_NAME.to_string(),
            timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl DownloadConfig {
    pub fn resolve_directory(&self) -> Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => default_download_dir(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_timeout_secs() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_installer_file_name() -> String {
    DEFAULT_INSTALLER_FILE_NAME.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub credentials: Credentials,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

impl FetchConfig {
    /// Build the configuration from an optional TOML file and a snapshot of
    /// environment variables.
    ///
    /// Precedence, lowest first: defaults, config file, `SENSORFETCH_*`
    /// variables (sections separated by `__`), then `CLIENT_ID` and
    /// `CLIENT_SECRET`.
    pub fn from_sources(config_file: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some((path, required)) = Self::config_file_path(config_file, vars) {
            debug!("Reading config file {path:?} (required: {required})");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(
                        vars.iter()
                            .map(|(key, value)| (key.clone(), value.clone()))
                            .collect(),
                    )),
            )
            .set_override_option("credentials.client_id", vars.get(CLIENT_ID_VAR).cloned())?
            .set_override_option(
                "credentials.client_secret",
                vars.get(CLIENT_SECRET_VAR).cloned(),
            )?;

        let config: FetchConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        trace!("Resolved configuration: {config:?}");
        Ok(config)
    }

    fn config_file_path(
        explicit: Option<&Path>,
        vars: &HashMap<String, String>,
    ) -> Option<(PathBuf, bool)> {
        if let Some(path) = explicit {
            return Some((path.to_path_buf(), true));
        }
        if let Some(path) = vars.get(CONFIG_PATH_VAR).filter(|p| !p.is_empty()) {
            return Some((PathBuf::from(path), true));
        }
        dirs::config_dir().map(|dir| (dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME), false))
    }

    fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(FetchError::InvalidConfig(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.download.timeout_secs == 0 {
            return Err(FetchError::InvalidConfig(
                "download.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(url) = &self.api.base_url
            && !url.trim().is_empty()
            && !(url.starts_with("https://") || url.starts_with("http://"))
        {
            return Err(FetchError::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }
}

/// Load configuration once at startup: a `.env` file in the working
/// directory is merged into the process environment (existing variables win)
/// before the environment is read.
pub fn new_fetch_config(config_file: Option<&Path>) -> Result<FetchConfig> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {path:?}"),
        Err(e) if e.not_found() => trace!("No .env file found"),
        Err(e) => {
            return Err(FetchError::ConfigError(format!(
                "Failed to read .env file: {e}"
            )));
        }
    }

    let vars: HashMap<String, String> = std::env::vars().collect();
    FetchConfig::from_sources(config_file, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn missing_file(temp_dir: &TempDir) -> HashMap<String, String> {
        // Point at an empty file so the user's real config never leaks in
        let path = temp_dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        vars(&[(CONFIG_PATH_VAR, path.to_str().unwrap())])
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = FetchConfig::from_sources(None, &missing_file(&temp_dir)).unwrap();

        assert_eq!(config.credentials, Credentials::default());
        assert_eq!(config.api.cloud, CloudRegion::Us1);
        assert_eq!(config.api.resolved_base_url(), "https://api.crowdstrike.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.download.file_name, "cs_installer.exe");
        assert_eq!(config.download.directory, None);
        assert_eq!(config.download.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_credentials_from_environment() {
        let temp_dir = TempDir::new().unwrap();
        let mut env = missing_file(&temp_dir);
        env.extend(vars(&[
            (CLIENT_ID_VAR, "abc"),
            (CLIENT_SECRET_VAR, "s3cr3t"),
        ]));

        let config = FetchConfig::from_sources(None, &env).unwrap();

        assert_eq!(config.credentials.client_id, "abc");
        assert_eq!(config.credentials.client_secret, "s3cr3t");
        assert!(config.credentials.validate().is_ok());
    }

    #[test]
    fn test_config_file_and_prefixed_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[credentials]
client_id = "from-file"
client_secret = "file-secret"
member_cid = "child"

[api]
cloud = "eu-1"

[download]
file_name = "falcon.exe"
timeout_secs = 60
"#,
        )
        .unwrap();

        let env = vars(&[
            ("SENSORFETCH_DOWNLOAD__TIMEOUT_SECS", "120"),
            (CLIENT_ID_VAR, "from-env"),
        ]);
        let config = FetchConfig::from_sources(Some(&config_path), &env).unwrap();

        assert_eq!(config.credentials.client_id, "from-env");
        assert_eq!(config.credentials.client_secret, "file-secret");
        assert_eq!(config.credentials.member_cid, Some("child".to_string()));
        assert_eq!(config.api.cloud, CloudRegion::Eu1);
        assert_eq!(
            config.api.resolved_base_url(),
            "https://api.eu-1.crowdstrike.com"
        );
        assert_eq!(config.download.file_name, "falcon.exe");
        assert_eq!(config.download.timeout_secs, 120);
    }

    #[test]
    fn test_base_url_override_wins_over_region() {
        let temp_dir = TempDir::new().unwrap();
        let mut env = missing_file(&temp_dir);
        env.extend(vars(&[
            ("SENSORFETCH_API__CLOUD", "us-2"),
            ("SENSORFETCH_API__BASE_URL", "http://127.0.0.1:1234/"),
        ]));

        let config = FetchConfig::from_sources(None, &env).unwrap();

        assert_eq!(config.api.cloud, CloudRegion::Us2);
        assert_eq!(config.api.resolved_base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");

        let result = FetchConfig::from_sources(Some(&path), &HashMap::new());
        assert!(matches!(result, Err(FetchError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();

        let mut env = missing_file(&temp_dir);
        env.insert("SENSORFETCH_API__TIMEOUT_SECS".to_string(), "0".to_string());
        assert!(matches!(
            FetchConfig::from_sources(None, &env),
            Err(FetchError::InvalidConfig(_))
        ));

        let mut env = missing_file(&temp_dir);
        env.insert(
            "SENSORFETCH_API__BASE_URL".to_string(),
            "ftp://example.com".to_string(),
        );
        assert!(matches!(
            FetchConfig::from_sources(None, &env),
            Err(FetchError::InvalidConfig(_))
        ));

        let mut env = missing_file(&temp_dir);
        env.insert("SENSORFETCH_API__CLOUD".to_string(), "mars-1".to_string());
        assert!(matches!(
            FetchConfig::from_sources(None, &env),
            Err(FetchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_credentials_validation() {
        assert!(matches!(
            Credentials::new("", "secret").validate(),
            Err(FetchError::MissingCredential(name)) if name == CLIENT_ID_VAR
        ));
        assert!(matches!(
            Credentials::new("id", "  ").validate(),
            Err(FetchError::MissingCredential(name)) if name == CLIENT_SECRET_VAR
        ));
        assert!(Credentials::new("id", "secret").validate().is_ok());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials::new("visible-id", "hidden-secret").with_member_cid("cid");
        let debug = format!("{credentials:?}");

        assert!(debug.contains("visible-id"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hidden-secret"));
    }

    #[test]
    fn test_download_directory_resolution() {
        let config = DownloadConfig {
            directory: Some(PathBuf::from("/opt/installers")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_directory().unwrap(),
            PathBuf::from("/opt/installers")
        );

        let config = DownloadConfig::default();
        assert!(config.resolve_directory().unwrap().ends_with("Downloads"));
    }

    #[test]
    #[serial]
    fn test_new_fetch_config_reads_process_environment() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[download]\nfile_name = \"falcon.exe\"\n").unwrap();

        unsafe {
            std::env::set_var(CLIENT_ID_VAR, "process-id");
            std::env::set_var(CLIENT_SECRET_VAR, "process-secret");
            std::env::set_var("SENSORFETCH_DOWNLOAD__TIMEOUT_SECS", "45");
        }

        let result = new_fetch_config(Some(&config_path));

        unsafe {
            std::env::remove_var(CLIENT_ID_VAR);
            std::env::remove_var(CLIENT_SECRET_VAR);
            std::env::remove_var("SENSORFETCH_DOWNLOAD__TIMEOUT_SECS");
        }

        let config = result.unwrap();
        assert_eq!(config.credentials.client_id, "process-id");
        assert_eq!(config.credentials.client_secret, "process-secret");
        assert_eq!(config.download.file_name, "falcon.exe");
        assert_eq!(config.download.timeout_secs, 45);
    }
}
