#![allow(dead_code)]

use assert_cmd::Command;
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INSTALLER_SHA: &str = "5e0b3a7d9c1f2e4a6b8d0c2e4f6a8b0d2c4e6f8a0b2d4c6e8f0a2b4d6c8e0f2a";
pub const INSTALLER_BYTES: &[u8] = b"MZ\x90\x00\x03\x00\x00\x00 pretend this is a sensor installer";

/// Mock Falcon API backed by a local mockito server.
pub struct FalconServer {
    server: ServerGuard,
}

impl FalconServer {
    pub fn new() -> Self {
        Self {
            server: Server::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn mock_token(&mut self) -> Mock {
        self.server
            .mock("POST", "/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), "test-id".into()),
                Matcher::UrlEncoded("client_secret".into(), "test-secret".into()),
            ]))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"e2e-token","token_type":"bearer","expires_in":1799}"#)
            .create()
    }

    pub fn mock_token_rejected(&mut self) -> Mock {
        self.server
            .mock("POST", "/oauth2/token")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errors":[{"code":403,"message":"access denied, invalid client"}]}"#)
            .create()
    }

    /// Query mock that only matches the fixed latest-Windows parameters.
    pub fn mock_query(&mut self, resources: &str) -> Mock {
        self.server
            .mock("GET", "/sensors/combined/installers/v1")
            .match_header("authorization", "Bearer e2e-token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("offset".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("sort".into(), "release_date.desc".into()),
                Matcher::UrlEncoded("filter".into(), "platform:'windows'".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"meta":{{"query_time":0.01,"pagination":{{"offset":0,"limit":1,"total":12}},"trace_id":"t-1"}},"resources":{resources},"errors":[]}}"#
            ))
            .create()
    }

    pub fn mock_latest_windows(&mut self) -> Mock {
        self.mock_query(&format!(
            r#"[{{"name":"WindowsSensor.exe","platform":"windows","os":"Windows","version":"7.14.18408","release_date":"2024-05-02T18:11:43.520Z","file_size":{},"sha256":"{INSTALLER_SHA}"}}]"#,
            INSTALLER_BYTES.len()
        ))
    }

    pub fn mock_download(&mut self) -> Mock {
        self.mock_download_expecting(1)
    }

    pub fn mock_download_expecting(&mut self, hits: usize) -> Mock {
        self.server
            .mock("GET", "/sensors/entities/download-installer/v1")
            .match_header("authorization", "Bearer e2e-token")
            .match_query(Matcher::UrlEncoded("id".into(), INSTALLER_SHA.into()))
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(INSTALLER_BYTES)
            .expect(hits)
            .create()
    }
}

/// Isolated home and working directories for running the binary.
pub struct TestEnv {
    pub home: TempDir,
    pub work: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.home.path().join("Downloads")
    }

    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    /// `sensorfetch --no-progress` with no credentials and no proxy settings.
    pub fn bare_command(&self) -> Command {
        let mut cmd = Command::cargo_bin("sensorfetch").unwrap();
        cmd.current_dir(self.work.path())
            .env("HOME", self.home.path())
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("SENSORFETCH_CONFIG")
            .env_remove("CLIENT_ID")
            .env_remove("CLIENT_SECRET")
            .env_remove("RUST_LOG");
        for var in [
            "HTTP_PROXY",
            "HTTPS_PROXY",
            "ALL_PROXY",
            "http_proxy",
            "https_proxy",
            "all_proxy",
        ] {
            cmd.env_remove(var);
        }
        cmd.arg("--no-progress");
        cmd
    }

    /// Like [`bare_command`](Self::bare_command), pointed at `server` with
    /// valid test credentials.
    pub fn command(&self, server: &FalconServer) -> Command {
        let mut cmd = self.bare_command();
        cmd.env("CLIENT_ID", "test-id")
            .env("CLIENT_SECRET", "test-secret")
            .env("SENSORFETCH_API__BASE_URL", server.url());
        cmd
    }
}

/// Split stdout into its JSON documents.
pub fn json_documents(stdout: &[u8]) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_slice(stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .unwrap()
}
