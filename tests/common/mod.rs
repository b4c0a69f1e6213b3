//! Shared helpers for jv integration tests

#![allow(dead_code)] // Not every test file uses every helper

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated jv environment: every directory jv reads or writes lives in a
/// temporary directory.
pub struct JvSandbox {
    pub temp: TempDir,
}

impl JvSandbox {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root().join("config")
    }

    pub fn registry_file(&self) -> PathBuf {
        self.config_dir().join("jv.json")
    }

    pub fn env_file(&self) -> PathBuf {
        self.root().join("profile.d").join("jv.sh")
    }

    pub fn system_base(&self) -> PathBuf {
        self.root().join("system-jdks")
    }

    pub fn user_base(&self) -> PathBuf {
        self.root().join("user-jdks")
    }

    /// `jv` pointed at the sandbox, unprivileged, without colors and with no
    /// `JAVA_HOME` inherited from the test runner
    pub fn jv(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jv"));
        cmd.env("JV_CONFIG_DIR", self.config_dir())
            .env("JV_DATA_DIR", self.root().join("data"))
            .env("JV_SYSTEM_INSTALL_DIR", self.system_base())
            .env("JV_USER_INSTALL_DIR", self.user_base())
            .env("JV_ENV_FILE", self.env_file())
            .env("JV_ASSUME_PRIVILEGED", "0")
            .env("NO_COLOR", "1")
            .env("JV_UNICODE", "0")
            .env_remove("JAVA_HOME")
            .env_remove("JV_LOG");
        cmd
    }

    /// Same as [`Self::jv`], as an administrator
    pub fn jv_privileged(&self) -> Command {
        let mut cmd = self.jv();
        cmd.env("JV_ASSUME_PRIVILEGED", "1");
        cmd
    }
}
