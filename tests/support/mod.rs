//! Test support utilities for cachette integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// No process-global state is mutated — child processes use
/// `.current_dir()` so tests can safely run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// Create a test environment with a store initialized under `key_id`.
    pub fn init(key_id: &str) -> Self {
        let t = Self::new();
        t.cmd()
            .args(["init", "--kms-key-id", key_id])
            .assert()
            .success();
        t
    }

    /// A command ready to run in this environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cachette").expect("binary builds");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// A command with the in-process mock KMS enabled (needs the
    /// `test-kms` feature).
    pub fn cmd_mock_kms(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("CACHETTE_MOCK_KMS", "1");
        cmd
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join(".secrets.json")
    }

    pub fn read_store(&self) -> String {
        fs::read_to_string(self.store_path()).expect("store file exists")
    }
}
