//! Shared test utilities for opskit integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory.
//! - Build temporary directory trees holding env and compose files.
//!
//! Invariants / Assumptions:
//! - Host variables that opskit reads (`OPSKIT_*`, `POSTGRES_*`, `RUST_LOG`) are cleared.
//! - The origin is always passed explicitly so the test's cwd never matters.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns a hermetic `opskit` command rooted at `origin`.
pub fn opskit_cmd(origin: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("opskit");

    cmd.env_remove("OPSKIT_ORIGIN")
        .env_remove("OPSKIT_LOG_LEVEL")
        .env_remove("OPSKIT_DATABASE")
        .env_remove("POSTGRES_USER")
        .env_remove("POSTGRES_PASSWORD")
        .env_remove("POSTGRES_ADDRESS")
        .env_remove("RUST_LOG");

    cmd.arg("--origin").arg(origin);
    cmd
}

/// `root/app/scripts/tests/main.py`: levels 1..3 are `tests`, `scripts`, `app`.
pub struct Tree {
    _temp: TempDir,
    levels: [PathBuf; 3],
    origin: PathBuf,
}

impl Tree {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let app = temp.path().join("app");
        let scripts = app.join("scripts");
        let tests = scripts.join("tests");
        fs::create_dir_all(&tests).expect("Failed to create tree");
        let origin = tests.join("main.py");
        fs::write(&origin, "").expect("Failed to write origin");

        Self {
            _temp: temp,
            levels: [tests, scripts, app],
            origin,
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Writes `name` at `level` (1-3) and returns its path.
    pub fn put(&self, level: usize, name: &str, content: &str) -> PathBuf {
        let path = self.levels[level - 1].join(name);
        fs::write(&path, content).expect("Failed to write fixture");
        path
    }
}
