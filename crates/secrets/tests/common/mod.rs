//! Shared fixtures for opskit-secrets integration tests.
//!
//! Builds a throwaway directory tree `root/app/scripts/tests/` with an origin
//! file at the bottom, so the three candidate directories are:
//! level 1 = `root/app/scripts/tests`, level 2 = `root/app/scripts`, level 3 = `root/app`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use opskit_secrets::DirLevel;
use tempfile::TempDir;

pub struct Tree {
    _temp: TempDir,
    levels: [PathBuf; 3],
    source: PathBuf,
}

impl Tree {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let app = temp.path().join("app");
        let scripts = app.join("scripts");
        let tests = scripts.join("tests");
        fs::create_dir_all(&tests).expect("Failed to create tree");

        let source = tests.join("test_utils.rs");
        fs::write(&source, "// origin\n").expect("Failed to write origin file");

        Self {
            _temp: temp,
            levels: [tests, scripts, app],
            source,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dir(&self, level: DirLevel) -> &Path {
        &self.levels[level.index()]
    }

    /// Writes `name` with `content` into the directory of `level` and returns its path.
    pub fn put(&self, level: DirLevel, name: &str, content: &str) -> PathBuf {
        let path = self.dir(level).join(name);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }
}
