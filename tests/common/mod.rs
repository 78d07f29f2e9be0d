// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::{Path, PathBuf};

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use tempfile::TempDir;

pub fn init() -> Command {
    cargo_bin_cmd!("forest-init")
}

pub trait CommonArgs {
    fn repo(&mut self, repo: &Path) -> &mut Self;
}

impl CommonArgs for Command {
    fn repo(&mut self, repo: &Path) -> &mut Self {
        self.env_remove("RUST_LOG")
            .arg("--color")
            .arg("never")
            .arg("--repodir")
            .arg(repo)
    }
}

/// A temporary directory and a not yet existing repository path inside it.
pub fn tmp_repo() -> (PathBuf, TempDir) {
    let temp_dir = tempfile::tempdir().expect("couldn't create temp dir");
    (temp_dir.path().join("repo"), temp_dir)
}
