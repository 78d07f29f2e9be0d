// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! On-disk node repository.
//!
//! ```text
//! <repo>/
//!   version       repository layout version
//!   config.toml   node configuration
//!   datastore/    blocks and settings (ParityDb)
//!   libp2p/       peer identity
//!   keystore.json wallet keys
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use directories::ProjectDirs;
use tracing::debug;

use crate::cli_shared::{cli::Config, read_config};
use crate::db::ParityDb;
use crate::utils::io::write_atomic;

/// Layout version written by [`FsRepo::init`].
pub const REPO_VERSION: u32 = 1;

const VERSION_FILE: &str = "version";
const CONFIG_FILE: &str = "config.toml";
const DATASTORE_DIR: &str = "datastore";
const LIBP2P_DIR: &str = "libp2p";

/// The platform data directory, used when no repository is given.
pub fn default_repo_dir() -> anyhow::Result<PathBuf> {
    ProjectDirs::from("com", "ChainSafe", "Forest")
        .map(|dirs| dirs.data_dir().join("repo"))
        .context("unable to determine the home directory, use --repodir")
}

/// An opened repository. Dropping it closes the datastore.
pub struct FsRepo {
    path: PathBuf,
    config: Config,
    datastore: ParityDb,
}

impl FsRepo {
    /// Creates a repository at `path` holding `config`. An existing directory
    /// is only accepted when it is empty.
    pub fn init(path: &Path, config: &Config) -> anyhow::Result<()> {
        if path.exists() {
            let mut entries = std::fs::read_dir(path)
                .with_context(|| format!("{} is not a directory", path.display()))?;
            if entries.next().is_some() {
                bail!("repository directory {} is not empty", path.display());
            }
        }
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        std::fs::write(path.join(VERSION_FILE), REPO_VERSION.to_string())?;
        std::fs::write(path.join(CONFIG_FILE), toml::to_string(config)?)?;
        debug!("Initialized repository at {}", path.display());
        Ok(())
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let version_path = path.join(VERSION_FILE);
        let version = std::fs::read_to_string(&version_path)
            .with_context(|| format!("no repository at {}", path.display()))?;
        let version: u32 = version
            .trim()
            .parse()
            .with_context(|| format!("invalid {}", version_path.display()))?;
        if version != REPO_VERSION {
            bail!("repository version {version} is not supported, expected {REPO_VERSION}");
        }
        let config = read_config(&path.join(CONFIG_FILE))?;
        let datastore = ParityDb::open(path.join(DATASTORE_DIR), &config.parity_db)?;
        Ok(Self {
            path: path.to_owned(),
            config,
            datastore,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn datastore(&self) -> &ParityDb {
        &self.datastore
    }

    pub fn libp2p_dir(&self) -> PathBuf {
        self.path.join(LIBP2P_DIR)
    }

    /// Directory holding the wallet keystore.
    pub fn keystore_dir(&self) -> &Path {
        &self.path
    }

    /// Persists `config` in one step and makes it the current configuration.
    pub fn replace_config(&mut self, config: Config) -> anyhow::Result<()> {
        write_atomic(toml::to_string(&config)?.as_bytes(), &self.path.join(CONFIG_FILE))
            .context("failed to write config")?;
        self.config = config;
        Ok(())
    }
}
