// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use crate::cli_shared::cli::Config;
use crate::utils::io::read_toml;
use anyhow::Context as _;
use std::path::Path;

/// Reads a TOML configuration file.
pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    let toml = std::fs::read_to_string(path)
        .with_context(|| format!("couldn't read config file {}", path.display()))?;
    read_toml(&toml).with_context(|| format!("invalid config file {}", path.display()))
}
