// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use crate::cli_shared::cli::Config;
use crate::networks::NetworkName;
use crate::utils::address::parse_address;

use super::Error;

/// Configuration overrides given on the command line. Every field is
/// optional; absent fields leave the configuration as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOpts {
    pub sector_dir: Option<PathBuf>,
    pub with_miner: Option<String>,
    pub auto_seal_interval_seconds: Option<u64>,
    pub miner_actor_address: Option<String>,
    pub presealed_sector_dir: Option<PathBuf>,
    pub network: Option<String>,
}

/// Applies `opts` on top of `config`. The result is only returned once every
/// option has been validated, so a failure never yields a half-updated
/// configuration.
pub fn synthesize(mut config: Config, opts: &ConfigOpts) -> Result<Config, Error> {
    if let Some(dir) = &opts.sector_dir {
        config.sector_base.root_dir_path = dir.clone();
    }

    if let Some(miner) = &opts.with_miner {
        config.mining.miner_address = Some(parse_option_address("with-miner", miner)?);
    }

    if let Some(interval) = opts.auto_seal_interval_seconds {
        config.mining.auto_seal_interval_seconds = interval;
    }

    // overrides --with-miner
    if let Some(miner) = &opts.miner_actor_address {
        config.mining.miner_address = Some(parse_option_address("miner-actor-address", miner)?);
    }

    if let Some(dir) = &opts.presealed_sector_dir {
        if config.mining.miner_address.is_none() {
            return Err(Error::InvalidOption(
                "if --presealed-sector-dir is provided, --miner-actor-address or --with-miner must also be provided"
                    .into(),
            ));
        }
        config.sector_base.pre_sealed_sectors_dir_path = Some(dir.clone());
    }

    let network = opts
        .network
        .as_deref()
        .unwrap_or_default()
        .parse::<NetworkName>()
        .map_err(Error::InvalidOption)?;
    if let Some(preset) = network.preset() {
        preset.apply(&mut config);
    }

    Ok(config)
}

fn parse_option_address(option: &str, value: &str) -> Result<fvm_shared4::address::Address, Error> {
    parse_address(value).map_err(|e| Error::InvalidOption(format!("--{option}: {e}")))
}
