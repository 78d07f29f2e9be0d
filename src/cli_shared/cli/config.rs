// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::beacon::DrandConfig;
use crate::db::ParityDbConfig;
use core::time::Duration;
use fvm_shared4::{address::Address, sector::RegisteredSealProof};
use libp2p::Multiaddr;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use smart_default::SmartDefault;
use std::path::PathBuf;

/// Default number of seconds between automatic sealing attempts.
pub const DEFAULT_AUTO_SEAL_INTERVAL_SECONDS: u64 = 120;

#[derive(
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
pub struct LogValue {
    pub module: String,
    pub level: LogLevel,
}

impl LogValue {
    pub fn new(module: &str, level: LogLevel) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogConfig {
    pub filters: Vec<LogValue>,
}

impl LogConfig {
    pub(in crate::cli_shared) fn to_filter_string(&self) -> String {
        self.filters
            .iter()
            .map(|f| format!("{}={}", f.module, f.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filters: vec![
                LogValue::new("axum", LogLevel::Warn),
                LogValue::new("hyper_util", LogLevel::Warn),
                LogValue::new("parity_db", LogLevel::Warn),
                LogValue::new("reqwest", LogLevel::Warn),
            ],
        }
    }
}

/// Where sectors are kept.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct SectorBaseConfig {
    /// Empty means the `sectors` directory of the repository.
    pub root_dir_path: PathBuf,
    /// Sectors sealed ahead of time, imported at the first start.
    pub pre_sealed_sectors_dir_path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, SmartDefault)]
#[serde(default)]
pub struct MiningConfig {
    #[serde(with = "crate::utils::address::opt_address_str")]
    pub miner_address: Option<Address>,
    #[default(DEFAULT_AUTO_SEAL_INTERVAL_SECONDS)]
    pub auto_seal_interval_seconds: u64,
}

#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, SmartDefault)]
#[serde(default)]
pub struct BootstrapConfig {
    pub addresses: Vec<Multiaddr>,
    #[default(3)]
    pub min_peer_threshold: usize,
    /// Interval between attempts to reach the bootstrap peers.
    #[serde_as(as = "DurationSeconds<u64>")]
    #[default(Duration::from_secs(10))]
    pub period: Duration,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, SmartDefault)]
#[serde(default)]
pub struct NetworkParamsConfig {
    #[default("localnet".into())]
    pub network_name: String,
    pub consensus_miner_min_power: u64,
    #[default(30)]
    pub block_delay_secs: u32,
    #[default(vec![RegisteredSealProof::StackedDRG2KiBV1, RegisteredSealProof::StackedDRG8MiBV1])]
    pub replace_proof_types: Vec<RegisteredSealProof>,
}

/// Node configuration, persisted as `config.toml` in the repository.
#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub sector_base: SectorBaseConfig,
    pub mining: MiningConfig,
    pub bootstrap: BootstrapConfig,
    pub drand: DrandConfig<'static>,
    pub network_params: NetworkParamsConfig,
    pub parity_db: ParityDbConfig,
    pub log: LogConfig,
}
