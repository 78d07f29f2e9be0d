// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::LazyLock;
use std::time::Duration;

use fvm_shared4::sector::RegisteredSealProof;

use super::{NetworkPreset, drand::DRAND_MAINNET, parse_bootstrap_peers};
use crate::cli_shared::cli::{BootstrapConfig, NetworkParamsConfig};

// 1 TiB
const CONSENSUS_MINER_MIN_POWER: u64 = 1 << 40;

pub static PRESET: LazyLock<NetworkPreset> = LazyLock::new(|| NetworkPreset {
    bootstrap: BootstrapConfig {
        addresses: parse_bootstrap_peers(include_str!("../../../build/bootstrap/testnet")),
        min_peer_threshold: 1,
        period: Duration::from_secs(30),
    },
    drand: DRAND_MAINNET.clone(),
    network_params: NetworkParamsConfig {
        network_name: "testnet".into(),
        consensus_miner_min_power: CONSENSUS_MINER_MIN_POWER,
        block_delay_secs: 30,
        replace_proof_types: vec![
            RegisteredSealProof::StackedDRG32GiBV1,
            RegisteredSealProof::StackedDRG64GiBV1,
        ],
    },
});
