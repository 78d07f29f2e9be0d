// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::LazyLock;
use std::time::Duration;

use fvm_shared4::sector::RegisteredSealProof;

use super::{NetworkPreset, drand::DRAND_INCENTINET, parse_bootstrap_peers};
use crate::cli_shared::cli::{BootstrapConfig, NetworkParamsConfig};

/// Minimum power, in bytes, for a miner to take part in consensus.
const CONSENSUS_MINER_MIN_POWER: u64 = 2048;

pub static PRESET: LazyLock<NetworkPreset> = LazyLock::new(|| NetworkPreset {
    bootstrap: BootstrapConfig {
        addresses: parse_bootstrap_peers(include_str!("../../../build/bootstrap/interop")),
        min_peer_threshold: 1,
        period: Duration::from_secs(10),
    },
    drand: DRAND_INCENTINET.clone(),
    network_params: NetworkParamsConfig {
        network_name: "interop".into(),
        consensus_miner_min_power: CONSENSUS_MINER_MIN_POWER,
        block_delay_secs: 30,
        replace_proof_types: vec![
            RegisteredSealProof::StackedDRG2KiBV1,
            RegisteredSealProof::StackedDRG512MiBV1,
            RegisteredSealProof::StackedDRG32GiBV1,
            RegisteredSealProof::StackedDRG64GiBV1,
        ],
    },
});
