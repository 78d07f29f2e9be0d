// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{fmt, str::FromStr};

use libp2p::Multiaddr;

use crate::beacon::DrandConfig;
use crate::cli_shared::cli::{BootstrapConfig, Config, NetworkParamsConfig};

mod drand;

pub mod interop;
pub mod testnet;

/// Networks a node can be initialized against. [`NetworkName::Default`] keeps
/// whatever the configuration already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NetworkName {
    #[default]
    Default,
    Interop,
    Testnet,
}

impl FromStr for NetworkName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Default),
            "interop" => Ok(Self::Interop),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network {other}")),
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => Ok(()),
            Self::Interop => f.write_str("interop"),
            Self::Testnet => f.write_str("testnet"),
        }
    }
}

impl NetworkName {
    pub fn preset(&self) -> Option<&'static NetworkPreset> {
        match self {
            Self::Default => None,
            Self::Interop => Some(&interop::PRESET),
            Self::Testnet => Some(&testnet::PRESET),
        }
    }
}

/// The sections of [`Config`] a named network dictates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPreset {
    pub bootstrap: BootstrapConfig,
    pub drand: DrandConfig<'static>,
    pub network_params: NetworkParamsConfig,
}

impl NetworkPreset {
    /// Overwrites the bootstrap, drand and network parameter sections. The
    /// rest of the configuration is left alone.
    pub fn apply(&self, config: &mut Config) {
        config.bootstrap = self.bootstrap.clone();
        config.drand = self.drand.clone();
        config.network_params = self.network_params.clone();
    }
}

pub(crate) fn parse_bootstrap_peers(bootstrap_peer_list: &str) -> Vec<Multiaddr> {
    bootstrap_peer_list
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Multiaddr::from_str(s).unwrap_or_else(|e| panic!("invalid bootstrap peer {s}: {e}"))
        })
        .collect()
}
