// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_shared4::address::{Address, Network};

/// Parses a Filecoin address in either its mainnet (`f`) or testnet (`t`)
/// form.
pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    Network::Mainnet
        .parse_address(s)
        .or_else(|_| Network::Testnet.parse_address(s))
        .map_err(|e| anyhow::anyhow!("invalid address {s}: {e}"))
}

/// Serializes an optional address as its string form, for human-edited
/// configuration files.
pub mod opt_address_str {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(addr: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match addr {
            Some(addr) => serializer.serialize_some(&addr.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| parse_address(&s).map_err(de::Error::custom))
            .transpose()
    }
}
