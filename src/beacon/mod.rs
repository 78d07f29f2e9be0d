// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod beacon_entries;
pub mod drand;

pub use beacon_entries::BeaconEntry;
pub use drand::{ChainInfo, DrandConfig};
