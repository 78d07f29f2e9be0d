// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Filecoin node bootstrap: creates a node repository, resolves the genesis
//! block the node is anchored to and installs its identity and wallet keys.

pub mod beacon;
pub mod blocks;
pub mod cli_shared;
pub mod db;
pub mod genesis;
pub mod init;
pub mod key_management;
pub mod libp2p;
pub mod networks;
pub mod node;
pub mod repo;
pub mod utils;
