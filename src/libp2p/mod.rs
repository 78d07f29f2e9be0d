// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod keypair;

// Re-export some libp2p types
pub use libp2p::identity::{Keypair, PeerId};
