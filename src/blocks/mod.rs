// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod election_proof;
mod header;
mod ticket;
mod tipset;
mod vrf_proof;

pub use election_proof::ElectionProof;
pub use header::{CachingBlockHeader, RawBlockHeader};
pub use ticket::Ticket;
pub use tipset::{FILECOIN_GENESIS_CID, TipsetKey};
pub use vrf_proof::VRFProof;
