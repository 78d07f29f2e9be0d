// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_encoding::tuple::*;

/// The result from getting an entry from `Drand`.
/// The entry contains the round, or epoch as well as the BLS signature for that
/// round of randomness.
/// This beacon entry is stored on chain in the block header.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize_tuple, Serialize_tuple)]
pub struct BeaconEntry {
    round: u64,
    #[serde(with = "fvm_ipld_encoding::strict_bytes")]
    data: Vec<u8>,
}

impl BeaconEntry {
    pub fn new(round: u64, data: Vec<u8>) -> Self {
        Self { round, data }
    }
    /// Returns the current round number.
    pub fn round(&self) -> u64 {
        self.round
    }
    /// The signature of message `H(prev_round, prev_round.data, round)`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn beacon_entry_cbor_roundtrip(round: u64, data: Vec<u8>) {
        let entry = BeaconEntry::new(round, data);
        let bytes = fvm_ipld_encoding::to_vec(&entry).unwrap();
        let parsed: BeaconEntry = fvm_ipld_encoding::from_slice(&bytes).unwrap();
        assert_eq!(entry, parsed);
    }
}
