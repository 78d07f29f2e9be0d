// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{ops::Deref, sync::OnceLock};

use super::{ElectionProof, Ticket, TipsetKey};
use crate::beacon::BeaconEntry;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use fvm_shared4::{
    address::Address, clock::ChainEpoch, crypto::signature::Signature, econ::TokenAmount,
    sector::PoStProof,
};
use multihash_codetable::{Code, MultihashDigest as _};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

#[derive(Deserialize_tuple, Serialize_tuple, Clone, Eq, PartialEq, Debug)]
pub struct RawBlockHeader {
    /// The address of the miner actor that mined this block
    pub miner_address: Address,
    pub ticket: Option<Ticket>,
    pub election_proof: Option<ElectionProof>,
    /// The verifiable oracle randomness used to elect this block's author leader
    pub beacon_entries: Vec<BeaconEntry>,
    pub winning_post_proof: Vec<PoStProof>,
    /// The set of parents this block was based on.
    /// Empty for the genesis block.
    pub parents: TipsetKey,
    /// The aggregate chain weight of the parent set
    #[serde(with = "fvm_shared4::bigint::bigint_ser")]
    pub weight: BigInt,
    /// The period in which a new block is generated.
    /// There may be multiple rounds in an epoch.
    pub epoch: ChainEpoch,
    /// The CID of the parent state root after calculating parent tipset.
    pub state_root: Cid,
    /// The CID of the root of an array of `MessageReceipts`
    pub message_receipts: Cid,
    /// The CID of the Merkle links for `bls_messages` and `secp_messages`
    pub messages: Cid,
    /// Aggregate signature of miner in block
    pub bls_aggregate: Option<Signature>,
    /// Block creation time, in seconds since the Unix epoch
    pub timestamp: u64,
    pub signature: Option<Signature>,
    pub fork_signal: u64,
    /// The base fee of the parent block
    pub parent_base_fee: TokenAmount,
}

impl Default for RawBlockHeader {
    fn default() -> Self {
        Self {
            miner_address: Address::new_id(0),
            ticket: None,
            election_proof: None,
            beacon_entries: Vec::new(),
            winning_post_proof: Vec::new(),
            parents: TipsetKey::undefined(),
            weight: BigInt::default(),
            epoch: 0,
            state_root: Cid::default(),
            message_receipts: Cid::default(),
            messages: Cid::default(),
            bls_aggregate: None,
            timestamp: 0,
            signature: None,
            fork_signal: 0,
            parent_base_fee: TokenAmount::default(),
        }
    }
}

impl RawBlockHeader {
    pub fn cid(&self) -> anyhow::Result<Cid> {
        Ok(self.car_block()?.0)
    }

    /// Encodes the header and returns it alongside its CID, ready to be put
    /// into a block store or a CAR archive.
    pub fn car_block(&self) -> anyhow::Result<(Cid, Vec<u8>)> {
        let data = fvm_ipld_encoding::to_vec(self)?;
        let cid = Cid::new_v1(fvm_ipld_encoding::DAG_CBOR, Code::Blake2b256.digest(&data));
        Ok((cid, data))
    }

    pub fn is_genesis(&self) -> bool {
        self.parents.is_undefined()
    }
}

/// A [`RawBlockHeader`] which remembers the CID it was loaded under.
#[derive(Debug, Clone)]
pub struct CachingBlockHeader {
    uncached: RawBlockHeader,
    cid: OnceLock<Cid>,
}

impl Deref for CachingBlockHeader {
    type Target = RawBlockHeader;

    fn deref(&self) -> &Self::Target {
        &self.uncached
    }
}

impl PartialEq for CachingBlockHeader {
    fn eq(&self, other: &Self) -> bool {
        self.uncached == other.uncached
    }
}

impl Eq for CachingBlockHeader {}

impl From<RawBlockHeader> for CachingBlockHeader {
    fn from(value: RawBlockHeader) -> Self {
        Self::new(value)
    }
}

impl CachingBlockHeader {
    pub fn new(uncached: RawBlockHeader) -> Self {
        Self {
            uncached,
            cid: OnceLock::new(),
        }
    }

    /// Decodes a header from `bytes`, trusting `cid` as its key.
    pub fn decode(cid: Cid, bytes: &[u8]) -> Result<Self, fvm_ipld_encoding::Error> {
        let uncached = fvm_ipld_encoding::from_slice::<RawBlockHeader>(bytes)?;
        Ok(Self {
            uncached,
            cid: cid.into(),
        })
    }

    /// Returns [`None`] if the blockstore doesn't contain the CID.
    pub fn load(store: &impl Blockstore, cid: Cid) -> anyhow::Result<Option<Self>> {
        match store.get(&cid)? {
            Some(bytes) => Ok(Some(Self::decode(cid, &bytes)?)),
            None => Ok(None),
        }
    }

    pub fn into_raw(self) -> RawBlockHeader {
        self.uncached
    }

    pub fn cid(&self) -> anyhow::Result<Cid> {
        if let Some(cid) = self.cid.get() {
            return Ok(*cid);
        }
        let cid = self.uncached.cid()?;
        Ok(*self.cid.get_or_init(|| cid))
    }
}

impl From<CachingBlockHeader> for RawBlockHeader {
    fn from(value: CachingBlockHeader) -> Self {
        value.into_raw()
    }
}

impl Serialize for CachingBlockHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uncached.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CachingBlockHeader {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawBlockHeader::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;
    use fvm_ipld_encoding::to_vec;
    use quickcheck::Arbitrary;

    impl quickcheck::Arbitrary for RawBlockHeader {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            RawBlockHeader {
                epoch: ChainEpoch::arbitrary(g),
                timestamp: u64::arbitrary(g),
                fork_signal: u64::arbitrary(g),
                ..Default::default()
            }
        }
    }

    #[test]
    fn symmetric_header_encoding() {
        // This test vector is pulled from space race
        let bz = hex::decode("904300e8078158608798de4e49e02ee129920224ea767650aa6e693857431cc95b5a092a57d80ef4d841ebedbf09f7680a5e286cd297f40100b496648e1fa0fd55f899a45d51404a339564e7d4809741ba41d9fcc8ac0261bf521cd5f718389e81354eff2aa52b338201586084d8929eeedc654d6bec8bb750fcc8a1ebf2775d8167d3418825d9e989905a8b7656d906d23dc83e0dad6e7f7a193df70a82d37da0565ce69b776d995eefd50354c85ec896a2173a5efed53a27275e001ad72a3317b2190b98cceb0f01c46b7b81821a00013cbe5860ae1102b76dea635b2f07b7d06e1671d695c4011a73dc33cace159509eac7edc305fa74495505f0cd0046ee0d3b17fabc0fc0560d44d296c6d91bcc94df76266a8e9d5312c617ca72a2e186cadee560477f6d120f6614e21fb07c2390a166a25981820358c0b965705cec77b46200af8fb2e47c0eca175564075061132949f00473dcbe74529c623eb510081e8b8bd34418d21c646485d893f040dcfb7a7e7af9ae4ed7bd06772c24fb0cc5b8915300ab5904fbd90269d523018fbf074620fd3060d55dd6c6057b4195950ac4155a735e8fec79767f659c30ea6ccf0813a4ab2b4e60f36c04c71fb6c58efc123f60c6ea8797ab3706a80a4ccc1c249989934a391803789ab7d04f514ee0401d0f87a1f5262399c451dcf5f7ec3bb307fc6f1a41f5ff3a5ddb81d82a5827000171a0e402209a0640d0620af5d1c458effce4cbb8969779c9072b164d3fe6f5179d6378d8cd4300310001d82a5827000171a0e402208fbc07f7587e2efebab9ff1ab27c928881abf9d1b7e5ad5206781415615867aed82a5827000171a0e40220e5658b3d18cd06e1db9015b4b0ec55c123a24d5be1ea24d83938c5b8397b4f2fd82a5827000171a0e402209967f10c4c0e336b3517d3a972f701dadea5b41ce33defb126b88e650cf884545861028ec8b64e2d93272f97edcab1f56bcad4a2b145ea88c232bfae228e4adbbd807e6a41740cc8cb569197dae6b2cbf8c1a4035e81fd7805ccbe88a5ec476bcfa438db4bd677de06b45e94310533513e9d17c635940ba8fa2650cdb34d445724c5971a5f44387e5861028a45c70a39fe8e526cbb6ba2a850e9063460873d6329f26cc2fc91972256c40249dba289830cc99619109c18e695d78012f760e7fda1b68bc3f1fe20ff8a017044753da38ca6384de652f3ee13aae5b64e6f88f85fd50d5c862fed3c1f594ace004500053724e0").unwrap();
        let header = fvm_ipld_encoding::from_slice::<CachingBlockHeader>(&bz).unwrap();
        assert_eq!(to_vec(&header).unwrap(), bz);
        assert!(!header.is_genesis());
        assert_eq!(header.parents.len(), 1);
        assert_eq!(header.epoch, 1);
    }

    #[test]
    fn load_distinguishes_missing_from_garbage() {
        let store = MemoryDB::default();
        let header = RawBlockHeader::default();
        let (cid, data) = header.car_block().unwrap();

        assert!(CachingBlockHeader::load(&store, cid).unwrap().is_none());

        store.put_keyed(&cid, &data).unwrap();
        let loaded = CachingBlockHeader::load(&store, cid).unwrap().unwrap();
        assert_eq!(loaded.cid().unwrap(), cid);
        assert_eq!(loaded.into_raw(), header);

        let garbage = Cid::new_v1(fvm_ipld_encoding::DAG_CBOR, Code::Blake2b256.digest(b"x"));
        store.put_keyed(&garbage, b"x").unwrap();
        assert!(CachingBlockHeader::load(&store, garbage).is_err());
    }

    #[quickcheck_macros::quickcheck]
    fn cached_cid_matches_encoding(header: RawBlockHeader) {
        let cached = CachingBlockHeader::new(header.clone());
        assert_eq!(cached.cid().unwrap(), header.car_block().unwrap().0);
    }
}
