// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{fmt, sync::LazyLock};

use cid::Cid;
use itertools::Itertools as _;
use serde::{Deserialize, Serialize};

// See <https://github.com/filecoin-project/lotus/blob/d3ca54d617f4783a1a492993f06e737ea87a5834/chain/gen/genesis/genesis.go#L627>
pub static FILECOIN_GENESIS_CID: LazyLock<Cid> = LazyLock::new(|| {
    "bafyreiaqpwbbyjo4a42saasj36kkrpv4tsherf2e7bvezkert2a7dhonoi"
        .parse()
        .expect("Infallible")
});

/// An ordered set of block CIDs identifying a tipset.
///
/// The genesis block has no parents, so its parent key is empty. Lotus-built
/// networks point genesis at a well-known sentinel block instead, which is
/// treated the same way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipsetKey(Vec<Cid>);

impl TipsetKey {
    /// The parent key of a genesis block.
    pub fn undefined() -> Self {
        Self(Vec::new())
    }

    pub fn is_undefined(&self) -> bool {
        match self.0.as_slice() {
            [] => true,
            [only] => only == &*FILECOIN_GENESIS_CID,
            _ => false,
        }
    }

    pub fn first(&self) -> Option<&Cid> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn cids(&self) -> &[Cid] {
        &self.0
    }

    pub fn into_cids(self) -> Vec<Cid> {
        self.0
    }
}

impl From<Vec<Cid>> for TipsetKey {
    fn from(cids: Vec<Cid>) -> Self {
        Self(cids)
    }
}

impl FromIterator<Cid> for TipsetKey {
    fn from_iter<T: IntoIterator<Item = Cid>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for TipsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_keys() {
        assert!(TipsetKey::undefined().is_undefined());
        assert!(TipsetKey::from(vec![*FILECOIN_GENESIS_CID]).is_undefined());
        assert!(!TipsetKey::from(vec![Cid::default()]).is_undefined());
        assert!(!TipsetKey::from(vec![*FILECOIN_GENESIS_CID, Cid::default()]).is_undefined());
    }

    #[test]
    fn encodes_as_cid_list() {
        let key = TipsetKey::from(vec![Cid::default()]);
        let bytes = fvm_ipld_encoding::to_vec(&key).unwrap();
        assert_eq!(bytes, fvm_ipld_encoding::to_vec(&vec![Cid::default()]).unwrap());
        let decoded: TipsetKey = fvm_ipld_encoding::from_slice(&bytes).unwrap();
        assert_eq!(decoded, key);
    }
}
