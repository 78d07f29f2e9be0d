// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::SettingsStore;
use ahash::HashMap;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use itertools::Itertools;
use parking_lot::RwLock;

/// In-memory block and settings store. Genesis archives are staged here
/// before anything touches the repository datastore.
#[derive(Debug, Default)]
pub struct MemoryDB {
    blockchain_db: RwLock<HashMap<Cid, Vec<u8>>>,
    settings_db: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryDB {
    pub fn len(&self) -> usize {
        self.blockchain_db.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockchain_db.read().is_empty()
    }

    /// Writes every staged block into `target` as a single batch.
    pub fn flush_into(&self, target: &impl Blockstore) -> anyhow::Result<usize> {
        let blocks = self
            .blockchain_db
            .read()
            .iter()
            .map(|(&cid, data)| (cid, data.clone()))
            .collect_vec();
        let count = blocks.len();
        target.put_many_keyed(blocks)?;
        Ok(count)
    }
}

impl SettingsStore for MemoryDB {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.settings_db.read().get(key).cloned())
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.settings_db
            .write()
            .insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.settings_db.read().contains_key(key))
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.settings_db.read().keys().cloned().collect_vec())
    }
}

impl Blockstore for MemoryDB {
    fn get(&self, k: &Cid) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blockchain_db.read().get(k).cloned())
    }

    fn put_keyed(&self, k: &Cid, block: &[u8]) -> anyhow::Result<()> {
        self.blockchain_db.write().insert(*k, block.to_vec());
        Ok(())
    }

    fn has(&self, k: &Cid) -> anyhow::Result<bool> {
        Ok(self.blockchain_db.read().contains_key(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multihash_codetable::{Code, MultihashDigest as _};

    #[test]
    fn flush_copies_every_block() {
        let staging = MemoryDB::default();
        let target = MemoryDB::default();
        for data in [b"a".as_slice(), b"b", b"c"] {
            let cid = Cid::new_v1(fvm_ipld_encoding::IPLD_RAW, Code::Blake2b256.digest(data));
            staging.put_keyed(&cid, data).unwrap();
        }
        assert_eq!(staging.flush_into(&target).unwrap(), 3);
        assert_eq!(target.len(), 3);
        assert!(!staging.is_empty());
    }
}
