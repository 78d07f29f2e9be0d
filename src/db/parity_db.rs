// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use super::SettingsStore;

use anyhow::{Context as _, anyhow};
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::DAG_CBOR;
use multihash_codetable::Code::Blake2b256;
use parity_db::{CompressionType, Db, Operation, Options};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// This is specific to the node's `ParityDb` usage.
/// It is used to determine which column to use for a given entry type.
#[derive(Copy, Clone, Debug, Display, PartialEq, EnumIter)]
#[repr(u8)]
enum DbColumn {
    /// Column for storing IPLD data with `Blake2b256` hash and `DAG_CBOR` codec.
    /// Block headers land here.
    GraphDagCborBlake2b256,
    /// Column for storing other IPLD data (different codec or hash function).
    GraphFull,
    /// Column for storing node settings.
    Settings,
}

impl DbColumn {
    fn create_column_options(compression: CompressionType) -> Vec<parity_db::ColumnOptions> {
        DbColumn::iter()
            .map(|col| match col {
                DbColumn::GraphDagCborBlake2b256 => parity_db::ColumnOptions {
                    preimage: true,
                    compression,
                    ..Default::default()
                },
                DbColumn::GraphFull => parity_db::ColumnOptions {
                    preimage: true,
                    // This is needed for key retrieval.
                    btree_index: true,
                    compression,
                    ..Default::default()
                },
                DbColumn::Settings => parity_db::ColumnOptions {
                    // preimage columns can't overwrite entries
                    preimage: false,
                    btree_index: true,
                    compression,
                    ..Default::default()
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityDbConfig {
    pub enable_statistics: bool,
}

pub struct ParityDb {
    db: parity_db::Db,
}

impl ParityDb {
    fn to_options(path: PathBuf, config: &ParityDbConfig) -> Options {
        Options {
            path,
            sync_wal: true,
            sync_data: true,
            stats: config.enable_statistics,
            salt: None,
            columns: DbColumn::create_column_options(CompressionType::Lz4),
            compression_threshold: [(0, 128)].into_iter().collect(),
        }
    }

    pub fn open(path: impl Into<PathBuf>, config: &ParityDbConfig) -> anyhow::Result<Self> {
        let opts = Self::to_options(path.into(), config);
        Ok(Self {
            db: Db::open_or_create(&opts)?,
        })
    }

    /// Returns an appropriate column variant based on the information
    /// in the Cid.
    fn choose_column(cid: &Cid) -> DbColumn {
        match cid.codec() {
            DAG_CBOR if cid.hash().code() == u64::from(Blake2b256) => {
                DbColumn::GraphDagCborBlake2b256
            }
            _ => DbColumn::GraphFull,
        }
    }

    fn read_from_column<K>(&self, key: K, column: DbColumn) -> anyhow::Result<Option<Vec<u8>>>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get(column as u8, key.as_ref())
            .map_err(|e| anyhow!("error from column {column}: {e}"))
    }

    fn write_to_column<K, V>(&self, key: K, value: V, column: DbColumn) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let tx = [(column as u8, key.as_ref(), Some(value.as_ref().to_vec()))];
        self.db
            .commit(tx)
            .map_err(|e| anyhow!("error writing to column {column}: {e}"))
    }
}

impl SettingsStore for ParityDb {
    fn read_bin(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.read_from_column(key.as_bytes(), DbColumn::Settings)
    }

    fn write_bin(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        self.write_to_column(key.as_bytes(), value, DbColumn::Settings)
    }

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        self.db
            .get_size(DbColumn::Settings as u8, key.as_bytes())
            .map(|size| size.is_some())
            .context("error checking if key exists")
    }

    fn setting_keys(&self) -> anyhow::Result<Vec<String>> {
        let mut iter = self.db.iter(DbColumn::Settings as u8)?;
        let mut keys = vec![];
        while let Some((key, _)) = iter.next()? {
            keys.push(String::from_utf8(key)?);
        }
        Ok(keys)
    }
}

impl Blockstore for ParityDb {
    fn get(&self, k: &Cid) -> anyhow::Result<Option<Vec<u8>>> {
        self.read_from_column(k.to_bytes(), Self::choose_column(k))
    }

    fn put_keyed(&self, k: &Cid, block: &[u8]) -> anyhow::Result<()> {
        self.write_to_column(k.to_bytes(), block, Self::choose_column(k))
    }

    fn put_many_keyed<D, I>(&self, blocks: I) -> anyhow::Result<()>
    where
        Self: Sized,
        D: AsRef<[u8]>,
        I: IntoIterator<Item = (Cid, D)>,
    {
        let tx = blocks.into_iter().map(|(k, v)| {
            (
                Self::choose_column(&k) as u8,
                Operation::Set(k.to_bytes(), v.as_ref().to_vec()),
            )
        });
        self.db
            .commit_changes(tx)
            .map_err(|e| anyhow!("error bulk writing: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multihash_codetable::MultihashDigest as _;

    #[test]
    fn choose_column_by_codec_and_hash() {
        let data = b"block";
        let cbor = Cid::new_v1(DAG_CBOR, Blake2b256.digest(data));
        let raw = Cid::new_v1(fvm_ipld_encoding::IPLD_RAW, Blake2b256.digest(data));
        assert_eq!(
            ParityDb::choose_column(&cbor),
            DbColumn::GraphDagCborBlake2b256
        );
        assert_eq!(ParityDb::choose_column(&raw), DbColumn::GraphFull);
    }

    #[test]
    fn blocks_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data = b"block".as_slice();
        let cid = Cid::new_v1(DAG_CBOR, Blake2b256.digest(data));
        {
            let db = ParityDb::open(dir.path(), &ParityDbConfig::default()).unwrap();
            db.put_many_keyed([(cid, data)]).unwrap();
        }
        let db = ParityDb::open(dir.path(), &ParityDbConfig::default()).unwrap();
        assert_eq!(db.get(&cid).unwrap().as_deref(), Some(data));
    }
}
