// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use futures::TryStreamExt;
use fvm_ipld_blockstore::Blockstore;
use tokio::io::AsyncBufRead;

use crate::utils::db::car_stream::{CarStream, CarV1Header};

/// Stream key-value pairs from a CAR archive into a block store.
/// The block store is not restored to its original state in case of errors.
pub async fn load_car<R>(db: &impl Blockstore, reader: R) -> anyhow::Result<CarV1Header>
where
    R: AsyncBufRead + Unpin,
{
    let mut stream = CarStream::new(reader).await?;
    while let Some(block) = stream.try_next().await? {
        db.put_keyed(&block.cid, &block.data)?;
    }
    Ok(stream.header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;
    use crate::utils::db::car_stream::{CarBlock, CarWriter};
    use cid::Cid;
    use futures::SinkExt as _;
    use multihash_codetable::{Code, MultihashDigest as _};

    #[tokio::test]
    async fn load_car_fills_store_and_returns_roots() {
        let blocks: Vec<CarBlock> = (0u8..10)
            .map(|i| {
                let data = vec![i; 32];
                CarBlock {
                    cid: Cid::new_v1(fvm_ipld_encoding::IPLD_RAW, Code::Blake2b256.digest(&data)),
                    data,
                }
            })
            .collect();
        let roots = vec![blocks[9].cid, blocks[3].cid];

        let mut writer = CarWriter::new_carv1(roots.clone(), Vec::new()).unwrap();
        for block in blocks.iter().cloned() {
            writer.feed(block).await.unwrap();
        }
        writer.close().await.unwrap();
        let bytes = writer.into_inner();

        let db = MemoryDB::default();
        let header = load_car(&db, bytes.as_slice()).await.unwrap();
        assert_eq!(header.roots, roots);
        assert_eq!(db.len(), blocks.len());
        for block in blocks {
            assert_eq!(db.get(&block.cid).unwrap(), Some(block.data));
        }
    }

    #[tokio::test]
    async fn load_car_surfaces_io_errors() {
        let db = MemoryDB::default();
        let err = load_car(&db, b"\x01\xa0".as_slice()).await.unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidData);
        assert!(db.is_empty());
    }
}
