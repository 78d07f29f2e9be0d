// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Genesis resolution.
//!
//! A genesis archive either holds the genesis header itself or the head of a
//! chain. In the latter case the parent links are followed back to the first
//! block without parents. Archives are staged in memory and only reach the
//! repository datastore once a genesis has been found in them.

use std::collections::BTreeMap;
use std::io;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use cid::Cid;
use futures::SinkExt as _;
use fvm_ipld_blockstore::Blockstore;
use fvm_shared4::address::Address;
use itertools::Itertools as _;
use multihash_codetable::{Code, MultihashDigest as _};
use tokio::io::AsyncWrite;
use tracing::{debug, info, warn};

use crate::blocks::{CachingBlockHeader, RawBlockHeader, TipsetKey};
use crate::db::MemoryDB;
use crate::init::Error;
use crate::utils::db::car_stream::{CarBlock, CarWriter};
use crate::utils::db::car_util::load_car;
use crate::utils::net::{ArchiveSource, SourceReadError};

/// Reads the archive at `source`, finds its genesis block and copies every
/// block of the archive into `db`.
///
/// Nothing is written to `db` unless a genesis block was found. `timeout`
/// bounds opening and decoding the archive. With `max_depth` set, archives
/// whose genesis lies more than that many parent hops behind the root are
/// rejected.
pub async fn load_genesis(
    source: &ArchiveSource,
    client: &reqwest::Client,
    db: &impl Blockstore,
    max_depth: Option<u64>,
    timeout: Duration,
) -> anyhow::Result<CachingBlockHeader> {
    let staging = MemoryDB::default();
    let roots = tokio::time::timeout(timeout, stage_archive(source, client, &staging))
        .await
        .map_err(|_| {
            Error::SourceUnavailable(format!(
                "{source}: timed out after {}",
                humantime::format_duration(timeout)
            ))
        })??;

    let root = *roots.first().ok_or(Error::MissingRootBlock)?;
    if roots.len() > 1 {
        warn!(
            "Archive declares {} roots, only the first one is used: {root}",
            roots.len()
        );
    }

    let (genesis, hops) = extract_genesis(&staging, root, max_depth)?;
    let genesis_cid = genesis.cid()?;
    if hops > 0 {
        info!(
            genesis = %genesis_cid,
            head = %TipsetKey::from(roots),
            hops,
            "Archive holds a chain, extracted its genesis"
        );
    }

    let count = staging
        .flush_into(db)
        .context("failed to persist genesis archive")?;
    debug!("Persisted {count} blocks from {source}");
    info!("Initialized genesis: {genesis_cid}");
    Ok(genesis)
}

async fn stage_archive(
    source: &ArchiveSource,
    client: &reqwest::Client,
    staging: &MemoryDB,
) -> Result<Vec<Cid>, Error> {
    let reader = source.open(client).await?;
    let header = load_car(staging, reader)
        .await
        .map_err(classify_load_error)?;
    Ok(header.roots)
}

/// Failures raised while reading the source mean the bytes could not be
/// obtained. Everything else means the bytes are not a valid archive.
fn classify_load_error(e: anyhow::Error) -> Error {
    let from_source = e
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(SourceReadError::is_source_error);
    if from_source {
        Error::SourceUnavailable(format!("{e:#}"))
    } else {
        Error::MalformedArchive(format!("{e:#}"))
    }
}

/// Walks from `root` to the first block without parents, always following
/// the first parent. Returns that block and the number of hops taken.
pub fn extract_genesis(
    store: &impl Blockstore,
    root: Cid,
    max_depth: Option<u64>,
) -> Result<(CachingBlockHeader, u64), Error> {
    let mut current = load_header(store, root)?;
    let mut hops = 0;
    while !current.is_genesis() {
        let Some(&parent) = current.parents.first() else {
            break;
        };
        if let Some(limit) = max_depth.filter(|limit| hops >= *limit) {
            return Err(Error::ChainTooDeep { limit });
        }
        current = load_header(store, parent)?;
        hops += 1;
    }
    Ok((current, hops))
}

fn load_header(store: &impl Blockstore, cid: Cid) -> Result<CachingBlockHeader, Error> {
    let bytes = store
        .get(&cid)
        .map_err(|e| Error::SourceUnavailable(format!("failed to read block {cid}: {e}")))?
        .ok_or_else(|| {
            Error::SourceUnavailable(format!("block {cid} is not present in the block store"))
        })?;
    CachingBlockHeader::decode(cid, &bytes).map_err(|e| Error::DecodeFailure {
        cid,
        reason: e.to_string(),
    })
}

/// Creates a genesis block for local development and stores it, together
/// with an empty state object, in `store`.
pub fn make_dev_genesis(
    store: &impl Blockstore,
    miner: Option<Address>,
) -> anyhow::Result<CachingBlockHeader> {
    let state_root = put_empty_state(store)?;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs();
    let header = RawBlockHeader {
        miner_address: miner.unwrap_or_else(|| Address::new_id(0)),
        parents: TipsetKey::undefined(),
        epoch: 0,
        state_root,
        message_receipts: state_root,
        messages: state_root,
        timestamp,
        ..Default::default()
    };
    let (cid, data) = header.car_block()?;
    store.put_keyed(&cid, &data)?;
    info!(genesis = %cid, miner = %header.miner_address, "Generated development genesis");
    Ok(CachingBlockHeader::new(header))
}

fn put_empty_state(store: &impl Blockstore) -> anyhow::Result<Cid> {
    let data = fvm_ipld_encoding::to_vec(&BTreeMap::<String, Cid>::new())?;
    let cid = Cid::new_v1(fvm_ipld_encoding::DAG_CBOR, Code::Blake2b256.digest(&data));
    store.put_keyed(&cid, &data)?;
    Ok(cid)
}

/// Writes `genesis` and the blocks it references directly (state root,
/// messages and receipts) as a CAR archive rooted at the genesis.
pub async fn export_genesis<W: AsyncWrite + Unpin>(
    store: &impl Blockstore,
    genesis: &CachingBlockHeader,
    writer: W,
) -> anyhow::Result<W> {
    let (cid, data) = genesis.car_block()?;
    let mut car = CarWriter::new_carv1(vec![cid], writer)?;
    car.feed(CarBlock { cid, data }).await?;
    for link in [genesis.state_root, genesis.messages, genesis.message_receipts]
        .into_iter()
        .unique()
    {
        if let Some(data) = store.get(&link)? {
            car.feed(CarBlock { cid: link, data }).await?;
        }
    }
    car.close().await?;
    Ok(car.into_inner())
}
