// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::{Context as _, bail};
use fvm_ipld_blockstore::Blockstore;
use tracing::info;

use crate::blocks::{CachingBlockHeader, TipsetKey};
use crate::db::{SettingsStore as _, SettingsStoreExt as _, setting_keys};
use crate::init::{Error, InitOpt};
use crate::key_management::{Key, KeyInfo, KeyStore};
use crate::libp2p::keypair::{get_or_create_keypair, write_keypair};
use crate::repo::FsRepo;

/// Materializes the node state of a fresh repository: the genesis block and
/// chain head, the peer identity and the wallet keys. `opts` are applied in
/// order.
///
/// Fails if the repository already has a genesis.
pub fn init(repo: &FsRepo, genesis: &CachingBlockHeader, opts: &[InitOpt]) -> anyhow::Result<()> {
    let db = repo.datastore();
    if db.exists(setting_keys::GENESIS_KEY)? {
        bail!("repository {} is already initialized", repo.path().display());
    }

    let (genesis_cid, data) = genesis.car_block()?;
    if !db.has(&genesis_cid)? {
        db.put_keyed(&genesis_cid, &data)?;
    }

    let mut peer_key = None;
    let mut keystore = KeyStore::open(repo.keystore_dir())?;
    let mut wallet_changed = false;
    for opt in opts {
        match opt {
            InitOpt::PeerKey(keypair) => peer_key = Some(keypair),
            InitOpt::DefaultKey(key_info) => {
                let key = import_key(&mut keystore, key_info, true)?;
                info!("Default wallet address: {}", key.address);
                wallet_changed = true;
            }
            InitOpt::ImportKey(key_info) => {
                let key = import_key(&mut keystore, key_info, false)?;
                info!("Imported wallet address: {}", key.address);
                wallet_changed = true;
            }
        }
    }
    if wallet_changed {
        keystore.flush().context("failed to write keystore")?;
    }

    let keypair = match peer_key {
        Some(keypair) => {
            write_keypair(&repo.libp2p_dir(), keypair)?;
            keypair.clone()
        }
        None => get_or_create_keypair(&repo.libp2p_dir())?,
    };
    info!(peer_id = %keypair.public().to_peer_id(), "Peer identity installed");

    db.write_obj(setting_keys::HEAD_KEY, &TipsetKey::from(vec![genesis_cid]))?;
    db.write_obj(setting_keys::GENESIS_KEY, &genesis_cid)?;
    info!(genesis = %genesis_cid, "Node initialized");
    Ok(())
}

fn import_key(keystore: &mut KeyStore, key_info: &KeyInfo, default: bool) -> Result<Key, Error> {
    let key = Key::try_from(key_info.clone())
        .map_err(|e| Error::KeyImportFailure(e.to_string()))?;
    keystore
        .import(&key, default)
        .map_err(|e| Error::KeyImportFailure(format!("{}: {e}", key.address)))?;
    Ok(key)
}
