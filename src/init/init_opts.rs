// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use crate::key_management::{KeyInfo, decode_wallet_export};
use crate::libp2p::{Keypair, keypair::decode_keypair};

use super::Error;

/// One action for the node bootstrap to carry out, in list order.
#[derive(Debug, Clone)]
pub enum InitOpt {
    /// Use this key as the node's libp2p identity.
    PeerKey(Keypair),
    /// Import this wallet key and make it the default one.
    DefaultKey(KeyInfo),
    /// Import this wallet key.
    ImportKey(KeyInfo),
}

/// Reads the key files given on the command line. The peer identity comes
/// first, followed by the wallet keys in file order.
pub fn build_init_opts(
    peer_keyfile: Option<&Path>,
    wallet_keyfile: Option<&Path>,
) -> Result<Vec<InitOpt>, Error> {
    let mut opts = vec![];

    if let Some(path) = peer_keyfile {
        let keypair = decode_keypair(&read_key_file(path)?).map_err(|e| {
            Error::KeyImportFailure(format!("invalid peer key in {}: {e}", path.display()))
        })?;
        opts.push(InitOpt::PeerKey(keypair));
    }

    if let Some(path) = wallet_keyfile {
        let keys = decode_wallet_export(&read_key_file(path)?).map_err(|e| {
            Error::KeyImportFailure(format!("invalid wallet export in {}: {e}", path.display()))
        })?;
        let mut keys = keys.into_iter();
        opts.extend(keys.next().map(InitOpt::DefaultKey));
        opts.extend(keys.map(InitOpt::ImportKey));
    }

    Ok(opts)
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path)
        .map_err(|e| Error::KeyImportFailure(format!("failed to read {}: {e}", path.display())))
}
