// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use anyhow::Context as _;
use libp2p::identity::{DecodingError, Keypair};
use tracing::{debug, info};

use crate::utils::io::write_new_sensitive_file;

/// File name of the peer identity inside the `libp2p` directory.
pub const KEYPAIR_FILE: &str = "keypair";

/// Decodes a protobuf encoded private key, as written by libp2p
/// implementations. Any key type libp2p supports is accepted.
pub fn decode_keypair(bytes: &[u8]) -> Result<Keypair, DecodingError> {
    Keypair::from_protobuf_encoding(bytes)
}

/// Persists `keypair` in `dir`. The file is only readable by its owner.
pub fn write_keypair(dir: &Path, keypair: &Keypair) -> anyhow::Result<()> {
    let path = dir.join(KEYPAIR_FILE);
    let encoded = keypair.to_protobuf_encoding()?;
    write_new_sensitive_file(&encoded, &path)
        .with_context(|| format!("failed to write keypair to {}", path.display()))?;
    debug!(peer_id = %keypair.public().to_peer_id(), "Saved keypair to {}", path.display());
    Ok(())
}

/// Reads the keypair stored in `dir`, if any.
pub fn read_keypair(dir: &Path) -> anyhow::Result<Option<Keypair>> {
    let path = dir.join(KEYPAIR_FILE);
    match std::fs::read(&path) {
        Ok(bytes) => Ok(Some(decode_keypair(&bytes).with_context(|| {
            format!("could not decode keypair at {}", path.display())
        })?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Returns the keypair stored in `dir`, generating and saving a fresh
/// ed25519 one when there is none.
pub fn get_or_create_keypair(dir: &Path) -> anyhow::Result<Keypair> {
    if let Some(keypair) = read_keypair(dir)? {
        info!("Recovered libp2p keypair from {}", dir.display());
        return Ok(keypair);
    }
    let keypair = Keypair::generate_ed25519();
    info!(peer_id = %keypair.public().to_peer_id(), "Generated new libp2p keypair");
    write_keypair(dir, &keypair)?;
    Ok(keypair)
}
