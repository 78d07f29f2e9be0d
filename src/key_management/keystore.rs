// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use fvm_shared4::address::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Error, Key};
use crate::utils::io::write_atomic;

/// File name of the keystore inside the repository.
pub const KEYSTORE_NAME: &str = "keystore.json";
/// Keystore entry pointing at the default wallet key.
pub const DEFAULT_KEY_NAME: &str = "default";

/// Signature schemes a wallet key can belong to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SignatureType {
    Secp256k1,
    Bls,
}

/// `KeyInfo` struct, this contains the type of key and the private key.
/// Serialized the way wallet exports carry it:
/// `{"Type": "bls", "PrivateKey": "<base64>"}`.
#[derive(Clone, PartialEq, Debug, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyInfo {
    #[serde(rename = "Type")]
    key_type: SignatureType,
    #[serde(with = "base64_standard")]
    private_key: Vec<u8>,
}

impl KeyInfo {
    pub fn new(key_type: SignatureType, private_key: Vec<u8>) -> Self {
        KeyInfo {
            key_type,
            private_key,
        }
    }

    pub fn key_type(&self) -> &SignatureType {
        &self.key_type
    }

    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }
}

/// The JSON document produced by a wallet export. A missing or `null` key
/// list means the export holds no keys.
#[derive(Debug, Default, Deserialize)]
struct WalletExport {
    #[serde(rename = "KeyInfo", default)]
    key_info: Option<Vec<KeyInfo>>,
}

/// Decodes a wallet export, keeping the order of the keys in the file.
pub fn decode_wallet_export(bytes: &[u8]) -> Result<Vec<KeyInfo>, serde_json::Error> {
    let export: WalletExport = serde_json::from_slice(bytes)?;
    Ok(export.key_info.unwrap_or_default())
}

/// Name under which a wallet key is stored.
pub fn wallet_key_name(addr: &Address) -> String {
    format!("wallet-{addr}")
}

/// `KeyStore` struct, this contains a set of `KeyInfos` indexed by name and
/// the file it is persisted to.
#[derive(Clone, PartialEq, Debug, Eq)]
pub struct KeyStore {
    key_info: HashMap<String, KeyInfo>,
    path: PathBuf,
}

impl KeyStore {
    /// Opens the keystore in `dir`, starting empty if the file does not
    /// exist yet.
    pub fn open(dir: &Path) -> Result<Self, Error> {
        let path = dir.join(KEYSTORE_NAME);
        let key_info = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Keystore does not exist, initializing new keystore at: {}", path.display());
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { key_info, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return all of the keys that are stored in the `KeyStore`
    pub fn list(&self) -> Vec<String> {
        self.key_info.keys().cloned().collect()
    }

    /// Return `KeyInfo` that corresponds to a given key
    pub fn get(&self, k: &str) -> Result<&KeyInfo, Error> {
        self.key_info.get(k).ok_or(Error::KeyInfo)
    }

    /// Save a key `key_info` pair to the `KeyStore`
    pub fn put(&mut self, key: &str, key_info: KeyInfo) -> Result<(), Error> {
        if self.key_info.contains_key(key) {
            return Err(Error::KeyExists);
        }
        self.key_info.insert(key.to_owned(), key_info);
        Ok(())
    }

    /// Remove the Key and corresponding `key_info` from the `KeyStore`
    pub fn remove(&mut self, key: &str) -> Option<KeyInfo> {
        self.key_info.remove(key)
    }

    /// Stores a wallet key under its address. With `default` set it also
    /// becomes the default key, replacing any previous one.
    pub fn import(&mut self, key: &Key, default: bool) -> Result<(), Error> {
        self.put(&wallet_key_name(&key.address), key.key_info.clone())?;
        if default {
            self.remove(DEFAULT_KEY_NAME);
            self.put(DEFAULT_KEY_NAME, key.key_info.clone())?;
        }
        Ok(())
    }

    /// Writes the keystore to disk. The file is only readable by its owner.
    pub fn flush(&self) -> Result<(), Error> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        write_atomic(&serde_json::to_vec_pretty(&self.key_info)?, &self.path)?;
        Ok(())
    }
}

mod base64_standard {
    use base64::engine::{Engine as _, general_purpose::STANDARD};
    use serde::{Deserialize as _, Deserializer, Serialize as _, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(value).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        STANDARD
            .decode(String::deserialize(deserializer)?)
            .map_err(serde::de::Error::custom)
    }
}
