// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, KeyInfo, SignatureType};
use bls_signatures::{PrivateKey as BlsPrivate, Serialize as _};
use fvm_shared4::address::Address;
use k256::elliptic_curve::sec1::ToEncodedPoint as _;

/// Return the public key for a given `private_key` and [`SignatureType`]
pub fn to_public(sig_type: SignatureType, private_key: &[u8]) -> Result<Vec<u8>, Error> {
    match sig_type {
        SignatureType::Bls => Ok(BlsPrivate::from_bytes(private_key)
            .map_err(|err| Error::Other(err.to_string()))?
            .public_key()
            .as_bytes()),
        SignatureType::Secp256k1 => {
            let private_key = k256::SecretKey::from_slice(private_key)
                .map_err(|err| Error::Other(err.to_string()))?;
            // uncompressed, 65 bytes
            Ok(private_key
                .public_key()
                .to_encoded_point(false)
                .as_bytes()
                .to_vec())
        }
    }
}

/// Return a new Address that is of a given [`SignatureType`] and uses the
/// supplied `public_key`
pub fn new_address(sig_type: SignatureType, public_key: &[u8]) -> Result<Address, Error> {
    match sig_type {
        SignatureType::Bls => {
            Address::new_bls(public_key).map_err(|err| Error::Other(err.to_string()))
        }
        SignatureType::Secp256k1 => {
            Address::new_secp256k1(public_key).map_err(|err| Error::Other(err.to_string()))
        }
    }
}

/// A private key together with the address it controls.
#[derive(Clone, PartialEq, Debug, Eq)]
pub struct Key {
    pub key_info: KeyInfo,
    pub public_key: Vec<u8>,
    pub address: Address,
}

impl TryFrom<KeyInfo> for Key {
    type Error = Error;

    fn try_from(key_info: KeyInfo) -> Result<Self, Self::Error> {
        let public_key = to_public(*key_info.key_type(), key_info.private_key())?;
        let address = new_address(*key_info.key_type(), &public_key)?;
        Ok(Key {
            key_info,
            public_key,
            address,
        })
    }
}
