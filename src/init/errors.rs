// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use thiserror::Error;

/// Failures of the bootstrap core. None of them are recovered locally.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The genesis source parsed as a URL with a scheme other than `http` or `https`.
    #[error("unsupported genesis source scheme: {0}")]
    UnsupportedScheme(String),
    /// The genesis source or a block it references could not be read.
    #[error("genesis source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("malformed archive: {0}")]
    MalformedArchive(String),
    #[error("archive declares no root block")]
    MissingRootBlock,
    #[error("failed to decode block {cid}: {reason}")]
    DecodeFailure { cid: Cid, reason: String },
    /// Bad or conflicting command line options.
    #[error("{0}")]
    InvalidOption(String),
    #[error("failed to import key: {0}")]
    KeyImportFailure(String),
    #[error("no parentless block within {limit} hops of the archive root")]
    ChainTooDeep { limit: u64 },
}
