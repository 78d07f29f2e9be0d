// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::beacon::{ChainInfo, DrandConfig};
use std::borrow::Cow;
use std::sync::LazyLock;

pub(super) static DRAND_MAINNET: LazyLock<DrandConfig<'static>> = LazyLock::new(|| DrandConfig {
    // https://drand.love/developer/http-api/#public-endpoints
    servers: [
        "https://api.drand.sh",
        "https://api2.drand.sh",
        "https://api3.drand.sh",
        "https://drand.cloudflare.com",
    ]
    .into_iter()
    .map(|s| s.parse().expect("static drand server url"))
    .collect(),
    // https://api.drand.sh/8990e7a9aaed2ffed73dbd7092123d6f289930540d7651336225dc172e51b2ce/info
    chain_info: ChainInfo {
        public_key: Cow::Borrowed(
            "868f005eb8e6e4ca0a47c8a77ceaa5309a47978a7c71bc5cce96366b5d7a569937c529eeda66c7293784a9402801af31",
        ),
        period: 30,
        genesis_time: 1595431050,
        hash: Cow::Borrowed("8990e7a9aaed2ffed73dbd7092123d6f289930540d7651336225dc172e51b2ce"),
        group_hash: Cow::Borrowed(
            "176f93498eac9ca337150b46d21dd58673ea4e3581185f869672e59fa4cb390a",
        ),
    },
});

pub(super) static DRAND_INCENTINET: LazyLock<DrandConfig<'static>> = LazyLock::new(|| DrandConfig {
    // Note: This URL is no longer valid.
    // See <https://github.com/filecoin-project/lotus/pull/10476/files> and its related issues
    servers: vec![],
    chain_info: ChainInfo {
        public_key: Cow::Borrowed(
            "8cad0c72c606ab27d36ee06de1d5b2db1faf92e447025ca37575ab3a8aac2eaae83192f846fc9e158bc738423753d000",
        ),
        period: 30,
        genesis_time: 1595873820,
        hash: Cow::Borrowed("80c8b872c714f4c00fdd3daa465d5514049f457f01f85a4caf68cdcd394ba039"),
        group_hash: Cow::Borrowed(
            "d9406aaed487f7af71851b4399448e311f2328923d454e971536c05398ce2d9b",
        ),
    },
});
