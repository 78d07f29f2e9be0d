// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::borrow::Cow;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

/// Drand chain parameters, as served by `GET <server>/info`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo<'a> {
    pub public_key: Cow<'a, str>,
    pub period: u32,
    pub genesis_time: i64,
    pub hash: Cow<'a, str>,
    #[serde(rename = "groupHash")]
    pub group_hash: Cow<'a, str>,
}

/// Randomness beacon endpoints together with the chain they are expected to
/// serve.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrandConfig<'a> {
    pub servers: Vec<Url>,
    pub chain_info: ChainInfo<'a>,
}

/// Parses a beacon address, defaulting to `https` when no scheme is given.
pub fn parse_server_addr(addr: &str) -> anyhow::Result<Url> {
    let with_scheme = if addr.contains("://") {
        Cow::Borrowed(addr)
    } else {
        Cow::Owned(format!("https://{addr}"))
    };
    Url::parse(&with_scheme).with_context(|| format!("invalid drand address {addr}"))
}

/// Contacts the beacon at `addr` and returns a configuration that uses it as
/// the only server. Any network or decoding failure is returned to the
/// caller.
pub async fn fetch_drand_config(
    client: &reqwest::Client,
    addr: &str,
) -> anyhow::Result<DrandConfig<'static>> {
    let server = parse_server_addr(addr)?;
    let info_url = format!("{}/info", server.as_str().trim_end_matches('/'));
    let chain_info: ChainInfo<'static> = client
        .get(&info_url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .with_context(|| format!("failed to reach drand server {server}"))?
        .json()
        .await
        .with_context(|| format!("invalid chain info from drand server {server}"))?;
    info!(
        %server,
        hash = %chain_info.hash,
        period = chain_info.period,
        "Configured drand"
    );
    Ok(DrandConfig {
        servers: vec![server],
        chain_info,
    })
}
