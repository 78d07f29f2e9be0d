// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use clap::Parser as _;
use forest_init::cli_shared::logger::make_dispatch;
use forest_init::init::InitCommand;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cmd = InitCommand::parse();
    let config = cmd.base_config()?;
    let dispatch = make_dispatch(cmd.color, &config.log);
    cmd.run(config, dispatch).await
}
