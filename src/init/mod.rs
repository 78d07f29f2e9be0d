// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config_opts;
mod errors;
mod init_opts;

pub use config_opts::{ConfigOpts, synthesize};
pub use errors::Error;
pub use init_opts::{InitOpt, build_init_opts};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing::{Dispatch, error, info, instrument::WithSubscriber as _};

use crate::beacon::drand::fetch_drand_config;
use crate::cli_shared::cli::{Config, DEFAULT_AUTO_SEAL_INTERVAL_SECONDS, LoggingColor};
use crate::cli_shared::read_config;
use crate::genesis::{load_genesis, make_dev_genesis};
use crate::repo::{FsRepo, default_repo_dir};
use crate::utils::{address::parse_address, net::ArchiveSource, net::http_client};

/// Initialize a Filecoin node repository
#[derive(Debug, Clone, Parser)]
#[command(name = "forest-init", version)]
pub struct InitCommand {
    /// Path of file or HTTP(S) URL containing an archive of the genesis block
    /// DAG. A development genesis is generated when left empty.
    #[arg(long)]
    pub genesis_file: Option<String>,
    /// Path of file containing the key to use for the node's libp2p identity
    #[arg(long)]
    pub peer_keyfile: Option<PathBuf>,
    /// Path of file containing keys to import into the wallet
    #[arg(long)]
    pub wallet_keyfile: Option<PathBuf>,
    /// Miner address of the node. Also the miner of a generated genesis.
    #[arg(long)]
    pub with_miner: Option<String>,
    /// Directory into which staged and sealed sectors are written
    #[arg(long)]
    pub sector_dir: Option<PathBuf>,
    /// Miner actor address of the node, takes precedence over `--with-miner`
    #[arg(long)]
    pub miner_actor_address: Option<String>,
    /// Interval at which staged sectors are sealed
    #[arg(long, default_value_t = DEFAULT_AUTO_SEAL_INTERVAL_SECONDS)]
    pub auto_seal_interval_seconds: u64,
    /// Populate the configuration with the parameters of a network
    /// (`interop` or `testnet`)
    #[arg(long)]
    pub network: Option<String>,
    /// Directory of pre-sealed sector data to import. Requires `--with-miner`
    /// or `--miner-actor-address`.
    #[arg(long)]
    pub presealed_sector_dir: Option<PathBuf>,
    /// Address of a drand server to take the beacon configuration from
    #[arg(long)]
    pub drand_config_addr: Option<String>,
    /// Repository directory
    #[arg(long, env = "FOREST_INIT_REPO")]
    pub repodir: Option<PathBuf>,
    /// Deadline for fetching and decoding the genesis archive
    #[arg(long, default_value = "60s", value_parser = humantime::parse_duration)]
    pub genesis_fetch_timeout: Duration,
    /// Maximum number of parent hops between the archive root and the genesis
    #[arg(long)]
    pub genesis_max_depth: Option<u64>,
    /// Enable or disable colored logging in `stdout`
    #[arg(long, default_value = "auto")]
    pub color: LoggingColor,
    /// A TOML file containing the initial configuration of the repository.
    /// Its `[log]` section also applies to this command.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl InitCommand {
    pub fn config_opts(&self) -> ConfigOpts {
        ConfigOpts {
            sector_dir: self.sector_dir.clone(),
            with_miner: self.with_miner.clone(),
            auto_seal_interval_seconds: Some(self.auto_seal_interval_seconds),
            miner_actor_address: self.miner_actor_address.clone(),
            presealed_sector_dir: self.presealed_sector_dir.clone(),
            network: self.network.clone(),
        }
    }

    /// The configuration the repository starts from, before any command line
    /// override is applied.
    pub fn base_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => read_config(path),
            None => Ok(Config::default()),
        }
    }

    /// Runs the whole bootstrap on top of `config`, logging through `dispatch`.
    pub async fn run(self, config: Config, dispatch: Dispatch) -> anyhow::Result<()> {
        self.bootstrap(config).with_subscriber(dispatch).await
    }

    async fn bootstrap(self, config: Config) -> anyhow::Result<()> {
        let repo_dir = match &self.repodir {
            Some(dir) => dir.clone(),
            None => default_repo_dir()?,
        };
        info!("Initializing repository at {}", repo_dir.display());
        FsRepo::init(&repo_dir, &config)?;

        // Blocks, keys and configuration already written are not rolled back.
        if let Err(e) = self.initialize(&repo_dir).await {
            error!(
                "Initialization failed, remove {} before retrying",
                repo_dir.display()
            );
            return Err(e);
        }
        Ok(())
    }

    async fn initialize(&self, repo_dir: &Path) -> anyhow::Result<()> {
        let mut repo = FsRepo::open(repo_dir)?;
        let client = http_client(self.genesis_fetch_timeout)?;

        let genesis = match ArchiveSource::parse(self.genesis_file.as_deref().unwrap_or_default())?
        {
            Some(source) => {
                load_genesis(
                    &source,
                    &client,
                    repo.datastore(),
                    self.genesis_max_depth,
                    self.genesis_fetch_timeout,
                )
                .await?
            }
            None => {
                let miner = self
                    .with_miner
                    .as_deref()
                    .map(parse_address)
                    .transpose()
                    .map_err(|e| Error::InvalidOption(format!("--with-miner: {e}")))?;
                make_dev_genesis(repo.datastore(), miner)?
            }
        };

        let init_opts =
            build_init_opts(self.peer_keyfile.as_deref(), self.wallet_keyfile.as_deref())?;

        let mut config = synthesize(repo.config().clone(), &self.config_opts())
            .inspect_err(|e| error!("Error setting config: {e}"))?;

        if let Some(addr) = &self.drand_config_addr {
            config.drand = tokio::time::timeout(
                self.genesis_fetch_timeout,
                fetch_drand_config(&client, addr),
            )
            .await
            .with_context(|| format!("drand server {addr} did not answer in time"))?
            .inspect_err(|e| error!("Error configuring drand: {e:#}"))?;
        }

        repo.replace_config(config)
            .inspect_err(|e| error!("Error replacing config: {e:#}"))?;

        info!("Initializing node");
        crate::node::init(&repo, &genesis, &init_opts)
            .inspect_err(|e| error!("Error initializing node: {e:#}"))?;
        Ok(())
    }
}
