// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use forest_init::cli_shared::read_config;
use fvm_shared4::address::Address;
use predicates::prelude::*;

pub mod common;
use crate::common::{CommonArgs, init, tmp_repo};

#[test]
fn dev_genesis_init() {
    let (repo, _tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--network")
        .arg("interop")
        .arg("--sector-dir")
        .arg("/sectors")
        .assert()
        .success()
        .stderr(predicate::str::contains("Initializing node"));

    assert!(repo.join("version").is_file());
    assert!(repo.join("libp2p").join("keypair").is_file());
    let config = read_config(&repo.join("config.toml")).unwrap();
    assert_eq!(config.network_params.network_name, "interop");
    assert_eq!(config.sector_base.root_dir_path.to_str(), Some("/sectors"));
}

#[test]
fn repodir_from_env() {
    let (repo, _tmp) = tmp_repo();
    init()
        .env_remove("RUST_LOG")
        .env("FOREST_INIT_REPO", &repo)
        .assert()
        .success();
    assert!(repo.join("config.toml").is_file());
}

#[test]
fn unknown_network_fails() {
    let (repo, _tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--network")
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown network nonexistent"));
}

#[test]
fn presealed_dir_without_miner_fails() {
    let (repo, _tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--presealed-sector-dir")
        .arg("/presealed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--with-miner"));
}

#[test]
fn presealed_dir_with_miner() {
    let (repo, _tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--presealed-sector-dir")
        .arg("/presealed")
        .arg("--with-miner")
        .arg("t01000")
        .arg("--miner-actor-address")
        .arg("t01001")
        .assert()
        .success();
    let config = read_config(&repo.join("config.toml")).unwrap();
    assert_eq!(config.mining.miner_address, Some(Address::new_id(1001)));
}

#[test]
fn existing_repo_is_refused() {
    let (repo, _tmp) = tmp_repo();
    init().repo(&repo).assert().success();
    init()
        .repo(&repo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not empty"));
}

#[test]
fn missing_genesis_file_fails() {
    let (repo, tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--genesis-file")
        .arg(tmp.path().join("missing.car"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("genesis source unavailable"));
}

#[test]
fn malformed_genesis_file_fails() {
    let (repo, tmp) = tmp_repo();
    let car = tmp.path().join("genesis.car");
    std::fs::write(&car, b"not a car archive").unwrap();
    init()
        .repo(&repo)
        .arg("--genesis-file")
        .arg(&car)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed archive"));
}

#[test]
fn config_file_seeds_repo_and_logging() {
    let (repo, tmp) = tmp_repo();
    let config_path = tmp.path().join("base.toml");
    std::fs::write(
        &config_path,
        r#"
[sector_base]
root_dir_path = "/from-config"

[[log.filters]]
module = "forest_init"
level = "WARN"
"#,
    )
    .unwrap();

    init()
        .repo(&repo)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("Initializing node").not());

    let config = read_config(&repo.join("config.toml")).unwrap();
    assert_eq!(
        config.sector_base.root_dir_path.to_str(),
        Some("/from-config")
    );
    assert_eq!(config.log.filters.len(), 1);
    assert_eq!(config.log.filters[0].module, "forest_init");
}

#[test]
fn missing_config_file_fails() {
    let (repo, tmp) = tmp_repo();
    init()
        .repo(&repo)
        .arg("--config")
        .arg(tmp.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("couldn't read config file"));
    assert!(!repo.exists());
}
