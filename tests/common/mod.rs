use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

use promptcast::config::{CacheBackend, CacheConfig};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn temp_cache_config(backend: CacheBackend) -> (TempDir, CacheConfig) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config = CacheConfig {
        dir: temp_dir.path().join("sessions"),
        backend,
    };
    (temp_dir, config)
}

/// The binary, isolated from the caller's environment and cache
#[allow(dead_code)]
pub fn promptcast(cache_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("promptcast").expect("binary should build");
    for var in [
        "PROMPTCAST_HOST",
        "PROMPTCAST_PORT",
        "PROMPTCAST_PROVIDER",
        "PROMPTCAST_MODEL",
        "PROMPTCAST_CACHE_BACKEND",
        "PROMPTCAST_SESSION_STRATEGY",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("PROMPTCAST_CONFIG", cache_dir.path().join("missing.yaml"))
        .env("PROMPTCAST_CACHE_DIR", cache_dir.path().join("sessions"))
        .env("NO_COLOR", "1");
    cmd
}
