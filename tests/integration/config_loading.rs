//! Layered configuration loading from TOML files

use pathstore::config::ConfigLoader;
use pathstore::Store;
use std::fs;
use tempfile::TempDir;

#[test]
fn load_from_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pathstore.toml");
    fs::write(
        &path,
        "[store]\nbucket_count = 101\nmax_nodes = 5\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(config.store.bucket_count, 101);
    assert_eq!(config.store.max_nodes, Some(5));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");

    let store = Store::with_config(&config.store);
    assert_eq!(store.value_index().bucket_count(), 101);
}

#[test]
fn non_prime_bucket_count_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pathstore.toml");
    fs::write(&path, "[store]\nbucket_count = 100\n").unwrap();
    assert!(ConfigLoader::load_from_file(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");
    assert!(ConfigLoader::load_from_file(&path).is_err());
}
