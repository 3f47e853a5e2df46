//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use serial_test::serial;
use strata::config::StrataConfig;
use strata::EngineTarget;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("STRATA_ASSETS__DEFAULT_TARGET", "V155");
    let config = StrataConfig::load().unwrap();
    assert_eq!(config.assets.default_target, "V155");
    assert_eq!(config.assets.default_target().unwrap(), EngineTarget::V155);
    std::env::remove_var("STRATA_ASSETS__DEFAULT_TARGET");
}

#[test]
#[serial]
fn test_file_config_loading() {
    // Remove env var to test file-based config
    std::env::remove_var("STRATA_ASSETS__DEFAULT_TARGET");

    let config = StrataConfig::load().unwrap();
    assert_eq!(config.assets.default_target, "V130");
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_missing_directory_falls_back_to_defaults() {
    std::env::remove_var("STRATA_ASSETS__DEFAULT_TARGET");

    let config = StrataConfig::load_from("no_such_config_dir").unwrap();
    assert_eq!(config.assets.skeleton_dir, "assets/skeletons");
}
