//! Configuration loading as the binary performs it

use obsmon::config::CONFIG_ENV_VAR;
use obsmon::{Monitor, MonitorConfig, MonitorError};
use serial_test::serial;
use std::env;
use std::fs;

use super::helpers::PipelineTree;

#[test]
#[serial]
fn test_env_var_config_drives_monitor() {
    let tree = PipelineTree::new();
    let path = tree.temp.path().join("obsmon.toml");
    fs::write(
        &path,
        format!(
            "data_root = {:?}\nstages = [\"configuration\", \"preprocess\"]\nmemory_cache = false\n",
            tree.config.data_root.to_string_lossy()
        ),
    )
    .unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let loaded = MonitorConfig::load(None);
    env::remove_var(CONFIG_ENV_VAR);

    let config = loaded.unwrap();
    assert_eq!(config.data_root, tree.config.data_root);
    assert_eq!(config.stages.len(), 2);
    assert!(!config.memory_cache);
    assert!(Monitor::new(config).is_ok());
}

#[test]
fn test_invalid_config_rejected_by_monitor() {
    let mut config = MonitorConfig::default();
    config.max_walk_depth = 0;
    assert!(matches!(Monitor::new(config), Err(MonitorError::Config(_))));
}
