use tempfile::TempDir;

#[test]
fn test_config_lifecycle() {
    // Create a temporary directory for test config
    let temp_dir = TempDir::new().unwrap();

    // Override the config path for testing
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    // Test that config doesn't exist initially
    assert!(!soundnest::config::Config::exists().unwrap());

    // Create and save a config
    let config = soundnest::config::Config::new();
    config.save().unwrap();
    assert!(soundnest::config::Config::exists().unwrap());

    let loaded = soundnest::config::Config::load().unwrap();
    assert_eq!(loaded.default_volume, 0.5);
    assert_eq!(loaded.log_level, "info");

    // Test config mutation
    let mut config = soundnest::config::Config::load().unwrap();
    config.set_value("default_volume", "0.3").unwrap();
    config.set_value("sounds_dir", "/opt/sounds").unwrap();
    config.save().unwrap();

    let reloaded = soundnest::config::Config::load().unwrap();
    assert_eq!(reloaded.default_volume, 0.3);
    assert_eq!(reloaded.sounds_dir, "/opt/sounds");

    // The user record lives in the same directory
    let store = soundnest::user::UserStore::open_default().unwrap();
    assert!(store.path().starts_with(temp_dir.path().join("soundnest")));

    // Test invalid key
    let mut config = soundnest::config::Config::load().unwrap();
    assert!(config.set_value("invalid_key", "value").is_err());
}
