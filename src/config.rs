//! Application configuration management.
//!
//! Configuration lives in the user's config directory (typically
//! ~/.config/soundnest/config.toml) and holds where the sound files are, the
//! volume a new session starts at, and where the player writes its log. The
//! user record sits next to it in the same directory.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use crate::constants::{APP_DIR, DEFAULT_VOLUME, LOG_FILE_NAME};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Keys accepted by `set_value` and in config.toml.
pub const KEYS: [&str; 4] = ["sounds_dir", "default_volume", "log_level", "log_file"];

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: String,
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_sounds_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join("sounds"))
        .unwrap_or_else(|| PathBuf::from("sounds"))
        .to_string_lossy()
        .to_string()
}

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    std::env::temp_dir()
        .join(LOG_FILE_NAME)
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            sounds_dir: default_sounds_dir(),
            default_volume: default_volume(),
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join(APP_DIR)
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join(APP_DIR)
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&contents)?;
        // Hand-edited files may carry anything
        config.default_volume = clamp_volume(config.default_volume);
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    /// Sound directory with `~` and environment variables expanded.
    pub fn sounds_path(&self) -> PathBuf {
        match shellexpand::full(&self.sounds_dir) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => PathBuf::from(shellexpand::tilde(&self.sounds_dir).as_ref()),
        }
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).as_ref())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level
            .parse::<log::LevelFilter>()
            .unwrap_or(log::LevelFilter::Info)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "sounds_dir" => self.sounds_dir = value.to_string(),
            "default_volume" => {
                let volume = value
                    .parse::<f32>()
                    .map_err(|_| "Value must be a number between 0 and 1")?;
                if volume.is_nan() {
                    return Err("Value must be a number between 0 and 1".into());
                }
                self.default_volume = clamp_volume(volume);
            }
            "log_level" => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(format!("Value must be one of: {}", LOG_LEVELS.join(", ")).into());
                }
                self.log_level = level;
            }
            "log_file" => self.log_file = value.to_string(),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Use a mutex to ensure tests that modify environment variables don't run concurrently
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_config_home<F: FnOnce(&TempDir)>(f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let temp_dir = TempDir::new().unwrap();
        let original_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        f(&temp_dir);

        unsafe {
            if let Some(original) = original_xdg {
                std::env::set_var("XDG_CONFIG_HOME", original);
            } else {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.default_volume, 0.5);
        assert_eq!(config.log_level, "info");
        assert!(config.log_file.ends_with(LOG_FILE_NAME));
        assert!(config.sounds_dir.contains(APP_DIR) || config.sounds_dir == "sounds");
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::new();

        config.set_value("sounds_dir", "~/ambient").unwrap();
        assert_eq!(config.sounds_dir, "~/ambient");

        config.set_value("default_volume", "0.8").unwrap();
        assert_eq!(config.default_volume, 0.8);

        config.set_value("default_volume", "3").unwrap();
        assert_eq!(config.default_volume, 1.0);

        assert!(config.set_value("default_volume", "loud").is_err());
        assert!(config.set_value("default_volume", "NaN").is_err());
        assert_eq!(config.default_volume, 1.0);

        config.set_value("log_level", "DEBUG").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
        assert!(config.set_value("log_level", "chatty").is_err());

        assert!(config.set_value("unknown_key", "value").is_err());
    }

    #[test]
    fn test_level_filter_fallback() {
        let mut config = Config::new();
        config.log_level = "nonsense".to_string();
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_sounds_path_expands_tilde() {
        let mut config = Config::new();
        config.sounds_dir = "~/ambient".to_string();
        let path = config.sounds_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("ambient"));
    }

    #[test]
    fn test_config_save_and_load() {
        with_config_home(|temp_dir| {
            let mut config = Config::new();
            config.sounds_dir = "/srv/sounds".to_string();
            config.save().unwrap();

            let config_path = Config::config_path().unwrap();
            assert!(config_path.exists());
            assert!(config_path.starts_with(temp_dir.path().join(APP_DIR)));

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.sounds_dir, "/srv/sounds");
            assert_eq!(loaded.default_volume, 0.5);
        });
    }

    #[test]
    fn test_config_exists() {
        with_config_home(|temp_dir| {
            let expected_path = temp_dir.path().join(APP_DIR).join("config.toml");
            assert!(!expected_path.exists());
            assert!(!Config::exists().unwrap());

            Config::new().save().unwrap();

            assert!(expected_path.exists());
            assert!(Config::exists().unwrap());
        });
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        with_config_home(|temp_dir| {
            let dir = temp_dir.path().join(APP_DIR);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("config.toml"), "sound_dir = \"/srv\"\n").unwrap();

            let err = Config::load().unwrap_err();
            assert!(err.to_string().contains("sound_dir"));
        });
    }

    #[test]
    fn test_every_key_is_settable() {
        let mut config = Config::new();
        for key in KEYS {
            let value = if key == "default_volume" { "0.4" } else { "debug" };
            config.set_value(key, value).unwrap();
        }
    }

    #[test]
    fn test_load_fills_missing_keys_and_clamps() {
        with_config_home(|temp_dir| {
            let dir = temp_dir.path().join(APP_DIR);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("config.toml"), "default_volume = 4.0\n").unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.default_volume, 1.0);
            assert_eq!(loaded.log_level, "info");
        });
    }
}
