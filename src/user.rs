//! The single local user record and the recently-played recorder.
//!
//! The record is created once during onboarding and stored as JSON next to the
//! configuration file. The session controller only ever talks to it through
//! [`RecentRecorder`], and treats every failure as best-effort.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PlayerError, Result};

const USER_FILE: &str = "user.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent: Option<usize>,
}

/// Receives "this catalog entry just started playing" notifications.
pub trait RecentRecorder {
    fn record_played(&mut self, user_id: &str, catalog_index: usize) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store located in the configuration directory.
    pub fn open_default() -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(Config::config_dir()?.join(USER_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<UserRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let record: UserRecord = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    /// Create the record. Only one record ever exists.
    pub fn create(&self, name: &str) -> Result<UserRecord> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlayerError::Onboarding(
                "Please enter your name to get started".to_string(),
            ));
        }
        if let Some(existing) = self.load()? {
            return Err(PlayerError::Onboarding(format!(
                "Already set up for {}",
                existing.name
            )));
        }

        let record = UserRecord {
            name: name.to_string(),
            recent: None,
        };
        self.save(&record)?;
        log::info!("Created user record for {}", record.name);
        Ok(record)
    }

    /// Update the recently played index of the record named `name`.
    pub fn set_recent(&self, name: &str, index: usize) -> Result<()> {
        let mut record = self
            .load()?
            .ok_or_else(|| PlayerError::PersistenceWrite("no user record".to_string()))?;
        if record.name != name {
            return Err(PlayerError::PersistenceWrite(format!(
                "no user named {name}"
            )));
        }

        record.recent = Some(index);
        self.save(&record)
    }

    fn save(&self, record: &UserRecord) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl RecentRecorder for UserStore {
    fn record_played(&mut self, user_id: &str, catalog_index: usize) -> Result<()> {
        self.set_recent(user_id, catalog_index).map_err(|e| match e {
            PlayerError::PersistenceWrite(_) => e,
            other => PlayerError::PersistenceWrite(other.to_string()),
        })
    }
}
