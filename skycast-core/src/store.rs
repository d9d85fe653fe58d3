//! Persistence of the last searched city.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::Config;

pub trait PreferenceStore: Send + Sync + Debug {
    fn last_city(&self) -> Result<Option<String>>;

    fn set_last_city(&self, city: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    last_searched_city: Option<String>,
}

/// TOML-backed store in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_default_location() -> Result<Self> {
        Ok(Self::new(Config::state_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StateFile> {
        if !self.path.exists() {
            return Ok(StateFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn last_city(&self) -> Result<Option<String>> {
        Ok(self
            .read()?
            .last_searched_city
            .filter(|c| !c.trim().is_empty()))
    }

    fn set_last_city(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let state = StateFile {
            last_searched_city: Some(city.to_string()),
        };
        let toml = toml::to_string_pretty(&state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    city: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn with_city(city: &str) -> Self {
        Self {
            city: Mutex::new(Some(city.to_string())),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn last_city(&self) -> Result<Option<String>> {
        let city = self
            .city
            .lock()
            .map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        Ok(city.clone())
    }

    fn set_last_city(&self, city: &str) -> Result<()> {
        let mut slot = self
            .city
            .lock()
            .map_err(|_| anyhow::anyhow!("preference lock poisoned"))?;
        *slot = Some(city.to_string());
        Ok(())
    }
}
