use directories::BaseDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::api::ProviderKind;
use crate::errors::ConfigError;

/// The persisted assistant selection. Stored in plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

/// Read/write access to the single persisted `ProviderConfig`.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<Option<ProviderConfig>, ConfigError>;
    fn save(&self, config: &ProviderConfig) -> Result<(), ConfigError>;
}

// TOML is the primary format. A legacy aiConfig.json next to it is read
// when no TOML exists and rewritten as TOML.
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_user_config_dir() -> Result<Self, ConfigError> {
        let base = BaseDirs::new().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(base.config_dir().join("connecteur-social")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn toml_path(&self) -> PathBuf {
        self.dir.join("ai_config.toml")
    }

    fn legacy_json_path(&self) -> PathBuf {
        self.dir.join("aiConfig.json")
    }

    fn load_legacy(&self) -> Result<Option<ProviderConfig>, ConfigError> {
        let path = self.legacy_json_path();
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let config: ProviderConfig =
            serde_json::from_slice(&bytes).map_err(|e| ConfigError::Parse(e.to_string()))?;
        match self.save(&config) {
            Ok(()) => info!("Migrated {} to TOML", path.display()),
            Err(e) => warn!("Could not migrate legacy config: {}", e),
        }
        Ok(Some(config))
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<ProviderConfig>, ConfigError> {
        let path = self.toml_path();
        if !path.exists() {
            return self.load_legacy();
        }
        let text = fs::read_to_string(&path)?;
        let config = toml::from_str::<ProviderConfig>(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(Some(config))
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.dir)?;
        let text = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(self.toml_path(), text)?;
        Ok(())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    slot: Arc<Mutex<Option<ProviderConfig>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<Option<ProviderConfig>, ConfigError> {
        let slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, config: &ProviderConfig) -> Result<(), ConfigError> {
        let mut slot = self.slot.lock().unwrap_or_else(|p| p.into_inner());
        *slot = Some(config.clone());
        Ok(())
    }
}
