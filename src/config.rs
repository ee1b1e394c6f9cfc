use crate::models::DEFAULT_CATEGORY;
use crate::store::{DeleteMissing, StorePolicy, UpdateMissing};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "TODO_STORE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

const VALID_UPDATE_MISSING: &[&str] = &["reject", "insert"];
const VALID_DELETE_MISSING: &[&str] = &["ignore", "reject"];
const VALID_OUTPUTS: &[&str] = &["text", "json"];

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

fn validate_category(value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "default-category cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn parse_update_missing(value: &str) -> Result<UpdateMissing, ConfigError> {
    UpdateMissing::from_str(value).ok_or_else(|| {
        ConfigError::InvalidConfig(format!(
            "update-missing must be one of: {}",
            VALID_UPDATE_MISSING.join(", ")
        ))
    })
}

fn parse_delete_missing(value: &str) -> Result<DeleteMissing, ConfigError> {
    DeleteMissing::from_str(value).ok_or_else(|| {
        ConfigError::InvalidConfig(format!(
            "delete-missing must be one of: {}",
            VALID_DELETE_MISSING.join(", ")
        ))
    })
}

fn parse_output(value: &str) -> Result<OutputFormat, ConfigError> {
    OutputFormat::from_str(value).ok_or_else(|| {
        ConfigError::InvalidConfig(format!(
            "output must be one of: {}",
            VALID_OUTPUTS.join(", ")
        ))
    })
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub default_category: Option<String>,
    #[serde(default)]
    pub update_missing: Option<UpdateMissing>,
    #[serde(default)]
    pub delete_missing: Option<DeleteMissing>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

impl Config {
    pub fn with_defaults() -> Self {
        Self {
            default_category: Some(DEFAULT_CATEGORY.to_string()),
            update_missing: Some(UpdateMissing::default()),
            delete_missing: Some(DeleteMissing::default()),
            output: Some(OutputFormat::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref category) = self.default_category {
            validate_category(category)?;
        }
        Ok(())
    }

    pub fn store_policy(&self) -> StorePolicy {
        StorePolicy {
            default_category: self
                .default_category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            update_missing: self.update_missing.unwrap_or_default(),
            delete_missing: self.delete_missing.unwrap_or_default(),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

/// Resolves the config path: explicit argument, then `TODO_STORE_CONFIG`,
/// then `~/.config/todo_store/config.json`.
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return expand_path(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return expand_path(&path);
        }
    }
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::InvalidConfig("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".config").join("todo_store").join("config.json"))
}

fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if path.contains('\0') {
        return Err(ConfigError::InvalidConfig(
            "Path contains invalid characters".to_string(),
        ));
    }
    Ok(PathBuf::from(shellexpand::tilde(path).as_ref()))
}

pub struct ConfigManager {
    path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Loads the config at `path`. A missing or empty file yields the
    /// defaults; nothing is written until `set` or `unset`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Config::default()
            } else {
                let config: Config = serde_json::from_str(&contents)?;
                config.validate()?;
                config
            }
        } else {
            debug!("config file {} not found, using defaults", path.display());
            Config::default()
        };
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.config)?;
        std::fs::write(&self.path, json)?;
        info!("saved config to {}", self.path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let config = &self.config;
        match key {
            "default-category" => config.default_category.clone(),
            "update-missing" => config.update_missing.map(|v| v.to_str().to_string()),
            "delete-missing" => config.delete_missing.map(|v| v.to_str().to_string()),
            "output" => config.output.map(|v| v.to_str().to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        match key {
            "default-category" => {
                validate_category(value)?;
                config.default_category = Some(value.to_string());
            }
            "update-missing" => config.update_missing = Some(parse_update_missing(value)?),
            "delete-missing" => config.delete_missing = Some(parse_delete_missing(value)?),
            "output" => config.output = Some(parse_output(value)?),
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        config.validate()?;
        self.config = config;
        self.save()
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "default-category" => self.config.default_category = None,
            "update-missing" => self.config.update_missing = None,
            "delete-missing" => self.config.delete_missing = None,
            "output" => self.config.output = None,
            _ => return Err(ConfigError::InvalidKey(key.to_string())),
        }
        self.save()
    }

    /// Every key with its effective value and whether that value is the
    /// built-in default.
    pub fn list(&self) -> Vec<(String, String, bool)> {
        let defaults = Config::with_defaults();
        let config = &self.config;
        let rows = [
            (
                "default-category",
                config.default_category.clone(),
                defaults.default_category,
            ),
            (
                "update-missing",
                config.update_missing.map(|v| v.to_str().to_string()),
                defaults.update_missing.map(|v| v.to_str().to_string()),
            ),
            (
                "delete-missing",
                config.delete_missing.map(|v| v.to_str().to_string()),
                defaults.delete_missing.map(|v| v.to_str().to_string()),
            ),
            (
                "output",
                config.output.map(|v| v.to_str().to_string()),
                defaults.output.map(|v| v.to_str().to_string()),
            ),
        ];

        rows.into_iter()
            .map(|(key, value, default)| match value {
                Some(value) => (key.to_string(), value, false),
                None => (
                    key.to_string(),
                    default.unwrap_or_else(|| "null".to_string()),
                    true,
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config_manager() -> (ConfigManager, tempfile::TempDir) {
        let temp_dir = tempfile::Builder::new()
            .prefix("todo_store_test")
            .tempdir()
            .expect("Failed to create temporary directory");
        let manager = ConfigManager::new(temp_dir.path().join("config.json"))
            .expect("Failed to create config manager");
        (manager, temp_dir)
    }

    #[test]
    fn test_config_manager_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert_eq!(manager.get("default-category"), None);
        assert!(!manager.path().exists());

        let policy = manager.config().store_policy();
        assert_eq!(policy, StorePolicy::default());
        assert_eq!(manager.config().output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_config_manager() {
        let (mut manager, _temp_dir) = create_test_config_manager();

        assert!(manager.set("default-category", "inbox").is_ok());
        assert_eq!(manager.get("default-category"), Some("inbox".to_string()));

        assert!(manager.set("update-missing", "insert").is_ok());
        assert_eq!(manager.get("update-missing"), Some("insert".to_string()));

        assert!(manager.set("delete-missing", "reject").is_ok());
        assert!(manager.set("output", "json").is_ok());

        let policy = manager.config().store_policy();
        assert_eq!(policy.default_category, "inbox");
        assert_eq!(policy.update_missing, UpdateMissing::Insert);
        assert_eq!(policy.delete_missing, DeleteMissing::Reject);

        assert!(manager.unset("default-category").is_ok());
        assert_eq!(manager.get("default-category"), None);
    }

    #[test]
    fn test_config_persists_between_managers() {
        let (mut manager, _temp_dir) = create_test_config_manager();
        manager.set("output", "json").unwrap();

        let reloaded = ConfigManager::new(manager.path()).unwrap();
        assert_eq!(reloaded.config().output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let (mut manager, _temp_dir) = create_test_config_manager();
        assert!(matches!(
            manager.set("update-missing", "upsert"),
            Err(ConfigError::InvalidConfig(_))
        ));
        assert!(matches!(
            manager.set("default-category", "  "),
            Err(ConfigError::InvalidConfig(_))
        ));
        assert!(matches!(
            manager.set("storage.type", "json"),
            Err(ConfigError::InvalidKey(_))
        ));
        assert!(matches!(
            manager.unset("storage.type"),
            Err(ConfigError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_config_empty_file_uses_defaults() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path()).unwrap();
        assert_eq!(manager.config(), &Config::default());
    }

    #[test]
    fn test_config_manager_list() {
        let (mut manager, _temp_dir) = create_test_config_manager();
        manager.set("output", "json").unwrap();
        let list = manager.list();
        assert_eq!(list.len(), 4);

        assert!(list.iter().any(|(key, value, is_default)| {
            key == "default-category" && value == DEFAULT_CATEGORY && *is_default
        }));
        assert!(list
            .iter()
            .any(|(key, value, is_default)| key == "output" && value == "json" && !*is_default));
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = resolve_config_path(Some("/tmp/todo_store/config.json")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/todo_store/config.json"));

        let expanded = resolve_config_path(Some("~/todo.json")).unwrap();
        assert_eq!(expanded, PathBuf::from(shellexpand::tilde("~/todo.json").as_ref()));
    }
}
