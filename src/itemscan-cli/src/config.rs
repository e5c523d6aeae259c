//! Configuration management for itemscan CLI

use anyhow::{Context, Result};
use itemscan::{CatalogEntry, EngineLayout, ItemCatalog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Process to attach to when no --pid/--process is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    /// GUObjectArray offset from the main module base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gobjects_offset: Option<usize>,

    /// FNamePool offset from the main module base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gnames_offset: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Engine structure overrides; missing fields keep their defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<EngineLayout>,

    /// Replaces the built-in catalog when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<CatalogEntry>>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("itemscan");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Save to `path`, or the default location when `None`
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Configured layout, or the stock one
    pub fn layout(&self) -> EngineLayout {
        self.layout.clone().unwrap_or_default()
    }

    /// Configured catalog, or the built-in one
    pub fn catalog(&self) -> Result<ItemCatalog> {
        match &self.catalog {
            Some(entries) => {
                ItemCatalog::new(entries.clone()).context("Invalid [[catalog]] in config")
            }
            None => Ok(ItemCatalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itemscan::BaseClass;

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog().unwrap().len(), 20);
        assert_eq!(config.layout(), EngineLayout::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            process_name: Some("Game-Win64-Shipping.exe".to_string()),
            gobjects_offset: Some(0x113878f0),
            gnames_offset: Some(0x112a1c80),
            timeout_secs: Some(30),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_layout_and_custom_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
process_name = "Game.exe"
gobjects_offset = 4096

[layout]
item_size = 16

[[catalog]]
key = "flare gun"
fragment = "DA_FlareGun"
base = "gun"

[[catalog]]
key = "LAMP"
fragment = "DA_Lamp"
base = "item"
fallbacks = ["Lamp"]
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.gobjects_offset, Some(0x1000));

        let layout = config.layout();
        assert_eq!(layout.item_size, 16);
        assert_eq!(layout.struct_super_offset, 0x40);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Flare Gun").unwrap().base, BaseClass::Gun);
        assert_eq!(catalog.get("lamp").unwrap().fallbacks, vec!["Lamp".to_string()]);
        assert!(catalog.get("knife").is_none());
    }

    #[test]
    fn test_duplicate_catalog_keys_rejected() {
        let config = Config {
            catalog: Some(vec![
                CatalogEntry::new("RICE", "DA_Rice", BaseClass::Item),
                CatalogEntry::new("rice", "DA_Rice2", BaseClass::Item),
            ]),
            ..Default::default()
        };
        assert!(config.catalog().is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "gobjects_offset = \"not a number\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
