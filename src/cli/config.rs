// FILE: src/cli/config.rs

use crate::error::{FlagError, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub config_dir: Option<String>,
    pub source_dir: Option<String>,
    pub legacy_overrides: Option<Vec<String>>,
    pub header_extensions: Option<Vec<String>>,
    pub extra_window_prefixes: Option<Vec<String>>,
    pub extra_control_prefixes: Option<Vec<String>>,
    pub write_outputs: Option<bool>,
}

pub fn load(config_path: &str) -> Result<ConfigFile> {
    let config_content = fs::read_to_string(config_path).map_err(|e| FlagError::FileNotFound {
        path: format!("Config file {}: {}", config_path, e),
    })?;

    let config = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| FlagError::config(format!("Invalid JSON config: {}", e)))
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| FlagError::config(format!("Invalid TOML config: {}", e)))
    } else {
        Err(FlagError::config("Config file must be .json or .toml format"))
    }?;

    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wndflag.toml");
        fs::write(
            &path,
            r#"
config_dir = "resource/config"
source_dir = "client/include"
legacy_overrides = ["WBS_HELP", "BS_VCENTER"]
extra_window_prefixes = ["WXS_"]
"#,
        )
        .unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.config_dir.as_deref(), Some("resource/config"));
        assert_eq!(config.legacy_overrides.unwrap(), vec!["WBS_HELP", "BS_VCENTER"]);
        assert_eq!(config.extra_window_prefixes.unwrap(), vec!["WXS_"]);
        assert!(config.write_outputs.is_none());
    }

    #[test]
    fn test_load_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wndflag.json");
        fs::write(&path, r#"{"header_extensions": ["h", "inl"], "write_outputs": false}"#).unwrap();

        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.header_extensions.unwrap(), vec!["h", "inl"]);
        assert_eq!(config.write_outputs, Some(false));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("wndflag.ini");
        fs::write(&path, "config_dir=x").unwrap();

        assert!(matches!(load(path.to_str().unwrap()), Err(FlagError::Config { .. })));
        assert!(matches!(
            load(temp_dir.path().join("missing.toml").to_str().unwrap()),
            Err(FlagError::FileNotFound { .. })
        ));
    }
}
