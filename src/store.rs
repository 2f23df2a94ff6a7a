//! Persisted documents in a project config directory

use crate::error::{FlagError, Result};
use crate::groups::FlagGroups;
use crate::rules::RuleDocument;
use crate::types::FlagTable;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const WINDOW_FLAGS_FILE: &str = "window_flags.json";
pub const CONTROL_FLAGS_FILE: &str = "control_flags.json";
pub const WINDOW_TYPES_FILE: &str = "window_types.json";
pub const LEGACY_FLAGS_FILE: &str = "legacy_flags.json";
pub const WINDOW_RULES_FILE: &str = "window_flag_rules.json";
pub const CONTROL_RULES_FILE: &str = "control_flag_rules.json";
pub const FLAG_GROUPS_FILE: &str = "flag_groups.json";
pub const UNKNOWN_BITS_FILE: &str = "undefined_control_flags.json";

/// Files whose content the engine caches after `initialize`.
pub const TRACKED_FILES: &[&str] = &[
    WINDOW_FLAGS_FILE,
    CONTROL_FLAGS_FILE,
    WINDOW_TYPES_FILE,
    WINDOW_RULES_FILE,
    CONTROL_RULES_FILE,
    FLAG_GROUPS_FILE,
];

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn exists(&self, file: &str) -> bool {
        self.path(file).is_file()
    }

    fn read(&self, file: &str) -> Result<Option<String>> {
        let path = self.path(file);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    /// Load a flag table; a missing file is reported as `FileNotFound`.
    pub fn load_table(&self, file: &str) -> Result<FlagTable> {
        let path = self.path(file);
        let content = self.read(file)?.ok_or_else(|| FlagError::FileNotFound {
            path: path.display().to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| FlagError::invalid_format(path.display().to_string(), e.to_string()))
    }

    /// Load a rule document, `None` when the file does not exist yet.
    pub fn load_rules(&self, file: &str) -> Result<Option<RuleDocument>> {
        let path = self.path(file);
        match self.read(file)? {
            Some(content) => {
                let value: serde_json::Value = serde_json::from_str(&content)
                    .map_err(|e| FlagError::invalid_format(path.display().to_string(), e.to_string()))?;
                RuleDocument::from_value(&value, &path.display().to_string()).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn load_groups(&self) -> Result<Option<FlagGroups>> {
        let path = self.path(FLAG_GROUPS_FILE);
        match self.read(FLAG_GROUPS_FILE)? {
            Some(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| FlagError::invalid_format(path.display().to_string(), e.to_string())),
            None => Ok(None),
        }
    }

    /// Pretty-print `value` to a sibling temp file and rename it into
    /// place. The previous file is untouched if anything fails.
    pub fn save_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.path(file);
        let display = path.display().to_string();

        fs::create_dir_all(&self.dir).map_err(|e| FlagError::write(display.clone(), e.to_string()))?;

        let mut content = serde_json::to_string_pretty(value).map_err(|e| FlagError::write(display.clone(), e.to_string()))?;
        content.push('\n');

        let temp_path = self.dir.join(format!(".{}.tmp", file));
        fs::write(&temp_path, content).map_err(|e| FlagError::write(display.clone(), e.to_string()))?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(FlagError::write(display, e.to_string()));
        }

        log::debug!("Wrote {}", display);
        Ok(())
    }

    /// md5 of a file's bytes, `None` if it cannot be read.
    pub fn fingerprint(&self, file: &str) -> Option<String> {
        fs::read(self.path(file)).ok().map(|bytes| format!("{:x}", md5::compute(bytes)))
    }

    pub fn fingerprints(&self) -> BTreeMap<String, Option<String>> {
        TRACKED_FILES
            .iter()
            .map(|file| (file.to_string(), self.fingerprint(file)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_table_roundtrip_uses_stored_form() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path().join("config"));
        let table = FlagTable::from_pairs(vec![("WBS_CAPTION", 0x0200_0000)]);

        store.save_json(WINDOW_FLAGS_FILE, &table).unwrap();
        let text = fs::read_to_string(store.path(WINDOW_FLAGS_FILE)).unwrap();
        assert!(text.contains("\"WBS_CAPTION\": \"0X02000000\""));
        assert_eq!(store.load_table(WINDOW_FLAGS_FILE).unwrap(), table);
        assert!(!store.path(".window_flags.json.tmp").exists());
    }

    #[test]
    fn test_missing_and_corrupt_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());

        assert!(matches!(
            store.load_table(CONTROL_FLAGS_FILE),
            Err(FlagError::FileNotFound { .. })
        ));
        assert!(store.load_rules(WINDOW_RULES_FILE).unwrap().is_none());
        assert!(store.load_groups().unwrap().is_none());

        fs::write(store.path(FLAG_GROUPS_FILE), "{ not json").unwrap();
        assert!(matches!(store.load_groups(), Err(FlagError::InvalidFormat { .. })));
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        store.save_json(FLAG_GROUPS_FILE, &serde_json::json!({"window": {}})).unwrap();
        let before = fs::read_to_string(store.path(FLAG_GROUPS_FILE)).unwrap();

        // A directory squatting on the temp path makes the write fail
        fs::create_dir(store.path(".flag_groups.json.tmp")).unwrap();
        let result = store.save_json(FLAG_GROUPS_FILE, &serde_json::json!({"window": {"x": 1}}));

        assert!(matches!(result, Err(FlagError::Write { .. })));
        assert_eq!(fs::read_to_string(store.path(FLAG_GROUPS_FILE)).unwrap(), before);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConfigStore::new(temp_dir.path());
        assert_eq!(store.fingerprint(WINDOW_TYPES_FILE), None);

        fs::write(store.path(WINDOW_TYPES_FILE), "{}").unwrap();
        let first = store.fingerprint(WINDOW_TYPES_FILE).unwrap();
        assert_eq!(first.len(), 32);

        fs::write(store.path(WINDOW_TYPES_FILE), "{\"WTYPE_BASE\": \"0X00000001\"}").unwrap();
        assert_ne!(store.fingerprint(WINDOW_TYPES_FILE).unwrap(), first);
        assert_eq!(store.fingerprints().len(), TRACKED_FILES.len());
    }
}
