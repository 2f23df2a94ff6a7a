//! Window and control records handed over by the layout parser

use crate::error::{FlagError, Result};
use crate::normalizer::{format_hex, parse_stored_hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRecord {
    #[serde(rename = "type")]
    pub control_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub raw_header: String,
    #[serde(default, serialize_with = "serialize_mask", deserialize_with = "deserialize_mask")]
    pub flags: u32,
    #[serde(default, skip_deserializing)]
    pub resolved_flags: Vec<String>,
    #[serde(default = "default_valid", skip_deserializing)]
    pub valid: bool,
    #[serde(default, skip_deserializing, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub window_type: String,
    #[serde(default, serialize_with = "serialize_mask", deserialize_with = "deserialize_mask")]
    pub flags: u32,
    #[serde(default)]
    pub controls: Vec<ControlRecord>,
    #[serde(default, skip_deserializing)]
    pub resolved_flags: Vec<String>,
    #[serde(default = "default_valid", skip_deserializing)]
    pub valid: bool,
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub behavior: Vec<String>,
    /// Mask before a shift repair, when one was applied.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub repaired_from: Option<String>,
}

impl ControlRecord {
    pub fn new(control_type: impl Into<String>, flags: u32) -> Self {
        Self {
            control_type: control_type.into(),
            id: String::new(),
            raw_header: String::new(),
            flags,
            resolved_flags: Vec::new(),
            valid: true,
            category: String::new(),
            capabilities: Vec::new(),
        }
    }

    /// Identifying label: id, else trimmed header text, else
    /// `[window/type]`.
    pub fn label(&self, window_name: &str) -> String {
        if !self.id.is_empty() {
            return self.id.clone();
        }
        let header = self.raw_header.trim();
        if !header.is_empty() {
            return header.to_string();
        }
        format!("[{}/{}]", window_name, self.control_type)
    }
}

impl WindowRecord {
    pub fn new(name: impl Into<String>, window_type: impl Into<String>, flags: u32) -> Self {
        Self {
            name: name.into(),
            window_type: window_type.into(),
            flags,
            controls: Vec::new(),
            resolved_flags: Vec::new(),
            valid: true,
            behavior: Vec::new(),
            repaired_from: None,
        }
    }
}

fn default_valid() -> bool {
    true
}

fn serialize_mask<S: Serializer>(mask: &u32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_hex(*mask))
}

fn deserialize_mask<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(text) => {
            let text = text.trim();
            if text.starts_with("0x") || text.starts_with("0X") {
                parse_stored_hex(text)
            } else {
                text.parse::<u32>().ok()
            }
        }
        _ => None,
    };
    parsed.ok_or_else(|| serde::de::Error::custom(format!("invalid flag mask: {}", value)))
}

/// Read a layout file: a JSON array of window records.
pub fn load_layout(path: &Path) -> Result<Vec<WindowRecord>> {
    if !path.exists() {
        return Err(FlagError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| FlagError::invalid_format(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_layout_records() {
        let json = r#"[
            {"name": "Inventory", "type": "WTYPE_BASE", "flags": "0x02020000", "controls": [
                {"type": "WTYPE_BUTTON", "id": "WIDC_OK", "flags": 3},
                {"type": "WTYPE_EDIT", "raw_header": "  WIDC_NAME  ", "flags": "0X00000020"}
            ]}
        ]"#;
        let windows: Vec<WindowRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(windows[0].flags, 0x0202_0000);
        assert!(windows[0].valid);
        assert_eq!(windows[0].controls[0].flags, 3);
        assert_eq!(windows[0].controls[1].flags, 0x20);
        assert_eq!(windows[0].controls[0].label("Inventory"), "WIDC_OK");
        assert_eq!(windows[0].controls[1].label("Inventory"), "WIDC_NAME");
        assert_eq!(ControlRecord::new("WTYPE_STATIC", 1).label("Inventory"), "[Inventory/WTYPE_STATIC]");
    }

    #[test]
    fn test_invalid_mask_is_rejected() {
        let json = r#"[{"name": "W", "flags": "banana"}]"#;
        assert!(serde_json::from_str::<Vec<WindowRecord>>(json).is_err());
    }

    #[test]
    fn test_load_layout_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layout.json");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"[{{"name": "Main", "type": "WTYPE_BASE", "flags": 131072}}]"#).unwrap();

        let windows = load_layout(&path).unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].flags, 0x0002_0000);

        let output = serde_json::to_value(&windows[0]).unwrap();
        assert_eq!(output["flags"], "0x00020000");
        assert!(output.get("repaired_from").is_none());

        assert!(matches!(
            load_layout(&temp_dir.path().join("missing.json")),
            Err(FlagError::FileNotFound { .. })
        ));
    }
}
