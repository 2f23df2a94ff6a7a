//! Window Flag Semantics Engine
//!
//! Turns the bit-flag `#define` symbols of a legacy game client's GUI
//! headers into categorized, validated and rule-annotated metadata for a
//! window layout editor.
//!
//! # Features
//!
//! - Header mining with tolerant numeric literal evaluation
//! - Window / control / window type namespaces split by prefix
//! - Canonical and legacy default back-fill that never clobbers scanned values
//! - Rule and flag group documents that survive repeated regeneration
//! - Mask resolution with repair of shifted legacy window masks
//! - Per control type report of bits no known flag explains
//! - Window behavior tags and control capabilities from resolved masks
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use wndflag::{generate_flags, EngineOptions};
//!
//! let options = EngineOptions {
//!     config_dir: "project/config".into(),
//!     ..Default::default()
//! };
//! let stats = generate_flags("client/include", options);
//! println!("{} window flags", stats.window_flags);
//! ```
//!
//! # Generation Pipeline
//!
//! 1. **Scan**: collect `#define NAME VALUE` lines from the header tree
//! 2. **Classify**: route each symbol by prefix into its namespace
//! 3. **Normalize**: evaluate literals to 32-bit values
//! 4. **Defaults**: back-fill canonical and pinned legacy values
//! 5. **Documents**: extend rule documents and flag groups
//! 6. **Persist**: write every document into the config directory

pub mod behavior;
pub mod classifier;
pub mod cli;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod groups;
pub mod layout;
pub mod normalizer;
pub mod resolver;
pub mod rules;
pub mod scanner;
pub mod semantics;
pub mod store;
pub mod types;
pub mod unknown_bits;

use serde::Serialize;
use std::path::{Path, PathBuf};

pub use behavior::{ControlBehavior, ControlCapabilities};
pub use classifier::PrefixClassifier;
pub use cli::EnhancedCli;
pub use defaults::{DefaultsMerger, LegacyFlags, MergeStats};
pub use engine::FlagEngine;
pub use error::{FlagError, Result};
pub use groups::{ControlGroup, FlagGroupBuilder, FlagGroups, WindowGroups};
pub use layout::{load_layout, ControlRecord, WindowRecord};
pub use normalizer::{format_hex, LiteralNormalizer, Normalized};
pub use resolver::{BitmaskResolver, OwnerKind, ResolvedMask, ShiftRepair};
pub use rules::{FlagRule, RuleDocument, RuleRepository, RuleSlot};
pub use scanner::{HeaderScanner, RawDefine, ScanResult};
pub use store::ConfigStore;
pub use types::*;
pub use unknown_bits::{UnknownBitsAggregator, UnknownBitsReport};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Engine options and settings
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Directory holding the persisted JSON documents
    pub config_dir: PathBuf,

    /// Header file extensions to scan, without the dot
    pub header_extensions: Vec<String>,

    /// Legacy default symbols to activate ahead of the canonical defaults
    pub legacy_overrides: Vec<String>,

    /// Window style prefixes appended after the built-in list
    pub extra_window_prefixes: Vec<String>,

    /// Control style prefixes appended after the built-in list
    pub extra_control_prefixes: Vec<String>,

    /// Whether generation and layout processing write their documents
    pub write_outputs: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            header_extensions: scanner::DEFAULT_HEADER_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            legacy_overrides: Vec::new(),
            extra_window_prefixes: Vec::new(),
            extra_control_prefixes: Vec::new(),
            write_outputs: true,
        }
    }
}

/// Generation statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    /// Header files read
    pub files_scanned: usize,

    /// `#define` lines found
    pub defines_found: usize,

    /// Symbols matching no namespace
    pub unclassified: usize,

    /// Defines skipped because their value could not be parsed
    pub unparseable: usize,

    pub scanned_window_flags: usize,
    pub scanned_control_flags: usize,
    pub scanned_window_types: usize,

    /// Table sizes after the defaults merge
    pub window_flags: usize,
    pub control_flags: usize,
    pub window_types: usize,

    pub defaults_added: usize,
    pub legacy_pinned: usize,
    pub legacy_recorded: usize,

    /// Entries in the rule documents
    pub window_rules: usize,
    pub control_rules: usize,

    pub files_written: usize,
    pub generation_time_ms: u64,

    /// Non-fatal problems met along the way
    pub warnings: Vec<String>,
}

/// Layout processing statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutStats {
    pub windows: usize,
    pub controls: usize,
    pub repaired_windows: usize,
    pub invalid_windows: usize,
    pub invalid_controls: usize,
    /// Mutually exclusive flag pairs found set together
    pub conflicts: usize,
    /// Type/mask combinations in the unknown bits report
    pub unknown_entries: usize,
    pub warnings: Vec<String>,
}

/// Result of loading persisted state
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    pub window_flags: usize,
    pub control_flags: usize,
    pub window_types: usize,
    pub window_rules: usize,
    pub control_rules: usize,
    pub warnings: Vec<String>,
}

/// Run a generation pass over `source_dir`
pub fn generate_flags<P: AsRef<Path>>(source_dir: P, options: EngineOptions) -> GenerationStats {
    let mut engine = FlagEngine::new(options);
    engine.generate_flags(source_dir.as_ref())
}

/// Resolve every record of a layout file against the persisted tables
pub fn process_layout_file<P: AsRef<Path>>(
    layout_path: P,
    options: EngineOptions,
) -> Result<(Vec<WindowRecord>, LayoutStats)> {
    let mut windows = load_layout(layout_path.as_ref())?;
    let mut engine = FlagEngine::new(options);
    let load = engine.initialize();
    let mut stats = engine.process_layout(&mut windows);
    let mut warnings = load.warnings;
    warnings.append(&mut stats.warnings);
    stats.warnings = warnings;
    Ok((windows, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_two_header_scan() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("headers");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("window.h"), "#define WBS_CAPTION 0x02000000\n").unwrap();
        fs::write(source.join("control.h"), "#define BS_PUSHBUTTON 0x00000000\n").unwrap();
        let config_dir = temp_dir.path().join("config");

        let stats = generate_flags(
            &source,
            EngineOptions {
                config_dir: config_dir.clone(),
                ..Default::default()
            },
        );
        assert_eq!(stats.scanned_window_flags, 1);
        assert_eq!(stats.scanned_control_flags, 1);

        let window: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(config_dir.join("window_flags.json")).unwrap()).unwrap();
        let control: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(config_dir.join("control_flags.json")).unwrap()).unwrap();
        assert_eq!(window["WBS_CAPTION"], "0X02000000");
        assert_eq!(control["BS_PUSHBUTTON"], "0X00000000");
    }

    #[test]
    fn test_process_layout_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join("window_flags.json"),
            r#"{"WBS_CHILD": "0X00020000"}"#,
        )
        .unwrap();

        let layout = temp_dir.path().join("layout.json");
        fs::write(
            &layout,
            r#"[
                {"name": "A", "type": "WTYPE_BASE", "flags": "0x00020000"},
                {"name": "B", "type": "WTYPE_BASE", "flags": "0x00000164"}
            ]"#,
        )
        .unwrap();

        let options = EngineOptions {
            config_dir,
            write_outputs: false,
            ..Default::default()
        };
        let (windows, stats) = process_layout_file(&layout, options).unwrap();

        assert_eq!(windows[0].resolved_flags, vec!["WBS_CHILD"]);
        assert!(windows[0].valid);
        assert_eq!(windows[1].flags, 0x0164_0000);
        assert!(!windows[1].valid);
        assert_eq!(stats.repaired_windows, 1);
        // control_flags.json and friends are missing
        assert!(!stats.warnings.is_empty());
    }

    #[test]
    fn test_engine_options_default() {
        let options = EngineOptions::default();
        assert_eq!(options.config_dir, PathBuf::from("config"));
        assert_eq!(options.header_extensions, vec!["h", "hpp", "hh"]);
        assert!(options.legacy_overrides.is_empty());
        assert!(options.write_outputs);
    }
}
