//! The flag engine: generation pass, cached state and layout processing
//!
//! State is loaded explicitly with `initialize` (or `reload`) and the
//! fingerprints of the files it came from are kept, so a caller can ask
//! `is_stale` instead of having the engine reload behind its back.

use crate::behavior::{self, ControlBehavior};
use crate::classifier::PrefixClassifier;
use crate::defaults::DefaultsMerger;
use crate::error::FlagError;
use crate::groups::{FlagGroupBuilder, FlagGroups};
use crate::layout::WindowRecord;
use crate::normalizer::{format_hex, LiteralNormalizer};
use crate::resolver::{BitmaskResolver, OwnerKind, ResolvedMask};
use crate::rules::{RuleDocument, RuleRepository};
use crate::scanner::HeaderScanner;
use crate::store::{self, ConfigStore};
use crate::types::{FlagDefinition, FlagTable, Namespace};
use crate::unknown_bits::{UnknownBitsAggregator, UnknownBitsReport};
use crate::{EngineOptions, GenerationStats, LayoutStats, LoadStats};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

pub struct FlagEngine {
    options: EngineOptions,
    store: ConfigStore,
    classifier: PrefixClassifier,
    normalizer: LiteralNormalizer,
    resolver: BitmaskResolver,
    window_flags: FlagTable,
    control_flags: FlagTable,
    window_types: FlagTable,
    window_rules: RuleDocument,
    control_rules: RuleDocument,
    groups: FlagGroups,
    unknown_bits: UnknownBitsReport,
    fingerprints: BTreeMap<String, Option<String>>,
    initialized: bool,
}

impl FlagEngine {
    pub fn new(options: EngineOptions) -> Self {
        let mut classifier = PrefixClassifier::new();
        classifier.extend(&options.extra_window_prefixes, &options.extra_control_prefixes);

        Self {
            store: ConfigStore::new(options.config_dir.clone()),
            options,
            classifier,
            normalizer: LiteralNormalizer::new(),
            resolver: BitmaskResolver::new(),
            window_flags: FlagTable::new(),
            control_flags: FlagTable::new(),
            window_types: FlagTable::new(),
            window_rules: RuleDocument::new(),
            control_rules: RuleDocument::new(),
            groups: FlagGroups::default(),
            unknown_bits: UnknownBitsReport::new(),
            fingerprints: BTreeMap::new(),
            initialized: false,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Load tables, rules and groups from the config directory. Missing or
    /// broken files leave the matching state empty and add a warning.
    pub fn initialize(&mut self) -> LoadStats {
        let mut warnings = Vec::new();

        self.window_flags = load_table_or_warn(&self.store, store::WINDOW_FLAGS_FILE, &mut warnings);
        self.control_flags = load_table_or_warn(&self.store, store::CONTROL_FLAGS_FILE, &mut warnings);
        self.window_types = load_table_or_warn(&self.store, store::WINDOW_TYPES_FILE, &mut warnings);

        self.window_rules = load_rules_or_warn(&self.store, store::WINDOW_RULES_FILE, &mut warnings).unwrap_or_default();
        self.control_rules =
            load_rules_or_warn(&self.store, store::CONTROL_RULES_FILE, &mut warnings).unwrap_or_default();
        self.groups = load_groups_or_warn(&self.store, &mut warnings).unwrap_or_default();

        self.fingerprints = self.store.fingerprints();
        self.initialized = true;

        log::info!(
            "Flag engine initialized from {}: {} window flags, {} control flags, {} window types",
            self.store.dir().display(),
            self.window_flags.len(),
            self.control_flags.len(),
            self.window_types.len()
        );

        LoadStats {
            window_flags: self.window_flags.len(),
            control_flags: self.control_flags.len(),
            window_types: self.window_types.len(),
            window_rules: self.window_rules.len(),
            control_rules: self.control_rules.len(),
            warnings,
        }
    }

    pub fn reload(&mut self) -> LoadStats {
        log::info!("Reloading flag engine state");
        self.initialize()
    }

    /// True when any tracked file changed on disk since the last load.
    pub fn is_stale(&self) -> bool {
        if !self.initialized {
            return true;
        }
        self.store.fingerprints() != self.fingerprints
    }

    pub fn window_flags(&self) -> &FlagTable {
        &self.window_flags
    }

    pub fn control_flags(&self) -> &FlagTable {
        &self.control_flags
    }

    pub fn window_types(&self) -> &FlagTable {
        &self.window_types
    }

    pub fn window_rules(&self) -> &RuleDocument {
        &self.window_rules
    }

    pub fn control_rules(&self) -> &RuleDocument {
        &self.control_rules
    }

    pub fn groups(&self) -> &FlagGroups {
        &self.groups
    }

    pub fn unknown_bits(&self) -> &UnknownBitsReport {
        &self.unknown_bits
    }

    /// Every definition of one namespace, in table order.
    pub fn definitions(&self, namespace: Namespace) -> Vec<FlagDefinition> {
        match namespace {
            Namespace::WindowFlag => self.window_flags.definitions(namespace),
            Namespace::ControlFlag => self.control_flags.definitions(namespace),
            Namespace::WindowType => self.window_types.definitions(namespace),
            Namespace::Unknown => Vec::new(),
        }
    }

    /// Full generation pass over a header tree.
    pub fn generate_flags(&mut self, source_dir: &Path) -> GenerationStats {
        let start_time = Instant::now();
        let mut stats = GenerationStats::default();

        // Phase 1: scan
        let scan = HeaderScanner::with_extensions(self.options.header_extensions.clone()).scan_directory(source_dir);
        stats.files_scanned = scan.files_scanned;
        stats.defines_found = scan.defines.len();
        stats.warnings.extend(scan.warnings);

        // Phase 2: classify and normalize
        let mut window_flags = FlagTable::new();
        let mut control_flags = FlagTable::new();
        let mut window_types = FlagTable::new();

        for define in &scan.defines {
            let table = match self.classifier.classify(&define.name) {
                Namespace::WindowFlag => &mut window_flags,
                Namespace::ControlFlag => &mut control_flags,
                Namespace::WindowType => &mut window_types,
                Namespace::Unknown => {
                    stats.unclassified += 1;
                    continue;
                }
            };

            let normalized = self.normalizer.normalize(&define.raw_value);
            if let Some(warning) = normalized.warning {
                stats.unparseable += 1;
                stats
                    .warnings
                    .push(format!("{}:{}: {} skipped: {}", define.file.display(), define.line, define.name, warning));
                continue;
            }

            if let Some(previous) = table.insert(define.name.clone(), normalized.value) {
                if previous != normalized.value {
                    log::debug!(
                        "{} redefined at {}:{} ({} -> {})",
                        define.name,
                        define.file.display(),
                        define.line,
                        format_hex(previous),
                        format_hex(normalized.value)
                    );
                }
            }
        }

        stats.scanned_window_flags = window_flags.len();
        stats.scanned_control_flags = control_flags.len();
        stats.scanned_window_types = window_types.len();

        // Phase 3: defaults
        let merger = DefaultsMerger::new(self.options.legacy_overrides.clone());
        let (legacy, merge_stats) = merger.merge_all(&mut window_flags, &mut control_flags, &mut window_types);
        stats.defaults_added = merge_stats.defaults_added;
        stats.legacy_pinned = merge_stats.legacy_pinned;
        stats.legacy_recorded = merge_stats.legacy_recorded;

        // Phase 4: rules and groups, built on top of what is on disk
        let mut existing_warnings = Vec::new();
        let existing_window_rules = load_rules_or_warn(&self.store, store::WINDOW_RULES_FILE, &mut existing_warnings);
        let existing_control_rules = load_rules_or_warn(&self.store, store::CONTROL_RULES_FILE, &mut existing_warnings);
        let existing_groups = load_groups_or_warn(&self.store, &mut existing_warnings);
        let window_rules_broken = self.store.exists(store::WINDOW_RULES_FILE) && existing_window_rules.is_none();
        let control_rules_broken = self.store.exists(store::CONTROL_RULES_FILE) && existing_control_rules.is_none();
        let groups_broken = self.store.exists(store::FLAG_GROUPS_FILE) && existing_groups.is_none();
        stats.warnings.extend(existing_warnings);

        let window_rules = RuleRepository::new(Namespace::WindowFlag).ensure(existing_window_rules, &window_flags);
        let control_rules = RuleRepository::new(Namespace::ControlFlag).ensure(existing_control_rules, &control_flags);
        let groups = FlagGroupBuilder::new().regenerate(existing_groups, &window_flags, &control_flags);

        stats.window_flags = window_flags.len();
        stats.control_flags = control_flags.len();
        stats.window_types = window_types.len();
        stats.window_rules = window_rules.len();
        stats.control_rules = control_rules.len();

        // Phase 5: persist
        if self.options.write_outputs {
            let mut results = vec![
                (store::WINDOW_FLAGS_FILE, self.store.save_json(store::WINDOW_FLAGS_FILE, &window_flags)),
                (store::CONTROL_FLAGS_FILE, self.store.save_json(store::CONTROL_FLAGS_FILE, &control_flags)),
                (store::WINDOW_TYPES_FILE, self.store.save_json(store::WINDOW_TYPES_FILE, &window_types)),
                (store::LEGACY_FLAGS_FILE, self.store.save_json(store::LEGACY_FLAGS_FILE, &legacy)),
            ];
            // A document that failed to parse is left for the user to fix
            if !window_rules_broken {
                results.push((
                    store::WINDOW_RULES_FILE,
                    self.store.save_json(store::WINDOW_RULES_FILE, &window_rules.to_value()),
                ));
            }
            if !control_rules_broken {
                results.push((
                    store::CONTROL_RULES_FILE,
                    self.store.save_json(store::CONTROL_RULES_FILE, &control_rules.to_value()),
                ));
            }
            if !groups_broken {
                results.push((store::FLAG_GROUPS_FILE, self.store.save_json(store::FLAG_GROUPS_FILE, &groups)));
            }

            for (file, result) in results {
                match result {
                    Ok(()) => stats.files_written += 1,
                    Err(e) => {
                        log::warn!("{}", e);
                        stats.warnings.push(format!("{}: {}", file, e));
                    }
                }
            }
        }

        self.window_flags = window_flags;
        self.control_flags = control_flags;
        self.window_types = window_types;
        self.window_rules = window_rules;
        self.control_rules = control_rules;
        self.groups = groups;
        self.fingerprints = self.store.fingerprints();
        self.initialized = true;

        stats.generation_time_ms = start_time.elapsed().as_millis() as u64;

        log::info!(
            "Flag generation finished: {} window flags, {} control flags, {} window types ({} warnings)",
            stats.window_flags,
            stats.control_flags,
            stats.window_types,
            stats.warnings.len()
        );
        stats
    }

    /// Resolve one mask against the cached tables. An engine that was
    /// never initialized resolves against empty tables.
    pub fn resolve(&self, kind: OwnerKind, mask: &mut u32) -> ResolvedMask {
        if !self.initialized {
            log::warn!("Resolving a {} mask before the flag engine was initialized", kind);
        }
        let known = match kind {
            OwnerKind::Window => &self.window_flags,
            OwnerKind::Control => &self.control_flags,
        };
        self.resolver.resolve(kind, mask, known)
    }

    /// Resolve every window and control in place, then rebuild the unknown
    /// control bits report.
    pub fn process_layout(&mut self, windows: &mut [WindowRecord]) -> LayoutStats {
        let mut stats = LayoutStats::default();
        if !self.initialized {
            let warning = format!(
                "Flag engine not initialized; call initialize() before processing layouts ({} not read)",
                self.store.dir().display()
            );
            log::warn!("{}", warning);
            stats.warnings.push(warning);
        }

        for window in windows.iter_mut() {
            stats.windows += 1;
            let resolved = self.resolver.resolve(OwnerKind::Window, &mut window.flags, &self.window_flags);
            if let Some(repair) = &resolved.repair {
                stats.repaired_windows += 1;
                window.repaired_from = Some(format_hex(repair.original));
            }
            if !resolved.validity {
                stats.invalid_windows += 1;
            }
            stats.conflicts += report_conflicts(&self.window_rules, &window.name, &resolved.matched_flag_names);
            window.behavior = behavior::window_tags(&window.name, &resolved, &self.window_flags)
                .into_iter()
                .map(String::from)
                .collect();
            window.valid = resolved.validity;
            window.resolved_flags = resolved.matched_flag_names;

            for control in window.controls.iter_mut() {
                stats.controls += 1;
                let resolved = self
                    .resolver
                    .resolve(OwnerKind::Control, &mut control.flags, &self.control_flags);
                if !resolved.validity {
                    stats.invalid_controls += 1;
                }
                stats.conflicts += report_conflicts(
                    &self.control_rules,
                    &control.label(&window.name),
                    &resolved.matched_flag_names,
                );
                let derived = behavior::control_behavior(&control.control_type, &resolved);
                control.category = derived.category;
                control.capabilities = derived.capabilities.names().into_iter().map(String::from).collect();
                control.valid = resolved.validity;
                control.resolved_flags = resolved.matched_flag_names;
            }
        }

        self.unknown_bits = UnknownBitsAggregator::new().aggregate(windows, &self.control_flags);
        stats.unknown_entries = self.unknown_bits.len();

        // A report built from empty tables would replace the real one
        if self.options.write_outputs && self.initialized {
            if let Err(e) = self.store.save_json(store::UNKNOWN_BITS_FILE, &self.unknown_bits) {
                log::warn!("{}", e);
                stats.warnings.push(e.to_string());
            }
        }

        log::info!(
            "Processed {} windows and {} controls: {} repaired, {} invalid windows, {} invalid controls",
            stats.windows,
            stats.controls,
            stats.repaired_windows,
            stats.invalid_windows,
            stats.invalid_controls
        );
        stats
    }

    /// Behavior tags of a window mask that was already resolved.
    pub fn window_behavior(&self, window_name: &str, resolved: &ResolvedMask) -> Vec<&'static str> {
        behavior::window_tags(window_name, resolved, &self.window_flags)
    }

    pub fn control_behavior(&self, control_type: &str, resolved: &ResolvedMask) -> ControlBehavior {
        behavior::control_behavior(control_type, resolved)
    }

    /// Flags allowed on a type according to the rule documents.
    pub fn allowed_flags(&self, kind: OwnerKind, type_name: &str) -> Vec<String> {
        match kind {
            OwnerKind::Window => self.window_rules.allowed_flags(type_name),
            OwnerKind::Control => self.control_rules.allowed_flags(type_name),
        }
    }
}

fn report_conflicts(rules: &RuleDocument, owner: &str, flags: &[String]) -> usize {
    let conflicts = rules.conflicts(flags);
    for (a, b) in &conflicts {
        log::warn!("{}: {} and {} are mutually exclusive", owner, a, b);
    }
    conflicts.len()
}

fn load_table_or_warn(store: &ConfigStore, file: &str, warnings: &mut Vec<String>) -> FlagTable {
    match store.load_table(file) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("{}", e);
            warnings.push(e.to_string());
            FlagTable::new()
        }
    }
}

fn load_rules_or_warn(store: &ConfigStore, file: &str, warnings: &mut Vec<String>) -> Option<RuleDocument> {
    store.load_rules(file).unwrap_or_else(|e| warn_and_skip(e, warnings))
}

fn load_groups_or_warn(store: &ConfigStore, warnings: &mut Vec<String>) -> Option<FlagGroups> {
    store.load_groups().unwrap_or_else(|e| warn_and_skip(e, warnings))
}

fn warn_and_skip<T>(error: FlagError, warnings: &mut Vec<String>) -> Option<T> {
    log::warn!("{}", error);
    warnings.push(error.to_string());
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ControlRecord;
    use std::fs;
    use tempfile::TempDir;

    fn engine_in(temp_dir: &TempDir) -> FlagEngine {
        FlagEngine::new(EngineOptions {
            config_dir: temp_dir.path().join("config"),
            ..Default::default()
        })
    }

    fn write_headers(temp_dir: &TempDir) -> std::path::PathBuf {
        let source = temp_dir.path().join("include");
        fs::create_dir_all(source.join("gui")).unwrap();
        fs::write(
            source.join("wndstyle.h"),
            "#define WBS_CAPTION 0x02000000L\n#define WBS_CUSTOM (1 << 27)\n#define WTYPE_SPECIAL 42\n",
        )
        .unwrap();
        fs::write(
            source.join("gui").join("ctrl.h"),
            "#define BS_PUSHBUTTON 0x00000000\n#define EBS_FANCY 0x10|0x20 // custom\n#define BS_BROKEN SOME_MACRO\n#define APP_VERSION 3\n",
        )
        .unwrap();
        source
    }

    #[test]
    fn test_generation_pass() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        let mut engine = engine_in(&temp_dir);

        let stats = engine.generate_flags(&source);

        assert_eq!(stats.files_scanned, 2);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.unparseable, 1);
        assert_eq!(engine.window_flags().get("WBS_CUSTOM"), Some(0x0800_0000));
        assert_eq!(engine.control_flags().get("EBS_FANCY"), Some(0x30));
        assert!(!engine.control_flags().contains("BS_BROKEN"));
        assert_eq!(engine.window_types().get("WTYPE_SPECIAL"), Some(42));
        assert!(engine.window_types().contains("WTYPE_BUTTON"));
        assert_eq!(stats.files_written, 7);
        assert!(engine.store().exists(store::LEGACY_FLAGS_FILE));
        assert!(!engine.is_stale());
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        let mut engine = engine_in(&temp_dir);

        engine.generate_flags(&source);
        let first = engine.store().fingerprints();
        engine.generate_flags(&source);
        assert_eq!(engine.store().fingerprints(), first);
    }

    #[test]
    fn test_hand_edits_survive_regeneration() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        let mut engine = engine_in(&temp_dir);
        engine.generate_flags(&source);

        let rules_path = engine.store().path(store::CONTROL_RULES_FILE);
        let mut rules: serde_json::Value = serde_json::from_str(&fs::read_to_string(&rules_path).unwrap()).unwrap();
        rules["EBS_FANCY"] = serde_json::json!({"set": {"role": "fancy-edit"}});
        fs::write(&rules_path, serde_json::to_string_pretty(&rules).unwrap()).unwrap();
        assert!(engine.is_stale());

        engine.generate_flags(&source);
        let rules: serde_json::Value = serde_json::from_str(&fs::read_to_string(&rules_path).unwrap()).unwrap();
        assert_eq!(rules["EBS_FANCY"]["set"]["role"], "fancy-edit");
    }

    #[test]
    fn test_broken_rules_file_is_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        let mut engine = engine_in(&temp_dir);
        fs::create_dir_all(engine.store().dir()).unwrap();
        let rules_path = engine.store().path(store::WINDOW_RULES_FILE);
        fs::write(&rules_path, "{ broken").unwrap();

        let stats = engine.generate_flags(&source);

        assert_eq!(fs::read_to_string(&rules_path).unwrap(), "{ broken");
        assert!(stats.warnings.iter().any(|w| w.contains("window_flag_rules.json")));
    }

    #[test]
    fn test_missing_source_still_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);

        let stats = engine.generate_flags(&temp_dir.path().join("nowhere"));

        assert_eq!(stats.files_scanned, 0);
        assert!(!stats.warnings.is_empty());
        assert!(engine.window_flags().contains("WBS_CHILD"));
        assert!(engine.store().exists(store::FLAG_GROUPS_FILE));
    }

    #[test]
    fn test_process_layout() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        let mut engine = engine_in(&temp_dir);
        engine.generate_flags(&source);

        let mut window = WindowRecord::new("Inventory", "WTYPE_BASE", 0x0000_0202);
        let mut button = ControlRecord::new("WTYPE_BUTTON", 0x0000_8000);
        button.id = "WIDC_CLOSE".to_string();
        window.controls.push(button);
        window.controls.push(ControlRecord::new("WTYPE_STATIC", 0));
        let mut windows = vec![window];

        let stats = engine.process_layout(&mut windows);

        assert_eq!(windows[0].flags, 0x0202_0000);
        assert_eq!(windows[0].repaired_from.as_deref(), Some("0x00000202"));
        assert!(windows[0].resolved_flags.contains(&"WBS_CAPTION".to_string()));
        assert!(windows[0].resolved_flags.contains(&"WBS_CHILD".to_string()));
        assert!(!windows[0].controls[0].valid);
        assert!(windows[0].controls[1].valid);
        assert_eq!(stats.repaired_windows, 1);
        assert_eq!(stats.unknown_entries, 1);
        assert!(windows[0].behavior.contains(&"has_caption".to_string()));
        assert!(windows[0].behavior.contains(&"is_child".to_string()));
        assert_eq!(windows[0].controls[0].category, "button");
        assert_eq!(windows[0].controls[0].capabilities, vec!["CanClick", "CanFocus"]);
        assert_eq!(windows[0].controls[1].category, "label");

        let report: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(engine.store().path(store::UNKNOWN_BITS_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            report,
            serde_json::json!({"WTYPE_BUTTON": [{"mask": "0x00008000", "controls": ["WIDC_CLOSE"]}]})
        );

        // The report is replaced, not merged
        windows[0].controls.clear();
        engine.process_layout(&mut windows);
        let report = fs::read_to_string(engine.store().path(store::UNKNOWN_BITS_FILE)).unwrap();
        assert_eq!(report.trim(), "{}");
    }

    #[test]
    fn test_unparseable_define_keeps_default() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("include");
        fs::create_dir_all(&source).unwrap();
        fs::write(
            source.join("wndstyle.h"),
            "#define WBS_CHILD SOME_MACRO\n#define WBS_CAPTION 0x02000000\n#define BS_BROKEN OTHER_MACRO\n",
        )
        .unwrap();
        let mut engine = engine_in(&temp_dir);

        let stats = engine.generate_flags(&source);

        assert_eq!(stats.unparseable, 2);
        assert_eq!(stats.warnings.iter().filter(|w| w.contains("skipped")).count(), 2);
        assert_eq!(engine.window_flags().get("WBS_CHILD"), Some(0x0002_0000));
        assert!(!engine.control_flags().contains("BS_BROKEN"));

        let mut mask = 0x0200_0000;
        let resolved = engine.resolve(OwnerKind::Window, &mut mask);
        assert_eq!(resolved.matched_flag_names, vec!["WBS_CAPTION"]);

        let mut mask = 0x0000_0002;
        let resolved = engine.resolve(OwnerKind::Control, &mut mask);
        assert!(!resolved.matched_flag_names.contains(&"BS_BROKEN".to_string()));
    }

    #[test]
    fn test_uninitialized_engine_does_not_load() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        engine_in(&temp_dir).generate_flags(&source);
        let report_path = temp_dir.path().join("config").join(store::UNKNOWN_BITS_FILE);
        fs::write(&report_path, "{\"WTYPE_BUTTON\": []}").unwrap();

        let mut engine = engine_in(&temp_dir);
        let mut mask = 0x0200_0000;
        let resolved = engine.resolve(OwnerKind::Window, &mut mask);
        assert!(resolved.matched_flag_names.is_empty());
        assert!(!engine.is_initialized());
        assert!(engine.window_flags().is_empty());
        assert!(engine.allowed_flags(OwnerKind::Window, "WTYPE_BASE").is_empty());

        let mut windows = vec![WindowRecord::new("Inventory", "WTYPE_BASE", 0x0200_0000)];
        let stats = engine.process_layout(&mut windows);
        assert!(stats.warnings.iter().any(|w| w.contains("not initialized")));
        assert!(!engine.is_initialized());
        assert_eq!(fs::read_to_string(&report_path).unwrap(), "{\"WTYPE_BUTTON\": []}");

        engine.initialize();
        let mut mask = 0x0200_0000;
        assert_eq!(engine.resolve(OwnerKind::Window, &mut mask).matched_flag_names, vec!["WBS_CAPTION"]);
    }

    #[test]
    fn test_initialize_reads_persisted_state() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_headers(&temp_dir);
        engine_in(&temp_dir).generate_flags(&source);

        let mut engine = engine_in(&temp_dir);
        assert!(engine.is_stale());
        let stats = engine.initialize();
        assert!(stats.warnings.is_empty());
        assert!(!engine.is_stale());
        assert_eq!(engine.window_flags().get("WBS_CAPTION"), Some(0x0200_0000));
        let types = engine.definitions(Namespace::WindowType);
        assert!(types
            .iter()
            .any(|d| d.name == "WTYPE_SPECIAL" && d.raw_value() == "0x0000002A"));
        assert!(engine.definitions(Namespace::Unknown).is_empty());

        let mut mask = 0x0200_0000;
        let resolved = engine.resolve(OwnerKind::Window, &mut mask);
        assert_eq!(resolved.matched_flag_names, vec!["WBS_CAPTION"]);
        assert!(engine.allowed_flags(OwnerKind::Window, "WTYPE_BASE").contains(&"WBS_CAPTION".to_string()));
    }
}
