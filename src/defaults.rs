//! Built-in flag defaults and the merge that back-fills scanned tables
//!
//! Scanned values always win. Canonical defaults only fill gaps; legacy
//! defaults are kept aside unless a symbol is pinned through the
//! legacy-override allow-list.

use crate::types::{FlagTable, Namespace};
use serde::Serialize;

/// Canonical window style defaults.
pub const DEFAULT_WINDOW_FLAGS: &[(&str, u32)] = &[
    ("WBS_CAPTION", 0x0200_0000),
    ("WBS_CHECK", 0x0000_0008),
    ("WBS_CHILD", 0x0002_0000),
    ("WBS_CHILDFRAME", 0x0080_0000),
    ("WBS_DOCKING", 0x0400_0000),
    ("WBS_EXTENSION", 0x0000_0020),
    ("WBS_HELP", 0x0000_0004),
    ("WBS_HIGHLIGHT", 0x0000_0010),
    ("WBS_HIGHLIGHTPUSH", 0x0000_0020),
    ("WBS_HORI", 0x0000_0001),
    ("WBS_HSCROLL", 0x4000_0000),
    ("WBS_KEY", 0x0100_0000),
    ("WBS_MANAGER", 0x0010_0000),
    ("WBS_MAXIMIZEBOX", 0x0000_0002),
    ("WBS_MENUITEM", 0x0000_0100),
    ("WBS_MINIMIZEBOX", 0x0000_0001),
    ("WBS_MODAL", 0x0008_0000),
    ("WBS_MONEY", 0x0000_0004),
    ("WBS_MOVE", 0x0001_0000),
    ("WBS_NOCENTER", 0x0000_0080),
    ("WBS_NODRAWFRAME", 0x0004_0000),
    ("WBS_NOFOCUS", 0x8000_0000),
    ("WBS_NOFRAME", 0x0020_0000),
    ("WBS_NOMENUICON", 0x0000_0400),
    ("WBS_OVERRIDE_FIRST", 0x0000_0040),
    ("WBS_PIN", 0x0000_0010),
    ("WBS_POPUP", 0x0800_0000),
    ("WBS_PUSHLIKE", 0x0000_0200),
    ("WBS_RADIO", 0x0000_0004),
    ("WBS_SOUND", 0x0040_0000),
    ("WBS_SPRITE", 0x0000_0002),
    ("WBS_TEXT", 0x0000_0001),
    ("WBS_THICKFRAME", 0x0000_0040),
    ("WBS_TOPMOST", 0x1000_0000),
    ("WBS_VERT", 0x0000_0002),
    ("WBS_VIEW", 0x0000_0008),
    ("WBS_VSCROLL", 0x2000_0000),
];

/// Canonical control style defaults (Win32 button/edit/static/listbox).
pub const DEFAULT_CONTROL_FLAGS: &[(&str, u32)] = &[
    // Button
    ("BS_PUSHBUTTON", 0x0000_0000),
    ("BS_DEFPUSHBUTTON", 0x0000_0001),
    ("BS_CHECKBOX", 0x0000_0002),
    ("BS_AUTOCHECKBOX", 0x0000_0003),
    ("BS_RADIOBUTTON", 0x0000_0004),
    ("BS_3STATE", 0x0000_0005),
    ("BS_AUTO3STATE", 0x0000_0006),
    ("BS_GROUPBOX", 0x0000_0007),
    ("BS_AUTORADIOBUTTON", 0x0000_0009),
    ("BS_ICON", 0x0000_0040),
    ("BS_BITMAP", 0x0000_0080),
    ("BS_LEFT", 0x0000_0100),
    ("BS_RIGHT", 0x0000_0200),
    ("BS_TOP", 0x0000_0400),
    ("BS_BOTTOM", 0x0000_0800),
    ("BS_VCENTER", 0x0000_0C00),
    // Edit
    ("ES_LEFT", 0x0000),
    ("ES_CENTER", 0x0001),
    ("ES_RIGHT", 0x0002),
    ("ES_MULTILINE", 0x0004),
    ("ES_PASSWORD", 0x0020),
    ("ES_AUTOVSCROLL", 0x0040),
    ("ES_AUTOHSCROLL", 0x0080),
    ("ES_NOHIDESEL", 0x0100),
    ("ES_OEMCONVERT", 0x0400),
    ("ES_READONLY", 0x0800),
    ("ES_WANTRETURN", 0x1000),
    ("ES_NUMBER", 0x2000),
    // Static
    ("SS_LEFT", 0x0000_0000),
    ("SS_CENTER", 0x0000_0001),
    ("SS_RIGHT", 0x0000_0002),
    ("SS_ICON", 0x0000_0003),
    ("SS_BITMAP", 0x0000_000E),
    ("SS_NOTIFY", 0x0000_0100),
    // ListBox
    ("LBS_NOTIFY", 0x0001),
    ("LBS_SORT", 0x0002),
    ("LBS_NOREDRAW", 0x0004),
    ("LBS_MULTIPLESEL", 0x0008),
    ("LBS_OWNERDRAWFIXED", 0x0010),
    ("LBS_OWNERDRAWVARIABLE", 0x0020),
    ("LBS_HASSTRINGS", 0x0040),
    ("LBS_USETABSTOPS", 0x0080),
    ("LBS_NOINTEGRALHEIGHT", 0x0100),
    ("LBS_MULTICOLUMN", 0x0200),
    ("LBS_WANTKEYBOARDINPUT", 0x0400),
    ("LBS_EXTENDEDSEL", 0x0800),
    ("LBS_DISABLENOSCROLL", 0x1000),
];

/// Canonical window type enumerators.
pub const DEFAULT_WINDOW_TYPES: &[(&str, u32)] = &[
    ("WTYPE_NONE", 0x0000_0000),
    ("WTYPE_BASE", 0x0000_0001),
    ("WTYPE_STATIC", 0x0000_0002),
    ("WTYPE_BUTTON", 0x0000_0003),
    ("WTYPE_EDIT", 0x0000_0004),
    ("WTYPE_SCROLLBAR", 0x0000_0005),
    ("WTYPE_LISTBOX", 0x0000_0006),
    ("WTYPE_CUSTOM", 0x0000_0007),
];

/// Bit assignments used by older client versions. Several of these collide
/// with canonical symbols (0x40 was RESIZEABLE before it became THICKFRAME,
/// 0x80 was NOCLOSE on regular windows and NOCENTER on HUD windows).
pub const LEGACY_WINDOW_FLAGS: &[(&str, u32)] = &[
    ("WBS_NOCLOSE", 0x0000_0080),
    ("WBS_RESIZEABLE", 0x0000_0040),
    ("WBS_NOCLING", 0x0000_0800),
    ("WBS_DROPICON", 0x0000_1000),
    ("WBS_VISIBLE", 0x0000_2000),
    ("WBS_HELP", 0x0000_0800),
];

pub const LEGACY_CONTROL_FLAGS: &[(&str, u32)] = &[
    ("EBS_LEFT", 0x0000),
    ("EBS_CENTER", 0x0001),
    ("EBS_RIGHT", 0x0002),
    ("EBS_MULTILINE", 0x0004),
    ("EBS_PASSWORD", 0x0020),
    ("EBS_AUTOVSCROLL", 0x0040),
    ("EBS_AUTOHSCROLL", 0x0080),
    ("EBS_READONLY", 0x0800),
    ("EBS_NUMBER", 0x2000),
    ("BS_VCENTER", 0x0000_0800),
];

/// Legacy defaults that were not activated. Persisted for reference.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LegacyFlags {
    pub window: FlagTable,
    pub control: FlagTable,
}

/// Counts of entries contributed by each merge step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub defaults_added: usize,
    pub legacy_pinned: usize,
    pub legacy_recorded: usize,
}

pub struct DefaultsMerger {
    legacy_overrides: Vec<String>,
}

impl DefaultsMerger {
    pub fn new(legacy_overrides: Vec<String>) -> Self {
        Self { legacy_overrides }
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.legacy_overrides.iter().any(|n| n == name)
    }

    /// Back-fill one namespace table. Pinned legacy entries are applied
    /// before canonical defaults, so for a symbol both tables know the
    /// legacy bit assignment wins; neither ever replaces a scanned value.
    pub fn merge_table(
        &self,
        table: &mut FlagTable,
        namespace: Namespace,
        legacy_out: Option<&mut FlagTable>,
        stats: &mut MergeStats,
    ) {
        let (defaults, legacy) = match namespace {
            Namespace::WindowFlag => (DEFAULT_WINDOW_FLAGS, LEGACY_WINDOW_FLAGS),
            Namespace::ControlFlag => (DEFAULT_CONTROL_FLAGS, LEGACY_CONTROL_FLAGS),
            Namespace::WindowType => (DEFAULT_WINDOW_TYPES, &[][..]),
            Namespace::Unknown => return,
        };

        let mut inactive = FlagTable::new();
        for &(name, value) in legacy {
            if self.is_pinned(name) {
                if table.insert_if_absent(name, value) {
                    log::info!("Pinned legacy {} entry: {} = 0x{:08X}", namespace, name, value);
                    stats.legacy_pinned += 1;
                }
            } else {
                inactive.insert(name, value);
            }
        }

        for &(name, value) in defaults {
            if table.insert_if_absent(name, value) {
                log::debug!("Default {} entry added: {} = 0x{:08X}", namespace, name, value);
                stats.defaults_added += 1;
            }
        }

        table.sort_case_insensitive();
        inactive.sort_case_insensitive();
        stats.legacy_recorded += inactive.len();
        if let Some(out) = legacy_out {
            *out = inactive;
        }

        log::info!("{} after defaults: {} entries", namespace, table.len());
    }

    /// Back-fill all three tables and return the inactive legacy entries.
    pub fn merge_all(
        &self,
        window_flags: &mut FlagTable,
        control_flags: &mut FlagTable,
        window_types: &mut FlagTable,
    ) -> (LegacyFlags, MergeStats) {
        let mut legacy = LegacyFlags::default();
        let mut stats = MergeStats::default();
        self.merge_table(window_flags, Namespace::WindowFlag, Some(&mut legacy.window), &mut stats);
        self.merge_table(control_flags, Namespace::ControlFlag, Some(&mut legacy.control), &mut stats);
        self.merge_table(window_types, Namespace::WindowType, None, &mut stats);
        (legacy, stats)
    }
}

impl Default for DefaultsMerger {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanned_values_are_never_overwritten() {
        let scanned = FlagTable::from_pairs(vec![("WBS_CAPTION", 0x1234_0000), ("WBS_HELP", 0x0000_0800)]);
        let mut merged = scanned.clone();
        let merger = DefaultsMerger::new(vec!["WBS_HELP".to_string()]);
        let mut stats = MergeStats::default();
        merger.merge_table(&mut merged, Namespace::WindowFlag, None, &mut stats);

        for (name, value) in scanned.iter() {
            assert_eq!(merged.get(name), Some(value), "Scanned value changed for {}", name);
        }
        assert_eq!(merged.get("WBS_CHILD"), Some(0x0002_0000));
        assert_eq!(stats.defaults_added, DEFAULT_WINDOW_FLAGS.len() - 2);
    }

    #[test]
    fn test_legacy_recorded_separately() {
        let mut window = FlagTable::new();
        let mut control = FlagTable::new();
        let mut types = FlagTable::new();
        let (legacy, stats) = DefaultsMerger::default().merge_all(&mut window, &mut control, &mut types);

        assert!(!window.contains("WBS_NOCLOSE"));
        assert_eq!(legacy.window.get("WBS_NOCLOSE"), Some(0x80));
        assert_eq!(legacy.control.get("EBS_READONLY"), Some(0x0800));
        assert_eq!(window.get("WBS_HELP"), Some(0x0000_0004));
        assert_eq!(stats.legacy_pinned, 0);
        assert_eq!(stats.legacy_recorded, LEGACY_WINDOW_FLAGS.len() + LEGACY_CONTROL_FLAGS.len());
        assert_eq!(types.len(), DEFAULT_WINDOW_TYPES.len());
    }

    #[test]
    fn test_allow_list_pins_legacy_assignment() {
        let merger = DefaultsMerger::new(vec!["WBS_NOCLOSE".to_string(), "WBS_HELP".to_string()]);
        let mut window = FlagTable::new();
        let mut control = FlagTable::new();
        let mut types = FlagTable::new();
        let (legacy, stats) = merger.merge_all(&mut window, &mut control, &mut types);

        assert_eq!(window.get("WBS_NOCLOSE"), Some(0x80));
        // Pinned legacy assignment beats the canonical default
        assert_eq!(window.get("WBS_HELP"), Some(0x0800));
        assert!(!legacy.window.contains("WBS_NOCLOSE"));
        assert_eq!(stats.legacy_pinned, 2);
    }

    #[test]
    fn test_merged_table_is_sorted() {
        let mut control = FlagTable::from_pairs(vec![("tcs_lower", 0x1), ("ZBS_LAST", 0x2)]);
        let mut stats = MergeStats::default();
        DefaultsMerger::default().merge_table(&mut control, Namespace::ControlFlag, None, &mut stats);

        let names: Vec<_> = control.names().collect();
        let mut expected = names.clone();
        expected.sort_by(|a, b| crate::types::compare_case_insensitive(a, b));
        assert_eq!(names, expected);
        assert_eq!(names.first(), Some(&"BS_3STATE"));
        assert_eq!(names.last(), Some(&"ZBS_LAST"));
    }
}
