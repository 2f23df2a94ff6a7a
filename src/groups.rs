//! `flag_groups.json`: which flags each window type and control supertype
//! may carry, plus exclusivity groups.
//!
//! The window section is curated and may be edited by hand; regeneration
//! only adds to it. The control section is derived entirely from the
//! control flag table and is rebuilt on every run.

use crate::types::{compare_case_insensitive, FlagTable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Context marker: legal on every window and control.
pub const CONTEXT_ANY: &str = "*";
/// Context marker: legal on top-level windows only.
pub const CONTEXT_WINDOW: &str = "window";

/// Catch-all group seeded into the window section.
pub const WINDOW_STYLE_GROUP: &str = "WindowStyle";

const CURATED_WINDOW_CONTEXTS: &[(&str, &[&str])] = &[
    ("WBS_CAPTION", &[CONTEXT_WINDOW]),
    ("WBS_CHILD", &[CONTEXT_ANY]),
    ("WBS_CHILDFRAME", &[CONTEXT_WINDOW]),
    ("WBS_DOCKING", &[CONTEXT_WINDOW]),
    ("WBS_HELP", &[CONTEXT_WINDOW]),
    ("WBS_HSCROLL", &[CONTEXT_ANY]),
    ("WBS_KEY", &[CONTEXT_WINDOW]),
    ("WBS_MAXIMIZEBOX", &[CONTEXT_WINDOW]),
    ("WBS_MINIMIZEBOX", &[CONTEXT_WINDOW]),
    ("WBS_MODAL", &[CONTEXT_WINDOW]),
    ("WBS_MOVE", &[CONTEXT_WINDOW]),
    ("WBS_NOCLOSE", &[CONTEXT_WINDOW]),
    ("WBS_NODRAWFRAME", &[CONTEXT_ANY]),
    ("WBS_NOFOCUS", &[CONTEXT_ANY]),
    ("WBS_NOFRAME", &[CONTEXT_ANY]),
    ("WBS_PIN", &[CONTEXT_WINDOW]),
    ("WBS_POPUP", &[CONTEXT_WINDOW]),
    ("WBS_THICKFRAME", &[CONTEXT_WINDOW]),
    ("WBS_TOPMOST", &[CONTEXT_WINDOW]),
    ("WBS_VSCROLL", &[CONTEXT_ANY]),
    ("WBS_CHECK", &["WTYPE_BUTTON"]),
    ("WBS_RADIO", &["WTYPE_BUTTON"]),
    ("WBS_PUSHLIKE", &["WTYPE_BUTTON"]),
    ("WBS_HIGHLIGHT", &["WTYPE_BUTTON", "WTYPE_LISTBOX"]),
    ("WBS_HIGHLIGHTPUSH", &["WTYPE_BUTTON"]),
    ("WBS_MENUITEM", &["WTYPE_BUTTON", "WTYPE_LISTBOX"]),
    ("WBS_NOMENUICON", &["WTYPE_BUTTON", "WTYPE_LISTBOX"]),
    ("WBS_MONEY", &["WTYPE_EDIT", "WTYPE_STATIC"]),
    ("WBS_TEXT", &["WTYPE_STATIC"]),
    ("WBS_SPRITE", &["WTYPE_STATIC"]),
    ("WBS_HORI", &["WTYPE_SCROLLBAR"]),
    ("WBS_VERT", &["WTYPE_SCROLLBAR"]),
];

const EXCLUSIVE_GROUPS: &[(&str, &[&str])] = &[
    ("FrameMode", &["WBS_NOFRAME", "WBS_THICKFRAME"]),
    ("Orientation", &["WBS_HORI", "WBS_VERT"]),
    ("EditAlignment", &["ES_LEFT", "ES_CENTER", "ES_RIGHT"]),
    ("EditBoxAlignment", &["EBS_LEFT", "EBS_CENTER", "EBS_RIGHT"]),
    ("StaticAlignment", &["SS_LEFT", "SS_CENTER", "SS_RIGHT"]),
];

/// Control supertypes: name, owned control prefixes, default window styles.
const CONTROL_SUPERTYPES: &[(&str, &[&str], &[&str])] = &[
    ("button", &["BS_"], &["WBS_CHILD"]),
    ("edit", &["EBS_", "ES_"], &["WBS_CHILD"]),
    ("listbox", &["LBS_"], &["WBS_CHILD", "WBS_VSCROLL"]),
    ("listctrl", &["WLVS_", "LVS_"], &["WBS_CHILD", "WBS_VSCROLL"]),
    ("tree", &["WTVS_", "TVS_"], &["WBS_CHILD", "WBS_VSCROLL"]),
    ("static", &["SS_"], &["WBS_CHILD"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagGroups {
    #[serde(default)]
    pub window: WindowGroups,
    #[serde(default)]
    pub control: BTreeMap<String, ControlGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowGroups {
    /// Flag name → contexts it is legal in.
    #[serde(default)]
    pub flags: BTreeMap<String, Vec<String>>,
    /// Group name → mutually exclusive flags.
    #[serde(default)]
    pub exclusive: BTreeMap<String, Vec<String>>,
    /// Named groups such as `WindowStyle` and any hand-authored keys.
    #[serde(flatten)]
    pub groups: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlGroup {
    #[serde(rename = "windowStyle", default)]
    pub window_style: Vec<String>,
    #[serde(rename = "controlStyle", default)]
    pub control_style: Vec<String>,
}

impl FlagGroups {
    /// Window flags legal on a window or control of `type_name`.
    pub fn allowed_window_flags(&self, type_name: &str, top_level: bool) -> Vec<String> {
        self.window
            .flags
            .iter()
            .filter(|(_, contexts)| {
                contexts.iter().any(|c| {
                    c == CONTEXT_ANY || (top_level && c == CONTEXT_WINDOW) || c.eq_ignore_ascii_case(type_name)
                })
            })
            .map(|(flag, _)| flag.clone())
            .collect()
    }

    pub fn control_group(&self, control_type: &str) -> Option<&ControlGroup> {
        supertype_for(control_type).and_then(|name| self.control.get(name))
    }
}

/// Map a control type name (`WTYPE_BUTTON`, `Button`, `listctrl`, ...) to
/// its supertype key.
pub fn supertype_for(control_type: &str) -> Option<&'static str> {
    let lowered = control_type.to_ascii_lowercase();
    let bare = lowered.strip_prefix("wtype_").unwrap_or(lowered.as_str());
    let name = match bare {
        "button" | "checkbox" | "radio" => "button",
        "edit" | "editbox" => "edit",
        "listbox" | "combobox" => "listbox",
        "listctrl" | "listview" => "listctrl",
        "tree" | "treectrl" | "treeview" => "tree",
        "static" | "text" => "static",
        _ => return None,
    };
    Some(name)
}

pub struct FlagGroupBuilder;

impl FlagGroupBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Fresh document from the current tables.
    pub fn build(&self, window_flags: &FlagTable, control_flags: &FlagTable) -> FlagGroups {
        let mut window = WindowGroups::default();

        for &(flag, contexts) in CURATED_WINDOW_CONTEXTS {
            if window_flags.contains(flag) {
                window
                    .flags
                    .insert(flag.to_string(), contexts.iter().map(|c| c.to_string()).collect());
            }
        }

        for &(group, members) in EXCLUSIVE_GROUPS {
            let known: Vec<String> = members
                .iter()
                .filter(|m| window_flags.contains(m) || control_flags.contains(m))
                .map(|m| m.to_string())
                .collect();
            if known.len() >= 2 {
                window.exclusive.insert(group.to_string(), known);
            }
        }

        window
            .groups
            .insert(WINDOW_STYLE_GROUP.to_string(), Value::Array(Vec::new()));

        let mut groups = FlagGroups {
            window,
            control: self.build_control_section(window_flags, control_flags),
        };
        self.extend(&mut groups, window_flags);
        groups
    }

    fn build_control_section(
        &self,
        window_flags: &FlagTable,
        control_flags: &FlagTable,
    ) -> BTreeMap<String, ControlGroup> {
        let mut section = BTreeMap::new();
        for &(supertype, prefixes, window_defaults) in CONTROL_SUPERTYPES {
            let mut control_style: Vec<String> = control_flags
                .names()
                .filter(|name| prefixes.iter().any(|p| name.starts_with(p)))
                .map(str::to_string)
                .collect();
            control_style.sort_by(|a, b| compare_case_insensitive(a, b));

            let window_style = window_defaults
                .iter()
                .filter(|flag| window_flags.contains(flag))
                .map(|flag| flag.to_string())
                .collect();

            log::debug!("Control group {}: {} control flags", supertype, control_style.len());
            section.insert(
                supertype.to_string(),
                ControlGroup {
                    window_style,
                    control_style,
                },
            );
        }
        section
    }

    /// Union every known window flag into each window-section group whose
    /// key contains "style". Returns the number of names added.
    pub fn extend(&self, groups: &mut FlagGroups, window_flags: &FlagTable) -> usize {
        let mut added = 0;
        for (key, value) in groups.window.groups.iter_mut() {
            if !key.to_ascii_lowercase().contains("style") {
                continue;
            }
            let members = match value {
                Value::Array(members) => members,
                _ => {
                    log::warn!("Flag group {} is not an array; left unchanged", key);
                    continue;
                }
            };
            for name in window_flags.names() {
                if !members.iter().any(|m| m.as_str() == Some(name)) {
                    members.push(Value::from(name));
                    added += 1;
                }
            }
        }
        added
    }

    /// Rebuild against an existing document: window section content is
    /// kept and only grows, the control section is replaced.
    pub fn regenerate(
        &self,
        existing: Option<FlagGroups>,
        window_flags: &FlagTable,
        control_flags: &FlagTable,
    ) -> FlagGroups {
        let fresh = self.build(window_flags, control_flags);
        let mut merged = match existing {
            Some(existing) => existing,
            None => return fresh,
        };

        for (flag, contexts) in fresh.window.flags {
            merged.window.flags.entry(flag).or_insert(contexts);
        }
        for (group, members) in fresh.window.exclusive {
            let existing = merged.window.exclusive.entry(group).or_default();
            for member in members {
                if !existing.contains(&member) {
                    existing.push(member);
                }
            }
        }
        for (key, value) in fresh.window.groups {
            if !merged.window.groups.contains_key(&key) {
                merged.window.groups.insert(key, value);
            }
        }
        merged.control = fresh.control;

        self.extend(&mut merged, window_flags);
        merged
    }
}

impl Default for FlagGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
