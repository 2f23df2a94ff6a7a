//! What a window or control may do, derived from its resolved mask
//!
//! Windows get a list of behavior tags (`movable`, `has_caption`, ...).
//! Controls get a category and a capability set from their type, plus the
//! semantic attributes of every flag their mask matched.

use crate::normalizer::format_hex;
use crate::resolver::ResolvedMask;
use crate::semantics::{self, Attr};
use crate::types::FlagTable;
use bitflags::bitflags;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Windows drawn as part of the HUD. On these the 0x80 bit means
/// "do not center" and the close button is never shown.
pub const HUD_WINDOWS: &[&str] = &[
    "APP_MINIMAP",
    "APP_HP_GAUGE",
    "APP_QUICK_SLOT",
    "APP_TARGET_INFO",
    "APP_CHAT",
    "APP_PLAYER_INFO",
    "APP_BUFF",
    "APP_ACTION_SLOT",
];

/// Category reported for control types without a base behavior.
pub const UNKNOWN_CATEGORY: &str = "unknown";

bitflags! {
    /// Basic abilities of a control type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlCapabilities: u32 {
        const CAN_CLICK = 1 << 0;
        const CAN_TOGGLE = 1 << 1;
        const CAN_FOCUS = 1 << 2;
        const CAN_TEXT_INPUT = 1 << 3;
        const CAN_SELECT_ITEMS = 1 << 4;
        const CAN_SCROLL = 1 << 5;
        const IS_CONTAINER = 1 << 6;
        const HAS_TOOLTIP = 1 << 7;
        const CUSTOM_BEHAVIOR = 1 << 8;
    }
}

const CAPABILITY_NAMES: &[(ControlCapabilities, &str)] = &[
    (ControlCapabilities::CAN_CLICK, "CanClick"),
    (ControlCapabilities::CAN_TOGGLE, "CanToggle"),
    (ControlCapabilities::CAN_FOCUS, "CanFocus"),
    (ControlCapabilities::CAN_TEXT_INPUT, "CanTextInput"),
    (ControlCapabilities::CAN_SELECT_ITEMS, "CanSelectItems"),
    (ControlCapabilities::CAN_SCROLL, "CanScroll"),
    (ControlCapabilities::IS_CONTAINER, "IsContainer"),
    (ControlCapabilities::HAS_TOOLTIP, "HasTooltip"),
    (ControlCapabilities::CUSTOM_BEHAVIOR, "CustomBehavior"),
];

impl ControlCapabilities {
    /// Display names, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        CAPABILITY_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl Serialize for ControlCapabilities {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.names())
    }
}

/// Hard-wired behavior of one control type.
#[derive(Debug, Clone, Copy)]
pub struct BaseBehavior {
    pub control_type: &'static str,
    pub category: &'static str,
    pub capabilities: ControlCapabilities,
    pub defaults: &'static [(&'static str, Attr)],
}

use Attr::{Bool, Int, Str};

pub const BASE_BEHAVIORS: &[BaseBehavior] = &[
    BaseBehavior {
        control_type: "WTYPE_BUTTON",
        category: "button",
        capabilities: ControlCapabilities::CAN_CLICK.union(ControlCapabilities::CAN_FOCUS),
        defaults: &[("state", Str("normal")), ("defaultColor", Str("#FFFFFF")), ("textSupport", Bool(true))],
    },
    BaseBehavior {
        control_type: "WTYPE_STATIC",
        category: "label",
        capabilities: ControlCapabilities::empty(),
        defaults: &[("textSupport", Bool(true)), ("textAlign", Str("center"))],
    },
    BaseBehavior {
        control_type: "WTYPE_TEXT",
        category: "text",
        capabilities: ControlCapabilities::CAN_SCROLL,
        defaults: &[("textSupport", Bool(true)), ("multiline", Bool(true))],
    },
    BaseBehavior {
        control_type: "WTYPE_EDITCTRL",
        category: "edit",
        capabilities: ControlCapabilities::CAN_FOCUS
            .union(ControlCapabilities::CAN_TEXT_INPUT)
            .union(ControlCapabilities::CAN_SCROLL),
        defaults: &[("textSupport", Bool(true)), ("multiline", Bool(false)), ("maxLength", Int(128))],
    },
    BaseBehavior {
        control_type: "WTYPE_LISTBOX",
        category: "listbox",
        capabilities: ControlCapabilities::CAN_FOCUS
            .union(ControlCapabilities::CAN_SELECT_ITEMS)
            .union(ControlCapabilities::CAN_SCROLL),
        defaults: &[("multiSelect", Bool(false))],
    },
    BaseBehavior {
        control_type: "WTYPE_COMBOBOX",
        category: "combobox",
        capabilities: ControlCapabilities::CAN_FOCUS
            .union(ControlCapabilities::CAN_SELECT_ITEMS)
            .union(ControlCapabilities::CAN_CLICK)
            .union(ControlCapabilities::CAN_SCROLL),
        defaults: &[("textSupport", Bool(true))],
    },
    BaseBehavior {
        control_type: "WTYPE_TABCTRL",
        category: "tab",
        capabilities: ControlCapabilities::CAN_CLICK
            .union(ControlCapabilities::CAN_FOCUS)
            .union(ControlCapabilities::IS_CONTAINER),
        defaults: &[("hasTabs", Bool(true))],
    },
    BaseBehavior {
        control_type: "WTYPE_TREECTRL",
        category: "tree",
        capabilities: ControlCapabilities::CAN_FOCUS
            .union(ControlCapabilities::CAN_SELECT_ITEMS)
            .union(ControlCapabilities::CAN_SCROLL)
            .union(ControlCapabilities::CAN_TOGGLE),
        defaults: &[("multiSelect", Bool(false))],
    },
    BaseBehavior {
        control_type: "WTYPE_GROUPBOX",
        category: "groupbox",
        capabilities: ControlCapabilities::IS_CONTAINER,
        defaults: &[("textSupport", Bool(true))],
    },
    BaseBehavior {
        control_type: "WTYPE_CUSTOM",
        category: "custom",
        capabilities: ControlCapabilities::CUSTOM_BEHAVIOR,
        defaults: &[],
    },
];

pub fn base_behavior(control_type: &str) -> Option<&'static BaseBehavior> {
    BASE_BEHAVIORS.iter().find(|b| b.control_type == control_type)
}

/// Behavior of one control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlBehavior {
    pub control_type: String,
    pub category: String,
    pub capabilities: ControlCapabilities,
    /// Type defaults, overlaid with the semantic attributes of the matched
    /// flags.
    pub attributes: Map<String, Value>,
}

/// Window tags in a fixed order: base behavior, frame and caption, title
/// buttons, visibility.
pub fn window_tags(window_name: &str, resolved: &ResolvedMask, window_flags: &FlagTable) -> Vec<&'static str> {
    let style = resolved.mask;
    let has = |name: &str| window_flags.get(name).map_or(false, |bits| style & bits != 0);
    let mut tags = Vec::new();

    for (flag, tag) in [
        ("WBS_MOVE", "movable"),
        ("WBS_MODAL", "modal"),
        ("WBS_CHILD", "is_child"),
        ("WBS_TOPMOST", "always_on_top"),
    ] {
        if has(flag) {
            tags.push(tag);
        }
    }

    if has("WBS_THICKFRAME") || has("WBS_RESIZEABLE") {
        tags.push("resizable");
    }
    tags.push(if has("WBS_CAPTION") { "has_caption" } else { "no_caption" });
    tags.push(if has("WBS_NOFRAME") { "no_frame" } else { "has_frame" });

    // One bit, two meanings: NOCENTER on HUD windows, NOCLOSE elsewhere
    let context_bit = has("WBS_NOCENTER") || has("WBS_NOCLOSE");
    let is_hud = HUD_WINDOWS.iter().any(|hud| hud.eq_ignore_ascii_case(window_name));
    if is_hud {
        if context_bit {
            tags.push("no_center");
        }
    } else if !context_bit {
        tags.push("has_close");
    }

    for (flag, tag) in [
        ("WBS_HELP", "has_help"),
        ("WBS_PIN", "has_pin"),
        ("WBS_VIEW", "has_view"),
        ("WBS_EXTENSION", "has_extension"),
        ("WBS_MINIMIZEBOX", "has_minimize"),
        ("WBS_MAXIMIZEBOX", "has_maximize"),
        ("WBS_VISIBLE", "visible"),
    ] {
        if has(flag) {
            tags.push(tag);
        }
    }

    log::debug!("Window {} ({}): {}", window_name, format_hex(resolved.mask), tags.join(", "));
    tags
}

/// Category, capabilities and attributes of a control type with a
/// resolved mask.
pub fn control_behavior(control_type: &str, resolved: &ResolvedMask) -> ControlBehavior {
    let base = base_behavior(control_type);
    let mut attributes = Map::new();

    if let Some(base) = base {
        for (key, attr) in base.defaults {
            attributes.insert(key.to_string(), attr.to_value());
        }
    }
    for flag in &resolved.matched_flag_names {
        if let Some(entry) = semantics::lookup(flag) {
            for (key, attr) in entry.attributes {
                attributes.insert(key.to_string(), attr.to_value());
            }
        }
    }
    attributes.insert("enabled".to_string(), Value::Bool(true));
    attributes.insert("visible".to_string(), Value::Bool(true));

    ControlBehavior {
        control_type: control_type.to_string(),
        category: base.map_or(UNKNOWN_CATEGORY, |b| b.category).to_string(),
        capabilities: base.map_or(ControlCapabilities::empty(), |b| b.capabilities),
        attributes,
    }
}
