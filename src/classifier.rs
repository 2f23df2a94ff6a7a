//! Prefix based routing of `#define` symbols into namespaces

use crate::types::Namespace;

/// Window style prefixes, checked first. Order matters: a more specific
/// prefix has to come before any looser one it overlaps with.
pub const WINDOW_PREFIXES: &[&str] = &["WBS_", "WSS_", "WCS_", "WVS_", "WFS_", "WNS_", "WMS_"];

/// Control style prefixes, checked after the window list.
pub const CONTROL_PREFIXES: &[&str] = &[
    "WLVS_", "WTVS_", "LVS_", "TVS_", "BS_", "EBS_", "ES_", "CBS_", "LBS_", "SBS_", "TBS_", "MBS_", "RBS_",
    "TCS_", "PBS_", "GBS_", "FBS_", "HBS_", "DBS_", "UBS_", "KBS_", "SS_",
];

/// Prefix marking window type enumerators.
pub const WINDOW_TYPE_PREFIX: &str = "WTYPE_";

#[derive(Debug, Clone)]
pub struct PrefixClassifier {
    window_prefixes: Vec<String>,
    control_prefixes: Vec<String>,
}

impl PrefixClassifier {
    pub fn new() -> Self {
        Self {
            window_prefixes: WINDOW_PREFIXES.iter().map(|p| p.to_string()).collect(),
            control_prefixes: CONTROL_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Build a classifier from explicit ordered lists.
    pub fn with_prefixes(window_prefixes: Vec<String>, control_prefixes: Vec<String>) -> Self {
        Self {
            window_prefixes,
            control_prefixes,
        }
    }

    /// Append extra prefixes after the built-in ones.
    pub fn extend(&mut self, window: &[String], control: &[String]) {
        for prefix in window {
            if !self.window_prefixes.contains(prefix) {
                self.window_prefixes.push(prefix.clone());
            }
        }
        for prefix in control {
            if !self.control_prefixes.contains(prefix) {
                self.control_prefixes.push(prefix.clone());
            }
        }
    }

    /// Route a symbol. First matching prefix wins, window list before
    /// control list; `WTYPE_` names are window types, anything else is
    /// unknown.
    pub fn classify(&self, name: &str) -> Namespace {
        if self.window_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return Namespace::WindowFlag;
        }
        if self.control_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            return Namespace::ControlFlag;
        }
        if name.starts_with(WINDOW_TYPE_PREFIX) {
            return Namespace::WindowType;
        }
        Namespace::Unknown
    }

    /// First matching prefix in evaluation order, if any.
    pub fn matching_prefix(&self, name: &str) -> Option<&str> {
        self.window_prefixes
            .iter()
            .chain(self.control_prefixes.iter())
            .find(|p| name.starts_with(p.as_str()))
            .map(|p| p.as_str())
    }
}

impl Default for PrefixClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_routing() {
        let classifier = PrefixClassifier::new();
        let test_cases = vec![
            ("WBS_CAPTION", Namespace::WindowFlag),
            ("WSS_SOMETHING", Namespace::WindowFlag),
            ("BS_PUSHBUTTON", Namespace::ControlFlag),
            ("EBS_READONLY", Namespace::ControlFlag),
            ("WLVS_REPORT", Namespace::ControlFlag),
            ("SS_CENTER", Namespace::ControlFlag),
            ("WTYPE_BUTTON", Namespace::WindowType),
            ("APP_INVENTORY", Namespace::Unknown),
            ("", Namespace::Unknown),
            ("wbs_caption", Namespace::Unknown),
        ];

        for (name, expected) in test_cases {
            assert_eq!(classifier.classify(name), expected, "Failed for symbol: '{}'", name);
        }
    }

    #[test]
    fn test_window_list_wins_over_control_list() {
        // The same prefix registered in both lists resolves to the window namespace
        let classifier = PrefixClassifier::with_prefixes(vec!["XS_".into()], vec!["XS_".into()]);
        assert_eq!(classifier.classify("XS_FLAG"), Namespace::WindowFlag);
    }

    #[test]
    fn test_first_match_in_order() {
        let classifier =
            PrefixClassifier::with_prefixes(vec!["WBS_EX_".into(), "WBS_".into()], vec![]);
        assert_eq!(classifier.matching_prefix("WBS_EX_LAYERED"), Some("WBS_EX_"));
        assert_eq!(classifier.matching_prefix("WBS_CHILD"), Some("WBS_"));
        assert_eq!(classifier.matching_prefix("BS_LEFT"), None);
    }

    #[test]
    fn test_extend_appends_without_duplicates() {
        let mut classifier = PrefixClassifier::new();
        classifier.extend(&["WXS_".to_string(), "WBS_".to_string()], &["QBS_".to_string()]);
        assert_eq!(classifier.classify("WXS_FOO"), Namespace::WindowFlag);
        assert_eq!(classifier.classify("QBS_FOO"), Namespace::ControlFlag);
        assert_eq!(classifier.window_prefixes.iter().filter(|p| *p == "WBS_").count(), 1);
    }
}
