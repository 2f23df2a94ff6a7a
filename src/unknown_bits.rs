//! Report of control style bits no known flag explains

use crate::layout::WindowRecord;
use crate::normalizer::format_hex;
use crate::types::{FlagTable, LOW_WORD_MASK};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// control type → unknown-bits hex → identifying labels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownBitsReport {
    entries: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl UnknownBitsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, control_type: &str, mask_hex: String, label: String) {
        self.entries
            .entry(control_type.to_string())
            .or_default()
            .entry(mask_hex)
            .or_default()
            .insert(label);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct (type, mask) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn labels(&self, control_type: &str, mask_hex: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(control_type).and_then(|masks| masks.get(mask_hex))
    }

    pub fn control_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

struct MaskEntries<'a>(&'a BTreeMap<String, BTreeSet<String>>);

impl Serialize for MaskEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry<'a> {
            mask: &'a str,
            controls: &'a BTreeSet<String>,
        }

        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (mask, controls) in self.0 {
            seq.serialize_element(&Entry { mask, controls })?;
        }
        seq.end()
    }
}

impl Serialize for UnknownBitsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (control_type, masks) in &self.entries {
            map.serialize_entry(control_type, &MaskEntries(masks))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownBitsAggregator;

impl UnknownBitsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build a fresh report over every control of every window.
    pub fn aggregate(&self, windows: &[WindowRecord], control_flags: &FlagTable) -> UnknownBitsReport {
        let mut report = UnknownBitsReport::new();
        if windows.is_empty() || control_flags.is_empty() {
            return report;
        }

        let known_bits = control_flags.known_bits();
        for window in windows {
            for control in &window.controls {
                let low = control.flags & LOW_WORD_MASK;
                if low == 0 {
                    continue;
                }
                let unknown = low & !known_bits;
                if unknown == 0 {
                    continue;
                }
                let label = control.label(&window.name);
                log::debug!(
                    "Unknown control bits {} on {} ({})",
                    format_hex(unknown),
                    label,
                    control.control_type
                );
                report.record(&control.control_type, format_hex(unknown), label);
            }
        }

        if !report.is_empty() {
            log::info!("Unknown control bits in {} type/mask combinations", report.len());
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ControlRecord;
    use serde_json::json;

    fn known() -> FlagTable {
        FlagTable::from_pairs(vec![("BS_CHECKBOX", 0x0002), ("BS_VCENTER", 0x0800)])
    }

    #[test]
    fn test_aggregate_labels_by_priority() {
        let mut window = WindowRecord::new("Shop", "WTYPE_BASE", 0);

        let mut with_id = ControlRecord::new("WTYPE_BUTTON", 0x4002);
        with_id.id = "WIDC_BUY".to_string();
        let mut with_header = ControlRecord::new("WTYPE_BUTTON", 0x4000);
        with_header.raw_header = "  WIDC_SELL \t".to_string();
        let anonymous = ControlRecord::new("WTYPE_STATIC", 0x0101_0001);
        let clean = ControlRecord::new("WTYPE_BUTTON", 0x0802);
        let high_only = ControlRecord::new("WTYPE_BUTTON", 0xFFFF_0000);

        window.controls = vec![with_id, with_header, anonymous, clean, high_only];
        let report = UnknownBitsAggregator::new().aggregate(&[window], &known());

        assert_eq!(report.len(), 2);
        let labels: Vec<_> = report.labels("WTYPE_BUTTON", "0x00004000").unwrap().iter().cloned().collect();
        assert_eq!(labels, vec!["WIDC_BUY", "WIDC_SELL"]);
        assert!(report
            .labels("WTYPE_STATIC", "0x00000001")
            .unwrap()
            .contains("[Shop/WTYPE_STATIC]"));
    }

    #[test]
    fn test_report_serialization_shape() {
        let mut report = UnknownBitsReport::new();
        report.record("WTYPE_EDIT", "0x00001000".to_string(), "WIDC_B".to_string());
        report.record("WTYPE_EDIT", "0x00001000".to_string(), "WIDC_A".to_string());

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"WTYPE_EDIT": [{"mask": "0x00001000", "controls": ["WIDC_A", "WIDC_B"]}]})
        );
    }

    #[test]
    fn test_empty_inputs_give_empty_report() {
        let mut window = WindowRecord::new("W", "WTYPE_BASE", 0);
        window.controls.push(ControlRecord::new("WTYPE_BUTTON", 0x4000));

        assert!(UnknownBitsAggregator::new().aggregate(&[], &known()).is_empty());
        assert!(UnknownBitsAggregator::new()
            .aggregate(&[window], &FlagTable::new())
            .is_empty());
    }
}
