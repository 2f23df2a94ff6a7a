//! Mask → flag names, with repair of the legacy shift defect on windows
//!
//! Window flags sit in the high word of a mask and control flags in the
//! low word. Old exporters sometimes wrote window bits into the low word.
//! Any window mask with a non-zero low word is treated as such a record:
//! the low word is moved up and OR-ed into the high word, and the original
//! low bits are dropped. A mask whose flags really were meant for the low
//! word cannot be told apart from a shifted one, so the repair is applied
//! unconditionally.

use crate::normalizer::format_hex;
use crate::types::{FlagTable, HIGH_WORD_MASK, LOW_WORD_MASK};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    Window,
    Control,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OwnerKind::Window => write!(f, "window"),
            OwnerKind::Control => write!(f, "control"),
        }
    }
}

/// Before/after masks of a shift repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftRepair {
    pub original: u32,
    pub repaired: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMask {
    pub owner_kind: OwnerKind,
    /// Mask as handed in, before any repair.
    pub raw_mask: u32,
    /// Mask the flags were matched against.
    pub mask: u32,
    pub matched_flag_names: Vec<String>,
    pub validity: bool,
    pub unknown_bits: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<ShiftRepair>,
}

impl ResolvedMask {
    pub fn unknown_hex(&self) -> String {
        format_hex(self.unknown_bits)
    }
}

/// Move low-word bits into the high word. Returns the repair if one was
/// needed; the mask is updated in place.
pub fn repair_shift(mask: &mut u32) -> Option<ShiftRepair> {
    let low = *mask & LOW_WORD_MASK;
    if low == 0 {
        return None;
    }
    let original = *mask;
    *mask = (original & HIGH_WORD_MASK) | (low << 16);
    Some(ShiftRepair {
        original,
        repaired: *mask,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BitmaskResolver;

impl BitmaskResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `mask` against `known`. Window masks are repaired in place.
    pub fn resolve(&self, kind: OwnerKind, mask: &mut u32, known: &FlagTable) -> ResolvedMask {
        let raw_mask = *mask;

        let (effective, repair) = match kind {
            OwnerKind::Window => {
                let repair = repair_shift(mask);
                if let Some(repair) = &repair {
                    log::info!(
                        "Repaired shifted window mask {} -> {}",
                        format_hex(repair.original),
                        format_hex(repair.repaired)
                    );
                }
                (*mask, repair)
            }
            OwnerKind::Control => (*mask & LOW_WORD_MASK, None),
        };

        let matched_flag_names = known
            .iter()
            .filter(|&(_, value)| effective & value == value)
            .map(|(name, _)| name.to_string())
            .collect();

        let unknown_bits = effective & !known.known_bits();
        let validity = match kind {
            OwnerKind::Control if effective == 0 => true,
            _ => unknown_bits == 0,
        };

        if unknown_bits != 0 {
            log::debug!("{} mask {} has unknown bits {}", kind, format_hex(effective), format_hex(unknown_bits));
        }

        ResolvedMask {
            owner_kind: kind,
            raw_mask,
            mask: effective,
            matched_flag_names,
            validity,
            unknown_bits,
            repair,
        }
    }

    /// Resolve without touching the caller's value.
    pub fn resolve_value(&self, kind: OwnerKind, mask: u32, known: &FlagTable) -> ResolvedMask {
        let mut mask = mask;
        self.resolve(kind, &mut mask, known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_mask_in_high_word() {
        let known = FlagTable::from_pairs(vec![("WBS_CHILD", 0x0002_0000)]);
        let mut mask = 0x0002_0000;
        let resolved = BitmaskResolver::new().resolve(OwnerKind::Window, &mut mask, &known);

        assert_eq!(resolved.matched_flag_names, vec!["WBS_CHILD"]);
        assert!(resolved.validity);
        assert_eq!(resolved.unknown_bits, 0);
        assert!(resolved.repair.is_none());
        assert_eq!(mask, 0x0002_0000);
    }

    #[test]
    fn test_shifted_window_mask_is_repaired() {
        let known = FlagTable::from_pairs(vec![("WBS_CHILD", 0x0002_0000)]);
        let mut mask = 0x0000_0164;
        let resolved = BitmaskResolver::new().resolve(OwnerKind::Window, &mut mask, &known);

        assert_eq!(mask, 0x0164_0000);
        assert_eq!(resolved.raw_mask, 0x0000_0164);
        assert_eq!(
            resolved.repair,
            Some(ShiftRepair {
                original: 0x0000_0164,
                repaired: 0x0164_0000
            })
        );
        assert!(!resolved.validity);
        assert_eq!(resolved.unknown_bits, 0x0164_0000);
        assert_eq!(resolved.unknown_hex(), "0x01640000");
    }

    #[test]
    fn test_repair_keeps_high_word_and_drops_low() {
        let mut mask = 0x8000_0002;
        let repair = repair_shift(&mut mask).unwrap();
        assert_eq!(mask, 0x8002_0000);
        assert_eq!(repair.original, 0x8000_0002);
        assert!(repair_shift(&mut mask).is_none());
    }

    #[test]
    fn test_control_uses_low_word_only() {
        let known = FlagTable::from_pairs(vec![("BS_PUSHBUTTON", 0x0), ("BS_CHECKBOX", 0x2), ("BS_VCENTER", 0x800)]);
        let resolver = BitmaskResolver::new();

        let resolved = resolver.resolve_value(OwnerKind::Control, 0xFFFF_0802, &known);
        assert_eq!(resolved.mask, 0x0802);
        assert_eq!(resolved.matched_flag_names, vec!["BS_PUSHBUTTON", "BS_CHECKBOX", "BS_VCENTER"]);
        assert!(resolved.validity);
        assert!(resolved.repair.is_none());

        let resolved = resolver.resolve_value(OwnerKind::Control, 0x0000_4002, &known);
        assert!(!resolved.validity);
        assert_eq!(resolved.unknown_bits, 0x4000);
    }

    #[test]
    fn test_zero_mask_asymmetry() {
        let resolver = BitmaskResolver::new();
        let empty = FlagTable::new();

        // A control with no low-word style is always valid
        let control = resolver.resolve_value(OwnerKind::Control, 0x0001_0000, &empty);
        assert!(control.validity);
        assert_eq!(control.unknown_bits, 0);

        // A window is only valid when no unknown high bits remain
        let window = resolver.resolve_value(OwnerKind::Window, 0x0001_0000, &empty);
        assert!(!window.validity);
        assert_eq!(window.unknown_bits, 0x0001_0000);
        assert!(resolver.resolve_value(OwnerKind::Window, 0, &empty).validity);
    }
}
