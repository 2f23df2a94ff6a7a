//! Numeric literal normalization for `#define` right-hand sides
//!
//! Legacy headers spell flag values in several ways: `0x00020000L`,
//! `(1 << 4)`, `0x10 | 0x20`, `0x100 + 4`, or plain decimal. Everything is
//! reduced to a 32-bit value and the canonical `0xHHHHHHHH` spelling.

use crate::error::{FlagError, Result};
use regex::Regex;

/// Result of normalizing one literal. Unparseable input produces the zero
/// sentinel together with a warning message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub value: u32,
    pub warning: Option<String>,
}

impl Normalized {
    pub fn canonical(&self) -> String {
        format_hex(self.value)
    }

    pub fn is_sentinel(&self) -> bool {
        self.warning.is_some()
    }
}

pub struct LiteralNormalizer {
    shift_regex: Regex,
}

impl LiteralNormalizer {
    pub fn new() -> Self {
        Self {
            shift_regex: Regex::new(r"^\(?\s*1\s*<<\s*(\d+)\s*\)?$").unwrap(),
        }
    }

    /// Normalize a literal, never failing. Problems are logged and reported
    /// through `Normalized::warning`.
    pub fn normalize(&self, raw: &str) -> Normalized {
        match self.parse_literal(raw) {
            Ok(value) => Normalized { value, warning: None },
            Err(e) => {
                log::warn!("{}", e);
                Normalized {
                    value: 0,
                    warning: Some(e.to_string()),
                }
            }
        }
    }

    /// Evaluate a literal to its 32-bit value.
    ///
    /// Recognition order is shift, bitwise OR, sum, hex, decimal. Values
    /// wider than 32 bits are truncated and sums wrap, matching what the
    /// legacy client compiler produced.
    pub fn parse_literal(&self, raw: &str) -> Result<u32> {
        let literal = strip_enclosing_parens(strip_suffix(raw.trim()));
        if literal.is_empty() {
            return Err(FlagError::unparseable(raw, "empty literal"));
        }

        if let Some(shift) = self.parse_shift(literal, raw)? {
            return Ok(shift);
        }

        if literal.contains('|') {
            let mut value = 0u32;
            for term in literal.split('|') {
                value |= self.parse_term(term, raw)?;
            }
            return Ok(value);
        }

        if literal.contains('+') {
            let mut value = 0u32;
            for term in literal.split('+') {
                value = value.wrapping_add(self.parse_term(term, raw)?);
            }
            return Ok(value);
        }

        self.parse_term(literal, raw)
    }

    fn parse_shift(&self, literal: &str, raw: &str) -> Result<Option<u32>> {
        let captures = match self.shift_regex.captures(literal) {
            Some(c) => c,
            None => return Ok(None),
        };

        let amount: u32 = captures[1]
            .parse()
            .map_err(|_| FlagError::unparseable(raw, "shift amount out of range"))?;

        1u32.checked_shl(amount)
            .map(Some)
            .ok_or_else(|| FlagError::unparseable(raw, format!("shift by {} exceeds 32 bits", amount)))
    }

    fn parse_term(&self, term: &str, raw: &str) -> Result<u32> {
        let term = strip_enclosing_parens(strip_suffix(term.trim()));

        if let Some(shift) = self.parse_shift(term, raw)? {
            return Ok(shift);
        }

        let wide = if let Some(digits) = strip_hex_prefix(term) {
            if digits.is_empty() {
                return Err(FlagError::unparseable(raw, "hex prefix without digits"));
            }
            u64::from_str_radix(digits, 16)
                .map_err(|e| FlagError::unparseable(raw, format!("invalid hex term '{}': {}", term, e)))?
        } else if !term.is_empty() && term.bytes().all(|b| b.is_ascii_digit()) {
            term.parse::<u64>()
                .map_err(|e| FlagError::unparseable(raw, format!("invalid decimal term '{}': {}", term, e)))?
        } else {
            return Err(FlagError::unparseable(raw, format!("unsupported term '{}'", term)));
        };

        Ok(wide as u32)
    }
}

impl Default for LiteralNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical spelling used in memory and in diagnostics.
pub fn format_hex(value: u32) -> String {
    format!("0x{:08X}", value)
}

/// Spelling used in the persisted flag tables (`0X` prefix, as the legacy
/// tool wrote them).
pub fn format_stored_hex(value: u32) -> String {
    format!("0X{:08X}", value)
}

/// Parse a value read back from a persisted table. Values there are always
/// hexadecimal, with or without prefix, optionally carrying an `L` suffix.
pub fn parse_stored_hex(text: &str) -> Option<u32> {
    let trimmed = text.trim().trim_end_matches(['l', 'L']);
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok().map(|v| v as u32)
}

fn strip_suffix(text: &str) -> &str {
    text.trim_end_matches(['l', 'L', 'u', 'U']).trim_end()
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

/// Remove parentheses that wrap the entire expression, e.g. `((0x10))`.
/// `(1)|(2)` is left alone because its first paren closes early.
fn strip_enclosing_parens(mut text: &str) -> &str {
    while text.starts_with('(') && text.ends_with(')') && text.len() >= 2 {
        let mut depth = 0i32;
        let mut wraps = true;
        for (i, ch) in text.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 && i != text.len() - 1 {
                        wraps = false;
                        break;
                    }
                }
                _ => {}
            }
        }
        if !wraps || depth != 0 {
            break;
        }
        text = text[1..text.len() - 1].trim();
    }
    text
}
