//! Core types shared by the flag engine

use crate::normalizer::{format_hex, format_stored_hex, parse_stored_hex};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Control styles live in the low word of a 32-bit mask.
pub const LOW_WORD_MASK: u32 = 0x0000_FFFF;
/// Window styles live in the high word of a 32-bit mask.
pub const HIGH_WORD_MASK: u32 = 0xFFFF_0000;

/// Symbol namespace a `#define` is routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    WindowFlag,
    ControlFlag,
    WindowType,
    Unknown,
}

impl Namespace {
    pub fn label(&self) -> &'static str {
        match self {
            Self::WindowFlag => "WindowFlags",
            Self::ControlFlag => "ControlFlags",
            Self::WindowType => "WindowTypes",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    pub name: String,
    pub value: u32,
    pub namespace: Namespace,
}

impl FlagDefinition {
    pub fn raw_value(&self) -> String {
        format_hex(self.value)
    }
}

/// Ordered name → value table for one namespace. Names are unique; insertion
/// order is kept until `sort_case_insensitive` is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagTable {
    entries: Vec<(String, u32)>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in pairs {
            table.insert(name, value);
        }
        table
    }

    /// Insert or replace. Returns the previous value if the name existed.
    pub fn insert(&mut self, name: impl Into<String>, value: u32) -> Option<u32> {
        let name = name.into();
        match self.position(&name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Insert only if absent. Returns true when the entry was added.
    pub fn insert_if_absent(&mut self, name: &str, value: u32) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), value));
        true
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.position(name).map(|i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// OR of every value in the table.
    pub fn known_bits(&self) -> u32 {
        self.entries.iter().fold(0, |acc, (_, value)| acc | value)
    }

    pub fn definitions(&self, namespace: Namespace) -> Vec<FlagDefinition> {
        self.entries
            .iter()
            .map(|(name, value)| FlagDefinition {
                name: name.clone(),
                value: *value,
                namespace,
            })
            .collect()
    }

    /// Sort by name ignoring ASCII case; exact-case order breaks ties so the
    /// result is deterministic.
    pub fn sort_case_insensitive(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| compare_case_insensitive(a, b));
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

pub fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| a.cmp(b))
}

impl Serialize for FlagTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, &format_stored_hex(*value))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FlagTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = FlagTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of symbol names to hex strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FlagTable, A::Error> {
                let mut table = FlagTable::new();
                while let Some((name, value)) = access.next_entry::<String, serde_json::Value>()? {
                    let parsed = match &value {
                        serde_json::Value::String(text) => parse_stored_hex(text),
                        serde_json::Value::Number(n) => n.as_u64().map(|v| v as u32),
                        _ => None,
                    };
                    match parsed {
                        Some(v) => {
                            table.insert(name, v);
                        }
                        None => log::warn!("Ignoring invalid flag value: {} = {}", name, value),
                    }
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
