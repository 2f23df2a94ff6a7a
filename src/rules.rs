//! Per-namespace flag rule documents
//!
//! A rule document maps a symbol to an optional authored rule. Generation
//! only ever fills empty slots: an entry that exists, whether generated or
//! written by hand, is never replaced or removed. Running
//! generate → extend → auto-fill again on the same input is a no-op.
//!
//! Two on-disk shapes exist in the wild, `{"set": {...}}` written by the
//! semantic auto-fill and `{"valid": [...], "exclusive": {...}}` written by
//! the rule generator. Both are read into `FlagRule`; one combined shape is
//! written back.

use crate::error::{FlagError, Result};
use crate::semantics;
use crate::types::{FlagTable, Namespace};
use serde_json::{Map, Value};

/// Context name meaning "any type without a more specific entry".
pub const DEFAULT_CONTEXT: &str = "Default";

/// Flag families where at most one member may be set.
pub const EXCLUSIVE_FAMILIES: &[&[&str]] = &[
    &["WBS_NOFRAME", "WBS_THICKFRAME"],
    &["WBS_HORI", "WBS_VERT"],
    &["EBS_LEFT", "EBS_CENTER", "EBS_RIGHT"],
    &["ES_LEFT", "ES_CENTER", "ES_RIGHT"],
    &["SS_LEFT", "SS_CENTER", "SS_RIGHT"],
];

/// Authored content of one rule entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagRule {
    /// Type names (or `Default`) the flag is legal on. For context-keyed
    /// entries such as `Default` this lists flag names instead.
    pub valid: Vec<String>,
    /// Exclusivity map: flag name → flags it conflicts with.
    pub exclusive: Vec<(String, Vec<String>)>,
    /// Semantic attributes (`role`, `toggle`, `align`, ...).
    pub attributes: Map<String, Value>,
    /// Keys this crate does not interpret; written back untouched.
    pub extra: Map<String, Value>,
}

impl FlagRule {
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.exclusive.is_empty() && self.attributes.is_empty() && self.extra.is_empty()
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut rule = FlagRule::default();

        for (key, value) in object {
            match (key.as_str(), value) {
                ("set", Value::Object(attrs)) => {
                    for (k, v) in attrs {
                        rule.attributes.insert(k.clone(), v.clone());
                    }
                }
                ("valid", Value::Array(items)) => {
                    for name in items.iter().filter_map(Value::as_str) {
                        push_unique(&mut rule.valid, name);
                    }
                }
                ("valid", Value::String(name)) => push_unique(&mut rule.valid, name),
                ("exclusive", Value::Array(items)) => {
                    for name in items.iter().filter_map(Value::as_str) {
                        rule.add_exclusive(name, &[]);
                    }
                }
                ("exclusive", Value::Object(map)) => {
                    for (name, partners) in map {
                        let partners: Vec<&str> = match partners {
                            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
                            Value::String(s) => vec![s.as_str()],
                            _ => Vec::new(),
                        };
                        rule.add_exclusive(name, &partners);
                    }
                }
                _ => {
                    rule.extra.insert(key.clone(), value.clone());
                }
            }
        }

        rule
    }

    fn add_exclusive(&mut self, name: &str, partners: &[&str]) {
        let index = match self.exclusive.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.exclusive.push((name.to_string(), Vec::new()));
                self.exclusive.len() - 1
            }
        };
        for partner in partners {
            push_unique(&mut self.exclusive[index].1, partner);
        }
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        if !self.valid.is_empty() {
            object.insert("valid".to_string(), Value::from(self.valid.clone()));
        }
        if !self.exclusive.is_empty() {
            let exclusive: Map<String, Value> = self
                .exclusive
                .iter()
                .map(|(name, partners)| (name.clone(), Value::from(partners.clone())))
                .collect();
            object.insert("exclusive".to_string(), Value::Object(exclusive));
        }
        if !self.attributes.is_empty() {
            object.insert("set".to_string(), Value::Object(self.attributes.clone()));
        }
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// One document slot: a symbol and its rule, if any has been authored.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSlot {
    pub flag_name: String,
    pub rule: Option<FlagRule>,
    /// Hand-written entry that is not an object. Kept verbatim and never
    /// filled.
    pub raw: Option<Value>,
}

impl RuleSlot {
    fn blank(flag_name: impl Into<String>) -> Self {
        Self {
            flag_name: flag_name.into(),
            rule: None,
            raw: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleDocument {
    slots: Vec<RuleSlot>,
}

impl RuleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document from its JSON form. `null` and `{}` are blank slots;
    /// any other non-object entry is carried through unchanged.
    pub fn from_value(value: &Value, origin: &str) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| FlagError::invalid_format(origin, "rule document root must be an object"))?;

        let mut document = RuleDocument::new();
        for (name, entry) in root {
            let mut slot = RuleSlot::blank(name.clone());
            match entry {
                Value::Object(object) if object.is_empty() => {}
                Value::Object(object) => slot.rule = Some(FlagRule::from_object(object)),
                Value::Null => {}
                other => {
                    log::warn!("{}: rule for {} is not an object; kept as written", origin, name);
                    slot.raw = Some(other.clone());
                }
            }
            document.slots.push(slot);
        }
        Ok(document)
    }

    /// Canonical JSON form.
    pub fn to_value(&self) -> Value {
        let object: Map<String, Value> = self
            .slots
            .iter()
            .map(|slot| {
                let value = match (&slot.raw, &slot.rule) {
                    (Some(raw), _) => raw.clone(),
                    (None, Some(rule)) => rule.to_value(),
                    (None, None) => Value::Object(Map::new()),
                };
                (slot.flag_name.clone(), value)
            })
            .collect();
        Value::Object(object)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[RuleSlot] {
        &self.slots
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.flag_name == name)
    }

    pub fn rule(&self, name: &str) -> Option<&FlagRule> {
        self.slots
            .iter()
            .find(|s| s.flag_name == name)
            .and_then(|s| s.rule.as_ref())
    }

    /// Flags allowed on `type_name`. Uses entries naming the type directly
    /// and falls back to `Default` when nothing names it.
    pub fn allowed_flags(&self, type_name: &str) -> Vec<String> {
        let direct = self.flags_for_context(type_name);
        if !direct.is_empty() || type_name == DEFAULT_CONTEXT {
            return direct;
        }
        self.flags_for_context(DEFAULT_CONTEXT)
    }

    fn flags_for_context(&self, context: &str) -> Vec<String> {
        let mut flags = Vec::new();
        for slot in &self.slots {
            let rule = match &slot.rule {
                Some(rule) => rule,
                None => continue,
            };
            if slot.flag_name == context {
                for name in &rule.valid {
                    push_unique(&mut flags, name);
                }
            } else if !is_context_key(&slot.flag_name) && rule.valid.iter().any(|c| c == context) {
                push_unique(&mut flags, &slot.flag_name);
            }
        }
        flags
    }

    /// Every flag that `flag` conflicts with, collected from its own entry
    /// and from any exclusivity map that mentions it.
    pub fn exclusive_with(&self, flag: &str) -> Vec<String> {
        let mut result = Vec::new();
        for slot in &self.slots {
            let rule = match &slot.rule {
                Some(rule) => rule,
                None => continue,
            };
            let flag_slot = !is_context_key(&slot.flag_name);
            for (name, partners) in &rule.exclusive {
                if flag_slot && slot.flag_name == flag {
                    push_unique(&mut result, name);
                }
                if name == flag {
                    if flag_slot {
                        push_unique(&mut result, &slot.flag_name);
                    }
                    for partner in partners {
                        push_unique(&mut result, partner);
                    }
                } else if partners.iter().any(|p| p == flag) {
                    push_unique(&mut result, name);
                }
            }
        }
        result.retain(|name| name != flag);
        result
    }

    /// Pairs of mutually exclusive flags that are present together.
    pub fn conflicts(&self, flags: &[String]) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, flag) in flags.iter().enumerate() {
            let excluded = self.exclusive_with(flag);
            for other in &flags[i + 1..] {
                if excluded.contains(other) {
                    pairs.push((flag.clone(), other.clone()));
                }
            }
        }
        pairs
    }
}

pub struct RuleRepository {
    namespace: Namespace,
}

impl RuleRepository {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace }
    }

    /// Fresh document: a `Default` context entry listing every known flag
    /// (window documents only take `WBS_` names) with the exclusivity
    /// families whose members are all known, then one blank slot per flag.
    pub fn generate(&self, table: &FlagTable) -> RuleDocument {
        let mut default_rule = FlagRule::default();
        for name in table.names() {
            if self.namespace != Namespace::WindowFlag || name.starts_with("WBS_") {
                push_unique(&mut default_rule.valid, name);
            }
        }
        for family in EXCLUSIVE_FAMILIES {
            if !family.iter().all(|name| table.contains(name)) {
                continue;
            }
            for name in family.iter() {
                let others: Vec<&str> = family.iter().copied().filter(|other| other != name).collect();
                default_rule.add_exclusive(name, &others);
            }
        }

        let mut default_slot = RuleSlot::blank(DEFAULT_CONTEXT);
        if !default_rule.is_empty() {
            default_slot.rule = Some(default_rule);
        }
        let mut slots = vec![default_slot];
        slots.extend(table.names().map(RuleSlot::blank));

        let document = RuleDocument { slots };
        log::info!("Generated {} rule document ({} flags)", self.namespace, table.len());
        document
    }

    /// Append a blank slot for every known flag the document lacks.
    /// Returns the number of slots added.
    pub fn extend(&self, document: &mut RuleDocument, table: &FlagTable) -> usize {
        let mut added = 0;
        for name in table.names() {
            if !document.contains(name) {
                document.slots.push(RuleSlot::blank(name));
                added += 1;
            }
        }
        if added > 0 {
            log::info!("Extended {} rule document with {} flags", self.namespace, added);
        }
        added
    }

    /// Copy dictionary attributes into slots that lack them. Authored
    /// attributes always win. Returns the number of attributes inserted.
    pub fn auto_fill_semantics(&self, document: &mut RuleDocument) -> usize {
        let mut inserted = 0;
        for slot in &mut document.slots {
            if slot.raw.is_some() {
                continue;
            }
            let entry = match semantics::lookup(&slot.flag_name) {
                Some(entry) => entry,
                None => continue,
            };
            let rule = slot.rule.get_or_insert_with(FlagRule::default);
            for (key, attr) in entry.attributes {
                if !rule.attributes.contains_key(*key) {
                    rule.attributes.insert(key.to_string(), attr.to_value());
                    inserted += 1;
                }
            }
        }
        if inserted > 0 {
            log::info!("Auto-filled {} semantic attributes into {} rules", inserted, self.namespace);
        }
        inserted
    }

    /// generate-or-extend followed by auto-fill.
    pub fn ensure(&self, existing: Option<RuleDocument>, table: &FlagTable) -> RuleDocument {
        let mut document = match existing {
            Some(mut document) => {
                self.extend(&mut document, table);
                document
            }
            None => self.generate(table),
        };
        self.auto_fill_semantics(&mut document);
        document
    }
}

fn is_context_key(name: &str) -> bool {
    name == DEFAULT_CONTEXT || name.starts_with(crate::classifier::WINDOW_TYPE_PREFIX)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}
