//! Ordered, multi-valued parameter set sent to the vendor API.
//!
//! # Design
//! `Params` keeps pairs in insertion order. Modifiers mutate it in place, so
//! the order in which a caller supplies them is observable: `set` overwrites
//! whatever an earlier modifier wrote for the same key, `append` adds another
//! value under a repeated key. Nothing is merged or deduplicated behind the
//! caller's back.
//!
//! The vendor encodes structured fields with bracketed keys
//! (`settings[phonegateway_enabled]`, `attendees[][email]`,
//! `registration[1]`). Those are built through the [`key`] helpers so call
//! sites never format brackets by hand.

use std::time::Duration;

/// An ordered multi-map of string keys to string values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair at the end, keeping any existing values for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Overwrite `key` with a single value.
    ///
    /// The first existing pair keeps its position and takes the new value;
    /// later pairs with the same key are dropped. Absent keys are appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || *k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key, value)),
        }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize as `application/x-www-form-urlencoded`, in pair order.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Builders for the vendor's bracketed field names.
pub mod key {
    use std::fmt::Display;

    /// `parent[child]`
    pub fn nested(parent: &str, child: impl Display) -> String {
        format!("{parent}[{child}]")
    }

    /// `parent[index]`, for fields the vendor addresses by position.
    pub fn indexed(parent: &str, index: usize) -> String {
        nested(parent, index)
    }

    /// `parent[][child]`, repeated once per value of a list field.
    pub fn repeated(parent: &str, child: &str) -> String {
        format!("{parent}[][{child}]")
    }
}

/// Booleans travel as `"1"` / `"0"`.
pub fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Durations travel as `H:M` where `M` is minutes-of-hour, unpadded.
pub fn duration(value: Duration) -> String {
    let secs = value.as_secs();
    format!("{}:{}", secs / 3600, (secs / 60) % 60)
}
