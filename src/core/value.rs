//! Active-state snapshots.
//!
//! A [`StateValue`] mirrors the active path(s) through a state tree. In
//! human-readable formats it serializes the way people write it by hand
//! (`"idle"` or `{ "fast": "on", "light": "red" }`); binary formats get an
//! explicitly tagged form since they cannot guess between the two shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which states are active.
///
/// # Example
///
/// ```rust
/// use statetree::core::StateValue;
///
/// let value: StateValue = serde_json::from_str(r#"{ "fast": "on", "light": "red" }"#).unwrap();
/// assert_eq!(value.get("fast"), Some(&StateValue::leaf("on")));
/// assert_eq!(serde_json::to_string(&StateValue::leaf("idle")).unwrap(), r#""idle""#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateValue {
    /// Key of the active atomic child.
    Leaf(String),
    /// Active child keys mapped to their own values.
    Nested(IndexMap<String, StateValue>),
}

impl StateValue {
    pub fn leaf(key: impl Into<String>) -> Self {
        Self::Leaf(key.into())
    }

    /// The empty mapping, produced for a machine whose root is atomic.
    pub fn empty() -> Self {
        Self::Nested(IndexMap::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Nested(entries) if entries.is_empty())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Self::Leaf(key) => Some(key),
            Self::Nested(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        match self {
            Self::Leaf(_) => None,
            Self::Nested(entries) => entries.get(key),
        }
    }

    /// Active paths down to each leaf, joined with `delimiter`.
    pub fn paths(&self, delimiter: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", delimiter, &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, delimiter: &str, out: &mut Vec<String>) {
        match self {
            Self::Leaf(key) => out.push(format!("{prefix}{delimiter}{key}")),
            Self::Nested(entries) if entries.is_empty() => {
                if !prefix.is_empty() {
                    out.push(prefix.to_string());
                }
            }
            Self::Nested(entries) => {
                for (key, value) in entries {
                    value.collect_paths(&format!("{prefix}{delimiter}{key}"), delimiter, out);
                }
            }
        }
    }
}

impl From<&str> for StateValue {
    fn from(key: &str) -> Self {
        Self::leaf(key)
    }
}

impl FromIterator<(String, StateValue)> for StateValue {
    fn from_iter<I: IntoIterator<Item = (String, StateValue)>>(iter: I) -> Self {
        Self::Nested(iter.into_iter().collect())
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(key) => f.write_str(key),
            Self::Nested(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename = "StateValue")]
enum TaggedRef<'a> {
    Leaf(&'a str),
    Nested(&'a IndexMap<String, StateValue>),
}

#[derive(Deserialize)]
#[serde(rename = "StateValue")]
enum Tagged {
    Leaf(String),
    Nested(IndexMap<String, StateValue>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Untagged {
    Leaf(String),
    Nested(IndexMap<String, StateValue>),
}

impl Serialize for StateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            match self {
                Self::Leaf(key) => serializer.serialize_str(key),
                Self::Nested(entries) => entries.serialize(serializer),
            }
        } else {
            let tagged = match self {
                Self::Leaf(key) => TaggedRef::Leaf(key),
                Self::Nested(entries) => TaggedRef::Nested(entries),
            };
            tagged.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for StateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            Ok(match Untagged::deserialize(deserializer)? {
                Untagged::Leaf(key) => Self::Leaf(key),
                Untagged::Nested(entries) => Self::Nested(entries),
            })
        } else {
            Ok(match Tagged::deserialize(deserializer)? {
                Tagged::Leaf(key) => Self::Leaf(key),
                Tagged::Nested(entries) => Self::Nested(entries),
            })
        }
    }
}
