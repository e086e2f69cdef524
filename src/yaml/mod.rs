//! YAML value model
//!
//! A small, closed data model for the subset of YAML that pipeline files
//! need: scalars, ordered lists and insertion-ordered maps with scalar keys.
//! Domain types convert themselves into this model through [`YamlExport`],
//! and [`Yaml::to_yaml_string`] renders it as text.

mod builder;
mod render;

pub use builder::{MapBuilder, yaml_map};

use crate::pipeline::errors::ValidationError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A node of a YAML document.
#[derive(Debug, Clone, PartialEq)]
pub enum Yaml {
    /// A string scalar.
    String(String),
    /// An integer scalar.
    Integer(i64),
    /// A floating-point scalar.
    Float(f64),
    /// A boolean scalar.
    Bool(bool),
    /// The `null` scalar.
    Null,
    /// An ordered sequence.
    List(Vec<Yaml>),
    /// An insertion-ordered mapping.
    Map(Mapping),
}

impl Yaml {
    /// Returns true for string, number, boolean and null nodes.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !self.is_collection()
    }

    /// Returns true for lists and maps.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns the string content of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the entries of a map node.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Map(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Returns the children of a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Yaml]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a string key in a map node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Yaml> {
        self.as_mapping().and_then(|mapping| mapping.get(key))
    }
}

impl fmt::Display for Yaml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_yaml_string())
    }
}

/// An insertion-ordered map with unique scalar keys.
///
/// Keys are compared structurally, floats by bit pattern. Inserting an
/// existing key replaces its value but keeps its position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(Yaml, Yaml)>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pair, returning the value previously stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonScalarKey`] if `key` is a list or a map.
    pub fn insert(&mut self, key: Yaml, value: Yaml) -> Result<Option<Yaml>, ValidationError> {
        if key.is_collection() {
            return Err(ValidationError::NonScalarKey {
                key: key.to_yaml_string().trim_end().to_string(),
            });
        }

        match self.entries.iter_mut().find(|(k, _)| same_key(k, &key)) {
            Some((_, existing)) => Ok(Some(std::mem::replace(existing, value))),
            None => {
                self.entries.push((key, value));
                Ok(None)
            }
        }
    }

    /// Inserts a pair with a string key.
    pub fn insert_str(&mut self, key: impl Into<String>, value: impl Into<Yaml>) -> Option<Yaml> {
        let key = Yaml::String(key.into());
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Looks up the value stored under a string key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Yaml> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Returns true if a string key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Yaml, &Yaml)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Yaml> {
        self.entries.iter().map(|(k, _)| k)
    }
}

fn same_key(a: &Yaml, b: &Yaml) -> bool {
    match (a, b) {
        (Yaml::Float(x), Yaml::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

impl Serialize for Yaml {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(value) => serializer.serialize_str(value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Null => serializer.serialize_unit(),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(mapping) => mapping.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Types that can describe themselves as a [`Yaml`] node.
///
/// Every pipeline entity implements this; the serializer only ever sees
/// the resulting tree.
pub trait YamlExport {
    /// Converts `self` into a YAML node.
    fn to_yaml(&self) -> Yaml;
}

impl YamlExport for Yaml {
    fn to_yaml(&self) -> Yaml {
        self.clone()
    }
}

impl<T: YamlExport + ?Sized> YamlExport for &T {
    fn to_yaml(&self) -> Yaml {
        (**self).to_yaml()
    }
}
