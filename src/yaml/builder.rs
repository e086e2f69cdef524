//! Conversions into [`Yaml`] and a small map-building helper

use super::{Mapping, Yaml, YamlExport};

impl From<&str> for Yaml {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Yaml {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Yaml {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i64> for Yaml {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Yaml {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for Yaml {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for Yaml {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Yaml {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Yaml {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Mapping> for Yaml {
    fn from(value: Mapping) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<Yaml>> From<Vec<T>> for Yaml {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Yaml>> From<Option<T>> for Yaml {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Yaml>> FromIterator<T> for Yaml {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Builds a [`Mapping`] one key at a time, skipping absent or empty values
/// on request.
///
/// ```
/// use gitlab_ci_dsl::yaml::{Yaml, yaml_map};
///
/// let node = yaml_map(|map| {
///     map.add("name", "docs");
///     map.add_opt("expire_in", None::<String>);
///     map.add_non_empty("paths", Vec::<String>::new());
/// });
///
/// assert_eq!(node.to_yaml_string(), "name: docs\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapBuilder {
    mapping: Mapping,
}

impl MapBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair unconditionally.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Yaml>) -> &mut Self {
        self.mapping.insert_str(key, value);
        self
    }

    /// Adds a pair only when `value` is present.
    pub fn add_opt<V: Into<Yaml>>(&mut self, key: impl Into<String>, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.mapping.insert_str(key, value);
        }
        self
    }

    /// Adds a list only when it has at least one element.
    pub fn add_non_empty<I, V>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Yaml>,
    {
        let items: Vec<Yaml> = values.into_iter().map(Into::into).collect();
        if !items.is_empty() {
            self.mapping.insert_str(key, Yaml::List(items));
        }
        self
    }

    /// Adds a nested mapping only when it has at least one pair.
    pub fn add_map_non_empty(&mut self, key: impl Into<String>, value: Mapping) -> &mut Self {
        if !value.is_empty() {
            self.mapping.insert_str(key, value);
        }
        self
    }

    /// Adds the YAML form of an exportable value.
    pub fn add_export(&mut self, key: impl Into<String>, value: &impl YamlExport) -> &mut Self {
        self.mapping.insert_str(key, value.to_yaml());
        self
    }

    /// Adds the YAML form of an exportable value when present.
    pub fn add_export_opt<T: YamlExport>(
        &mut self,
        key: impl Into<String>,
        value: Option<&T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.mapping.insert_str(key, value.to_yaml());
        }
        self
    }

    /// Adds a list of exportable values when there is at least one.
    pub fn add_exports_non_empty<'a, T, I>(&mut self, key: impl Into<String>, values: I) -> &mut Self
    where
        T: YamlExport + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.add_non_empty(key, values.into_iter().map(YamlExport::to_yaml))
    }

    /// Returns the accumulated mapping.
    #[must_use]
    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }

    /// Returns the accumulated mapping as a node.
    #[must_use]
    pub fn build(self) -> Yaml {
        Yaml::Map(self.mapping)
    }
}

/// Builds a map node inside a closure.
pub fn yaml_map(configure: impl FnOnce(&mut MapBuilder)) -> Yaml {
    let mut builder = MapBuilder::new();
    configure(&mut builder);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Yaml::from("a"), Yaml::String("a".to_string()));
        assert_eq!(Yaml::from(3_u8), Yaml::Integer(3));
        assert_eq!(Yaml::from(None::<i64>), Yaml::Null);
        assert_eq!(
            Yaml::from(vec!["a", "b"]),
            Yaml::List(vec![Yaml::from("a"), Yaml::from("b")])
        );
        assert_eq!(
            [1_i64, 2].into_iter().collect::<Yaml>(),
            Yaml::List(vec![Yaml::Integer(1), Yaml::Integer(2)])
        );
    }

    #[test]
    fn test_add_keeps_call_order() {
        let node = yaml_map(|map| {
            map.add("b", 1).add("a", 2).add("c", 3);
        });

        assert_eq!(node.to_yaml_string(), "b: 1\na: 2\nc: 3\n");
    }

    #[test]
    fn test_optional_and_empty_values_are_skipped() {
        let node = yaml_map(|map| {
            map.add_opt("missing", None::<String>)
                .add_opt("present", Some("yes"))
                .add_non_empty("empty", Vec::<String>::new())
                .add_non_empty("full", vec!["x"])
                .add_map_non_empty("nothing", Mapping::new());
        });

        let mapping = node.as_mapping().unwrap();
        assert!(!mapping.contains_key("missing"));
        assert!(!mapping.contains_key("empty"));
        assert!(!mapping.contains_key("nothing"));
        assert!(mapping.contains_key("present"));
        assert!(mapping.contains_key("full"));
    }

    #[test]
    fn test_add_exports() {
        let items = vec![Yaml::from("one"), Yaml::from("two")];
        let node = yaml_map(|map| {
            map.add_exports_non_empty("items", &items)
                .add_exports_non_empty("none", &Vec::<Yaml>::new());
        });

        assert_eq!(node.to_yaml_string(), "items:\n  - one\n  - two\n");
    }
}
