//! Environment variable providers
//!
//! Pipeline construction never reads the process environment by itself.
//! Code that needs CI variables (see [`CiContext`](crate::variables::CiContext))
//! goes through an [`EnvProvider`], so tests can substitute a [`MapEnv`].

use std::collections::HashMap;

/// Source of environment variables
pub trait EnvProvider {
    /// Returns the value of `name`, if set
    fn get(&self, name: &str) -> Option<String>;
}

impl<T: EnvProvider + ?Sized> EnvProvider for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Reads the environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Creates an empty environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvProvider for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
