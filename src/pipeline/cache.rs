//! Job cache configuration

use crate::yaml::{MapBuilder, Mapping, Yaml, YamlExport};

/// When the cache is uploaded at the end of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheWhen {
    /// Save the cache whatever the job outcome
    Always,
    /// Save the cache only when the job succeeds
    OnSuccess,
    /// Save the cache only when the job fails
    OnFailure,
}

impl YamlExport for CacheWhen {
    fn to_yaml(&self) -> Yaml {
        Yaml::from(match self {
            Self::Always => "always",
            Self::OnSuccess => "on_success",
            Self::OnFailure => "on_failure",
        })
    }
}

/// Whether a job downloads, uploads, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Only download the cache
    Pull,
    /// Only upload the cache
    Push,
    /// Download at start, upload at the end
    PullPush,
}

impl YamlExport for CachePolicy {
    fn to_yaml(&self) -> Yaml {
        Yaml::from(match self {
            Self::Pull => "pull",
            Self::Push => "push",
            Self::PullPush => "pull-push",
        })
    }
}

/// Paths reused between jobs, even across pipelines.
///
/// When key files are declared, the cache key is derived from their
/// content instead of a fixed string.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#cache).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cache {
    paths: Vec<String>,
    key_files: Vec<String>,
    key: Option<String>,
    key_prefix: Option<String>,
    untracked: Option<bool>,
    when: Option<CacheWhen>,
    policy: Option<CachePolicy>,
}

impl Cache {
    /// Adds a path to cache
    pub fn include(&mut self, path: impl Into<String>) -> &mut Self {
        self.paths.push(path.into());
        self
    }

    /// Adds a file whose content is part of the cache key
    pub fn key_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.key_files.push(path.into());
        self
    }

    /// Sets a fixed cache key, used when no key file is declared
    pub fn key(&mut self, key: impl Into<String>) -> &mut Self {
        self.key = Some(key.into());
        self
    }

    /// Sets a prefix combined with the key-file hash
    pub fn key_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Also caches files untracked by Git
    pub fn untracked(&mut self, untracked: bool) -> &mut Self {
        self.untracked = Some(untracked);
        self
    }

    /// Sets when the cache is saved
    pub fn when(&mut self, when: CacheWhen) -> &mut Self {
        self.when = Some(when);
        self
    }

    /// Sets the upload/download policy
    pub fn policy(&mut self, policy: CachePolicy) -> &mut Self {
        self.policy = Some(policy);
        self
    }

    /// Returns true if the cache renders no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_yaml().as_mapping().is_none_or(Mapping::is_empty)
    }

    fn key_yaml(&self) -> Option<Yaml> {
        if !self.key_files.is_empty() {
            let mut key = Mapping::new();
            key.insert_str("files", self.key_files.clone());
            if let Some(prefix) = &self.key_prefix {
                key.insert_str("prefix", prefix.as_str());
            }
            return Some(Yaml::Map(key));
        }

        self.key.as_deref().map(Yaml::from)
    }
}

impl YamlExport for Cache {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        map.add_opt("key", self.key_yaml())
            .add_non_empty("paths", self.paths.iter())
            .add_opt("untracked", self.untracked)
            .add_export_opt("when", self.when.as_ref())
            .add_export_opt("policy", self.policy.as_ref());
        map.build()
    }
}
