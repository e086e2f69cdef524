//! Stage type for pipeline definition

use std::fmt;

/// A stage in a pipeline.
///
/// A stage is a named group of jobs that run together; stages execute in
/// the order they were declared. Stages are created through
/// [`GitLabCi::stage`](super::GitLabCi::stage), which also registers them.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#stages).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stage {
    name: String,
}

impl Stage {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the stage name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
