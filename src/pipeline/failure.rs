//! Tolerated job failures

use crate::yaml::{MapBuilder, Yaml, YamlExport};
use indexmap::IndexSet;

/// Whether a failing job blocks the pipeline.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#allow_failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowFailure {
    /// Failures are always tolerated, or never
    Always(bool),
    /// Failures are tolerated only for these exit codes
    ExitCodes(IndexSet<i32>),
}

impl AllowFailure {
    /// Adds an exit code to the tolerated set, replacing a plain flag
    pub(crate) fn with_exit_code(self, code: i32) -> Self {
        let mut codes = match self {
            Self::ExitCodes(codes) => codes,
            Self::Always(_) => IndexSet::new(),
        };
        codes.insert(code);
        Self::ExitCodes(codes)
    }
}

impl YamlExport for AllowFailure {
    fn to_yaml(&self) -> Yaml {
        match self {
            Self::Always(allowed) => Yaml::Bool(*allowed),
            Self::ExitCodes(codes) => {
                let mut map = MapBuilder::new();
                map.add("exit_codes", codes.iter().copied().collect::<Vec<_>>());
                map.build()
            }
        }
    }
}
