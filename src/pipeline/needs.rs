//! Job-to-job dependencies

use super::job::JobRef;
use crate::yaml::{MapBuilder, Yaml, YamlExport};

/// An edge from one job to another it needs.
///
/// Only the target's name is exported. Whether that job exists in the
/// pipeline is left to GitLab to check.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#needs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The job that must finish first.
    pub job: JobRef,
    /// Whether that job's artifacts are downloaded before this one starts.
    pub artifacts: bool,
    /// Whether this job still runs if that job is absent from the pipeline.
    pub optional: bool,
}

impl YamlExport for Dependency {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        map.add("job", self.job.name())
            .add("artifacts", self.artifacts)
            .add("optional", self.optional);
        map.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_exports_name_only() {
        let dependency = Dependency {
            job: JobRef::new("compile"),
            artifacts: true,
            optional: false,
        };

        assert_eq!(
            dependency.to_yaml().to_yaml_string(),
            "job: compile\nartifacts: true\noptional: false\n"
        );
    }
}
