//! Container images and services

use crate::yaml::{MapBuilder, Yaml, YamlExport};
use std::fmt;

/// Version used when an image is referenced without one
pub const DEFAULT_VERSION: &str = "latest";

/// The container image a job runs in.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#image).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerImage {
    name: String,
    entrypoint: Option<Vec<String>>,
}

impl ContainerImage {
    /// Creates an image reference from a name and a version (tag)
    pub fn new(name: impl AsRef<str>, version: impl AsRef<str>) -> Self {
        Self {
            name: format!("{}:{}", name.as_ref(), version.as_ref()),
            entrypoint: None,
        }
    }

    /// Creates an image reference tagged [`DEFAULT_VERSION`]
    pub fn latest(name: impl AsRef<str>) -> Self {
        Self::new(name, DEFAULT_VERSION)
    }

    /// Returns the `name:version` reference
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overrides the image entrypoint
    pub fn entrypoint<I, S>(&mut self, entrypoint: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint = Some(entrypoint.into_iter().map(Into::into).collect());
        self
    }

    fn fill(&self, map: &mut MapBuilder) {
        map.add("name", self.name.as_str());
        if let Some(entrypoint) = &self.entrypoint {
            map.add("entrypoint", entrypoint.clone());
        }
    }
}

impl YamlExport for ContainerImage {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        self.fill(&mut map);
        map.build()
    }
}

impl fmt::Display for ContainerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An additional container started alongside a job.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#services).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerService {
    image: ContainerImage,
    alias: Option<String>,
    command: Vec<String>,
}

impl ContainerService {
    /// Creates a service from a name and a version (tag)
    pub fn new(name: impl AsRef<str>, version: impl AsRef<str>) -> Self {
        Self {
            image: ContainerImage::new(name, version),
            alias: None,
            command: Vec::new(),
        }
    }

    /// Returns the `name:version` reference
    #[must_use]
    pub fn name(&self) -> &str {
        self.image.name()
    }

    /// Overrides the service entrypoint
    pub fn entrypoint<I, S>(&mut self, entrypoint: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image.entrypoint(entrypoint);
        self
    }

    /// Sets the hostname the job reaches this service under
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    /// Overrides the command the service container runs
    pub fn command<I, S>(&mut self, command: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }
}

impl YamlExport for ContainerService {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        self.image.fill(&mut map);
        map.add_opt("alias", self.alias.as_deref())
            .add_non_empty("command", self.command.iter());
        map.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_name_includes_version() {
        let image = ContainerImage::new("rust", "1.80");
        assert_eq!(image.name(), "rust:1.80");
        assert_eq!(image.to_yaml().to_yaml_string(), "name: 'rust:1.80'\n");
        assert_eq!(ContainerImage::latest("alpine").name(), "alpine:latest");
    }

    #[test]
    fn test_image_entrypoint() {
        let mut image = ContainerImage::new("alpine", "latest");
        image.entrypoint([""]);

        assert_eq!(
            image.to_yaml().to_yaml_string(),
            "name: 'alpine:latest'\nentrypoint:\n  - ''\n"
        );
    }

    #[test]
    fn test_service_fields() {
        let mut service = ContainerService::new("postgres", "16");
        service.alias("db").command(["postgres", "-c", "fsync=off"]);

        assert_eq!(
            service.to_yaml().to_yaml_string(),
            "name: 'postgres:16'\nalias: db\ncommand:\n  - postgres\n  - -c\n  - fsync=off\n"
        );
    }

    #[test]
    fn test_service_omits_empty_command() {
        let service = ContainerService::new("docker", "dind");
        let yaml = service.to_yaml();
        assert!(yaml.get("command").is_none());
        assert!(yaml.get("alias").is_none());
    }

    #[test]
    fn test_identical_services_are_equal() {
        let mut a = ContainerService::new("redis", "7");
        a.alias("cache");
        let mut b = ContainerService::new("redis", "7");
        b.alias("cache");
        assert_eq!(a, b);
    }
}
