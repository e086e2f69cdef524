//! Job artifacts and reports

use crate::yaml::{MapBuilder, Mapping, Yaml, YamlExport};

/// When artifacts are uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum When {
    /// Upload whatever the job outcome
    #[default]
    Always,
    /// Upload only when the job succeeds
    OnSuccess,
    /// Upload only when the job fails
    OnFailure,
}

impl YamlExport for When {
    fn to_yaml(&self) -> Yaml {
        Yaml::from(match self {
            Self::Always => "always",
            Self::OnSuccess => "on_success",
            Self::OnFailure => "on_failure",
        })
    }
}

/// Files saved at the end of a job, consumable by later jobs and by the
/// GitLab UI through report slots.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#artifacts).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifacts {
    includes: Vec<String>,
    excludes: Vec<String>,
    expire_in: Option<String>,
    expose_as: Option<String>,
    name: Option<String>,
    reports: Mapping,
    when: When,
}

impl Artifacts {
    /// Adds a path to save
    pub fn include(&mut self, path: impl Into<String>) -> &mut Self {
        self.includes.push(path.into());
        self
    }

    /// Excludes a path from the saved files
    pub fn exclude(&mut self, path: impl Into<String>) -> &mut Self {
        self.excludes.push(path.into());
        self
    }

    /// Sets how long GitLab keeps the artifacts, e.g. `1 week`
    pub fn expire_in(&mut self, duration: impl Into<String>) -> &mut Self {
        self.expire_in = Some(duration.into());
        self
    }

    /// Shows the artifacts in merge requests under this label
    pub fn expose_as(&mut self, label: impl Into<String>) -> &mut Self {
        self.expose_as = Some(label.into());
        self
    }

    /// Sets the archive name
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets when the artifacts are uploaded
    pub fn when(&mut self, when: When) -> &mut Self {
        self.when = when;
        self
    }

    /// Returns true if nothing was configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn report(&mut self, key: &str, value: impl Into<Yaml>) -> &mut Self {
        self.reports.insert_str(key, value);
        self
    }

    /// Accessibility report
    pub fn accessibility(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("accessibility", path.into())
    }

    /// External links shown on the job page
    pub fn annotations(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("annotations", path.into())
    }

    /// API fuzzing report
    pub fn api_fuzzing(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("api_fuzzing", path.into())
    }

    /// Browser performance report
    pub fn browser_performance(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("browser_performance", path.into())
    }

    /// Cluster image scanning report
    pub fn cluster_image_scanning(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("cluster_image_scanning", path.into())
    }

    /// Code coverage report in the given format (`cobertura`, `jacoco`)
    pub fn coverage(&mut self, format: impl Into<String>, path: impl Into<String>) -> &mut Self {
        let mut coverage = Mapping::new();
        coverage.insert_str("coverage_format", format.into());
        coverage.insert_str("path", path.into());
        self.report("coverage_report", coverage)
    }

    /// Code quality report
    pub fn code_quality(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("codequality", path.into())
    }

    /// Container scanning report
    pub fn container_scanning(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("container_scanning", path.into())
    }

    /// Coverage-guided fuzzing report
    pub fn coverage_fuzzing(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("coverage_fuzzing", path.into())
    }

    /// `CycloneDX` SBOM files; always exported as a list
    pub fn cyclonedx<I, S>(&mut self, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        self.report("cyclonedx", paths)
    }

    /// Dynamic application security testing report
    pub fn dast(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("dast", path.into())
    }

    /// Dependency scanning report
    pub fn dependency_scanning(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("dependency_scanning", path.into())
    }

    /// Environment variables passed to later jobs
    pub fn dotenv(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("dotenv", path.into())
    }

    /// `JUnit` XML test report
    pub fn junit(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("junit", path.into())
    }

    /// License scanning report
    pub fn license_scanning(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("license_scanning", path.into())
    }

    /// Load performance report
    pub fn load_performance(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("load_performance", path.into())
    }

    /// Metrics report
    pub fn metrics(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("metrics", path.into())
    }

    /// Requirements report
    pub fn requirements(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("requirements", path.into())
    }

    /// Static application security testing report
    pub fn sast(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("sast", path.into())
    }

    /// Secret detection report
    pub fn secret_detection(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("secret_detection", path.into())
    }

    /// Terraform plan report
    pub fn terraform(&mut self, path: impl Into<String>) -> &mut Self {
        self.report("terraform", path.into())
    }
}

impl YamlExport for Artifacts {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        map.add_non_empty("paths", self.includes.iter())
            .add_non_empty("exclude", self.excludes.iter())
            .add_opt("expire_in", self.expire_in.as_deref())
            .add_opt("expose_as", self.expose_as.as_deref())
            .add_opt("name", self.name.as_deref())
            .add_map_non_empty("reports", self.reports.clone())
            .add_export("when", &self.when);
        map.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_artifacts_are_empty() {
        assert!(Artifacts::default().is_empty());
    }

    #[test]
    fn test_changed_upload_condition_is_not_empty() {
        let mut artifacts = Artifacts::default();
        artifacts.when(When::OnFailure);
        assert!(!artifacts.is_empty());
        assert_eq!(artifacts.to_yaml().to_yaml_string(), "when: on_failure\n");
    }

    #[test]
    fn test_full_artifacts() {
        let mut artifacts = Artifacts::default();
        artifacts
            .name("Documentation")
            .expose_as("Documentation")
            .include("documentation")
            .exclude("documentation/*.tmp")
            .expire_in("1 week")
            .junit("report.xml");

        assert_eq!(
            artifacts.to_yaml().to_yaml_string(),
            "paths:\n  - documentation\n\
             exclude:\n  - documentation/*.tmp\n\
             expire_in: 1 week\n\
             expose_as: Documentation\n\
             name: Documentation\n\
             reports:\n  junit: report.xml\n\
             when: always\n"
        );
    }

    #[test]
    fn test_coverage_report() {
        let mut artifacts = Artifacts::default();
        artifacts.coverage("cobertura", "out.xml");

        let yaml = artifacts.to_yaml();
        let coverage = yaml.get("reports").and_then(|r| r.get("coverage_report")).unwrap();
        assert_eq!(coverage.get("coverage_format"), Some(&Yaml::from("cobertura")));
        assert_eq!(coverage.get("path"), Some(&Yaml::from("out.xml")));
        assert_eq!(
            yaml.to_yaml_string(),
            "reports:\n  coverage_report:\n    coverage_format: cobertura\n    path: out.xml\nwhen: always\n"
        );
    }

    #[test]
    fn test_cyclonedx_single_path_is_a_list() {
        let mut artifacts = Artifacts::default();
        artifacts.cyclonedx(["sbom.json"]);

        let yaml = artifacts.to_yaml();
        let reports = yaml.get("reports").unwrap();
        assert_eq!(
            reports.get("cyclonedx"),
            Some(&Yaml::List(vec![Yaml::from("sbom.json")]))
        );
    }

    #[test]
    fn test_report_key_names() {
        let mut artifacts = Artifacts::default();
        artifacts
            .accessibility("a")
            .annotations("a")
            .api_fuzzing("a")
            .browser_performance("a")
            .cluster_image_scanning("a")
            .code_quality("a")
            .container_scanning("a")
            .coverage_fuzzing("a")
            .dast("a")
            .dependency_scanning("a")
            .dotenv("a")
            .junit("a")
            .license_scanning("a")
            .load_performance("a")
            .metrics("a")
            .requirements("a")
            .sast("a")
            .secret_detection("a")
            .terraform("a");

        let yaml = artifacts.to_yaml();
        let keys: Vec<_> = yaml
            .get("reports")
            .and_then(Yaml::as_mapping)
            .unwrap()
            .keys()
            .filter_map(Yaml::as_str)
            .collect();

        assert_eq!(
            keys,
            vec![
                "accessibility",
                "annotations",
                "api_fuzzing",
                "browser_performance",
                "cluster_image_scanning",
                "codequality",
                "container_scanning",
                "coverage_fuzzing",
                "dast",
                "dependency_scanning",
                "dotenv",
                "junit",
                "license_scanning",
                "load_performance",
                "metrics",
                "requirements",
                "sast",
                "secret_detection",
                "terraform",
            ]
        );
    }

    #[test]
    fn test_redeclared_report_replaces_value() {
        let mut artifacts = Artifacts::default();
        artifacts.junit("first.xml").junit("second.xml");

        let yaml = artifacts.to_yaml();
        assert_eq!(
            yaml.get("reports").and_then(|r| r.get("junit")),
            Some(&Yaml::from("second.xml"))
        );
    }
}
