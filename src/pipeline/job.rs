//! Jobs and job references

use super::artifacts::Artifacts;
use super::cache::Cache;
use super::errors::ValidationError;
use super::failure::AllowFailure;
use super::image::{ContainerImage, ContainerService};
use super::needs::Dependency;
use super::retry::Retry;
use super::script::{Command, Script};
use super::stage::Stage;
use crate::yaml::{MapBuilder, Mapping, Yaml, YamlExport};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use tracing::warn;

/// A handle on a job registered in a pipeline, used to declare `needs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobRef {
    name: String,
}

impl JobRef {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the referenced job's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A unit of work executed by a runner.
///
/// Jobs are created through [`GitLabCi::job`](super::GitLabCi::job) and
/// configured inside its block. Every builder method mutates the job in
/// place and can be called again: lists accumulate, single values are
/// replaced.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#job-keywords).
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    name: String,
    stage: Option<Stage>,
    image: Option<ContainerImage>,
    services: IndexSet<ContainerService>,
    before_script: Vec<Command>,
    script: Vec<Command>,
    after_script: Vec<Command>,
    tags: IndexSet<String>,
    needs: Vec<Dependency>,
    variables: IndexMap<String, String>,
    cache: Cache,
    artifacts: Artifacts,
    retry: Option<Retry>,
    allow_failure: Option<AllowFailure>,
    coverage: Option<String>,
}

impl Job {
    pub(crate) fn new(name: impl Into<String>, stage: Option<Stage>) -> Self {
        Self {
            name: name.into(),
            stage,
            image: None,
            services: IndexSet::new(),
            before_script: Vec::new(),
            script: Vec::new(),
            after_script: Vec::new(),
            tags: IndexSet::new(),
            needs: Vec::new(),
            variables: IndexMap::new(),
            cache: Cache::default(),
            artifacts: Artifacts::default(),
            retry: None,
            allow_failure: None,
            coverage: None,
        }
    }

    /// Returns the job name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stage the job runs in, if any
    #[must_use]
    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// Returns the job image, if any
    #[must_use]
    pub fn current_image(&self) -> Option<&ContainerImage> {
        self.image.as_ref()
    }

    /// Returns the commands of the main script phase
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.script
    }

    /// Returns a reference other jobs can depend on
    #[must_use]
    pub fn to_ref(&self) -> JobRef {
        JobRef::new(self.name.clone())
    }

    fn set_image(&mut self, image: ContainerImage) {
        if let Some(previous) = &self.image
            && *previous != image
        {
            warn!(
                job = %self.name,
                previous = %previous,
                image = %image,
                "Job image set twice, keeping the latest"
            );
        }
        self.image = Some(image);
    }

    /// Runs the job in `name:version`
    pub fn image(&mut self, name: impl AsRef<str>, version: impl AsRef<str>) -> &mut Self {
        self.set_image(ContainerImage::new(name, version));
        self
    }

    /// Runs the job in `name:latest`
    pub fn image_latest(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.set_image(ContainerImage::latest(name));
        self
    }

    /// Runs the job in `name:version`, configured by `configure`
    pub fn image_with(
        &mut self,
        name: impl AsRef<str>,
        version: impl AsRef<str>,
        configure: impl FnOnce(&mut ContainerImage),
    ) -> &mut Self {
        let mut image = ContainerImage::new(name, version);
        configure(&mut image);
        self.set_image(image);
        self
    }

    /// Starts a service container next to the job
    pub fn service(&mut self, name: impl AsRef<str>, version: impl AsRef<str>) -> &mut Self {
        self.services.insert(ContainerService::new(name, version));
        self
    }

    /// Starts a service container configured by `configure`
    pub fn service_with(
        &mut self,
        name: impl AsRef<str>,
        version: impl AsRef<str>,
        configure: impl FnOnce(&mut ContainerService),
    ) -> &mut Self {
        let mut service = ContainerService::new(name, version);
        configure(&mut service);
        self.services.insert(service);
        self
    }

    /// Appends commands run before the main script
    pub fn before_script(&mut self, block: impl FnOnce(&mut Script<'_>)) -> &mut Self {
        block(&mut Script::new(&mut self.before_script));
        self
    }

    /// Appends commands to the main script
    pub fn script(&mut self, block: impl FnOnce(&mut Script<'_>)) -> &mut Self {
        block(&mut Script::new(&mut self.script));
        self
    }

    /// Appends commands run after the main script, even on failure
    pub fn after_script(&mut self, block: impl FnOnce(&mut Script<'_>)) -> &mut Self {
        block(&mut Script::new(&mut self.after_script));
        self
    }

    /// Restricts the job to runners carrying this tag
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    /// Waits for `job` without downloading its artifacts
    pub fn needs(&mut self, job: &JobRef) -> &mut Self {
        self.needs_with(job, false, false)
    }

    /// Waits for `job`, choosing artifact download and optionality
    pub fn needs_with(&mut self, job: &JobRef, artifacts: bool, optional: bool) -> &mut Self {
        self.needs.push(Dependency {
            job: job.clone(),
            artifacts,
            optional,
        });
        self
    }

    /// Defines a job-level variable, replacing an earlier value
    pub fn variable(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Configures the cache
    pub fn cache(&mut self, configure: impl FnOnce(&mut Cache)) -> &mut Self {
        configure(&mut self.cache);
        self
    }

    /// Configures the artifacts
    pub fn artifacts(&mut self, configure: impl FnOnce(&mut Artifacts)) -> &mut Self {
        configure(&mut self.artifacts);
        self
    }

    /// Retries the job up to `max` times on the failures chosen by `configure`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRetryMax`] if `max` is above 2.
    pub fn retry(
        &mut self,
        max: u32,
        configure: impl FnOnce(&mut Retry),
    ) -> Result<&mut Self, ValidationError> {
        let mut retry = Retry::new(max)?;
        configure(&mut retry);
        self.retry = Some(retry);
        Ok(self)
    }

    /// Retries the job up to `max` times on any failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRetryMax`] if `max` is above 2.
    pub fn retry_max(&mut self, max: u32) -> Result<&mut Self, ValidationError> {
        self.retry(max, |_| {})
    }

    /// Extracts the coverage percentage from the job log with `regex`
    pub fn coverage(&mut self, regex: impl Into<String>) -> &mut Self {
        self.coverage = Some(regex.into());
        self
    }

    /// Lets the pipeline continue when this job fails
    pub fn allow_failure(&mut self) -> &mut Self {
        self.allow_failure = Some(AllowFailure::Always(true));
        self
    }

    /// Makes a failure of this job fail the pipeline
    pub fn forbid_failure(&mut self) -> &mut Self {
        self.allow_failure = Some(AllowFailure::Always(false));
        self
    }

    /// Lets the pipeline continue when the job exits with `code`
    pub fn allow_failure_on_exit_code(&mut self, code: i32) -> &mut Self {
        let current = self
            .allow_failure
            .take()
            .unwrap_or(AllowFailure::Always(false));
        self.allow_failure = Some(current.with_exit_code(code));
        self
    }
}

impl YamlExport for Job {
    fn to_yaml(&self) -> Yaml {
        let mut variables = Mapping::new();
        for (name, value) in &self.variables {
            variables.insert_str(name.as_str(), value.as_str());
        }

        let mut map = MapBuilder::new();
        map.add_opt("stage", self.stage.as_ref().map(Stage::name))
            .add_export_opt("image", self.image.as_ref())
            .add_exports_non_empty("services", &self.services)
            .add_exports_non_empty("before_script", &self.before_script)
            .add_exports_non_empty("script", &self.script)
            .add_exports_non_empty("after_script", &self.after_script)
            .add_non_empty("tags", self.tags.iter())
            .add_exports_non_empty("needs", &self.needs)
            .add_map_non_empty("variables", variables);

        if let Yaml::Map(cache) = self.cache.to_yaml() {
            map.add_map_non_empty("cache", cache);
        }
        if !self.artifacts.is_empty() {
            map.add_export("artifacts", &self.artifacts);
        }

        map.add_export_opt("retry", self.retry.as_ref())
            .add_export_opt("allow_failure", self.allow_failure.as_ref())
            .add_opt("coverage", self.coverage.as_ref().map(|regex| format!("/{regex}/")));
        map.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::artifacts::When;
    use crate::pipeline::retry::RetryCause;
    use pretty_assertions::assert_eq;

    fn job() -> Job {
        Job::new("compile", Some(Stage::new("build")))
    }

    fn keys(job: &Job) -> Vec<String> {
        job.to_yaml()
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Yaml::as_str)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_minimal_job() {
        let mut job = job();
        job.script(|s| {
            s.shell("make");
        });

        assert_eq!(job.to_yaml().to_yaml_string(), "stage: build\nscript:\n  - make\n");
    }

    #[test]
    fn test_job_without_stage_or_commands_is_empty() {
        let job = Job::new("noop", None);
        assert_eq!(job.to_yaml(), Yaml::Map(Mapping::new()));
    }

    #[test]
    fn test_cache_without_rendered_keys_is_omitted() {
        let mut job = Job::new("noop", None);
        job.cache(|c| {
            c.key_prefix("rust");
        });
        assert_eq!(job.to_yaml(), Yaml::Map(Mapping::new()));
    }

    #[test]
    fn test_key_order() {
        let dependency = JobRef::new("generate");
        let mut job = job();
        job.coverage("Total: (\\d+)%")
            .allow_failure()
            .artifacts(|a| {
                a.include("target/release");
            })
            .cache(|c| {
                c.include("target");
            })
            .variable("CARGO_HOME", "cargo")
            .needs(&dependency)
            .tag("docker")
            .after_script(|s| {
                s.shell("echo done");
            })
            .script(|s| {
                s.shell("cargo build");
            })
            .before_script(|s| {
                s.shell("rustc --version");
            })
            .service("postgres", "16")
            .image("rust", "1.80");
        job.retry_max(1).unwrap();

        assert_eq!(
            keys(&job),
            vec![
                "stage",
                "image",
                "services",
                "before_script",
                "script",
                "after_script",
                "tags",
                "needs",
                "variables",
                "cache",
                "artifacts",
                "retry",
                "allow_failure",
                "coverage",
            ]
        );
    }

    #[test]
    fn test_scripts_accumulate() {
        let mut job = job();
        job.script(|s| {
            s.shell("one");
        });
        job.script(|s| {
            s.shell("two");
        });

        let lines: Vec<_> = job.commands().iter().map(ToString::to_string).collect();
        assert_eq!(lines, vec!["sh(one)", "sh(two)"]);
    }

    #[test]
    fn test_image_override_keeps_latest() {
        let mut job = job();
        job.image("rust", "1.79").image("rust", "1.80");
        assert_eq!(job.current_image().map(ContainerImage::name), Some("rust:1.80"));
    }

    /// Collects everything written by the fmt subscriber
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn warnings_while(configure: impl FnOnce()) -> Vec<String> {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, configure);

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        output
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_image_override_warns_once() {
        let warnings = warnings_while(|| {
            let mut job = job();
            job.image("a", "1").image("a", "2").image("a", "2");
        });

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Job image set twice"));
        assert!(warnings[0].contains("previous=a:1"));
    }

    #[test]
    fn test_same_image_twice_does_not_warn() {
        let warnings = warnings_while(|| {
            let mut job = job();
            job.image("a", "1").image("a", "1");
        });

        assert!(warnings.is_empty());
    }

    #[test]
    fn test_image_latest() {
        let mut job = job();
        job.image_latest("alpine");
        assert_eq!(
            job.to_yaml().get("image").and_then(|i| i.get("name")),
            Some(&Yaml::from("alpine:latest"))
        );
    }

    #[test]
    fn test_duplicate_services_and_tags_collapse() {
        let mut job = job();
        job.service("redis", "7")
            .service("redis", "7")
            .tag("docker")
            .tag("docker");

        let yaml = job.to_yaml();
        assert_eq!(yaml.get("services").and_then(Yaml::as_list).map(<[_]>::len), Some(1));
        assert_eq!(yaml.get("tags").and_then(Yaml::as_list).map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_needs_rendering() {
        let target = JobRef::new("generate");
        let mut job = job();
        job.needs(&target).needs_with(&JobRef::new("docs"), true, true);

        assert_eq!(
            job.to_yaml().to_yaml_string(),
            "stage: build\n\
             needs:\n  \
             - job: generate\n    artifacts: false\n    optional: false\n  \
             - job: docs\n    artifacts: true\n    optional: true\n"
        );
    }

    #[test]
    fn test_variable_replaces_value() {
        let mut job = job();
        job.variable("MODE", "debug").variable("MODE", "release");

        let yaml = job.to_yaml();
        assert_eq!(
            yaml.get("variables").and_then(|v| v.get("MODE")),
            Some(&Yaml::from("release"))
        );
    }

    #[test]
    fn test_invalid_retry_leaves_job_unchanged() {
        let mut job = job();
        let err = job.retry(5, |r| {
            r.on(RetryCause::Always);
        });

        assert!(matches!(err, Err(ValidationError::InvalidRetryMax { value: 5 })));
        assert!(job.to_yaml().get("retry").is_none());
    }

    #[test]
    fn test_retry_with_causes() {
        let mut job = Job::new("flaky", None);
        job.retry(2, |r| {
            r.on(RetryCause::RunnerSystemFailure);
        })
        .unwrap();

        assert_eq!(
            job.to_yaml().to_yaml_string(),
            "retry:\n  max: 2\n  when: runner_system_failure\n"
        );
    }

    #[test]
    fn test_coverage_is_wrapped_in_slashes() {
        let mut job = Job::new("test", None);
        job.coverage("\\d+%");
        assert_eq!(job.to_yaml().get("coverage"), Some(&Yaml::from("/\\d+%/")));
    }

    #[test]
    fn test_allow_failure_variants() {
        let mut job = Job::new("lint", None);
        assert!(job.to_yaml().get("allow_failure").is_none());

        job.allow_failure();
        assert_eq!(job.to_yaml().get("allow_failure"), Some(&Yaml::Bool(true)));

        job.forbid_failure();
        assert_eq!(job.to_yaml().get("allow_failure"), Some(&Yaml::Bool(false)));

        job.allow_failure_on_exit_code(3).allow_failure_on_exit_code(4);
        assert_eq!(
            job.to_yaml().to_yaml_string(),
            "allow_failure:\n  exit_codes:\n    - 3\n    - 4\n"
        );
    }

    #[test]
    fn test_artifacts_with_only_when_are_kept() {
        let mut job = Job::new("report", None);
        job.artifacts(|a| {
            a.when(When::OnFailure);
        });
        assert!(job.to_yaml().get("artifacts").is_some());
    }
}
