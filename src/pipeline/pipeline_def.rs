//! Pipeline definition and builder

use crate::pipeline::errors::{PipelineError, ValidationError};
use crate::pipeline::job::{Job, JobRef};
use crate::pipeline::stage::Stage;
use crate::yaml::{MapBuilder, Yaml, YamlExport};
use indexmap::IndexSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// A GitLab CI pipeline: ordered stages and the jobs that run in them.
///
/// Job names are unique. A job declared under a name already in use
/// replaces the earlier job, keeping the earlier position, so [`GitLabCi::jobs`]
/// only holds the latest declaration of each name.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitLabCi {
    stages: IndexSet<Stage>,
    jobs: Vec<Job>,
}

/// Builds a pipeline inside `configure`.
///
/// ```
/// use gitlab_ci_dsl::prelude::*;
///
/// let ci = gitlab_ci(|ci| {
///     let build = ci.stage("build");
///     ci.job("compile", Some(&build), |job| {
///         job.script(|s| {
///             s.shell("make");
///         });
///         Ok(())
///     })?;
///     Ok(())
/// })
/// .unwrap();
///
/// assert_eq!(
///     ci.render(),
///     "stages:\n  - build\ncompile:\n  stage: build\n  script:\n    - make\n"
/// );
/// ```
///
/// # Errors
///
/// Returns whatever error `configure` returns, typically a
/// [`ValidationError`] raised while declaring a job.
pub fn gitlab_ci<F>(configure: F) -> Result<GitLabCi, PipelineError>
where
    F: FnOnce(&mut GitLabCi) -> Result<(), PipelineError>,
{
    let mut ci = GitLabCi::new();
    configure(&mut ci)?;
    Ok(ci)
}

impl GitLabCi {
    /// Creates an empty pipeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a stage and returns it. Declaring it again is a no-op.
    pub fn stage(&mut self, name: impl Into<String>) -> Stage {
        let stage = Stage::new(name);
        if self.stages.insert(stage.clone()) {
            debug!(stage = %stage, "Stage registered");
        }
        stage
    }

    /// Declares a job in `stage`, configured by `configure`, and returns a
    /// reference to it.
    ///
    /// A stage not declared beforehand is appended to the stage list.
    /// Declaring a job under an existing name replaces the earlier job at
    /// its original position.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for a blank name, or the
    /// error returned by `configure`.
    pub fn job<F>(
        &mut self,
        name: impl Into<String>,
        stage: Option<&Stage>,
        configure: F,
    ) -> Result<JobRef, PipelineError>
    where
        F: FnOnce(&mut Job) -> Result<(), PipelineError>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let mut job = Job::new(name, stage.cloned());
        configure(&mut job)?;

        if let Some(stage) = stage
            && self.stages.insert(stage.clone())
        {
            debug!(stage = %stage, "Stage registered from job");
        }

        let job_ref = job.to_ref();
        match self.jobs.iter_mut().find(|existing| existing.name() == job.name()) {
            Some(existing) => {
                warn!(job = %job_ref, "Job declared twice, replacing the earlier one");
                *existing = job;
            }
            None => {
                debug!(job = %job_ref, "Job registered");
                self.jobs.push(job);
            }
        }

        Ok(job_ref)
    }

    /// Returns the declared stages in order
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Returns the declared jobs in order, one entry per name
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Looks a job up by name
    #[must_use]
    pub fn job_named(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name() == name)
    }

    /// Renders the pipeline as a YAML document
    #[must_use]
    pub fn render(&self) -> String {
        debug!(
            stages = self.stages.len(),
            jobs = self.jobs.len(),
            "Rendering pipeline"
        );
        self.to_yaml().to_yaml_string()
    }

    /// Renders the pipeline into `path`, replacing its content.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        std::fs::write(path.as_ref(), self.render())?;
        debug!(path = %path.as_ref().display(), "Pipeline written");
        Ok(())
    }
}

impl YamlExport for GitLabCi {
    fn to_yaml(&self) -> Yaml {
        let mut map = MapBuilder::new();
        map.add_non_empty("stages", self.stages.iter().map(Stage::name));
        for job in &self.jobs {
            map.add_export(job.name(), job);
        }
        map.build()
    }
}

impl fmt::Display for GitLabCi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
