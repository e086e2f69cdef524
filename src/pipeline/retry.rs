//! Automatic job retries

use super::errors::ValidationError;
use crate::yaml::{MapBuilder, Yaml, YamlExport};
use indexmap::IndexSet;

/// Highest number of retries GitLab accepts
pub const MAX_RETRIES: u32 = 2;

/// A failure category that triggers a retry.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryCause {
    Always,
    UnknownFailure,
    ScriptFailure,
    ApiFailure,
    StuckOrTimeoutFailure,
    RunnerSystemFailure,
    RunnerUnsupported,
    StaleSchedule,
    JobExecutionTimeout,
    ArchivedFailure,
    UnmetPrerequisites,
    SchedulerFailure,
    DataIntegrityFailure,
}

impl RetryCause {
    /// Returns the name GitLab uses for this cause
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::UnknownFailure => "unknown_failure",
            Self::ScriptFailure => "script_failure",
            Self::ApiFailure => "api_failure",
            Self::StuckOrTimeoutFailure => "stuck_or_timeout_failure",
            Self::RunnerSystemFailure => "runner_system_failure",
            Self::RunnerUnsupported => "runner_unsupported",
            Self::StaleSchedule => "stale_schedule",
            Self::JobExecutionTimeout => "job_execution_timeout",
            Self::ArchivedFailure => "archived_failure",
            Self::UnmetPrerequisites => "unmet_prerequisites",
            Self::SchedulerFailure => "scheduler_failure",
            Self::DataIntegrityFailure => "data_integrity_failure",
        }
    }
}

impl YamlExport for RetryCause {
    fn to_yaml(&self) -> Yaml {
        Yaml::from(self.as_str())
    }
}

/// How often and on which failures a job is retried.
///
/// Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/yaml/#retry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retry {
    max: u32,
    causes: IndexSet<RetryCause>,
    exit_codes: IndexSet<i32>,
}

impl Retry {
    /// Creates a retry policy allowing at most `max` retries.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRetryMax`] when `max` is above
    /// [`MAX_RETRIES`].
    pub fn new(max: u32) -> Result<Self, ValidationError> {
        if max > MAX_RETRIES {
            return Err(ValidationError::InvalidRetryMax { value: max });
        }

        Ok(Self {
            max,
            causes: IndexSet::new(),
            exit_codes: IndexSet::new(),
        })
    }

    /// Returns the retry count
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Retries on this failure category
    pub fn on(&mut self, cause: RetryCause) -> &mut Self {
        self.causes.insert(cause);
        self
    }

    /// Retries when the script exits with this code
    pub fn on_exit_code(&mut self, code: i32) -> &mut Self {
        self.exit_codes.insert(code);
        self
    }
}

fn scalar_or_list<T>(values: &IndexSet<T>, to_yaml: impl Fn(&T) -> Yaml) -> Option<Yaml> {
    match values.len() {
        0 => None,
        1 => values.first().map(to_yaml),
        _ => Some(values.iter().map(to_yaml).collect()),
    }
}

impl YamlExport for Retry {
    fn to_yaml(&self) -> Yaml {
        if self.causes.is_empty() && self.exit_codes.is_empty() {
            return Yaml::from(self.max);
        }

        let mut map = MapBuilder::new();
        map.add("max", self.max)
            .add_opt("when", scalar_or_list(&self.causes, RetryCause::to_yaml))
            .add_opt("exit_codes", scalar_or_list(&self.exit_codes, |code| Yaml::from(*code)));
        map.build()
    }
}
