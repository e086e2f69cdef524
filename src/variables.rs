//! Predefined GitLab CI variables
//!
//! The constants are `$NAME` references meant to be embedded in scripts
//! and job variables, where the runner expands them:
//!
//! ```
//! use gitlab_ci_dsl::variables::{commit, registry};
//!
//! let push = format!("docker push {}:{}", registry::IMAGE, commit::SHORT_SHA);
//! assert_eq!(push, "docker push $CI_REGISTRY_IMAGE:$CI_COMMIT_SHORT_SHA");
//! ```
//!
//! [`CiContext`] reads the same variables at generation time, through an
//! [`EnvProvider`].
//!
//! Read more in the [GitLab documentation](https://docs.gitlab.com/ee/ci/variables/predefined_variables.html).

use crate::infrastructure::EnvProvider;
use crate::pipeline::PipelineError;

/// `true` in every CI job
pub const CI: &str = "$CI";
/// Root URL of the GitLab API v4
pub const API_V4_URL: &str = "$CI_API_V4_URL";
/// Directory in which builds are executed
pub const BUILDS_DIR: &str = "$CI_BUILDS_DIR";
/// Path of the CI configuration file
pub const CONFIG_PATH: &str = "$CI_CONFIG_PATH";
/// Whether debug logging is enabled
pub const DEBUG_TRACE: &str = "$CI_DEBUG_TRACE";
/// Name of the project's default branch
pub const DEFAULT_BRANCH: &str = "$CI_DEFAULT_BRANCH";

/// The commit the pipeline runs for
#[allow(missing_docs)]
pub mod commit {
    pub const AUTHOR: &str = "$CI_COMMIT_AUTHOR";
    /// Previous latest commit on the branch, all zeros for a new branch
    pub const BEFORE_SHA: &str = "$CI_COMMIT_BEFORE_SHA";
    /// Unset in merge request and tag pipelines
    pub const BRANCH: &str = "$CI_COMMIT_BRANCH";
    /// Only set in tag pipelines
    pub const TAG: &str = "$CI_COMMIT_TAG";
    pub const MESSAGE: &str = "$CI_COMMIT_MESSAGE";
    pub const TITLE: &str = "$CI_COMMIT_TITLE";
    pub const DESCRIPTION: &str = "$CI_COMMIT_DESCRIPTION";
    pub const SHA: &str = "$CI_COMMIT_SHA";
    pub const SHORT_SHA: &str = "$CI_COMMIT_SHORT_SHA";
    pub const TIMESTAMP: &str = "$CI_COMMIT_TIMESTAMP";
    /// Branch or tag name
    pub const REF_NAME: &str = "$CI_COMMIT_REF_NAME";
    pub const REF_PROTECTED: &str = "$CI_COMMIT_REF_PROTECTED";
    /// Lowercased ref name usable in URLs and host names
    pub const REF_SLUG: &str = "$CI_COMMIT_REF_SLUG";
}

/// The running pipeline
#[allow(missing_docs)]
pub mod pipeline {
    pub const ID: &str = "$CI_PIPELINE_ID";
    /// Project-scoped identifier
    pub const IID: &str = "$CI_PIPELINE_IID";
    /// How the pipeline was triggered: `push`, `merge_request_event`, `schedule`...
    pub const SOURCE: &str = "$CI_PIPELINE_SOURCE";
    pub const TRIGGERED: &str = "$CI_PIPELINE_TRIGGERED";
    pub const URL: &str = "$CI_PIPELINE_URL";
    pub const CREATED_AT: &str = "$CI_PIPELINE_CREATED_AT";
}

/// The project the pipeline belongs to
#[allow(missing_docs)]
pub mod project {
    /// Where the repository is cloned in the job
    pub const DIR: &str = "$CI_PROJECT_DIR";
    pub const ID: &str = "$CI_PROJECT_ID";
    pub const NAME: &str = "$CI_PROJECT_NAME";
    pub const NAMESPACE: &str = "$CI_PROJECT_NAMESPACE";
    /// Namespace and project name, e.g. `group/app`
    pub const PATH: &str = "$CI_PROJECT_PATH";
    pub const PATH_SLUG: &str = "$CI_PROJECT_PATH_SLUG";
    pub const ROOT_NAMESPACE: &str = "$CI_PROJECT_ROOT_NAMESPACE";
    pub const TITLE: &str = "$CI_PROJECT_TITLE";
    pub const URL: &str = "$CI_PROJECT_URL";
    pub const VISIBILITY: &str = "$CI_PROJECT_VISIBILITY";
    pub const REPOSITORY_URL: &str = "$CI_REPOSITORY_URL";
}

/// The running job
#[allow(missing_docs)]
pub mod job {
    pub const ID: &str = "$CI_JOB_ID";
    pub const IMAGE: &str = "$CI_JOB_IMAGE";
    pub const MANUAL: &str = "$CI_JOB_MANUAL";
    pub const NAME: &str = "$CI_JOB_NAME";
    pub const STAGE: &str = "$CI_JOB_STAGE";
    /// Only meaningful in `after_script`
    pub const STATUS: &str = "$CI_JOB_STATUS";
    /// Token to authenticate against the GitLab API and registries
    pub const TOKEN: &str = "$CI_JOB_TOKEN";
    pub const URL: &str = "$CI_JOB_URL";
    pub const STARTED_AT: &str = "$CI_JOB_STARTED_AT";
    /// Index of this job among its parallel copies
    pub const NODE_INDEX: &str = "$CI_NODE_INDEX";
    pub const NODE_TOTAL: &str = "$CI_NODE_TOTAL";
}

/// The project's container registry
#[allow(missing_docs)]
pub mod registry {
    /// Address of the registry
    pub const SERVER: &str = "$CI_REGISTRY";
    /// Base image path of the project in the registry
    pub const IMAGE: &str = "$CI_REGISTRY_IMAGE";
    pub const USER: &str = "$CI_REGISTRY_USER";
    pub const PASSWORD: &str = "$CI_REGISTRY_PASSWORD";
}

/// Merge request pipelines only
#[allow(missing_docs)]
pub mod merge_request {
    pub const APPROVED: &str = "$CI_MERGE_REQUEST_APPROVED";
    pub const ASSIGNEES: &str = "$CI_MERGE_REQUEST_ASSIGNEES";
    pub const ID: &str = "$CI_MERGE_REQUEST_ID";
    pub const IID: &str = "$CI_MERGE_REQUEST_IID";
    pub const LABELS: &str = "$CI_MERGE_REQUEST_LABELS";
    pub const MILESTONE: &str = "$CI_MERGE_REQUEST_MILESTONE";
    pub const TITLE: &str = "$CI_MERGE_REQUEST_TITLE";
    pub const EVENT_TYPE: &str = "$CI_MERGE_REQUEST_EVENT_TYPE";
    pub const SOURCE_BRANCH: &str = "$CI_MERGE_REQUEST_SOURCE_BRANCH_NAME";
    pub const SOURCE_BRANCH_SHA: &str = "$CI_MERGE_REQUEST_SOURCE_BRANCH_SHA";
    pub const TARGET_BRANCH: &str = "$CI_MERGE_REQUEST_TARGET_BRANCH_NAME";
    pub const TARGET_BRANCH_SHA: &str = "$CI_MERGE_REQUEST_TARGET_BRANCH_SHA";
}

/// The GitLab instance
#[allow(missing_docs)]
pub mod server {
    pub const HOST: &str = "$CI_SERVER_HOST";
    pub const NAME: &str = "$CI_SERVER_NAME";
    pub const PORT: &str = "$CI_SERVER_PORT";
    pub const PROTOCOL: &str = "$CI_SERVER_PROTOCOL";
    pub const URL: &str = "$CI_SERVER_URL";
    pub const VERSION: &str = "$CI_SERVER_VERSION";
}

/// The user who started the pipeline
#[allow(missing_docs)]
pub mod user {
    pub const ID: &str = "$GITLAB_USER_ID";
    pub const EMAIL: &str = "$GITLAB_USER_EMAIL";
    pub const LOGIN: &str = "$GITLAB_USER_LOGIN";
    pub const NAME: &str = "$GITLAB_USER_NAME";
}

/// Reads predefined variables at generation time.
///
/// ```
/// use gitlab_ci_dsl::infrastructure::MapEnv;
/// use gitlab_ci_dsl::variables::CiContext;
///
/// let ctx = CiContext::new(
///     MapEnv::new()
///         .with("CI_DEFAULT_BRANCH", "main")
///         .with("CI_COMMIT_BRANCH", "main"),
/// );
///
/// assert!(ctx.is_default_branch());
/// assert!(!ctx.is_tag());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CiContext<E> {
    env: E,
}

impl<E: EnvProvider> CiContext<E> {
    /// Creates a context reading from `env`
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Reads a variable given as a `$NAME` reference or a bare name.
    /// Empty values count as unset.
    pub fn read(&self, variable: &str) -> Option<String> {
        let name = variable.strip_prefix('$').unwrap_or(variable);
        self.env.get(name).filter(|value| !value.is_empty())
    }

    /// Returns true when running inside a CI job
    pub fn is_ci(&self) -> bool {
        self.read(CI).is_some_and(|value| value == "true")
    }

    /// Returns the project's default branch.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingVariable`] outside of CI.
    pub fn default_branch(&self) -> Result<String, PipelineError> {
        self.read(DEFAULT_BRANCH)
            .ok_or_else(|| PipelineError::MissingVariable(DEFAULT_BRANCH.to_string()))
    }

    /// Returns the branch being built, unset for tags and merge requests
    pub fn commit_branch(&self) -> Option<String> {
        self.read(commit::BRANCH)
    }

    /// Returns the tag being built
    pub fn commit_tag(&self) -> Option<String> {
        self.read(commit::TAG)
    }

    /// Returns the commit hash
    pub fn commit_sha(&self) -> Option<String> {
        self.read(commit::SHA)
    }

    /// Returns what triggered the pipeline
    pub fn pipeline_source(&self) -> Option<String> {
        self.read(pipeline::SOURCE)
    }

    /// Returns the `namespace/project` path
    pub fn project_path(&self) -> Option<String> {
        self.read(project::PATH)
    }

    /// Returns true in tag pipelines
    pub fn is_tag(&self) -> bool {
        self.commit_tag().is_some()
    }

    /// Returns true in merge request pipelines
    pub fn is_merge_request(&self) -> bool {
        self.pipeline_source()
            .is_some_and(|source| source == "merge_request_event")
    }

    /// Returns true when building the default branch
    pub fn is_default_branch(&self) -> bool {
        match (self.commit_branch(), self.default_branch()) {
            (Some(branch), Ok(default)) => branch == default,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MapEnv;

    fn ctx(pairs: &[(&str, &str)]) -> CiContext<MapEnv> {
        CiContext::new(pairs.iter().copied().collect())
    }

    #[test]
    fn test_references_start_with_dollar() {
        for reference in [
            CI,
            DEFAULT_BRANCH,
            commit::SHA,
            pipeline::SOURCE,
            project::DIR,
            job::TOKEN,
            registry::IMAGE,
            merge_request::IID,
            server::URL,
            user::LOGIN,
        ] {
            assert!(reference.starts_with('$'), "{reference}");
            assert!(!reference[1..].contains('$'), "{reference}");
        }
    }

    #[test]
    fn test_default_branch_missing() {
        let err = ctx(&[]).default_branch().unwrap_err();
        assert_eq!(err, PipelineError::MissingVariable("$CI_DEFAULT_BRANCH".to_string()));
    }

    #[test]
    fn test_default_branch_present() {
        let ctx = ctx(&[("CI_DEFAULT_BRANCH", "main")]);
        assert_eq!(ctx.default_branch().unwrap(), "main");
    }

    #[test]
    fn test_empty_value_is_unset() {
        let ctx = ctx(&[("CI_COMMIT_TAG", "")]);
        assert!(!ctx.is_tag());
    }

    #[test]
    fn test_tag_pipeline() {
        let ctx = ctx(&[("CI", "true"), ("CI_COMMIT_TAG", "v1.0.0")]);
        assert!(ctx.is_ci());
        assert!(ctx.is_tag());
        assert_eq!(ctx.commit_tag().as_deref(), Some("v1.0.0"));
        assert!(!ctx.is_default_branch());
    }

    #[test]
    fn test_feature_branch_is_not_default() {
        let ctx = ctx(&[
            ("CI_DEFAULT_BRANCH", "main"),
            ("CI_COMMIT_BRANCH", "feature"),
        ]);
        assert!(!ctx.is_default_branch());
    }

    #[test]
    fn test_merge_request_pipeline() {
        let ctx = ctx(&[
            ("CI_PIPELINE_SOURCE", "merge_request_event"),
            ("CI_PROJECT_PATH", "group/app"),
        ]);
        assert!(ctx.is_merge_request());
        assert_eq!(ctx.project_path().as_deref(), Some("group/app"));
        assert!(ctx.commit_sha().is_none());
    }

    #[test]
    fn test_read_accepts_bare_names() {
        let ctx = ctx(&[("CI_JOB_NAME", "compile")]);
        assert_eq!(ctx.read("CI_JOB_NAME").as_deref(), Some("compile"));
        assert_eq!(ctx.read(job::NAME).as_deref(), Some("compile"));
    }
}
