//! Prelude module for common imports

// Re-export macros
pub use crate::{job, stage, yaml_map};

// Re-export all pipeline types with full paths
pub use crate::pipeline::artifacts::{Artifacts, When};
pub use crate::pipeline::cache::{Cache, CachePolicy, CacheWhen};
pub use crate::pipeline::errors::{PipelineError, ValidationError};
pub use crate::pipeline::failure::AllowFailure;
pub use crate::pipeline::image::{ContainerImage, ContainerService};
pub use crate::pipeline::job::{Job, JobRef};
pub use crate::pipeline::pipeline_def::{GitLabCi, gitlab_ci};
pub use crate::pipeline::retry::{Retry, RetryCause};
pub use crate::pipeline::script::{Command, Script};
pub use crate::pipeline::stage::Stage;

// Re-export the value model
pub use crate::yaml::{MapBuilder, Mapping, Yaml, YamlExport};

// Re-export variable access
pub use crate::infrastructure::{EnvProvider, MapEnv, ProcessEnv};
pub use crate::variables::CiContext;
