//! Pipeline domain types
//!
//! A pipeline is built through [`gitlab_ci`]: stages are declared on the
//! [`GitLabCi`] handle and jobs are configured inside scoped blocks. Every
//! type here implements [`YamlExport`](crate::yaml::YamlExport).

pub mod artifacts;
pub mod cache;
pub mod errors;
pub mod failure;
pub mod image;
pub mod job;
pub mod needs;
pub mod pipeline_def;
pub mod retry;
pub mod script;
pub mod stage;

pub use artifacts::{Artifacts, When};
pub use cache::{Cache, CachePolicy, CacheWhen};
pub use errors::{PipelineError, ValidationError};
pub use failure::AllowFailure;
pub use image::{ContainerImage, ContainerService};
pub use job::{Job, JobRef};
pub use needs::Dependency;
pub use pipeline_def::{GitLabCi, gitlab_ci};
pub use retry::{Retry, RetryCause};
pub use script::{Command, Script};
pub use stage::Stage;
