//! # gitlab-ci-dsl - GitLab CI pipelines in Rust
//!
//! A typed builder for GitLab CI pipelines and a deterministic YAML
//! renderer. Pipelines are ordinary Rust values: stages and jobs are
//! declared in code, checked by the compiler, and rendered into a
//! `.gitlab-ci.yml` document whose key order never changes between runs.
//!
//! ## Quick Start
//!
//! ```
//! use gitlab_ci_dsl::prelude::*;
//!
//! let ci = gitlab_ci(|ci| {
//!     stage!(ci, build);
//!     stage!(ci, test);
//!
//!     job!(ci, compile, stage = build, |job| {
//!         job.image("rust", "1.80").script(|s| {
//!             s.shell("cargo build --release");
//!         });
//!         Ok(())
//!     });
//!
//!     job!(ci, unit, stage = test, |job| {
//!         job.needs(&compile).script(|s| {
//!             s.shell("cargo test");
//!         });
//!         Ok(())
//!     });
//!     Ok(())
//! })
//! .unwrap();
//!
//! print!("{}", ci.render());
//! ```
//!
//! ## Features
//!
//! - **Typed jobs**: images, services, scripts, caches, artifacts, retries
//! - **Deterministic output**: insertion-ordered maps, stable quoting
//! - **Predefined variables**: `$CI_*` references and a [`variables::CiContext`]
//!   to branch on the current pipeline at generation time
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0
//! (<https://www.apache.org/licenses/LICENSE-2.0>).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod macros;

pub mod infrastructure;
pub mod pipeline;
pub mod variables;
pub mod yaml;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use infrastructure::{Config, EnvProvider, MapEnv, ProcessEnv, init_logging};
pub use pipeline::{
    AllowFailure, Artifacts, Cache, CachePolicy, CacheWhen, Command, ContainerImage,
    ContainerService, Dependency, GitLabCi, Job, JobRef, PipelineError, Retry, RetryCause, Stage,
    ValidationError, When, gitlab_ci,
};
pub use yaml::{Mapping, Yaml, YamlExport};

/// Version of the gitlab-ci-dsl crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
