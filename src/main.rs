//! gitlab-ci-dsl - CLI for the GitLab CI pipeline DSL
//!
//! ## Commands
//!
//! - `gitlab-ci-dsl generate` - Render this repository's pipeline
//! - `gitlab-ci-dsl completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the pipeline
//! gitlab-ci-dsl generate
//!
//! # Write it where GitLab expects it
//! gitlab-ci-dsl generate -o .gitlab-ci.yml
//!
//! # Generate shell completions
//! gitlab-ci-dsl completions bash > /etc/bash_completion.d/gitlab-ci-dsl
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if std::env::var("GITLAB_CI_DSL_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
