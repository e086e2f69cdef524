//! `gitlab-ci-dsl generate` - Render the project pipeline
//!
//! The pipeline of this repository, written with the DSL itself. Tag
//! pipelines get an extra publish job.

use anyhow::{Context, Result};
use gitlab_ci_dsl::prelude::*;
use gitlab_ci_dsl::variables::project;
use std::fs;
use std::path::Path;
use tracing::info;

const RUST_IMAGE: &str = "rust";
const RUST_VERSION: &str = "1.92";

/// Image and cache shared by every cargo job
fn cargo_job(job: &mut Job) {
    job.image(RUST_IMAGE, RUST_VERSION)
        .variable("CARGO_HOME", format!("{}/.cargo", project::DIR))
        .cache(|cache| {
            cache
                .key_file("Cargo.lock")
                .key_prefix("cargo")
                .include(".cargo/registry")
                .include("target")
                .policy(CachePolicy::PullPush);
        });
}

/// Builds the pipeline for the environment described by `ctx`.
pub fn project_pipeline<E: EnvProvider>(ctx: &CiContext<E>) -> Result<GitLabCi, PipelineError> {
    gitlab_ci(|ci| {
        stage!(ci, build);
        stage!(ci, test);
        stage!(ci, lint);

        job!(ci, compile, stage = build, |job| {
            cargo_job(job);
            job.script(|s| {
                s.shell("cargo build --locked --all-targets");
            })
            .artifacts(|a| {
                a.include("target/debug/gitlab-ci-dsl").expire_in("1 day");
            });
            Ok(())
        });

        job!(ci, unit, stage = test, |job| {
            cargo_job(job);
            job.needs(&compile)
                .script(|s| {
                    s.shell("cargo test --locked");
                })
                .retry(1, |r| {
                    r.on(RetryCause::RunnerSystemFailure)
                        .on(RetryCause::StuckOrTimeoutFailure);
                })?;
            Ok(())
        });

        job!(ci, clippy, stage = lint, |job| {
            cargo_job(job);
            job.before_script(|s| {
                s.shell("rustup component add clippy");
            })
            .script(|s| {
                s.shell("cargo clippy --all-targets -- -D warnings");
            });
            Ok(())
        });

        ci.job("rustfmt", Some(&lint), |job| {
            job.image(RUST_IMAGE, RUST_VERSION)
                .before_script(|s| {
                    s.shell("rustup component add rustfmt");
                })
                .script(|s| {
                    s.shell("cargo fmt --check");
                })
                .allow_failure();
            Ok(())
        })?;

        if ctx.is_tag() {
            info!(tag = ?ctx.commit_tag(), "Tag pipeline, adding publish job");
            stage!(ci, publish);
            ci.job("crates_io", Some(&publish), |job| {
                cargo_job(job);
                job.needs(&unit)
                    .needs(&clippy)
                    .script(|s| {
                        s.shell("cargo publish --locked --token $CARGO_REGISTRY_TOKEN");
                    });
                Ok(())
            })?;
        }

        Ok(())
    })
}

/// Renders the pipeline for `ctx` as a YAML document
pub fn render_pipeline<E: EnvProvider>(ctx: &CiContext<E>) -> Result<String> {
    let pipeline = project_pipeline(ctx).context("Failed to build the pipeline")?;
    Ok(pipeline.render())
}

pub fn save_pipeline(document: &str, output_path: &Path) -> Result<()> {
    fs::write(output_path, document)
        .with_context(|| format!("Failed to write pipeline to: {}", output_path.display()))?;
    info!(path = %output_path.display(), "Pipeline written");
    Ok(())
}
