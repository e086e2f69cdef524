//! `gitlab-ci-dsl completions` - Generate shell completions

use anyhow::{Context, Result};
use clap_complete::Shell;
use std::fs;
use std::path::Path;

const BIN_NAME: &str = "gitlab-ci-dsl";

pub fn generate_completions(shell: Shell) -> Result<String> {
    use clap_complete::generate;

    let mut cmd = super::build_cli();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);

    String::from_utf8(buf).context("Failed to generate completions")
}

pub fn save_completions(completions: &str, output_path: &Path) -> Result<()> {
    fs::write(output_path, completions)
        .with_context(|| format!("Failed to write completions to: {}", output_path.display()))?;
    Ok(())
}
