//! External formatting pipeline run over a generated file.
//!
//! The generated source deliberately over-imports; the pipeline is expected
//! to canonicalize formatting and prune unused imports in place.

// Internal imports (std, crate)
use std::path::Path;

use crate::{error::Result, Error};

// External imports (alphabetized)
use tokio::process::Command;

/// One external tool invocation; the target file is appended as the last argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatStep {
    pub program: String,
    pub args: Vec<String>,
}

impl FormatStep {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line for logs and error messages
    pub fn display(&self, file: &Path) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.push(file.display().to_string());
        parts.join(" ")
    }

    async fn run(&self, file: &Path) -> Result<()> {
        let command = self.display(file);
        log::info!("Running {}", command);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .output()
            .await
            .map_err(|e| Error::ExternalTool {
                tool: command.clone(),
                output: e.to_string(),
            })?;

        if !output.status.success() {
            let combined = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            log::error!("{} exited with {}", command, output.status);
            return Err(Error::ExternalTool {
                tool: command,
                output: combined.trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Sequence of tools run in place over a generated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatPipeline {
    steps: Vec<FormatStep>,
}

impl FormatPipeline {
    pub fn new(steps: Vec<FormatStep>) -> Self {
        Self { steps }
    }

    /// A pipeline that leaves the file untouched
    pub fn empty() -> Self {
        Self::default()
    }

    /// `gofmt -w -s` followed by `goimports -w`
    pub fn go() -> Self {
        Self::new(vec![
            FormatStep::new("gofmt", ["-w", "-s"]),
            FormatStep::new("goimports", ["-w"]),
        ])
    }

    pub fn steps(&self) -> &[FormatStep] {
        &self.steps
    }

    /// Run every step in order, stopping at the first failure
    pub async fn run(&self, file: &Path) -> Result<()> {
        for step in &self.steps {
            step.run(file).await?;
        }
        Ok(())
    }
}
