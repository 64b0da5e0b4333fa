//! Code generation driver: render, write, format.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::{
    config::Config, error::Result, format::FormatPipeline, provenance::output_file_name,
    templates::TemplateRenderer, Error,
};

/// Renders a configuration into a file and runs the formatting pipeline over it
#[derive(Debug, Clone)]
pub struct Generator {
    renderer: TemplateRenderer,
    pipeline: FormatPipeline,
    output_dir: PathBuf,
}

impl Generator {
    pub fn new(renderer: TemplateRenderer, pipeline: FormatPipeline) -> Self {
        Self {
            renderer,
            pipeline,
            output_dir: PathBuf::from("."),
        }
    }

    /// Directory the generated file is written to (default: current directory)
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Path the file for `config` will be written to
    pub fn output_path(&self, config: &Config) -> PathBuf {
        self.output_dir.join(output_file_name(config.package_name()))
    }

    /// Generate the file for `config` and return its path
    pub async fn generate(&self, config: &Config) -> Result<PathBuf> {
        let source = self.renderer.render(config)?;
        let path = self.output_path(config);

        log::debug!("Writing {} bytes to {}", source.len(), path.display());
        write_private(&path, source.as_bytes())
            .await
            .map_err(|source| Error::FileWrite {
                path: path.clone(),
                source,
            })?;

        self.pipeline.run(&path).await?;
        log::info!("Generated {}", path.display());
        Ok(path)
    }
}

/// Write `contents` readable and writable by the owner only
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, contents).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    Ok(())
}
