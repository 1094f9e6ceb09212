//! External toolchain invocation.
//!
//! When an identifier names a source file, the factory delegates the
//! compile/translate step to a [`Toolchain`]. [`CommandToolchain`] is the
//! stock implementation: it shells out to a configured compiler command,
//! substituting the source and artifact paths into its argument template.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors from the external compile step.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The compiler process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited with a non-zero status.
    #[error("{program} exited with status {code}: {stderr}")]
    Exit {
        program: String,
        code: i32,
        stderr: String,
    },

    /// The source path has no file stem to derive an artifact name from.
    #[error("source path has no file stem: {0}")]
    InvalidSource(PathBuf),

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compiler reported success but the expected artifact is missing.
    #[error("toolchain succeeded but artifact is missing: {0}")]
    MissingArtifact(PathBuf),
}

/// The delegation seam for compiling a source file into a loadable unit.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Compile `source`, placing the artifact under `output_dir`, and
    /// return the artifact path.
    async fn compile(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, ToolchainError>;
}

// Compile-time assertion: Toolchain must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Toolchain) {}
};

/// Runs a configured external compiler command.
///
/// The argument template may contain the placeholders `{source}` and
/// `{artifact}`, replaced per invocation with the source path and the
/// derived artifact path (`<output_dir>/<source stem>.<artifact ext>`).
///
/// # Example
///
/// ```ignore
/// // `cadencec --emit out/hello.unit src/hello.cad`
/// let toolchain = CommandToolchain::new(
///     "cadencec",
///     vec!["--emit".into(), "{artifact}".into(), "{source}".into()],
///     "unit",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    program: String,
    args: Vec<String>,
    artifact_extension: String,
}

impl CommandToolchain {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        artifact_extension: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            artifact_extension: artifact_extension.into(),
        }
    }

    /// The compiler program this toolchain invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Derive the artifact path for a source file.
    fn artifact_path(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, ToolchainError> {
        let stem = source
            .file_stem()
            .ok_or_else(|| ToolchainError::InvalidSource(source.to_path_buf()))?;
        let mut artifact = output_dir.join(stem);
        artifact.set_extension(&self.artifact_extension);
        Ok(artifact)
    }
}

#[async_trait]
impl Toolchain for CommandToolchain {
    async fn compile(
        &self,
        source: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf, ToolchainError> {
        let artifact = self.artifact_path(source, output_dir)?;

        if !output_dir.exists() {
            std::fs::create_dir_all(output_dir).map_err(|e| ToolchainError::OutputDir {
                path: output_dir.to_path_buf(),
                source: e,
            })?;
        }

        let source_str = source.display().to_string();
        let artifact_str = artifact.display().to_string();
        let rendered: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{source}", &source_str)
                    .replace("{artifact}", &artifact_str)
            })
            .collect();

        debug!(
            program = %self.program,
            source = %source.display(),
            artifact = %artifact.display(),
            "invoking toolchain"
        );

        let output = Command::new(&self.program)
            .args(&rendered)
            .output()
            .await
            .map_err(|e| ToolchainError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ToolchainError::Exit {
                program: self.program.clone(),
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        if !artifact.exists() {
            return Err(ToolchainError::MissingArtifact(artifact));
        }

        Ok(artifact)
    }
}
