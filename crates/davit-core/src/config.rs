//! TOML adapter configuration.
//!
//! Hosts declare the language adapters they want registered in a TOML
//! document of `[[adapter]]` tables and build a populated
//! [`FactoryRegistry`] from it. The file is read from an explicit path
//! supplied by the caller; this crate consults no environment variables
//! and mutates no ambient state.
//!
//! ```toml
//! [[adapter]]
//! language = "cadence"
//! extension = "cad"
//!
//! [adapter.compiler]
//! program = "cadencec"
//! args = ["--emit", "{artifact}", "{source}"]
//! artifact_extension = "unit"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptor::{DescriptorError, DescriptorMarkers};
use crate::factory::command::CommandToolchain;
use crate::factory::lang::LangVerticleFactory;
use crate::factory::registry::{FactoryRegistry, RegistryError};

/// Errors from loading or applying adapter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read adapter config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse adapter config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The whole adapter configuration document.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default, rename = "adapter")]
    pub adapters: Vec<AdapterSection>,
}

/// One `[[adapter]]` table.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdapterSection {
    /// Language tag, matched as the `"<tag>:"` identifier prefix.
    pub language: String,
    /// Source-file extension, matched as the `".<ext>"` identifier suffix.
    pub extension: String,
    pub compiler: CompilerSection,
}

/// The external compiler command for one adapter.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompilerSection {
    pub program: String,
    /// Argument template; `{source}` and `{artifact}` are substituted per
    /// invocation.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extension given to compiled artifacts.
    pub artifact_extension: String,
}

impl AdapterConfig {
    /// Read and parse an adapter config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        contents.parse()
    }

    /// Build the factories this config declares and register them all.
    ///
    /// Invalid markers and registration conflicts surface as
    /// [`ConfigError`]; on error the partial registry is discarded.
    pub fn build_registry(&self) -> Result<FactoryRegistry, ConfigError> {
        let mut registry = FactoryRegistry::new();
        for adapter in &self.adapters {
            let markers = DescriptorMarkers::new(&adapter.language, &adapter.extension)?;
            let toolchain = CommandToolchain::new(
                &adapter.compiler.program,
                adapter.compiler.args.clone(),
                &adapter.compiler.artifact_extension,
            );
            registry.register(LangVerticleFactory::new(markers, toolchain))?;
        }
        Ok(registry)
    }
}

impl FromStr for AdapterConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
