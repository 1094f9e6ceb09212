//! Core library for davit: recognizing and loading polyglot verticles.
//!
//! A *verticle* is a deployable unit of application logic managed by a host
//! runtime. The host identifies each verticle by an opaque string that may
//! carry a language tag (`"<tag>:<rest>"`) or a source-file extension
//! (`".<ext>"`). This crate supplies the pieces the host plugs together to
//! route such identifiers to the right language adapter:
//!
//! - [`descriptor`] -- the marker pair (tag + extension) for one language
//!   and the pure ownership / prefix-stripping operations over identifiers.
//! - [`factory`] -- the [`VerticleFactory`] trait, the conflict-checked
//!   [`FactoryRegistry`], the configurable [`LangVerticleFactory`] adapter,
//!   and the external [`Toolchain`] seam for source compilation.
//! - [`config`] -- the TOML `[[adapter]]` schema for declaring adapters and
//!   building a populated registry from it.
//!
//! The host's own module system, process isolation, HTTP stack, and
//! verticle lifecycle are out of scope; this crate ends at the
//! [`VerticleHandle`] it hands back from a successful load.

pub mod config;
pub mod descriptor;
pub mod factory;

pub use config::{AdapterConfig, ConfigError};
pub use descriptor::{DescriptorError, DescriptorMarkers};
pub use factory::{
    CommandToolchain, DeployContext, FactoryRegistry, FailureReporter, LangVerticleFactory,
    LoadError, RegistryError, Toolchain, ToolchainError, TracingReporter, VerticleFactory,
    VerticleHandle,
};
