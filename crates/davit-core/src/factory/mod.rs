//! Verticle factory interface and registry.
//!
//! This module defines the [`VerticleFactory`] trait that all language
//! adapters implement, plus the supporting types ([`VerticleHandle`],
//! [`DeployContext`]), the injected [`FailureReporter`] sink, the
//! conflict-checked [`FactoryRegistry`], and the configurable
//! [`LangVerticleFactory`] adapter with its external [`Toolchain`] seam.
//!
//! # Architecture
//!
//! ```text
//! Host deployment manager
//!     |
//!     v
//! FactoryRegistry --resolve("cadence:app/Main")--> &dyn VerticleFactory
//!     |                                                 |
//!     |   load(main, ctx) ------------------------------+
//!     |        |                                        |
//!     |        |  ".cad" suffix --> Toolchain::compile  |
//!     |        |  "cadence:" prefix --> stripped once   |
//!     |        v                                        |
//!     |   VerticleHandle { deployment_id, main, ... }   |
//!     |                                                 |
//!     |   report_failure(err) --> FailureReporter ------+
//! ```

pub mod command;
pub mod lang;
pub mod registry;
pub mod report;
pub mod trait_def;

// Re-export the primary public API at the module level.
pub use command::{CommandToolchain, Toolchain, ToolchainError};
pub use lang::LangVerticleFactory;
pub use registry::{FactoryRegistry, RegistryError};
pub use report::{FailureReporter, TracingReporter};
pub use trait_def::{DeployContext, LoadError, VerticleFactory, VerticleHandle};
