//! The `VerticleFactory` trait -- the adapter interface for one source
//! language.
//!
//! Each concrete factory recognizes identifiers through its
//! [`DescriptorMarkers`] and turns them into a [`VerticleHandle`] the host
//! can instantiate and run. The trait is intentionally object-safe so it
//! can be stored as `Box<dyn VerticleFactory>` in the
//! [`super::FactoryRegistry`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::descriptor::DescriptorMarkers;
use crate::factory::command::ToolchainError;

/// Errors from loading a verticle.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The identifier matched no registered factory. The registry surfaces
    /// this instead of dispatching; factories themselves never see unowned
    /// identifiers.
    #[error("no registered factory owns identifier {0:?}")]
    NoFactory(String),

    /// The identifier named a source file that does not exist under the
    /// deployment's source root.
    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),

    /// The external compile step failed.
    #[error("toolchain failed for {main:?}")]
    Toolchain {
        main: String,
        #[source]
        source: ToolchainError,
    },
}

/// Host-supplied context for a single load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    /// Directory against which file-suffix identifiers are resolved.
    pub source_root: PathBuf,
    /// Directory where compiled artifacts are placed.
    pub output_dir: PathBuf,
}

impl DeployContext {
    pub fn new(source_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// The product of a successful load: everything the host needs to
/// instantiate and run the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerticleHandle {
    /// Unique id stamped per successful load.
    pub deployment_id: Uuid,
    /// Language of the factory that produced this handle.
    pub language: String,
    /// The identifier with a recognized language-tag prefix stripped.
    pub main: String,
    /// Compiled unit, present when the identifier named a source file and
    /// the toolchain ran.
    pub artifact: Option<PathBuf>,
}

/// Adapter interface for recognizing and loading verticles written in one
/// source language.
///
/// # Object Safety
///
/// This trait is object-safe: every method takes `&self` and returns a
/// concrete type. This means you can store `Box<dyn VerticleFactory>` in
/// collections such as [`super::FactoryRegistry`].
#[async_trait]
pub trait VerticleFactory: Send + Sync {
    /// The language this factory is responsible for (e.g. "cadence").
    fn language(&self) -> &str;

    /// The recognition markers this factory was constructed with.
    fn markers(&self) -> &DescriptorMarkers;

    /// Ownership probe: true iff `main` carries this factory's prefix or
    /// suffix. Pure, no side effects.
    fn owns(&self, main: &str) -> bool {
        self.markers().owns(main)
    }

    /// Load the verticle named by `main`.
    ///
    /// If `main` ends with the recognized suffix, the source is first
    /// compiled into a loadable unit; if it starts with the recognized
    /// prefix, the prefix is stripped before resolution. Failures are
    /// forwarded to the factory's reporting sink *and* returned to the
    /// caller -- never swallowed.
    async fn load(&self, main: &str, ctx: &DeployContext) -> Result<VerticleHandle, LoadError>;

    /// Forward an unrecoverable error encountered while running the unit
    /// (not just during load) to the injected reporting sink.
    ///
    /// This is an observer call, not a recovery mechanism: no retry, no
    /// fallback.
    fn report_failure(&self, error: &(dyn std::error::Error + 'static));
}

/// Shared-ownership forwarding: an `Arc<T>` is itself a factory that
/// delegates every call to its inner `T`. This lets a single factory be
/// cloned, handed to a registry as `Box<dyn VerticleFactory>`, and still be
/// inspected through another retained `Arc` handle. Defined here, in the
/// trait's owning crate, because the orphan rule forbids implementing this
/// foreign-trait-for-`Arc` combination anywhere else.
#[async_trait]
impl<T: VerticleFactory + ?Sized> VerticleFactory for Arc<T> {
    fn language(&self) -> &str {
        self.as_ref().language()
    }

    fn markers(&self) -> &DescriptorMarkers {
        self.as_ref().markers()
    }

    async fn load(&self, main: &str, ctx: &DeployContext) -> Result<VerticleHandle, LoadError> {
        self.as_ref().load(main, ctx).await
    }

    fn report_failure(&self, error: &(dyn std::error::Error + 'static)) {
        self.as_ref().report_failure(error)
    }
}

// Compile-time assertion: VerticleFactory must be object-safe.
// If this line compiles, the trait can be used as `dyn VerticleFactory`.
const _: () = {
    fn _assert_object_safe(_: &dyn VerticleFactory) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    /// A trivial factory that does nothing, used only to prove the trait
    /// can be implemented and used as `dyn VerticleFactory`.
    struct NoopFactory {
        markers: DescriptorMarkers,
    }

    impl NoopFactory {
        fn new() -> Self {
            Self {
                markers: DescriptorMarkers::new("noop", "nop").unwrap(),
            }
        }
    }

    #[async_trait]
    impl VerticleFactory for NoopFactory {
        fn language(&self) -> &str {
            self.markers.language()
        }

        fn markers(&self) -> &DescriptorMarkers {
            &self.markers
        }

        async fn load(
            &self,
            main: &str,
            _ctx: &DeployContext,
        ) -> Result<VerticleHandle, LoadError> {
            Ok(VerticleHandle {
                deployment_id: Uuid::nil(),
                language: self.language().to_string(),
                main: self.markers.strip_prefix(main).to_string(),
                artifact: None,
            })
        }

        fn report_failure(&self, _error: &(dyn std::error::Error + 'static)) {}
    }

    #[test]
    fn factory_is_object_safe() {
        // If this compiles, the trait is object-safe.
        let factory: Box<dyn VerticleFactory> = Box::new(NoopFactory::new());
        assert_eq!(factory.language(), "noop");
    }

    #[test]
    fn provided_owns_delegates_to_markers() {
        let factory = NoopFactory::new();
        assert!(factory.owns("noop:main"));
        assert!(factory.owns("a/b.nop"));
        assert!(!factory.owns("other:main"));
    }

    #[tokio::test]
    async fn noop_factory_load_strips_prefix() {
        let factory: Box<dyn VerticleFactory> = Box::new(NoopFactory::new());
        let ctx = DeployContext::new("/tmp/src", "/tmp/out");

        let handle = factory.load("noop:app/Main", &ctx).await.unwrap();
        assert_eq!(handle.main, "app/Main");
        assert_eq!(handle.language, "noop");
        assert!(handle.artifact.is_none());
    }
}
