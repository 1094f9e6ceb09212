//! Factory registry -- explicit ownership dispatch for deployment
//! identifiers.
//!
//! Factories are indexed by language name, prefix tag, and source-file
//! extension at registration time, so resolution is a pair of exact map
//! lookups instead of a scan over every factory, and ownership conflicts
//! are detected when a factory is registered rather than surfacing as
//! ambiguous dispatch later.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use super::trait_def::{DeployContext, LoadError, VerticleFactory, VerticleHandle};

/// Errors from registering a factory.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a factory for language {0:?} is already registered")]
    LanguageConflict(String),

    #[error("prefix tag {tag:?} is already claimed by language {existing:?}")]
    PrefixConflict { tag: String, existing: String },

    #[error("extension {extension:?} is already claimed by language {existing:?}")]
    SuffixConflict { extension: String, existing: String },
}

/// A collection of registered [`VerticleFactory`] implementations.
///
/// # Example
///
/// ```ignore
/// let mut registry = FactoryRegistry::new();
/// registry.register(LangVerticleFactory::new(markers, toolchain))?;
/// let factory = registry.resolve("cadence:app/Main").unwrap();
/// ```
#[derive(Default)]
pub struct FactoryRegistry {
    /// Factories keyed by language name.
    factories: HashMap<String, Box<dyn VerticleFactory>>,
    /// Prefix tag -> owning language.
    prefixes: HashMap<String, String>,
    /// File extension (without dot) -> owning language.
    suffixes: HashMap<String, String>,
}

impl FactoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, indexing it under its language name, prefix
    /// tag, and extension.
    ///
    /// A duplicate language, tag, or extension is rejected with the
    /// conflicting registration named in the error; nothing is replaced
    /// silently.
    pub fn register(
        &mut self,
        factory: impl VerticleFactory + 'static,
    ) -> Result<(), RegistryError> {
        let language = factory.language().to_string();
        let tag = factory.markers().language().to_string();
        let extension = factory.markers().extension().to_string();

        if self.factories.contains_key(&language) {
            return Err(RegistryError::LanguageConflict(language));
        }
        if let Some(existing) = self.prefixes.get(&tag) {
            return Err(RegistryError::PrefixConflict {
                tag,
                existing: existing.clone(),
            });
        }
        if let Some(existing) = self.suffixes.get(&extension) {
            return Err(RegistryError::SuffixConflict {
                extension,
                existing: existing.clone(),
            });
        }

        debug!(language, tag, extension, "registered verticle factory");
        self.prefixes.insert(tag, language.clone());
        self.suffixes.insert(extension, language.clone());
        self.factories.insert(language, Box::new(factory));
        Ok(())
    }

    /// Resolve the factory owning an identifier.
    ///
    /// The tag before the first `:` is looked up in the prefix index; if
    /// that misses, the extension after the last `.` is looked up in the
    /// suffix index. Prefix takes precedence, matching the probe order the
    /// factories themselves use.
    pub fn resolve(&self, main: &str) -> Option<&dyn VerticleFactory> {
        if let Some((tag, _rest)) = main.split_once(':') {
            if let Some(language) = self.prefixes.get(tag) {
                return self.factories.get(language).map(|b| b.as_ref());
            }
        }
        if let Some((_stem, extension)) = main.rsplit_once('.') {
            if let Some(language) = self.suffixes.get(extension) {
                return self.factories.get(language).map(|b| b.as_ref());
            }
        }
        None
    }

    /// Ownership probe over the whole registry.
    pub fn owns(&self, main: &str) -> bool {
        self.resolve(main).is_some()
    }

    /// Resolve and load in one step.
    ///
    /// An identifier no factory owns yields [`LoadError::NoFactory`]; it
    /// is never dispatched to a factory.
    pub async fn load(
        &self,
        main: &str,
        ctx: &DeployContext,
    ) -> Result<VerticleHandle, LoadError> {
        match self.resolve(main) {
            Some(factory) => factory.load(main, ctx).await,
            None => Err(LoadError::NoFactory(main.to_string())),
        }
    }

    /// List the language names of all registered factories.
    ///
    /// The order is not guaranteed (HashMap iteration order).
    pub fn list(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// Return the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Return `true` if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
