//! The configurable language adapter.
//!
//! `LangVerticleFactory` is the stock [`VerticleFactory`]: markers,
//! toolchain, and reporting sink are all constructor input, so one type
//! covers any source language the host wants to plug in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::descriptor::DescriptorMarkers;
use crate::factory::command::Toolchain;
use crate::factory::report::{FailureReporter, TracingReporter};
use crate::factory::trait_def::{DeployContext, LoadError, VerticleFactory, VerticleHandle};

/// A [`VerticleFactory`] for one source language, parameterized by its
/// recognition markers, the external toolchain that compiles its sources,
/// and the sink that observes its failures.
pub struct LangVerticleFactory {
    markers: DescriptorMarkers,
    toolchain: Arc<dyn Toolchain>,
    reporter: Arc<dyn FailureReporter>,
}

impl std::fmt::Debug for LangVerticleFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangVerticleFactory")
            .field("markers", &self.markers)
            .finish()
    }
}

impl LangVerticleFactory {
    /// Create a factory reporting failures through [`TracingReporter`].
    pub fn new(markers: DescriptorMarkers, toolchain: impl Toolchain + 'static) -> Self {
        Self::with_reporter(markers, toolchain, TracingReporter)
    }

    /// Create a factory with an explicit reporting sink.
    pub fn with_reporter(
        markers: DescriptorMarkers,
        toolchain: impl Toolchain + 'static,
        reporter: impl FailureReporter + 'static,
    ) -> Self {
        Self {
            markers,
            toolchain: Arc::new(toolchain),
            reporter: Arc::new(reporter),
        }
    }

    /// Report to the sink and hand the error back, so `load` never returns
    /// an error the sink has not seen.
    fn reported(&self, error: LoadError) -> LoadError {
        self.reporter.report(&error);
        error
    }
}

#[async_trait]
impl VerticleFactory for LangVerticleFactory {
    fn language(&self) -> &str {
        self.markers.language()
    }

    fn markers(&self) -> &DescriptorMarkers {
        &self.markers
    }

    async fn load(&self, main: &str, ctx: &DeployContext) -> Result<VerticleHandle, LoadError> {
        // Processing order is fixed: an identifier carrying both markers is
        // handled once, compile step first, then prefix stripping.
        let mut artifact = None;
        if self.markers.has_suffix(main) {
            let source = ctx.source_root.join(main);
            if !source.is_file() {
                return Err(self.reported(LoadError::SourceMissing(source)));
            }
            match self.toolchain.compile(&source, &ctx.output_dir).await {
                Ok(path) => artifact = Some(path),
                Err(e) => {
                    return Err(self.reported(LoadError::Toolchain {
                        main: main.to_string(),
                        source: e,
                    }));
                }
            }
        }

        let resolved = self.markers.strip_prefix(main);
        let handle = VerticleHandle {
            deployment_id: Uuid::new_v4(),
            language: self.markers.language().to_string(),
            main: resolved.to_string(),
            artifact,
        };

        info!(
            language = %handle.language,
            main = %handle.main,
            deployment_id = %handle.deployment_id,
            "verticle loaded"
        );

        Ok(handle)
    }

    fn report_failure(&self, error: &(dyn std::error::Error + 'static)) {
        self.reporter.report(error);
    }
}
