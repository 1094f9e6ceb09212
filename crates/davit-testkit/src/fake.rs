//! In-memory doubles for the davit-core factory seams.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use davit_core::{
    DeployContext, DescriptorMarkers, FailureReporter, LoadError, VerticleFactory, VerticleHandle,
};

use crate::collector::Collector;

/// A [`VerticleFactory`] that loads nothing, records every identifier it
/// resolves, and can be armed to fail.
pub struct FakeVerticleFactory {
    markers: DescriptorMarkers,
    loads: Mutex<Vec<String>>,
    reported: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl FakeVerticleFactory {
    pub fn new(markers: DescriptorMarkers) -> Self {
        Self {
            markers,
            loads: Mutex::new(Vec::new()),
            reported: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `load` fail with a missing-source error.
    pub fn arm_failure(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// The resolved (prefix-stripped) identifiers presented to `load`,
    /// in call order.
    pub fn loaded(&self) -> Vec<String> {
        self.loads.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Rendered errors passed to `report_failure`, in call order.
    pub fn reported(&self) -> Vec<String> {
        self.reported
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl VerticleFactory for FakeVerticleFactory {
    fn language(&self) -> &str {
        self.markers.language()
    }

    fn markers(&self) -> &DescriptorMarkers {
        &self.markers
    }

    async fn load(&self, main: &str, _ctx: &DeployContext) -> Result<VerticleHandle, LoadError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LoadError::SourceMissing(PathBuf::from(main)));
        }

        let resolved = self.markers.strip_prefix(main).to_string();
        self.loads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(resolved.clone());

        Ok(VerticleHandle {
            deployment_id: Uuid::new_v4(),
            language: self.markers.language().to_string(),
            main: resolved,
            artifact: None,
        })
    }

    fn report_failure(&self, error: &(dyn std::error::Error + 'static)) {
        self.reported
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(error.to_string());
    }
}

/// A [`FailureReporter`] that forwards rendered errors into a
/// [`Collector`], so tests can synchronously await and assert on them.
#[derive(Clone)]
pub struct CollectingReporter {
    collector: Collector<String>,
}

impl CollectingReporter {
    /// Expect `expected` reported failures.
    pub fn new(expected: usize) -> Self {
        Self {
            collector: Collector::new(expected),
        }
    }

    /// Handle to the underlying collector for waiting and polling.
    pub fn collector(&self) -> Collector<String> {
        self.collector.clone()
    }
}

impl FailureReporter for CollectingReporter {
    fn report(&self, error: &(dyn std::error::Error + 'static)) {
        // Fire-and-forget per the trait contract; over-reporting beyond the
        // expected count is dropped by the collector and logged there.
        let _ = self.collector.try_deliver(error.to_string());
    }
}

// The `Arc<T>: VerticleFactory` forwarding impl lives in davit-core (the
// trait's owning crate); the orphan rule forbids defining it here. A shared
// fake can still be registered as `Box<dyn VerticleFactory>` via that impl
// and inspected through another retained `Arc` handle.
