//! Shared test utilities for davit integration tests.
//!
//! The centerpiece is [`Collector`], the bounded result collector that
//! turns asynchronous callback deliveries into synchronously-awaitable
//! values for assertions. [`fake`] adds in-memory factory and reporter
//! doubles for exercising the davit-core seams without a real toolchain.

pub mod collector;
pub mod fake;

pub use collector::Collector;
pub use fake::{CollectingReporter, FakeVerticleFactory};
