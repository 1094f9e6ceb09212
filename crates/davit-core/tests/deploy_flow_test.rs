//! End-to-end deployment flow: registry resolution, prefix stripping,
//! toolchain compilation, and failure reporting, with a real (if trivial)
//! external compiler: `cp`.

use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use davit_core::{
    AdapterConfig, CommandToolchain, DeployContext, DescriptorMarkers, FactoryRegistry,
    LangVerticleFactory, LoadError,
};
use davit_testkit::CollectingReporter;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Route collector/factory warnings to test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("davit_core=debug,davit_testkit=debug")
        .with_test_writer()
        .try_init();
}

/// Toolchain whose compiler is `cp {source} {artifact}`.
fn copy_toolchain() -> CommandToolchain {
    CommandToolchain::new(
        "cp",
        vec!["{source}".to_string(), "{artifact}".to_string()],
        "unit",
    )
}

fn cadence_markers() -> DescriptorMarkers {
    DescriptorMarkers::new("cadence", "cad").unwrap()
}

/// A source tree with one compilable file, plus a separate output dir.
fn fixture() -> (TempDir, DeployContext, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let source = tmp.path().join("hello.cad");
    std::fs::write(&source, "unit Hello {}\n").expect("failed to write source");
    let ctx = DeployContext::new(tmp.path(), tmp.path().join("out"));
    (tmp, ctx, source)
}

fn registry() -> FactoryRegistry {
    let mut registry = FactoryRegistry::new();
    registry
        .register(LangVerticleFactory::new(cadence_markers(), copy_toolchain()))
        .expect("registration failed");
    registry
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suffix_identifier_compiles_and_loads() {
    let (_tmp, ctx, _source) = fixture();
    let registry = registry();

    let handle = registry.load("hello.cad", &ctx).await.expect("load failed");

    assert_eq!(handle.language, "cadence");
    assert_eq!(handle.main, "hello.cad");

    let artifact = handle.artifact.expect("suffix load must produce artifact");
    assert_eq!(artifact, ctx.output_dir.join("hello.unit"));
    let contents = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(contents, "unit Hello {}\n");
}

#[tokio::test]
async fn prefix_identifier_loads_without_compiling() {
    let (_tmp, ctx, _source) = fixture();
    let registry = registry();

    let handle = registry
        .load("cadence:com.example.Hello", &ctx)
        .await
        .expect("load failed");

    assert_eq!(handle.main, "com.example.Hello");
    assert!(handle.artifact.is_none());
    assert!(
        !ctx.output_dir.exists(),
        "no toolchain run means no output directory"
    );
}

#[tokio::test]
async fn both_markers_compile_first_then_strip() {
    let (tmp, ctx, _source) = fixture();
    // The suffix check runs on the identifier as received, so the source
    // fixture must carry the prefix in its file name.
    std::fs::write(tmp.path().join("cadence:hello.cad"), "unit Hello {}\n").unwrap();
    let registry = registry();

    let handle = registry
        .load("cadence:hello.cad", &ctx)
        .await
        .expect("load failed");

    assert_eq!(handle.main, "hello.cad", "prefix stripped after compile");
    assert!(handle.artifact.is_some(), "compile step ran");
}

#[tokio::test]
async fn unowned_identifier_never_reaches_a_factory() {
    let (_tmp, ctx, _source) = fixture();
    let registry = registry();

    assert!(!registry.owns("groovy:com.example.Hello"));
    let err = registry
        .load("groovy:com.example.Hello", &ctx)
        .await
        .expect_err("unowned identifier must not load");
    assert!(matches!(err, LoadError::NoFactory(_)));
}

#[tokio::test]
async fn missing_source_is_reported_and_propagated() {
    let (_tmp, ctx, _source) = fixture();

    let reporter = CollectingReporter::new(1);
    let reports = reporter.collector();

    let mut registry = FactoryRegistry::new();
    registry
        .register(LangVerticleFactory::with_reporter(
            cadence_markers(),
            copy_toolchain(),
            reporter,
        ))
        .unwrap();

    let err = registry
        .load("ghost.cad", &ctx)
        .await
        .expect_err("expected missing source");
    assert!(matches!(err, LoadError::SourceMissing(_)));

    // The same failure must have reached the injected sink.
    assert!(reports.wait_timeout(std::time::Duration::from_secs(1)).await);
    let reported = reports.poll().expect("sink must hold the failure");
    assert!(reported.contains("ghost.cad"));
}

#[tokio::test]
async fn compiler_failure_is_reported_and_propagated() {
    let (_tmp, ctx, _source) = fixture();

    let reporter = CollectingReporter::new(1);
    let reports = reporter.collector();

    let mut registry = FactoryRegistry::new();
    registry
        .register(LangVerticleFactory::with_reporter(
            cadence_markers(),
            // `false` exits 1 for any input.
            CommandToolchain::new("false", vec![], "unit"),
            reporter,
        ))
        .unwrap();

    let err = registry
        .load("hello.cad", &ctx)
        .await
        .expect_err("expected toolchain failure");
    assert!(matches!(err, LoadError::Toolchain { .. }));
    assert!(reports.wait_timeout(std::time::Duration::from_secs(1)).await);
}

#[tokio::test]
async fn config_file_drives_the_whole_flow() -> Result<()> {
    init_tracing();
    let (tmp, ctx, _source) = fixture();

    let config_path = tmp.path().join("adapters.toml");
    std::fs::write(
        &config_path,
        r#"
[[adapter]]
language = "cadence"
extension = "cad"

[adapter.compiler]
program = "cp"
args = ["{source}", "{artifact}"]
artifact_extension = "unit"
"#,
    )?;

    let config = AdapterConfig::from_path(&config_path)?;
    let registry = config.build_registry()?;

    let handle = registry.load("hello.cad", &ctx).await?;
    assert!(handle.artifact.expect("artifact expected").exists());
    Ok(())
}
