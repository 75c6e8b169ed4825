mod common;

use common::{FakeProvider, RenderMode, write_html};
use htmlpress::{config::Config, pipeline::Pipeline, report::Outcome};
use std::path::Path;

#[test]
fn unavailable_capability_stops_before_render() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_html(dir.path(), "GANTT_CHART.html");
    let output = dir.path().join("GANTT_CHART.pdf");

    let pipeline = Pipeline::new(&Config::default(), FakeProvider::installable(false));
    let report = pipeline.run(&input, &output);

    assert_eq!(report.status, Outcome::CapabilityUnavailable);
    assert_eq!(pipeline.provider().render_calls.get(), 0);
    assert!(report.renderer.is_none());
    assert!(!output.exists());
}

#[test]
fn installs_then_converts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_html(dir.path(), "GANTT_CHART.html");
    let output = dir.path().join("GANTT_CHART.pdf");

    let pipeline = Pipeline::new(&Config::default(), FakeProvider::installable(true));
    let report = pipeline.run(&input, &output);

    assert_eq!(report.status, Outcome::Converted);
    assert_eq!(pipeline.provider().installs.get(), 1);
    assert_eq!(report.renderer.as_deref(), Some("FakePrint version 1.0"));
    assert!(report.output_bytes.unwrap_or(0) > 0);
    assert_eq!(report.output_sha256.as_ref().map(String::len), Some(64));
}

#[test]
fn render_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_html(dir.path(), "GANTT_CHART.html");
    let output = dir.path().join("GANTT_CHART.pdf");

    let mut provider = FakeProvider::already_available();
    provider.mode = RenderMode::Fail;
    let pipeline = Pipeline::new(&Config::default(), provider);
    let report = pipeline.run(&input, &output);

    assert_eq!(report.status, Outcome::ConversionFailed);
    assert!(report.output_sha256.is_none());
}

#[test]
fn url_inputs_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let pipeline = Pipeline::new(&Config::default(), FakeProvider::installable(true));
    let report = pipeline.run(Path::new("https://example.com/chart.html"), &output);

    assert_eq!(report.status, Outcome::ConversionFailed);
    // rejected before the capability is even looked up
    assert_eq!(pipeline.provider().resolves.get(), 0);
    assert_eq!(pipeline.provider().installs.get(), 0);
    assert_eq!(pipeline.provider().render_calls.get(), 0);
}

#[test]
fn exit_code_follows_strict_mode() {
    let mut cfg = Config::default();
    assert_eq!(htmlpress::cli::exit_code(&cfg, false), 0);
    cfg.global.strict_exit = true;
    assert_eq!(htmlpress::cli::exit_code(&cfg, false), 1);
    assert_eq!(htmlpress::cli::exit_code(&cfg, true), 0);
}
