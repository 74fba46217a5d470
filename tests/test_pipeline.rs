// tests/test_pipeline.rs

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::tempdir;
use termcolor::{ColorSpec, NoColor, WriteColor};

use coexnet::pipeline::{
    create_export, create_web_network, export, generate, write_summary, ExportFormat,
    ExportOptions, NetworkConfig,
};

const TABLE: &str = "\
Tumor,Gene Symbol,PCC
TissueA,Gene1,0.95
TissueA,Gene2,0.81
TissueB,Gene3,0.79
TissueC,</script><b>x</b>,0.9
TissueC,Gene4,NA
";

fn write_table(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("tumor.csv");
    fs::write(&path, TABLE).unwrap();
    path
}

fn config(dir: &Path, output: &str) -> NetworkConfig {
    let mut config = NetworkConfig::new(write_table(dir), "GCH1", dir.join(output));
    config.seed = Some(7);
    config.open_browser = false;
    config
}

#[test]
fn test_html_written_into_nested_directory() {
    let dir = tempdir().unwrap();
    let config = config(dir.path(), "Network Tumor/nested/index.html");
    let generated = create_web_network(&config).expect("page should be written");

    assert_eq!(generated.seed, 7);
    assert!(generated.output.exists());
    assert_eq!(generated.network.tissues().count(), 2);
    assert_eq!(generated.network.genes().count(), 3);
    assert!(generated.network.node("Gene3").is_none());

    let html = fs::read_to_string(&generated.output).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>") || html.starts_with("<!doctype html>"));
    assert!(html.contains("Gene Association Network Centered on GCH1 (PCC &gt;= 0.8)"));
    assert!(html.contains("\"node_type\":\"central\""));
    assert!(html.contains("\"Gene count: 2\""));
    assert!(!html.contains("__NODES_JSON__"));
    assert!(!html.contains("__SETTINGS_JSON__"));
    // The hostile gene name must not close the script element early.
    assert_eq!(html.matches("</script>").count(), 1);
    assert!(html.contains("\\u003c/script>\\u003cb>x\\u003c/b>"));
}

#[test]
fn test_same_seed_same_page() {
    let dir = tempdir().unwrap();
    let first = generate(&config(dir.path(), "a.html")).unwrap();
    let second = generate(&config(dir.path(), "b.html")).unwrap();
    let a = fs::read_to_string(first.output).unwrap();
    let b = fs::read_to_string(second.output).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_custom_title_is_used() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), "index.html");
    config.title = Some("Liver & friends".to_string());
    let generated = generate(&config).unwrap();
    let html = fs::read_to_string(generated.output).unwrap();
    assert!(html.contains("<title>Liver &amp; friends</title>"));
}

#[test]
fn test_missing_input_fails_softly() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), "index.html");
    config.input = dir.path().join("nope.csv");
    assert!(create_web_network(&config).is_none());
    assert!(!dir.path().join("index.html").exists());
}

#[test]
fn test_missing_column_fails_softly() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), "index.html");
    config.columns.pcc = "Correlation".to_string();
    assert!(create_web_network(&config).is_none());
}

#[test]
fn test_export_png_and_svg() {
    let dir = tempdir().unwrap();
    let options = ExportOptions {
        width: 320.0,
        height: 240.0,
        density: 2.0,
        optimize: true,
    };

    let png = create_export(&config(dir.path(), "out/net.png"), &options).unwrap();
    let img = image::open(&png.output).unwrap();
    assert_eq!((img.width(), img.height()), (640, 480));

    let svg = export(&config(dir.path(), "out/net.svg"), &options).unwrap();
    let text = fs::read_to_string(&svg.output).unwrap();
    assert!(text.contains(">TissueA (n=2)</text>"));
    assert!(text.contains("Centered on GCH1"));
}

#[test]
fn test_export_rejects_unknown_extension() {
    let dir = tempdir().unwrap();
    let config = config(dir.path(), "net.bmp");
    assert!(export(&config, &ExportOptions::default()).is_err());
    assert!(create_export(&config, &ExportOptions::default()).is_none());
    assert_eq!(
        ExportFormat::from_path(Path::new("a/B.SVG")).unwrap(),
        ExportFormat::Svg
    );
}

#[test]
fn test_comment_opener_in_data_is_escaped() {
    let dir = tempdir().unwrap();
    let mut config = config(dir.path(), "index.html");
    let input = dir.path().join("comment.csv");
    fs::write(&input, "Tumor,Gene Symbol,PCC\nLiver,<!--<script>,0.9\n").unwrap();
    config.input = input;
    let generated = generate(&config).unwrap();
    let html = fs::read_to_string(generated.output).unwrap();
    assert!(!html.contains("<!--"));
    assert!(html.contains("\\u003c!--\\u003cscript>"));
}

fn hostile_config(dir: &Path, value: &str, output: &str) -> NetworkConfig {
    let input = dir.join(format!("hostile-{}.csv", output.replace('.', "-")));
    fs::write(
        &input,
        format!("Tumor,Gene Symbol,PCC\nA,g1,0.9\nA,g2,{}\n", value),
    )
    .unwrap();
    let mut config = NetworkConfig::new(input, "GCH1", dir.join(output));
    config.seed = Some(1);
    config.open_browser = false;
    config
}

#[test]
fn test_out_of_range_correlations_fail_softly() {
    let dir = tempdir().unwrap();
    for (i, value) in ["inf", "-inf", "1.5", "7.5", "1e300"].iter().enumerate() {
        let png = hostile_config(dir.path(), value, &format!("net{}.png", i));
        assert!(create_export(&png, &ExportOptions::default()).is_none(), "{}", value);
        assert!(!png.output.exists());

        let page = hostile_config(dir.path(), value, &format!("net{}.html", i));
        assert!(create_web_network(&page).is_none(), "{}", value);
        assert!(!page.output.exists());
    }
}

#[test]
fn test_missing_correlation_never_reaches_the_page() {
    let dir = tempdir().unwrap();
    let config = hostile_config(dir.path(), "NA", "index.html");
    let generated = create_web_network(&config).unwrap();
    assert_eq!(generated.network.genes().count(), 1);
    let html = fs::read_to_string(generated.output).unwrap();
    assert!(!html.contains("\":null"));
    assert!(html.contains("\"pcc\":0.9"));
}

#[test]
fn test_default_title_mentions_threshold() {
    let mut config = NetworkConfig::new("in.csv", "TP53", "out.html");
    config.layout.threshold = 0.75;
    assert_eq!(
        config.title(),
        "Gene Association Network Centered on TP53 (PCC >= 0.75)"
    );
}

/// A terminal whose pipe has closed.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }
}

impl WriteColor for ClosedPipe {
    fn supports_color(&self) -> bool {
        true
    }
    fn set_color(&mut self, _spec: &ColorSpec) -> io::Result<()> {
        Ok(())
    }
    fn reset(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_summary_lists_tissues_and_reports_write_errors() {
    let dir = tempdir().unwrap();
    let generated = create_web_network(&config(dir.path(), "index.html")).unwrap();

    let mut out = NoColor::new(Vec::new());
    write_summary(&mut out, &generated.network).unwrap();
    let text = String::from_utf8(out.into_inner()).unwrap();
    assert!(text.contains("2 tissues, 3 genes"));
    assert!(text.contains("TissueA"));
    assert!(text.contains("n=2"));

    let err = write_summary(&mut ClosedPipe, &generated.network).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}
