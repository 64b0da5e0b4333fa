//! End-to-end tests for the genwith binary

use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;

fn genwith(dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_genwith"))
        .args(args)
        .arg("--output-dir")
        .arg(dir)
        .arg("--no-format")
        .output()?;
    Ok(output)
}

#[test]
fn test_generates_file_named_after_package() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = genwith(dir.path(), &["--config", "--endpoint", "--package", "acme"])?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let generated = std::fs::read_to_string(dir.path().join("acme_with.go"))?;
    assert!(generated
        .starts_with("// Code generated by \"genwith --config --endpoint --package acme "));
    assert!(generated.contains("\npackage acme\n"));
    assert!(generated.contains("func WithConfig("));
    Ok(())
}

#[test]
fn test_rejects_both_endpoints() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = genwith(
        dir.path(),
        &["--config", "--endpoint", "--endpoint-func", "--package", "acme"],
    )?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("only one of --endpoint or --endpoint-func allowed"));
    assert!(!dir.path().join("acme_with.go").exists());
    Ok(())
}

#[test]
fn test_requires_package() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = genwith(dir.path(), &["--do"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("missing required field: --package"));
    Ok(())
}

#[test]
fn test_flags_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let flags = dir.path().join("weather.yaml");
    std::fs::write(&flags, "package: weather\ndo: true\ndecoder: xml\n")?;

    let output = genwith(dir.path(), &["--flags-file", flags.to_str().unwrap(), "--token"])?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let generated = std::fs::read_to_string(dir.path().join("weather_with.go"))?;
    assert!(generated.contains("xml.NewDecoder(res.Body)"));
    assert!(generated.contains("func WithToken("));
    Ok(())
}

#[test]
fn test_explicit_default_decoder_overrides_flags_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let flags = dir.path().join("weather.toml");
    std::fs::write(&flags, "package = \"weather\"\ndo = true\ndecoder = \"xml\"\n")?;

    let output = genwith(
        dir.path(),
        &["--flags-file", flags.to_str().unwrap(), "--decoder", "json"],
    )?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let generated = std::fs::read_to_string(dir.path().join("weather_with.go"))?;
    assert!(generated.contains("json.NewDecoder(res.Body)"));
    assert!(!generated.contains("xml.NewDecoder"));
    Ok(())
}

#[test]
fn test_flags_file_with_unknown_key_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let flags = dir.path().join("acme.yaml");
    std::fs::write(&flags, "package: acme\nrate_limit: true\n")?;

    let output = genwith(dir.path(), &["--flags-file", flags.to_str().unwrap()])?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("rate_limit"));
    assert!(!dir.path().join("acme_with.go").exists());
    Ok(())
}
