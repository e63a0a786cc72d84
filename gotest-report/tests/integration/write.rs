// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::{Result, ensure};
use gotest_report::{
    config::ReportConfig,
    report::{OutputStorePolicy, build_report},
};

#[test]
fn write_creates_parent_dirs() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let path = dir.path().join("nested/cov/cov.xml");

    let report = build_report(GO_TEST_TRANSCRIPT.as_bytes(), created_at())?;
    report.write_to_path(&path, OutputStorePolicy::default())?;

    let contents = std::fs::read_to_string(&path)?;
    ensure!(
        contents == report.to_xml_string(OutputStorePolicy::default())?,
        "file matches serialized report"
    );

    // Only the report is left behind in the directory.
    let entries: Vec<_> = path
        .parent()
        .expect("report path has a parent")
        .read_dir_utf8()?
        .map(|entry| entry.map(|entry| entry.file_name().to_owned()))
        .collect::<Result<_, _>>()?;
    ensure!(entries == ["cov.xml"], "unexpected entries: {entries:?}");

    Ok(())
}

#[test]
fn write_overwrites_existing_report() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let path = dir.path().join("cov.xml");
    std::fs::write(&path, "stale")?;

    let report = build_report(GO_TEST_TRANSCRIPT.as_bytes(), created_at())?;
    report.write_to_path(&path, OutputStorePolicy::default())?;

    let contents = std::fs::read_to_string(&path)?;
    ensure!(contents.starts_with("<?xml"), "report was replaced: {contents}");
    Ok(())
}

#[test]
fn config_drives_output() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let config_dir = dir.path().join(".config");
    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(
        config_dir.join("gotest-xml.toml"),
        "[report]\npath = \"out/report.xml\"\nstore-success-output = false\n",
    )?;

    let config = ReportConfig::from_sources(dir.path(), None)?;
    let path = config.report_path()?;
    ensure!(
        path == dir.path().join("out/report.xml"),
        "relative path resolved against base dir: {path}"
    );

    let report = build_report(GO_TEST_TRANSCRIPT.as_bytes(), created_at())?;
    report.write_to_path(&path, config.output_policy())?;

    let contents = std::fs::read_to_string(&path)?;
    ensure!(
        !contents.contains("--- PASS: TestInit"),
        "passing output is dropped"
    );
    ensure!(
        contents.contains("--- FAIL: TestApply"),
        "failing output is kept"
    );
    Ok(())
}
