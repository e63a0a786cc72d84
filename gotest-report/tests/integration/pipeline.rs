// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use gotest_report::{
    errors::{AggregateError, BuildReportError},
    events::Outcome,
    report::{Counts, OutputStorePolicy, ReportAssembler, build_report},
};
use pretty_assertions::assert_eq;

#[test]
fn transcript_hierarchy() -> Result<()> {
    let report = build_report(GO_TEST_TRANSCRIPT.as_bytes(), created_at())?;

    assert_eq!(report.created_at, created_at());
    assert_eq!(
        report.counts,
        Counts {
            total: 4,
            pass: 2,
            skip: 1,
            bench: 1,
            fail: 1,
        }
    );

    let names: Vec<_> = report.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        ["example.com/modify", "example.com/util", "example.com/empty"]
    );

    let modify = &report.packages[0];
    assert_eq!(modify.outcome, Some(Outcome::Fail));
    assert_eq!(modify.output, "FAIL\nFAIL\texample.com/modify\t0.252s\n");
    let units: Vec<_> = modify
        .units
        .iter()
        .map(|unit| (unit.name.as_str(), unit.outcome))
        .collect();
    assert_eq!(
        units,
        [("TestInit", Outcome::Pass), ("TestApply", Outcome::Fail)]
    );
    assert_eq!(
        modify.units[1].output,
        "=== RUN   TestApply\n    apply_test.go:12: expected 2, got 3\n--- FAIL: TestApply (0.25s)\n"
    );

    let apply_timing = &modify.units[1].timing;
    assert_eq!(apply_timing.end_time().to_string(), "16:58:49.437");
    assert_eq!(apply_timing.start_time().to_string(), "16:58:49.687");
    assert_eq!(apply_timing.display_duration().to_string(), "250ms");

    let package_timing = modify.timing.as_ref().expect("modify concluded with timing");
    assert_eq!(package_timing.end_time().to_string(), "16:58:49.438");
    assert_eq!(package_timing.start_time().to_string(), "16:58:49.690");
    assert_eq!(package_timing.display_duration().to_string(), "252ms");

    let util = &report.packages[1];
    assert_eq!(util.outcome, Some(Outcome::Pass));
    assert_eq!(
        util.counts,
        Counts {
            total: 2,
            pass: 1,
            skip: 1,
            bench: 1,
            fail: 0,
        }
    );
    let units: Vec<_> = util.units.iter().map(|unit| unit.name.as_str()).collect();
    assert_eq!(units, ["TestHelper", "BenchmarkSum"]);
    assert!(util.units[1].bench);
    assert_eq!(
        util.units[1].timing.display_duration().to_string(),
        "1s 500ms"
    );

    let empty = &report.packages[2];
    assert_eq!(empty.outcome, Some(Outcome::Skip));
    assert_eq!(empty.counts, Counts::default());
    assert!(empty.units.is_empty());

    // Counts at each level add up.
    let mut summed = Counts::default();
    for package in &report.packages {
        summed += &package.counts;
    }
    ensure!(summed == report.counts, "package counts sum to report counts");

    Ok(())
}

#[test]
fn transcript_xml() -> Result<()> {
    let report = build_report(GO_TEST_TRANSCRIPT.as_bytes(), created_at())?;
    let xml = report.to_xml_string(OutputStorePolicy::default())?;

    for expected in [
        r#"<all xml-create-time="2022-01-23T16:58:51.500+08:00" total="4" pass="2" skip="1" bench="1" fail="1">"#,
        r#"<pkg package="example.com/modify" action="fail" start-time="16:58:49.690" end-time="16:58:49.438" dur="252ms" total="2" pass="1" skip="0" bench="0" fail="1">"#,
        r#"<ut name="TestApply" package="example.com/modify" action="fail" start-time="16:58:49.687" end-time="16:58:49.437" dur="250ms">"#,
        r#"<ut name="BenchmarkSum" package="example.com/util" action="pass" start-time="16:58:52.500" end-time="16:58:51.000" dur="1s 500ms">"#,
        r#"<pkg package="example.com/util" action="pass" start-time="16:58:52.520" end-time="16:58:51.010" dur="1s 510ms" total="2" pass="1" skip="1" bench="1" fail="0">"#,
        r#"<pkg package="example.com/empty" action="skip" start-time="16:58:51.020" end-time="16:58:51.020" dur="0s" total="0" pass="0" skip="0" bench="0" fail="0">"#,
        "<output>?   \texample.com/empty\t[no test files]\n</output>",
    ] {
        ensure!(xml.contains(expected), "expected {expected:?} in:\n{xml}");
    }

    Ok(())
}

#[test]
fn truncated_transcript() {
    let err = build_report(TRUNCATED_TRANSCRIPT.as_bytes(), created_at())
        .expect_err("TestApply never concluded");
    match err {
        BuildReportError::Aggregate(AggregateError::IncompleteTest { key }) => {
            assert_eq!(key.package, "example.com/modify");
            assert_eq!(key.test.as_deref(), Some("TestApply"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_record_aborts() {
    let input = format!("{GO_TEST_TRANSCRIPT}{{\"Action\":\"output\",");
    let err = build_report(input.as_bytes(), created_at()).expect_err("last record is cut off");
    match err {
        BuildReportError::Read(err) => assert_eq!(err.index(), 26),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn assembler_default_creation_time() -> Result<()> {
    let before = chrono::Local::now().fixed_offset();
    let report = ReportAssembler::new().assemble_from(GO_TEST_TRANSCRIPT.as_bytes())?;
    let after = chrono::Local::now().fixed_offset();

    ensure!(
        before <= report.created_at && report.created_at <= after,
        "creation time {} is when assembly began",
        report.created_at
    );
    Ok(())
}
