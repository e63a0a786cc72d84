// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{
    errors::SerializeError,
    report::{Counts, OutputStorePolicy, Report, TestPackage, TestUnit},
};
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io;

static ALL_TAG: &str = "all";
static PKG_TAG: &str = "pkg";
static UT_TAG: &str = "ut";
static OUTPUT_TAG: &str = "output";

pub(crate) fn serialize_report(
    report: &Report,
    policy: OutputStorePolicy,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new_with_indent(writer, b'\t', 1);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, policy, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_report_impl(
    report: &Report,
    policy: OutputStorePolicy,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report {
        created_at,
        counts,
        packages,
    } = report;

    let mut all_tag = BytesStart::new(ALL_TAG);
    all_tag.push_attribute(("xml-create-time", created_at.format("%+").to_string().as_str()));
    push_counts(&mut all_tag, counts);

    if packages.is_empty() {
        writer.write_event(Event::Empty(all_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(all_tag))?;
    for package in packages {
        serialize_package(package, policy, writer)?;
    }
    serialize_end_tag(ALL_TAG, writer)?;

    Ok(())
}

fn serialize_package(
    package: &TestPackage,
    policy: OutputStorePolicy,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestPackage {
        name,
        output,
        outcome,
        timestamp: _,
        elapsed: _,
        timing,
        counts,
        units,
        ..
    } = package;

    let mut pkg_tag = BytesStart::new(PKG_TAG);
    pkg_tag.push_attribute(("package", strip_control_chars(name).as_str()));
    if let Some(outcome) = outcome {
        pkg_tag.push_attribute(("action", outcome.as_str()));
    }
    if let Some(timing) = timing {
        pkg_tag.push_attribute(("start-time", timing.start_time().to_string().as_str()));
        pkg_tag.push_attribute(("end-time", timing.end_time().to_string().as_str()));
        pkg_tag.push_attribute(("dur", timing.display_duration().to_string().as_str()));
    }
    push_counts(&mut pkg_tag, counts);

    if output.is_empty() && units.is_empty() {
        writer.write_event(Event::Empty(pkg_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(pkg_tag))?;
    if !output.is_empty() {
        serialize_output(output, writer)?;
    }
    for unit in units {
        serialize_unit(unit, policy, writer)?;
    }
    serialize_end_tag(PKG_TAG, writer)?;

    Ok(())
}

fn serialize_unit(
    unit: &TestUnit,
    policy: OutputStorePolicy,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestUnit {
        name,
        package,
        output,
        outcome,
        timestamp: _,
        elapsed: _,
        timing,
        bench: _,
        ..
    } = unit;

    let mut ut_tag = BytesStart::new(UT_TAG);
    ut_tag.push_attribute(("name", strip_control_chars(name).as_str()));
    ut_tag.push_attribute(("package", strip_control_chars(package).as_str()));
    ut_tag.push_attribute(("action", outcome.as_str()));
    ut_tag.push_attribute(("start-time", timing.start_time().to_string().as_str()));
    ut_tag.push_attribute(("end-time", timing.end_time().to_string().as_str()));
    ut_tag.push_attribute(("dur", timing.display_duration().to_string().as_str()));

    if output.is_empty() || !policy.should_store(*outcome) {
        writer.write_event(Event::Empty(ut_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(ut_tag))?;
    serialize_output(output, writer)?;
    serialize_end_tag(UT_TAG, writer)?;

    Ok(())
}

fn push_counts(tag: &mut BytesStart<'_>, counts: &Counts) {
    let Counts {
        total,
        pass,
        skip,
        bench,
        fail,
    } = counts;

    for (key, value) in [
        ("total", total),
        ("pass", pass),
        ("skip", skip),
        ("bench", bench),
        ("fail", fail),
    ] {
        tag.push_attribute((key, value.to_string().as_str()));
    }
}

fn serialize_output(
    output: &str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    writer.write_event(Event::Start(BytesStart::new(OUTPUT_TAG)))?;

    // Parsers normalize a bare `\r` to `\n`, so it is written as a character reference.
    let output = strip_control_chars(output);
    let escaped = escape(&output).replace('\r', "&#13;");
    writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;

    serialize_end_tag(OUTPUT_TAG, writer)
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))?;
    Ok(())
}

/// Removes characters that cannot be represented in XML 1.0. Tabs and newlines are kept.
fn strip_control_chars(output: &str) -> String {
    output.replace(
        |c| matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f'),
        "",
    )
}
