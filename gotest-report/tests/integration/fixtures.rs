// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset};
use indoc::indoc;

/// Output of `go test -json ./...` over three packages, with two of them running in parallel.
pub(crate) static GO_TEST_TRANSCRIPT: &str = indoc! {r#"
    {"Time":"2022-01-23T16:58:49.186901+08:00","Action":"run","Package":"example.com/modify","Test":"TestInit"}
    {"Time":"2022-01-23T16:58:49.187002+08:00","Action":"output","Package":"example.com/modify","Test":"TestInit","Output":"=== RUN   TestInit\n"}
    {"Time":"2022-01-23T16:58:49.187410+08:00","Action":"output","Package":"example.com/modify","Test":"TestInit","Output":"--- PASS: TestInit (0.00s)\n"}
    {"Time":"2022-01-23T16:58:49.187421+08:00","Action":"pass","Package":"example.com/modify","Test":"TestInit","Elapsed":0}
    {"Time":"2022-01-23T16:58:49.187450+08:00","Action":"run","Package":"example.com/modify","Test":"TestApply"}
    {"Time":"2022-01-23T16:58:49.190000+08:00","Action":"run","Package":"example.com/util","Test":"TestHelper"}
    {"Time":"2022-01-23T16:58:49.187460+08:00","Action":"output","Package":"example.com/modify","Test":"TestApply","Output":"=== RUN   TestApply\n"}
    {"Time":"2022-01-23T16:58:49.190100+08:00","Action":"output","Package":"example.com/util","Test":"TestHelper","Output":"=== RUN   TestHelper\n"}
    {"Time":"2022-01-23T16:58:49.190200+08:00","Action":"output","Package":"example.com/util","Test":"TestHelper","Output":"    helper_test.go:9: needs network\n"}
    {"Time":"2022-01-23T16:58:49.190300+08:00","Action":"output","Package":"example.com/util","Test":"TestHelper","Output":"--- SKIP: TestHelper (0.00s)\n"}
    {"Time":"2022-01-23T16:58:49.190500+08:00","Action":"skip","Package":"example.com/util","Test":"TestHelper","Elapsed":0}
    {"Time":"2022-01-23T16:58:49.437000+08:00","Action":"output","Package":"example.com/modify","Test":"TestApply","Output":"    apply_test.go:12: expected 2, got 3\n"}
    {"Time":"2022-01-23T16:58:49.437500+08:00","Action":"output","Package":"example.com/modify","Test":"TestApply","Output":"--- FAIL: TestApply (0.25s)\n"}
    {"Time":"2022-01-23T16:58:49.437512+08:00","Action":"fail","Package":"example.com/modify","Test":"TestApply","Elapsed":0.25}
    {"Time":"2022-01-23T16:58:49.437600+08:00","Action":"output","Package":"example.com/modify","Output":"FAIL\n"}
    {"Time":"2022-01-23T16:58:49.438000+08:00","Action":"output","Package":"example.com/modify","Output":"FAIL\texample.com/modify\t0.252s\n"}
    {"Time":"2022-01-23T16:58:49.438100+08:00","Action":"fail","Package":"example.com/modify","Elapsed":0.252}
    {"Time":"2022-01-23T16:58:49.500000+08:00","Action":"run","Package":"example.com/util","Test":"BenchmarkSum"}
    {"Time":"2022-01-23T16:58:49.500100+08:00","Action":"output","Package":"example.com/util","Test":"BenchmarkSum","Output":"BenchmarkSum\n"}
    {"Time":"2022-01-23T16:58:50.999000+08:00","Action":"bench","Package":"example.com/util","Test":"BenchmarkSum","Output":"BenchmarkSum-8   \t1000000000\t         0.2500 ns/op\n"}
    {"Time":"2022-01-23T16:58:51.000000+08:00","Action":"pass","Package":"example.com/util","Test":"BenchmarkSum","Elapsed":1.5}
    {"Time":"2022-01-23T16:58:51.005000+08:00","Action":"output","Package":"example.com/util","Output":"PASS\n"}
    {"Time":"2022-01-23T16:58:51.008000+08:00","Action":"output","Package":"example.com/util","Output":"ok  \texample.com/util\t1.510s\n"}
    {"Time":"2022-01-23T16:58:51.010000+08:00","Action":"pass","Package":"example.com/util","Elapsed":1.51}
    {"Time":"2022-01-23T16:58:51.015000+08:00","Action":"output","Package":"example.com/empty","Output":"?   \texample.com/empty\t[no test files]\n"}
    {"Time":"2022-01-23T16:58:51.020000+08:00","Action":"skip","Package":"example.com/empty","Elapsed":0}
"#};

/// The same run as [`GO_TEST_TRANSCRIPT`], cut off while `TestApply` is still running.
pub(crate) static TRUNCATED_TRANSCRIPT: &str = indoc! {r#"
    {"Time":"2022-01-23T16:58:49.186901+08:00","Action":"run","Package":"example.com/modify","Test":"TestInit"}
    {"Time":"2022-01-23T16:58:49.187421+08:00","Action":"pass","Package":"example.com/modify","Test":"TestInit","Elapsed":0}
    {"Time":"2022-01-23T16:58:49.187450+08:00","Action":"run","Package":"example.com/modify","Test":"TestApply"}
    {"Time":"2022-01-23T16:58:49.187460+08:00","Action":"output","Package":"example.com/modify","Test":"TestApply","Output":"=== RUN   TestApply\n"}
"#};

pub(crate) fn created_at() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2022-01-23T16:58:51.500000+08:00").expect("valid timestamp")
}
