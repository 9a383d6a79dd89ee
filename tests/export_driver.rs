// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export driver behaviour against an in-memory host

mod common;

use common::{HostCall, MockHost};
use paramexport::params::ParameterTable;
use paramexport::report::{ExportRecord, RunWarning};
use paramexport::{
    discover_targets, CombinationMap, DriverOptions, ExportDriver, FailurePolicy,
    MissingParameterPolicy,
};
use std::collections::BTreeMap;

fn combinations(table: &str) -> CombinationMap {
    ParameterTable::parse_str(table).unwrap().combinations()
}

fn bracket_host() -> MockHost {
    MockHost::new()
        .with_component("Bracket v3", &["Body1"])
        .with_parameter("Thickness", "3mm")
        .with_parameter("Holes", "2")
}

const BRACKET_TABLE: &str = "Bracket,Thickness,1mm,2mm\nBracket,Holes,4,6\n";

#[test]
fn test_bracket_exports_every_combination() {
    let mut host = bracket_host();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert!(report.is_success());
    assert_eq!(report.exported(), 4);
    assert_eq!(
        host.exported_names(),
        vec![
            "Bracket_Body1_Thickness_1mm_Holes_4.stl",
            "Bracket_Body1_Thickness_1mm_Holes_6.stl",
            "Bracket_Body1_Thickness_2mm_Holes_4.stl",
            "Bracket_Body1_Thickness_2mm_Holes_6.stl",
        ]
    );

    // Each export sees the parameters of its own combination
    let seen: Vec<(String, String)> = host
        .exports()
        .iter()
        .map(|call| match call {
            HostCall::Export { parameters, .. } => {
                (parameters["Thickness"].clone(), parameters["Holes"].clone())
            }
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        seen,
        vec![
            ("1mm".to_string(), "4".to_string()),
            ("1mm".to_string(), "6".to_string()),
            ("2mm".to_string(), "4".to_string()),
            ("2mm".to_string(), "6".to_string()),
        ]
    );
}

#[test]
fn test_parameters_are_restored_after_target() {
    let mut host = bracket_host();
    let original = host.parameters.clone();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert_eq!(host.parameters, original);
    assert_eq!(report.restored_parameters, 2);

    // Restoration happens once, after the last export
    let tail: Vec<&HostCall> = host.calls.iter().rev().take(2).collect();
    assert!(tail
        .iter()
        .all(|c| matches!(c, HostCall::Set { expression, .. } if expression == "3mm" || expression == "2")));
}

#[test]
fn test_target_without_parameters_is_exported_once() {
    let mut host = bracket_host().with_component("Lid v1", &["Top"]);
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let driver = ExportDriver::new(&map, DriverOptions::new("/out"));
    assert_eq!(driver.planned_exports(&targets), 5);

    let report = driver.run(&mut host, &targets);
    assert_eq!(report.exported(), 5);
    assert_eq!(host.exported_names().last().unwrap(), "Lid_Top.stl");

    let lid = report.records.last().unwrap();
    assert!(lid.assignments.is_empty());
}

#[test]
fn test_host_yields_before_every_export() {
    let mut host = bracket_host();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    for (i, call) in host.calls.iter().enumerate() {
        if matches!(call, HostCall::Export { .. }) {
            assert_eq!(host.calls[i - 1], HostCall::Yield);
        }
    }
}

#[test]
fn test_best_effort_continues_after_failed_export() {
    let mut host = bracket_host().with_component("Lid v1", &["Top"]);
    host.failing_exports.push("Thickness_1mm_Holes_6".into());
    let original = host.parameters.clone();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert_eq!(report.exported(), 4);
    assert_eq!(report.failed(), 1);
    assert!(report.aborted.is_none());
    assert!(!report.is_success());
    assert_eq!(host.parameters, original);

    let failure = report.failures().next().unwrap();
    assert!(failure
        .path
        .ends_with("Bracket_Body1_Thickness_1mm_Holes_6.stl"));
}

#[test]
fn test_fail_fast_restores_then_stops() {
    let mut host = bracket_host().with_component("Lid v1", &["Top"]);
    host.failing_exports.push("Thickness_1mm_Holes_6".into());
    let original = host.parameters.clone();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let options = DriverOptions::new("/out").with_failure_policy(FailurePolicy::FailFast);
    let report = ExportDriver::new(&map, options).run(&mut host, &targets);

    assert_eq!(report.exported(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.aborted.is_some());
    assert_eq!(host.parameters, original);
    assert!(!host.exported_names().contains(&"Lid_Top.stl".to_string()));
}

#[test]
fn test_rejected_value_fails_its_combinations_only() {
    let mut host = bracket_host();
    host.rejected_expressions.push("2mm".into());
    let original = host.parameters.clone();
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert_eq!(report.exported(), 2);
    assert_eq!(report.failed(), 2);
    assert_eq!(host.parameters, original);
}

#[test]
fn test_missing_parameter_is_skipped_with_warning() {
    let mut host = bracket_host();
    let map = combinations("Bracket,Thickness,1mm\nBracket,Color,red\n");
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert!(report.is_success());
    assert_eq!(host.exported_names(), vec!["Bracket_Body1_Thickness_1mm.stl"]);
    assert_eq!(
        report.warnings,
        vec![RunWarning::MissingParameter {
            target: "Bracket".into(),
            parameter: "Color".into(),
        }]
    );
}

#[test]
fn test_strict_mode_fails_on_missing_parameter() {
    let mut host = bracket_host();
    let original = host.parameters.clone();
    let map = combinations("Bracket,Thickness,1mm\nBracket,Color,red\n");
    let targets = discover_targets(&host);

    let options =
        DriverOptions::new("/out").with_missing_parameters(MissingParameterPolicy::Error);
    let report = ExportDriver::new(&map, options).run(&mut host, &targets);

    assert_eq!(report.exported(), 0);
    assert_eq!(report.failed(), 1);
    assert!(host.exported_names().is_empty());
    assert_eq!(host.parameters, original);
}

#[test]
fn test_restore_failure_aborts_run() {
    let mut host = bracket_host().with_component("Lid v1", &["Top"]);
    // The original Thickness cannot be written back
    host.rejected_expressions.push("3mm".into());
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert_eq!(report.exported(), 4);
    let reason = report.aborted.as_deref().unwrap();
    assert!(reason.contains("Thickness"));
    assert!(!host.exported_names().contains(&"Lid_Top.stl".to_string()));

    // Holes was still restored
    assert_eq!(host.parameters["Holes"], "2");
}

#[test]
fn test_colliding_output_paths_are_reported() {
    let mut host = MockHost::new()
        .with_component("Bracket v1", &["Body1"])
        .with_component("Bracket v2", &["Body1"]);
    let map = CombinationMap::default();
    let targets = discover_targets(&host);

    let report = ExportDriver::new(&map, DriverOptions::new("/out")).run(&mut host, &targets);

    assert_eq!(report.exported(), 2);
    assert!(matches!(
        report.warnings.as_slice(),
        [RunWarning::DuplicateOutput { path }] if path.ends_with("Bracket_Body1.stl")
    ));
}

#[test]
fn test_observer_sees_every_attempt() {
    let mut host = bracket_host();
    host.failing_exports.push("Holes_4".into());
    let map = combinations(BRACKET_TABLE);
    let targets = discover_targets(&host);

    let mut seen = BTreeMap::new();
    ExportDriver::new(&map, DriverOptions::new("/out")).run_with_observer(
        &mut host,
        &targets,
        &mut |record: &ExportRecord| {
            seen.insert(record.path.clone(), record.is_exported());
        },
    );

    assert_eq!(seen.len(), 4);
    assert_eq!(seen.values().filter(|ok| !**ok).count(), 2);
}
