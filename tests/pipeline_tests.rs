use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn nlreport_cmd() -> Command {
    Command::cargo_bin("nlreport").unwrap()
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn csv_line(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| quote_cell(c))
        .collect::<Vec<_>>()
        .join(",")
}

const HEADER: &str = "\"#\",\"Workgroup Id\",\"WISE Id 1\",\"WISE Id 2\",\"WISE Id 3\",\"Step Work Id\",\"Step Title\",\"Step Type\",\"Step Prompt\",\"Node Id\",\"Post Time (Server Clock)\",\"Start Time (Student Clock)\",\"End Time (Student Clock)\",\"Time Spent (Seconds)\",\"Teacher Score Timestamp\",\"Teacher Score\",\"Teacher Comment Timestamp\",\"Teacher Comment\",\"Classmate Id\",\"Receiving Text\",\"Student Work\"";

#[allow(clippy::too_many_arguments)]
fn data_row(
    number: &str,
    workgroup: &str,
    title: &str,
    step_type: &str,
    start: &str,
    end: &str,
    seconds: &str,
    work: &str,
) -> String {
    csv_line(&[
        number, workgroup, "9001", "", "", "5001", title, step_type, "prompt", "node_1.0",
        "post", start, end, seconds, "", "", "", "", "", "", work,
    ])
}

fn artifact_block() -> String {
    [
        HEADER.replace("\"#\"", "\"Workgroup Id\""),
        "\"100\",\"dup\"".to_string(),
        "\"100\",\"dup\"".to_string(),
        "\"100\",\"dup\"".to_string(),
    ]
    .join("\n")
}

const SESSION_WITH_LEGACY_SUMMARY: &str = r#"Response #1: {"description":{"modelInformation":{"name":"Airbag Model","fileName":"airbag.nlogo","version":26},"computationalInputs":[{"label":"car speed","min":0,"max":100,"units":"mph"}],"computationalOutputs":[{"label":"impact force","min":0,"max":5000,"units":"N"}],"representationalInputs":[{"label":"view"}],"studentInputs":[{"label":"hypothesis"}]},"runs":[{"computationalInputs":[55],"computationalOutputs":[1200],"representationalInputs":["front"],"studentInputs":["deploys"],"inquirySummary":[1 2 3]}]}"#;

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let export = [
        "\"Project Name\",\"Designing a Safer Airbag\"".to_string(),
        "\"Run Id\",\"4239\"".to_string(),
        String::new(),
        HEADER.to_string(),
        data_row(
            "1",
            "100",
            "Crash test",
            "Netlogo",
            "Sep 21, 2011 10:01:00 AM",
            "Sep 21, 2011 10:05:00 AM",
            "240",
            SESSION_WITH_LEGACY_SUMMARY,
        ),
        artifact_block(),
        data_row(
            "2",
            "101",
            "Intro",
            "Html",
            "Sep 21, 2011 10:02:00 AM",
            "Sep 21, 2011 10:03:00 AM",
            "60",
            "Response #1: just text",
        ),
        data_row(
            "3",
            "100",
            "Crash test",
            "Netlogo",
            "Sep 21, 2011 10:06:00 AM",
            "Sep 21, 2011 10:07:00 AM",
            "60",
            "Response #1: ",
        ),
        data_row(
            "4",
            "101",
            "Crash test",
            "Netlogo",
            "Sep 21, 2011 10:08:00 AM",
            "Sep 21, 2011 10:09:00 AM",
            "60",
            "Response #1: {broken",
        ),
        data_row(
            "5",
            "102",
            "Reflection",
            "OpenResponse",
            "Sep 21, 2011 10:10:00 AM",
            "Sep 21, 2011 10:11:00 AM",
            "60",
            "Response #1: thoughts",
        ),
    ]
    .join("\n");

    let path = dir.join("export.csv");
    fs::write(&path, export + "\n").unwrap();
    path
}

#[test]
fn test_full_report_for_fixture_export() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path());

    nlreport_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:       5"))
        .stdout(predicate::str::contains("Workgroups: 3"))
        .stdout(predicate::str::contains("NetLogo step sessions:    3"))
        .stdout(predicate::str::contains(
            "Step Types: [Netlogo, Html, OpenResponse]",
        ))
        .stdout(predicate::str::contains("Workgroup: 100"))
        .stdout(predicate::str::contains("Workgroup: 102"));
}

#[test]
fn test_legacy_inquiry_summary_recovered_and_printed() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path());

    nlreport_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Model Information:"))
        .stdout(predicate::str::contains("name:      Airbag Model"))
        .stdout(predicate::str::contains("Number of runs: 1"))
        .stdout(predicate::str::contains("Computational inputs: 1"))
        .stdout(predicate::str::contains("values(55)"))
        .stdout(predicate::str::contains("values(1200)"))
        .stdout(predicate::str::contains("Inquiry summaries:\n[1 2 3]"));
}

#[test]
fn test_sentinels_reported_per_session() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path());

    nlreport_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Student work:   nodata"))
        .stdout(predicate::str::contains("Student work:   invalid JSON"));
}

#[test]
fn test_workgroup_without_netlogo_steps() {
    let tmp = TempDir::new().unwrap();
    let path = write_fixture(tmp.path());

    let output = nlreport_cmd().arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let wg102 = stdout
        .split("Workgroup: 102")
        .nth(1)
        .expect("workgroup 102 section");
    assert!(wg102.contains("NetLogo steps: 0"));
    assert!(!wg102.contains("Step name:"));
}

#[test]
fn test_export_without_artifact_blocks() {
    let tmp = TempDir::new().unwrap();
    let export = [
        "\"Project Name\",\"Airbag\"".to_string(),
        "\"Run Id\",\"4239\"".to_string(),
        String::new(),
        HEADER.to_string(),
        data_row("1", "100", "Intro", "Html", "a", "b", "10", ""),
    ]
    .join("\n");
    let path = tmp.path().join("plain.csv");
    fs::write(&path, export + "\n").unwrap();

    nlreport_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:       1"))
        .stdout(predicate::str::contains("NetLogo step sessions:    0"));
}
