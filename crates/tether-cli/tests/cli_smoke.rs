use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(parts: &[&str]) -> PathBuf {
    let mut p = repo_root().join("fixtures");
    for part in parts {
        p = p.join(part);
    }
    assert!(p.exists(), "fixture missing: {}", p.display());
    p
}

fn stdout_json(output: std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn cli_renders_overlay_svg_to_file() {
    let layout = fixture(&["layouts", "basic.json"]);
    let diagram = fixture(&["diagrams", "basic.json"]);
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("overlay.svg");

    let exe = assert_cmd::cargo_bin!("tether-cli");
    Command::new(exe)
        .args([
            "render",
            "--diagram",
            diagram.to_string_lossy().as_ref(),
            "--out",
            out.to_string_lossy().as_ref(),
            layout.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"viewBox="0 0 1100 700""#));
    assert!(svg.contains(r#"x1="200" y1="142" x2="200" y2="298""#));
    assert!(svg.contains(r##"stroke="#16a34a""##));
    assert!(svg.contains(r#"marker-end="url(#ah-start-target)""#));
    assert!(svg.contains(">yes</text>"));
}

#[test]
fn cli_renders_builtin_tree_with_anchor_boxes() {
    let layout = fixture(&["layouts", "decision_tree.json"]);

    let exe = assert_cmd::cargo_bin!("tether-cli");
    let output = Command::new(exe)
        .args(["--anchor-boxes", layout.to_string_lossy().as_ref()])
        .output()
        .expect("run tether-cli");
    assert!(output.status.success());

    let svg = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(svg.matches("<line ").count(), 20);
    assert_eq!(svg.matches("<marker ").count(), 20);
    assert_eq!(svg.matches("<text ").count(), 4);
    assert_eq!(svg.matches("<rect ").count(), 21);
    assert!(svg.contains(">3°</text>"));
}

#[test]
fn cli_geometry_reports_segments_and_unresolved_edges() {
    let exe = assert_cmd::cargo_bin!("tether-cli");
    let diagram = fixture(&["diagrams", "basic.json"]);

    let output = Command::new(&exe)
        .args([
            "geometry",
            "--diagram",
            diagram.to_string_lossy().as_ref(),
            fixture(&["layouts", "basic.json"]).to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    let frame = stdout_json(output);
    assert_eq!(
        frame["edges"][0]["segment"],
        serde_json::json!({ "x1": 200.0, "y1": 140.0, "x2": 200.0, "y2": 300.0 })
    );
    assert_eq!(frame["labels"][0]["x"], 208.0);

    let output = Command::new(&exe)
        .args([
            "geometry",
            "--diagram",
            diagram.to_string_lossy().as_ref(),
            fixture(&["layouts", "target_unmounted.json"])
                .to_string_lossy()
                .as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    let frame = stdout_json(output);
    assert_eq!(frame["edges"].as_array().map(Vec::len), Some(0));
    assert_eq!(frame["unresolvedEdges"], serde_json::json!([0]));
}

#[test]
fn cli_reads_layout_from_stdin() {
    let layout = fs::read(fixture(&["layouts", "basic.json"])).expect("read layout");
    let diagram = fixture(&["diagrams", "basic.json"]);

    let exe = assert_cmd::cargo_bin!("tether-cli");
    assert_cmd::Command::new(exe)
        .args([
            "geometry",
            "--diagram",
            diagram.to_string_lossy().as_ref(),
            "-",
        ])
        .write_stdin(layout)
        .assert()
        .success();
}

#[test]
fn cli_applies_options_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let options = tmp.path().join("options.json");
    fs::write(
        &options,
        r#"{ "overlay": { "svgId": "chart", "strokeWidth": 3 } }"#,
    )
    .expect("write options");

    let exe = assert_cmd::cargo_bin!("tether-cli");
    let output = Command::new(exe)
        .args([
            "render",
            "--diagram",
            fixture(&["diagrams", "basic.json"]).to_string_lossy().as_ref(),
            "--options",
            options.to_string_lossy().as_ref(),
            fixture(&["layouts", "basic.json"]).to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf8");
    assert!(svg.contains(r#"id="chart""#));
    assert!(svg.contains(r#"stroke-width="3""#));
    assert!(svg.contains(r#"marker id="chart-ah-start-target""#));
}

#[test]
fn cli_validate_accepts_and_rejects_definitions() {
    let exe = assert_cmd::cargo_bin!("tether-cli");

    let output = Command::new(&exe)
        .args([
            "validate",
            fixture(&["diagrams", "basic.json"]).to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "ok: 2 nodes, 1 edges (1 labelled)"
    );

    let output = Command::new(&exe)
        .args([
            "validate",
            fixture(&["diagrams", "dangling.json"]).to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ghost"));

    let output = Command::new(&exe)
        .args([
            "validate",
            fixture(&["diagrams", "duplicate.json"]).to_string_lossy().as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate node id: a"));
}

#[test]
fn cli_replay_recomputes_on_resize_and_stops_after_teardown() {
    let exe = assert_cmd::cargo_bin!("tether-cli");
    let output = Command::new(exe)
        .args([
            "replay",
            "--diagram",
            fixture(&["diagrams", "basic.json"]).to_string_lossy().as_ref(),
            fixture(&["replay", "resize_then_teardown.json"])
                .to_string_lossy()
                .as_ref(),
        ])
        .output()
        .expect("run tether-cli");
    let records = stdout_json(output);
    let records = records.as_array().expect("array of records");
    assert_eq!(records.len(), 6);

    let passes: Vec<u64> = records
        .iter()
        .map(|r| r["passes"].as_u64().unwrap())
        .collect();
    assert_eq!(passes, vec![1, 2, 3, 4, 4, 4]);

    let resized = &records[3];
    assert_eq!(resized["frame"]["width"], 800.0);
    assert_eq!(resized["frame"]["height"], 900.0);
    assert_eq!(
        resized["frame"]["edges"][0]["segment"],
        serde_json::json!({ "x1": 150.0, "y1": 140.0, "x2": 150.0, "y2": 500.0 })
    );
    assert_eq!(records[4]["active"], false);
    assert_eq!(records[5]["frame"]["width"], 800.0);
}

#[test]
fn cli_usage_errors_exit_with_2() {
    let exe = assert_cmd::cargo_bin!("tether-cli");
    Command::new(&exe).arg("--nope").assert().code(2);
    Command::new(&exe).arg("--help").assert().code(2);
}

#[test]
fn cli_rejects_malformed_layout() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let layout = tmp.path().join("bad.json");
    fs::write(
        &layout,
        r#"{ "container": { "x": 0, "y": 0, "width": -1, "height": 10 } }"#,
    )
    .expect("write layout");

    let exe = assert_cmd::cargo_bin!("tether-cli");
    let output = Command::new(exe)
        .args(["geometry", layout.to_string_lossy().as_ref()])
        .output()
        .expect("run tether-cli");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid layout snapshot"));
}
