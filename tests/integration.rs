use std::fs;
use std::process::Command;

#[test]
fn layout_writes_positions_for_every_application() {
    let output_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = output_dir.path().join("layout.json");

    let status = Command::new(env!("CARGO_BIN_EXE_charmviz"))
        .args([
            "layout",
            "--bundle",
            "tests/fixtures/wiki-bundle.yaml",
            "--frames",
            "20",
            "--seed",
            "42",
            "--output",
            output.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to execute charmviz");

    assert!(status.success(), "charmviz exited with error");

    let json = fs::read_to_string(&output).expect("Failed to read layout.json");
    let nodes: serde_json::Value = serde_json::from_str(&json).expect("Invalid JSON");
    let nodes = nodes.as_array().expect("Expected an array of nodes");

    let ids: Vec<_> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    // Node order follows the bundle document
    assert_eq!(ids, vec!["wiki", "db", "cache", "proxy"]);

    // Layout is centered on the origin
    let mut centroid = [0.0f64; 3];
    for node in nodes {
        let position = node["position"].as_array().unwrap();
        assert_eq!(position.len(), 3);
        for (axis, value) in position.iter().enumerate() {
            let value = value.as_f64().unwrap();
            assert!(value.is_finite());
            centroid[axis] += value / nodes.len() as f64;
        }
    }
    for c in centroid {
        assert!(c.abs() < 1e-3, "centroid component {c} not at origin");
    }
}

#[test]
fn layout_with_same_seed_is_reproducible() {
    let run = || {
        let out = Command::new(env!("CARGO_BIN_EXE_charmviz"))
            .args([
                "layout",
                "--bundle",
                "tests/fixtures/wiki-bundle.yaml",
                "--frames",
                "10",
                "--seed",
                "7",
            ])
            .output()
            .expect("Failed to execute charmviz");
        assert!(out.status.success());
        String::from_utf8(out.stdout).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn render_reports_icons_and_draw_calls() {
    let out = Command::new(env!("CARGO_BIN_EXE_charmviz"))
        .args([
            "render",
            "--bundle",
            "tests/fixtures/wiki-bundle.yaml",
            "--icons",
            "tests/fixtures/icons",
            "--frames",
            "3",
            "--seed",
            "1",
        ])
        .output()
        .expect("Failed to execute charmviz");

    assert!(out.status.success(), "charmviz exited with error");
    let stdout = String::from_utf8(out.stdout).unwrap();

    assert!(stdout.contains("icons: 2 loaded, 2 missing, 0 rejected"));

    // One block per frame, each opening with a single clear
    for frame in 1..=3 {
        assert!(stdout.contains(&format!("frame {frame}\n")), "missing frame {frame}");
    }
    assert_eq!(stdout.matches("clear ").count(), 3);
    assert_eq!(stdout.matches("draw LineList vertices=6").count(), 3);
    // Only the applications with icons get a cube
    assert_eq!(stdout.matches("draw TriangleList vertices=36").count(), 6);

    let first_frame = stdout
        .split("frame 2\n")
        .next()
        .expect("output has a first frame");
    assert_eq!(first_frame.matches("draw ").count(), 3);
}

#[test]
fn config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("viz.yaml");
    fs::write(&config, "simulation:\n  substeps: 0\n").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_charmviz"))
        .args([
            "--config",
            config.to_str().unwrap(),
            "layout",
            "--bundle",
            "tests/fixtures/wiki-bundle.yaml",
        ])
        .output()
        .expect("Failed to execute charmviz");

    assert!(!out.status.success(), "zero substeps should be rejected");
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("substeps"), "unexpected error output: {stderr}");
}

#[test]
fn missing_bundle_fails() {
    let out = Command::new(env!("CARGO_BIN_EXE_charmviz"))
        .args(["layout", "--bundle", "tests/fixtures/does-not-exist.yaml"])
        .output()
        .expect("Failed to execute charmviz");

    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("failed to load bundle"));
}
