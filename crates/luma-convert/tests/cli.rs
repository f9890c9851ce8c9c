use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn write_input(path: &Path) {
    let img = image::RgbImage::from_pixel(4, 3, image::Rgb([255, 0, 0]));
    img.save(path).expect("write test image");
}

fn luma_convert() -> Command {
    Command::cargo_bin("luma-convert").expect("binary built")
}

#[test]
fn converts_default_input_in_working_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_input(&dir.path().join("input.png"));

    luma_convert().current_dir(dir.path()).assert().success();

    let a = image::open(dir.path().join("input_gray_A.png"))
        .expect("output A")
        .to_rgb8();
    let b = image::open(dir.path().join("input_gray_B.png"))
        .expect("output B")
        .to_rgb8();
    assert_eq!(a.get_pixel(0, 0).0, [85, 85, 85]);
    assert_eq!(b.get_pixel(3, 2).0, [54, 54, 54]);
}

#[test]
fn writes_report_when_requested() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.png");
    let report = dir.path().join("report.json");
    write_input(&input);

    luma_convert()
        .arg(&input)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let raw = std::fs::read_to_string(&report).expect("report written");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(json["width"], 4);
    assert_eq!(json["outputs"].as_array().map(Vec::len), Some(2));
}

#[test]
fn rejects_unsupported_mode() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.png");
    write_input(&input);

    luma_convert()
        .arg(&input)
        .args(["--mode", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported expansion mode 2"));

    assert!(!dir.path().join("in_gray_A.png").exists());
}

#[test]
fn reports_missing_input() {
    let dir = tempfile::tempdir().expect("tempdir");

    luma_convert()
        .arg(dir.path().join("nope.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load image"));
}

#[test]
fn runs_from_json_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.png");
    let out = dir.path().join("clamped.png");
    write_input(&input);

    let config = serde_json::json!({
        "input_path": input,
        "outputs": [{ "method": "luminosity", "mode": 0, "pack": "clamp", "path": out }]
    });
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, config.to_string()).expect("write config");

    luma_convert()
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let img = image::open(&out).expect("output").to_rgb8();
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255]);
}

#[test]
fn accepts_log_level_names() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in.png");
    write_input(&input);

    luma_convert()
        .arg(&input)
        .args(["--log-level", "warn"])
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote").not());

    luma_convert()
        .arg(&input)
        .args(["--log-level", "chatty"])
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown log level 'chatty'"))
        .stderr(predicate::str::contains("wrote average output"));
}
