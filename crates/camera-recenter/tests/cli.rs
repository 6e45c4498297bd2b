#![cfg(feature = "cli")]

use assert_cmd::Command;
use camera_recenter::config::{RecenterConfig, RecenterReport};
use camera_recenter::io::{load_image, save_image, ColorMode};
use camera_recenter::{BorderMode, Image};
use predicates::prelude::*;
use std::path::Path;

fn write_fixture(dir: &Path, width: usize, height: usize) -> std::path::PathBuf {
    let img = Image::from_fn(width, height, |x, y| {
        [(x * 255 / width) as u8, (y * 255 / height) as u8, 128]
    })
    .expect("fixture");
    let path = dir.join("input.png");
    save_image(&path, &img).expect("write fixture");
    path
}

fn cli() -> Command {
    Command::cargo_bin("camera-recenter").expect("binary built")
}

#[test]
fn apply_writes_image_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), 80, 60);
    let out = dir.path().join("out.png");
    let report = dir.path().join("report.json");

    cli()
        .args(["apply", "--image"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .args(["--target-x", "60", "--target-y", "40", "--fx", "100"])
        .assert()
        .success();

    let src = load_image(&input, ColorMode::Rgb).unwrap();
    let img = load_image(&out, ColorMode::Rgb).unwrap();
    assert_eq!((img.width, img.height), (80, 60));
    for (a, b) in img.pixel(40, 30).iter().zip(src.pixel(60, 40)) {
        assert!((*a as i32 - *b as i32).abs() <= 1);
    }

    let report = RecenterReport::load_json(&report).unwrap();
    assert_eq!(report.input_size, [80, 60]);
    assert_eq!(report.target, [60.0, 40.0]);
    assert_eq!(report.intrinsics.cx, 40.0);
    let [x, y] = report.center_source.unwrap();
    assert!((x - 60.0).abs() < 1e-6 && (y - 40.0).abs() < 1e-6);
}

#[test]
fn apply_honours_output_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), 64, 48);
    let out = dir.path().join("small.png");

    cli()
        .args(["apply", "--image"])
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--target-x", "10", "--target-y", "10", "--fx", "50"])
        .args(["--out-width", "32", "--out-height", "20", "--replicate"])
        .assert()
        .success();

    let img = load_image(&out, ColorMode::Rgb).unwrap();
    assert_eq!((img.width, img.height), (32, 20));
}

#[test]
fn run_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path(), 40, 30);
    let out = dir.path().join("from_config.png");
    let cfg_path = dir.path().join("cfg.json");

    let mut cfg = RecenterConfig::new(input.to_string_lossy(), 20.0, 15.0);
    cfg.output_path = Some(out.to_string_lossy().into_owned());
    cfg.border = BorderMode::Constant(255);
    cfg.write_json(&cfg_path).unwrap();

    cli()
        .arg("run")
        .arg("--config")
        .arg(&cfg_path)
        .assert()
        .success();

    // The default camera is centered, so this is the identity warp.
    let src = load_image(&input, ColorMode::Rgb).unwrap();
    let img = load_image(&out, ColorMode::Rgb).unwrap();
    assert_eq!(img, src);
}

#[test]
fn homography_prints_json() {
    let output = cli()
        .args(["homography", "--width", "800", "--height", "600"])
        .args(["--target-x", "600", "--target-y", "400"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: RecenterReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report.output_size, [800, 600]);
    assert_eq!(report.new_intrinsics.cx, 400.0);
    let h = report.homography;
    let w = h[2][0] * 600.0 + h[2][1] * 400.0 + h[2][2];
    let u = (h[0][0] * 600.0 + h[0][1] * 400.0 + h[0][2]) / w;
    let v = (h[1][0] * 600.0 + h[1][1] * 400.0 + h[1][2]) / w;
    assert!((u - 400.0).abs() < 1e-6 && (v - 300.0).abs() < 1e-6);
}

#[test]
fn zero_output_size_fails() {
    cli()
        .args(["homography", "--width", "800", "--height", "600"])
        .args(["--target-x", "1", "--target-y", "1", "--out-width", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid output size"));
}

#[test]
fn undecodable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    std::fs::write(&input, b"\x89PNG\r\n\x1a\ngarbage").unwrap();

    cli()
        .args(["apply", "--image"])
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("never.png"))
        .args(["--target-x", "1", "--target-y", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image decode failure"));
}
