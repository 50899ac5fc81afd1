use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn wfd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wfd"))
}

fn packed(sample_rate: i32, samples_per_pixel: i32, columns: &[(i8, i8)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1_i32.to_le_bytes());
    bytes.extend_from_slice(&1_u32.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&samples_per_pixel.to_le_bytes());
    bytes.extend_from_slice(&(columns.len() as u32).to_le_bytes());
    for &(min, max) in columns {
        bytes.push(min as u8);
        bytes.push(max as u8);
    }
    bytes
}

fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

const RECORD: &str = r#"{
    "version": 2,
    "bits": 8,
    "sample_rate": 1000,
    "samples_per_pixel": 10,
    "length": 4,
    "data": [-1, 1, -2, 2, -3, 3, -4, 4]
}"#;

#[test]
fn info_reads_packed_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.dat", &packed(44_100, 441, &[(-1, 1); 200]));

    wfd()
        .args(["info", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_rate: 44100"))
        .stdout(predicate::str::contains("samples_per_pixel: 441"))
        .stdout(predicate::str::contains("length: 200"))
        .stdout(predicate::str::contains("duration: 2.000"))
        .stdout(predicate::str::contains("pixels_per_second: 100.000"));
}

#[test]
fn peaks_honours_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.json", RECORD.as_bytes());

    wfd()
        .args(["peaks", input.to_str().unwrap(), "--start", "1", "--end", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"offset_start":1,"offset_end":4,"min":[-2,-3,-4],"max":[2,3,4]}"#,
        ));
}

#[test]
fn peaks_rejects_inverted_window() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.json", RECORD.as_bytes());

    wfd()
        .args(["peaks", input.to_str().unwrap(), "--start", "3", "--end", "2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("range error"));
}

#[test]
fn resample_reads_stdin_and_prints_record() {
    wfd()
        .args(["resample", "-", "--scale", "20"])
        .write_stdin(RECORD)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""samples_per_pixel":20"#))
        .stdout(predicate::str::contains(r#""length":2"#))
        .stdout(predicate::str::contains(r#""version":2"#))
        .stdout(predicate::str::contains(r#""data":[-2.0,2.0,-4.0,4.0]"#));
}

#[test]
fn resample_writes_packed_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.dat", &packed(8_000, 2, &[(-5, 5); 12]));
    let output = dir.path().join("out.dat");

    wfd()
        .args([
            "resample",
            input.to_str().unwrap(),
            "--width",
            "3",
            "--format",
            "binary",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(bytes, packed(8_000, 8, &[(-5, 5); 3]));
}

#[test]
fn resample_rejects_finer_scale() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.json", RECORD.as_bytes());

    wfd()
        .args(["resample", input.to_str().unwrap(), "--scale", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("zoom level 5 too low, minimum: 10"));
}

#[test]
fn resample_uses_options_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path(), "peaks.json", RECORD.as_bytes());
    let options = write_fixture(dir.path(), "options.json", br#"{"scale": 10, "length": 3}"#);

    wfd()
        .args([
            "resample",
            input.to_str().unwrap(),
            "--options",
            options.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""length":3"#));
}

#[test]
fn undetectable_input_fails() {
    wfd()
        .args(["info", "-"])
        .write_stdin("{\"length\": 4}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not detect"));
}

#[test]
fn create_options_json_lists_fields() {
    wfd()
        .args(["create", "options-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"width\""))
        .stdout(predicate::str::contains("\"scale\""))
        .stdout(predicate::str::contains("\"start_time\""))
        .stdout(predicate::str::contains("\"length\""));
}
