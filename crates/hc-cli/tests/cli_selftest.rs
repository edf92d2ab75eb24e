use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_histconv"))
}

fn tmp_path(filename: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("histconv_cli_{}_{}_{}", std::process::id(), nanos, filename));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn write_config(name: &str, json: &str) -> PathBuf {
    let path = tmp_path(name);
    std::fs::write(&path, json).unwrap();
    path
}

const SMALL: &str = r#"{"num_bins_range": [1, 30], "multi_dim_bins_range": [1, 4], "fills": 40}"#;

#[test]
fn selftest_small_run_succeeds() {
    let config = write_config("small.json", SMALL);
    let out = run(&["selftest", "--config", config.to_str().unwrap(), "--runs", "2", "--seed", "9"]);
    assert!(
        out.status.success(),
        "selftest failed: stdout={} stderr={}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("summary should be JSON");
    assert_eq!(v.get("runs").and_then(|x| x.as_u64()), Some(2));
    assert_eq!(v.get("seed").and_then(|x| x.as_u64()), Some(9));
    assert_eq!(v.get("expected_rejections").and_then(|x| x.as_u64()), Some(2));
    assert!(v.get("conversions").and_then(|x| x.as_u64()).unwrap() > 0);
    assert!(v.get("failures").and_then(|x| x.as_array()).unwrap().is_empty());
    let _ = std::fs::remove_file(config);
}

#[test]
fn selftest_writes_output_file() {
    let config = write_config("out.json", SMALL);
    let output = tmp_path("summary.json");
    let out = run(&[
        "selftest",
        "--config",
        config.to_str().unwrap(),
        "--runs",
        "1",
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(v["runs"], 1);
    let _ = std::fs::remove_file(config);
    let _ = std::fs::remove_file(output);
}

#[test]
fn describe_prints_defaults_merged_with_config() {
    let config = write_config("describe.json", r#"{"runs": 7}"#);
    let out = run(&["describe", "--config", config.to_str().unwrap()]);
    assert!(out.status.success(), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["runs"], 7);
    assert_eq!(v["num_bins_range"], serde_json::json!([1, 1000]));
    let _ = std::fs::remove_file(config);
}

#[test]
fn invalid_config_fails() {
    let config = write_config("bad.json", r#"{"num_bins_range": [5, 1]}"#);
    let out = run(&["describe", "--config", config.to_str().unwrap()]);
    assert!(!out.status.success());
    let _ = std::fs::remove_file(config);

    let out = run(&["selftest", "--config", "/nonexistent/histconv.json"]);
    assert!(!out.status.success());
}
