use std::io::Write;
use std::process::Command;

fn run_rpn(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_rpn"))
        .args(args)
        .env_remove("RPN_GROUPING")
        .env_remove("RPN_ARGUMENT_ORDER")
        .env_remove("RPN_SEPARATORS")
        .env_remove("RPN_LOG")
        .output()
        .expect("failed to run rpn");

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

#[test]
fn test_cli_basic_arithmetic() {
    let (stdout, _stderr, code) = run_rpn(&["3 + 4 * 2"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "11");
}

#[test]
fn test_cli_with_variables() {
    let (stdout, _stderr, code) = run_rpn(&["2x + y", "x=3", "y=0.5"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "6.5");
}

#[test]
fn test_cli_with_json_variables() {
    let (stdout, _stderr, code) = run_rpn(&["xy", "--json", r#"{"x": 4, "y": 5}"#]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "20");
}

#[test]
fn test_cli_postfix() {
    let (stdout, _stderr, code) = run_rpn(&["min(1, 5) + 2", "--postfix"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "1 5 min 2 +");
}

#[test]
fn test_cli_output_json() {
    let (stdout, _stderr, code) = run_rpn(&["(3+4)*2", "--output-json"]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["result"], serde_json::json!(14.0));
    assert!(v["execution_time"].as_str().unwrap().ends_with("ms"));
}

#[test]
fn test_cli_grouping_flags() {
    let (stdout, _stderr, _code) = run_rpn(&["10-3-2"]);
    assert_eq!(stdout, "9");
    let (stdout, _stderr, _code) = run_rpn(&["10-3-2", "--conventional"]);
    assert_eq!(stdout, "5");
    let (stdout, _stderr, _code) = run_rpn(&["pow(2,3)", "--written-args"]);
    assert_eq!(stdout, "8");
    let (stdout, _stderr, _code) = run_rpn(&["min(1+2, 3)", "--flush-separators"]);
    assert_eq!(stdout, "3");
}

#[test]
fn test_cli_file_batch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1 + 1").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "sqrt(9)").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let (stdout, _stderr, code) = run_rpn(&["--file", &path]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "2\n3");
}

#[test]
fn test_cli_file_batch_with_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "2^3").unwrap();
    writeln!(file, "3&4").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let (stdout, stderr, code) = run_rpn(&["--file", &path]);
    assert_eq!(code, 2);
    assert_eq!(stdout, "8");
    assert!(stderr.contains("position 2"));
}

#[test]
fn test_cli_error_handling() {
    let (_stdout, stderr, code) = run_rpn(&["unknown(1)"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_cli_invalid_variable_format() {
    let (_stdout, stderr, code) = run_rpn(&["x", "invalid_format"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid variable assignment"));
}

#[test]
fn test_cli_help_message() {
    let (_stdout, stderr, code) = run_rpn(&[]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Usage: rpn"));
    assert!(stderr.contains("Examples:"));
}

#[test]
fn test_cli_flags_before_expression() {
    let (stdout, _stderr, code) = run_rpn(&["--conventional", "10-3-2"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "5");
    let (stdout, _stderr, code) = run_rpn(&["x=3", "--postfix", "2x"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "2 x *");
}

#[test]
fn test_cli_rejects_bad_variable_name() {
    let (_stdout, stderr, code) = run_rpn(&["x", "xy=3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid variable name"));
}
