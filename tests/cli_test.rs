// ABOUTME: Black-box tests driving the compiled binary directly, checking exit codes and stdio

use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_rlox")
}

fn write_script(source: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "rlox_cli_test_{}_{}.lox",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&path, source).expect("write temp script");
    path
}

#[test]
fn valid_script_exits_zero() {
    let path = write_script("print 1 + 1;");
    let output = Command::new(bin_path()).arg(&path).output().expect("run binary");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "2\n");
    let _ = std::fs::remove_file(path);
}

#[test]
fn parse_error_exits_sixty_five() {
    let path = write_script("var;");
    let output = Command::new(bin_path()).arg(&path).output().expect("run binary");
    assert_eq!(output.status.code(), Some(65));
    let _ = std::fs::remove_file(path);
}

#[test]
fn runtime_error_exits_seventy() {
    let path = write_script(r#"print 1 + "a";"#);
    let output = Command::new(bin_path()).arg(&path).output().expect("run binary");
    assert_eq!(output.status.code(), Some(70));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Operands must be two numbers or two strings."));
    assert!(stderr.contains("[line 1]"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn string_minus_number_reports_the_plural_operands_message() {
    let path = write_script(r#"print "a" - 1;"#);
    let output = Command::new(bin_path()).arg(&path).output().expect("run binary");
    assert_eq!(output.status.code(), Some(70));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr, "Operands must be numbers.\n[line 1]\n");
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_script_file_exits_seventy() {
    let output = Command::new(bin_path())
        .arg("/nonexistent/path/to/script.lox")
        .output()
        .expect("run binary");
    assert_eq!(output.status.code(), Some(70));
}

#[test]
fn too_many_arguments_prints_usage_and_exits_sixty_four() {
    let output = Command::new(bin_path())
        .arg("one.lox")
        .arg("two.lox")
        .output()
        .expect("run binary");
    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Usage:"));
    assert!(stderr.contains("[script]"));
}

#[test]
fn for_loop_prints_each_iteration() {
    let path = write_script("for (var i = 0; i < 3; i = i + 1) print i;");
    let output = Command::new(bin_path()).arg(&path).output().expect("run binary");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "0\n1\n2\n");
    let _ = std::fs::remove_file(path);
}
