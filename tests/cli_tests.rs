use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rowframe"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // Inputs here are small enough to fit in the pipe buffer.
    child.stdin.take().unwrap().write_all(stdin).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn encode_then_project_exits_cleanly() {
    let encoded = run(&["encode"], b"a,b,c,d,e,f,g,h\n");
    assert!(encoded.status.success());
    assert_eq!(encoded.stdout.len(), 4 + 24);

    let projected = run(&["project"], &encoded.stdout);
    assert!(projected.status.success());
    assert_eq!(projected.stdout, b"c,g\n");

    let fast = run(&["project", "--from", "text"], b"a,b,c,d,e,f,g,h\n");
    assert!(fast.status.success());
    assert_eq!(fast.stdout, projected.stdout);
}

#[test]
fn empty_input_exits_cleanly() {
    let output = run(&["project"], b"");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn short_line_fails_with_diagnostic() {
    let output = run(&["encode"], b"a,b,c,d,e,f,g,h\n1,2,3\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Malformed record"), "stderr: {stderr}");
    // The frame for the good line was flushed before the failure.
    assert_eq!(output.stdout.len(), 4 + 24);
}

#[test]
fn oversized_length_prefix_fails_with_diagnostic() {
    let output = run(&["project"], &[0xff, 0xff, 0xff, 0x7f]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Frame too large"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn bad_arguments_fail() {
    let output = run(&["decode"], b"");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage"));
}
