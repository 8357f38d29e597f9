//! End-to-end scenarios driven through the compiled binary's stdin/stdout.
//! Run without a controlling terminal, so `ForegroundTerminalGuard` takes
//! its is-tty no-op path — every scenario here exercises process groups,
//! pipes, and waiting without touching `tcsetpgrp`.

use std::io::{Read, Write};
use std::process::{Command, Stdio};

fn run(input: &str) -> (String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_ushell"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn shell under test");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    let mut stdout = String::new();
    let mut stderr = String::new();
    child
        .stdout
        .take()
        .unwrap()
        .read_to_string(&mut stdout)
        .unwrap();
    child
        .stderr
        .take()
        .unwrap()
        .read_to_string(&mut stderr)
        .unwrap();
    child.wait().unwrap();

    (stdout, stderr)
}

#[test]
fn pwd_prints_cwd() {
    let (stdout, _) = run("pwd\nexit\n");
    let cwd = std::env::current_dir().unwrap();
    assert!(stdout.contains(&cwd.to_string_lossy().into_owned()));
}

#[test]
fn cd_then_pwd_prints_new_directory() {
    let (stdout, _) = run("cd /tmp\npwd\nexit\n");
    assert!(stdout.contains("/tmp"));
    assert!(stdout.contains("[/tmp]$"));
}

#[test]
fn echo_prints_its_argument() {
    let (stdout, _) = run("echo hello\nexit\n");
    assert!(stdout.contains("hello"));
}

#[test]
fn pipeline_uppercases_through_tr() {
    let (stdout, _) = run("echo hello | tr a-z A-Z\nexit\n");
    assert!(stdout.contains("HELLO"));
}

#[test]
fn pipeline_tail_redirect_writes_file_and_stays_silent_on_stdout() {
    let path = std::env::temp_dir().join(format!("ushell_test_out_{}.txt", std::process::id()));
    let path_str = path.to_string_lossy().into_owned();

    let (stdout, _) = run(&format!("echo one | cat | cat > {path_str}\nexit\n"));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "one\n");
    assert!(!stdout.contains("one"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn background_job_reports_launch_and_fg_reaps_it() {
    let (stdout, _) = run("sleep 1 &\nfg\nexit\n");
    assert!(stdout.contains("launched in the background"));
}

#[test]
fn leading_pipe_is_reported_as_illegal() {
    let (stdout, _) = run("| foo\nexit\n");
    assert!(stdout.contains("illegal: |"));
}

#[test]
fn unknown_command_is_reported() {
    let (stdout, _) = run("nosuchprogxyz\nexit\n");
    assert!(stdout.contains("unknown command: nosuchprogxyz"));
}

#[test]
fn exit_terminates_the_shell() {
    let (_, _) = run("exit\n");
}

#[test]
fn empty_line_and_lone_ampersand_are_no_ops() {
    let (stdout, stderr) = run("\n&\nexit\n");
    assert!(!stdout.contains("illegal"));
    assert!(stderr.is_empty());
}
