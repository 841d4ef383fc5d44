//! Fatal lines must reach the output before the process exits
//!
//! Each scenario re-runs this test binary as a child process with a marker
//! variable set. The child logs a fatal line to stdout and exits; the parent
//! inspects what the child printed and its exit status.

use rust_console_logger::prelude::*;
use std::process::{Command, Output};

const CHILD_ENV: &str = "RUST_CONSOLE_LOGGER_FATAL_CHILD";

fn is_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

fn run_child(test_name: &str, no_color: bool) -> Output {
    let exe = std::env::current_exe().expect("test binary path");
    let mut command = Command::new(exe);
    command
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1");
    if no_color {
        command.env("NO_COLOR", "1");
    } else {
        command.env_remove("NO_COLOR");
    }
    command.output().expect("Failed to run child process")
}

/// Index of the first line ending with `suffix` that has a well-formed
/// `[HH:MM:SS.mmm] ` prefix
fn find_line(stdout: &str, suffix: &str) -> Option<usize> {
    stdout.lines().position(|line| {
        let bytes = line.as_bytes();
        line.ends_with(suffix)
            && bytes.len() > 15
            && bytes[0] == b'['
            && bytes[3] == b':'
            && bytes[6] == b':'
            && bytes[9] == b'.'
            && &line[13..15] == "] "
    })
}

#[test]
fn child_logger_fatal() {
    if !is_child() {
        return;
    }

    let logger = Logger::builder()
        .color_mode(ColorMode::Never)
        .build()
        .expect("Failed to build logger");

    logger.info("starting");
    logger.fatal("disk full");
    unreachable!("fatal exits the process");
}

#[test]
fn child_global_fatalf() {
    if !is_child() {
        return;
    }

    // Color is forced on; only the environment can turn it off again.
    let config = LoggerConfig {
        color: ColorMode::Always,
        fatal_exit_code: Some(3),
        ..LoggerConfig::default()
    }
    .with_env();
    let _guard = rust_console_logger::init_with(Logger::builder().config(config))
        .expect("Failed to install default logger");

    for i in 0..100 {
        rust_console_logger::debugf(format_args!("work item {}", i));
    }
    rust_console_logger::fatalf(format_args!("disk {}", "full"));
    unreachable!("fatal exits the process");
}

#[test]
fn test_fatal_line_flushed_before_exit() {
    if is_child() {
        return;
    }

    let output = run_child("child_logger_fatal", true);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout:\n{}", stdout);
    let info = find_line(&stdout, "[INFO] starting").expect("info line present");
    let fatal = find_line(&stdout, "[FATAL] disk full").expect("fatal line present");
    assert!(info < fatal);
}

#[test]
fn test_global_fatalf_drains_queue_before_exit() {
    if is_child() {
        return;
    }

    let output = run_child("child_global_fatalf", true);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(3), "stdout:\n{}", stdout);
    assert!(!stdout.contains('\x1b'), "NO_COLOR must disable color");
    for i in 0..100 {
        let suffix = format!("[DEBUG] work item {}", i);
        assert!(find_line(&stdout, &suffix).is_some(), "missing {}", suffix);
    }
    let last_work = find_line(&stdout, "[DEBUG] work item 99").expect("last debug line");
    let fatal = find_line(&stdout, "[FATAL] disk full").expect("fatal line present");
    assert!(last_work < fatal);
}

#[test]
fn test_forced_color_without_no_color() {
    if is_child() {
        return;
    }

    let output = run_child("child_global_fatalf", false);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(3), "stdout:\n{}", stdout);
    assert!(stdout.contains("\x1b[36m["), "debug lines are cyan");
    assert!(stdout.contains("] [FATAL] disk full\x1b[0m\n"));
    assert!(stdout.contains("\x1b[31m["), "fatal line is red");
}
