//! Process-executor behavior against real child processes, using small
//! shell scripts as stand-ins for the encoder.

#![cfg(unix)]

mod util;

use std::process::Command;
use std::time::{Duration, Instant};

use quotereel::exec::{self, Outcome};

#[test]
fn captures_stdout_and_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let script = util::write_script(dir.path(), "ok", "echo hello from the tool\nexit 0\n");

    let outcome = exec::run(Command::new(&script), Duration::from_secs(5)).unwrap();
    match outcome {
        Outcome::Exited { status, stdout, .. } => {
            assert!(status.success());
            assert_eq!(stdout.trim(), "hello from the tool");
        }
        Outcome::TimedOut { .. } => panic!("unexpected timeout"),
    }
}

#[test]
fn nonzero_exit_keeps_the_full_stderr_stream() {
    let dir = tempfile::tempdir().unwrap();
    // Emits exactly 2000 characters to stderr, no newlines, then fails.
    let chunk = "x".repeat(100);
    let body = format!(
        "i=0\nwhile [ \"$i\" -lt 20 ]; do\n  printf '%s' \"{chunk}\" 1>&2\n  i=$((i+1))\ndone\nexit 1\n"
    );
    let script = util::write_script(dir.path(), "noisy", &body);

    let outcome = exec::run(Command::new(&script), Duration::from_secs(5)).unwrap();
    match outcome {
        Outcome::Exited { status, stderr, .. } => {
            assert_eq!(status.code(), Some(1));
            assert_eq!(stderr, "x".repeat(2000));
            // The bounded tail a failed result would carry.
            let tail = exec::tail(&stderr, 600);
            assert_eq!(tail.chars().count(), 600);
            assert_eq!(tail, "x".repeat(600));
        }
        Outcome::TimedOut { .. } => panic!("unexpected timeout"),
    }
}

#[test]
fn slow_process_is_killed_at_the_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let script = util::write_script(dir.path(), "slow", "sleep 30\nexit 0\n");

    let started = Instant::now();
    let outcome = exec::run(Command::new(&script), Duration::from_millis(300)).unwrap();
    let elapsed = started.elapsed();

    match outcome {
        Outcome::TimedOut { limit } => assert_eq!(limit, Duration::from_millis(300)),
        Outcome::Exited { .. } => panic!("expected a timeout"),
    }
    // Killed promptly, nowhere near the script's own sleep.
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[test]
fn spawn_failure_is_the_only_error_path() {
    let err = exec::run(
        Command::new("/definitely/not/a/real/ffmpeg"),
        Duration::from_secs(1),
    )
    .expect_err("spawn must fail");
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
