//! Bounded execution of the external tool: spawn, capture both output
//! streams on reader threads, poll for exit against a wall-clock
//! deadline, kill on expiry. One bounded wait per process; no retries.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal state of a spawned process.
#[derive(Debug)]
pub enum Outcome {
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    /// The process did not exit within the window and was killed.
    TimedOut { limit: Duration },
}

/// Run `cmd` to completion or until `timeout` elapses. The only error
/// path is failing to spawn (or query) the child; everything after a
/// successful spawn is reported through [`Outcome`].
pub fn run(mut cmd: Command, timeout: Duration) -> std::io::Result<Outcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Outcome::Exited {
                status,
                stdout: collect(stdout),
                stderr: collect(stderr),
            });
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            // The pipes are closed now; let the readers finish.
            collect(stdout);
            collect(stderr);
            return Ok(Outcome::TimedOut { limit: timeout });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Last `max_chars` characters of `text`. Diagnostic logs can be large;
/// the actionable message is normally at the end.
pub fn tail(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars {
        text.to_string()
    } else {
        text.chars().skip(len - max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_of_short_text_is_identity() {
        assert_eq!(tail("hello", 600), "hello");
        assert_eq!(tail("", 600), "");
    }

    #[test]
    fn tail_keeps_the_last_characters() {
        let text = "a".repeat(100) + &"b".repeat(50);
        assert_eq!(tail(&text, 50), "b".repeat(50));
        assert_eq!(tail(&text, 60), "a".repeat(10) + &"b".repeat(50));
    }

    #[test]
    fn tail_counts_characters_not_bytes() {
        let text = "héllo wörld";
        assert_eq!(tail(text, 5), "wörld");
    }
}
