//! Child process execution with output capture and a wall-clock timeout.
//!
//! Each test case spawns one child. The child gets a single fixed argument,
//! no stdin, and both output streams piped. Reader threads drain the pipes
//! while the executor polls for exit; a child still running at the deadline
//! is killed and reaped so no orphan survives the run. Captured output is
//! merged stdout-then-stderr into one buffer.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of one child invocation.
#[derive(Debug)]
pub enum ExecutionResult {
    /// The child exited (with any code) before the deadline.
    Completed(String),
    /// The deadline elapsed; the child was killed. No partial output is kept.
    TimedOut,
    /// The executable is missing or not runnable.
    LaunchFailed(std::io::Error),
}

/// Runs test executables under a fixed invocation contract.
pub struct Executor {
    timeout: Duration,
    argument: String,
}

impl Executor {
    pub fn new(timeout: Duration, argument: impl Into<String>) -> Self {
        Self {
            timeout,
            argument: argument.into(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Launches `binary` and waits for it, bounded by the timeout.
    pub fn run(&self, binary: &Path) -> ExecutionResult {
        let mut child = match Command::new(binary)
            .arg(&self.argument)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return ExecutionResult::LaunchFailed(e),
        };

        let stdout_reader = child
            .stdout
            .take()
            .map(|mut stream| thread::spawn(move || read_to_string_lossy(&mut stream)));
        let stderr_reader = child
            .stderr
            .take()
            .map(|mut stream| thread::spawn(move || read_to_string_lossy(&mut stream)));

        let start = Instant::now();
        let timed_out = loop {
            match child.try_wait() {
                Ok(Some(_)) => break false,
                Ok(None) => {}
                Err(_) => break false,
            }
            if start.elapsed() >= self.timeout {
                // wait() after kill reaps the zombie.
                let _ = child.kill();
                let _ = child.wait();
                break true;
            }
            thread::sleep(Duration::from_millis(10));
        };

        if timed_out {
            // The reader threads are dropped, not joined: a grandchild of the
            // killed process can keep the pipe open indefinitely, and no
            // partial output is salvaged from a timed-out case anyway.
            return ExecutionResult::TimedOut;
        }

        let stdout = join_reader(stdout_reader);
        let stderr = join_reader(stderr_reader);

        let mut output = stdout;
        if !stderr.is_empty() {
            if !output.is_empty() && !output.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&stderr);
        }
        ExecutionResult::Completed(output)
    }
}

fn read_to_string_lossy(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
