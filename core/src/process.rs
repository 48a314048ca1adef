use std::{ffi::OsStr, process::Stdio, time::Duration};

use tokio::process::Command;

/// How an external process invocation ended.
///
/// `NotLaunched` is the absorbed "executable missing or not startable"
/// case: it compares unequal to every real exit code, including -1, so a
/// misconfigured tool shows up as a mismatch instead of aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessStatus {
    Exited(i32),
    Signaled,
    NotLaunched,
}

/// Captured result of one external process invocation.
///
/// Equality ignores `elapsed`: timing is observational metadata, not a
/// correctness signal.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub status: ProcessStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

impl PartialEq for ProcessOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.stdout == other.stdout
            && self.stderr == other.stderr
    }
}

impl Eq for ProcessOutcome {}

impl ProcessOutcome {
    fn not_launched(elapsed: Duration) -> Self {
        Self {
            status: ProcessStatus::NotLaunched,
            stdout: Vec::new(),
            stderr: Vec::new(),
            elapsed,
        }
    }
}

/// Runs `program` with `args`, capturing stdout/stderr and measuring
/// wall-clock duration. Blocks (in the async sense) until the process
/// terminates; there is deliberately no timeout.
///
/// A spawn failure is not an error: it yields a `NotLaunched` outcome so
/// that callers can keep comparing.
pub async fn run_captured<I, S>(program: impl AsRef<OsStr>, args: I) -> ProcessOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start_at = tokio::time::Instant::now();
    let res = Command::new(&program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;
    let elapsed = tokio::time::Instant::now().duration_since(start_at);

    match res {
        Ok(output) => ProcessOutcome {
            status: match output.status.code() {
                Some(code) => ProcessStatus::Exited(code),
                None => ProcessStatus::Signaled,
            },
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed,
        },
        Err(e) => {
            log::debug!(
                "Failed to launch '{}': {}",
                program.as_ref().to_string_lossy(),
                e
            );
            ProcessOutcome::not_launched(elapsed)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn should_capture_stdout_stderr_and_exit_code() {
        let res = run_captured("sh", ["-c", "echo out; echo err >&2; exit 3"]).await;
        assert_eq!(res.status, ProcessStatus::Exited(3));
        assert_eq!(res.stdout, b"out\n");
        assert_eq!(res.stderr, b"err\n");
    }

    #[tokio::test]
    async fn missing_executable_should_yield_sentinel_not_error() {
        let res = run_captured("/no/such/executable-cuiktest", [] as [&str; 0]).await;
        assert_eq!(res.status, ProcessStatus::NotLaunched);
        assert!(res.stdout.is_empty());
        assert!(res.stderr.is_empty());
    }

    #[tokio::test]
    async fn equality_should_ignore_elapsed() {
        let a = run_captured("sh", ["-c", "echo hi"]).await;
        let mut b = a.clone();
        b.elapsed += Duration::from_secs(60);
        assert_eq!(a, b);

        let mut c = a.clone();
        c.stdout = b"bye\n".to_vec();
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn sentinel_should_differ_from_real_minus_one_exit() {
        let real = run_captured("sh", ["-c", "exit 255"]).await;
        let missing = run_captured("/no/such/executable-cuiktest", [] as [&str; 0]).await;
        assert_ne!(real, missing);
    }
}
