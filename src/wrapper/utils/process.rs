//! External process execution with captured output.

use std::{
    io::{self, Read},
    process::{Command, ExitStatus, Stdio},
    sync::{Arc, Mutex, mpsc},
    thread,
    time::Duration,
};
use wait_timeout::ChildExt;

/// Captured result of one external invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when killed by a signal or timed out.
    pub code: Option<i32>,
    pub success: bool,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A zero exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// A non-zero exit with the given stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    fn from_status(status: ExitStatus, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
            timed_out: false,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }
    }
}

/// Runs external commands for the runtime builder.
///
/// The production implementation is [`SystemRunner`]; tests substitute
/// runners that record or fail invocations.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` to completion, capturing stdout and stderr.
    ///
    /// `Err` means the process could not be started or waited on.
    fn run(&self, command: &mut Command, timeout: Option<Duration>) -> io::Result<CommandOutput>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &mut Command, timeout: Option<Duration>) -> io::Result<CommandOutput> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let Some(timeout) = timeout else {
            let output = command.output()?;
            return Ok(CommandOutput::from_status(
                output.status,
                output.stdout,
                output.stderr,
            ));
        };

        let mut child = command.spawn()?;

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe
        let stdout = Capture::start(child.stdout.take());
        let stderr = Capture::start(child.stderr.take());

        match child.wait_timeout(timeout)? {
            Some(status) => Ok(CommandOutput::from_status(
                status,
                stdout.finish(None),
                stderr.finish(None),
            )),
            None => {
                log::warn!(
                    "{} exceeded {}s, terminating",
                    describe(command),
                    timeout.as_secs()
                );
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill timed out process: {}", e);
                }
                child.wait()?;
                // grandchildren may keep the pipes open; take what arrived in time
                let stdout = stdout.finish(Some(KILL_GRACE));
                let mut stderr =
                    String::from_utf8_lossy(&stderr.finish(Some(KILL_GRACE))).into_owned();
                if !stderr.is_empty() && !stderr.ends_with('\n') {
                    stderr.push('\n');
                }
                stderr.push_str(&format!(
                    "terminated after {}s without exiting",
                    timeout.as_secs()
                ));
                Ok(CommandOutput {
                    code: None,
                    success: false,
                    timed_out: true,
                    stdout: String::from_utf8_lossy(&stdout).into_owned(),
                    stderr,
                })
            }
        }
    }
}

/// How long to wait for pipe readers after killing a timed out child.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Background reader accumulating one pipe.
///
/// Bytes are appended as they arrive, so output read before a kill is kept
/// even if the reader never reaches end of file.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<()>,
}

impl Capture {
    fn start<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut pipe) = pipe {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => {
                            if let Ok(mut buf) = sink.lock() {
                                buf.extend_from_slice(&chunk[..n]);
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(_) => break,
                    }
                }
            }
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Waits for end of file, at most `grace` when given, and returns the bytes read.
    fn finish(self, grace: Option<Duration>) -> Vec<u8> {
        match grace {
            Some(grace) => {
                let _ = self.done.recv_timeout(grace);
            }
            None => {
                let _ = self.done.recv();
            }
        }
        self.buf
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }
}

/// Renders a command line for diagnostics.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_program_and_args() {
        let mut cmd = Command::new("python3");
        cmd.args(["-m", "venv", "/apps/Notion/venv"]);
        assert_eq!(describe(&cmd), "python3 -m venv /apps/Notion/venv");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_output_and_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemRunner.run(&mut cmd, None).unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_kills_on_timeout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exec sleep 30"]);
        let output = SystemRunner
            .run(&mut cmd, Some(Duration::from_millis(200)))
            .unwrap();
        assert!(output.timed_out);
        assert!(!output.success);
        assert_eq!(output.code, None);
    }

    #[cfg(unix)]
    #[test]
    fn timeout_keeps_output_written_before_kill() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo started; echo warming up >&2; exec sleep 30"]);
        let output = SystemRunner
            .run(&mut cmd, Some(Duration::from_secs(1)))
            .unwrap();
        assert!(output.timed_out);
        assert_eq!(output.stdout.trim(), "started");
        assert!(output.stderr.starts_with("warming up\n"));
        assert!(output.stderr.ends_with("terminated after 1s without exiting"));
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let mut cmd = Command::new("/nonexistent/appnera-test-binary");
        assert!(SystemRunner.run(&mut cmd, None).is_err());
    }
}
