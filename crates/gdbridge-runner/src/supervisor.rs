//! Supervision of the single long-running engine process
//!
//! At most one process is tracked at a time. Starting a new one kills the
//! previous one first. Output is captured line by line as it arrives, into
//! bounded rings, and can be read at any time while the process runs.
//!
//! Ownership: the [`tokio::process::Child`] lives in a watcher task. The
//! supervisor keeps only a kill channel, so `stop` never waits for the OS to
//! reap the process.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::ring_buffer::{LineRing, LineSplitter};

/// Default per-stream line capacity.
pub const DEFAULT_MAX_LINES: usize = 10_000;

const READ_CHUNK_BYTES: usize = 8192;

/// Point-in-time copy of a supervised process's captured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessLogs {
    pub pid: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub output: Vec<String>,
    pub errors: Vec<String>,
    pub output_truncated: bool,
    pub errors_truncated: bool,
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    const fn label(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

#[derive(Debug)]
struct CapturedOutput {
    stdout: LineRing,
    stderr: LineRing,
}

impl CapturedOutput {
    fn new(max_lines: usize) -> Self {
        Self {
            stdout: LineRing::new(max_lines),
            stderr: LineRing::new(max_lines),
        }
    }

    fn ring_mut(&mut self, stream: Stream) -> &mut LineRing {
        match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        }
    }
}

#[derive(Debug)]
struct ActiveProcess {
    id: u64,
    pid: Option<u32>,
    started_at: DateTime<Utc>,
    captured: Arc<Mutex<CapturedOutput>>,
    kill_tx: Option<oneshot::Sender<()>>,
}

impl ActiveProcess {
    fn snapshot(&self) -> ProcessLogs {
        let captured = lock(&self.captured);
        ProcessLogs {
            pid: self.pid,
            started_at: self.started_at,
            output: captured.stdout.lines(),
            errors: captured.stderr.lines(),
            output_truncated: captured.stdout.was_truncated(),
            errors_truncated: captured.stderr.was_truncated(),
        }
    }

    fn kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            // The watcher may already have observed exit and dropped its receiver.
            let _ = tx.send(());
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the one supervised engine process.
///
/// Cloning is cheap and every clone refers to the same slot.
///
/// `start` spawns Tokio tasks and must be called from within a runtime.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    slot: Arc<Mutex<Option<ActiveProcess>>>,
    next_id: Arc<AtomicU64>,
    max_lines: usize,
}

impl Default for ProcessSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl ProcessSupervisor {
    /// Create a supervisor keeping at most `max_lines` lines per stream.
    #[must_use]
    pub fn new(max_lines: usize) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(1)),
            max_lines,
        }
    }

    /// Start `spec` as the supervised process, killing any current one first.
    ///
    /// Returns the OS process id when the platform reports one.
    pub fn start(&self, spec: &CommandSpec) -> Result<Option<u32>, RunnerError> {
        if let Some(mut previous) = lock(&self.slot).take() {
            info!(pid = ?previous.pid, "killing previous supervised process");
            previous.kill();
        }

        let mut command = spec.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| RunnerError::spawn(spec.program_display(), &e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or(RunnerError::PipeUnavailable { stream: "stdout" })?;
        let stderr = child
            .stderr
            .take()
            .ok_or(RunnerError::PipeUnavailable { stream: "stderr" })?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let pid = child.id();
        let captured = Arc::new(Mutex::new(CapturedOutput::new(self.max_lines)));
        let (kill_tx, kill_rx) = oneshot::channel();

        *lock(&self.slot) = Some(ActiveProcess {
            id,
            pid,
            started_at: Utc::now(),
            captured: Arc::clone(&captured),
            kill_tx: Some(kill_tx),
        });

        spawn_reader(stdout, Arc::clone(&captured), Stream::Stdout);
        spawn_reader(stderr, captured, Stream::Stderr);
        self.spawn_watcher(child, id, kill_rx);

        info!(pid = ?pid, program = %spec.program_display(), "started supervised process");
        Ok(pid)
    }

    /// Current captured output, without blocking on the process.
    pub fn query(&self) -> Result<ProcessLogs, RunnerError> {
        lock(&self.slot)
            .as_ref()
            .map(ActiveProcess::snapshot)
            .ok_or(RunnerError::NoActiveProcess)
    }

    /// Kill the supervised process and return its final captured output.
    ///
    /// Returns as soon as the kill is requested; reaping happens in the background.
    pub fn stop(&self) -> Result<ProcessLogs, RunnerError> {
        let mut active = lock(&self.slot).take().ok_or(RunnerError::NoActiveProcess)?;
        active.kill();
        info!(pid = ?active.pid, "stopped supervised process");
        Ok(active.snapshot())
    }

    /// Kill whatever is running, if anything. Used on server shutdown.
    pub fn shutdown(&self) {
        if let Ok(logs) = self.stop() {
            debug!(pid = ?logs.pid, "supervised process killed during shutdown");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.slot).is_some()
    }

    fn spawn_watcher(&self, mut child: Child, id: u64, kill_rx: oneshot::Receiver<()>) {
        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                // A dropped sender means the supervisor is gone; treat it as a kill.
                _ = kill_rx => {
                    if let Err(e) = child.start_kill() {
                        warn!(error = %e, "failed to kill supervised process");
                    }
                    child.wait().await
                }
            };

            match status {
                Ok(status) => debug!(code = ?status.code(), "supervised process exited"),
                Err(e) => warn!(error = %e, "failed to wait for supervised process"),
            }

            let mut slot = lock(&slot);
            if slot.as_ref().is_some_and(|active| active.id == id) {
                *slot = None;
            }
        });
    }
}

fn spawn_reader<R>(mut reader: R, captured: Arc<Mutex<CapturedOutput>>, stream: Stream)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let mut splitter = LineSplitter::new();

        loop {
            match reader.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => record(&captured, stream, splitter.feed(&buf[..n])),
                Err(e) => {
                    debug!(stream = stream.label(), error = %e, "pipe read failed");
                    break;
                }
            }
        }

        if let Some(tail) = splitter.finish() {
            record(&captured, stream, vec![tail]);
        }
    });
}

fn record(captured: &Mutex<CapturedOutput>, stream: Stream, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let mut captured = lock(captured);
    let ring = captured.ring_mut(stream);
    for line in lines {
        if !line.trim().is_empty() {
            debug!(stream = stream.label(), "[godot] {line}");
        }
        ring.push(&line);
    }
}
