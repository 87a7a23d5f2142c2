//! Tunnel process management

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, Notify};

use crate::sink::SinkWriter;
use vpngate_core::events::{SessionId, TunnelEvent};
use vpngate_core::prelude::*;

/// Default time a tunnel gets to exit after SIGTERM before it is killed
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(3);

/// How a stop request should end the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// SIGTERM, then SIGKILL once the grace period runs out
    Terminate,
    /// SIGKILL immediately
    Kill,
}

/// How to launch the tunnel binary
#[derive(Debug, Clone)]
pub struct TunnelCommand {
    /// Binary name (looked up in PATH) or path
    pub binary: String,
    pub stop_grace: Duration,
}

impl Default for TunnelCommand {
    fn default() -> Self {
        Self {
            binary: "openvpn".to_string(),
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }
}

impl TunnelCommand {
    pub fn new(binary: impl Into<String>, stop_grace: Duration) -> Self {
        Self {
            binary: binary.into(),
            stop_grace,
        }
    }

    /// Resolve the binary against PATH
    pub fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.binary).map_err(|e| {
            debug!("Could not resolve {}: {}", self.binary, e);
            Error::tunnel_not_found(&self.binary)
        })
    }
}

/// Manages one tunnel child process.
///
/// The `Child` handle is moved into a dedicated `wait_for_exit` task which
/// reaps it and emits `TunnelEvent::Exited`. `TunnelProcess` keeps a stop
/// channel, an atomic exit flag for synchronous `is_running()` checks, and a
/// [`Notify`] so callers can await the reap without polling.
pub struct TunnelProcess {
    session: SessionId,
    /// Process ID for logging
    pid: Option<u32>,
    /// Consumed by the first stop request (or on drop)
    stop_tx: Option<oneshot::Sender<StopMode>>,
    /// Set by the wait task once the child has been reaped
    exited: Arc<AtomicBool>,
    /// Notified by the wait task right after the reap
    exit_notify: Arc<Notify>,
}

impl TunnelProcess {
    /// Spawn `<binary> <config_path>` with stdout/stderr streamed into `output`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        command: &TunnelCommand,
        config_path: &Path,
        session: SessionId,
        output: SinkWriter,
        event_tx: mpsc::Sender<TunnelEvent>,
    ) -> Result<Self> {
        let program = command.resolve()?;

        info!(
            "Spawning tunnel {}: {} {}",
            session,
            program.display(),
            config_path.display()
        );

        let mut child = Command::new(&program)
            .arg(config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tunnel_not_found(&command.binary)
                } else {
                    Error::process_spawn(e.to_string())
                }
            })?;

        let pid = child.id();
        info!("Tunnel {} started with PID: {:?}", session, pid);

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(Self::output_reader(stdout, output.clone(), "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(Self::output_reader(stderr, output, "stderr"));
        }

        let exited = Arc::new(AtomicBool::new(false));
        let exit_notify = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<StopMode>();

        tokio::spawn(Self::wait_for_exit(
            child,
            session,
            stop_rx,
            command.stop_grace,
            event_tx,
            Arc::clone(&exited),
            Arc::clone(&exit_notify),
        ));

        Ok(Self {
            session,
            pid,
            stop_tx: Some(stop_tx),
            exited,
            exit_notify,
        })
    }

    /// Background task: owns `child`, reaps it, emits `TunnelEvent::Exited`.
    ///
    /// The task ends either when the tunnel exits on its own or when a stop
    /// request arrives (an explicit request, or the sender being dropped).
    async fn wait_for_exit(
        mut child: Child,
        session: SessionId,
        stop_rx: oneshot::Receiver<StopMode>,
        grace: Duration,
        event_tx: mpsc::Sender<TunnelEvent>,
        exited: Arc<AtomicBool>,
        exit_notify: Arc<Notify>,
    ) {
        let (code, requested) = tokio::select! {
            result = child.wait() => {
                let code = exit_code(session, result);
                warn!("Tunnel {} exited on its own with code {:?}", session, code);
                (code, false)
            }
            mode = stop_rx => {
                let mode = mode.unwrap_or(StopMode::Kill);
                info!("Stop requested for tunnel {} ({:?})", session, mode);
                (Self::stop_child(&mut child, session, mode, grace).await, true)
            }
        };

        // Flag first so `is_running()` is already false when the event lands
        exited.store(true, Ordering::Release);
        exit_notify.notify_waiters();

        debug!("Sending TunnelEvent::Exited for {} (code {:?})", session, code);
        let _ = event_tx
            .send(TunnelEvent::Exited {
                session,
                code,
                requested,
            })
            .await;
    }

    /// Terminate the child according to `mode` and reap it
    async fn stop_child(
        child: &mut Child,
        session: SessionId,
        mode: StopMode,
        grace: Duration,
    ) -> Option<i32> {
        if mode == StopMode::Terminate {
            if let Some(pid) = child.id() {
                send_sigterm(pid);
                match tokio::time::timeout(grace, child.wait()).await {
                    Ok(result) => return exit_code(session, result),
                    Err(_) => warn!(
                        "Tunnel {} ignored SIGTERM for {:?}, killing",
                        session, grace
                    ),
                }
            }
        }

        if let Err(e) = child.kill().await {
            error!("Failed to kill tunnel {}: {}", session, e);
        }
        exit_code(session, child.wait().await)
    }

    /// Forward one pipe into the sink, byte-for-byte, one line at a time
    async fn output_reader<R>(stream: R, output: SinkWriter, name: &'static str)
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    trace!("{}: {}", name, String::from_utf8_lossy(&buf).trim_end());
                    // Keep draining after a clear so the child never blocks on a full pipe
                    output.append(&buf);
                }
                Err(e) => {
                    debug!("{} reader error: {}", name, e);
                    break;
                }
            }
        }

        debug!("{} reader finished", name);
    }

    /// Ask the wait task to stop the process. Later calls are no-ops.
    pub fn request_stop(&mut self, mode: StopMode) {
        if let Some(tx) = self.stop_tx.take() {
            // The wait task may already have finished
            let _ = tx.send(mode);
        }
    }

    /// Wait until the process has been reaped
    pub async fn wait_exit(&self) {
        // Create the future before the check so a notification between the
        // two cannot be missed
        let notified = self.exit_notify.notified();
        if self.has_exited() {
            return;
        }
        notified.await;
    }

    /// Non-blocking check backed by the wait task's flag
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        !self.has_exited()
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn id(&self) -> Option<u32> {
        self.pid
    }
}

impl std::fmt::Debug for TunnelProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TunnelProcess")
            .field("session", &self.session)
            .field("pid", &self.pid)
            .field("exited", &self.has_exited())
            .finish()
    }
}

impl Drop for TunnelProcess {
    fn drop(&mut self) {
        if !self.has_exited() {
            warn!("TunnelProcess {} dropped while still running", self.session);
            self.request_stop(StopMode::Kill);
        }
        // kill_on_drop(true) on the Child is the final safety net
        debug!("TunnelProcess {} dropped", self.session);
    }
}

fn exit_code(session: SessionId, result: std::io::Result<ExitStatus>) -> Option<i32> {
    match result {
        Ok(status) => {
            info!("Tunnel {} exit status: {:?}", session, status);
            status.code()
        }
        Err(e) => {
            error!("Error waiting for tunnel {}: {}", session, e);
            None
        }
    }
}

#[cfg(unix)]
fn send_sigterm(pid: u32) {
    // SAFETY: plain syscall on a pid we spawned and have not reaped yet
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        warn!(
            "SIGTERM to {} failed: {}",
            pid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn send_sigterm(_pid: u32) {}
