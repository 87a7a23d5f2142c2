//! Connection lifecycle for the single tunnel
//!
//! [`ConnectionController`] owns the one live [`TunnelProcess`], the scratch
//! [`ConfigFile`] it reads, and the status line. Every operation takes the
//! internal async mutex first, so concurrent connect/disconnect requests are
//! applied one at a time and at most one process handle exists.

use tokio::sync::{mpsc, watch, Mutex};

use crate::config::TunnelSettings;
use vpngate_core::prelude::*;
use vpngate_core::{ConnectionState, EndpointRecord, SessionId, TunnelEvent};
use vpngate_tunnel::{
    decode_payload, ConfigFile, EffectiveUid, Fixed, OutputSink, PrivilegeProbe, StopMode,
    TunnelCommand, TunnelProcess,
};

#[derive(Debug)]
struct ActiveTunnel {
    process: TunnelProcess,
    ip: String,
}

#[derive(Debug, Default)]
struct Slot {
    active: Option<ActiveTunnel>,
    /// Processes told to stop whose reap has not been observed yet
    stopping: Vec<TunnelProcess>,
    next_session: u64,
    /// Set by `shutdown`; later connects are refused
    closed: bool,
}

/// Owns the tunnel process, its config file and the status line
#[derive(Debug)]
pub struct ConnectionController {
    slot: Mutex<Slot>,
    state: watch::Sender<ConnectionState>,
    status: watch::Sender<String>,
    sink: OutputSink,
    config_file: ConfigFile,
    privilege: Box<dyn PrivilegeProbe>,
    command: TunnelCommand,
    event_tx: mpsc::Sender<TunnelEvent>,
}

impl ConnectionController {
    /// Create a controller. Exit notifications for spawned tunnels are sent
    /// on `event_tx`.
    pub fn new(
        settings: &TunnelSettings,
        sink: OutputSink,
        event_tx: mpsc::Sender<TunnelEvent>,
    ) -> Self {
        let privilege: Box<dyn PrivilegeProbe> = if settings.require_root {
            Box::new(EffectiveUid)
        } else {
            Box::new(Fixed(true))
        };

        Self {
            slot: Mutex::new(Slot::default()),
            state: watch::channel(ConnectionState::Disconnected).0,
            status: watch::channel(String::new()).0,
            sink,
            config_file: ConfigFile::acquire(settings.config_path.clone()),
            privilege,
            command: TunnelCommand::new(settings.binary.clone(), settings.stop_grace()),
            event_tx,
        }
    }

    /// Replace the privilege check
    pub fn with_privilege(mut self, probe: impl PrivilegeProbe + 'static) -> Self {
        self.privilege = Box::new(probe);
        self
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Current status line, empty when disconnected
    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }

    pub fn config_file(&self) -> &ConfigFile {
        &self.config_file
    }

    /// Session of the live tunnel, if any
    pub async fn active_session(&self) -> Option<SessionId> {
        self.slot
            .lock()
            .await
            .active
            .as_ref()
            .map(|a| a.process.session())
    }

    fn set_state(&self, state: ConnectionState) {
        debug!("Connection state -> {}", state);
        self.state.send_replace(state);
    }

    fn set_status(&self, status: String) {
        self.status.send_replace(status);
    }

    /// Connect to `record`, replacing any running tunnel.
    ///
    /// The previous tunnel is stopped and reaped before the new one is
    /// spawned. On error the controller is left disconnected.
    pub async fn connect(&self, record: &EndpointRecord) -> Result<()> {
        if !self.privilege.is_elevated() {
            return Err(Error::PrivilegeRequired);
        }

        let mut slot = self.slot.lock().await;
        if slot.closed {
            return Err(Error::ShutDown {
                ip: record.ip.clone(),
            });
        }

        if let Some(active) = slot.active.take() {
            info!("Replacing tunnel to {}", active.ip);
            self.begin_stop(&mut slot, active, StopMode::Terminate);
        }
        Self::reap_stopping(&mut slot).await;

        let payload = match decode_payload(&record.config_base64) {
            Ok(p) => p,
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                return Err(e);
            }
        };

        self.set_state(ConnectionState::Connecting);
        slot.next_session += 1;
        let session = SessionId(slot.next_session);

        match self.start(session, &payload) {
            Ok(process) => {
                info!("Tunnel {} connecting to {}", session, record.ip);
                slot.active = Some(ActiveTunnel {
                    process,
                    ip: record.ip.clone(),
                });
                self.set_status(format!("connect to {} [x: disconnect]", record.ip));
                self.set_state(ConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    fn start(&self, session: SessionId, payload: &[u8]) -> Result<TunnelProcess> {
        self.config_file.write(payload)?;
        TunnelProcess::spawn(
            &self.command,
            self.config_file.path(),
            session,
            self.sink.writer(),
            self.event_tx.clone(),
        )
    }

    /// Stop the running tunnel. No-op when disconnected.
    ///
    /// Returns once output and status are cleared; the process finishes
    /// exiting in the background and is reaped before any later connect.
    pub async fn disconnect(&self) {
        let mut slot = self.slot.lock().await;
        match slot.active.take() {
            Some(active) => {
                info!("Disconnecting from {}", active.ip);
                self.begin_stop(&mut slot, active, StopMode::Terminate);
                self.set_state(ConnectionState::Disconnected);
            }
            None => debug!("Disconnect with no tunnel running"),
        }
    }

    /// Handle a `TunnelEvent::Exited` for `session`.
    ///
    /// An exit of the live tunnel that nobody asked for clears output and
    /// status. Exits of sessions that were already replaced are ignored.
    pub async fn handle_exit(&self, session: SessionId, code: Option<i32>) {
        let mut slot = self.slot.lock().await;
        slot.stopping.retain(|p| p.is_running());

        let is_active = slot
            .active
            .as_ref()
            .is_some_and(|a| a.process.session() == session);
        if !is_active {
            debug!("Ignoring exit of superseded tunnel {}", session);
            return;
        }

        if let Some(active) = slot.active.take() {
            warn!(
                "Tunnel {} to {} exited with code {:?}",
                session, active.ip, code
            );
        }
        self.sink.clear();
        self.set_status(String::new());
        self.set_state(ConnectionState::Disconnected);
    }

    /// Kill any running tunnel, wait for it to be reaped, and refuse later
    /// connects. Used on quit.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        slot.closed = true;

        if let Some(mut active) = slot.active.take() {
            info!("Shutting down tunnel to {}", active.ip);
            active.process.request_stop(StopMode::Kill);
            slot.stopping.push(active.process);
        }
        Self::reap_stopping(&mut slot).await;

        self.set_status(String::new());
        self.set_state(ConnectionState::Disconnected);
    }

    /// Signal `active`, clear the visible state, and park the handle until
    /// its reap is observed
    fn begin_stop(&self, slot: &mut Slot, mut active: ActiveTunnel, mode: StopMode) {
        self.set_state(ConnectionState::Disconnecting);
        active.process.request_stop(mode);
        self.sink.clear();
        self.set_status(String::new());
        slot.stopping.push(active.process);
    }

    async fn reap_stopping(slot: &mut Slot) {
        for process in slot.stopping.drain(..) {
            process.wait_exit().await;
            debug!("Tunnel {} reaped", process.session());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use vpngate_tunnel::test_utils::{scripted_endpoint, SHELL_TUNNEL};

    struct Harness {
        controller: ConnectionController,
        events: mpsc::Receiver<TunnelEvent>,
        _dir: TempDir,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let settings = TunnelSettings {
            binary: SHELL_TUNNEL.to_string(),
            config_path: dir.path().join("openvpnconf"),
            stop_grace_ms: 500,
            require_root: false,
        };
        let (tx, rx) = mpsc::channel(16);
        Harness {
            controller: ConnectionController::new(&settings, OutputSink::new(100), tx),
            events: rx,
            _dir: dir,
        }
    }

    async fn next_event(rx: &mut mpsc::Receiver<TunnelEvent>) -> TunnelEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for tunnel event")
            .expect("event channel closed")
    }

    async fn wait_for_line(sink: &OutputSink, line: &str) {
        for _ in 0..100 {
            if sink.lines().iter().any(|l| l == line) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("{:?} never appeared in {:?}", line, sink.lines());
    }

    fn config_path(h: &Harness) -> PathBuf {
        h.controller.config_file().path().to_path_buf()
    }

    #[tokio::test]
    async fn test_connect_sets_status_and_state() {
        let h = harness();
        let server = scripted_endpoint("a", "1.2.3.4", "echo up\nexec sleep 60\n");

        h.controller.connect(&server).await.unwrap();

        assert_eq!(h.controller.state(), ConnectionState::Connected);
        assert_eq!(h.controller.status(), "connect to 1.2.3.4 [x: disconnect]");
        assert_eq!(h.controller.active_session().await, Some(SessionId(1)));
        wait_for_line(h.controller.sink(), "up").await;

        h.controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_reconnect_leaves_one_process_and_no_residue() {
        let mut h = harness();
        let a = scripted_endpoint("a", "1.1.1.1", "echo from-a\nexec sleep 60\n");
        let b = scripted_endpoint("b", "2.2.2.2", "echo from-b\nexec sleep 60\n");

        h.controller.connect(&a).await.unwrap();
        wait_for_line(h.controller.sink(), "from-a").await;

        h.controller.connect(&b).await.unwrap();

        // A was reaped as part of the reconnect
        assert_eq!(
            next_event(&mut h.events).await,
            TunnelEvent::Exited {
                session: SessionId(1),
                code: None,
                requested: true
            }
        );
        assert_eq!(h.controller.active_session().await, Some(SessionId(2)));
        assert_eq!(h.controller.status(), "connect to 2.2.2.2 [x: disconnect]");

        wait_for_line(h.controller.sink(), "from-b").await;
        assert!(!h.controller.sink().lines().contains(&"from-a".to_string()));

        h.controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let h = harness();

        h.controller.disconnect().await;
        assert_eq!(h.controller.state(), ConnectionState::Disconnected);

        let server = scripted_endpoint("a", "1.1.1.1", "echo hi\nexec sleep 60\n");
        h.controller.connect(&server).await.unwrap();
        wait_for_line(h.controller.sink(), "hi").await;

        h.controller.disconnect().await;
        h.controller.disconnect().await;

        assert_eq!(h.controller.state(), ConnectionState::Disconnected);
        assert_eq!(h.controller.status(), "");
        assert!(h.controller.sink().is_empty());
        assert_eq!(h.controller.active_session().await, None);

        h.controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_invalid_payload_leaves_config_untouched() {
        let h = harness();
        let good = scripted_endpoint("a", "1.1.1.1", "exec sleep 60\n");
        h.controller.connect(&good).await.unwrap();

        let mut bad = good.clone();
        bad.config_base64 = "!!not base64!!".to_string();
        let err = h.controller.connect(&bad).await.unwrap_err();

        assert!(matches!(err, Error::ConfigDecode { .. }));
        assert!(err.is_recoverable());
        assert_eq!(h.controller.state(), ConnectionState::Disconnected);
        assert_eq!(
            std::fs::read_to_string(config_path(&h)).unwrap(),
            "exec sleep 60\n"
        );

        h.controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_privilege_rejected_before_side_effects() {
        let h = harness();
        let controller = h.controller.with_privilege(Fixed(false));
        let server = scripted_endpoint("a", "1.1.1.1", "exec sleep 60\n");

        let err = controller.connect(&server).await.unwrap_err();

        assert!(matches!(err, Error::PrivilegeRequired));
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert!(!controller.config_file().exists());
        assert_eq!(controller.active_session().await, None);
    }

    #[tokio::test]
    async fn test_missing_binary_stays_disconnected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = TunnelSettings {
            binary: "no-such-tunnel-binary".to_string(),
            config_path: dir.path().join("conf"),
            stop_grace_ms: 100,
            require_root: false,
        };
        let (tx, _rx) = mpsc::channel(4);
        let controller = ConnectionController::new(&settings, OutputSink::default(), tx);
        let server = scripted_endpoint("a", "1.1.1.1", "exit 0\n");

        let err = controller.connect(&server).await.unwrap_err();
        assert!(matches!(err, Error::TunnelNotFound { .. }));
        assert_eq!(controller.state(), ConnectionState::Disconnected);
        assert_eq!(controller.status(), "");
    }

    #[tokio::test]
    async fn test_walk_off_clears_state() {
        let mut h = harness();
        let server = scripted_endpoint("a", "1.1.1.1", "echo failing\nexit 3\n");
        h.controller.connect(&server).await.unwrap();

        let (session, code) = match next_event(&mut h.events).await {
            TunnelEvent::Exited {
                session,
                code,
                requested,
            } => {
                assert!(!requested);
                (session, code)
            }
        };
        assert_eq!(code, Some(3));

        h.controller.handle_exit(session, code).await;

        assert_eq!(h.controller.state(), ConnectionState::Disconnected);
        assert_eq!(h.controller.status(), "");
        assert!(h.controller.sink().is_empty());
        assert_eq!(h.controller.active_session().await, None);
    }

    #[tokio::test]
    async fn test_exit_of_superseded_session_is_ignored() {
        let h = harness();
        let server = scripted_endpoint("a", "1.1.1.1", "exec sleep 60\n");
        h.controller.connect(&server).await.unwrap();
        h.controller.connect(&server).await.unwrap();

        h.controller.handle_exit(SessionId(1), None).await;

        assert_eq!(h.controller.state(), ConnectionState::Connected);
        assert_eq!(h.controller.active_session().await, Some(SessionId(2)));

        h.controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_reaps_and_blocks_later_connects() {
        let mut h = harness();
        let server = scripted_endpoint("a", "1.1.1.1", "exec sleep 60\n");
        h.controller.connect(&server).await.unwrap();

        h.controller.shutdown().await;
        match next_event(&mut h.events).await {
            TunnelEvent::Exited { requested, .. } => assert!(requested),
        }

        let err = h.controller.connect(&server).await.unwrap_err();
        assert!(matches!(err, Error::ShutDown { .. }));
        assert!(err.to_string().contains("1.1.1.1"));
        assert_eq!(h.controller.state(), ConnectionState::Disconnected);
        assert_eq!(h.controller.active_session().await, None);
    }
}
