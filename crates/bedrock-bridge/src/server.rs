//! Bedrock dedicated server process adapter
//!
//! Owns one child process and translates its output stream into
//! line-based and structured events on a broadcast channel. Stream
//! parsing happens in background tasks; the `Closed` event is emitted
//! only after both output streams have drained.

use crate::properties::ServerProperties;
use bedrock_core::{BridgeError, ConsoleEvent, LineAssembler, Result, parse_console};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Read buffer size for the output streams
const READ_BUF_SIZE: usize = 4096;

/// Events published by [`BedrockServer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Process successfully started
    Opened,
    /// Process terminated and its output streams drained
    Closed,
    /// Raw reassembled output text
    Stdout(String),
    /// Raw error-stream text, one event per chunk
    Stderr(String),
    /// Structured per-line parse result
    Console(ConsoleEvent),
}

/// A locally spawned Bedrock dedicated server.
///
/// [`BedrockServer::new`] resolves the server directory and loads
/// `server.properties`; [`BedrockServer::start`] spawns the process and
/// wires the stream tasks, so subscribers attached in between observe
/// the `Opened` event.
pub struct BedrockServer {
    /// Path to the server executable
    executable: PathBuf,
    /// Directory containing the executable and `server.properties`
    dir: PathBuf,
    /// Typed view of the sibling `server.properties`
    properties: ServerProperties,
    /// Broadcast channel for lifecycle and console events
    event_tx: broadcast::Sender<ServerEvent>,
    /// Child stdin, present once started
    stdin: Mutex<Option<ChildStdin>>,
    /// Background task awaiting process exit
    _exit_handle: Option<JoinHandle<()>>,
}

impl BedrockServer {
    /// Prepare a server rooted at `executable_path`.
    ///
    /// The working directory is the parent directory of the executable;
    /// a `server.properties` file must exist there. The process is not
    /// spawned until [`start`](Self::start).
    pub fn new(executable_path: impl AsRef<Path>) -> Result<Self> {
        let executable = executable_path.as_ref().to_path_buf();
        let dir = executable
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let properties = ServerProperties::load(&dir)?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            executable,
            dir,
            properties,
            event_tx,
            stdin: Mutex::new(None),
            _exit_handle: None,
        })
    }

    /// Spawn the server process and wire the stream tasks.
    ///
    /// Emits `Opened` before returning. Must be called from within a
    /// Tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self._exit_handle.is_some() {
            return Err(BridgeError::Spawn("Server already started".into()));
        }

        let mut child = Command::new(&self.executable)
            .current_dir(&self.dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                BridgeError::Spawn(format!(
                    "Failed to spawn {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Stream("Child stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::Stream("Child stderr not captured".into()))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Stream("Child stdin not captured".into()))?;
        self.stdin = Mutex::new(Some(stdin));

        info!("Spawned server process in {}", self.dir.display());

        let stdout_handle = tokio::spawn(stdout_task(stdout, self.event_tx.clone()));
        let stderr_handle = tokio::spawn(stderr_task(stderr, self.event_tx.clone()));
        self._exit_handle = Some(tokio::spawn(exit_task(
            child,
            stdout_handle,
            stderr_handle,
            self.event_tx.clone(),
        )));

        // Ignore send errors (no subscribers yet)
        let _ = self.event_tx.send(ServerEvent::Opened);
        Ok(())
    }

    /// Subscribe to lifecycle and console events.
    ///
    /// Each receiver sees every event sent after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Write a command to the server's stdin.
    ///
    /// A newline terminator is appended; no buffering beyond the pipe's
    /// own is performed.
    pub async fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        let mut guard = self.stdin.lock().await;
        let stdin = guard
            .as_mut()
            .ok_or_else(|| BridgeError::Stream("Server not running".into()))?;
        stdin.write_all(data.as_ref()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Typed view of the server's `server.properties`
    pub fn properties(&self) -> &ServerProperties {
        &self.properties
    }

    /// Mutable view for property updates
    pub fn properties_mut(&mut self) -> &mut ServerProperties {
        &mut self.properties
    }

    /// Directory the server runs in
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Reads stdout chunks, reassembles lines, and publishes `Console` and
/// `Stdout` events.
async fn stdout_task(mut stdout: ChildStdout, event_tx: broadcast::Sender<ServerEvent>) {
    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        match stdout.read(&mut buf).await {
            Ok(0) => {
                debug!("Server stdout closed");
                break;
            }
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]);
                if let Some(text) = assembler.push(&chunk) {
                    // Ignore send errors (no subscribers)
                    for event in parse_console(&text) {
                        let _ = event_tx.send(ServerEvent::Console(event));
                    }
                    let _ = event_tx.send(ServerEvent::Stdout(text));
                }
            }
            Err(e) => {
                warn!("Server stdout read failed: {}", e);
                break;
            }
        }
    }
}

/// Reads stderr chunks and publishes one `Stderr` event per chunk,
/// unfiltered.
async fn stderr_task(mut stderr: ChildStderr, event_tx: broadcast::Sender<ServerEvent>) {
    let mut buf = [0u8; READ_BUF_SIZE];

    loop {
        match stderr.read(&mut buf).await {
            Ok(0) => {
                debug!("Server stderr closed");
                break;
            }
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                let _ = event_tx.send(ServerEvent::Stderr(chunk));
            }
            Err(e) => {
                warn!("Server stderr read failed: {}", e);
                break;
            }
        }
    }
}

/// Awaits process exit, waits for the stream tasks to drain, then
/// publishes `Closed`. Exit code and signal are logged only.
async fn exit_task(
    mut child: Child,
    stdout_handle: JoinHandle<()>,
    stderr_handle: JoinHandle<()>,
    event_tx: broadcast::Sender<ServerEvent>,
) {
    match child.wait().await {
        Ok(status) => info!("Server process exited: {}", status),
        Err(e) => warn!("Failed to wait on server process: {}", e),
    }
    let _ = stdout_handle.await;
    let _ = stderr_handle.await;
    let _ = event_tx.send(ServerEvent::Closed);
}
