//! Effect execution through local subprocesses

use crate::host::{EffectExecutor, HostError, SendOptions, SessionHandle, SessionService};
use crate::persistence::BreakpointStore;
use crate::resolve::Effect;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How long the browser opener may take to hand the URL off
const OPENER_TIMEOUT_SECS: u64 = 10;

/// Runs effects on the local machine
///
/// Logs and shells go through `kubectl` attached to the current terminal,
/// links through the platform opener, breakpoints into the configured store.
pub struct SubprocessHost {
    kubectl: String,
    breakpoints: Box<dyn BreakpointStore + Send + Sync>,
    sessions: Vec<SessionHandle>,
}

impl SubprocessHost {
    pub fn new(kubectl: impl Into<String>, breakpoints: Box<dyn BreakpointStore + Send + Sync>) -> Self {
        Self {
            kubectl: kubectl.into(),
            breakpoints,
            sessions: Vec::new(),
        }
    }

    pub fn breakpoints(&self) -> &dyn BreakpointStore {
        self.breakpoints.as_ref()
    }

    pub fn sessions(&self) -> &[SessionHandle] {
        &self.sessions
    }

    async fn view_logs(&self, namespace: &str, pod: &str, container: &str) -> Result<(), HostError> {
        debug!("Streaming logs of {}/{} container {}", namespace, pod, container);
        let mut command = Command::new(&self.kubectl);
        command.args(["logs", "-f", "-n", namespace, pod, "-c", container]);
        run_attached(&self.kubectl, command).await
    }

    /// Hand a URL to the platform opener after yielding once to the scheduler
    async fn open_link(&self, url: &str) {
        tokio::task::yield_now().await;

        let (program, args) = opener(url);
        let result = timeout(
            Duration::from_secs(OPENER_TIMEOUT_SECS),
            Command::new(program)
                .args(&args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Err(_) => warn!("Opening {} timed out after {} seconds", url, OPENER_TIMEOUT_SECS),
            Ok(Err(e)) => warn!("Failed to run {} for {}: {}", program, url, e),
            Ok(Ok(output)) if !output.status.success() => warn!(
                "{} exited with code {} for {}: {}",
                program,
                output.status.code().unwrap_or(-1),
                url,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Ok(Ok(_)) => info!("Opened link {}", url),
        }
    }
}

#[async_trait]
impl SessionService for SubprocessHost {
    async fn create_session(&mut self, title: &str) -> Result<SessionHandle, HostError> {
        let session = SessionHandle::new(title);
        info!("{}", session.title);
        self.sessions.push(session.clone());
        Ok(session)
    }

    async fn send_command(&mut self, command: &str, options: SendOptions) -> Result<(), HostError> {
        if !self.sessions.iter().any(|s| s.id == options.session_id) {
            return Err(HostError::UnknownSession(options.session_id));
        }
        if !options.enter {
            println!("{}", command);
            return Ok(());
        }

        debug!("Running {:?} in session {}", command, options.session_id);
        let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
        let mut process = Command::new(shell);
        process.args([flag, command]);
        run_attached(shell, process).await
    }
}

#[async_trait]
impl EffectExecutor for SubprocessHost {
    async fn execute(&mut self, effect: Effect) -> Result<(), HostError> {
        debug!("Executing {}", effect.name());
        match effect {
            Effect::OpenLink { url } => {
                self.open_link(&url).await;
                Ok(())
            }
            Effect::ViewLogs { pod, container } => {
                self.view_logs(&pod.namespace, &pod.name, &container).await
            }
            Effect::OpenShell { title, command, .. } => {
                let session = self.create_session(&title).await?;
                self.send_command(
                    &command,
                    SendOptions {
                        enter: true,
                        session_id: session.id,
                    },
                )
                .await
            }
            Effect::CreateBreakpoint { metadata, spec } => {
                let name = metadata.name.clone();
                self.breakpoints.create(metadata, spec)?;
                info!("Created breakpoint {}", name);
                Ok(())
            }
            Effect::RemoveBreakpoint { breakpoint } => {
                self.breakpoints.remove(&breakpoint)?;
                info!("Removed breakpoint {}", breakpoint.name());
                Ok(())
            }
        }
    }
}

/// Run a command with the terminal attached and wait for it to finish
async fn run_attached(program: &str, mut command: Command) -> Result<(), HostError> {
    let status = command
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|source| HostError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        warn!("{} exited with code {}", program, code);
        return Err(HostError::Exit {
            program: program.to_string(),
            code,
        });
    }
    Ok(())
}

/// Program and arguments that open a URL in the default browser
fn opener(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(windows) {
        (
            "cmd",
            vec!["/C".to_string(), "start".to_string(), String::new(), url.to_string()],
        )
    } else if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}
