//! Host side of the effect boundary
//!
//! The resolvers only describe what should happen. Implementations of
//! [`EffectExecutor`] make it happen: spawn `kubectl`, open a browser, write
//! breakpoints.

pub mod subprocess;

pub use subprocess::SubprocessHost;

use crate::persistence::StoreError;
use crate::resolve::Effect;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Error types for effect execution
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}")]
    Exit { program: String, code: i32 },

    #[error("Unknown session {0}")]
    UnknownSession(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A terminal session opened for a shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionHandle {
    pub id: Uuid,
    pub title: String,
}

impl SessionHandle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }
}

/// Options for [`SessionService::send_command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Submit the command instead of only typing it
    pub enter: bool,
    pub session_id: Uuid,
}

/// Terminal sessions that shell commands are sent to
#[async_trait]
pub trait SessionService: Send {
    async fn create_session(&mut self, title: &str) -> Result<SessionHandle, HostError>;

    async fn send_command(&mut self, command: &str, options: SendOptions) -> Result<(), HostError>;
}

/// Executes effects produced by activity actions
#[async_trait]
pub trait EffectExecutor: Send {
    async fn execute(&mut self, effect: Effect) -> Result<(), HostError>;
}

/// Executor that only records and reports effects (`--dry-run`)
#[derive(Debug, Default)]
pub struct DryRunHost {
    pub effects: Vec<Effect>,
}

impl DryRunHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EffectExecutor for DryRunHost {
    async fn execute(&mut self, effect: Effect) -> Result<(), HostError> {
        info!("Dry run, skipping {}: {}", effect.name(), effect);
        self.effects.push(effect);
        Ok(())
    }
}
