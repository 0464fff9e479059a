//! One-way commands produced by menu actions
//!
//! Actions never touch the environment themselves; they return an [`Effect`]
//! that the host executes.

use crate::core::{Breakpoint, BreakpointSpec, ObjectMeta, PodRef};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Open a URL in the external browser
    OpenLink { url: String },

    /// Stream the logs of one container of a pod
    ViewLogs { pod: PodRef, container: String },

    /// Open a terminal session and send `command` to it
    OpenShell {
        title: String,
        command: String,
        pod: PodRef,
    },

    CreateBreakpoint {
        metadata: ObjectMeta,
        spec: BreakpointSpec,
    },

    RemoveBreakpoint { breakpoint: Breakpoint },
}

impl Effect {
    /// Short name of the effect kind, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Effect::OpenLink { .. } => "open_link",
            Effect::ViewLogs { .. } => "view_logs",
            Effect::OpenShell { .. } => "open_shell",
            Effect::CreateBreakpoint { .. } => "create_breakpoint",
            Effect::RemoveBreakpoint { .. } => "remove_breakpoint",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::OpenLink { url } => write!(f, "open {}", url),
            Effect::ViewLogs { pod, container } => write!(
                f,
                "logs {}/{} container {}",
                pod.namespace, pod.name, container
            ),
            Effect::OpenShell { title, command, .. } => write!(f, "[{}] {}", title, command),
            Effect::CreateBreakpoint { metadata, spec } => write!(
                f,
                "create breakpoint {}/{} on {}",
                metadata.namespace.as_deref().unwrap_or(""),
                metadata.name,
                spec.debug.breakpoint.join(",")
            ),
            Effect::RemoveBreakpoint { breakpoint } => write!(
                f,
                "remove breakpoint {}/{}",
                breakpoint.metadata.namespace.as_deref().unwrap_or(""),
                breakpoint.metadata.name
            ),
        }
    }
}

/// Operating system family of the machine running the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}
