//! pipeline-activity - inspect Jenkins X pipeline activities, their pods and breakpoints

pub mod cli;
pub mod core;
pub mod host;
pub mod persistence;
pub mod resolve;

// Re-export commonly used types
pub use crate::core::config::Settings;
pub use crate::core::{Activity, ActivityStatus, ActivityStep, Breakpoint, BreakpointFilter, CoreActivityStep, Pod};
pub use crate::host::{DryRunHost, EffectExecutor, HostError, SubprocessHost};
pub use crate::persistence::{BreakpointStore, FileBreakpointStore, PodStore, StoreError};
pub use crate::resolve::{ActionLink, ActivityActions, ActivityMenu, Effect, PodResolver};
