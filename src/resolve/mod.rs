//! Resolution of activities against cluster state
//!
//! Lookups here run against the stores' snapshots and never fail: a miss is
//! logged and reported as `None`.

pub mod breakpoints;
pub mod effects;
pub mod links;
pub mod menu;
pub mod pods;

pub use breakpoints::{breakpoint_for_activity, find_breakpoint};
pub use effects::{Effect, Platform};
pub use links::{extract_links, ActionLink, LinkKind};
pub use menu::{shell_command, ActivityActions, ActivityMenu, BreakpointState, ContainerTarget};
pub use pods::{build_selector, PodResolver};
