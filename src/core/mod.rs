//! Core domain models for pipeline activities
//!
//! This module defines the resources read from the cluster (activities,
//! pods, breakpoints) and the pure projections computed over them.

pub mod activity;
pub mod breakpoint;
pub mod config;
pub mod meta;
pub mod pod;
pub mod state;
pub mod step;
pub mod summary;

pub use activity::*;
pub use breakpoint::*;
pub use meta::ObjectMeta;
pub use pod::*;
pub use state::*;
pub use step::*;
