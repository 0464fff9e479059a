//! Match activities against stored breakpoints

use crate::core::{Activity, Breakpoint, BreakpointFilter};
use crate::persistence::BreakpointStore;
use tracing::debug;

/// The first breakpoint whose filter equals `filter` on all four fields
pub fn find_breakpoint<'a>(
    breakpoints: &'a [Breakpoint],
    filter: &BreakpointFilter,
) -> Option<&'a Breakpoint> {
    breakpoints.iter().find(|bp| bp.spec.filter == *filter)
}

/// The breakpoint currently set for an activity, if any
pub fn breakpoint_for_activity(
    store: &dyn BreakpointStore,
    activity: &Activity,
) -> Option<Breakpoint> {
    let filter = BreakpointFilter::from_activity(activity);
    let found = store.get_breakpoint_for_activity(&filter);
    if found.is_none() {
        debug!("No breakpoint matches {:?}", filter);
    }
    found
}
