//! Step traversal over an activity
//!
//! Activities nest their leaf steps inside stages. Everything that targets a
//! container (logs, shells, the "latest step" shortcut) works on the flattened
//! list produced here.

use crate::core::activity::{pull_request_short_name, Activity, ActivityStep, CoreActivityStep};
use crate::core::state::ActivityStatus;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Collect the leaf steps of all stages in execution order
///
/// Promote and preview steps have no containers and are skipped.
pub fn flatten_steps(activity: &Activity) -> Vec<&CoreActivityStep> {
    activity
        .steps()
        .iter()
        .filter_map(|step| match step {
            ActivityStep::Stage(stage) => Some(stage.steps.iter()),
            ActivityStep::Promote(_) | ActivityStep::Preview(_) | ActivityStep::Empty => None,
        })
        .flatten()
        .collect()
}

/// Name of the container a step runs in, e.g. `Build And Test` -> `step-build-and-test`
pub fn container_name(step_name: &str) -> String {
    let lowered = step_name.to_lowercase();
    format!("step-{}", WHITESPACE.replace_all(&lowered, "-"))
}

/// Container names of every step, in execution order
pub fn container_names(activity: &Activity) -> Vec<String> {
    flatten_steps(activity)
        .into_iter()
        .map(|step| container_name(&step.name))
        .collect()
}

/// Find the container of the step that is currently running
///
/// Steps run sequentially, so the first step without a completion time is the
/// active one. When every step has completed and `use_last_if_not_running` is
/// set, the last step is returned instead.
pub fn running_container_name<'a, I>(steps: I, use_last_if_not_running: bool) -> Option<String>
where
    I: IntoIterator<Item = &'a CoreActivityStep>,
{
    let mut last: Option<&str> = None;
    for step in steps {
        if step.completed_timestamp.is_none() {
            return Some(container_name(&step.name));
        }
        last = Some(step.name.as_str());
    }

    last.filter(|name| use_last_if_not_running && !name.is_empty())
        .map(container_name)
}

/// What the latest step of an activity is doing, as shown in the activity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastStepSummary {
    /// A plain step, stage, promotion or preview name
    Text(String),
    /// A promotion with a pull request
    Promotion {
        title: String,
        url: String,
        short_name: String,
    },
    /// A deployed preview environment
    Preview { title: String, url: String },
}

impl LastStepSummary {
    /// The URL the summary links to, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            LastStepSummary::Text(_) => None,
            LastStepSummary::Promotion { url, .. } | LastStepSummary::Preview { url, .. } => {
                Some(url)
            }
        }
    }
}

impl fmt::Display for LastStepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastStepSummary::Text(text) => f.write_str(text),
            LastStepSummary::Promotion {
                title, short_name, ..
            } => write!(f, "{} #{}", title, short_name),
            LastStepSummary::Preview { title, .. } => write!(f, "Preview {}", title),
        }
    }
}

/// Summarise the last top-level step of an activity
///
/// For a stage this is the latest of its steps that has left `Pending`; the
/// first step of the stage is reported even if it is still pending.
pub fn last_step_summary(activity: &Activity) -> Option<LastStepSummary> {
    match activity.steps().last()? {
        ActivityStep::Stage(stage) => {
            let current = stage
                .steps
                .iter()
                .enumerate()
                .rev()
                .find(|(i, step)| *i == 0 || step.status != Some(ActivityStatus::Pending))
                .map(|(_, step)| step.name.clone());
            Some(LastStepSummary::Text(
                current.unwrap_or_else(|| stage.name.clone()),
            ))
        }
        ActivityStep::Promote(promote) => match promote.pull_request_url() {
            Some(url) => Some(LastStepSummary::Promotion {
                title: promote.title(),
                url: url.to_string(),
                short_name: pull_request_short_name(url),
            }),
            None => promote.name.clone().map(LastStepSummary::Text),
        },
        ActivityStep::Preview(preview) => match preview.application_url() {
            Some(url) => Some(LastStepSummary::Preview {
                title: preview.title(),
                url: url.to_string(),
            }),
            None => preview.name.clone().map(LastStepSummary::Text),
        },
        ActivityStep::Empty => None,
    }
}
