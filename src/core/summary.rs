//! Activity list rows, sorting and search

use crate::core::activity::Activity;
use crate::core::state::ActivityStatus;
use crate::core::step::{last_step_summary, LastStepSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column an activity list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Owner,
    Repository,
    Branch,
    Status,
    Age,
}

/// One row of the activity table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub name: String,
    pub owner: String,
    pub repository: String,
    pub branch: String,
    pub build: String,
    pub status: Option<ActivityStatus>,
    /// Render class of the status, e.g. `status-running`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_class: Option<String>,
    pub message: String,
    pub created: Option<DateTime<Utc>>,
}

impl ActivityRow {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            name: activity.name().to_string(),
            owner: activity.git_owner().unwrap_or_default().to_string(),
            repository: activity.git_repository().unwrap_or_default().to_string(),
            branch: activity.git_branch().unwrap_or_default().to_string(),
            build: activity.build().unwrap_or_default().to_string(),
            status: activity.status(),
            status_class: activity.status().map(|s| s.status_class()),
            message: last_step_summary(activity)
                .as_ref()
                .map(LastStepSummary::to_string)
                .unwrap_or_default(),
            created: activity.created_time(),
        }
    }

    /// Age relative to `now`, formatted like kubectl (`45s`, `12m`, `3h`, `2d`)
    pub fn age(&self, now: DateTime<Utc>) -> String {
        self.created
            .map(|created| format_age(now.signed_duration_since(created)))
            .unwrap_or_default()
    }
}

fn format_age(age: chrono::Duration) -> String {
    let secs = age.num_seconds().max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Values an activity is matched against when searching
pub fn search_fields(activity: &Activity) -> Vec<String> {
    let mut fields = vec![activity.name().to_string()];
    fields.extend(
        [
            activity.git_owner(),
            activity.git_repository(),
            activity.git_branch(),
            activity.build(),
            activity.context(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string),
    );
    if let Some(status) = activity.status() {
        fields.push(status.to_string());
    }
    fields
}

/// Case-insensitive substring search over the search fields
pub fn matches_search(activity: &Activity, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    search_fields(activity)
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

/// Compare two activities on a sort column; absent values sort first
pub fn compare(a: &Activity, b: &Activity, by: SortBy) -> Ordering {
    match by {
        SortBy::Owner => a.git_owner().cmp(&b.git_owner()),
        SortBy::Repository => a.git_repository().cmp(&b.git_repository()),
        SortBy::Branch => a.git_branch().cmp(&b.git_branch()),
        SortBy::Status => a
            .status()
            .map(|s| s.as_str())
            .cmp(&b.status().map(|s| s.as_str())),
        SortBy::Age => a.created_time().cmp(&b.created_time()),
    }
}

/// Sort activities in place, keeping the input order between equal keys
pub fn sort_activities(activities: &mut [Activity], by: SortBy) {
    activities.sort_by(|a, b| compare(a, b, by));
}
