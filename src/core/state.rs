//! Activity status models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an activity, a stage or a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    /// Waiting to start
    Pending,
    /// Currently running
    Running,
    /// Completed successfully
    Succeeded,
    /// Failed
    Failed,
    /// Waiting for a manual approval
    WaitingForApproval,
    /// There is some error with the activity
    Error,
    /// The workflow was aborted
    Aborted,
    /// The workflow was not executed
    NotExecuted,
    /// A status this version does not know about
    #[serde(other)]
    Unknown,
}

impl ActivityStatus {
    /// The status as it appears on the resource
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "Pending",
            ActivityStatus::Running => "Running",
            ActivityStatus::Succeeded => "Succeeded",
            ActivityStatus::Failed => "Failed",
            ActivityStatus::WaitingForApproval => "WaitingForApproval",
            ActivityStatus::Error => "Error",
            ActivityStatus::Aborted => "Aborted",
            ActivityStatus::NotExecuted => "NotExecuted",
            ActivityStatus::Unknown => "Unknown",
        }
    }

    /// Check if the status represents an unsuccessful outcome
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ActivityStatus::Failed | ActivityStatus::Error | ActivityStatus::Aborted
        )
    }

    /// Kebab-cased name, e.g. `waiting-for-approval`
    pub fn kebab_case(&self) -> String {
        let mut out = String::new();
        for (i, ch) in self.as_str().chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if i > 0 {
                    out.push('-');
                }
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Class used when rendering the status, e.g. `status-succeeded`
    pub fn status_class(&self) -> String {
        format!("status-{}", self.kebab_case())
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
