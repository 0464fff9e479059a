//! Lighthouse breakpoint resource model
//!
//! A breakpoint pauses pipelines whose branch, owner, repository and context
//! all equal the stored filter.

use crate::core::activity::Activity;
use crate::core::meta::ObjectMeta;
use serde::{Deserialize, Serialize};

/// Trigger that pauses the pipeline when a step fails
pub const ON_FAILURE: &str = "onFailure";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: BreakpointSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointSpec {
    #[serde(default)]
    pub filter: BreakpointFilter,

    #[serde(default)]
    pub debug: BreakpointDebug,
}

/// Which pipelines a breakpoint applies to
///
/// Equality is exact on all four fields; an absent field only equals another
/// absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// When to pause
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointDebug {
    #[serde(default)]
    pub breakpoint: Vec<String>,
}

impl BreakpointFilter {
    /// Derive the filter matching an activity, copying values verbatim
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            branch: activity.git_branch().map(str::to_string),
            owner: activity.git_owner().map(str::to_string),
            repository: activity.git_repository().map(str::to_string),
            context: activity.context().map(str::to_string),
        }
    }
}

impl Breakpoint {
    /// Build the breakpoint created for an activity
    ///
    /// The breakpoint takes the activity's name and namespace.
    pub fn for_activity(activity: &Activity, triggers: &[String]) -> Self {
        Self {
            api_version: Some("lighthouse.jenkins.io/v1alpha1".to_string()),
            kind: Some("LighthouseBreakpoint".to_string()),
            metadata: ObjectMeta::new(activity.name(), activity.metadata.namespace.clone()),
            spec: BreakpointSpec {
                filter: BreakpointFilter::from_activity(activity),
                debug: BreakpointDebug {
                    breakpoint: triggers.to_vec(),
                },
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::activity::ActivitySpec;

    fn activity() -> Activity {
        Activity {
            metadata: ObjectMeta::new("acme-app-main-5", Some("jx".to_string())),
            spec: Some(ActivitySpec {
                git_branch: Some("main".to_string()),
                git_owner: Some("acme".to_string()),
                git_repository: Some("app".to_string()),
                context: Some("release".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_from_activity() {
        let filter = BreakpointFilter::from_activity(&activity());
        assert_eq!(filter.branch.as_deref(), Some("main"));
        assert_eq!(filter.owner.as_deref(), Some("acme"));
        assert_eq!(filter.repository.as_deref(), Some("app"));
        assert_eq!(filter.context.as_deref(), Some("release"));
    }

    #[test]
    fn test_filter_without_spec() {
        assert_eq!(
            BreakpointFilter::from_activity(&Activity::default()),
            BreakpointFilter::default()
        );
    }

    #[test]
    fn test_filter_equality_is_exact() {
        let filter = BreakpointFilter::from_activity(&activity());
        assert_eq!(filter, filter.clone());

        let variants = [
            BreakpointFilter { branch: Some("Main".to_string()), ..filter.clone() },
            BreakpointFilter { owner: Some("Acme".to_string()), ..filter.clone() },
            BreakpointFilter { repository: Some("app ".to_string()), ..filter.clone() },
            BreakpointFilter { context: None, ..filter.clone() },
        ];
        for other in &variants {
            assert_ne!(&filter, other);
        }
    }

    #[test]
    fn test_breakpoint_for_activity() {
        let bp = Breakpoint::for_activity(&activity(), &[ON_FAILURE.to_string()]);
        assert_eq!(bp.name(), "acme-app-main-5");
        assert_eq!(bp.metadata.namespace.as_deref(), Some("jx"));
        assert_eq!(bp.spec.debug.breakpoint, vec!["onFailure".to_string()]);
        assert_eq!(bp.spec.filter, BreakpointFilter::from_activity(&activity()));
    }
}
