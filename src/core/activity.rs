//! Pipeline activity resource model
//!
//! A `PipelineActivity` (`jenkins.io/v1`) records one run of a pipeline. The
//! resource is owned by the cluster; these types are a read-only view of it.

use crate::core::meta::{lenient_timestamp, ObjectMeta};
use crate::core::state::ActivityStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ActivitySpec>,
}

/// The `spec` of an activity; every field is optional on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_timestamp: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_timestamp: Option<DateTime<Utc>>,

    /// Steps in execution order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ActivityStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_repository: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_commit_message: Option<String>,

    #[serde(
        default,
        rename = "releaseNotesURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_notes_url: Option<String>,
}

/// An element of `spec.steps`
///
/// On the wire this is an object with optional `stage`, `promote` and
/// `preview` keys of which exactly one is expected to be set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityStepRecord", into = "ActivityStepRecord")]
pub enum ActivityStep {
    Stage(StageActivityStep),
    Promote(PromoteActivityStep),
    Preview(PreviewActivityStep),
    /// None of the known variants was populated
    Empty,
}

/// A named group of sequential steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageActivityStep {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_timestamp: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<CoreActivityStep>,
}

/// A leaf execution unit; each one runs in its own container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreActivityStep {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub started_timestamp: Option<DateTime<Utc>>,

    /// Absent until the step has finished
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_timestamp: Option<DateTime<Utc>>,
}

/// Promotion of the release to an environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteActivityStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PromotePullRequestStep>,
}

/// The pull request raised against an environment repository
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotePullRequestStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        default,
        rename = "pullRequestURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
}

/// Deployment of a preview environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewActivityStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,

    #[serde(
        default,
        rename = "applicationURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_url: Option<String>,

    #[serde(
        default,
        rename = "pullRequestURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub pull_request_url: Option<String>,
}

/// Wire shape of an activity step
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityStepRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    stage: Option<StageActivityStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    promote: Option<PromoteActivityStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    preview: Option<PreviewActivityStep>,
}

impl From<ActivityStepRecord> for ActivityStep {
    fn from(record: ActivityStepRecord) -> Self {
        match (record.stage, record.promote, record.preview) {
            (Some(stage), _, _) => ActivityStep::Stage(stage),
            (None, Some(promote), _) => ActivityStep::Promote(promote),
            (None, None, Some(preview)) => ActivityStep::Preview(preview),
            (None, None, None) => ActivityStep::Empty,
        }
    }
}

impl From<ActivityStep> for ActivityStepRecord {
    fn from(step: ActivityStep) -> Self {
        let kind = step.kind().map(str::to_string);
        let mut record = ActivityStepRecord {
            kind,
            ..Default::default()
        };
        match step {
            ActivityStep::Stage(stage) => record.stage = Some(stage),
            ActivityStep::Promote(promote) => record.promote = Some(promote),
            ActivityStep::Preview(preview) => record.preview = Some(preview),
            ActivityStep::Empty => {}
        }
        record
    }
}

impl Activity {
    /// Resource name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace, if the resource carries one
    pub fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }

    /// The top level steps, empty when there is no spec
    pub fn steps(&self) -> &[ActivityStep] {
        self.spec.as_ref().map(|s| s.steps.as_slice()).unwrap_or(&[])
    }

    /// Overall status of the run
    pub fn status(&self) -> Option<ActivityStatus> {
        self.spec.as_ref().and_then(|s| s.status)
    }

    /// When the run was created
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .creation_timestamp
            .or_else(|| self.spec.as_ref().and_then(|s| s.started_timestamp))
    }

    pub fn git_owner(&self) -> Option<&str> {
        self.spec.as_ref()?.git_owner.as_deref()
    }

    pub fn git_repository(&self) -> Option<&str> {
        self.spec.as_ref()?.git_repository.as_deref()
    }

    pub fn git_branch(&self) -> Option<&str> {
        self.spec.as_ref()?.git_branch.as_deref()
    }

    pub fn git_url(&self) -> Option<&str> {
        self.spec.as_ref()?.git_url.as_deref()
    }

    pub fn build(&self) -> Option<&str> {
        self.spec.as_ref()?.build.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.spec.as_ref()?.context.as_deref()
    }
}

impl ActivityStep {
    /// The `kind` written back when serializing
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            ActivityStep::Stage(_) => Some("Stage"),
            ActivityStep::Promote(_) => Some("Promote"),
            ActivityStep::Preview(_) => Some("Preview"),
            ActivityStep::Empty => None,
        }
    }
}

impl PromoteActivityStep {
    /// The pull request URL, if one was raised
    pub fn pull_request_url(&self) -> Option<&str> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.pull_request_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Display title: the pull request name, or `Promote to <env>` when an
    /// environment is set
    pub fn title(&self) -> String {
        match self.environment.as_deref().filter(|env| !env.is_empty()) {
            Some(env) => format!("Promote to {}", env),
            None => self
                .pull_request
                .as_ref()
                .and_then(|pr| pr.name.clone())
                .unwrap_or_default(),
        }
    }
}

impl PreviewActivityStep {
    /// The preview application URL, if deployed
    pub fn application_url(&self) -> Option<&str> {
        self.application_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Display title, `Preview` when unnamed
    pub fn title(&self) -> String {
        self.name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Preview".to_string())
    }
}

/// Short identifier of a pull request: the text after the last `/` of its URL
pub fn pull_request_short_name(url: &str) -> String {
    match url.rfind('/') {
        Some(i) if i > 0 => url[i + 1..].to_string(),
        _ => "PR".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVITY_YAML: &str = r#"
apiVersion: jenkins.io/v1
kind: PipelineActivity
metadata:
  name: acme-app-main-5
  namespace: jx
  labels:
    podName: acme-app-main-5-abc
spec:
  gitOwner: acme
  gitRepository: app
  gitBranch: main
  build: "5"
  status: Running
  steps:
    - kind: Stage
      stage:
        name: from build pack
        status: Running
        steps:
          - name: Build
            status: Succeeded
            completedTimestamp: "2021-03-01T10:00:00Z"
          - name: Test
            status: Running
    - kind: Promote
      promote:
        environment: staging
        pullRequest:
          name: "promote app to 1.2.3"
          pullRequestURL: https://github.com/acme/env-staging/pull/42
    - kind: Preview
      preview:
        applicationURL: http://app.preview.example.com
"#;

    #[test]
    fn test_parse_activity() {
        let activity: Activity = serde_yaml::from_str(ACTIVITY_YAML).unwrap();
        assert_eq!(activity.name(), "acme-app-main-5");
        assert_eq!(activity.namespace(), Some("jx"));
        assert_eq!(activity.status(), Some(ActivityStatus::Running));
        assert_eq!(activity.steps().len(), 3);

        match &activity.steps()[0] {
            ActivityStep::Stage(stage) => {
                assert_eq!(stage.steps.len(), 2);
                assert!(stage.steps[0].completed_timestamp.is_some());
                assert!(stage.steps[1].completed_timestamp.is_none());
            }
            other => panic!("expected stage, got {:?}", other),
        }
        assert!(matches!(activity.steps()[1], ActivityStep::Promote(_)));
        assert!(matches!(activity.steps()[2], ActivityStep::Preview(_)));
    }

    #[test]
    fn test_step_without_variant_is_empty() {
        let step: ActivityStep = serde_json::from_str(r#"{"kind": "Stage"}"#).unwrap();
        assert_eq!(step, ActivityStep::Empty);
    }

    #[test]
    fn test_step_serializes_back_to_wire_shape() {
        let step = ActivityStep::Preview(PreviewActivityStep {
            application_url: Some("http://x".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["kind"], "Preview");
        assert_eq!(value["preview"]["applicationURL"], "http://x");
    }

    #[test]
    fn test_missing_spec() {
        let activity: Activity = serde_yaml::from_str("metadata:\n  name: bare\n").unwrap();
        assert!(activity.spec.is_none());
        assert!(activity.steps().is_empty());
        assert_eq!(activity.status(), None);
    }

    #[test]
    fn test_promote_title() {
        let mut promote = PromoteActivityStep {
            pull_request: Some(PromotePullRequestStep {
                name: Some("chore: bump".to_string()),
                pull_request_url: Some("http://git/pr/42".to_string()),
                status: None,
            }),
            ..Default::default()
        };
        assert_eq!(promote.title(), "chore: bump");

        promote.environment = Some("production".to_string());
        assert_eq!(promote.title(), "Promote to production");
    }

    #[test]
    fn test_pull_request_short_name() {
        assert_eq!(pull_request_short_name("http://git/pr/42"), "42");
        assert_eq!(pull_request_short_name("42"), "PR");
        assert_eq!(pull_request_short_name("/42"), "PR");
        assert_eq!(pull_request_short_name("http://git/pr/"), "");
    }
}
