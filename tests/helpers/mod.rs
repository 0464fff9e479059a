//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pipeline_activity::core::{
    Activity, ActivitySpec, ActivityStep, CoreActivityStep, ObjectMeta, Pod, StageActivityStep,
};
use pipeline_activity::host::{EffectExecutor, HostError};
use pipeline_activity::resolve::Effect;
use std::sync::{Arc, Mutex};

/// An activity exported from a cluster, in the shape `kubectl get -o yaml` produces
pub const ACTIVITIES_YAML: &str = r#"
apiVersion: v1
kind: List
items:
  - apiVersion: jenkins.io/v1
    kind: PipelineActivity
    metadata:
      name: acme-app-main-5
      namespace: jx
      creationTimestamp: "2021-03-01T10:00:00Z"
      labels:
        podName: acme-app-main-5-abc
    spec:
      gitOwner: acme
      gitRepository: app
      gitBranch: main
      gitUrl: https://github.com/acme/app.git
      build: "5"
      version: 1.2.3
      releaseNotesURL: https://github.com/acme/app/releases/tag/v1.2.3
      context: release
      status: Running
      steps:
        - kind: Stage
          stage:
            name: from build pack
            status: Running
            steps:
              - name: Build Container
                status: Succeeded
                completedTimestamp: "2021-03-01T10:02:00Z"
              - name: Unit Test
                status: Running
              - name: Deploy
                status: Pending
        - kind: Promote
          promote:
            environment: staging
            pullRequest:
              name: "chore: promote app to 1.2.3"
              pullRequestURL: https://github.com/acme/env-staging/pull/42
  - apiVersion: jenkins.io/v1
    kind: PipelineActivity
    metadata:
      name: acme-app-pr-7-1
      namespace: jx
      creationTimestamp: "2021-03-01T08:00:00Z"
      labels:
        branch: PR-7
    spec:
      gitOwner: acme
      gitRepository: app
      gitBranch: PR-7
      build: "1"
      status: Succeeded
      steps:
        - kind: Stage
          stage:
            name: ci
            steps:
              - name: Build
                completedTimestamp: "2021-03-01T08:05:00Z"
        - kind: Preview
          preview:
            applicationURL: http://app-pr-7.preview.example.com
"#;

/// Pods matching the activities above
pub const PODS_YAML: &str = r#"
apiVersion: v1
kind: List
items:
  - metadata:
      name: acme-app-main-5-abc
      namespace: jx
    spec:
      containers:
        - name: step-build-container
        - name: step-unit-test
        - name: step-deploy
  - metadata:
      name: acme-app-pr-7-1-meta
      namespace: jx
      labels:
        branch: PR-7
        build: "1"
        owner: acme
        repository: app
        jenkins.io/pipelineType: meta
    spec:
      containers:
        - name: step-meta
  - metadata:
      name: acme-app-pr-7-1-build
      namespace: jx
      labels:
        branch: PR-7
        build: "1"
        owner: acme
        repository: app
        jenkins.io/pipelineType: build
    spec:
      nodeSelector:
        kubernetes.io/os: windows
      containers:
        - name: step-build
"#;

pub fn core_step(name: &str, done: bool) -> CoreActivityStep {
    CoreActivityStep {
        name: name.to_string(),
        completed_timestamp: done.then(|| Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).unwrap()),
        ..Default::default()
    }
}

pub fn stage(name: &str, steps: Vec<CoreActivityStep>) -> ActivityStep {
    ActivityStep::Stage(StageActivityStep {
        name: name.to_string(),
        steps,
        ..Default::default()
    })
}

/// An activity on `acme/app` branch `main`, build 5
pub fn build_activity(steps: Vec<ActivityStep>) -> Activity {
    Activity {
        metadata: ObjectMeta::new("acme-app-main-5", Some("jx".to_string())),
        spec: Some(ActivitySpec {
            git_owner: Some("acme".to_string()),
            git_repository: Some("app".to_string()),
            git_branch: Some("main".to_string()),
            build: Some("5".to_string()),
            steps,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// A pod carrying the build labels of [`build_activity`]
pub fn build_pod(name: &str, pipeline_type: &str, containers: &[&str]) -> Pod {
    let mut pod = Pod::new(name, "jx", containers);
    pod.metadata = pod
        .metadata
        .with_label("branch", "main")
        .with_label("build", "5")
        .with_label("owner", "acme")
        .with_label("repository", "app")
        .with_label("jenkins.io/pipelineType", pipeline_type);
    pod
}

pub fn activities() -> Vec<Activity> {
    pipeline_activity::core::config::parse_resources(ACTIVITIES_YAML).unwrap()
}

pub fn pods() -> Vec<Pod> {
    pipeline_activity::core::config::parse_resources(PODS_YAML).unwrap()
}

pub fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("pipeline-activity-{}", uuid::Uuid::new_v4()))
}

/// Executor that records every effect it is asked to run
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    effects: Arc<Mutex<Vec<Effect>>>,
    fail: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record effects but report every execution as failed
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().unwrap().clone()
    }
}

#[async_trait]
impl EffectExecutor for RecordingExecutor {
    async fn execute(&mut self, effect: Effect) -> Result<(), HostError> {
        self.effects.lock().unwrap().push(effect);
        if self.fail {
            return Err(HostError::Exit {
                program: "kubectl".to_string(),
                code: 1,
            });
        }
        Ok(())
    }
}
