//! Locate the pod running an activity

use crate::core::config::Settings;
use crate::core::{Activity, Pod};
use crate::persistence::PodStore;
use std::collections::BTreeMap;
use tracing::debug;

/// Finds the workload pod of an activity
///
/// Newer pipelines label the activity with the pod name. Older ones are
/// correlated through build labels, which also match orchestration ("meta")
/// pods that have to be skipped.
pub struct PodResolver<'a> {
    pods: &'a dyn PodStore,
    settings: &'a Settings,
}

impl<'a> PodResolver<'a> {
    pub fn new(pods: &'a dyn PodStore, settings: &'a Settings) -> Self {
        Self { pods, settings }
    }

    /// Resolve the pod for an activity, first strategy that succeeds wins
    pub fn resolve(&self, activity: &Activity) -> Option<Pod> {
        let Some(labels) = activity.metadata.labels.as_ref() else {
            debug!("Activity {} has no labels, cannot locate its pod", activity.name());
            return None;
        };

        let namespace = activity
            .namespace()
            .unwrap_or(&self.settings.default_namespace);

        if let Some(pod_name) = labels
            .get(&self.settings.pod_name_label)
            .filter(|name| !name.is_empty())
        {
            let pod = self.pods.get_by_name(pod_name, namespace);
            if pod.is_none() {
                debug!("No pod {} in namespace {}", pod_name, namespace);
            }
            return pod;
        }

        let selector = build_selector(activity)?;
        let pod = self
            .pods
            .get_by_label(&selector)
            .into_iter()
            .find(|pod| !self.is_meta_pod(pod));
        if pod.is_none() {
            debug!(
                "No workload pod matches {:?} for activity {}",
                selector,
                activity.name()
            );
        }
        pod
    }

    /// Whether a pod only orchestrates the pipeline
    pub fn is_meta_pod(&self, pod: &Pod) -> bool {
        pod.label(&self.settings.pipeline_type_label) == Some(self.settings.meta_pipeline_type.as_str())
    }
}

/// Labels that identify the pods of an activity's build
///
/// Returns `None` when the activity has no spec or lacks one of the values,
/// since an absent value can never equal a pod label.
pub fn build_selector(activity: &Activity) -> Option<BTreeMap<String, String>> {
    let spec = activity.spec.as_ref()?;
    let entries = [
        ("branch", spec.git_branch.as_ref()),
        ("build", spec.build.as_ref()),
        ("owner", spec.git_owner.as_ref()),
        ("repository", spec.git_repository.as_ref()),
    ];

    let mut selector = BTreeMap::new();
    for (key, value) in entries {
        selector.insert(key.to_string(), value?.clone());
    }
    Some(selector)
}
