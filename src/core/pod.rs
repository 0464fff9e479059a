//! Pod resource model (read-only)

use crate::core::meta::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node selector keys that carry the operating system of the node
const OS_SELECTOR_KEYS: [&str; 2] = ["kubernetes.io/os", "beta.kubernetes.io/os"];

/// A workload pod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<PodContainer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodContainer {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Reference to a pod by namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl Pod {
    /// Create a pod with the given containers
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, containers: &[&str]) -> Self {
        Self {
            metadata: ObjectMeta::new(name, Some(namespace.into())),
            spec: PodSpec {
                containers: containers
                    .iter()
                    .map(|c| PodContainer {
                        name: c.to_string(),
                        image: None,
                    })
                    .collect(),
                node_selector: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Namespace, `default` when unset
    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or("default")
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata.label(key)
    }

    /// Look up a container by exact name
    pub fn container(&self, name: &str) -> Option<&PodContainer> {
        self.spec.containers.iter().find(|c| c.name == name)
    }

    /// Operating system the pod is pinned to through its node selector
    pub fn selected_node_os(&self) -> Option<&str> {
        let selector = self.spec.node_selector.as_ref()?;
        OS_SELECTOR_KEYS
            .iter()
            .find_map(|key| selector.get(*key))
            .map(String::as_str)
    }

    /// Check whether every selector entry is present in the pod labels
    pub fn matches_labels(&self, selector: &BTreeMap<String, String>) -> bool {
        selector
            .iter()
            .all(|(key, value)| self.label(key) == Some(value.as_str()))
    }

    pub fn to_ref(&self) -> PodRef {
        PodRef {
            namespace: self.namespace().to_string(),
            name: self.name().to_string(),
        }
    }
}
