//! Stores for the resources an activity is reconciled against
//!
//! Stores hold a snapshot of the cluster state; lookups only see what was
//! loaded when they run.

pub mod store;

pub use store::FileBreakpointStore;

use crate::core::{Breakpoint, BreakpointFilter, BreakpointSpec, ObjectMeta, Pod};
use crate::resolve::breakpoints::find_breakpoint;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for store mutations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("Invalid breakpoint store contents: {0}")]
    Parse(String),

    #[error("Breakpoint {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("Breakpoint store is not loaded")]
    NotLoaded,
}

/// Read access to the pods of the cluster
pub trait PodStore {
    /// Look up a pod by name within a namespace
    fn get_by_name(&self, name: &str, namespace: &str) -> Option<Pod>;

    /// All pods whose labels contain every entry of `selector`
    fn get_by_label(&self, selector: &BTreeMap<String, String>) -> Vec<Pod>;
}

/// The breakpoints known to the cluster
pub trait BreakpointStore {
    /// Whether the snapshot has been loaded yet
    fn is_loaded(&self) -> bool;

    /// Current snapshot
    fn breakpoints(&self) -> &[Breakpoint];

    /// The first breakpoint whose filter equals `filter`
    fn get_breakpoint_for_activity(&self, filter: &BreakpointFilter) -> Option<Breakpoint> {
        find_breakpoint(self.breakpoints(), filter).cloned()
    }

    /// Create a breakpoint
    fn create(&mut self, metadata: ObjectMeta, spec: BreakpointSpec) -> Result<(), StoreError>;

    /// Remove a breakpoint, matched by namespace and name
    fn remove(&mut self, breakpoint: &Breakpoint) -> Result<(), StoreError>;
}

/// In-memory pod store (for testing or resources loaded from files)
#[derive(Debug, Clone, Default)]
pub struct InMemoryPodStore {
    pods: Vec<Pod>,
}

impl InMemoryPodStore {
    pub fn new(pods: Vec<Pod>) -> Self {
        Self { pods }
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }
}

impl PodStore for InMemoryPodStore {
    fn get_by_name(&self, name: &str, namespace: &str) -> Option<Pod> {
        self.pods
            .iter()
            .find(|pod| pod.name() == name && pod.namespace() == namespace)
            .cloned()
    }

    fn get_by_label(&self, selector: &BTreeMap<String, String>) -> Vec<Pod> {
        self.pods
            .iter()
            .filter(|pod| pod.matches_labels(selector))
            .cloned()
            .collect()
    }
}

/// In-memory breakpoint store
#[derive(Debug, Clone, Default)]
pub struct InMemoryBreakpointStore {
    breakpoints: Vec<Breakpoint>,
    loaded: bool,
}

impl InMemoryBreakpointStore {
    /// A loaded store holding `breakpoints`
    pub fn new(breakpoints: Vec<Breakpoint>) -> Self {
        Self {
            breakpoints,
            loaded: true,
        }
    }

    /// A store whose snapshot has not arrived yet
    pub fn unloaded() -> Self {
        Self::default()
    }
}

impl BreakpointStore for InMemoryBreakpointStore {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn create(&mut self, metadata: ObjectMeta, spec: BreakpointSpec) -> Result<(), StoreError> {
        insert_breakpoint(&mut self.breakpoints, metadata, spec);
        Ok(())
    }

    fn remove(&mut self, breakpoint: &Breakpoint) -> Result<(), StoreError> {
        remove_breakpoint(&mut self.breakpoints, breakpoint)
    }
}

/// Insert a breakpoint, replacing one with the same namespace and name
pub(crate) fn insert_breakpoint(
    breakpoints: &mut Vec<Breakpoint>,
    metadata: ObjectMeta,
    spec: BreakpointSpec,
) {
    breakpoints.retain(|bp| !same_object(&bp.metadata, &metadata));
    breakpoints.push(Breakpoint {
        api_version: Some("lighthouse.jenkins.io/v1alpha1".to_string()),
        kind: Some("LighthouseBreakpoint".to_string()),
        metadata,
        spec,
    });
}

pub(crate) fn remove_breakpoint(
    breakpoints: &mut Vec<Breakpoint>,
    breakpoint: &Breakpoint,
) -> Result<(), StoreError> {
    let before = breakpoints.len();
    breakpoints.retain(|bp| !same_object(&bp.metadata, &breakpoint.metadata));
    if breakpoints.len() == before {
        return Err(StoreError::NotFound {
            namespace: breakpoint.metadata.namespace.clone().unwrap_or_default(),
            name: breakpoint.metadata.name.clone(),
        });
    }
    Ok(())
}

fn same_object(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    a.name == b.name && a.namespace == b.namespace
}
