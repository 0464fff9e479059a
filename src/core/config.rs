//! Settings and resource loading from YAML/JSON

use crate::core::breakpoint::ON_FAILURE;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Tunables for resolving pods and creating breakpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Namespace used when an activity does not carry one
    pub default_namespace: String,

    /// Activity label holding the name of the pod running the pipeline
    pub pod_name_label: String,

    /// Pod label marking the type of pipeline pod
    pub pipeline_type_label: String,

    /// Value of `pipeline_type_label` on orchestration pods
    pub meta_pipeline_type: String,

    /// Triggers set on newly created breakpoints
    pub breakpoint_triggers: Vec<String>,

    /// kubectl executable used for logs and shells
    pub kubectl: String,

    /// Where breakpoints are kept; defaults to the user data directory
    pub breakpoint_store: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_namespace: "jx".to_string(),
            pod_name_label: "podName".to_string(),
            pipeline_type_label: "jenkins.io/pipelineType".to_string(),
            meta_pipeline_type: "meta".to_string(),
            breakpoint_triggers: vec![ON_FAILURE.to_string()],
            kubectl: "kubectl".to_string(),
            breakpoint_store: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` when given, else use the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.default_namespace.trim().is_empty() {
            anyhow::bail!("default_namespace must not be empty");
        }
        if self.pod_name_label.trim().is_empty() {
            anyhow::bail!("pod_name_label must not be empty");
        }
        if self.pipeline_type_label.trim().is_empty() {
            anyhow::bail!("pipeline_type_label must not be empty");
        }
        if self.breakpoint_triggers.iter().any(|t| t.trim().is_empty()) {
            anyhow::bail!("breakpoint_triggers must not contain empty entries");
        }
        Ok(())
    }

    /// Resolved path of the breakpoint store file
    pub fn breakpoint_store_path(&self) -> PathBuf {
        self.breakpoint_store.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pipeline-activity")
                .join("breakpoints.yaml")
        })
    }
}

/// Parse resources exported by `kubectl get -o yaml|json`
///
/// Accepts a single object or a `List` with `items`. JSON parses as YAML.
pub fn parse_resources<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    let value: Value = serde_yaml::from_str(content).context("Invalid YAML/JSON document")?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(ref map) if map.contains_key("items") => {
            let items = map.get("items").cloned().unwrap_or(Value::Null);
            if items.is_null() {
                return Ok(Vec::new());
            }
            serde_yaml::from_value(items).context("Invalid resource list")
        }
        seq @ Value::Sequence(_) => serde_yaml::from_value(seq).context("Invalid resource list"),
        other => Ok(vec![serde_yaml::from_value(other).context("Invalid resource")?]),
    }
}

/// Load resources from a YAML or JSON file
pub fn load_resources<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_resources(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
