//! YAML file-backed breakpoint store

use crate::core::config::parse_resources;
use crate::core::{Breakpoint, BreakpointSpec, ObjectMeta};
use crate::persistence::{insert_breakpoint, remove_breakpoint, BreakpointStore, StoreError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Breakpoint store persisted as a YAML list
pub struct FileBreakpointStore {
    path: PathBuf,
    breakpoints: Vec<Breakpoint>,
    loaded: bool,
}

impl FileBreakpointStore {
    /// Create a store for `path`; call [`load`](Self::load) before use
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            breakpoints: Vec::new(),
            loaded: false,
        }
    }

    /// Open the store at `path` and load its snapshot
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Read the snapshot; a missing file is an empty store
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.breakpoints = match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                parse_resources(&content).map_err(|e| StoreError::Parse(format!("{:#}", e)))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        self.loaded = true;
        debug!(
            "Loaded {} breakpoints from {}",
            self.breakpoints.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `breakpoints` as the new snapshot
    fn save(&self, breakpoints: &[Breakpoint]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let content = serde_yaml::to_string(breakpoints)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl BreakpointStore for FileBreakpointStore {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    fn create(&mut self, metadata: ObjectMeta, spec: BreakpointSpec) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded);
        }
        let mut next = self.breakpoints.clone();
        insert_breakpoint(&mut next, metadata, spec);
        self.save(&next)?;
        self.breakpoints = next;
        Ok(())
    }

    fn remove(&mut self, breakpoint: &Breakpoint) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded);
        }
        let mut next = self.breakpoints.clone();
        remove_breakpoint(&mut next, breakpoint)?;
        self.save(&next)?;
        self.breakpoints = next;
        Ok(())
    }
}
