use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use forecast_core::StateValue;
use forecast_logging::{forecast_debug, forecast_info};
use serde::{Deserialize, Serialize};

use crate::persist::{replace_atomically, PersistError};

/// Produces the timestamp recorded with every write.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn utc_clock() -> Clock {
    Arc::new(|| Utc::now().to_rfc3339())
}

/// One state entry as the store keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub val: StateValue,
    /// Set for values written by this adapter; a consumer may clear it.
    pub ack: bool,
    pub ts: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read state file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("state file {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize states: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Key-value sink for published forecast values. Every write is acknowledged.
pub trait StateStore: Send {
    fn set_state(&mut self, id: &str, value: StateValue) -> Result<(), StoreError>;

    /// Make previous writes durable.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Keeps states in memory only.
pub struct MemoryStateStore {
    states: BTreeMap<String, StoredState>,
    clock: Clock,
}

impl MemoryStateStore {
    pub fn new(clock: Clock) -> Self {
        Self {
            states: BTreeMap::new(),
            clock,
        }
    }

    pub fn get(&self, id: &str) -> Option<&StoredState> {
        self.states.get(id)
    }

    pub fn states(&self) -> &BTreeMap<String, StoredState> {
        &self.states
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new(utc_clock())
    }
}

impl StateStore for MemoryStateStore {
    fn set_state(&mut self, id: &str, value: StateValue) -> Result<(), StoreError> {
        let ts = (self.clock)();
        self.states
            .insert(id.to_string(), StoredState { val: value, ack: true, ts });
        Ok(())
    }
}

/// States persisted as a JSON object keyed by state id.
///
/// Entries not touched by a run keep their previous value.
pub struct JsonStateStore {
    path: PathBuf,
    states: BTreeMap<String, StoredState>,
    clock: Clock,
    dirty: bool,
}

impl JsonStateStore {
    /// Load `path`; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>, clock: Clock) -> Result<Self, StoreError> {
        let path = path.into();
        let states = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                forecast_info!("No state file at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self {
            path,
            states,
            clock,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &str) -> Option<&StoredState> {
        self.states.get(id)
    }
}

impl StateStore for JsonStateStore {
    fn set_state(&mut self, id: &str, value: StateValue) -> Result<(), StoreError> {
        let ts = (self.clock)();
        self.states
            .insert(id.to_string(), StoredState { val: value, ack: true, ts });
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.states)?;
        replace_atomically(&self.path, json.as_bytes())?;
        self.dirty = false;
        forecast_debug!("Wrote {} states to {:?}", self.states.len(), self.path);
        Ok(())
    }
}
