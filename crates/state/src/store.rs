//! In-memory, cache-first, write-through `StateStore` implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use ao_domain::collaborators::StateStore;
use ao_domain::error::{Error, Result};
use ao_domain::state::{AgentState, TraceId};
use ao_domain::trace::TraceEvent;

/// Caches `AgentState` by trace id and write-through-persists each save as
/// one JSON file per trace under `state_dir`.
pub struct InMemoryStateStore {
    state_dir: PathBuf,
    cache: RwLock<HashMap<TraceId, AgentState>>,
}

impl InMemoryStateStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir).map_err(Error::Io)?;
        Ok(Self {
            state_dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn path_for(&self, trace_id: &TraceId) -> PathBuf {
        self.state_dir.join(format!("{trace_id}.json"))
    }

    fn load_from_disk(path: &Path) -> Result<Option<AgentState>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(Error::Io)?;
        let state = serde_json::from_str(&raw).map_err(Error::Json)?;
        Ok(Some(state))
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self, trace_id: &TraceId) -> Result<Option<AgentState>> {
        if let Some(state) = self.cache.read().get(trace_id).cloned() {
            return Ok(Some(state));
        }

        let path = self.path_for(trace_id);
        match Self::load_from_disk(&path)? {
            Some(state) => {
                self.cache.write().insert(trace_id.clone(), state.clone());
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, trace_id: &TraceId, state: &AgentState) -> Result<()> {
        self.cache.write().insert(trace_id.clone(), state.clone());

        let json = serde_json::to_string_pretty(state).map_err(Error::Json)?;
        std::fs::write(self.path_for(trace_id), json).map_err(Error::Io)?;

        TraceEvent::StateCheckpointed {
            trace_id: trace_id.clone(),
            turn: state.turn_index,
            working_memory_entries: state.working_memory.len(),
        }
        .emit();
        Ok(())
    }

    async fn delete(&self, trace_id: &TraceId) -> Result<()> {
        self.cache.write().remove(trace_id);
        let path = self.path_for(trace_id);
        if path.exists() {
            std::fs::remove_file(path).map_err(Error::Io)?;
        }
        Ok(())
    }
}
