use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{ForgeError, ForgeResult},
    generate::{model::Signature, quota::Quota},
};

/// File name of the progress file inside the output directory.
pub const STATE_FILE_NAME: &str = "generation_state.json";

/// Persisted generation progress.
///
/// Serialized as `{"lastId": <int>, "usedCombinations": [<signature>...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationState {
    /// Highest identity handed out so far (0 when nothing has been produced).
    pub last_id: u64,
    /// Signatures of every accepted normal/rare combination.
    #[serde(rename = "usedCombinations")]
    pub used: BTreeSet<Signature>,
}

impl GenerationState {
    /// Record an accepted item. Secret rares pass `None`: they never enter the signature set.
    pub fn record(&mut self, id: u64, signature: Option<Signature>) {
        self.last_id = self.last_id.max(id);
        if let Some(sig) = signature {
            self.used.insert(sig);
        }
    }

    /// Items already produced, per kind.
    ///
    /// Secret rares are emitted last and are the only items without a signature, so they
    /// account for the identities not covered by `used`.
    pub fn progress(&self) -> Quota {
        let rare = self.used.iter().filter(|s| s.is_rare()).count() as u64;
        let signed = self.used.len() as u64;
        Quota {
            normal: signed - rare,
            rare,
            secret_rare: self.last_id.saturating_sub(signed),
        }
    }
}

/// JSON-file backed progress store. Single writer, synchronous.
#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional location inside `output_dir`.
    pub fn in_dir(output_dir: impl AsRef<Path>) -> Self {
        Self::new(output_dir.as_ref().join(STATE_FILE_NAME))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read prior progress. A missing, unreadable or corrupt file means "start fresh".
    pub fn load(&self) -> Option<GenerationState> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cannot read state file, starting fresh");
                return None;
            }
        };
        match serde_json::from_slice::<GenerationState>(&bytes) {
            Ok(state) => {
                tracing::info!(last_id = state.last_id, used = state.used.len(), "found previous state");
                Some(state)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt state file, starting fresh");
                None
            }
        }
    }

    /// Persist `state`, replacing the previous file.
    pub fn save(&self, state: &GenerationState) -> ForgeResult<()> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| ForgeError::serde(format!("encode generation state: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ForgeError::state_write(format!("create '{}': {e}", parent.display()))
            })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .map_err(|e| ForgeError::state_write(format!("write '{}': {e}", tmp.display())))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            ForgeError::state_write(format!("replace '{}': {e}", self.path.display()))
        })
    }
}

/// How often progress is flushed to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckpointPolicy {
    /// After every finished item; an interruption loses at most one item.
    #[default]
    EveryItem,
    /// After every `n` finished items.
    Batched(u32),
}

/// Applies a [`CheckpointPolicy`] on top of a [`StateStore`].
///
/// Write failures are logged and counted, never fatal.
#[derive(Debug)]
pub struct Checkpointer {
    store: StateStore,
    policy: CheckpointPolicy,
    pending: u32,
    failures: u32,
}

impl Checkpointer {
    /// Wrap `store` with `policy`.
    pub fn new(store: StateStore, policy: CheckpointPolicy) -> Self {
        Self {
            store,
            policy,
            pending: 0,
            failures: 0,
        }
    }

    /// Note one finished item and save if the policy says so.
    pub fn item_done(&mut self, state: &GenerationState) {
        self.pending += 1;
        let due = match self.policy {
            CheckpointPolicy::EveryItem => true,
            CheckpointPolicy::Batched(n) => self.pending >= n.max(1),
        };
        if due {
            self.flush(state);
        }
    }

    /// Save unconditionally if anything is pending.
    pub fn finish(&mut self, state: &GenerationState) {
        if self.pending > 0 {
            self.flush(state);
        }
    }

    /// Number of saves that failed so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn flush(&mut self, state: &GenerationState) {
        match self.store.save(state) {
            Ok(()) => self.pending = 0,
            Err(e) => {
                self.failures += 1;
                tracing::error!(error = %e, last_id = state.last_id, "failed to save generation state");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/store.rs"]
mod tests;
