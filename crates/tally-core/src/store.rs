//! Ledger store
//!
//! A single-writer in-memory ledger with an explicit JSON persistence
//! adapter. The whole document (three flat collections) lives behind one
//! mutex; every mutation rewrites the snapshot file through an atomic
//! temp-file rename, so readers of the file never observe a partial write.
//! Analytics stay pure functions over cloned snapshots.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Import, LedgerState, Transaction};

pub struct Ledger {
    path: PathBuf,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Open a ledger file, creating an empty document if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            let state = LedgerState::default();
            write_snapshot(&path, &state)?;
            info!(path = %path.display(), "Created empty ledger");
            state
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // A poisoned lock only means a panic elsewhere; the state itself is
        // always a structurally valid document, so recover it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clone of the whole in-memory document.
    pub fn snapshot(&self) -> LedgerState {
        self.lock().clone()
    }

    /// Clone of the transaction collection.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }

    /// Clone of the import metadata collection.
    pub fn imports(&self) -> Vec<Import> {
        self.lock().imports.clone()
    }

    /// Append one ingestion call's output in a single write-through commit.
    ///
    /// The in-memory state is only updated once the snapshot has reached
    /// disk; a failed save leaves both the file and the memory image at the
    /// previous commit.
    pub fn commit_import(
        &self,
        transactions: Vec<Transaction>,
        imports: Vec<Import>,
    ) -> Result<()> {
        let mut state = self.lock();

        let mut next = state.clone();
        next.transactions.extend(transactions);
        next.imports.extend(imports);

        write_snapshot(&self.path, &next)?;
        debug!(
            transactions = next.transactions.len(),
            imports = next.imports.len(),
            "Ledger snapshot persisted"
        );

        *state = next;
        Ok(())
    }
}

/// Serialize the document and swap it into place atomically.
fn write_snapshot(path: &Path, state: &LedgerState) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let data = serde_json::to_string_pretty(state)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(data.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| Error::Store(format!("failed to persist ledger snapshot: {}", e)))?;

    Ok(())
}
