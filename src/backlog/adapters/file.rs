//! File-backed backlog store: `<root>/backlog/<id>.json`.

use crate::backlog::{
    domain::{Discovery, DiscoveryId},
    ports::{BacklogResult, BacklogStore, BacklogStoreError},
};
use crate::storage;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

const BACKLOG_DIR: &str = "backlog";

/// Backlog store persisting one JSON file per discovery.
#[derive(Debug, Clone)]
pub struct FileBacklogStore {
    root: Arc<Dir>,
}

impl FileBacklogStore {
    /// Opens (and creates, if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogStoreError::Persistence`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> BacklogResult<Self> {
        let dir = storage::open_root(root).map_err(BacklogStoreError::persistence)?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }

    fn record_path(id: &DiscoveryId) -> Utf8PathBuf {
        Utf8Path::new(BACKLOG_DIR).join(format!("{id}.json"))
    }
}

#[async_trait]
impl BacklogStore for FileBacklogStore {
    async fn get(&self, id: &DiscoveryId) -> BacklogResult<Discovery> {
        storage::read_json(&self.root, &Self::record_path(id)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                BacklogStoreError::NotFound(id.clone())
            } else {
                BacklogStoreError::persistence(err)
            }
        })
    }

    async fn save(&self, discovery: &Discovery) -> BacklogResult<()> {
        storage::write_json(&self.root, &Self::record_path(discovery.id()), discovery)
            .map_err(BacklogStoreError::persistence)
    }
}
