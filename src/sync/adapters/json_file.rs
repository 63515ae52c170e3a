//! JSON file mapping store.
//!
//! Persists the [`MappingRecord`] as a single pretty-printed JSON document
//! inside a capability-scoped directory. Writes go to a temporary file that
//! is renamed over the target, so a reader never observes a half-written
//! document.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Clock;
use std::io::ErrorKind;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::sync::{
    domain::MappingRecord,
    ports::{MappingStore, MappingStoreResult},
};

/// Durable mapping store backed by a JSON document on disk.
#[derive(Debug)]
pub struct JsonFileMappingStore<C> {
    dir: Dir,
    file_name: String,
    clock: Arc<C>,
}

impl<C> JsonFileMappingStore<C>
where
    C: Clock + Send + Sync,
{
    /// Opens (creating if necessary) the directory that holds the mapping
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(
        directory: &Utf8Path,
        file_name: impl Into<String>,
        clock: Arc<C>,
    ) -> std::io::Result<Self> {
        Dir::create_ambient_dir_all(directory, ambient_authority())?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority())?;
        Ok(Self {
            dir,
            file_name: file_name.into(),
            clock,
        })
    }

    fn temp_file_name(&self) -> String {
        format!("{}.tmp", self.file_name)
    }
}

#[async_trait]
impl<C> MappingStore for JsonFileMappingStore<C>
where
    C: Clock + Send + Sync,
{
    async fn load(&self) -> MappingRecord {
        let text = match self.dir.read_to_string(&self.file_name) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(file = %self.file_name, "no mapping document, starting empty");
                return MappingRecord::new();
            }
            Err(err) => {
                error!(file = %self.file_name, error = %err, "failed to read mapping document");
                return MappingRecord::new();
            }
        };

        match serde_json::from_str::<MappingRecord>(&text) {
            Ok(record) => {
                info!(mappings = record.len(), "loaded mapping document");
                record
            }
            Err(err) => {
                error!(file = %self.file_name, error = %err, "failed to parse mapping document");
                MappingRecord::new()
            }
        }
    }

    async fn persist(&self, record: &mut MappingRecord) -> MappingStoreResult<()> {
        let mut stamped = record.clone();
        stamped.mark_persisted(self.clock.utc());
        let body = serde_json::to_string_pretty(&stamped)?;

        let temp_name = self.temp_file_name();
        self.dir.write(&temp_name, body.as_bytes())?;
        self.dir
            .rename(&temp_name, &self.dir, self.file_name.as_str())?;

        // The metadata stamp becomes visible to the caller only once the
        // rename has committed the document.
        *record = stamped;
        info!(sync_count = record.sync_count(), "persisted mapping document");
        Ok(())
    }
}
