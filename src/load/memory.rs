//! In-process `spotify_albums` table, used for `--dry-run` and tests.

use std::collections::BTreeMap;

use crate::error::EtlError;
use crate::load::{AlbumRow, AlbumSink, LoadOutcome, TABLE_NAME};

#[derive(Debug, Default)]
pub struct MemorySink {
    table: Option<BTreeMap<String, AlbumRow>>,
    /// Size of every batch received, in call order.
    batches: Vec<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, album_id: &str) -> Option<&AlbumRow> {
        self.table.as_ref().and_then(|t| t.get(album_id))
    }

    pub fn len(&self) -> usize {
        self.table.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batches(&self) -> &[usize] {
        &self.batches
    }
}

impl AlbumSink for MemorySink {
    fn ensure_table(&mut self) -> Result<(), EtlError> {
        self.table.get_or_insert_with(BTreeMap::new);
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[AlbumRow]) -> Result<LoadOutcome, EtlError> {
        let table = self
            .table
            .as_mut()
            .ok_or_else(|| EtlError::Persistence(format!("relation \"{TABLE_NAME}\" does not exist")))?;
        self.batches.push(rows.len());

        let mut outcome = LoadOutcome::default();
        for row in rows {
            if table.contains_key(&row.album_id) {
                outcome.conflicts += 1;
            } else {
                table.insert(row.album_id.clone(), row.clone());
                outcome.inserted += 1;
            }
        }
        Ok(outcome)
    }
}
