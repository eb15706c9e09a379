use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::models::{SignalDetail, UpdateEvent};
use crate::source::SignalSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    List(Vec<SignalDetail>),
    Page { items: Vec<SignalDetail> },
}

/// Replays signal details loaded up front, e.g. an export of the detail
/// endpoint. Updates can be appended to mimic a growing event log.
#[derive(Debug, Default)]
pub struct SnapshotSource {
    order: Vec<String>,
    details: HashMap<String, SignalDetail>,
}

impl SnapshotSource {
    pub fn new(details: Vec<SignalDetail>) -> Self {
        let mut source = Self::default();
        for detail in details {
            source.insert(detail);
        }
        source
    }

    /// Accepts either a JSON array of details or a page `{ "items": [...] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: SnapshotFile =
            serde_json::from_str(json).context("Snapshot is neither a list nor a page of signals")?;
        let details = match file {
            SnapshotFile::List(items) | SnapshotFile::Page { items } => items,
        };
        Ok(Self::new(details))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, detail: SignalDetail) {
        let id = detail.id().to_string();
        if !self.details.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.details.insert(id, detail);
    }

    /// Append to a signal's log. Returns false for an unknown id.
    pub fn append_update(&mut self, signal_id: &str, update: UpdateEvent) -> bool {
        match self.details.get_mut(signal_id) {
            Some(detail) => {
                detail.updates.push(update);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, signal_id: &str) -> Option<SignalDetail> {
        self.details.get(signal_id).cloned()
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// All details in load order.
    pub fn all(&self) -> Vec<SignalDetail> {
        self.order
            .iter()
            .filter_map(|id| self.details.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[async_trait]
impl SignalSource for SnapshotSource {
    async fn fetch_detail(&mut self, signal_id: &str) -> Result<SignalDetail> {
        self.get(signal_id)
            .with_context(|| format!("Signal {} not in snapshot", signal_id))
    }
}
