use tracing::{debug, warn};

use crate::item::{FILE_PATCH_DESERIALIZER, FilePatchItem, ItemDeps};
use crate::pane::SerializedItem;

/// Entry point the host calls with locators and restored session records.
#[derive(Clone)]
pub struct FilePatchOpener {
    deps: ItemDeps,
}

impl FilePatchOpener {
    pub fn new(deps: ItemDeps) -> Self {
        Self { deps }
    }

    /// Returns `None` so the host can try its other openers.
    pub fn open(&self, uri: &str) -> Option<FilePatchItem> {
        let item = FilePatchItem::opener(uri, &self.deps);
        if item.is_none() {
            debug!("not a file patch locator: {uri}");
        }
        item
    }

    pub fn deserialize(&self, record: &SerializedItem) -> Option<FilePatchItem> {
        if record.deserializer != FILE_PATCH_DESERIALIZER {
            return None;
        }

        let item = FilePatchItem::opener(&record.uri, &self.deps);
        if item.is_none() {
            warn!("dropping unreadable file patch record {}", record.uri);
        }
        item
    }

    pub fn restore_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a SerializedItem>,
    ) -> Vec<FilePatchItem> {
        records
            .into_iter()
            .filter_map(|record| self.deserialize(record))
            .collect()
    }
}
