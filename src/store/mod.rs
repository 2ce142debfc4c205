pub mod disk;
pub mod memory;

use crate::core::store::KeyValueCollection;
use disk::DiskCollection;
use memory::MemoryCollection;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

const PARTITION: &str = "app";

/// Opens the durable store under `data_path`.
///
/// Falls back to an in-memory collection when the disk store is not
/// available, so the session keeps working without persistence.
pub fn open_store(data_path: &Path) -> Arc<dyn KeyValueCollection> {
    let store_dir = data_path.join("store");
    match DiskCollection::open(&store_dir, PARTITION) {
        Ok(collection) => {
            debug!("Opened durable store at {}", store_dir.display());
            Arc::new(collection)
        }
        Err(e) => {
            warn!("Durable store unavailable, using memory store: {e:#}");
            Arc::new(MemoryCollection::new())
        }
    }
}
