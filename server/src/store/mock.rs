use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use futures::future::BoxFuture;

use crate::errors::BackendError;
use crate::store::Store;

/// An in-memory store with deterministic stored filenames.
pub(crate) struct MockStore {
    pub(crate) map: RwLock<HashMap<String, Vec<u8>>>,
    sequence: AtomicU64,
}

impl MockStore {
    pub fn new() -> Self {
        MockStore {
            map: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(171234),
        }
    }
}

impl Store for MockStore {
    fn save(
        &self,
        original_filename: &str,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<String, BackendError>> {
        use futures::FutureExt;

        let filename = format!(
            "{}-{}",
            self.sequence.fetch_add(1, Ordering::SeqCst),
            original_filename
        );

        mock_save(self, filename, raw).boxed()
    }
}

async fn mock_save(
    store: &MockStore,
    filename: String,
    raw: Vec<u8>,
) -> Result<String, BackendError> {
    store.map.write().unwrap().insert(filename.clone(), raw);

    Ok(filename)
}
