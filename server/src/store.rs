use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use tokio::fs;

use crate::errors::BackendError;

#[cfg(test)]
pub(crate) mod mock;

pub trait Store: Send + Sync {
    /// Saves the given raw content under a collision-resistant name derived
    /// from the client-supplied filename, returning the stored filename.
    fn save(
        &self,
        original_filename: &str,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<String, BackendError>>;
}

/// A store that saves uploaded images to a local directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Creates a new instance rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        use crate::config::get_variable;

        DiskStore::new(get_variable("CATALOG_UPLOADS_DIR"))
    }
}

impl Store for DiskStore {
    fn save(
        &self,
        original_filename: &str,
        raw: Vec<u8>,
    ) -> BoxFuture<Result<String, BackendError>> {
        save(self, stored_filename(original_filename), raw).boxed()
    }
}

/// Builds the stored filename: the arrival timestamp in milliseconds
/// followed by the client's filename, any path components stripped.
fn stored_filename(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;

    format!("{}-{}", millis, base)
}

async fn save(store: &DiskStore, filename: String, raw: Vec<u8>) -> Result<String, BackendError> {
    fs::create_dir_all(&store.root)
        .await
        .map_err(|source| BackendError::ImageSaveFailed { source })?;
    fs::write(store.root.join(&filename), &raw)
        .await
        .map_err(|source| BackendError::ImageSaveFailed { source })?;

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::{stored_filename, DiskStore, Store};

    #[test]
    fn stored_filenames_keep_the_original_name() {
        let name = stored_filename("pie.jpg");

        assert!(name.ends_with("-pie.jpg"), "unexpected name {:?}", name);
    }

    #[test]
    fn stored_filenames_strip_path_components() {
        let name = stored_filename("../nested/pie.jpg");

        assert!(name.ends_with("-pie.jpg"), "unexpected name {:?}", name);
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[tokio::test]
    async fn saving_writes_the_file() {
        let dir = tempfile::tempdir().expect("create temporary directory");
        let store = DiskStore::new(dir.path());

        let stored = store
            .save("pie.jpg", b"not really a jpeg".to_vec())
            .await
            .expect("save image");

        let content = std::fs::read(dir.path().join(&stored)).expect("read stored file");
        assert_eq!(content, b"not really a jpeg");
    }

    #[tokio::test]
    async fn saving_creates_the_directory() {
        let dir = tempfile::tempdir().expect("create temporary directory");
        let store = DiskStore::new(dir.path().join("uploads"));

        let stored = store
            .save("pie.jpg", b"content".to_vec())
            .await
            .expect("save image");

        assert!(dir.path().join("uploads").join(&stored).exists());
    }
}
