//! Filesystem-backed storage for receipt images.
//!
//! Receipts live in a single bucket directory under the store root. Objects
//! are keyed by the MD5 digest of their content, so re-uploading the same
//! image is a no-op, and the files are served over HTTP from the bucket
//! directory by the router.

use std::{fs, path::PathBuf};

use crate::{Error, endpoints};

/// The name of the bucket that holds receipt images.
pub const RECEIPT_BUCKET: &str = "transaction-receipts";

/// The maximum accepted receipt size in bytes (3 MB).
const MAX_OBJECT_BYTES: usize = 3_000_000;

/// Accepted receipt content types and the file extension stored for each.
const ALLOWED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// Stores receipt images on the local filesystem.
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    root: PathBuf,
}

impl ReceiptStore {
    /// Create a receipt store rooted at `root`.
    ///
    /// The bucket directory is not created until [ReceiptStore::ensure_bucket]
    /// is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The path of the bucket directory that holds the receipt objects.
    pub fn bucket_path(&self) -> PathBuf {
        self.root.join(RECEIPT_BUCKET)
    }

    /// Whether the receipt bucket exists.
    pub fn bucket_exists(&self) -> bool {
        self.bucket_path().is_dir()
    }

    /// Create the receipt bucket if it does not already exist.
    ///
    /// An existing bucket is success, not an error, so this is safe to call
    /// on every startup.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the directory cannot be created.
    pub fn ensure_bucket(&self) -> Result<(), Error> {
        if self.bucket_exists() {
            tracing::debug!("Bucket '{RECEIPT_BUCKET}' already exists");
            return Ok(());
        }

        fs::create_dir_all(self.bucket_path()).map_err(|error| {
            Error::StorageError(format!("could not create bucket '{RECEIPT_BUCKET}': {error}"))
        })?;

        tracing::info!("Created bucket '{RECEIPT_BUCKET}'");

        Ok(())
    }

    /// Store a receipt image and return the URL it will be served from.
    ///
    /// The object key is the MD5 hex digest of the content, so storing the
    /// same bytes twice returns the same URL without rewriting the file.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UnsupportedReceiptType] if `content_type` is not an accepted image type,
    /// - [Error::ReceiptTooLarge] if `bytes` exceeds the size limit,
    /// - or [Error::StorageError] if the object cannot be written.
    pub fn put_object(&self, content_type: &str, bytes: &[u8]) -> Result<String, Error> {
        let (_, extension) = ALLOWED_IMAGE_TYPES
            .iter()
            .find(|(allowed_type, _)| *allowed_type == content_type)
            .ok_or_else(|| Error::UnsupportedReceiptType(content_type.to_owned()))?;

        if bytes.len() > MAX_OBJECT_BYTES {
            return Err(Error::ReceiptTooLarge(bytes.len()));
        }

        self.ensure_bucket()?;

        let key = format!("{:x}.{extension}", md5::compute(bytes));
        let object_path = self.bucket_path().join(&key);

        if !object_path.exists() {
            fs::write(&object_path, bytes).map_err(|error| {
                Error::StorageError(format!("could not write object '{key}': {error}"))
            })?;
        }

        Ok(format!("{}/{key}", endpoints::RECEIPTS))
    }

    /// Delete the object behind a receipt URL.
    ///
    /// A URL whose backing file is already gone is not an error, so callers
    /// can delete transactions without checking the receipt first.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if `url` does not point into the bucket
    /// or the file cannot be removed.
    pub fn delete_object(&self, url: &str) -> Result<(), Error> {
        let key = url
            .strip_prefix(&format!("{}/", endpoints::RECEIPTS))
            .filter(|key| !key.contains('/') && !key.contains(".."))
            .ok_or_else(|| {
                Error::StorageError(format!("'{url}' is not a receipt URL in the bucket"))
            })?;

        let object_path = self.bucket_path().join(key);

        if !object_path.exists() {
            tracing::debug!("Receipt object '{key}' already deleted");
            return Ok(());
        }

        fs::remove_file(&object_path).map_err(|error| {
            Error::StorageError(format!("could not delete object '{key}': {error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{MAX_OBJECT_BYTES, RECEIPT_BUCKET, ReceiptStore};

    fn get_test_store() -> (tempfile::TempDir, ReceiptStore) {
        let dir = tempfile::tempdir().expect("Could not create temporary directory");
        let store = ReceiptStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn ensure_bucket_creates_directory() {
        let (_dir, store) = get_test_store();
        assert!(!store.bucket_exists());

        store.ensure_bucket().expect("Could not create bucket");

        assert!(store.bucket_exists());
        assert!(store.bucket_path().ends_with(RECEIPT_BUCKET));
    }

    #[test]
    fn ensure_bucket_is_idempotent() {
        let (_dir, store) = get_test_store();

        store.ensure_bucket().expect("Could not create bucket");
        store
            .ensure_bucket()
            .expect("An existing bucket should be treated as success");
    }

    #[test]
    fn put_object_stores_bytes_and_returns_url() {
        let (_dir, store) = get_test_store();
        let bytes = b"fake jpeg bytes";

        let url = store
            .put_object("image/jpeg", bytes)
            .expect("Could not store object");

        assert!(url.starts_with("/receipts/"));
        assert!(url.ends_with(".jpg"));

        let key = url.strip_prefix("/receipts/").unwrap();
        let stored = std::fs::read(store.bucket_path().join(key)).unwrap();
        assert_eq!(stored, bytes);
    }

    #[test]
    fn put_object_is_idempotent_for_identical_content() {
        let (_dir, store) = get_test_store();
        let bytes = b"fake png bytes";

        let first_url = store.put_object("image/png", bytes).unwrap();
        let second_url = store.put_object("image/png", bytes).unwrap();

        assert_eq!(first_url, second_url);
    }

    #[test]
    fn put_object_rejects_unsupported_content_type() {
        let (_dir, store) = get_test_store();

        let result = store.put_object("application/pdf", b"%PDF-1.4");

        assert_eq!(
            result,
            Err(Error::UnsupportedReceiptType("application/pdf".to_owned()))
        );
    }

    #[test]
    fn put_object_rejects_oversized_objects() {
        let (_dir, store) = get_test_store();
        let bytes = vec![0u8; MAX_OBJECT_BYTES + 1];

        let result = store.put_object("image/jpeg", &bytes);

        assert_eq!(result, Err(Error::ReceiptTooLarge(bytes.len())));
    }

    #[test]
    fn delete_object_removes_file() {
        let (_dir, store) = get_test_store();
        let url = store.put_object("image/webp", b"webp bytes").unwrap();

        store.delete_object(&url).expect("Could not delete object");

        let key = url.strip_prefix("/receipts/").unwrap();
        assert!(!store.bucket_path().join(key).exists());
    }

    #[test]
    fn delete_object_tolerates_missing_file() {
        let (_dir, store) = get_test_store();
        store.ensure_bucket().unwrap();

        store
            .delete_object("/receipts/0123456789abcdef.jpg")
            .expect("A missing object should not be an error");
    }

    #[test]
    fn delete_object_rejects_urls_outside_the_bucket() {
        let (_dir, store) = get_test_store();

        let result = store.delete_object("/etc/passwd");

        assert!(matches!(result, Err(Error::StorageError(_))));
    }
}
