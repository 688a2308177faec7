//! Upload directory access
//!
//! [`UploadStore`] owns every filesystem operation on the upload directory:
//! saving new files under sanitized, collision-free names, listing what has
//! been uploaded, resolving client-supplied names to paths, and deleting.
//! Client names never reach the filesystem unchecked.

use filefeed_common::checksum::sha256_bytes;
use filefeed_common::files::{sanitize_file_name, unique_path};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A file stored by [`UploadStore::save`]
#[derive(Debug, Clone)]
pub struct SavedUpload {
    /// Name the file was stored under (after sanitization and de-collision)
    pub file_name: String,
    /// Full path inside the upload directory
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the contents
    pub checksum: String,
}

/// Handle on the upload directory
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    allowed_extensions: Arc<Vec<String>>,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        let allowed_extensions = allowed_extensions
            .into_iter()
            .map(|ext| ext.to_lowercase())
            .collect();
        Self {
            dir: dir.into(),
            allowed_extensions: Arc::new(allowed_extensions),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// The allowed extensions, uppercased for user-facing messages
    /// (e.g. `"TXT CSV JSON"`)
    pub fn allowed_extensions_upper(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether `file_name` carries an extension this store accepts
    pub fn extension_allowed(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.allowed_extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Resolve a client-supplied name to a path inside the directory.
    ///
    /// Names containing separators or `..` segments cannot name an upload
    /// and resolve to `None`.
    pub fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name == "."
            || file_name == ".."
        {
            return None;
        }
        Some(self.dir.join(file_name))
    }

    /// Store `content` under a cleaned-up version of `submitted_name`,
    /// renaming with an `_N` suffix when the name is already taken.
    pub async fn save(&self, submitted_name: &str, content: &[u8]) -> io::Result<SavedUpload> {
        let clean = sanitize_file_name(submitted_name);
        let path = unique_path(&self.dir, &clean);
        tokio::fs::write(&path, content).await?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(clean);

        debug!(file = %file_name, size = content.len(), "upload stored");

        Ok(SavedUpload {
            file_name,
            size: content.len() as u64,
            checksum: sha256_bytes(content),
            path,
        })
    }

    /// List uploaded file names, sorted case-insensitively. Subdirectories
    /// and dotfiles (`.gitignore` and friends) are ignored.
    pub async fn list(&self) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            files.push(name);
        }

        files.sort_by_key(|name| name.to_lowercase());
        Ok(files)
    }

    /// Delete an uploaded file; `Ok(false)` when it was not there
    pub async fn remove(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> UploadStore {
        UploadStore::new(
            dir.path(),
            vec!["txt".to_string(), "csv".to_string(), "json".to_string()],
        )
    }

    #[test]
    fn test_extension_allowed() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.extension_allowed("a.txt"));
        assert!(store.extension_allowed("a.CSV"));
        assert!(!store.extension_allowed("a.exe"));
        assert!(!store.extension_allowed("no_extension"));
    }

    #[test]
    fn test_allowed_extensions_upper() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).allowed_extensions_upper(), "TXT CSV JSON");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.resolve("fine.txt").is_some());
        assert!(store.resolve("").is_none());
        assert!(store.resolve("..").is_none());
        assert!(store.resolve("../fine.txt").is_none());
        assert!(store.resolve("a/b.txt").is_none());
        assert!(store.resolve("a\\b.txt").is_none());
    }

    #[tokio::test]
    async fn test_save_sanitizes_and_decollides() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let first = store.save("my notes.txt", b"one").await.unwrap();
        assert_eq!(first.file_name, "my-notes.txt");
        assert_eq!(first.size, 3);

        let second = store.save("my notes.txt", b"two").await.unwrap();
        assert_eq!(second.file_name, "my-notes_1.txt");

        assert_eq!(std::fs::read(&first.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&second.path).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_list_sorts_and_skips_dotfiles() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("A.csv"), b"x").unwrap();
        std::fs::write(dir.path().join(".gitignore"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        assert_eq!(store.list().await.unwrap(), vec!["A.csv", "b.txt"]);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"x").unwrap();

        assert!(store.remove(&path).await.unwrap());
        assert!(!store.remove(&path).await.unwrap());
    }
}
