use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use ulid::Ulid;

use crate::state::{ensure_private_directory, map_io_error};
use crate::{ClientError, ClientResult};

const FILE_URL_PREFIX: &str = "file://";
const MAX_STORED_NAME_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub url: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Uploaded files kept under the board's `objects/` directory and addressed
/// by `file://` URLs.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn upload(&self, source: &Path, display_name: &str) -> ClientResult<StoredObject> {
        let bytes = fs::read(source).map_err(|error| {
            ClientError::invalid_argument_with_recovery(
                &format!("Could not read file `{}`: {error}", source.display()),
                vec!["Verify the path exists and is readable.".to_string()],
            )
        })?;

        ensure_private_directory(&self.root)?;
        let stored_name = format!("{}_{}", Ulid::new(), sanitize_file_name(display_name));
        let path = self.root.join(stored_name);
        fs::write(&path, &bytes).map_err(|error| map_io_error(&path, &error))?;

        let url = format!("{FILE_URL_PREFIX}{}", path.display());
        info!(url = %url, size_bytes = bytes.len(), "object stored");
        Ok(StoredObject {
            url,
            path,
            size_bytes: bytes.len() as u64,
        })
    }

    pub fn fetch_text(&self, url: &str) -> ClientResult<String> {
        let path = self.resolve_url(url)?;
        let bytes = fs::read(&path)
            .map_err(|error| ClientError::object_unavailable(url, &error.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|_| ClientError::object_unavailable(url, "content is not valid UTF-8"))
    }

    /// Deletes the object behind `url`. Returns `false` when nothing was
    /// removed; failures here never fail the caller.
    pub fn remove(&self, url: &str) -> bool {
        let path = match self.resolve_url(url) {
            Ok(path) => path,
            Err(error) => {
                warn!(url, error = %error, "object not removed");
                return false;
            }
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(url, "object removed");
                true
            }
            Err(error) => {
                warn!(url, error = %error, "object not removed");
                false
            }
        }
    }

    fn resolve_url(&self, url: &str) -> ClientResult<PathBuf> {
        let Some(raw_path) = url.strip_prefix(FILE_URL_PREFIX) else {
            return Err(ClientError::object_unavailable(
                url,
                "only file:// URLs are supported",
            ));
        };

        let path = PathBuf::from(raw_path);
        let inside_root = path.parent() == Some(self.root.as_path());
        if !inside_root {
            return Err(ClientError::object_unavailable(
                url,
                "the object is outside the board storage directory",
            ));
        }
        Ok(path)
    }
}

fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or(name);

    let sanitized = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .take(MAX_STORED_NAME_LEN)
        .collect::<String>();

    if sanitized.trim_matches('.').is_empty() {
        return "upload".to_string();
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{ObjectStore, sanitize_file_name};

    #[test]
    fn file_names_are_flattened_and_sanitized() {
        assert_eq!(sanitize_file_name("report.csv"), "report.csv");
        assert_eq!(sanitize_file_name("March sales (v2).csv"), "March_sales__v2_.csv");
        assert_eq!(sanitize_file_name("/tmp/nested/report.csv"), "report.csv");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn upload_fetch_and_remove_round_trip() {
        let dir = tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let source = dir.path().join("source.csv");
        assert!(fs::write(&source, "Transaction Type\npurchase\n").is_ok());

        let store = ObjectStore::new(&dir.path().join("objects"));
        let stored = store.upload(&source, "source.csv");
        assert!(stored.is_ok());
        let Ok(stored) = stored else { return };
        assert!(stored.url.starts_with("file://"));
        assert!(stored.url.ends_with("_source.csv"));
        assert_eq!(stored.size_bytes, 26);

        let text = store.fetch_text(&stored.url);
        assert!(text.is_ok());
        if let Ok(text) = text {
            assert!(text.starts_with("Transaction Type"));
        }

        assert!(store.remove(&stored.url));
        assert!(!store.remove(&stored.url));

        let missing = store.fetch_text(&stored.url);
        assert!(missing.is_err());
        if let Err(error) = missing {
            assert_eq!(error.code, "object_unavailable");
        }
    }

    #[test]
    fn foreign_urls_are_rejected() {
        let dir = tempdir();
        assert!(dir.is_ok());
        let Ok(dir) = dir else { return };
        let store = ObjectStore::new(&dir.path().join("objects"));

        for url in ["https://example.com/report.csv", "file:///etc/hosts"] {
            let result = store.fetch_text(url);
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "object_unavailable");
            }
        }
        assert!(!store.remove("file:///etc/hosts"));
    }
}
