use relative_path::{RelativePath, RelativePathBuf};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key the document is persisted under
pub const STORAGE_KEY: &str = "markdownContent";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Invalid storage directory: {0}")]
    InvalidStorageDir(String),
}

/// Key-value string store the editor persists through
pub trait Storage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.md` file per key under a root directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn relative_path(key: &str) -> Result<RelativePathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(RelativePathBuf::from(format!("{key}.md")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let relative_path = Self::relative_path(key)?;
        match read_file(&relative_path, &self.root) {
            Ok(content) => Ok(Some(content)),
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let relative_path = Self::relative_path(key)?;
        write_file(&relative_path, &self.root, value)
    }
}

/// In-process store, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The document's single persisted value.
///
/// Saving is fire-and-forget: failures are logged and otherwise ignored, and
/// the last write wins. A bridge whose stored value could not be read is
/// switched to read-only so the unreadable value is never overwritten.
#[derive(Debug)]
pub struct PersistenceBridge<S> {
    storage: S,
    saving: bool,
}

impl<S: Storage> PersistenceBridge<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            saving: true,
        }
    }

    /// The stored document; `Ok(None)` only when nothing is stored
    pub fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage.load(STORAGE_KEY)
    }

    /// The stored document, or the welcome document when nothing is stored
    pub fn load_or_default(&self) -> Result<String, StorageError> {
        Ok(self.load()?.unwrap_or_else(default_markdown))
    }

    pub fn save(&mut self, document: &str) {
        if !self.saving {
            log::debug!("Saving disabled, dropping {} bytes", document.len());
            return;
        }
        if let Err(e) = self.storage.save(STORAGE_KEY, document) {
            log::warn!("Failed to save document: {e}");
        }
    }

    /// Stop writing to storage for the rest of the session
    pub fn disable_saving(&mut self) {
        self.saving = false;
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Read a markdown file and return its content
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, StorageError> {
    let absolute_path = relative_path.to_path(root);
    fs::read_to_string(&absolute_path).map_err(StorageError::Io)
}

/// Write content to a markdown file
pub fn write_file(
    relative_path: &RelativePath,
    root: &Path,
    content: &str,
) -> Result<(), StorageError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(StorageError::Io)
}

pub fn validate_storage_dir(path: &Path) -> Result<(), StorageError> {
    if path.exists() && !path.is_dir() {
        return Err(StorageError::InvalidStorageDir(
            "Path exists but is not a directory".to_string(),
        ));
    }

    Ok(())
}

/// Welcome document shown when nothing has been saved yet
pub fn default_markdown() -> String {
    r#"# Welcome to Markdown Card Creator

This is a simple example of what you can create.

- Bullet points
- Lists
- **Bold text**
- *Italic text*

---

# Second Card/Slide

You can create multiple cards or slides by separating them with three dashes.

> This is a blockquote that looks nice in the preview.

---

# Code Example

```javascript
function hello() {
  console.log("Hello, world!");
}
```

Each slide can contain different types of content!
"#
    .to_string()
}
