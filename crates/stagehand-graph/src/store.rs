//! Persisted asset storage addressed by store path.
//!
//! The core only ever talks to a store through [`AssetStore`]; storage layout
//! is an implementation detail. [`MemoryStore`] backs tests and embedders,
//! [`FsStore`] persists each asset as a JSON document under a root directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::node::Node;

/// Storage for persisted nodes, addressed by path strings.
pub trait AssetStore: Send {
    /// Loads the node stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when nothing is stored at `path`.
    fn load(&self, path: &str) -> Result<Node, StoreError>;

    /// Stores `node` at `path`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error when the node cannot be written.
    fn save(&self, node: &Node, path: &str) -> Result<(), StoreError>;

    /// Duplicates the asset at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `from` does not exist.
    fn copy_asset(&self, from: &str, to: &str) -> Result<(), StoreError>;

    /// Reports whether an asset is stored at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Removes the asset at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `path` does not exist.
    fn delete_asset(&self, path: &str) -> Result<(), StoreError>;

    /// Moves the asset at `from` to `to`. Moving an asset onto its own path
    /// leaves it in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `from` does not exist, or an
    /// error when the copy or the removal fails.
    fn move_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        if from == to {
            return if self.exists(from) {
                Ok(())
            } else {
                Err(StoreError::not_found(from))
            };
        }
        self.copy_asset(from, to)?;
        self.delete_asset(from)
    }

    /// Lists stored paths beginning with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing storage cannot be enumerated.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

impl<T> AssetStore for Arc<T>
where
    T: AssetStore + Sync + ?Sized,
{
    fn load(&self, path: &str) -> Result<Node, StoreError> {
        self.as_ref().load(path)
    }

    fn save(&self, node: &Node, path: &str) -> Result<(), StoreError> {
        self.as_ref().save(node, path)
    }

    fn copy_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        self.as_ref().copy_asset(from, to)
    }

    fn exists(&self, path: &str) -> bool {
        self.as_ref().exists(path)
    }

    fn delete_asset(&self, path: &str) -> Result<(), StoreError> {
        self.as_ref().delete_asset(path)
    }

    fn move_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        self.as_ref().move_asset(from, to)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.as_ref().list(prefix)
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: Mutex<BTreeMap<String, Node>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `assets`.
    pub fn with_assets<I, P>(assets: I) -> Self
    where
        I: IntoIterator<Item = (P, Node)>,
        P: Into<String>,
    {
        let map = assets
            .into_iter()
            .map(|(path, node)| (path.into(), node))
            .collect();
        Self {
            assets: Mutex::new(map),
        }
    }

    /// Returns a copy of the node stored at `path`, if any.
    #[must_use]
    pub fn snapshot(&self, path: &str) -> Option<Node> {
        self.lock().get(path).cloned()
    }

    /// Returns the number of stored assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether the store holds no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Node>> {
        self.assets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetStore for MemoryStore {
    fn load(&self, path: &str) -> Result<Node, StoreError> {
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn save(&self, node: &Node, path: &str) -> Result<(), StoreError> {
        self.lock().insert(path.to_owned(), node.clone());
        Ok(())
    }

    fn copy_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let mut assets = self.lock();
        let node = assets
            .get(from)
            .cloned()
            .ok_or_else(|| StoreError::not_found(from))?;
        assets.insert(to.to_owned(), node);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    fn delete_asset(&self, path: &str) -> Result<(), StoreError> {
        self.lock()
            .remove(path)
            .map(drop)
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .lock()
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Filesystem store writing one JSON document per asset beneath a root.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: Utf8PathBuf,
}

impl FsStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_path(&self, path: &str) -> Result<Utf8PathBuf, StoreError> {
        if path.is_empty() {
            return Err(StoreError::InvalidPath {
                path: path.to_owned(),
                reason: "path is empty",
            });
        }
        let mut file = self.root.clone();
        for component in Utf8Path::new(path).components() {
            match component {
                Utf8Component::Normal(part) => file.push(part),
                Utf8Component::CurDir => {}
                Utf8Component::ParentDir => {
                    return Err(StoreError::InvalidPath {
                        path: path.to_owned(),
                        reason: "parent directory components are not allowed",
                    });
                }
                Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                    return Err(StoreError::InvalidPath {
                        path: path.to_owned(),
                        reason: "path must be relative to the store root",
                    });
                }
            }
        }
        Ok(file)
    }

    fn ensure_parent(file: &Utf8Path, path: &str) -> Result<(), StoreError> {
        match file.parent() {
            Some(parent) if !parent.as_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|source| StoreError::io(path, source))
            }
            _ => Ok(()),
        }
    }

    fn collect(
        &self,
        dir: &Utf8Path,
        prefix: &str,
        found: &mut Vec<String>,
    ) -> Result<(), StoreError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(StoreError::io(dir.as_str(), error)),
        };
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::io(dir.as_str(), source))?;
            let Ok(entry_path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                continue;
            };
            let file_type = entry
                .file_type()
                .map_err(|source| StoreError::io(entry_path.as_str(), source))?;
            if file_type.is_dir() {
                self.collect(&entry_path, prefix, found)?;
            } else if let Ok(relative) = entry_path.strip_prefix(&self.root) {
                let store_path = relative
                    .components()
                    .map(|component| component.as_str())
                    .collect::<Vec<_>>()
                    .join("/");
                if store_path.starts_with(prefix) {
                    found.push(store_path);
                }
            }
        }
        Ok(())
    }
}

impl AssetStore for FsStore {
    fn load(&self, path: &str) -> Result<Node, StoreError> {
        let file = self.file_path(path)?;
        let contents = match fs::read_to_string(&file) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::not_found(path));
            }
            Err(error) => return Err(StoreError::io(path, error)),
        };
        serde_json::from_str(&contents).map_err(|source| StoreError::Decode {
            path: path.to_owned(),
            source,
        })
    }

    fn save(&self, node: &Node, path: &str) -> Result<(), StoreError> {
        let file = self.file_path(path)?;
        let encoded = serde_json::to_vec_pretty(node).map_err(|source| StoreError::Encode {
            path: path.to_owned(),
            source,
        })?;
        Self::ensure_parent(&file, path)?;
        write_file_atomic(&file, &encoded).map_err(|source| StoreError::io(path, source))
    }

    fn copy_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let source_file = self.file_path(from)?;
        let target_file = self.file_path(to)?;
        if !source_file.is_file() {
            return Err(StoreError::not_found(from));
        }
        let contents = fs::read(&source_file).map_err(|source| StoreError::io(from, source))?;
        Self::ensure_parent(&target_file, to)?;
        write_file_atomic(&target_file, &contents).map_err(|source| StoreError::io(to, source))
    }

    fn exists(&self, path: &str) -> bool {
        self.file_path(path).is_ok_and(|file| file.is_file())
    }

    fn move_asset(&self, from: &str, to: &str) -> Result<(), StoreError> {
        let source_file = self.file_path(from)?;
        let target_file = self.file_path(to)?;
        if !source_file.is_file() {
            return Err(StoreError::not_found(from));
        }
        if source_file == target_file {
            return Ok(());
        }
        Self::ensure_parent(&target_file, to)?;
        fs::rename(&source_file, &target_file).map_err(|source| StoreError::io(from, source))
    }

    fn delete_asset(&self, path: &str) -> Result<(), StoreError> {
        let file = self.file_path(path)?;
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found(path))
            }
            Err(error) => Err(StoreError::io(path, error)),
        }
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut found = Vec::new();
        self.collect(&self.root, prefix, &mut found)?;
        found.sort();
        Ok(found)
    }
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, so readers never observe a partially written asset.
fn write_file_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|error| error.error)?;
    Ok(())
}
