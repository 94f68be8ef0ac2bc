use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A collection persisted as one document. Reads return everything, writes
/// replace everything; there is no per-record access.
pub trait DocumentStore<T>: Send + Sync {
    fn load(&self) -> Result<Vec<T>>;
    fn replace(&self, items: &[T]) -> Result<()>;
}

/// Pretty-printed JSON array in a single file. Last write wins.
pub struct JsonFileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> DocumentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", self.path))
    }

    fn replace(&self, items: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json).with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }
}

/// Returns the stored collection, writing `defaults` first when the document
/// is missing, empty or unreadable.
pub fn load_or_seed<T, S, F>(store: &S, defaults: F) -> Result<Vec<T>>
where
    S: DocumentStore<T> + ?Sized,
    F: FnOnce() -> Vec<T>,
{
    match store.load() {
        Ok(items) if !items.is_empty() => return Ok(items),
        Ok(_) => {}
        Err(e) => log::warn!("Discarding unreadable document, reseeding defaults: {:#}", e),
    }
    let items = defaults();
    store.replace(&items)?;
    Ok(items)
}

/// Runs a store operation on tokio's blocking pool so file I/O stays off the
/// async workers.
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Store task failed to complete")?
}
