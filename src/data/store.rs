use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

/// Owns the listings file location and the dataset read from it.
///
/// The file is read at most once per store: the first successful
/// [`load`](Self::load) caches the dataset and every later call hands out
/// the same `Arc`. A failed load caches nothing; the cache is only dropped
/// with the store.
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        self.cell
            .get_or_try_init(|| {
                let dataset = load_file(&self.path)?;
                log::info!(
                    "Loaded {} listings from {}",
                    dataset.len(),
                    self.path.display()
                );
                Ok(Arc::new(dataset))
            })
            .cloned()
    }

    /// Whether the dataset has already been read.
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CSV: &str = "Brand,Model,Year,Transmission,Condition,Engine Size,Fuel Type,Price,Mileage\n\
                       Ford,Focus,2019,Manual,Used,1.6,Petrol,9000,40000\n";

    #[test]
    fn loads_once_and_reuses_the_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cars.csv");
        fs::write(&path, CSV).unwrap();

        let store = DatasetStore::new(&path);
        assert!(!store.is_loaded());
        let first = store.load().unwrap();

        // Removing the file proves the second call never touches the disk.
        fs::remove_file(&path).unwrap();
        let second = store.load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cars.csv");
        let store = DatasetStore::new(&path);

        assert!(matches!(store.load(), Err(LoadError::Io { .. })));
        assert!(!store.is_loaded());

        fs::write(&path, CSV).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
