use std::{
    fs, io,
    path::{Path, PathBuf},
};

use shared::{route_from_json, route_to_json, GeoPoint, LAST_RUN_KEY};

use crate::error::StoreError;

/// Durable key-value storage, one `<key>.json` file per entry.
///
/// Writes overwrite; there is no history.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(key), value)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save_last_run(&self, path: &[GeoPoint]) -> Result<(), StoreError> {
        self.put(LAST_RUN_KEY, &route_to_json(path)?)
    }

    pub fn load_last_run(&self) -> Result<Option<Vec<GeoPoint>>, StoreError> {
        self.get(LAST_RUN_KEY)?
            .map(|json| route_from_json(&json))
            .transpose()
            .map_err(StoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("anything").unwrap(), None);
        assert_eq!(store.load_last_run().unwrap(), None);
    }

    #[test]
    fn last_run_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let first = vec![GeoPoint::new(1.0, 2.0).unwrap()];
        let second = vec![GeoPoint::new(3.0, 4.0).unwrap(), GeoPoint::new(3.5, 4.5).unwrap()];

        store.save_last_run(&first).unwrap();
        store.save_last_run(&second).unwrap();

        assert_eq!(store.load_last_run().unwrap(), Some(second));
        assert!(dir.path().join("lastRun.json").exists());
    }

    #[test]
    fn corrupt_entry_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.put(LAST_RUN_KEY, "not json").unwrap();
        assert!(matches!(store.load_last_run(), Err(StoreError::Export(_))));
    }
}
