use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use enumset::EnumSet;

use crate::{
    core::statistic::{StatisticData, StatisticField, StatisticMetadata},
    prelude::*,
    recorder::{Recorder, store::Store},
};

/// Recorder persisted in a TOML file.
///
/// Every import rewrites the file through a temporary sibling file,
/// so that a crash never leaves a half-written store behind.
pub struct FileRecorder {
    path: PathBuf,
    store: Mutex<Store>,
}

impl FileRecorder {
    /// Open the store, a missing file is an empty store.
    #[instrument(name = "Opening the statistics file…")]
    pub fn open<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let store = if path.is_file() {
            let contents =
                fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
            toml::from_slice(&contents)
                .with_context(|| format!("failed to parse `{}`", path.display()))?
        } else {
            info!("Starting with an empty store");
            Store::default()
        };
        Ok(Self { path: path.to_path_buf(), store: Mutex::new(store) })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        self.store.lock().map_err(|_| anyhow!("the statistics store is poisoned"))
    }

    /// Metadata of all stored series.
    pub fn list_metadata(&self) -> Result<Vec<StatisticMetadata>> {
        Ok(self.lock()?.metadata().cloned().collect())
    }

    /// Sibling path for the pending write, never equal to the store path.
    fn temporary_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        path.into()
    }

    fn write(&self, store: &Store) -> Result {
        let temporary_path = self.temporary_path();
        fs::write(&temporary_path, toml::to_string(store)?)
            .with_context(|| format!("failed to write `{}`", temporary_path.display()))?;
        fs::rename(&temporary_path, &self.path)
            .with_context(|| format!("failed to replace `{}`", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl Recorder for FileRecorder {
    #[instrument(skip_all, fields(statistic_id = metadata.statistic_id, n_rows = rows.len()))]
    async fn import_statistics(
        &self,
        metadata: &StatisticMetadata,
        rows: &[StatisticData],
    ) -> Result {
        let mut store = self.lock()?;

        // Import into a copy, and only swap it in once it is safely on disk:
        let mut updated = store.clone();
        let n_inserted = updated.import(metadata, rows)?;
        self.write(&updated)?;
        *store = updated;

        debug!(n_inserted, "imported");
        Ok(())
    }

    async fn get_last_statistics(
        &self,
        statistic_id: &str,
        n: usize,
        fields: EnumSet<StatisticField>,
    ) -> Result<Vec<StatisticData>> {
        Ok(self.lock()?.last(statistic_id, n, fields))
    }
}
