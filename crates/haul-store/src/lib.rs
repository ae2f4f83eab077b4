//! Local cache for the last known server snapshot
//!
//! One JSON file per slot. A missing or unreadable slot reads as empty so the
//! dashboard can always render something.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use haul_domain::model::{AppUser, Commodity, Dataset, FactoryBalance, MasterData, Release, TransportRecord};
use haul_domain::repository::{SessionRepository, SnapshotRepository};
use haul_types::{CacheError, Error, Result};

const RECORDS_FILE: &str = "records.json";
const RELEASES_FILE: &str = "releases.json";
const FACTORY_BALANCES_FILE: &str = "factory_balances.json";
const MASTER_DATA_FILE: &str = "master_data.json";
const SESSION_USER_FILE: &str = "session_user.json";
const COMMODITY_FILE: &str = "commodity.json";

/// Every file the cache may write, in display order
pub const SLOT_FILES: [&str; 6] = [
    RECORDS_FILE,
    RELEASES_FILE,
    FACTORY_BALANCES_FILE,
    MASTER_DATA_FILE,
    SESSION_USER_FILE,
    COMMODITY_FILE,
];

/// Size of one cache slot on disk
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub name: &'static str,
    pub bytes: Option<u64>,
}

/// File-backed cache directory
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    /// Create the directory if needed
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(|e| CacheError::IoError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_slot<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let reader = BufReader::new(File::open(&path)?);
        match serde_json::from_reader(reader) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Ignoring unreadable cache slot {}: {}", path.display(), e);
                Ok(T::default())
            }
        }
    }

    fn write_slot<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let writer = BufWriter::new(File::create(self.dir.join(name))?);
        serde_json::to_writer_pretty(writer, value)?;
        Ok(())
    }

    fn remove_slot(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.dir.join(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// On-disk size of every slot; `None` for slots never written
    pub fn slots(&self) -> Vec<SlotInfo> {
        SLOT_FILES
            .iter()
            .map(|&name| SlotInfo {
                name,
                bytes: fs::metadata(self.dir.join(name)).ok().map(|m| m.len()),
            })
            .collect()
    }

    /// Drop the snapshot slots; the session survives
    pub fn clear_snapshot(&self) -> Result<()> {
        for name in [RECORDS_FILE, RELEASES_FILE, FACTORY_BALANCES_FILE, MASTER_DATA_FILE] {
            self.remove_slot(name)?;
        }
        debug!("Cleared snapshot cache in {}", self.dir.display());
        Ok(())
    }
}

impl SnapshotRepository for LocalCache {
    fn load_snapshot(&self) -> std::result::Result<Dataset, Error> {
        Ok(Dataset {
            records: self.read_slot::<Vec<TransportRecord>>(RECORDS_FILE)?,
            releases: self.read_slot::<Vec<Release>>(RELEASES_FILE)?,
            factory_balances: self.read_slot::<Vec<FactoryBalance>>(FACTORY_BALANCES_FILE)?,
            master_data: self.read_slot::<MasterData>(MASTER_DATA_FILE)?,
        })
    }

    fn save_snapshot(&self, dataset: &Dataset) -> std::result::Result<(), Error> {
        self.write_slot(RECORDS_FILE, &dataset.records)?;
        self.write_slot(RELEASES_FILE, &dataset.releases)?;
        self.write_slot(FACTORY_BALANCES_FILE, &dataset.factory_balances)?;
        self.write_slot(MASTER_DATA_FILE, &dataset.master_data)?;
        debug!(
            records = dataset.records.len(),
            releases = dataset.releases.len(),
            "Snapshot cached"
        );
        Ok(())
    }
}

impl SessionRepository for LocalCache {
    fn load_user(&self) -> std::result::Result<Option<AppUser>, Error> {
        self.read_slot(SESSION_USER_FILE)
    }

    fn save_user(&self, user: Option<&AppUser>) -> std::result::Result<(), Error> {
        match user {
            Some(user) => self.write_slot(SESSION_USER_FILE, user),
            None => self.remove_slot(SESSION_USER_FILE),
        }
    }

    fn load_commodity(&self) -> std::result::Result<Option<Commodity>, Error> {
        self.read_slot(COMMODITY_FILE)
    }

    fn save_commodity(&self, commodity: Option<Commodity>) -> std::result::Result<(), Error> {
        match commodity {
            Some(commodity) => self.write_slot(COMMODITY_FILE, &commodity),
            None => self.remove_slot(COMMODITY_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haul_domain::model::{OperationStatus, UserRole};
    use tempfile::TempDir;

    fn snapshot() -> Dataset {
        Dataset {
            records: vec![TransportRecord {
                auto_id: "TR-1000-0001".to_string(),
                unloading_site: "SiteA".to_string(),
                order_no: "1".to_string(),
                weight: 30.0,
                status: OperationStatus::Done,
                ..Default::default()
            }],
            releases: vec![Release {
                release_no: "R-1".to_string(),
                site_name: "SiteA".to_string(),
                order_no: "1".to_string(),
                total_quantity: 100.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_cache_loads_empty_snapshot() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::open(dir.path().join("cache")).unwrap();
        assert_eq!(cache.load_snapshot().unwrap(), Dataset::default());
        assert_eq!(cache.load_user().unwrap(), None);
    }

    #[test]
    fn test_snapshot_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::open(dir.path().to_path_buf()).unwrap();
        cache.save_snapshot(&snapshot()).unwrap();

        let reopened = LocalCache::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load_snapshot().unwrap(), snapshot());
    }

    #[test]
    fn test_corrupt_slot_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::open(dir.path().to_path_buf()).unwrap();
        cache.save_snapshot(&snapshot()).unwrap();
        fs::write(dir.path().join(RECORDS_FILE), "{not json").unwrap();

        let loaded = cache.load_snapshot().unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.releases.len(), 1);
    }

    #[test]
    fn test_session_slots_clear_on_none() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::open(dir.path().to_path_buf()).unwrap();
        let user = AppUser {
            name: "Ali".to_string(),
            pin: "1234".to_string(),
            role: UserRole::Editor,
            allowed_materials: "صويا".to_string(),
        };
        cache.save_user(Some(&user)).unwrap();
        cache.save_commodity(Some(Commodity::Soy)).unwrap();
        assert_eq!(cache.load_user().unwrap(), Some(user));
        assert_eq!(cache.load_commodity().unwrap(), Some(Commodity::Soy));

        cache.save_user(None).unwrap();
        cache.save_commodity(None).unwrap();
        assert_eq!(cache.load_user().unwrap(), None);
        assert_eq!(cache.load_commodity().unwrap(), None);
    }

    #[test]
    fn test_clear_snapshot_keeps_session() {
        let dir = TempDir::new().unwrap();
        let cache = LocalCache::open(dir.path().to_path_buf()).unwrap();
        cache.save_snapshot(&snapshot()).unwrap();
        cache.save_commodity(Some(Commodity::Maize)).unwrap();

        cache.clear_snapshot().unwrap();
        assert_eq!(cache.load_snapshot().unwrap(), Dataset::default());
        assert_eq!(cache.load_commodity().unwrap(), Some(Commodity::Maize));
        let slots = cache.slots();
        assert_eq!(slots.len(), 6);
        assert!(slots.iter().find(|s| s.name == RECORDS_FILE).unwrap().bytes.is_none());
    }
}
