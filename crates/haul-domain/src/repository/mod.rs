//! Repository trait definitions for local persistence

use haul_types::Error;

use crate::model::{AppUser, Commodity, Dataset};

/// Last known server snapshot
pub trait SnapshotRepository {
    /// Load the cached snapshot; missing slots come back empty
    fn load_snapshot(&self) -> Result<Dataset, Error>;

    /// Overwrite all four slots with a fresh snapshot
    fn save_snapshot(&self, dataset: &Dataset) -> Result<(), Error>;
}

/// The signed-in user and the commodity section they opened
pub trait SessionRepository {
    fn load_user(&self) -> Result<Option<AppUser>, Error>;

    /// `None` clears the slot (logout)
    fn save_user(&self, user: Option<&AppUser>) -> Result<(), Error>;

    fn load_commodity(&self) -> Result<Option<Commodity>, Error>;

    fn save_commodity(&self, commodity: Option<Commodity>) -> Result<(), Error>;
}
