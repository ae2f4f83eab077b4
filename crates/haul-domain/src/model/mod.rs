//! Domain model types

pub mod commodity;
pub mod dataset;
pub mod dates;
pub mod factory_balance;
pub mod key;
pub mod lenient;
pub mod master_data;
pub mod record;
pub mod release;
pub mod status;
pub mod user;

pub use commodity::{Commodity, FormProfile};
pub use dataset::Dataset;
pub use factory_balance::FactoryBalance;
pub use key::SiteOrderKey;
pub use master_data::{MasterData, MasterList};
pub use record::TransportRecord;
pub use release::{Distribution, Release, ReleaseDraft, ReleaseHeader};
pub use status::OperationStatus;
pub use user::{AppUser, MaterialScope, UserRole};
