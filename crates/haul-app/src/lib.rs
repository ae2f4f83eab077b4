//! Application service layer - config, app store, sync, polling, use cases

pub mod app;
pub mod config;

pub use app::{spawn_polling, App, AppState, Notice, NoticeLevel, SingleFlight, SyncReport};
pub use config::Config;
