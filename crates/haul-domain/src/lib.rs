//! Domain layer for grain-haul
//!
//! Models mirror the remote spreadsheet rows; services are pure functions
//! over slices of those rows and never touch the network or the disk.

pub mod model;
pub mod repository;
pub mod service;
