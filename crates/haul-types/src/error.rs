//! Error types for grain-haul

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Cache-related errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache IO error: {0}")]
    IoError(String),
}

/// Reasons a form submission is blocked before anything is sent
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Unloading site is required")]
    MissingSite,

    #[error("Order number is required")]
    MissingOrder,

    #[error("Weight must be a non-negative number, got {0}")]
    InvalidWeight(f64),

    #[error("No release found for site '{site}' and order '{order_no}'")]
    NoReleaseFound { site: String, order_no: String },

    #[error("Insufficient balance: requested {requested:.2} t, available {available:.2} t")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Release needs at least one distribution")]
    NoDistributions,

    #[error("Distribution {index}: site and a quantity above zero are required")]
    InvalidDistribution { index: usize },

    #[error("Editing a release takes exactly one distribution, got {0}")]
    EditNeedsSingleDistribution(usize),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Date range is reversed: {from} is after {to}")]
    ReversedRange { from: String, to: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active session, run `login` first")]
    NoSession,

    #[error("No commodity selected, run `use soy` or `use maize` first")]
    NoCommodity,
}

pub type Result<T> = std::result::Result<T, Error>;
