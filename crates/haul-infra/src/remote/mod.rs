//! Remote spreadsheet endpoint

mod client;
mod error;
mod retry;
mod transport;
mod wire;

pub use client::{ConnectionStatus, DataClient};
pub use error::RemoteError;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, Transport};
pub use wire::{Mutation, FETCH_ACTION};
