//! Infrastructure layer - remote endpoint access
//!
//! The spreadsheet endpoint is reached through the [`remote::Transport`]
//! trait; [`remote::DataClient`] layers timeouts, retries and the cache
//! fallback on top of it.

pub mod remote;

pub use remote::{ConnectionStatus, DataClient, HttpTransport, Mutation, RemoteError, RetryPolicy, Transport};
