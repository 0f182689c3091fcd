//! Pluggable standardized network backend for transaction construction.
//!
//! The [`provider`] module defines the read (`Fetcher`) and write
//! (`Submitter`) halves of a network provider; [`indexer`] implements them
//! against an HTTP indexer API; [`pending`] polls a submitted transaction
//! until it confirms; [`creator`] adapts a fetcher into the wallet-side
//! collaborator the core builder consumes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

#[macro_use]
mod macros;

pub mod creator;
pub mod indexer;
pub mod pending;
pub mod provider;

mod utils;

pub use creator::BoundCreator;
pub use indexer::IndexerProvider;
pub use pending::PendingTx;
pub use provider::*;
pub use utils::{Last, StreamLast};

use std::time::Duration;

/// The default poll interval for pending transactions, 5 seconds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Boxed provider future, as stored by the polling streams.
pub(crate) type ProviderFut<'a, T> = std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<T, provider::ProviderError>> + 'a + Send>,
>;
