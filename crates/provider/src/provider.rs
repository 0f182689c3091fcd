//! Provider traits: fetching chain state and submitting transactions.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use eutxo_core::{address::AddressError, protocol::Protocol, utxo::Utxo};

use crate::pending::PendingTx;

/// Errors thrown by providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The response body did not parse.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP status, with the response body attached.
    #[error("http status {status}: {body}")]
    Http {
        /// The status code returned.
        status: u16,
        /// The response body, verbatim.
        body: String,
    },

    /// A wire field was malformed (e.g. a rational parameter).
    #[error("malformed parameter: {0}")]
    BadParameter(String),

    /// Bubbled up from address handling.
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl ProviderError {
    /// True if the request failed at the transport or remote end, making it
    /// a candidate for retry by a poller.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ProviderError::Reqwest(_) | ProviderError::Http { .. }
        )
    }
}

/// State of a submitted transaction as reported by the backend.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxState {
    /// Accepted into the mempool, not yet in a block.
    Pending,
    /// In a block on the chain the backend follows.
    Confirmed,
    /// Dropped or rejected by the backend.
    Rejected,
}

/// Read side of a network provider.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch all UTXOs held by `address`, optionally keeping only those
    /// carrying `asset`.
    ///
    /// Implementations follow remote pagination cursors until exhausted and
    /// return the concatenation in discovery order.
    async fn fetch_address_utxos(
        &self,
        address: &str,
        asset: Option<&str>,
    ) -> Result<Vec<Utxo>, ProviderError>;

    /// Fetch the current protocol parameter snapshot.
    async fn fetch_protocol_parameters(&self) -> Result<Protocol, ProviderError>;

    /// Report the state of a transaction by hash.
    async fn fetch_tx_state(&self, tx_hash: &str) -> Result<TxState, ProviderError>;
}

/// Write side of a network provider.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit an encoded transaction. Resolves to the tx hash on
    /// acceptance; every non-success status is an error.
    async fn submit_tx(&self, tx_hex: &str) -> Result<String, ProviderError>;
}

/// Combined read/write provider surface, usable as a trait object.
pub trait NodeProvider: Fetcher + Submitter {}

impl<T: Fetcher + Submitter> NodeProvider for T {}

/// Extension trait adding polling watchers to a provider.
pub trait PollingProvider: NodeProvider {
    /// The provider's polling interval.
    fn interval(&self) -> Duration;

    /// Set the polling interval, in seconds.
    fn set_interval(&mut self, interval: u64);

    /// Submit a transaction and watch it until confirmation. This returns a
    /// `PendingTx` stream; the tx is not submitted until the stream is
    /// first polled.
    fn send(&self, tx_hex: &str) -> PendingTx<'_>
    where
        Self: Sized,
    {
        PendingTx::new(tx_hex, self).interval(self.interval())
    }
}
