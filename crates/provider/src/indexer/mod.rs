//! A provider backed by an HTTP indexer API.
//!
//! Listing endpoints paginate with an opaque cursor; the provider follows
//! cursors in a bounded loop and returns the concatenation in discovery
//! order. Reads are lenient: a mid-pagination failure yields the partial
//! result with a warning rather than an error. Writes are strict.

mod wire;

use async_trait::async_trait;
use std::time::Duration;

use eutxo_core::{protocol::Protocol, utxo::Utxo};

use crate::{
    provider::{Fetcher, PollingProvider, ProviderError, Submitter, TxState},
    utils::{get_json, post_cbor},
};

/// Mainnet API root.
static MAINNET: &str = "https://mainnet.gomaestro-api.org/v1";

/// Preprod (test network) API root.
static PREPROD: &str = "https://preprod.gomaestro-api.org/v1";

/// Page size requested from listing endpoints.
const PAGE_SIZE: usize = 100;

/// Pages followed per listing before giving up on a server that never
/// exhausts its cursor.
const MAX_UTXO_PAGES: usize = 100;

/// A provider that uses a cursor-paginated indexer API.
#[derive(Debug)]
pub struct IndexerProvider {
    interval: u64,
    api_root: String,
    api_key: String,
    client: reqwest::Client,
}

impl IndexerProvider {
    /// Instantiate the API pointing at a specific URL.
    pub fn with_api_root(api_root: &str, api_key: &str) -> Self {
        Self {
            interval: 5,
            api_root: api_root.to_owned(),
            api_key: api_key.to_owned(),
            client: Default::default(),
        }
    }

    /// Instantiate against mainnet.
    pub fn mainnet(api_key: &str) -> Self {
        Self::with_api_root(MAINNET, api_key)
    }

    /// Instantiate against the preprod test network.
    pub fn preprod(api_key: &str) -> Self {
        Self::with_api_root(PREPROD, api_key)
    }
}

#[async_trait]
impl Fetcher for IndexerProvider {
    async fn fetch_address_utxos(
        &self,
        address: &str,
        asset: Option<&str>,
    ) -> Result<Vec<Utxo>, ProviderError> {
        let mut utxos = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_UTXO_PAGES {
            let url = match &cursor {
                Some(cursor) => format!(
                    "{}/addresses/{}/utxos?count={}&cursor={}",
                    self.api_root, address, PAGE_SIZE, cursor
                ),
                None => format!(
                    "{}/addresses/{}/utxos?count={}",
                    self.api_root, address, PAGE_SIZE
                ),
            };

            let page: wire::Timestamped<Vec<wire::IndexerUtxo>> =
                match get_json(&self.client, &url, &self.api_key).await {
                    Ok(page) => page,
                    Err(e) => {
                        // Lenient read: keep whatever was gathered so far.
                        log::warn!("utxo listing for {address} failed mid-pagination: {e}");
                        return Ok(utxos);
                    }
                };

            let mut page_utxos: Vec<Utxo> = page
                .data
                .into_iter()
                .map(|utxo| utxo.into_utxo(address))
                .collect();
            if let Some(unit) = asset {
                page_utxos.retain(|utxo| utxo.output.amount.iter().any(|a| a.unit == unit));
            }
            utxos.extend(page_utxos);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(utxos),
            }
        }

        log::warn!("utxo listing for {address} exceeded {MAX_UTXO_PAGES} pages; returning a partial set");
        Ok(utxos)
    }

    async fn fetch_protocol_parameters(&self) -> Result<Protocol, ProviderError> {
        let url = format!("{}/protocol-params", self.api_root);
        let params: wire::Timestamped<wire::WireProtocol> =
            get_json(&self.client, &url, &self.api_key).await?;

        let url = format!("{}/epochs/current", self.api_root);
        let epoch: wire::Timestamped<wire::WireEpoch> =
            get_json(&self.client, &url, &self.api_key).await?;

        params.data.into_protocol(epoch.data.epoch_no)
    }

    async fn fetch_tx_state(&self, tx_hash: &str) -> Result<TxState, ProviderError> {
        let url = format!("{}/txmanager/{}", self.api_root, tx_hash);
        let state: wire::TxManagerState = get_json(&self.client, &url, &self.api_key).await?;
        Ok(match state.state.as_str() {
            "Confirmed" => TxState::Confirmed,
            "Rejected" | "Expired" => TxState::Rejected,
            _ => TxState::Pending,
        })
    }
}

#[async_trait]
impl Submitter for IndexerProvider {
    async fn submit_tx(&self, tx_hex: &str) -> Result<String, ProviderError> {
        let url = format!("{}/txmanager", self.api_root);
        let (status, body) = post_cbor(&self.client, &url, &self.api_key, tx_hex).await?;

        // The tx manager acknowledges a submission with 202 Accepted and
        // the tx hash as the body; anything else is a failure.
        if status != 202 {
            return Err(ProviderError::Http { status, body });
        }
        Ok(body.trim().trim_matches('"').to_owned())
    }
}

impl PollingProvider for IndexerProvider {
    fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    fn set_interval(&mut self, interval: u64) {
        self.interval = interval;
    }
}
