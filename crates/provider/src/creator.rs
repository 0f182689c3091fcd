//! A creator collaborator backed by a network fetcher.

use std::sync::Arc;

use async_trait::async_trait;

use eutxo_core::{
    address::Address,
    creator::{Creator, CreatorError},
    utxo::Utxo,
    values::LOVELACE,
};

use crate::provider::Fetcher;

/// Minimum lovelace a pure-currency output must hold to serve as
/// collateral.
const MIN_COLLATERAL_LOVELACE: u64 = 5_000_000;

/// How many collateral entries are handed out at most.
const MAX_COLLATERAL_ENTRIES: usize = 2;

/// A `Creator` bound to one address, resolving its UTXO set through a
/// fetcher.
///
/// The change address is the bound address itself; collateral is picked
/// from the address's pure-currency outputs. This is the self-custody
/// counterpart of a browser wallet: everything the builder auto-resolves
/// comes from one identity.
#[derive(Clone)]
pub struct BoundCreator {
    address: Address,
    fetcher: Arc<dyn Fetcher>,
}

impl BoundCreator {
    /// Bind `address` to `fetcher`.
    pub fn new(address: impl Into<Address>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            address: address.into(),
            fetcher,
        }
    }

    /// Pure-currency outputs large enough to back script execution,
    /// smallest workable first so large outputs stay spendable.
    fn eligible_collateral(utxos: Vec<Utxo>) -> Vec<Utxo> {
        let mut eligible: Vec<Utxo> = utxos
            .into_iter()
            .filter(|utxo| {
                utxo.output.amount.len() == 1
                    && utxo.output.amount[0].unit == LOVELACE
                    && utxo.lovelace() >= MIN_COLLATERAL_LOVELACE
            })
            .collect();
        eligible.sort_by(|a, b| {
            a.lovelace()
                .cmp(&b.lovelace())
                .then_with(|| a.input.cmp(&b.input))
        });
        eligible.truncate(MAX_COLLATERAL_ENTRIES);
        eligible
    }
}

#[async_trait]
impl Creator for BoundCreator {
    async fn get_change_address(&self) -> Result<Address, CreatorError> {
        Ok(self.address.clone())
    }

    async fn get_used_utxos(&self) -> Result<Vec<Utxo>, CreatorError> {
        self.fetcher
            .fetch_address_utxos(self.address.as_str(), None)
            .await
            .map_err(CreatorError::new)
    }

    async fn get_used_collateral(&self) -> Result<Vec<Utxo>, CreatorError> {
        let utxos = self.get_used_utxos().await?;
        Ok(Self::eligible_collateral(utxos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eutxo_core::{
        utxo::{TxOutput, UtxoRef},
        values::Asset,
    };

    fn utxo(index: u32, assets: Vec<Asset>) -> Utxo {
        Utxo::new(
            UtxoRef::new("aa", index),
            TxOutput::new("addr_test1bound", assets),
        )
    }

    #[test]
    fn it_selects_pure_currency_outputs_only() {
        let pool = vec![
            utxo(0, vec![Asset::lovelace(9_000_000), Asset::new("tok", 1)]),
            utxo(1, vec![Asset::lovelace(6_000_000)]),
            utxo(2, vec![Asset::lovelace(1_000_000)]),
            utxo(3, vec![Asset::new("tok", 8_000_000)]),
        ];

        let eligible = BoundCreator::eligible_collateral(pool);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].input, UtxoRef::new("aa", 1));
    }

    #[test]
    fn it_caps_entries_and_prefers_small_outputs() {
        let pool = vec![
            utxo(0, vec![Asset::lovelace(50_000_000)]),
            utxo(1, vec![Asset::lovelace(5_000_000)]),
            utxo(2, vec![Asset::lovelace(7_000_000)]),
        ];

        let eligible = BoundCreator::eligible_collateral(pool);
        let refs: Vec<_> = eligible.iter().map(|u| u.input.clone()).collect();
        assert_eq!(refs, vec![UtxoRef::new("aa", 1), UtxoRef::new("aa", 2)]);
    }
}
