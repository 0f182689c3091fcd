//! Wire types mirroring the indexer's JSON responses.

use serde::Deserialize;

use eutxo_core::{
    protocol::Protocol,
    utxo::{TxOutput, Utxo, UtxoRef},
    values::Asset,
};

use crate::provider::ProviderError;

/// Envelope the indexer wraps around most payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct Timestamped<T> {
    pub data: T,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexerAsset {
    pub unit: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexerDatum {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde(default)]
    pub bytes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexerScript {
    #[serde(default)]
    pub bytes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndexerUtxo {
    pub tx_hash: String,
    pub index: u32,
    pub assets: Vec<IndexerAsset>,
    #[serde(default)]
    pub datum: Option<IndexerDatum>,
    #[serde(default)]
    pub reference_script: Option<IndexerScript>,
}

impl IndexerUtxo {
    /// Convert into the core UTXO model, attributing the output to the
    /// queried address.
    pub(crate) fn into_utxo(self, address: &str) -> Utxo {
        let (data_hash, plutus_data) = match self.datum {
            Some(datum) if datum.kind == "inline" => (Some(datum.hash), datum.bytes),
            Some(datum) => (Some(datum.hash), None),
            None => (None, None),
        };
        Utxo {
            input: UtxoRef::new(self.tx_hash, self.index),
            output: TxOutput {
                address: address.to_owned(),
                amount: self
                    .assets
                    .into_iter()
                    .map(|asset| Asset::new(asset.unit, asset.amount))
                    .collect(),
                data_hash,
                plutus_data,
                script_ref: self.reference_script.and_then(|script| script.bytes),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireExUnits {
    pub memory: u64,
    pub steps: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePrices {
    pub memory: String,
    pub steps: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireProtocol {
    pub min_fee_coefficient: u64,
    pub min_fee_constant: u64,
    pub max_block_body_size: u64,
    pub max_block_header_size: u64,
    pub max_tx_size: u32,
    pub stake_key_deposit: u64,
    pub pool_deposit: u64,
    pub min_pool_cost: u64,
    pub max_value_size: u32,
    pub max_collateral_inputs: u32,
    pub collateral_percentage: u32,
    pub coins_per_utxo_byte: u64,
    pub prices: WirePrices,
    pub max_execution_units_per_transaction: WireExUnits,
    pub max_execution_units_per_block: WireExUnits,
}

impl WireProtocol {
    pub(crate) fn into_protocol(self, epoch: u64) -> Result<Protocol, ProviderError> {
        Ok(Protocol {
            epoch,
            min_fee_a: self.min_fee_coefficient,
            min_fee_b: self.min_fee_constant,
            max_block_size: self.max_block_body_size,
            max_tx_size: self.max_tx_size,
            max_block_header_size: self.max_block_header_size,
            key_deposit: self.stake_key_deposit,
            pool_deposit: self.pool_deposit,
            min_pool_cost: self.min_pool_cost,
            price_mem: rational_to_f64(&self.prices.memory)?,
            price_step: rational_to_f64(&self.prices.steps)?,
            max_tx_ex_mem: self.max_execution_units_per_transaction.memory,
            max_tx_ex_steps: self.max_execution_units_per_transaction.steps,
            max_block_ex_mem: self.max_execution_units_per_block.memory,
            max_block_ex_steps: self.max_execution_units_per_block.steps,
            max_val_size: self.max_value_size,
            collateral_percent: self.collateral_percentage,
            max_collateral_inputs: self.max_collateral_inputs,
            coins_per_utxo_size: self.coins_per_utxo_byte,
            // Retired after full decentralisation; the API no longer
            // reports it.
            decentralisation: 0.0,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireEpoch {
    pub epoch_no: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TxManagerState {
    pub state: String,
}

/// Parse an indexer rational of the form `"n/d"` by integer division of the
/// two components.
pub(crate) fn rational_to_f64(text: &str) -> Result<f64, ProviderError> {
    let (numerator, denominator) = text
        .split_once('/')
        .ok_or_else(|| ProviderError::BadParameter(format!("expected rational n/d, got {text:?}")))?;
    let numerator: u64 = numerator
        .trim()
        .parse()
        .map_err(|_| ProviderError::BadParameter(format!("rational numerator in {text:?}")))?;
    let denominator: u64 = denominator
        .trim()
        .parse()
        .map_err(|_| ProviderError::BadParameter(format!("rational denominator in {text:?}")))?;
    if denominator == 0 {
        return Err(ProviderError::BadParameter(format!(
            "zero denominator in {text:?}"
        )));
    }
    Ok(numerator as f64 / denominator as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_rationals() {
        let cases = [
            ("577/10000", 0.0577),
            ("721/10000000", 0.0000721),
            ("1/1", 1.0),
            ("0/5", 0.0),
        ];
        for (text, expected) in cases {
            assert!((rational_to_f64(text).unwrap() - expected).abs() < 1e-12);
        }

        for bad in ["", "12", "a/b", "1/0", "3.5/2"] {
            assert!(rational_to_f64(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn it_converts_wire_utxos() {
        let wire: IndexerUtxo = serde_json::from_str(
            r#"{
                "tx_hash": "deadbeef",
                "index": 2,
                "assets": [
                    { "unit": "lovelace", "amount": 7000000 },
                    { "unit": "cafe", "amount": 3 }
                ],
                "datum": { "type": "inline", "hash": "0011", "bytes": "d87980" }
            }"#,
        )
        .unwrap();

        let utxo = wire.into_utxo("addr_test1xyz");
        assert_eq!(utxo.input, UtxoRef::new("deadbeef", 2));
        assert_eq!(utxo.output.address, "addr_test1xyz");
        assert_eq!(utxo.lovelace(), 7_000_000);
        assert_eq!(utxo.quantity_of("cafe"), 3);
        assert_eq!(utxo.output.data_hash.as_deref(), Some("0011"));
        assert_eq!(utxo.output.plutus_data.as_deref(), Some("d87980"));
        assert_eq!(utxo.output.script_ref, None);
    }

    #[test]
    fn it_keeps_only_the_hash_for_non_inline_datums() {
        let wire: IndexerUtxo = serde_json::from_str(
            r#"{
                "tx_hash": "deadbeef",
                "index": 0,
                "assets": [],
                "datum": { "type": "hash", "hash": "0011" }
            }"#,
        )
        .unwrap();

        let utxo = wire.into_utxo("addr_test1xyz");
        assert_eq!(utxo.output.data_hash.as_deref(), Some("0011"));
        assert_eq!(utxo.output.plutus_data, None);
    }
}
