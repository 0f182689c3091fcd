//! Unspent output types.
//!
//! A `Utxo` is immutable once observed: the builder references it, spends
//! it, and never modifies it. Identity is the `(tx_hash, output_index)`
//! pair; the payload is whatever the creating transaction locked at the
//! address.

use serde::{Deserialize, Serialize};

use crate::values::{Asset, Value, LOVELACE};

/// A reference to a transaction output: creating tx hash plus output index.
///
/// Orders by tx hash then index, which is the deterministic tie-break used
/// throughout coin selection.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct UtxoRef {
    /// Hash of the transaction that created the output.
    pub tx_hash: String,
    /// Index of the output within that transaction.
    pub output_index: u32,
}

impl UtxoRef {
    /// Instantiate a new output reference.
    pub fn new(tx_hash: impl Into<String>, output_index: u32) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
        }
    }
}

/// The payload of an unspent output.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TxOutput {
    /// Address controlling the output.
    pub address: String,
    /// Assets locked in the output.
    pub amount: Vec<Asset>,
    /// Hash of a datum attached to the output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_hash: Option<String>,
    /// Inline datum carried by the output (hex-encoded plutus data), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plutus_data: Option<String>,
    /// Script reference carried by the output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_ref: Option<String>,
}

impl TxOutput {
    /// A plain output holding `amount` at `address`.
    pub fn new(address: impl Into<String>, amount: Vec<Asset>) -> Self {
        Self {
            address: address.into(),
            amount,
            data_hash: None,
            plutus_data: None,
            script_ref: None,
        }
    }
}

/// An unspent transaction output.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Utxo {
    /// Identity of the output.
    pub input: UtxoRef,
    /// The output's payload.
    pub output: TxOutput,
}

impl Utxo {
    /// Instantiate a UTXO from its reference and payload.
    pub fn new(input: UtxoRef, output: TxOutput) -> Self {
        Self { input, output }
    }

    /// Quantity of `unit` held by this output.
    pub fn quantity_of(&self, unit: &str) -> u64 {
        self.output
            .amount
            .iter()
            .filter(|asset| asset.unit == unit)
            .fold(0u64, |acc, asset| acc.saturating_add(asset.quantity))
    }

    /// Base-currency quantity held by this output.
    pub fn lovelace(&self) -> u64 {
        self.quantity_of(LOVELACE)
    }

    /// The output's assets aggregated per unit.
    pub fn value(&self) -> Value {
        Value::from_assets(&self.output.amount)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_orders_refs_by_hash_then_index() {
        let mut refs = vec![
            UtxoRef::new("bb", 0),
            UtxoRef::new("aa", 7),
            UtxoRef::new("aa", 2),
        ];
        refs.sort();
        assert_eq!(
            refs,
            vec![
                UtxoRef::new("aa", 2),
                UtxoRef::new("aa", 7),
                UtxoRef::new("bb", 0),
            ]
        );
    }

    #[test]
    fn it_sums_quantities_per_unit() {
        let utxo = Utxo::new(
            UtxoRef::new("aa", 0),
            TxOutput::new(
                "addr_test1example",
                vec![
                    Asset::lovelace(2_000_000),
                    Asset::new("tok", 3),
                    Asset::new("tok", 4),
                ],
            ),
        );
        assert_eq!(utxo.lovelace(), 2_000_000);
        assert_eq!(utxo.quantity_of("tok"), 7);
        assert_eq!(utxo.value().quantity_of("tok"), 7);
    }
}
