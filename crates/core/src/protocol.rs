//! Ledger protocol parameters.
//!
//! A `Protocol` snapshot is captured once at builder construction and passed
//! to the encoder on every build. The defaults below match current mainnet
//! values and are suitable for offline use and tests.

use serde::{Deserialize, Serialize};

/// A snapshot of ledger protocol parameters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Protocol {
    /// Epoch the snapshot was taken in.
    pub epoch: u64,
    /// Linear fee coefficient (per byte).
    pub min_fee_a: u64,
    /// Linear fee constant.
    pub min_fee_b: u64,
    /// Maximum block body size, in bytes.
    pub max_block_size: u64,
    /// Maximum transaction size, in bytes.
    pub max_tx_size: u32,
    /// Maximum block header size, in bytes.
    pub max_block_header_size: u64,
    /// Deposit charged when registering a stake credential.
    pub key_deposit: u64,
    /// Deposit charged when registering a pool.
    pub pool_deposit: u64,
    /// Minimum declarable pool cost.
    pub min_pool_cost: u64,
    /// Script execution price per memory unit.
    pub price_mem: f64,
    /// Script execution price per cpu step.
    pub price_step: f64,
    /// Per-transaction script memory budget.
    pub max_tx_ex_mem: u64,
    /// Per-transaction script step budget.
    pub max_tx_ex_steps: u64,
    /// Per-block script memory budget.
    pub max_block_ex_mem: u64,
    /// Per-block script step budget.
    pub max_block_ex_steps: u64,
    /// Maximum serialized value size, in bytes.
    pub max_val_size: u32,
    /// Collateral required, as a percentage of the script fee.
    pub collateral_percent: u32,
    /// Maximum number of collateral inputs.
    pub max_collateral_inputs: u32,
    /// Deposit per byte of UTXO storage.
    pub coins_per_utxo_size: u64,
    /// Fraction of blocks produced by federated nodes. Retired; kept for
    /// wire compatibility.
    pub decentralisation: f64,
}

impl Default for Protocol {
    fn default() -> Self {
        Self {
            epoch: 0,
            min_fee_a: 44,
            min_fee_b: 155_381,
            max_block_size: 98_304,
            max_tx_size: 16_384,
            max_block_header_size: 1_100,
            key_deposit: 2_000_000,
            pool_deposit: 500_000_000,
            min_pool_cost: 340_000_000,
            price_mem: 0.0577,
            price_step: 0.000_072_1,
            max_tx_ex_mem: 16_000_000,
            max_tx_ex_steps: 10_000_000_000,
            max_block_ex_mem: 80_000_000,
            max_block_ex_steps: 40_000_000_000,
            max_val_size: 5_000,
            collateral_percent: 150,
            max_collateral_inputs: 3,
            coins_per_utxo_size: 4_310,
            decentralisation: 0.0,
        }
    }
}
