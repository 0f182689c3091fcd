//! The encoder seam: the external library that turns a fully-resolved
//! transaction structure into bytes.
//!
//! The builder never serializes anything itself. It assembles a
//! `TxAssembly` and delegates to whatever `TxEncoder` it was constructed
//! with; fee computation, minimum-output adjustment, change splitting, and
//! ledger-rule validation all live behind this seam.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    address::{Address, KeyHash},
    protocol::Protocol,
    tx::{Certificate, Mint, ScriptInput, TxBuildOutput, TxMetadata, Withdrawal},
    utxo::Utxo,
};

/// Failure surfaced by an external encoder. The cause is preserved but its
/// taxonomy is the encoder's own; callers should not match on it.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EncodeError(Box<dyn std::error::Error + Send + Sync>);

impl EncodeError {
    /// Wrap an underlying cause.
    pub fn new<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(cause))
    }

    /// Instantiate from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self(message.into().into())
    }
}

/// The fully-resolved structure handed to the encoder.
///
/// Every field is final by the time the encoder sees it: auto-resolution
/// has already run, and the encoder may rely on the change address and
/// input set being populated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TxAssembly {
    /// Outputs being spent.
    pub inputs: Vec<Utxo>,
    /// Script-locked spends with their witnesses.
    pub script_inputs: Vec<ScriptInput>,
    /// Requested outputs.
    pub outputs: Vec<TxBuildOutput>,
    /// Where leftover value is returned.
    pub change_address: Address,
    /// Payment key hashes that must witness the transaction.
    pub required_signers: Vec<KeyHash>,
    /// Collateral backing script execution.
    pub collaterals: Vec<Utxo>,
    /// Mints and burns.
    pub mints: Vec<Mint>,
    /// Certificates carried by the transaction.
    pub certificates: Vec<Certificate>,
    /// Reward withdrawals.
    pub withdrawals: Vec<Withdrawal>,
    /// First slot the transaction is valid in, if bounded.
    pub invalid_before: Option<u64>,
    /// First slot the transaction is no longer valid in, if bounded.
    pub invalid_after: Option<u64>,
    /// Label-keyed metadata. May be empty.
    pub metadata: TxMetadata,
}

/// External encoder contract.
///
/// Synchronous by design: all network-dependent resolution happens before
/// this call, and the protocol parameters were captured at builder
/// construction.
pub trait TxEncoder: Send + Sync {
    /// Encode the assembled transaction under `params`, returning the hex
    /// text of the finalized transaction.
    fn encode_tx(&self, tx: &TxAssembly, params: &Protocol) -> Result<String, EncodeError>;
}

impl<T> TxEncoder for Arc<T>
where
    T: TxEncoder + ?Sized,
{
    fn encode_tx(&self, tx: &TxAssembly, params: &Protocol) -> Result<String, EncodeError> {
        (**self).encode_tx(tx, params)
    }
}
