//! Re-exports of common types and traits.

pub use crate::{
    address::{Address, AddressError, KeyHash},
    builder::{TxBuildError, TxBuilder},
    checkpoint::{Checkpoint, Checkpoints},
    creator::{Creator, CreatorError},
    encode::{EncodeError, TxAssembly, TxEncoder},
    protocol::Protocol,
    select::{select, SelectionError, DEFAULT_LOVELACE_BUFFER},
    tx::{
        Certificate, Datum, ExUnits, LanguageVersion, Metadatum, Mint, PlutusScript, Recipient,
        Redeemer, ScriptInput, TxBuildOutput, TxMetadata, Withdrawal,
    },
    utxo::{TxOutput, Utxo, UtxoRef},
    values::{Asset, Value, LOVELACE, POLICY_ID_LENGTH},
};
