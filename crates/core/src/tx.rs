//! Structural transaction components accumulated by the builder.
//!
//! These carry no algorithmic weight; they exist so mints, certificates,
//! withdrawals, metadata, and script spends can be accumulated and handed
//! to the encoder in one self-consistent structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{address::Address, utxo::Utxo, values::Asset};

/// Where an output's value is locked: an address, optionally with a datum.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Recipient {
    /// Destination address.
    pub address: Address,
    /// Datum attached to the produced output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<Datum>,
}

impl Recipient {
    /// A plain address recipient.
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
            datum: None,
        }
    }

    /// Attach a datum to the produced output.
    pub fn with_datum(mut self, datum: Datum) -> Self {
        self.datum = Some(datum);
        self
    }
}

impl From<Address> for Recipient {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl From<&str> for Recipient {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// A datum attached to an output or spend.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Datum {
    /// Only the datum hash is carried in the output.
    Hash(String),
    /// The plutus data itself (hex-encoded), carried inline.
    Inline(String),
}

/// A requested output, accumulated before `build`.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TxBuildOutput {
    /// Who receives the value.
    pub recipient: Recipient,
    /// The assets to lock there.
    pub amount: Vec<Asset>,
}

/// Plutus language version of a script.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub enum LanguageVersion {
    /// Plutus V1.
    V1,
    /// Plutus V2.
    V2,
}

/// A serialized plutus script.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PlutusScript {
    /// Hex-encoded script bytes.
    pub code: String,
    /// Language version the script was compiled for.
    pub version: LanguageVersion,
}

/// Execution budget claimed by a redeemer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExUnits {
    /// Memory units.
    pub mem: u64,
    /// Cpu steps.
    pub steps: u64,
}

impl Default for ExUnits {
    fn default() -> Self {
        // Generous default budget; the encoder trims it after evaluation.
        Self {
            mem: 7_000_000,
            steps: 3_000_000_000,
        }
    }
}

/// Arguments presented when spending a script-locked output.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Redeemer {
    /// Hex-encoded plutus data passed to the script.
    pub data: String,
    /// Execution budget.
    pub ex_units: ExUnits,
}

/// A script-locked spend the transaction must witness.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct ScriptInput {
    /// The output being spent.
    pub utxo: Utxo,
    /// The validator guarding it.
    pub script: PlutusScript,
    /// The datum the output was locked with.
    pub datum: Datum,
    /// Arguments for the validator.
    pub redeemer: Redeemer,
}

/// A mint or burn of a native asset. Negative quantities burn.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    /// Token unit being minted or burned.
    pub unit: String,
    /// Signed quantity.
    pub quantity: i64,
}

/// Certificates a transaction can carry.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Certificate {
    /// Register a stake credential.
    StakeRegistration {
        /// Hash of the stake key being registered.
        stake_key_hash: String,
    },
    /// Deregister a stake credential.
    StakeDeregistration {
        /// Hash of the stake key being deregistered.
        stake_key_hash: String,
    },
    /// Delegate a stake credential to a pool.
    StakeDelegation {
        /// Hash of the delegating stake key.
        stake_key_hash: String,
        /// Bech32 pool id delegated to.
        pool_id: String,
    },
    /// Retire a pool at an epoch boundary.
    PoolRetirement {
        /// Bech32 pool id being retired.
        pool_id: String,
        /// Epoch the retirement takes effect.
        epoch: u64,
    },
}

/// A reward-account withdrawal.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    /// Bech32 reward address drawn from.
    pub reward_address: String,
    /// Amount withdrawn.
    pub lovelace: u64,
}

/// A single metadata value.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub enum Metadatum {
    /// A signed integer.
    Int(i64),
    /// A text string.
    Text(String),
    /// A byte string.
    Bytes(Vec<u8>),
    /// A list of metadata values.
    List(Vec<Metadatum>),
    /// A key-value map of metadata values.
    Map(Vec<(Metadatum, Metadatum)>),
}

impl From<&str> for Metadatum {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Metadatum {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Metadatum {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Label-keyed transaction metadata.
#[derive(Serialize, Deserialize, Clone, Debug, Default, Eq, PartialEq)]
#[serde(transparent)]
pub struct TxMetadata(BTreeMap<u64, Metadatum>);

impl TxMetadata {
    /// True if no entry was set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set the entry for `label`, replacing any previous value.
    pub fn insert(&mut self, label: u64, value: Metadatum) {
        self.0.insert(label, value);
    }

    /// The entry for `label`, if set.
    pub fn get(&self, label: u64) -> Option<&Metadatum> {
        self.0.get(&label)
    }

    /// Iterate entries in label order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Metadatum)> {
        self.0.iter().map(|(label, value)| (*label, value))
    }
}
