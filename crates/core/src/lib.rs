//! Multi-asset UTXO transaction construction.
//!
//! This crate builds well-formed, balanced transactions for a multi-asset
//! UTXO ledger: the caller describes the outputs it wants (payments, token
//! transfers, metadata, certificates), and [`builder::TxBuilder`] resolves
//! whatever was left unset — inputs via coin selection, change address,
//! collateral, required signers — before delegating serialization to an
//! external encoder.
//!
//! ## Crate layout
//!
//! * [`values`] and [`utxo`] hold the immutable value and unspent-output
//!   model everything else is written against.
//! * [`select`] is the coin selection engine: per-unit greedy,
//!   largest-first, multi-asset aware.
//! * [`checkpoint`] records which builder operations the caller invoked
//!   explicitly, which is how auto-resolution distinguishes "unset" from
//!   "set to empty".
//! * [`creator`] and [`encode`] are the two collaborator seams: the wallet
//!   side supplying UTXOs and addresses, and the serialization library the
//!   finished structure is handed to. Both are consumed, not implemented,
//!   here.
//! * [`builder`] ties the pieces together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod address;
pub mod builder;
pub mod checkpoint;
pub mod creator;
pub mod encode;
pub mod prelude;
pub mod protocol;
pub mod select;
pub mod tx;
pub mod utxo;
pub mod values;

pub use builder::{TxBuildError, TxBuilder};
pub use creator::{Creator, CreatorError};
pub use encode::{TxAssembly, TxEncoder};
