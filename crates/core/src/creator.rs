//! The creator collaborator: the external identity (typically a wallet)
//! that supplies default addresses and spendable outputs.
//!
//! The core only consumes this interface. Each resolver method is invoked
//! at most once per `build` call per field it resolves; nothing is cached
//! across calls, so an I/O-bound collaborator pays that cost on every
//! build.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{address::Address, utxo::Utxo};

/// Failure of a creator collaborator call. The cause (transport, timeout,
/// or the collaborator's own error) is opaque to the core.
#[derive(Debug, Error)]
#[error("creator collaborator failure: {0}")]
pub struct CreatorError(Box<dyn std::error::Error + Send + Sync>);

impl CreatorError {
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

/// Abstract source of wallet-held UTXOs, collateral, and the default
/// change address.
#[async_trait]
pub trait Creator: Send + Sync {
    /// The collaborator's default receiving address.
    async fn get_change_address(&self) -> Result<Address, CreatorError>;

    /// The full currently-known spendable UTXO set for the bound identity.
    async fn get_used_utxos(&self) -> Result<Vec<Utxo>, CreatorError>;

    /// Pre-selected collateral-eligible UTXOs. The eligibility policy is
    /// owned by the collaborator, not by this crate.
    async fn get_used_collateral(&self) -> Result<Vec<Utxo>, CreatorError>;
}

#[async_trait]
impl<T> Creator for Arc<T>
where
    T: Creator + ?Sized,
{
    async fn get_change_address(&self) -> Result<Address, CreatorError> {
        (**self).get_change_address().await
    }

    async fn get_used_utxos(&self) -> Result<Vec<Utxo>, CreatorError> {
        (**self).get_used_utxos().await
    }

    async fn get_used_collateral(&self) -> Result<Vec<Utxo>, CreatorError> {
        (**self).get_used_collateral().await
    }
}
