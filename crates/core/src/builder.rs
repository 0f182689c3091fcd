//! The transaction builder orchestrator.
//!
//! A builder accumulates requested outputs and fields through chained
//! mutating calls, each of which marks a checkpoint. `build` then resolves
//! whatever the caller left unset — required signers, collateral, inputs,
//! change address, in that order — and hands one self-consistent structure
//! to the encoder. Resolution is driven by the checkpoint set, not by field
//! emptiness: a field explicitly set to an empty list is honored as-is.
//!
//! `build` resolves into a local assembly and never writes back into the
//! builder, so a failed build leaves the accumulated state untouched and a
//! repeated build re-runs every checkpoint-gated branch (including the
//! collaborator calls — nothing is memoized).

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    address::{Address, AddressError, KeyHash},
    checkpoint::{Checkpoint, Checkpoints},
    creator::{Creator, CreatorError},
    encode::{EncodeError, TxAssembly, TxEncoder},
    protocol::Protocol,
    select::{select, SelectionError, DEFAULT_LOVELACE_BUFFER},
    tx::{
        Certificate, Metadatum, Mint, Recipient, ScriptInput, TxBuildOutput, TxMetadata,
        Withdrawal,
    },
    utxo::{Utxo, UtxoRef},
    values::{Asset, Value},
};

/// Errors produced by [`TxBuilder::build`].
#[derive(Debug, Error)]
pub enum TxBuildError {
    /// Coin selection could not cover the requirement for a unit.
    #[error("insufficient funds: short {shortfall} of unit {unit}")]
    InsufficientFunds {
        /// The unit that cannot be covered.
        unit: String,
        /// Quantity missing after exhausting the pool.
        shortfall: u64,
    },
    /// An auto-fillable field is unset and no creator is bound to resolve
    /// it. A self-custody caller must set the field explicitly.
    #[error("no creator bound: cannot auto-resolve {0}")]
    NoCreatorBound(&'static str),
    /// The creator collaborator's own call failed.
    #[error(transparent)]
    Collaborator(#[from] CreatorError),
    /// The external encoder rejected the assembled structure. The cause is
    /// preserved but not further subdivided.
    #[error("transaction build failed: {0}")]
    BuildFailed(#[source] EncodeError),
}

impl From<SelectionError> for TxBuildError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::InsufficientFunds { unit, shortfall } => {
                TxBuildError::InsufficientFunds { unit, shortfall }
            }
        }
    }
}

/// Builder-pattern interface for constructing transactions.
///
/// Mutating operations consume and return the builder for chaining. The
/// terminal [`build`](TxBuilder::build) call borrows it, so a builder can
/// be retried after a failed build or rebuilt with fresh collaborator
/// state.
pub struct TxBuilder {
    encoder: Box<dyn TxEncoder>,
    creator: Option<Box<dyn Creator>>,
    protocol: Protocol,
    lovelace_buffer: u64,
    checkpoints: Checkpoints,
    tx_inputs: Vec<Utxo>,
    script_inputs: Vec<ScriptInput>,
    tx_outputs: Vec<TxBuildOutput>,
    change_address: Option<Address>,
    required_signers: Vec<KeyHash>,
    collaterals: Vec<Utxo>,
    mints: Vec<Mint>,
    certificates: Vec<Certificate>,
    withdrawals: Vec<Withdrawal>,
    invalid_before: Option<u64>,
    invalid_after: Option<u64>,
    metadata: TxMetadata,
}

impl TxBuilder {
    /// Instantiate a builder that delegates final assembly to `encoder`,
    /// with the default protocol snapshot and no creator bound.
    pub fn new<E>(encoder: E) -> Self
    where
        E: TxEncoder + 'static,
    {
        Self {
            encoder: Box::new(encoder),
            creator: None,
            protocol: Protocol::default(),
            lovelace_buffer: DEFAULT_LOVELACE_BUFFER,
            checkpoints: Checkpoints::new(),
            tx_inputs: Vec::new(),
            script_inputs: Vec::new(),
            tx_outputs: Vec::new(),
            change_address: None,
            required_signers: Vec::new(),
            collaterals: Vec::new(),
            mints: Vec::new(),
            certificates: Vec::new(),
            withdrawals: Vec::new(),
            invalid_before: None,
            invalid_after: None,
            metadata: TxMetadata::default(),
        }
    }

    /// Replace the protocol parameter snapshot passed to the encoder.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Bind the creator collaborator used to auto-resolve unset fields.
    pub fn creator<C>(mut self, creator: C) -> Self
    where
        C: Creator + 'static,
    {
        self.creator = Some(Box::new(creator));
        self
    }

    /// Override the base-currency margin required by coin selection.
    pub fn lovelace_buffer(mut self, buffer: u64) -> Self {
        self.lovelace_buffer = buffer;
        self
    }

    // -- mutating operations; each marks its checkpoint -- //

    /// Add an output paying `assets` to `recipient`.
    pub fn send_assets(mut self, recipient: impl Into<Recipient>, assets: Vec<Asset>) -> Self {
        self.tx_outputs.push(TxBuildOutput {
            recipient: recipient.into(),
            amount: assets,
        });
        self.checkpoints.mark(Checkpoint::SendAssets);
        self
    }

    /// Add an output paying `lovelace` of the base currency to `recipient`.
    pub fn send_lovelace(mut self, recipient: impl Into<Recipient>, lovelace: u64) -> Self {
        self.tx_outputs.push(TxBuildOutput {
            recipient: recipient.into(),
            amount: vec![Asset::lovelace(lovelace)],
        });
        self.checkpoints.mark(Checkpoint::SendLovelace);
        self
    }

    /// Add an output paying `quantity` of the token `unit` to `recipient`.
    pub fn send_token(
        mut self,
        recipient: impl Into<Recipient>,
        unit: impl Into<String>,
        quantity: u64,
    ) -> Self {
        self.tx_outputs.push(TxBuildOutput {
            recipient: recipient.into(),
            amount: vec![Asset::new(unit, quantity)],
        });
        self.checkpoints.mark(Checkpoint::SendToken);
        self
    }

    /// Add an output forwarding the whole amount of `value` to `recipient`.
    pub fn send_value(mut self, recipient: impl Into<Recipient>, value: &Utxo) -> Self {
        self.tx_outputs.push(TxBuildOutput {
            recipient: recipient.into(),
            amount: value.output.amount.clone(),
        });
        self.checkpoints.mark(Checkpoint::SendValue);
        self
    }

    /// Set the change address for the transaction.
    pub fn set_change_address(mut self, address: impl Into<Address>) -> Self {
        self.change_address = Some(address.into());
        self.checkpoints.mark(Checkpoint::SetChangeAddress);
        self
    }

    /// Set the collateral UTXOs for the transaction. An explicitly empty
    /// list suppresses collateral auto-resolution.
    pub fn set_collateral(mut self, collateral: Vec<Utxo>) -> Self {
        self.collaterals = collateral;
        self.checkpoints.mark(Checkpoint::SetCollateral);
        self
    }

    /// Set the metadata entry for `label`, replacing any previous value.
    pub fn set_metadata(mut self, label: u64, value: impl Into<Metadatum>) -> Self {
        self.metadata.insert(label, value.into());
        self.checkpoints.mark(Checkpoint::SetMetadata);
        self
    }

    /// Append the payment credentials of `addresses` to the required
    /// signers. Fails if an address does not decode.
    pub fn set_required_signers(mut self, addresses: &[Address]) -> Result<Self, AddressError> {
        for address in addresses {
            self.required_signers.push(address.payment_key_hash()?);
        }
        self.checkpoints.mark(Checkpoint::SetRequiredSigners);
        Ok(self)
    }

    /// Set the first slot the transaction is valid in.
    pub fn set_time_to_start(mut self, slot: u64) -> Self {
        self.invalid_before = Some(slot);
        self.checkpoints.mark(Checkpoint::SetTimeToStart);
        self
    }

    /// Set the slot the transaction expires at.
    pub fn set_time_to_expire(mut self, slot: u64) -> Self {
        self.invalid_after = Some(slot);
        self.checkpoints.mark(Checkpoint::SetTimeToExpire);
        self
    }

    /// Set the inputs for the transaction. These are fixed spends the
    /// builder honors exactly; setting them suppresses input
    /// auto-resolution.
    pub fn set_tx_inputs(mut self, inputs: Vec<Utxo>) -> Self {
        self.tx_inputs = inputs;
        self.checkpoints.mark(Checkpoint::SetTxInputs);
        self
    }

    /// Spend a script-locked output. Marks the transaction as requiring
    /// script-redeemer witnessing, which makes `build` resolve required
    /// signers and collateral when the caller has not.
    pub fn redeem_value(mut self, input: ScriptInput) -> Self {
        self.script_inputs.push(input);
        self.checkpoints.mark(Checkpoint::RedeemValue);
        self
    }

    /// Accumulate a mint or burn.
    pub fn add_mint(mut self, mint: Mint) -> Self {
        self.mints.push(mint);
        self.checkpoints.mark(Checkpoint::AddMint);
        self
    }

    /// Accumulate a certificate.
    pub fn add_certificate(mut self, certificate: Certificate) -> Self {
        self.certificates.push(certificate);
        self.checkpoints.mark(Checkpoint::AddCertificate);
        self
    }

    /// Accumulate a reward withdrawal.
    pub fn add_withdrawal(mut self, withdrawal: Withdrawal) -> Self {
        self.withdrawals.push(withdrawal);
        self.checkpoints.mark(Checkpoint::AddWithdrawal);
        self
    }

    // -- build -- //

    /// Resolve unset fields and encode the transaction, returning its hex
    /// text.
    ///
    /// Resolution runs sequentially: required signers and collateral (only
    /// when a script spend is present), then inputs, then the change
    /// address, then the synchronous encode. Collaborator calls never
    /// overlap for one builder instance.
    pub async fn build(&self) -> Result<String, TxBuildError> {
        let mut required_signers = self.required_signers.clone();
        let mut collaterals = self.collaterals.clone();

        // Script-locked spends need a signer and collateral even when the
        // caller supplied neither.
        if self.checkpoints.visited(Checkpoint::RedeemValue) {
            if !self.checkpoints.visited(Checkpoint::SetRequiredSigners) {
                if let Some(creator) = self.creator.as_deref() {
                    let address = creator.get_change_address().await?;
                    let hash = address.payment_key_hash().map_err(CreatorError::new)?;
                    required_signers.push(hash);
                }
            }
            if !self.checkpoints.visited(Checkpoint::SetCollateral) {
                if let Some(creator) = self.creator.as_deref() {
                    collaterals = creator.get_used_collateral().await?;
                }
            }
        }

        let inputs = if self.checkpoints.visited(Checkpoint::SetTxInputs) {
            self.tx_inputs.clone()
        } else {
            self.resolve_inputs().await?
        };

        let change_address = match &self.change_address {
            Some(address) => address.clone(),
            None => match self.creator.as_deref() {
                Some(creator) => creator.get_change_address().await?,
                None => return Err(TxBuildError::NoCreatorBound("change address")),
            },
        };

        let assembly = TxAssembly {
            inputs,
            script_inputs: self.script_inputs.clone(),
            outputs: self.tx_outputs.clone(),
            change_address,
            required_signers,
            collaterals,
            mints: self.mints.clone(),
            certificates: self.certificates.clone(),
            withdrawals: self.withdrawals.clone(),
            invalid_before: self.invalid_before,
            invalid_after: self.invalid_after,
            metadata: self.metadata.clone(),
        };

        self.encoder
            .encode_tx(&assembly, &self.protocol)
            .map_err(TxBuildError::BuildFailed)
    }

    /// Select inputs from the creator's pool covering the accumulated
    /// outputs.
    async fn resolve_inputs(&self) -> Result<Vec<Utxo>, TxBuildError> {
        let creator = self
            .creator
            .as_deref()
            .ok_or(TxBuildError::NoCreatorBound("transaction inputs"))?;

        let pool = creator.get_used_utxos().await?;

        // Script spends already consume their own outputs.
        let spent: BTreeSet<&UtxoRef> = self
            .script_inputs
            .iter()
            .map(|input| &input.utxo.input)
            .collect();
        let pool: Vec<Utxo> = pool
            .into_iter()
            .filter(|utxo| !spent.contains(&utxo.input))
            .collect();

        let mut required = Value::new();
        for output in &self.tx_outputs {
            required.extend_assets(&output.amount);
        }

        Ok(select(&required, &pool, self.lovelace_buffer)?)
    }
}
