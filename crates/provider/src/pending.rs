//! Pending transaction watcher.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_core::stream::Stream;
use futures_util::stream::StreamExt;
use pin_project::pin_project;

use crate::{
    provider::{NodeProvider, TxState},
    utils::{new_interval, StreamLast},
    ProviderFut, DEFAULT_POLL_INTERVAL,
};

/// Transport failures tolerated before the watcher gives up.
pub const DEFAULT_ATTEMPT_LIMIT: usize = 20;

enum PendingTxStates<'a> {
    Submitting(ProviderFut<'a, String>),
    Paused,
    WaitingStateFut(ProviderFut<'a, TxState>),
    // Rejected, or the attempt budget ran out; must not be polled again
    Dropped,
    // Confirmed; must not be polled again
    Completed,
}

/// A submitted transaction. Periodically polls the API until it confirms.
///
/// This struct implements `futures::stream::Stream`. The transaction is not
/// submitted until the stream is first polled; the stream then yields the
/// tx hash with `TxState::Pending` on acceptance, yields again on a
/// terminal state, and finishes after `Confirmed` or `Rejected`.
///
/// Only transport failures spend the attempt budget; a transaction the
/// backend keeps reporting as pending is polled indefinitely. When the
/// budget runs out the stream simply ends, with no distinct failure item.
///
/// To get a future yielding a single event when the stream ends, use
/// `StreamLast::last()`.
#[pin_project(project = PendingTxProj)]
#[must_use = "streams do nothing unless polled"]
pub struct PendingTx<'a> {
    tx_hex: String,
    tx_hash: Option<String>,
    attempts_left: usize,
    state: PendingTxStates<'a>,
    interval: Box<dyn Stream<Item = ()> + Send + Unpin>,
    provider: &'a dyn NodeProvider,
}

impl<'a> PendingTx<'a> {
    /// Create a watcher that submits `tx_hex` when first polled.
    pub fn new(tx_hex: &str, provider: &'a dyn NodeProvider) -> Self {
        let hex = tx_hex.to_owned();
        let fut: ProviderFut<'a, String> =
            Box::pin(async move { provider.submit_tx(&hex).await });
        Self {
            tx_hex: tx_hex.to_owned(),
            tx_hash: None,
            attempts_left: DEFAULT_ATTEMPT_LIMIT,
            state: PendingTxStates::Submitting(fut),
            interval: Box::new(new_interval(DEFAULT_POLL_INTERVAL)),
            provider,
        }
    }

    /// Sets the polling interval.
    pub fn interval<T: Into<Duration>>(mut self, duration: T) -> Self {
        self.interval = Box::new(new_interval(duration.into()));
        self
    }

    /// Sets the transport-failure budget.
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts_left = attempts.max(1);
        self
    }

    /// The transaction hex this watcher submits.
    pub fn tx_hex(&self) -> &str {
        &self.tx_hex
    }

    /// The tx hash, once submission has been acknowledged.
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }
}

impl StreamLast for PendingTx<'_> {}

impl<'a> Stream for PendingTx<'a> {
    type Item = (String, TxState);

    fn poll_next(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let PendingTxProj {
            tx_hash,
            attempts_left,
            state,
            interval,
            provider,
            ..
        } = self.project();

        match state {
            PendingTxStates::Submitting(fut) => match futures_util::ready!(fut.as_mut().poll(ctx))
            {
                Ok(hash) => {
                    *tx_hash = Some(hash.clone());
                    *state = PendingTxStates::Paused;
                    ctx.waker().wake_by_ref();
                    return Poll::Ready(Some((hash, TxState::Pending)));
                }
                Err(e) => {
                    log::warn!("transaction submission failed: {e}");
                    *state = PendingTxStates::Dropped;
                    return Poll::Ready(None);
                }
            },
            PendingTxStates::Paused => {
                let hash = match tx_hash.clone() {
                    Some(hash) => hash,
                    None => {
                        *state = PendingTxStates::Dropped;
                        return Poll::Ready(None);
                    }
                };
                let this_provider = *provider;
                let fut = unpause!(ctx, interval, async move {
                    this_provider.fetch_tx_state(&hash).await
                });
                *state = PendingTxStates::WaitingStateFut(fut);
            }
            PendingTxStates::WaitingStateFut(fut) => {
                match futures_util::ready!(fut.as_mut().poll(ctx)) {
                    Ok(TxState::Confirmed) => {
                        *state = PendingTxStates::Completed;
                        ctx.waker().wake_by_ref();
                        let hash = tx_hash.clone().unwrap_or_default();
                        return Poll::Ready(Some((hash, TxState::Confirmed)));
                    }
                    Ok(TxState::Rejected) => {
                        *state = PendingTxStates::Dropped;
                        ctx.waker().wake_by_ref();
                        let hash = tx_hash.clone().unwrap_or_default();
                        return Poll::Ready(Some((hash, TxState::Rejected)));
                    }
                    Ok(TxState::Pending) => {
                        *state = PendingTxStates::Paused;
                        ctx.waker().wake_by_ref();
                    }
                    Err(e) => {
                        // Only failed polls spend the budget; "still
                        // pending" does not.
                        *attempts_left = attempts_left.saturating_sub(1);
                        if *attempts_left == 0 {
                            log::warn!("giving up on tx state polling: {e}");
                            *state = PendingTxStates::Dropped;
                            return Poll::Ready(None);
                        }
                        *state = PendingTxStates::Paused;
                        ctx.waker().wake_by_ref();
                    }
                }
            }
            PendingTxStates::Dropped => {
                return Poll::Ready(None);
            }
            PendingTxStates::Completed => {
                return Poll::Ready(None);
            }
        }
        Poll::Pending
    }
}
