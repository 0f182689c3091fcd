use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_core::Stream;
use futures_timer::Delay;
use futures_util::{
    stream::{self, StreamExt},
    FutureExt,
};
use pin_project::pin_project;
use serde::Deserialize;

use crate::provider::ProviderError;

// Async delay stream
pub(crate) fn new_interval(duration: Duration) -> impl Stream<Item = ()> + Send + Unpin {
    stream::unfold((), move |_| Delay::new(duration).map(|_| Some(((), ())))).map(drop)
}

/// GET a URL and JSON-deserialize the body. Non-success statuses become
/// `ProviderError::Http` with the body attached.
pub(crate) async fn get_json<T>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
) -> Result<T, ProviderError>
where
    T: for<'a> Deserialize<'a>,
{
    let res = client.get(url).header("api-key", api_key).send().await?;
    let status = res.status().as_u16();
    let body = res.text().await?;
    if !(200..300).contains(&status) {
        return Err(ProviderError::Http { status, body });
    }
    Ok(serde_json::from_str(&body)?)
}

/// POST hex-encoded CBOR as raw bytes. Returns the status and body for the
/// caller to judge; only transport failures error here.
pub(crate) async fn post_cbor(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    tx_hex: &str,
) -> Result<(u16, String), ProviderError> {
    let bytes = hex::decode(tx_hex)
        .map_err(|e| ProviderError::BadParameter(format!("transaction hex: {e}")))?;
    let res = client
        .post(url)
        .header("api-key", api_key)
        .header("Content-Type", "application/cbor")
        .body(bytes)
        .send()
        .await?;
    let status = res.status().as_u16();
    let body = res.text().await?;
    Ok((status, body))
}

/// Future for the `last` method. Resolves to the last item in the stream.
#[pin_project(project = LastProj)]
#[derive(Debug)]
#[must_use = "futures do nothing unless awaited or polled"]
pub struct Last<St, I>
where
    St: Stream<Item = I> + StreamExt,
{
    #[pin]
    stream: St,
    item: Option<I>,
}

impl<St, I> Last<St, I>
where
    St: Stream<Item = I> + StreamExt,
{
    fn new(stream: St) -> Last<St, I> {
        Self { stream, item: None }
    }
}

/// Extension trait for streams. Provides a future that resolves to the last
/// item in the stream.
pub trait StreamLast: Sized + Stream + StreamExt {
    /// Consume this stream, return a future that resolves to the last item.
    /// Resolves to `None` if the stream was empty.
    ///
    /// Note: this future relies on correct implementation of the `Stream`
    /// trait. If the stream never terminates, the future never resolves.
    fn last(self) -> Last<Self, <Self as Stream>::Item> {
        Last::new(self)
    }
}

impl<St, I> Future for Last<St, I>
where
    St: Sized + Stream<Item = I> + StreamExt,
{
    type Output = Option<I>;

    fn poll(self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Option<I>> {
        let LastProj { mut stream, item } = self.project();

        loop {
            match futures_util::ready!(stream.as_mut().poll_next(ctx)) {
                Some(i) => *item = Some(i),
                None => return Poll::Ready(item.take()),
            }
        }
    }
}
