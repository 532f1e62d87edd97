use core::pin::Pin;
use core::task::{Context, Poll};
use futures::stream::FusedStream;
use futures::{Future, Stream, ready};
use pin_project_lite::pin_project;
use tracing::info;

use crate::concurrency::signal::{StopSignal, Stopped};

pin_project! {
    /// A stream adapter that ends as soon as a [`StopSignal`] is triggered.
    ///
    /// The signal is checked before every poll of the inner stream, so no item is forwarded once
    /// the signal has fired, even if the inner stream has more ready. After it ends, the adapter
    /// keeps returning `None`.
    #[must_use = "streams do nothing unless polled"]
    #[derive(Debug)]
    pub struct StopStream<S> {
        #[pin]
        stream: S,
        stopped: Stopped,
        signal_name: String,
        terminated: bool,
    }
}

impl<S> StopStream<S> {
    /// Creates a new [`StopStream`] ending `stream` when `signal` is triggered.
    pub fn wrap(stream: S, signal: &StopSignal) -> Self {
        Self {
            stream,
            stopped: signal.stopped(),
            signal_name: signal.name().to_string(),
            terminated: false,
        }
    }

    /// Returns a pinned mutable reference to the wrapped stream.
    pub fn stream_mut(self: Pin<&mut Self>) -> Pin<&mut S> {
        self.project().stream
    }

    /// Consumes the adapter, returning the wrapped stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Stream> Stream for StopStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.terminated {
            return Poll::Ready(None);
        }

        if Pin::new(this.stopped).poll(cx).is_ready() {
            info!(signal = %this.signal_name, "stop signal received, ending stream");
            *this.terminated = true;
            return Poll::Ready(None);
        }

        match ready!(this.stream.poll_next(cx)) {
            Some(item) => Poll::Ready(Some(item)),
            None => {
                *this.terminated = true;
                Poll::Ready(None)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.terminated {
            return (0, Some(0));
        }

        // The signal may end the stream at any point.
        (0, self.stream.size_hint().1)
    }
}

impl<S: Stream> FusedStream for StopStream<S> {
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::future::poll_fn;
    use futures::stream;

    #[tokio::test]
    async fn forwards_items_until_inner_stream_ends() {
        let signal = StopSignal::new();
        let mut stream = StopStream::wrap(stream::iter(vec![1, 2, 3]), &signal);

        let items: Vec<_> = (&mut stream).collect().await;

        assert_eq!(items, vec![1, 2, 3]);
        assert!(stream.is_terminated());
        assert!(!signal.is_triggered());
    }

    #[tokio::test]
    async fn inner_stream_stays_reachable() {
        let signal = StopSignal::new();
        let mut stream = Box::pin(StopStream::wrap(stream::iter(vec![1, 2, 3]), &signal));

        assert_eq!(stream.as_mut().stream_mut().next().await, Some(1));
        assert_eq!(stream.next().await, Some(2));

        let stream = *Pin::into_inner(stream);
        let rest: Vec<_> = stream.into_inner().collect().await;
        assert_eq!(rest, vec![3]);
    }

    #[tokio::test]
    async fn ends_immediately_when_already_triggered() {
        let signal = StopSignal::new();
        signal.trigger();

        let mut stream = signal.wrap_stream(stream::iter(vec![1, 2, 3]));

        assert_eq!(stream.next().await, None);
        assert!(stream.is_terminated());
        assert_eq!(stream.size_hint(), (0, Some(0)));
    }

    #[tokio::test]
    async fn pending_inner_stream_ends_on_trigger() {
        let signal = StopSignal::new();
        let mut stream = Box::pin(signal.wrap_stream(stream::pending::<u32>()));

        poll_fn(|cx| match stream.as_mut().poll_next(cx) {
            Poll::Pending => Poll::Ready(()),
            _ => panic!("expected pending"),
        })
        .await;

        signal.trigger();

        assert_eq!(stream.next().await, None);
        assert_eq!(stream.next().await, None);
    }
}
