//! One-shot broadcast signal used to tell a group of workers to stop.
//!
//! A [`StopSignal`] wraps a tokio watch channel whose value is the `triggered` flag. The channel
//! provides everything the signal needs:
//! - its internal lock serializes the untriggered to triggered transition and lets queries read
//!   the flag concurrently;
//! - waiters check the current value before subscribing to changes, so a waiter that arrives
//!   after the release observes it immediately and no wakeup is lost.
//!
//! The sender lives inside the shared state of the signal. Every waiter holds a clone of the
//! signal, so the channel can never be observed as closed while someone is waiting on it.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use futures::Stream;
use futures::future::FusedFuture;
use metrics::counter;
use stop_signal_config::shared::StopSignalConfig;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::concurrency::future::StopResult;
use crate::concurrency::stream::StopStream;
use crate::error::{StopSignalError, StopSignalResult};
use crate::metrics::{SIGNAL_NAME_LABEL, STOP_SIGNAL_TRIGGERS_TOTAL};

#[derive(Debug)]
struct StopSignalInner {
    /// Holds `true` once the signal has been triggered.
    tx: watch::Sender<bool>,
    name: Cow<'static, str>,
    wait_timeout: Duration,
}

/// A one-shot stop signal shared by any number of workers.
///
/// Cloning a [`StopSignal`] is cheap and yields another handle to the same signal. The signal
/// lives as long as its longest-lived holder.
///
/// The signal starts untriggered. [`StopSignal::trigger`] moves it to the triggered state exactly
/// once; there is no way back.
#[derive(Debug, Clone)]
pub struct StopSignal {
    inner: Arc<StopSignalInner>,
}

impl StopSignal {
    /// Creates a new, untriggered signal with the default name.
    pub fn new() -> Self {
        Self::with_name(StopSignalConfig::DEFAULT_NAME)
    }

    /// Creates a new, untriggered signal labelled with `name` in logs and metrics.
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::build(
            name.into(),
            Duration::from_millis(StopSignalConfig::DEFAULT_WAIT_TIMEOUT_MS),
        )
    }

    /// Creates a new, untriggered signal from a [`StopSignalConfig`].
    ///
    /// Fails only if the configuration does not pass validation.
    pub fn from_config(config: &StopSignalConfig) -> StopSignalResult<Self> {
        config.validate()?;

        Ok(Self::build(
            Cow::Owned(config.name.clone()),
            config.wait_timeout(),
        ))
    }

    fn build(name: Cow<'static, str>, wait_timeout: Duration) -> Self {
        // Receivers are created on demand for each wait, so the initial one is not kept.
        let (tx, _) = watch::channel(false);

        Self {
            inner: Arc::new(StopSignalInner {
                tx,
                name,
                wait_timeout,
            }),
        }
    }

    /// Returns the name of the signal.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the timeout used by [`StopSignal::wait_default_timeout`].
    pub fn default_wait_timeout(&self) -> Duration {
        self.inner.wait_timeout
    }

    /// Triggers the signal, releasing every current and future waiter.
    ///
    /// Calling this more than once, from any number of threads, is allowed. Only the first call
    /// performs the release and returns `true`; every other call is a no-op returning `false`.
    pub fn trigger(&self) -> bool {
        let released = self.inner.tx.send_if_modified(|triggered| {
            if *triggered {
                return false;
            }

            *triggered = true;
            true
        });

        if released {
            counter!(
                STOP_SIGNAL_TRIGGERS_TOTAL,
                SIGNAL_NAME_LABEL => self.inner.name.to_string()
            )
            .increment(1);

            info!(signal = %self.name(), "stop signal triggered, releasing all waiters");
        } else {
            debug!(signal = %self.name(), "stop signal already triggered, ignoring");
        }

        released
    }

    /// Returns whether the signal has been triggered.
    ///
    /// A `true` result is permanent. A `false` result is only a snapshot: another holder may
    /// trigger the signal right after this call returns.
    pub fn is_triggered(&self) -> bool {
        *self.inner.tx.borrow()
    }

    /// Waits until the signal is triggered.
    ///
    /// Returns immediately if the signal was already triggered. Any number of tasks can wait at
    /// the same time; they are all released together, in no particular order.
    pub async fn wait(&self) {
        let mut rx = self.inner.tx.subscribe();

        // `self` keeps the sender alive, so the channel cannot close while we wait.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Returns an owned future that resolves once the signal is triggered.
    ///
    /// The returned [`Stopped`] is `'static`, `Send`, `Unpin` and fused, which makes it suitable
    /// for `tokio::select!` and `futures::select!` branches, spawned tasks and manual polling. It can be created as many
    /// times as needed.
    pub fn stopped(&self) -> Stopped {
        Stopped::new(self.clone())
    }

    /// Blocks the current thread until the signal is triggered.
    ///
    /// Meant for plain OS threads. It must not be called from within an async runtime, since it
    /// would block one of the runtime's worker threads.
    pub fn blocking_wait(&self) {
        futures::executor::block_on(self.wait());
    }

    /// Waits for the signal for at most `timeout`.
    ///
    /// Returns [`StopSignalError::WaitTimedOut`] if the signal was not triggered in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> StopSignalResult<()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StopSignalError::WaitTimedOut {
                name: self.name().to_string(),
                timeout,
            })
    }

    /// Waits for the signal for at most the configured default timeout.
    pub async fn wait_default_timeout(&self) -> StopSignalResult<()> {
        self.wait_timeout(self.inner.wait_timeout).await
    }

    /// Runs `future` until it completes or the signal is triggered, whichever comes first.
    ///
    /// The signal is checked first, so if it is already triggered the future is dropped without
    /// being polled.
    pub async fn run_until_stopped<F>(&self, future: F) -> StopResult<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;

            _ = self.wait() => StopResult::Stopped,
            output = future => StopResult::Ok(output),
        }
    }

    /// Wraps `stream` so that it ends as soon as the signal is triggered.
    pub fn wrap_stream<S>(&self, stream: S) -> StopStream<S>
    where
        S: Stream,
    {
        StopStream::wrap(stream, self)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`StopSignal::stopped`].
///
/// Resolves once the signal is triggered. Polling it again after it resolved returns
/// [`Poll::Ready`] immediately, since the release is permanent.
pub struct Stopped {
    wait: Option<Pin<Box<dyn Future<Output = ()> + Send>>>,
}

impl Stopped {
    fn new(signal: StopSignal) -> Self {
        let wait = Box::pin(async move { signal.wait().await });

        Self { wait: Some(wait) }
    }
}

impl Future for Stopped {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let Some(wait) = this.wait.as_mut() else {
            return Poll::Ready(());
        };

        ready!(wait.as_mut().poll(cx));

        // Drops the subscription together with the signal handle it holds.
        this.wait = None;

        Poll::Ready(())
    }
}

impl FusedFuture for Stopped {
    fn is_terminated(&self) -> bool {
        // A released handle keeps resolving immediately, so it is never done.
        false
    }
}

impl fmt::Debug for Stopped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stopped")
            .field("released", &self.wait.is_none())
            .finish()
    }
}
