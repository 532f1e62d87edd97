//! Concurrency primitives for coordinating worker shutdown.
//!
//! # Coordination Patterns
//!
//! ## Broadcast Stop
//!
//! The [`signal`] module implements a one-shot broadcast: a single [`StopSignal`] is shared by
//! every worker, any holder may trigger it, and all waiters are released together exactly once.
//! Waiters that arrive after the release return immediately.
//!
//! ## Composition
//!
//! The primitive has no notion of timeouts or cancellation of its own. Callers combine it with
//! other wait sources:
//! - [`Stopped`] is an owned future that can sit in a `tokio::select!` next to timers, channels
//!   or I/O.
//! - [`future::StopResult`] reports whether interruptible work finished or was cut short.
//! - [`stream::StopStream`] ends a stream as soon as the signal fires.
//!
//! [`StopSignal`]: signal::StopSignal
//! [`Stopped`]: signal::Stopped

pub mod future;
pub mod signal;
pub mod stream;
