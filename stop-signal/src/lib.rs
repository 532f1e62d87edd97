//! One-shot broadcast stop signal for coordinating the shutdown of concurrent workers.
//!
//! A [`StopSignal`] is created once, cloned into every worker that needs to observe it, and
//! triggered by any holder (or an external controller). Triggering is idempotent: the first
//! call releases every current and future waiter, later calls are no-ops.
//!
//! ```rust,no_run
//! use stop_signal::StopSignal;
//!
//! # async fn worker(id: usize, signal: StopSignal) {}
//! # #[tokio::main]
//! # async fn main() {
//! let signal = StopSignal::new();
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|id| tokio::spawn(worker(id, signal.clone())))
//!     .collect();
//!
//! signal.trigger();
//! for handle in handles {
//!     handle.await.unwrap();
//! }
//! # }
//! ```

pub mod concurrency;
pub mod error;
pub mod metrics;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use concurrency::future::StopResult;
pub use concurrency::signal::{StopSignal, Stopped};
pub use concurrency::stream::StopStream;
pub use error::{StopSignalError, StopSignalResult};
