//! Testing utilities for code that coordinates workers through a [`StopSignal`].
//!
//! - [`wait`] wraps a signal so that waits in tests panic after a timeout instead of hanging.
//! - [`waiters`] spawns groups of waiter tasks and tracks how many of them were released.
//!
//! [`StopSignal`]: crate::StopSignal

pub mod wait;
pub mod waiters;
