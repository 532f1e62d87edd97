//! Metrics definitions for stop signal monitoring.

/// Label for the signal name in metrics.
pub const SIGNAL_NAME_LABEL: &str = "signal_name";

/// Counter for stop signal releases.
///
/// Incremented once per signal, by the call that actually performs the release.
pub const STOP_SIGNAL_TRIGGERS_TOTAL: &str = "stop_signal_triggers_total";
