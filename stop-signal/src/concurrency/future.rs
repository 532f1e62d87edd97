/// Outcome of work that can be interrupted by a [`StopSignal`](crate::StopSignal).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult<T> {
    /// The work completed before the signal was triggered.
    Ok(T),
    /// The signal was triggered before the work completed.
    Stopped,
}

impl<T> StopResult<T> {
    /// Returns `true` if the work was interrupted by the signal.
    pub fn is_stopped(&self) -> bool {
        matches!(self, StopResult::Stopped)
    }

    /// Converts into an [`Option`], discarding the stopped case.
    pub fn ok(self) -> Option<T> {
        match self {
            StopResult::Ok(value) => Some(value),
            StopResult::Stopped => None,
        }
    }

    /// Maps the completed value with `f`, leaving the stopped case untouched.
    pub fn map<U, F>(self, f: F) -> StopResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            StopResult::Ok(value) => StopResult::Ok(f(value)),
            StopResult::Stopped => StopResult::Stopped,
        }
    }
}

impl<T> From<StopResult<T>> for Option<T> {
    fn from(result: StopResult<T>) -> Self {
        result.ok()
    }
}
