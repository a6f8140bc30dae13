/// What happened to the state when a load completed (or did not start).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the previous state.
    Applied,
    /// A newer request for the same resource was issued; the response was dropped.
    Stale,
    /// The request was aborted or superseded before responding. Not an error.
    Cancelled,
    /// The request failed; the shared error flag should be raised.
    Failed,
    /// Preconditions were not met, so nothing was requested.
    Skipped,
}

impl LoadOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, LoadOutcome::Failed)
    }
}
