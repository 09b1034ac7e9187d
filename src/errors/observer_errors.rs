use std::error::Error;
use std::fmt;

/// Error returned by event delivery methods once a subscriber has been
/// disposed.
///
/// Receiving this error means the event was dropped because the stream
/// already reached its terminal state. It is fully recoverable; callers are
/// expected to stop sending further events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedObserverError;

impl fmt::Display for ClosedObserverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "closed observer")
    }
}

impl Error for ClosedObserverError {}
