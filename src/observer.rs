use std::{error::Error, sync::Arc};

use crate::errors::ClosedObserverError;

/// A terminal consumer of a stream of values, errors and completion signals.
///
/// All methods take `&self` so one instance can be shared between threads.
/// Delivery fails with [`ClosedObserverError`] once the observer is disposed.
pub trait Observer {
    type NextFnType;

    fn next(&self, _: Self::NextFnType) -> Result<(), ClosedObserverError>;
    fn error(&self, _: Arc<dyn Error + Send + Sync>) -> Result<(), ClosedObserverError>;
    fn complete(&self) -> Result<(), ClosedObserverError>;
}

/// Lifecycle surface of a disposable observer.
pub trait Disposable {
    /// Requests the transition into the disposed state without invoking any
    /// terminal handler. Repeated calls are no-ops.
    fn dispose(&self);

    /// Non-blocking snapshot of whether the disposed state has been published.
    fn is_disposed(&self) -> bool;

    /// Delivers exactly one signal to `target`. This is a generic one-shot
    /// handoff for collaborators that need a single rendezvous; it is
    /// independent of the observer's own disposal state.
    fn notify(&self, target: &std::sync::mpsc::Sender<()>);
}
