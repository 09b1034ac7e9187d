//! `rxo` provides the terminal consumer side of an event stream: a
//! thread-safe [`Subscriber`] that accepts values, a terminal error or a
//! completion signal, and transitions exactly once into a disposed state
//! that any number of other threads can query or block on.
//!
//! The upstream producer is an external collaborator; `rxo` deliberately
//! stops at the consumer lifecycle. There is no backpressure and no operator
//! chaining here, only the primitive the rest of a pipeline terminates in.
//!
//! A subscriber is built from a variadic set of [`EventHandler`] descriptors
//! (or the [`Subscriber::new`] convenience constructor); unset handler slots
//! default to no-ops. Whichever of `error`, `complete` or `dispose` reaches
//! the terminal transition first owns it: the terminal handler runs at most
//! once even under arbitrary races, and every later delivery attempt returns
//! [`ClosedObserverError`].
//!
//! The underlying one-shot broadcast, [`DisposalSignal`], is exposed as
//! well. It serves blocking OS-thread waiters and `Tokio` task waiters
//! alike, and duplicate signal requests are no-ops by construction.

pub mod disposal;
mod errors;
pub mod observer;
pub mod subscriber;

pub use disposal::DisposalSignal;
pub use errors::*;
pub use observer::{Disposable, Observer};
pub use subscriber::{EventHandler, Subscriber};
