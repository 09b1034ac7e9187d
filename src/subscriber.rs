//! The `subscriber` module provides the terminal consumer of a stream:
//! a [`Subscriber`] holds the `next`, `error` and `complete` handlers and
//! governs the concurrency-safe disposal lifecycle, while [`EventHandler`]
//! describes the handler slots a subscriber is built from.

use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::Sender,
        Arc,
    },
};

use crate::{
    disposal::DisposalSignal,
    errors::ClosedObserverError,
    observer::{Disposable, Observer},
};

type NextFn<T> = Box<dyn Fn(T) + Send + Sync>;
type ErrorFn = Box<dyn Fn(Arc<dyn Error + Send + Sync>) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// A handler descriptor accepted by [`Subscriber::from_handlers`].
///
/// Each variant fills one slot of the subscriber being built; the
/// [`Template`](EventHandler::Template) variant adopts a fully formed
/// subscriber wholesale. The closed set of variants makes the role of every
/// supplied handler a compile-time choice.
pub enum EventHandler<T> {
    /// Handler invoked for every emitted value.
    Next(NextFn<T>),

    /// Handler invoked once if the stream terminates with an error.
    Error(ErrorFn),

    /// Handler invoked once if the stream completes normally.
    Complete(CompleteFn),

    /// A fully formed subscriber whose handlers and lifecycle state are
    /// adopted wholesale, replacing everything merged so far.
    Template(Subscriber<T>),
}

impl<T> EventHandler<T> {
    /// Wraps a closure as a `next` handler descriptor.
    pub fn next(f: impl Fn(T) + Send + Sync + 'static) -> Self {
        EventHandler::Next(Box::new(f))
    }

    /// Wraps a closure as an `error` handler descriptor.
    pub fn error(f: impl Fn(Arc<dyn Error + Send + Sync>) + Send + Sync + 'static) -> Self {
        EventHandler::Error(Box::new(f))
    }

    /// Wraps a closure as a `complete` handler descriptor.
    pub fn complete(f: impl Fn() + Send + Sync + 'static) -> Self {
        EventHandler::Complete(Box::new(f))
    }
}

impl<T> From<Subscriber<T>> for EventHandler<T> {
    fn from(s: Subscriber<T>) -> Self {
        EventHandler::Template(s)
    }
}

/// A thread-safe terminal consumer of a stream of values, errors and
/// completion signals.
///
/// A `Subscriber` is created fully initialized: every handler slot is bound
/// (unset slots get no-op defaults) and the lifecycle starts open. Arbitrary
/// threads may share one instance and invoke its methods concurrently; the
/// transition into the disposed state happens exactly once, whichever of
/// [`error`], [`complete`] or [`dispose`] reaches it first.
///
/// Once disposed, every delivery method returns [`ClosedObserverError`] and
/// invokes no handler. Other threads can poll the state with
/// [`is_disposed`], park in [`block`] until disposal, or await it from a
/// `Tokio` task with [`block_async`].
///
/// [`error`]: struct.Subscriber.html#method.error
/// [`complete`]: struct.Subscriber.html#method.complete
/// [`dispose`]: struct.Subscriber.html#method.dispose
/// [`is_disposed`]: struct.Subscriber.html#method.is_disposed
/// [`block`]: struct.Subscriber.html#method.block
/// [`block_async`]: struct.Subscriber.html#method.block_async
///
/// # Examples
///
/// A producer thread feeding a shared subscriber until completion.
///
///```
/// use std::sync::Arc;
///
/// use rxo::{Disposable, Observer, Subscriber};
///
/// let subscriber = Arc::new(Subscriber::new(
///     |v: i32| println!("emitted: {}", v),
///     |e| eprintln!("error: {}", e),
///     || println!("completed"),
/// ));
///
/// let producer = Arc::clone(&subscriber);
/// let handle = std::thread::spawn(move || {
///     for i in 0..10 {
///         if producer.next(i).is_err() {
///             break;
///         }
///     }
///     let _ = producer.complete();
/// });
///
/// // Park until the producer drives the subscriber into its terminal state.
/// subscriber.block();
/// assert!(subscriber.is_disposed());
///
/// handle.join().unwrap();
///```
pub struct Subscriber<T> {
    next_fn: NextFn<T>,
    error_fn: ErrorFn,
    complete_fn: CompleteFn,
    // Decides the single winner of the open -> disposing transition.
    terminating: AtomicBool,
    // Publishes the disposed state to queries and waiters.
    disposal: DisposalSignal,
}

impl<T> Subscriber<T> {
    /// Creates a new `Subscriber` with the provided `next`, `error` and
    /// `complete` handlers.
    pub fn new(
        next_fn: impl Fn(T) + 'static + Send + Sync,
        error_fn: impl Fn(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
        complete_fn: impl Fn() + 'static + Send + Sync,
    ) -> Self {
        Subscriber {
            next_fn: Box::new(next_fn),
            error_fn: Box::new(error_fn),
            complete_fn: Box::new(complete_fn),
            terminating: AtomicBool::new(false),
            disposal: DisposalSignal::new(),
        }
    }

    /// Creates a new `Subscriber` with the provided `next` handler; the
    /// `error` and `complete` slots get the no-op defaults.
    pub fn on_next(next_fn: impl Fn(T) + 'static + Send + Sync) -> Self {
        Subscriber::from_handlers([EventHandler::next(next_fn)])
    }

    /// Builds a `Subscriber` by merging a sequence of handler descriptors.
    ///
    /// Descriptors are folded in order. For the `next`, `error` and
    /// `complete` kinds the last descriptor of a given kind wins; duplicates
    /// are not an error. A [`EventHandler::Template`] replaces the entire
    /// in-progress set, handlers and lifecycle state alike, and later
    /// descriptors still override individual slots on top of it. Any slot
    /// left unset is bound to the no-op default for its kind, so the
    /// resulting subscriber is always fully populated.
    ///
    /// # Examples
    ///
    ///```
    /// use rxo::{EventHandler, Observer, Subscriber};
    ///
    /// let subscriber = Subscriber::from_handlers([
    ///     EventHandler::next(|_: i32| println!("first")),
    ///     EventHandler::error(|e| eprintln!("error: {}", e)),
    ///     EventHandler::next(|v: i32| println!("last wins: {}", v)),
    /// ]);
    ///
    /// subscriber.next(1).unwrap();
    ///```
    pub fn from_handlers(handlers: impl IntoIterator<Item = EventHandler<T>>) -> Self {
        let mut next_fn: Option<NextFn<T>> = None;
        let mut error_fn: Option<ErrorFn> = None;
        let mut complete_fn: Option<CompleteFn> = None;
        let mut lifecycle: Option<(AtomicBool, DisposalSignal)> = None;

        for handler in handlers {
            match handler {
                EventHandler::Next(f) => next_fn = Some(f),
                EventHandler::Error(f) => error_fn = Some(f),
                EventHandler::Complete(f) => complete_fn = Some(f),
                EventHandler::Template(s) => {
                    next_fn = Some(s.next_fn);
                    error_fn = Some(s.error_fn);
                    complete_fn = Some(s.complete_fn);
                    lifecycle = Some((s.terminating, s.disposal));
                }
            }
        }

        let (terminating, disposal) = lifecycle
            .unwrap_or_else(|| (AtomicBool::new(false), DisposalSignal::new()));

        Subscriber {
            next_fn: next_fn.unwrap_or_else(|| Box::new(|_| {})),
            error_fn: error_fn.unwrap_or_else(|| Box::new(|_| {})),
            complete_fn: complete_fn.unwrap_or_else(|| Box::new(|| {})),
            terminating,
            disposal,
        }
    }

    /// Replaces the `error` handler. Builder-phase only: the subscriber has
    /// not been shared yet, hence the `&mut self` receiver.
    pub fn on_error(
        &mut self,
        error_fn: impl Fn(Arc<dyn Error + Send + Sync>) + 'static + Send + Sync,
    ) {
        self.error_fn = Box::new(error_fn);
    }

    /// Replaces the `complete` handler. Builder-phase only.
    pub fn on_complete(&mut self, complete_fn: impl Fn() + 'static + Send + Sync) {
        self.complete_fn = Box::new(complete_fn);
    }

    /// Routes `item` to the `next` or `error` handler based on its variant,
    /// with no lifecycle side effects.
    ///
    /// Unlike [`error`](Self::error), an `Err` delivered here does not
    /// dispose the subscriber; this is raw dispatch for contexts that manage
    /// the lifecycle themselves.
    pub fn handle(&self, item: Result<T, Arc<dyn Error + Send + Sync>>) {
        match item {
            Ok(v) => (self.next_fn)(v),
            Err(e) => (self.error_fn)(e),
        }
    }

    /// Suspends the calling thread until the subscriber is disposed. Returns
    /// immediately if it already is. May be called from any number of
    /// threads, including before any terminal event has occurred.
    pub fn block(&self) {
        self.disposal.wait();
    }

    /// Asynchronous counterpart of [`block`](Self::block): completes once
    /// the subscriber is disposed.
    pub async fn block_async(&self) {
        self.disposal.notified().await;
    }

    // Wins the open -> disposing transition for at most one caller. Losers
    // must not run a terminal handler nor touch the signal.
    fn begin_disposal(&self) -> bool {
        !self.terminating.swap(true, Ordering::AcqRel)
    }
}

impl<T> Default for Subscriber<T> {
    /// A subscriber with all three handler slots bound to the no-op
    /// defaults: values are discarded, errors swallowed, completion ignored.
    fn default() -> Self {
        Subscriber::from_handlers([])
    }
}

impl<T> Observer for Subscriber<T> {
    type NextFnType = T;

    /// Applies the `next` handler to an emitted value.
    ///
    /// Never blocks and never takes part in the terminal transition; it only
    /// reads the published disposal state. Calls may overlap freely across
    /// threads.
    fn next(&self, v: Self::NextFnType) -> Result<(), ClosedObserverError> {
        if self.disposal.is_signaled() {
            return Err(ClosedObserverError);
        }
        (self.next_fn)(v);
        Ok(())
    }

    /// Delivers a terminal error: the winning caller invokes the `error`
    /// handler exactly once and then publishes the disposed state.
    ///
    /// Racing callers of `error`, `complete` and `dispose` lose the atomic
    /// test-and-set and return [`ClosedObserverError`] without touching any
    /// handler, so at most one terminal handler ever fires per subscriber.
    fn error(&self, e: Arc<dyn Error + Send + Sync>) -> Result<(), ClosedObserverError> {
        if !self.begin_disposal() {
            return Err(ClosedObserverError);
        }
        (self.error_fn)(e);
        self.disposal.signal();
        Ok(())
    }

    /// Delivers normal completion: the winning caller invokes the `complete`
    /// handler exactly once and then publishes the disposed state. Mutually
    /// exclusive with [`error`](Self::error) winning.
    fn complete(&self) -> Result<(), ClosedObserverError> {
        if !self.begin_disposal() {
            return Err(ClosedObserverError);
        }
        (self.complete_fn)();
        self.disposal.signal();
        Ok(())
    }
}

impl<T> Disposable for Subscriber<T> {
    /// Requests disposal without invoking any terminal handler.
    ///
    /// Idempotent: calling it again, or after a handler-driven disposal
    /// already occurred, has no effect and does not fail.
    fn dispose(&self) {
        if self.begin_disposal() {
            self.disposal.signal();
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposal.is_signaled()
    }

    fn notify(&self, target: &Sender<()>) {
        // Nothing to deliver when the receiving side is already gone.
        let _ = target.send(());
    }
}
