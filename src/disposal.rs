//! One-shot disposal broadcast used by subscribers to publish their terminal
//! state.
//!
//! A [`DisposalSignal`] starts open and transitions to signaled exactly once.
//! Any number of threads can query the state without blocking, park in
//! [`wait`] until the transition happens, or await it from a `Tokio` task
//! through [`notified`]. Repeated [`signal`] calls are no-ops, so duplicate
//! disposal requests coming from racing threads are benign.
//!
//! [`signal`]: struct.DisposalSignal.html#method.signal
//! [`wait`]: struct.DisposalSignal.html#method.wait
//! [`notified`]: struct.DisposalSignal.html#method.notified

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex,
};

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    signaled: AtomicBool,
    state: Mutex<bool>,
    cond: Condvar,
    notify: Notify,
}

/// A one-shot, multi-reader broadcast flag.
///
/// Cloning is shallow; all clones observe the same signal. The transition is
/// monotonic: once signaled it never reverts, and every subsequent query or
/// wait observes the signaled state.
///
/// # Examples
///
///```
/// use rxo::DisposalSignal;
///
/// let signal = DisposalSignal::new();
/// let signal_c = signal.clone();
///
/// let waiter = std::thread::spawn(move || signal_c.wait());
///
/// signal.signal();
/// signal.signal(); // Second call is a no-op, not a fault.
///
/// waiter.join().unwrap();
/// assert!(signal.is_signaled());
///```
#[derive(Debug, Default, Clone)]
pub struct DisposalSignal {
    inner: Arc<Inner>,
}

impl DisposalSignal {
    /// Creates a new signal in the open state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions the signal into the signaled state and releases every
    /// waiter, blocking and async alike.
    ///
    /// Safe to call more than once from any number of threads; the atomic
    /// swap picks a single caller to perform the notification work and turns
    /// all later calls into no-ops.
    pub fn signal(&self) {
        if self.inner.signaled.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut signaled = self.inner.state.lock().unwrap();
        *signaled = true;
        self.inner.cond.notify_all();
        drop(signaled);
        self.inner.notify.notify_waiters();
    }

    /// Returns `true` if the signal has fired. Never blocks.
    #[must_use]
    pub fn is_signaled(&self) -> bool {
        self.inner.signaled.load(Ordering::Acquire)
    }

    /// Blocks the calling thread until the signal fires. Returns immediately
    /// if it already has. Any number of threads may wait concurrently; all of
    /// them are released once, in no particular order.
    pub fn wait(&self) {
        let mut signaled = self.inner.state.lock().unwrap();
        while !*signaled {
            signaled = self.inner.cond.wait(signaled).unwrap();
        }
    }

    /// Asynchronous counterpart of [`wait`](Self::wait): completes when the
    /// signal fires, immediately if it already has.
    pub async fn notified(&self) {
        // Register interest before re-checking the flag so a signal() landing
        // between the check and the await cannot be missed.
        loop {
            if self.is_signaled() {
                return;
            }
            let notified = self.inner.notify.notified();
            if self.is_signaled() {
                return;
            }
            notified.await;
        }
    }
}
