use std::{
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Barrier,
    },
    thread,
    time::Duration,
};

use rxo::{ClosedObserverError, Disposable, EventHandler, Observer, Subscriber};

#[derive(Debug)]
struct StreamErr;

impl fmt::Display for StreamErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "stream error")
    }
}

impl Error for StreamErr {}

fn counting_subscriber() -> (Arc<Subscriber<usize>>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let errors = Arc::new(AtomicUsize::new(0));
    let completes = Arc::new(AtomicUsize::new(0));

    let errors_c = Arc::clone(&errors);
    let completes_c = Arc::clone(&completes);

    let s = Arc::new(Subscriber::from_handlers([
        EventHandler::error(move |_| {
            errors_c.fetch_add(1, Ordering::SeqCst);
        }),
        EventHandler::complete(move || {
            completes_c.fetch_add(1, Ordering::SeqCst);
        }),
    ]));
    (s, errors, completes)
}

#[test]
fn concurrent_dispose_is_idempotent() {
    let (s, errors, completes) = counting_subscriber();
    let barrier = Arc::new(Barrier::new(50));

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                s.dispose();
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(s.is_disposed());
    // Explicit disposal never runs a terminal handler, no matter how many
    // threads request it.
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    assert_eq!(completes.load(Ordering::SeqCst), 0);
}

#[test]
fn racing_completions_run_handler_exactly_once() {
    let (s, _, completes) = counting_subscriber();
    let barrier = Arc::new(Barrier::new(100));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                s.complete().is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1, "exactly one complete() call may win");
    assert_eq!(completes.load(Ordering::SeqCst), 1);
    assert!(s.is_disposed());
}

#[test]
fn racing_terminal_causes_are_mutually_exclusive() {
    let (s, errors, completes) = counting_subscriber();
    let barrier = Arc::new(Barrier::new(40));

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let s = Arc::clone(&s);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                match i % 3 {
                    0 => s.error(Arc::new(StreamErr)).is_ok(),
                    1 => s.complete().is_ok(),
                    _ => {
                        s.dispose();
                        false
                    }
                }
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    let fired = errors.load(Ordering::SeqCst) + completes.load(Ordering::SeqCst);
    assert!(
        fired <= 1,
        "terminal handlers fired {} times, may fire at most once",
        fired
    );
    assert_eq!(
        winners, fired,
        "every handler invocation must belong to a winning call"
    );
    assert!(s.is_disposed());
}

#[test]
fn disposal_rejects_every_later_delivery() {
    let nexts = Arc::new(AtomicUsize::new(0));
    let nexts_c = Arc::clone(&nexts);
    let s = Arc::new(Subscriber::on_next(move |_: usize| {
        nexts_c.fetch_add(1, Ordering::SeqCst);
    }));

    assert!(s.next(1).is_ok());
    s.dispose();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let s = Arc::clone(&s);
            thread::spawn(move || {
                assert_eq!(s.next(i), Err(ClosedObserverError));
                assert_eq!(s.error(Arc::new(StreamErr)), Err(ClosedObserverError));
                assert_eq!(s.complete(), Err(ClosedObserverError));
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // Only the pre-disposal value reached the handler.
    assert_eq!(nexts.load(Ordering::SeqCst), 1);
}

#[test]
fn block_is_released_by_dispose() {
    let s = Arc::new(Subscriber::<usize>::default());

    let waiters: Vec<_> = (0..5)
        .map(|_| {
            let s = Arc::clone(&s);
            thread::spawn(move || s.block())
        })
        .collect();

    // Give the waiters a moment to park before disposing.
    thread::sleep(Duration::from_millis(20));
    s.dispose();

    for w in waiters {
        w.join().unwrap();
    }
}

#[test]
fn block_returns_immediately_after_disposal() {
    let (s, _, completes) = counting_subscriber();

    s.complete().unwrap();
    assert_eq!(completes.load(Ordering::SeqCst), 1);

    // The disposing call has returned, so the state is already published.
    s.block();
    assert!(s.is_disposed());
}

#[test]
fn block_is_released_by_terminal_error() {
    let (s, errors, _) = counting_subscriber();

    let waiter = {
        let s = Arc::clone(&s);
        thread::spawn(move || s.block())
    };

    thread::sleep(Duration::from_millis(20));
    s.error(Arc::new(StreamErr)).unwrap();

    waiter.join().unwrap();
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[test]
fn notify_rendezvous_with_external_waiter() {
    let s = Arc::new(Subscriber::<usize>::default());
    let (tx, rx) = mpsc::channel();

    let notifier = {
        let s = Arc::clone(&s);
        thread::spawn(move || s.notify(&tx))
    };

    rx.recv().unwrap();
    notifier.join().unwrap();
}

#[test]
fn producer_stops_on_closed_observer() {
    let nexts = Arc::new(AtomicUsize::new(0));
    let nexts_c = Arc::clone(&nexts);
    let s = Arc::new(Subscriber::on_next(move |_: usize| {
        nexts_c.fetch_add(1, Ordering::SeqCst);
    }));

    let producer = {
        let s = Arc::clone(&s);
        thread::spawn(move || {
            let mut delivered = 0;
            for i in 0.. {
                if s.next(i).is_err() {
                    break;
                }
                delivered += 1;
            }
            delivered
        })
    };

    thread::sleep(Duration::from_millis(10));
    s.dispose();

    let delivered = producer.join().unwrap();
    assert_eq!(delivered, nexts.load(Ordering::SeqCst));
}
