//! A producer thread feeds values into a shared `Subscriber` and then signals
//! completion. The main thread blocks until the subscriber reaches its
//! terminal state.
//!
//! To run this example, execute `cargo run --example basic_subscriber`.

use std::sync::Arc;

use rxo::{Disposable, Observer, Subscriber};

fn main() {
    // Create the `Subscriber` with a mandatory `next` function, then bind the
    // optional `complete` function.
    let mut subscriber = Subscriber::on_next(|v: i32| println!("Emitted {}", v));
    subscriber.on_complete(|| println!("Completed"));

    let subscriber = Arc::new(subscriber);
    let producer = Arc::clone(&subscriber);

    let handle = std::thread::spawn(move || {
        for i in 1..=10 {
            // A `ClosedObserverError` here would mean the stream was already
            // terminated from elsewhere.
            if producer.next(i).is_err() {
                break;
            }
        }

        // Signal completion to the subscriber.
        producer.complete().unwrap();
    });

    // Block until the producer drives the subscriber into the disposed state.
    subscriber.block();
    println!("Subscriber disposed: {}", subscriber.is_disposed());

    handle.join().unwrap();
}
