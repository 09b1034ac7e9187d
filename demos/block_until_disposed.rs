//! Several threads park in `block()` while another thread disposes the
//! subscriber explicitly. All waiters are released by the single disposal;
//! no terminal handler runs because `dispose()` bypasses them.
//!
//! To run this example, execute `cargo run --example block_until_disposed`.

use std::sync::Arc;
use std::time::Duration;

use rxo::{Disposable, Subscriber};

fn main() {
    let subscriber = Arc::new(Subscriber::<i32>::from_handlers([]));

    let waiters: Vec<_> = (1..=3)
        .map(|id| {
            let subscriber = Arc::clone(&subscriber);
            std::thread::spawn(move || {
                println!("Waiter {} parked", id);
                subscriber.block();
                println!("Waiter {} released", id);
            })
        })
        .collect();

    let disposer = Arc::clone(&subscriber);
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(100));
        // Duplicate disposal requests are benign no-ops.
        disposer.dispose();
        disposer.dispose();
    });

    for w in waiters {
        w.join().unwrap();
    }

    println!("Disposed: {}", subscriber.is_disposed());
}
