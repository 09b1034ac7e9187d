//! A `Tokio` task produces values and terminates the stream with an error
//! while the main task awaits disposal through `block_async()`.
//!
//! To run this example, execute `cargo run --example async_block`.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tokio::time::{sleep, Duration};

use rxo::{Observer, Subscriber};

#[derive(Debug)]
struct ProducerErr;

impl fmt::Display for ProducerErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "producer gave up")
    }
}

impl Error for ProducerErr {}

#[tokio::main]
async fn main() {
    let subscriber = Arc::new(Subscriber::new(
        |v: u32| println!("Emitted {}", v),
        |e| eprintln!("Error: {}", e),
        || println!("Completed"),
    ));

    let producer = Arc::clone(&subscriber);
    tokio::task::spawn(async move {
        for i in 1..=5 {
            if producer.next(i).is_err() {
                break;
            }
            sleep(Duration::from_millis(50)).await;
        }
        // Terminate with an error; the `error` handler runs exactly once.
        let _ = producer.error(Arc::new(ProducerErr));
    });

    subscriber.block_async().await;
    println!("Stream terminated");
}
