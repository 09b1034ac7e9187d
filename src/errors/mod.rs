mod observer_errors;

pub use observer_errors::*;
