//! A thread-safe observable cell: one value, synchronously notified
//! observers.
//!
//! [`Cell`] is a single atomic unit of observable state, meant as a
//! building block for reactive state propagation. It is not a dataflow
//! graph: there is no dependency tracking between cells, no computed
//! values and no asynchronous delivery. One cell, its observers,
//! nothing else.
//!
//! Changes are delivered under a two-phase snapshot discipline: the
//! value is stored and the observer list copied under the cell's
//! readers-writer lock, then each observer runs with the lock released.
//! That makes it safe for observers to subscribe, unsubscribe and read
//! on the cell that is currently notifying them. The flip side is that
//! an observer deregistered while a change is in flight may still see
//! that one change.
//!
//! Observer panics never escape a write: they are captured and handed
//! to the cell's error sink (see [`Cell::with_error_sink`]), or
//! swallowed if none is configured. Other observers still run.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use tropism::Cell;
//!
//! let counter = Cell::new(0);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let subscription = counter.subscribe({
//! 	let seen = Arc::clone(&seen);
//! 	move |value| seen.lock().unwrap().push(*value)
//! });
//!
//! counter.set(5);
//! counter.update(|value| value + 10);
//! counter.set(15); // Equal to the current value: no notification.
//!
//! assert_eq!(counter.get(), 15);
//! assert_eq!(*seen.lock().unwrap(), [5, 15]);
//!
//! drop(subscription); // Deregisters the observer.
//! counter.set(1);
//! assert_eq!(*seen.lock().unwrap(), [5, 15]);
//! ```

#![warn(clippy::pedantic)]

mod cell;
pub use cell::{Cell, CellGuard};

mod observer_panic;
pub use observer_panic::ObserverPanic;

mod raw;

mod subscription;
pub use subscription::Subscription;
