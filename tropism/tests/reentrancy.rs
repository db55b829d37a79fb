//! Dispatch holds no lock, so observers may call back into the cell
//! that is notifying them.

use std::sync::{
	atomic::{AtomicUsize, Ordering::Relaxed},
	Arc, Mutex,
};

use tropism::{Cell, Subscription};

use _validator::Validator;

// An observer registered during dispatch does not fire for the change
// that is in flight, only for later ones.
#[test]
fn observer_may_subscribe_on_its_own_cell() {
	let v = Validator::new();
	let cell = Cell::new(0);
	let late: Arc<Mutex<Option<Subscription<i32>>>> = Arc::new(Mutex::new(None));
	let _sub = cell.subscribe({
		let v = v.clone();
		let cell = cell.clone();
		let late = Arc::clone(&late);
		move |value| {
			v.push(("outer", *value));
			let mut late = late.lock().unwrap();
			if late.is_none() {
				let v = v.clone();
				*late = Some(cell.subscribe(move |value| v.push(("inner", *value))));
			}
		}
	});

	cell.set(1);
	cell.set(2);

	v.expect([("outer", 1), ("outer", 2), ("inner", 2)]);
}

#[test]
fn observer_may_release_its_own_handle() {
	let count = Arc::new(AtomicUsize::new(0));
	let cell = Cell::new(0);
	let slot: Arc<Mutex<Option<Subscription<i32>>>> = Arc::new(Mutex::new(None));
	let sub = cell.subscribe({
		let count = Arc::clone(&count);
		let slot = Arc::clone(&slot);
		move |_| {
			count.fetch_add(1, Relaxed);
			if let Some(mut own) = slot.lock().unwrap().take() {
				own.unsubscribe();
			}
		}
	});
	*slot.lock().unwrap() = Some(sub);

	cell.set(1);
	cell.set(2);

	assert_eq!(count.load(Relaxed), 1);
}

// Releasing a sibling mid-dispatch cannot retract its snapshotted
// invocation: the sibling still sees the in-flight change, then stops.
#[test]
fn observer_may_release_another_observer() {
	let v = Validator::new();
	let cell = Cell::new(0);
	let sibling: Arc<Mutex<Option<Subscription<i32>>>> = Arc::new(Mutex::new(None));
	let _first = cell.subscribe({
		let v = v.clone();
		let sibling = Arc::clone(&sibling);
		move |value| {
			v.push(("first", *value));
			if let Some(mut sibling) = sibling.lock().unwrap().take() {
				sibling.unsubscribe();
			}
		}
	});
	let second = cell.subscribe({
		let v = v.clone();
		move |value| v.push(("second", *value))
	});
	*sibling.lock().unwrap() = Some(second);

	cell.set(1);
	cell.set(2);

	v.expect([("first", 1), ("second", 1), ("first", 2)]);
}

#[test]
fn observer_may_read_its_own_cell() {
	let v = Validator::new();
	let cell = Cell::new(0);
	let _sub = cell.subscribe({
		let v = v.clone();
		let cell = cell.clone();
		move |value| v.push((*value, cell.get()))
	});

	cell.set(3);

	v.expect([(3, 3)]);
}

// Writing from an observer recurses on the writer's stack; the
// observer is responsible for bounding the recursion.
#[test]
fn observer_may_write_its_own_cell() {
	let v = Validator::new();
	let cell = Cell::new(0);
	let _sub = cell.subscribe({
		let v = v.clone();
		let cell = cell.clone();
		move |value| {
			v.push(*value);
			if *value < 3 {
				cell.set(value + 1);
			}
		}
	});

	cell.set(1);

	v.expect([1, 2, 3]);
	assert_eq!(cell.get(), 3);
}
