use std::{
	collections::BTreeMap,
	panic::{catch_unwind, AssertUnwindSafe},
	sync::Arc,
};

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::ObserverPanic;

pub(crate) type Observer<T> = dyn Fn(&T) + Send + Sync;
pub(crate) type ErrorSink = dyn Fn(ObserverPanic) + Send + Sync;

/// Lock-level cell shared between [`Cell`](`crate::Cell`) handles and
/// [`Subscription`](`crate::Subscription`)s (which hold it weakly).
pub(crate) struct RawCell<T> {
	state: RwLock<State<T>>,
	on_error: Option<Box<ErrorSink>>,
}

/// Everything the exclusion protects.
struct State<T> {
	value: T,
	observers: BTreeMap<u64, Arc<Observer<T>>>,
	next_id: u64,
}

impl<T> RawCell<T> {
	pub(crate) fn new(initial_value: T, on_error: Option<Box<ErrorSink>>) -> Self {
		Self {
			state: RwLock::new(State {
				value: initial_value,
				observers: BTreeMap::new(),
				next_id: 0,
			}),
			on_error,
		}
	}

	pub(crate) fn get(&self) -> T
	where
		T: Copy,
	{
		self.state.read().value
	}

	pub(crate) fn get_clone(&self) -> T
	where
		T: Clone,
	{
		self.state.read().value.clone()
	}

	pub(crate) fn read(&self) -> MappedRwLockReadGuard<'_, T> {
		RwLockReadGuard::map(self.state.read(), |state| &state.value)
	}

	pub(crate) fn try_read(&self) -> Option<MappedRwLockReadGuard<'_, T>> {
		self.state
			.try_read()
			.map(|state| RwLockReadGuard::map(state, |state| &state.value))
	}

	pub(crate) fn set(&self, new_value: T)
	where
		T: PartialEq + Clone,
	{
		let mut state = self.state.write();
		if new_value == state.value {
			return;
		}
		let (observers, value) = Self::commit(&mut state, new_value);
		drop(state);
		self.notify(&observers, &value);
	}

	pub(crate) fn replace(&self, new_value: T)
	where
		T: Clone,
	{
		let mut state = self.state.write();
		let (observers, value) = Self::commit(&mut state, new_value);
		drop(state);
		self.notify(&observers, &value);
	}

	pub(crate) fn update(&self, update: impl FnOnce(&T) -> T)
	where
		T: PartialEq + Clone,
	{
		let mut state = self.state.write();
		// `update` runs under the exclusive lock. A panic here unwinds
		// through the guard before the value is assigned, so the cell
		// stays on its previous value and stays usable.
		let next = update(&state.value);
		if next == state.value {
			return;
		}
		let (observers, value) = Self::commit(&mut state, next);
		drop(state);
		self.notify(&observers, &value);
	}

	pub(crate) fn replace_with(&self, update: impl FnOnce(&T) -> T)
	where
		T: Clone,
	{
		let mut state = self.state.write();
		let next = update(&state.value);
		let (observers, value) = Self::commit(&mut state, next);
		drop(state);
		self.notify(&observers, &value);
	}

	pub(crate) fn subscribe(&self, observer: Arc<Observer<T>>) -> u64 {
		let mut state = self.state.write();
		let id = state.next_id;
		state.next_id += 1;
		state.observers.insert(id, observer);
		id
	}

	pub(crate) fn remove_observer(&self, id: u64) {
		self.state.write().observers.remove(&id);
	}

	/// Phase 1 tail: stores `next` and snapshots the registry and the
	/// stored value, all still under the caller's write guard.
	fn commit(state: &mut State<T>, next: T) -> (Vec<Arc<Observer<T>>>, T)
	where
		T: Clone,
	{
		state.value = next;
		let observers = state.observers.values().cloned().collect();
		(observers, state.value.clone())
	}

	/// Phase 2: runs with no lock held, so observers may freely call
	/// back into the cell (except for blocking on a guard they already
	/// hold themselves).
	fn notify(&self, observers: &[Arc<Observer<T>>], value: &T) {
		for observer in observers {
			// The closure only touches the snapshot, never the locked
			// state, so a panicking observer cannot leave the cell torn.
			if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer(value))) {
				if let Some(on_error) = &self.on_error {
					on_error(ObserverPanic::new(payload));
				}
			}
		}
	}
}
