use std::{
	borrow::Borrow,
	fmt::{self, Debug, Formatter},
	ops::Deref,
	sync::Arc,
};

use parking_lot::MappedRwLockReadGuard;

use crate::{raw::RawCell, ObserverPanic, Subscription};

/// A thread-safe observable cell.
///
/// Holds one value of type `T` behind a readers-writer lock and
/// synchronously notifies every registered observer whenever the value
/// changes. `Cell` is a cheaply cloneable shared handle; clones refer
/// to the same value and the same observers.
///
/// Writes run in two phases: the value is stored and the observer list
/// snapshotted under the lock, then observers run with the lock
/// released. Observers may therefore subscribe, unsubscribe and read
/// on the very cell that is notifying them. Writing from inside an
/// observer is allowed too, but recurses on the writer's stack, so the
/// recursion depth is bounded only by the caller.
pub struct Cell<T>(Arc<RawCell<T>>);

impl<T> Clone for Cell<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T: Debug> Debug for Cell<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let maybe_guard = self.0.try_read();
		f.debug_tuple("Cell")
			.field(
				maybe_guard
					.as_ref()
					.map_or_else(|| &"(locked)" as &dyn Debug, |guard| guard),
			)
			.finish()
	}
}

/// Shared-lock read guard over a [`Cell`]'s current value.
///
/// Writers (and subscriptions being released) block while any guard is
/// alive, so don't hold one across a `set`/`update` on the same thread.
pub struct CellGuard<'a, T>(MappedRwLockReadGuard<'a, T>);

impl<'a, T> Deref for CellGuard<'a, T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		self.borrow()
	}
}

impl<'a, T> Borrow<T> for CellGuard<'a, T> {
	fn borrow(&self) -> &T {
		&self.0
	}
}

impl<T> Cell<T> {
	/// Creates a cell holding `initial_value`, without an error sink:
	/// observer panics are swallowed after dispatch continues.
	pub fn new(initial_value: T) -> Self {
		Self(Arc::new(RawCell::new(initial_value, None)))
	}

	/// Creates a cell holding `initial_value` whose observer failures
	/// are forwarded to `on_error`.
	///
	/// The sink runs on whichever thread performed the triggering
	/// write, once per failing observer invocation. It is host code,
	/// not an observer: if the sink itself panics, that panic
	/// propagates out of the write.
	pub fn with_error_sink(
		initial_value: T,
		on_error: impl Fn(ObserverPanic) + Send + Sync + 'static,
	) -> Self {
		Self(Arc::new(RawCell::new(
			initial_value,
			Some(Box::new(on_error)),
		)))
	}

	/// Returns a copy of the current value.
	#[must_use]
	pub fn get(&self) -> T
	where
		T: Copy,
	{
		self.0.get()
	}

	/// Returns a clone of the current value.
	#[must_use]
	pub fn get_clone(&self) -> T
	where
		T: Clone,
	{
		self.0.get_clone()
	}

	/// Borrows the current value under the shared lock.
	#[must_use]
	pub fn read(&self) -> CellGuard<'_, T> {
		CellGuard(self.0.read())
	}

	/// Stores `new_value` and notifies observers, unless it equals the
	/// current value, in which case nothing happens at all: no state
	/// change and no notifications.
	///
	/// For `T` without an equality, see [`replace`](`Self::replace`).
	pub fn set(&self, new_value: T)
	where
		T: PartialEq + Clone,
	{
		self.0.set(new_value);
	}

	/// Stores `new_value` and notifies observers unconditionally.
	pub fn replace(&self, new_value: T)
	where
		T: Clone,
	{
		self.0.replace(new_value);
	}

	/// Stores `update(&current)` and notifies observers, unless the
	/// proposed value equals the current one (as in [`set`](`Self::set`)).
	///
	/// `update` runs under the cell's exclusive lock: it must not call
	/// back into this cell, or it will deadlock. A panic in `update`
	/// propagates to the caller and leaves the cell unmodified.
	pub fn update(&self, update: impl FnOnce(&T) -> T)
	where
		T: PartialEq + Clone,
	{
		self.0.update(update);
	}

	/// Stores `update(&current)` and notifies observers
	/// unconditionally. Same locking contract as [`update`](`Self::update`).
	pub fn replace_with(&self, update: impl FnOnce(&T) -> T)
	where
		T: Clone,
	{
		self.0.replace_with(update);
	}

	/// Registers `observer` and returns the [`Subscription`] that keeps
	/// it registered.
	///
	/// The observer is *not* called with the current value; it first
	/// fires on the next accepted change. Observers registered at the
	/// point of a change each fire exactly once per change, in
	/// unspecified order, with the value that change stored.
	pub fn subscribe(&self, observer: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
		let id = self.0.subscribe(Arc::new(observer));
		Subscription::new(Arc::downgrade(&self.0), id)
	}
}
