use std::{
	fmt::{self, Debug, Formatter},
	sync::Weak,
};

use crate::raw::RawCell;

/// Keeps one observer registered on one [`Cell`](`crate::Cell`).
///
/// The handle does not keep the cell alive: it holds a weak
/// back-reference, and every release path degrades to a no-op once the
/// cell is gone. Dropping the handle is the primary deregistration
/// path; [`unsubscribe`](`Self::unsubscribe`) is the explicit one.
///
/// A `Subscription` is a unique resource. Moving it transfers the
/// registration; rebinding a variable (or overwriting an `inert`
/// placeholder) drops the previous handle first, which releases the
/// previous observer.
#[must_use = "subscriptions are cancelled when dropped"]
pub struct Subscription<T> {
	owner: Weak<RawCell<T>>,
	id: u64,
}

impl<T> Subscription<T> {
	pub(crate) fn new(owner: Weak<RawCell<T>>, id: u64) -> Self {
		Self { owner, id }
	}

	/// Creates a handle that is already released, as a placeholder to
	/// assign a live subscription into later.
	pub fn inert() -> Self {
		Self {
			owner: Weak::new(),
			id: 0,
		}
	}

	/// Removes the observer from its cell.
	///
	/// Idempotent, and a no-op if the cell has already been destroyed.
	/// Safe to call from any thread, including from inside an observer
	/// of the same cell.
	pub fn unsubscribe(&mut self) {
		if let Some(owner) = self.owner.upgrade() {
			owner.remove_observer(self.id);
		}
		self.owner = Weak::new();
	}

	/// Whether this handle no longer registers anything, either because
	/// it was released or because its cell has been destroyed.
	#[must_use]
	pub fn is_released(&self) -> bool {
		self.owner.strong_count() == 0
	}
}

impl<T> Default for Subscription<T> {
	fn default() -> Self {
		Self::inert()
	}
}

impl<T> Debug for Subscription<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("released", &self.is_released())
			.finish_non_exhaustive()
	}
}

impl<T> Drop for Subscription<T> {
	fn drop(&mut self) {
		if let Some(owner) = self.owner.upgrade() {
			owner.remove_observer(self.id);
		}
	}
}
