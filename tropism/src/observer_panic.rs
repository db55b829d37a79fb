use std::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
};

/// An observer failure captured during notification dispatch.
///
/// Wraps the unwind payload of a panicking observer, as handed to the
/// error sink configured with
/// [`Cell::with_error_sink`](`crate::Cell::with_error_sink`).
pub struct ObserverPanic {
	payload: Box<dyn Any + Send>,
}

impl ObserverPanic {
	pub(crate) fn new(payload: Box<dyn Any + Send>) -> Self {
		Self { payload }
	}

	/// The panic message, for the common `&str` and `String` payloads.
	#[must_use]
	pub fn message(&self) -> Option<&str> {
		self.payload
			.downcast_ref::<&'static str>()
			.copied()
			.or_else(|| self.payload.downcast_ref::<String>().map(String::as_str))
	}

	/// The raw unwind payload.
	#[must_use]
	pub fn payload(&self) -> &(dyn Any + Send) {
		&*self.payload
	}

	/// Unwraps the raw unwind payload, e.g. to resume unwinding with it.
	#[must_use]
	pub fn into_payload(self) -> Box<dyn Any + Send> {
		self.payload
	}
}

impl Debug for ObserverPanic {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ObserverPanic")
			.field("message", &self.message())
			.finish_non_exhaustive()
	}
}

impl Display for ObserverPanic {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self.message() {
			Some(message) => f.write_str(message),
			None => f.write_str("(opaque panic payload)"),
		}
	}
}
