use thiserror::Error;

use crate::subject::SubjectError;

/// Errors returned by [`Sublist`](super::Sublist) mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SublistError {
	/// Subject or pattern failed validation
	#[error("Malformed subject: {0}")]
	MalformedSubject(#[from] SubjectError),

	/// No equal subscription is registered on the pattern's path
	#[error("Subscription on '{subject}' (queue: {queue:?}) not found")]
	NotFound {
		subject: String,
		queue: Option<String>,
	},
}

impl SublistError {
	/// Creates a new NotFound error
	pub fn not_found(subject: impl Into<String>, queue: Option<&str>) -> Self {
		Self::NotFound {
			subject: subject.into(),
			queue: queue.map(str::to_string),
		}
	}

	/// Returns true for [`SublistError::NotFound`].
	///
	/// Idempotent unsubscribe treats this case as success.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

/// Convenient Result type for sublist operations
pub type SublistResult<T> = Result<T, SublistError>;
