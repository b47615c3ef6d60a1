//! Error types for the command registry.

use thiserror::Error;

/// Errors that can occur while collecting commands.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// A command with the same name is already registered.
	#[error("command already registered: {name}")]
	DuplicateName {
		/// Name of the duplicate command.
		name: String,
	},

	/// The command name cannot be turned into path segments.
	#[error("invalid command name '{name}': {reason}")]
	InvalidName {
		/// The rejected name.
		name: String,
		/// Why it was rejected.
		reason: String,
	},

	/// The command signature is malformed.
	#[error("invalid signature for {command}: {reason}")]
	InvalidSignature {
		/// Command owning the signature.
		command: String,
		/// Why it was rejected.
		reason: String,
	},

	/// The requested command was not found.
	#[error("command not found: {0}")]
	NotFound(String),

	/// A command source could not be read or parsed.
	#[error("command source error: {message}")]
	Source {
		/// Description of the failure.
		message: String,
	},
}

impl RegistryError {
	/// Create a DuplicateName error.
	pub fn duplicate_name(name: impl Into<String>) -> Self {
		Self::DuplicateName { name: name.into() }
	}

	/// Create an InvalidName error.
	pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidName {
			name: name.into(),
			reason: reason.into(),
		}
	}

	/// Create an InvalidSignature error.
	pub fn invalid_signature(command: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::InvalidSignature {
			command: command.into(),
			reason: reason.into(),
		}
	}

	/// Create a Source error.
	pub fn source(message: impl Into<String>) -> Self {
		Self::Source {
			message: message.into(),
		}
	}
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = RegistryError::duplicate_name("make:model");
		assert!(err.to_string().contains("make:model"));
		assert!(err.to_string().contains("already registered"));

		let err = RegistryError::invalid_name("a::b", "empty segment");
		assert!(err.to_string().contains("a::b"));
		assert!(err.to_string().contains("empty segment"));

		let err = RegistryError::NotFound("missing".to_string());
		assert!(err.to_string().contains("missing"));

		let err = RegistryError::source("unexpected EOF");
		assert!(err.to_string().contains("unexpected EOF"));
	}

	#[test]
	fn test_error_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<RegistryError>();
	}
}
