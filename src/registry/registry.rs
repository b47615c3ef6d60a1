//! Registry trait and default, order-preserving implementation.

use std::collections::HashMap;

use super::{Command, RegistryError, RegistryResult};

/// Characters that would break URI templates if they appeared in a name.
const RESERVED_CHARS: [char; 4] = ['/', '{', '}', '?'];

/// Storage and lookup of console commands.
///
/// Iteration order is the registration order; route generation walks
/// commands in exactly this order.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{Command, CommandRegistry, DefaultCommandRegistry};
///
/// let mut registry = DefaultCommandRegistry::new();
/// registry.register(Command::new("cache:clear", "Flush the application cache")).unwrap();
///
/// assert!(registry.contains("cache:clear"));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait CommandRegistry {
	/// Register a command.
	///
	/// Returns an error if the name is invalid or already taken.
	fn register(&mut self, command: Command) -> RegistryResult<()>;

	/// Get a command by name.
	fn get(&self, name: &str) -> Option<&Command>;

	/// List all commands in registration order.
	fn list(&self) -> Vec<&Command>;

	/// Check if a command exists.
	fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Number of registered commands.
	fn len(&self) -> usize;

	/// Check if the registry is empty.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// All command names in registration order.
	fn names(&self) -> Vec<&str> {
		self.list().into_iter().map(|c| c.name.as_str()).collect()
	}
}

/// `Vec`-backed registry with a name index.
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRegistry {
	commands: Vec<Command>,
	name_index: HashMap<String, usize>,
}

impl DefaultCommandRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Validate a command name.
	///
	/// Names must be non-empty, must not contain whitespace or URI template
	/// characters, and every `:`/`.` delimited segment must be non-empty.
	pub fn validate_name(name: &str) -> RegistryResult<()> {
		if name.is_empty() {
			return Err(RegistryError::invalid_name(name, "name is empty"));
		}

		if name.chars().any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c)) {
			return Err(RegistryError::invalid_name(
				name,
				"name contains whitespace or a reserved character",
			));
		}

		if name.split([':', '.']).any(str::is_empty) {
			return Err(RegistryError::invalid_name(name, "name has an empty segment"));
		}

		Ok(())
	}

	fn validate_signature(command: &Command) -> RegistryResult<()> {
		let mut seen = Vec::with_capacity(command.signature.len());
		for parameter in &command.signature {
			let name = parameter.name.as_str();
			if name.is_empty()
				|| name.starts_with('-')
				|| name.chars().any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c))
			{
				return Err(RegistryError::invalid_signature(
					&command.name,
					format!("invalid parameter name '{}'", name),
				));
			}
			if seen.contains(&name) {
				return Err(RegistryError::invalid_signature(
					&command.name,
					format!("parameter '{}' declared twice", name),
				));
			}
			seen.push(name);
		}
		Ok(())
	}

	/// Iterate over all commands in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &Command> {
		self.commands.iter()
	}
}

impl CommandRegistry for DefaultCommandRegistry {
	fn register(&mut self, command: Command) -> RegistryResult<()> {
		Self::validate_name(&command.name)?;
		Self::validate_signature(&command)?;

		if self.name_index.contains_key(&command.name) {
			return Err(RegistryError::duplicate_name(&command.name));
		}

		self.name_index.insert(command.name.clone(), self.commands.len());
		self.commands.push(command);
		Ok(())
	}

	fn get(&self, name: &str) -> Option<&Command> {
		self.name_index.get(name).map(|&idx| &self.commands[idx])
	}

	fn list(&self) -> Vec<&Command> {
		self.commands.iter().collect()
	}

	fn len(&self) -> usize {
		self.commands.len()
	}
}
