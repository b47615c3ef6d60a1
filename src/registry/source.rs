//! Sources that discover commands and feed them into a registry.

#[cfg(feature = "config")]
use std::path::Path;

use super::{Command, CommandRegistry, RegistryError, RegistryResult};

/// Something that can enumerate console commands.
///
/// # Object Safety
///
/// This trait is object-safe and can be used with `dyn CommandSource`.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{
///     Command, CommandRegistry, CommandSource, DefaultCommandRegistry, StaticSource,
/// };
///
/// let source = StaticSource::new(vec![
///     Command::new("about", "Display basic information about your application"),
///     Command::new("cache:clear", "Flush the application cache"),
/// ]);
///
/// let mut registry = DefaultCommandRegistry::new();
/// assert_eq!(source.register_all(&mut registry).unwrap(), 2);
/// ```
pub trait CommandSource {
	/// Short label used in logs.
	fn label(&self) -> &str;

	/// Discover available commands from this source.
	fn discover(&self) -> RegistryResult<Vec<Command>>;

	/// Register every discovered command.
	///
	/// Stops at the first registration failure; a registry filled from a
	/// broken source is never handed to route generation.
	fn register_all(&self, registry: &mut dyn CommandRegistry) -> RegistryResult<usize> {
		let commands = self.discover()?;
		let count = commands.len();
		for command in commands {
			registry.register(command)?;
		}
		tracing::debug!(source = self.label(), count, "registered commands");
		Ok(count)
	}
}

/// A fixed list of commands.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
	commands: Vec<Command>,
}

impl StaticSource {
	/// Create a source from the given commands.
	pub fn new(commands: Vec<Command>) -> Self {
		Self { commands }
	}

	/// Add a command to this source.
	pub fn add(&mut self, command: Command) {
		self.commands.push(command);
	}

	/// Number of commands in this source.
	pub fn len(&self) -> usize {
		self.commands.len()
	}

	/// Check if this source is empty.
	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}
}

impl CommandSource for StaticSource {
	fn label(&self) -> &str {
		"static"
	}

	fn discover(&self) -> RegistryResult<Vec<Command>> {
		Ok(self.commands.clone())
	}
}

#[cfg(feature = "config")]
#[derive(Debug, serde::Deserialize)]
struct Manifest {
	#[serde(default)]
	commands: Vec<Command>,
}

/// Commands declared in a TOML manifest.
///
/// ```toml
/// [[commands]]
/// name = "make:controller"
/// description = "Create a new controller class"
///
/// [[commands.parameters]]
/// name = "name"
/// required = true
///
/// [[commands.parameters]]
/// name = "resource"
/// kind = "option"
/// ```
#[cfg(feature = "config")]
#[derive(Debug, Clone)]
pub struct ManifestSource {
	origin: String,
	contents: String,
}

#[cfg(feature = "config")]
impl ManifestSource {
	/// Read a manifest file.
	pub fn load(path: &Path) -> RegistryResult<Self> {
		let contents = std::fs::read_to_string(path).map_err(|e| {
			RegistryError::source(format!("failed to read manifest {}: {}", path.display(), e))
		})?;
		Ok(Self {
			origin: path.display().to_string(),
			contents,
		})
	}

	/// Use manifest text that is already in memory.
	pub fn from_toml(contents: impl Into<String>) -> Self {
		Self {
			origin: "<inline>".to_string(),
			contents: contents.into(),
		}
	}
}

#[cfg(feature = "config")]
impl CommandSource for ManifestSource {
	fn label(&self) -> &str {
		"manifest"
	}

	fn discover(&self) -> RegistryResult<Vec<Command>> {
		let manifest: Manifest = toml::from_str(&self.contents).map_err(|e| {
			RegistryError::source(format!("failed to parse manifest {}: {}", self.origin, e))
		})?;
		Ok(manifest.commands)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::DefaultCommandRegistry;

	#[test]
	fn test_static_source_discover() {
		let mut source = StaticSource::default();
		assert!(source.is_empty());

		source.add(Command::new("about", ""));
		source.add(Command::new("list", ""));
		assert_eq!(source.len(), 2);
		assert_eq!(source.discover().unwrap().len(), 2);
	}

	#[test]
	fn test_register_all_duplicate_error() {
		let source = StaticSource::new(vec![Command::new("about", ""), Command::new("about", "")]);

		let mut registry = DefaultCommandRegistry::new();
		match source.register_all(&mut registry).unwrap_err() {
			RegistryError::DuplicateName { name } => assert_eq!(name, "about"),
			other => panic!("Expected DuplicateName error, got {other:?}"),
		}
	}

	#[test]
	fn test_dyn_source() {
		fn label_of(source: &dyn CommandSource) -> &str {
			source.label()
		}
		assert_eq!(label_of(&StaticSource::default()), "static");
	}

	#[cfg(feature = "config")]
	#[test]
	fn test_manifest_source() {
		let source = ManifestSource::from_toml(
			r#"
[[commands]]
name = "make:controller"
description = "Create a new controller class"

[[commands.parameters]]
name = "name"
required = true

[[commands.parameters]]
name = "resource"
kind = "option"

[[commands]]
name = "inspire"
hidden = true
"#,
		);

		let commands = source.discover().unwrap();
		assert_eq!(commands.len(), 2);
		assert_eq!(commands[0].signature.len(), 2);
		assert!(commands[0].signature[0].required);
		assert!(commands[0].signature[1].is_option());
		assert!(commands[1].hidden);
	}

	#[cfg(feature = "config")]
	#[test]
	fn test_manifest_source_from_file() {
		use std::fs;
		use tempfile::NamedTempFile;

		let file = NamedTempFile::new().unwrap();
		fs::write(file.path(), "[[commands]]\nname = \"about\"\n").unwrap();

		let source = ManifestSource::load(file.path()).unwrap();
		let mut registry = DefaultCommandRegistry::new();
		assert_eq!(source.register_all(&mut registry).unwrap(), 1);
		assert!(registry.contains("about"));
	}

	#[cfg(feature = "config")]
	#[test]
	fn test_manifest_source_errors() {
		assert!(ManifestSource::load(Path::new("/definitely/not/here.toml")).is_err());

		let source = ManifestSource::from_toml("[[commands]]\nhidden = true\n");
		assert!(matches!(source.discover(), Err(RegistryError::Source { .. })));
	}
}
