//! Commands discovered from the host console's `list --format=json` output.

use serde::Deserialize;
use serde_json::Value;

use super::{Command, CommandSource, Parameter, ParameterKind, RegistryError, RegistryResult};

/// Options every console command inherits; they never become route segments.
const GLOBAL_OPTIONS: [&str; 8] = [
	"help",
	"quiet",
	"verbose",
	"version",
	"ansi",
	"no-ansi",
	"no-interaction",
	"env",
];

#[derive(Debug, Deserialize)]
struct Listing {
	#[serde(default)]
	commands: Vec<ListedCommand>,
}

#[derive(Debug, Deserialize)]
struct ListedCommand {
	name: String,
	#[serde(default)]
	description: String,
	#[serde(default)]
	hidden: bool,
	#[serde(default)]
	definition: Definition,
}

// Empty maps are emitted as `[]` by the console, so both sections stay untyped.
#[derive(Debug, Default, Deserialize)]
struct Definition {
	#[serde(default)]
	arguments: Value,
	#[serde(default)]
	options: Value,
}

#[derive(Debug, Deserialize)]
struct ListedArgument {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	is_required: bool,
}

#[derive(Debug, Deserialize)]
struct ListedOption {
	#[serde(default)]
	name: Option<String>,
}

/// Parses the console's JSON command listing.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{CommandSource, ListingSource};
///
/// let source = ListingSource::new(r#"{
///     "commands": [{
///         "name": "make:model",
///         "description": "Create a new Eloquent model class",
///         "hidden": false,
///         "definition": {
///             "arguments": {"name": {"name": "name", "is_required": true}},
///             "options": {
///                 "help": {"name": "--help"},
///                 "migration": {"name": "--migration"}
///             }
///         }
///     }]
/// }"#);
///
/// let commands = source.discover().unwrap();
/// assert_eq!(commands[0].signature.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ListingSource {
	json: String,
}

impl ListingSource {
	/// Wrap raw listing output.
	pub fn new(json: impl Into<String>) -> Self {
		Self { json: json.into() }
	}

	fn convert(listed: ListedCommand) -> RegistryResult<Command> {
		let mut command = Command::new(listed.name, listed.description).with_hidden(listed.hidden);

		for (key, raw) in Self::entries(&listed.definition.arguments, &command.name, "arguments")? {
			let argument: ListedArgument = serde_json::from_value(raw).map_err(|e| {
				RegistryError::source(format!("bad argument '{}' on {}: {}", key, command.name, e))
			})?;
			command.signature.push(Parameter {
				name: argument.name.unwrap_or(key),
				kind: ParameterKind::Argument,
				required: argument.is_required,
			});
		}

		for (key, raw) in Self::entries(&listed.definition.options, &command.name, "options")? {
			let option: ListedOption = serde_json::from_value(raw).map_err(|e| {
				RegistryError::source(format!("bad option '{}' on {}: {}", key, command.name, e))
			})?;
			let name = option
				.name
				.map(|n| n.trim_start_matches('-').to_string())
				.unwrap_or(key);
			if GLOBAL_OPTIONS.contains(&name.as_str()) {
				continue;
			}
			command.signature.push(Parameter::option(name));
		}

		Ok(command)
	}

	fn entries(section: &Value, command: &str, what: &str) -> RegistryResult<Vec<(String, Value)>> {
		match section {
			Value::Null => Ok(Vec::new()),
			Value::Array(items) if items.is_empty() => Ok(Vec::new()),
			Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
			_ => Err(RegistryError::source(format!(
				"unexpected {} section on {}",
				what, command
			))),
		}
	}
}

impl CommandSource for ListingSource {
	fn label(&self) -> &str {
		"listing"
	}

	fn discover(&self) -> RegistryResult<Vec<Command>> {
		let listing: Listing = serde_json::from_str(&self.json)
			.map_err(|e| RegistryError::source(format!("failed to parse command listing: {}", e)))?;

		listing.commands.into_iter().map(Self::convert).collect()
	}
}
