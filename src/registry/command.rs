//! Command metadata as reported by the host console.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a parameter is passed positionally or as a named `--option`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
	/// Positional argument, bound in signature order.
	Argument,

	/// Named option, rendered as `--name` or `--name=value`.
	Option,
}

impl fmt::Display for ParameterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Argument => write!(f, "argument"),
			Self::Option => write!(f, "option"),
		}
	}
}

impl Default for ParameterKind {
	fn default() -> Self {
		Self::Argument
	}
}

/// A single entry of a command signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
	/// Parameter name without leading dashes.
	pub name: String,

	/// Positional argument or named option.
	#[serde(default)]
	pub kind: ParameterKind,

	/// Required parameters become required path segments.
	#[serde(default)]
	pub required: bool,
}

impl Parameter {
	/// A required positional argument.
	pub fn required(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: ParameterKind::Argument,
			required: true,
		}
	}

	/// An optional positional argument.
	pub fn optional(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: ParameterKind::Argument,
			required: false,
		}
	}

	/// A named option. Options are never required.
	pub fn option(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: ParameterKind::Option,
			required: false,
		}
	}

	/// Whether this parameter is a named option.
	pub fn is_option(&self) -> bool {
		self.kind == ParameterKind::Option
	}
}

/// A named, independently invocable console command.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{Command, Parameter};
///
/// let command = Command::new("make:controller", "Create a new controller class")
///     .with_parameter(Parameter::required("name"))
///     .with_parameter(Parameter::option("resource"));
///
/// assert_eq!(command.segments(), vec!["make", "controller"]);
/// assert_eq!(command.signature.len(), 2);
/// assert!(!command.hidden);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
	/// Hierarchical name, `:` or `.` delimited.
	pub name: String,

	/// One-line description shown in listings.
	#[serde(default)]
	pub description: String,

	/// Ordered parameter signature.
	#[serde(default, rename = "parameters")]
	pub signature: Vec<Parameter>,

	/// Hidden commands are only exposed when explicitly requested.
	#[serde(default)]
	pub hidden: bool,
}

impl Command {
	/// Create a visible command with an empty signature.
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			signature: Vec::new(),
			hidden: false,
		}
	}

	/// Append a parameter to the signature.
	pub fn with_parameter(mut self, parameter: Parameter) -> Self {
		self.signature.push(parameter);
		self
	}

	/// Mark the command hidden or visible.
	pub fn with_hidden(mut self, hidden: bool) -> Self {
		self.hidden = hidden;
		self
	}

	/// Split the name into its hierarchical parts.
	pub fn segments(&self) -> Vec<&str> {
		self.name.split([':', '.']).collect()
	}

	/// Look up a parameter by name.
	pub fn parameter(&self, name: &str) -> Option<&Parameter> {
		self.signature.iter().find(|p| p.name == name)
	}
}
