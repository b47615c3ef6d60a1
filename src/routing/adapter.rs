//! Translation from command metadata to URI templates and route names.

use serde::Serialize;

use super::{HttpMethods, RouteTarget};
use crate::registry::Command;

/// Namespace every route name lives under.
pub const ROUTE_NAME_PREFIX: &str = "artisan.api.";

/// One path segment of a URI template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    /// Fixed text that must appear verbatim.
    Literal {
        /// The segment text.
        value: String,
    },

    /// A captured command parameter.
    Param {
        /// Parameter name from the signature.
        name: String,
        /// Whether the segment may be left off the end of the path.
        optional: bool,
    },
}

impl Segment {
    pub(crate) fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Literal { value } => value.clone(),
            Self::Param { name, optional: false } => format!("{{{}}}", name),
            Self::Param { name, optional: true } => format!("{{{}?}}", name),
        }
    }
}

/// A generated route bound to one command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteDescriptor {
    /// Full URI template including the group prefix.
    pub uri: String,
    /// `artisan.api.` namespaced route name.
    pub route_name: String,
    /// What the entry point runs for this route.
    pub target: RouteTarget,
    /// Accepted verbs.
    pub methods: HttpMethods,
    #[serde(skip)]
    pub(crate) segments: Vec<Segment>,
}

impl RouteDescriptor {
    /// The command name for dynamic routes.
    pub fn command(&self) -> Option<&str> {
        match &self.target {
            RouteTarget::Command(name) => Some(name.as_str()),
            RouteTarget::Static(_) => None,
        }
    }

    /// Parsed template segments, prefix included.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Render segments as `/a/b/{c}/{d?}`.
pub(crate) fn render_template(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments.iter().map(Segment::render).collect();
    format!("/{}", parts.join("/"))
}

/// Split a configured prefix into literal segments.
pub(crate) fn prefix_segments(prefix: &str) -> Vec<Segment> {
    prefix
        .split('/')
        .filter(|s| !s.is_empty())
        .map(Segment::literal)
        .collect()
}

/// Converts commands into URI templates and route names.
///
/// The adapter is pure: it never looks at the forbidden list and never
/// touches the routing surface.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{Command, Parameter};
/// use artisan_api::routing::RouteAdapter;
///
/// let adapter = RouteAdapter::new("artisan");
/// let command = Command::new("make:controller", "")
///     .with_parameter(Parameter::required("name"))
///     .with_parameter(Parameter::option("api"));
///
/// assert_eq!(adapter.to_uri(&command, false).unwrap(), "/make/controller/{name}/{api?}");
/// assert_eq!(adapter.get_uri(&command, false).unwrap(), "/artisan/make/controller/{name}/{api?}");
/// assert_eq!(adapter.to_route_name(&command), "make.controller");
/// ```
#[derive(Clone, Debug, Default)]
pub struct RouteAdapter {
    prefix: Vec<Segment>,
}

impl RouteAdapter {
    /// Create an adapter for routes grouped under `prefix`.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix_segments(prefix),
        }
    }

    /// Template segments for a command, without the group prefix.
    ///
    /// Returns `None` for hidden commands unless `include_hidden` is set.
    /// Once an optional segment has been emitted every following segment is
    /// optional too, so one template covers every call shape.
    pub fn to_segments(&self, command: &Command, include_hidden: bool) -> Option<Vec<Segment>> {
        if command.hidden && !include_hidden {
            return None;
        }

        let mut segments: Vec<Segment> = command.segments().into_iter().map(Segment::literal).collect();

        let mut optional_tail = false;
        for parameter in &command.signature {
            optional_tail = optional_tail || !parameter.required || parameter.is_option();
            segments.push(Segment::Param {
                name: parameter.name.clone(),
                optional: optional_tail,
            });
        }

        Some(segments)
    }

    /// URI template relative to the group prefix.
    pub fn to_uri(&self, command: &Command, include_hidden: bool) -> Option<String> {
        self.to_segments(command, include_hidden)
            .map(|segments| render_template(&segments))
    }

    /// URI template including the group prefix.
    pub fn get_uri(&self, command: &Command, include_hidden: bool) -> Option<String> {
        self.prefixed_segments(command, include_hidden)
            .map(|segments| render_template(&segments))
    }

    /// Canonical dotted identifier, without the `artisan.api.` namespace.
    pub fn to_route_name(&self, command: &Command) -> String {
        command.segments().join(".")
    }

    /// Build the full descriptor for a command.
    pub fn describe(
        &self,
        command: &Command,
        include_hidden: bool,
        methods: &HttpMethods,
    ) -> Option<RouteDescriptor> {
        let segments = self.prefixed_segments(command, include_hidden)?;
        Some(RouteDescriptor {
            uri: render_template(&segments),
            route_name: format!("{}{}", ROUTE_NAME_PREFIX, self.to_route_name(command)),
            target: RouteTarget::Command(command.name.clone()),
            methods: methods.clone(),
            segments,
        })
    }

    /// The group prefix as literal segments.
    pub fn prefix(&self) -> &[Segment] {
        &self.prefix
    }

    fn prefixed_segments(&self, command: &Command, include_hidden: bool) -> Option<Vec<Segment>> {
        let tail = self.to_segments(command, include_hidden)?;
        let mut segments = self.prefix.clone();
        segments.extend(tail);
        Some(segments)
    }
}
