//! The immutable route table produced by route generation.

use serde::Serialize;
use std::collections::HashMap;

use super::adapter::{render_template, Segment, ROUTE_NAME_PREFIX};
use super::{HttpMethods, PatternSet, RouteDescriptor};
use crate::registry::Command;

/// Routes that exist regardless of the registry contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticRoute {
    /// Lists every generated route.
    All,

    /// Runs a command named in the request instead of the path.
    Command,
}

impl StaticRoute {
    /// Every static route, in registration order.
    pub const ALL: [StaticRoute; 2] = [StaticRoute::All, StaticRoute::Command];

    /// Path relative to the group prefix.
    pub fn path(&self) -> &'static str {
        match self {
            Self::All => "/all",
            Self::Command => "/command",
        }
    }

    /// `artisan.api.all` / `artisan.api.command`.
    pub fn route_name(&self) -> String {
        format!("{}{}", ROUTE_NAME_PREFIX, self.path().trim_start_matches('/'))
    }

    pub(crate) fn describe(&self, prefix: &[Segment], methods: &HttpMethods) -> RouteDescriptor {
        let mut segments = prefix.to_vec();
        segments.push(Segment::literal(self.path().trim_start_matches('/')));
        RouteDescriptor {
            uri: render_template(&segments),
            route_name: self.route_name(),
            target: RouteTarget::Static(*self),
            methods: methods.clone(),
            segments,
        }
    }
}

/// What the shared entry point should do for a matched route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteTarget {
    /// One of the fixed routes.
    Static(StaticRoute),

    /// A generated route for the named command.
    Command(String),
}

/// A request path matched against the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub descriptor: &'a RouteDescriptor,
    /// Captured `(parameter, value)` pairs in template order.
    pub captured: Vec<(String, String)>,
}

/// Generated routes plus the policy they were generated under.
///
/// Built once by [`Router::generate`](super::Router::generate) and read-only
/// afterwards, so it can be shared across request handlers behind an `Arc`.
#[derive(Clone, Debug)]
pub struct RouteTable {
    pub(crate) methods: HttpMethods,
    pub(crate) include_hidden: bool,
    pub(crate) forbidden: PatternSet,
    pub(crate) statics: Vec<RouteDescriptor>,
    pub(crate) routes: Vec<RouteDescriptor>,
    pub(crate) commands: HashMap<String, Command>,
}

impl RouteTable {
    /// URI templates of the generated command routes, in generation order.
    pub fn routes(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.uri.as_str()).collect()
    }

    /// Static route paths, relative to the group prefix.
    pub fn static_routes(&self) -> Vec<&'static str> {
        StaticRoute::ALL.iter().map(StaticRoute::path).collect()
    }

    /// Descriptors of the generated command routes.
    pub fn descriptors(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    /// Descriptors of the static routes, prefix applied.
    pub fn static_descriptors(&self) -> &[RouteDescriptor] {
        &self.statics
    }

    /// An exposed command by name.
    ///
    /// Forbidden commands, and hidden ones unless hidden routes were
    /// requested, are not visible here.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Route descriptor of an exposed command.
    pub fn route_for(&self, command: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.command() == Some(command))
    }

    /// Verbs accepted by every route.
    pub fn methods(&self) -> &HttpMethods {
        &self.methods
    }

    /// Whether hidden commands were exposed.
    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Whether a command name is excluded by the forbidden list.
    pub fn is_forbidden(&self, name: &str) -> bool {
        self.forbidden.is_match(name)
    }

    /// Number of generated command routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no command route was generated.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a request path.
    ///
    /// Static routes win ties; among command routes the template with the
    /// most literal segments wins, then table order.
    ///
    /// ```
    /// use artisan_api::registry::{Command, DefaultCommandRegistry, CommandRegistry, Parameter};
    /// use artisan_api::routing::{Router, RouterConfig, RouteTarget};
    ///
    /// let mut registry = DefaultCommandRegistry::new();
    /// registry.register(Command::new("make:model", "").with_parameter(Parameter::required("name"))).unwrap();
    ///
    /// let mut router = Router::new(RouterConfig::default()).unwrap();
    /// let table = router.generate(&registry, false).unwrap();
    ///
    /// let matched = table.resolve("/artisan/make/model/Post").unwrap();
    /// assert_eq!(matched.descriptor.target, RouteTarget::Command("make:model".to_string()));
    /// assert_eq!(matched.captured, vec![("name".to_string(), "Post".to_string())]);
    /// assert!(table.resolve("/artisan/make/model").is_none());
    /// ```
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let parts = split_path(path)?;

        let mut best: Option<(usize, RouteMatch<'_>)> = None;
        for descriptor in self.statics.iter().chain(self.routes.iter()) {
            let Some((literals, captured)) = match_segments(&descriptor.segments, &parts) else {
                continue;
            };
            if best.as_ref().map_or(true, |(score, _)| literals > *score) {
                best = Some((literals, RouteMatch { descriptor, captured }));
            }
        }

        best.map(|(_, matched)| matched)
    }
}

/// Split a request path into decoded segments.
///
/// A single trailing slash is tolerated; empty inner segments and invalid
/// percent-encoding are not.
fn split_path(path: &str) -> Option<Vec<String>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Some(Vec::new());
    }

    trimmed
        .split('/')
        .map(|part| {
            if part.is_empty() {
                return None;
            }
            urlencoding::decode(part).ok().map(|decoded| decoded.into_owned())
        })
        .collect()
}

fn match_segments(template: &[Segment], parts: &[String]) -> Option<(usize, Vec<(String, String)>)> {
    let mut literals = 0;
    let mut captured = Vec::new();
    let mut consumed = 0;

    for segment in template {
        match (segment, parts.get(consumed)) {
            (Segment::Literal { value }, Some(part)) if part == value => literals += 1,
            (Segment::Literal { .. }, _) => return None,
            (Segment::Param { name, .. }, Some(part)) => captured.push((name.clone(), part.clone())),
            (Segment::Param { optional: true, .. }, None) => break,
            (Segment::Param { optional: false, .. }, None) => return None,
        }
        consumed += 1;
    }

    if parts.len() > consumed {
        return None;
    }
    Some((literals, captured))
}
