//! Route generation over the command registry.

use std::collections::HashMap;

use super::{
    HttpMethods, PatternSet, RouteAdapter, RouteDescriptor, RouteError, RouteResult, RouteTable,
    StaticRoute,
};
use crate::registry::CommandRegistry;

/// Default group prefix.
pub const DEFAULT_PREFIX: &str = "artisan";

/// Inputs for route generation.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Path prefix applied to every route, static ones included.
    pub prefix: String,
    /// Verbs accepted by every route.
    pub methods: HttpMethods,
    /// Glob patterns of command names that are never exposed.
    pub forbidden_routes: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            methods: HttpMethods::default(),
            forbidden_routes: Vec::new(),
        }
    }
}

/// Builds the route table from a command registry.
///
/// # Example
///
/// ```
/// use artisan_api::registry::{Command, CommandRegistry, DefaultCommandRegistry};
/// use artisan_api::routing::{Router, RouterConfig};
///
/// let mut registry = DefaultCommandRegistry::new();
/// registry.register(Command::new("about", "")).unwrap();
/// registry.register(Command::new("down", "")).unwrap();
///
/// let mut router = Router::new(RouterConfig {
///     forbidden_routes: vec!["down".to_string()],
///     ..RouterConfig::default()
/// }).unwrap();
///
/// let table = router.generate(&registry, false).unwrap();
/// assert_eq!(router.routes(), ["/artisan/about"]);
/// assert_eq!(table.routes(), vec!["/artisan/about"]);
/// assert_eq!(router.static_routes(), vec!["/all", "/command"]);
/// ```
#[derive(Debug)]
pub struct Router {
    adapter: RouteAdapter,
    methods: HttpMethods,
    forbidden: PatternSet,
    routes: Vec<String>,
}

impl Router {
    /// Create a router; a malformed forbidden pattern fails here.
    pub fn new(config: RouterConfig) -> RouteResult<Self> {
        let forbidden = PatternSet::new(&config.forbidden_routes)?;
        Ok(Self {
            adapter: RouteAdapter::new(&config.prefix),
            methods: config.methods,
            forbidden,
            routes: Vec::new(),
        })
    }

    /// Generate the route table.
    ///
    /// Walks the registry in its own order. Forbidden commands are skipped
    /// before the adapter is consulted; hidden ones are skipped unless
    /// `include_hidden` is set. Any collision aborts generation and leaves
    /// [`routes`](Self::routes) empty.
    pub fn generate(
        &mut self,
        registry: &dyn CommandRegistry,
        include_hidden: bool,
    ) -> RouteResult<RouteTable> {
        self.routes.clear();

        let mut names: HashMap<String, String> = HashMap::new();
        let mut uris: HashMap<String, String> = HashMap::new();

        let mut statics = Vec::with_capacity(StaticRoute::ALL.len());
        for route in StaticRoute::ALL {
            let descriptor = route.describe(self.adapter.prefix(), &self.methods);
            claim(&mut names, &mut uris, &descriptor, route.path())?;
            statics.push(descriptor);
        }

        let mut routes: Vec<RouteDescriptor> = Vec::new();
        let mut commands = HashMap::new();
        for command in registry.list() {
            if let Some(pattern) = self.forbidden.first_match(&command.name) {
                tracing::debug!(
                    command = %command.name,
                    pattern = pattern.as_str(),
                    "command excluded by forbidden pattern"
                );
                continue;
            }

            let Some(descriptor) = self.adapter.describe(command, include_hidden, &self.methods) else {
                tracing::debug!(command = %command.name, "hidden command not exposed");
                continue;
            };

            claim(&mut names, &mut uris, &descriptor, &command.name)?;
            commands.insert(command.name.clone(), command.clone());
            routes.push(descriptor);
        }

        self.routes = routes.iter().map(|r| r.uri.clone()).collect();
        tracing::info!(
            routes = routes.len(),
            commands = registry.len(),
            include_hidden,
            "route table generated"
        );

        Ok(RouteTable {
            methods: self.methods.clone(),
            include_hidden,
            forbidden: self.forbidden.clone(),
            statics,
            routes,
            commands,
        })
    }

    /// URI templates produced by the last successful generation.
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Static route paths, relative to the group prefix.
    pub fn static_routes(&self) -> Vec<&'static str> {
        StaticRoute::ALL.iter().map(StaticRoute::path).collect()
    }

    /// The adapter used for URI and name translation.
    pub fn adapter(&self) -> &RouteAdapter {
        &self.adapter
    }
}

fn claim(
    names: &mut HashMap<String, String>,
    uris: &mut HashMap<String, String>,
    descriptor: &RouteDescriptor,
    owner: &str,
) -> RouteResult<()> {
    if let Some(first) = names.get(&descriptor.route_name) {
        return Err(RouteError::Collision {
            route_name: descriptor.route_name.clone(),
            first: first.clone(),
            second: owner.to_string(),
        });
    }
    if let Some(first) = uris.get(&descriptor.uri) {
        return Err(RouteError::UriCollision {
            uri: descriptor.uri.clone(),
            first: first.clone(),
            second: owner.to_string(),
        });
    }
    names.insert(descriptor.route_name.clone(), owner.to_string());
    uris.insert(descriptor.uri.clone(), owner.to_string());
    Ok(())
}
