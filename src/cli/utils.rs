//! Shared utility functions for CLI commands

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};

use crate::registry::{Command, CommandRegistry};
use crate::routing::RouteTable;

/// Display a user-friendly error message with suggestions
pub fn display_error_with_suggestions<E: std::fmt::Display>(error: &E, context: &str) {
    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("   {}", error.to_string().red());

    let error_str = error.to_string().to_lowercase();
    if error_str.contains("no such file or directory") || error_str.contains("failed to start") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Check [executor] program and working_dir in the configuration");
        eprintln!("   • Or point [registry] manifest at a command manifest");
    } else if error_str.contains("collision") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Add one of the colliding commands to [api] forbidden_routes");
    } else if error_str.contains("address") || error_str.contains("bind") {
        eprintln!("{}", "Suggestions:".blue());
        eprintln!("   • Use --bind or ARTISAN_API_BIND to choose another address");
    }
}

/// Exposure of a discovered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    /// Has a route.
    Exposed,
    /// Excluded by a forbidden pattern.
    Forbidden,
    /// Hidden and not included.
    Hidden,
}

impl Exposure {
    /// Classify a command against a generated table.
    pub fn of(command: &Command, table: &RouteTable) -> Self {
        if table.is_forbidden(&command.name) {
            Self::Forbidden
        } else if table.command(&command.name).is_some() {
            Self::Exposed
        } else {
            Self::Hidden
        }
    }

    fn cell(self) -> Cell {
        match self {
            Self::Exposed => Cell::new("exposed").fg(Color::Green),
            Self::Forbidden => Cell::new("forbidden").fg(Color::Red),
            Self::Hidden => Cell::new("hidden").fg(Color::Yellow),
        }
    }
}

/// Route table as method / URI / name rows, static routes first.
pub fn routes_table(table: &RouteTable) -> Table {
    let mut output = Table::new();
    output
        .load_preset(UTF8_FULL)
        .set_header(vec!["Method", "URI", "Name"]);

    for route in table.static_descriptors().iter().chain(table.descriptors()) {
        output.add_row(vec![
            Cell::new(route.methods.to_string()),
            Cell::new(&route.uri),
            Cell::new(&route.route_name).fg(Color::Cyan),
        ]);
    }
    output
}

/// Every discovered command with its exposure.
pub fn commands_table(registry: &dyn CommandRegistry, table: &RouteTable) -> Table {
    let mut output = Table::new();
    output
        .load_preset(UTF8_FULL)
        .set_header(vec!["Command", "Status", "Route", "Description"]);

    for command in registry.list() {
        let exposure = Exposure::of(command, table);
        let route = table
            .route_for(&command.name)
            .map(|r| r.route_name.clone())
            .unwrap_or_default();
        output.add_row(vec![
            Cell::new(&command.name),
            exposure.cell(),
            Cell::new(route),
            Cell::new(&command.description),
        ]);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DefaultCommandRegistry;
    use crate::routing::{Router, RouterConfig};

    fn fixture() -> (DefaultCommandRegistry, RouteTable) {
        let mut registry = DefaultCommandRegistry::new();
        registry.register(Command::new("about", "Display basic information")).unwrap();
        registry.register(Command::new("tinker", "Interact with your application")).unwrap();
        registry
            .register(Command::new("schedule:finish", "").with_hidden(true))
            .unwrap();

        let mut router = Router::new(RouterConfig {
            forbidden_routes: vec!["tinker".to_string()],
            ..RouterConfig::default()
        })
        .unwrap();
        let table = router.generate(&registry, false).unwrap();
        (registry, table)
    }

    #[test]
    fn test_exposure() {
        let (registry, table) = fixture();
        let statuses: Vec<Exposure> = registry
            .list()
            .into_iter()
            .map(|c| Exposure::of(c, &table))
            .collect();
        assert_eq!(
            statuses,
            vec![Exposure::Exposed, Exposure::Forbidden, Exposure::Hidden]
        );
    }

    #[test]
    fn test_tables_render() {
        let (registry, table) = fixture();

        let routes = routes_table(&table).to_string();
        assert!(routes.contains("/artisan/all"));
        assert!(routes.contains("artisan.api.about"));
        assert!(!routes.contains("tinker"));

        let commands = commands_table(&registry, &table).to_string();
        assert!(commands.contains("tinker"));
        assert!(commands.contains("forbidden"));
        assert!(commands.contains("schedule:finish"));
    }
}
