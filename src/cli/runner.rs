//! Resolves configuration and dispatches subcommands.

use anyhow::Result;
use std::path::PathBuf;

use super::{commands_table, display_error_with_suggestions, routes_table, Cli, CliCommand};
use crate::config::{ConfigurationLoader, EnvironmentLoader};
use crate::executor::ProcessExecutor;
use crate::observability;
use crate::server;

/// Configuration resolved from flags, environment and file.
#[derive(Debug)]
pub struct Resolved {
    /// Loaded TOML configuration.
    pub loader: ConfigurationLoader,
    /// Environment overrides.
    pub env: EnvironmentLoader,
}

impl Resolved {
    /// `--config` wins over `ARTISAN_API_CONFIG`, which wins over the default path.
    pub fn load(cli: &Cli) -> Result<Self> {
        let env = EnvironmentLoader::new(cli.env_file.as_deref());
        let path = cli
            .config
            .clone()
            .or_else(|| env.config_path().map(PathBuf::from));
        let loader = ConfigurationLoader::new(path.as_deref())?;
        Ok(Self { loader, env })
    }

    /// `ARTISAN_API_LOG` wins over `[logging] log_level`.
    pub fn log_level(&self) -> String {
        self.env
            .log_level()
            .unwrap_or_else(|| self.loader.config.logging.log_level.clone())
    }

    /// `--bind` wins over `ARTISAN_API_BIND`, which wins over `[server] bind`.
    pub fn bind(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.env.bind())
            .unwrap_or_else(|| self.loader.config.server.bind.clone())
    }

    /// A command-line request for hidden commands adds to the configured setting.
    pub fn include_hidden(&self, flag: bool) -> bool {
        flag || self.loader.config.api.include_hidden
    }
}

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let resolved = Resolved::load(&cli)?;
    observability::init(&resolved.log_level());

    let result = dispatch(&resolved, cli.command).await;
    if let Err(e) = &result {
        display_error_with_suggestions(&format!("{:#}", e), "artisan-api failed");
    }
    result
}

async fn dispatch(resolved: &Resolved, command: CliCommand) -> Result<()> {
    let loader = &resolved.loader;
    match command {
        CliCommand::Serve { bind, include_hidden } => {
            let state = server::build_state(loader, resolved.include_hidden(include_hidden)).await?;
            server::serve(state, &resolved.bind(bind)).await
        }
        CliCommand::Routes { include_hidden } => {
            let executor = ProcessExecutor::new(loader.config.executor.process_config());
            let table =
                server::build_table(loader, &executor, resolved.include_hidden(include_hidden)).await?;
            println!("{}", routes_table(&table));
            Ok(())
        }
        CliCommand::Commands => {
            let executor = ProcessExecutor::new(loader.config.executor.process_config());
            let registry = server::discover(loader, &executor).await?;
            let mut router = crate::routing::Router::new(loader.config.api.router_config())?;
            let table = router.generate(&registry, resolved.include_hidden(false))?;
            println!("{}", commands_table(&registry, &table));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("artisan-api.toml");
        std::fs::write(
            &config,
            "[server]\nbind = \"127.0.0.1:7000\"\n[api]\ninclude_hidden = true\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "artisan-api",
            "--config",
            config.to_str().unwrap(),
            "commands",
        ])
        .unwrap();
        let resolved = Resolved::load(&cli).unwrap();

        assert_eq!(resolved.bind(Some("0.0.0.0:1".to_string())), "0.0.0.0:1");
        assert!(resolved.include_hidden(false));
        assert_eq!(resolved.loader.config_path, config);
    }
}
