//! Command execution: running a console command and capturing its output.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Flag values that render an option as a bare `--flag`.
const TRUTHY: [&str; 5] = ["", "1", "true", "on", "yes"];

/// Flag values that leave an option out entirely.
const FALSY: [&str; 4] = ["0", "false", "off", "no"];

/// A single command call with its bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// Console command name.
    pub command: String,
    /// Positional argument values in signature order.
    pub arguments: Vec<String>,
    /// Named options; `None` means a bare flag.
    pub options: Vec<(String, Option<String>)>,
}

impl Invocation {
    /// Start an invocation with no parameters.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Append a positional argument.
    pub fn argument(mut self, value: impl Into<String>) -> Self {
        self.arguments.push(value.into());
        self
    }

    /// Append a named option.
    pub fn option(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.options.push((name.into(), value));
        self
    }

    /// Render the console argument vector.
    ///
    /// Options come first, then `--`, then the positional arguments, so an
    /// argument value that starts with `-` is never read as an option.
    ///
    /// ```
    /// use artisan_api::executor::Invocation;
    ///
    /// let invocation = Invocation::new("make:model")
    ///     .argument("Post")
    ///     .option("migration", Some("true".to_string()))
    ///     .option("table", Some("posts".to_string()))
    ///     .option("force", Some("false".to_string()));
    ///
    /// assert_eq!(
    ///     invocation.to_argv(),
    ///     vec!["make:model", "--migration", "--table=posts", "--", "Post"]
    /// );
    /// ```
    pub fn to_argv(&self) -> Vec<String> {
        self.to_argv_with(&[])
    }

    /// Like [`to_argv`](Self::to_argv), with `extra` options placed before
    /// the `--` separator.
    pub fn to_argv_with(&self, extra: &[String]) -> Vec<String> {
        let mut argv =
            Vec::with_capacity(2 + self.arguments.len() + self.options.len() + extra.len());
        argv.push(self.command.clone());

        for (name, value) in &self.options {
            match value.as_deref() {
                None => argv.push(format!("--{}", name)),
                Some(v) if TRUTHY.contains(&v.to_ascii_lowercase().as_str()) => {
                    argv.push(format!("--{}", name))
                }
                Some(v) if FALSY.contains(&v.to_ascii_lowercase().as_str()) => {}
                Some(v) => argv.push(format!("--{}={}", name, v)),
            }
        }
        argv.extend(extra.iter().cloned());

        if !self.arguments.is_empty() {
            argv.push("--".to_string());
            argv.extend(self.arguments.iter().cloned());
        }

        argv
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured text output.
    pub output: String,
    /// Whether the command reported success.
    pub success: bool,
    /// Process exit code, when there is one.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// A successful result.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
            exit_code: Some(0),
        }
    }

    /// A failed result.
    pub fn failure(output: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            output: output.into(),
            success: false,
            exit_code,
        }
    }
}

/// Errors that prevented a command from producing a result at all.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The command did not finish in time.
    #[error("command timed out after {0} seconds")]
    Timeout(u64),

    /// Any other executor-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Runs console commands on behalf of the entry point.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run one command to completion.
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecutorError>;
}

/// Executor settings.
#[derive(Debug, Clone)]
pub struct ProcessExecutorConfig {
    /// Program to run, e.g. `php`.
    pub program: String,
    /// Arguments placed before the command name, e.g. `artisan`.
    pub args: Vec<String>,
    /// Options added to every command, before the `--` separator.
    pub extra_args: Vec<String>,
    /// Working directory for the process.
    pub working_dir: PathBuf,
    /// Timeout per command.
    pub timeout_seconds: u64,
}

impl Default for ProcessExecutorConfig {
    fn default() -> Self {
        Self {
            program: "php".to_string(),
            args: vec!["artisan".to_string()],
            extra_args: vec!["--no-interaction".to_string(), "--no-ansi".to_string()],
            working_dir: PathBuf::from("."),
            timeout_seconds: 120,
        }
    }
}

/// Runs commands as child processes with a timeout.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    config: ProcessExecutorConfig,
}

impl ProcessExecutor {
    /// Create an executor.
    pub fn new(config: ProcessExecutorConfig) -> Self {
        Self { config }
    }

    /// Run `list --format=json` and return its raw output.
    pub async fn capture_listing(&self) -> Result<String, ExecutorError> {
        let invocation = Invocation::new("list").option("format", Some("json".to_string()));
        let result = self.run(invocation.to_argv()).await?;
        if !result.success {
            return Err(ExecutorError::Other(format!(
                "command listing failed: {}",
                result.output.trim()
            )));
        }
        Ok(result.output)
    }

    async fn run(&self, argv: Vec<String>) -> Result<CommandOutput, ExecutorError> {
        let mut cmd = TokioCommand::new(&self.config.program);
        cmd.args(&self.config.args)
            .args(&argv)
            .current_dir(&self.config.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let timeout_duration = Duration::from_secs(self.config.timeout_seconds);
        tracing::debug!(program = %self.config.program, ?argv, "spawning command");

        match timeout(timeout_duration, cmd.output()).await {
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr);
                if !stderr.trim().is_empty() {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&stderr);
                }

                Ok(CommandOutput {
                    output: text,
                    success: output.status.success(),
                    exit_code: output.status.code(),
                })
            }
            Ok(Err(source)) => Err(ExecutorError::Spawn {
                program: self.config.program.clone(),
                source,
            }),
            Err(_) => Err(ExecutorError::Timeout(self.config.timeout_seconds)),
        }
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new(ProcessExecutorConfig::default())
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ExecutorError> {
        self.run(invocation.to_argv_with(&self.config.extra_args)).await
    }
}
