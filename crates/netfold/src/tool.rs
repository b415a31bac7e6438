//! Running the network-configuration tool and folding what it prints

use std::fmt;
use std::process::Command;

use tracing::{debug, info, instrument};

use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::fold::ListTags;
use crate::records::{first_record, records, wrap_records};
use crate::value::Value;

/// A program plus its arguments
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run this invocation through `prefix` (e.g. `sudo -n`).
    /// An empty prefix leaves it unchanged.
    pub fn elevated(self, prefix: &[String]) -> Self {
        let Some((program, prefix_args)) = prefix.split_first() else {
            return self;
        };
        Self::new(program.clone())
            .args(prefix_args.iter().cloned())
            .arg(self.program)
            .args(self.args)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes invocations and captures their standard output
pub trait Runner {
    /// # Errors
    ///
    /// [`Error::Spawn`] if the program cannot be started, [`Error::Exit`] if
    /// it exits unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        (**self).run(invocation)
    }
}

/// Runs invocations as child processes
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        debug!(command = %invocation, "running");
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .map_err(|source| Error::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Exit {
                program: invocation.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The network-configuration tool, as seen by callers wanting structures
#[derive(Debug)]
pub struct Tool<R = SystemRunner> {
    config: ToolConfig,
    list_tags: ListTags,
    runner: R,
}

impl Tool<SystemRunner> {
    pub fn new(config: ToolConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: Runner> Tool<R> {
    pub fn with_runner(config: ToolConfig, runner: R) -> Self {
        let list_tags = config.list_tags();
        Self {
            config,
            list_tags,
            runner,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// All interface and configuration records, interfaces first
    ///
    /// # Errors
    ///
    /// Execution failures are returned as the runner reported them;
    /// [`Error::MalformedInput`] if the combined output holds no elements.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Value>> {
        let interfaces = self.capture(&self.config.interfaces_args, None)?;
        let configurations = self.capture(&self.config.configurations_args, None)?;

        let combined = format!("{interfaces}\n{configurations}");
        let found = records(&combined, &self.list_tags)?;
        info!(count = found.len(), "listed records");
        Ok(found)
    }

    /// The record describing one interface
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the output contains no record, plus the errors
    /// of [`Tool::list`].
    #[instrument(skip(self))]
    pub fn interface(&self, name: &str) -> Result<Value> {
        let output = self.capture(&self.config.show_args, Some(name))?;
        first_record(&output, &self.list_tags)?.ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Re-apply configuration for `name` with elevated privilege.
    ///
    /// The tool's output is passed back untouched.
    ///
    /// # Errors
    ///
    /// Execution failures, exactly as the runner reported them.
    #[instrument(skip(self))]
    pub fn reload(&self, name: &str) -> Result<String> {
        let invocation = self
            .invocation(&self.config.reload_args, Some(name))
            .elevated(&self.config.elevate);
        let output = self.runner.run(&invocation)?;
        info!(interface = name, "reloaded");
        Ok(output)
    }

    fn invocation(&self, args: &[String], target: Option<&str>) -> Invocation {
        let invocation = Invocation::new(self.config.program.clone()).args(args.iter().cloned());
        match target {
            Some(target) => invocation.arg(target),
            None => invocation,
        }
    }

    /// Run the tool and shape its output for record extraction
    fn capture(&self, args: &[String], target: Option<&str>) -> Result<String> {
        let output = self.runner.run(&self.invocation(args, target))?;
        if self.config.wrap_output {
            Ok(wrap_records(&output))
        } else {
            Ok(output)
        }
    }
}
