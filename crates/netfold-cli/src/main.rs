use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use netfold::{convert, ListTags, Tool, ToolConfig};

#[derive(Debug, Parser)]
#[command(
    name = "netfold",
    version,
    about = "Fold network-configuration tool output into JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Indent the JSON output
    #[arg(short, long, global = true)]
    pretty: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert markup from a file or stdin
    Convert {
        /// Input file (defaults to stdin)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,
        /// Tag whose children form a list (repeatable)
        #[arg(short, long = "list-tag", value_name = "TAG")]
        list_tags: Vec<String>,
    },
    /// List all interface and configuration records
    List(ToolArgs),
    /// Show the record for one interface
    Show {
        name: String,
        #[command(flatten)]
        tool: ToolArgs,
    },
    /// Re-apply configuration for one interface (elevated)
    Reload {
        name: String,
        #[command(flatten)]
        tool: ToolArgs,
    },
}

#[derive(Debug, Args)]
struct ToolArgs {
    /// TOML config describing how to run the tool
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl ToolArgs {
    fn tool(&self) -> Result<Tool> {
        let config = match &self.config {
            Some(path) => ToolConfig::load(path)?,
            None => ToolConfig::default(),
        };
        debug!(program = %config.program, "using tool");
        Ok(Tool::new(config))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert { input, list_tags } => {
            let text = read_input(input.as_ref())?;
            let tags: ListTags = list_tags.iter().collect();
            let value = convert(&text, &tags).context("failed to convert input")?;
            write_json(&value, cli.pretty)
        }
        Command::List(tool) => {
            let records = tool.tool()?.list()?;
            write_json(&records, cli.pretty)
        }
        Command::Show { name, tool } => {
            let record = tool.tool()?.interface(&name)?;
            write_json(&record, cli.pretty)
        }
        Command::Reload { name, tool } => {
            let output = tool.tool()?.reload(&name)?;
            io::stdout()
                .write_all(output.as_bytes())
                .context("failed to write stdout")
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout).context("failed to write stdout")
}
