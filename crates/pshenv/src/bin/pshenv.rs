//! Inspects a platform environment from the command line.
//!
//! ```sh
//! # Show the decoded routing table
//! pshenv get Routes
//!
//! # Dump the resolved environment, .env overrides included
//! pshenv --dotenv .env.local export
//!
//! # Bind the listener the platform expects and report its address
//! PORT=8080 pshenv bind
//! ```

use std::io::{self, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, miette};
use pshenv::provider::clone_provider;
use pshenv::{Environment, LayeredProvider, schema};
use tracing_subscriber::EnvFilter;

/// Typed access to the environment a PaaS runtime injects.
#[derive(Debug, Parser)]
#[command(name = "pshenv", version, about)]
struct Cli {
    /// Prefix of platform variables.
    #[arg(long, env = "PSHENV_PREFIX", default_value = "PLATFORM_")]
    prefix: String,

    /// `.env` file layered over the process environment; may be missing.
    #[arg(long, default_value = ".env")]
    dotenv: PathBuf,

    /// Log filter, e.g. `pshenv=debug`.
    #[arg(long, env = "PSHENV_LOG", default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every resolved variable as a JSON object.
    Env,
    /// Print every resolved variable as `.env` text.
    Export,
    /// Print one platform variable; decoded variables print as JSON.
    Get {
        /// Variable name or alias, e.g. `TreeID` or `Vars`.
        name: String,
    },
    /// Print the variable table as JSON.
    Schema,
    /// Bind the listener from SOCKET or PORT and print its address.
    Bind,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).into_diagnostic()?)
        .with_writer(io::stderr)
        .init();

    let layers = LayeredProvider::with_dotenv(&cli.dotenv)?;
    let env = Environment::with_provider(cli.prefix, layers);
    tracing::debug!(?env, "environment ready");

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Env => {
            let snapshot = clone_provider(&env);
            let json = serde_json::to_string_pretty(snapshot.as_map()).into_diagnostic()?;
            writeln!(stdout, "{json}").into_diagnostic()?;
        }
        Command::Export => {
            write!(stdout, "{}", clone_provider(&env).to_dotenv()).into_diagnostic()?;
        }
        Command::Get { name } => {
            let spec = schema::find(&name)
                .ok_or_else(|| miette!(help = "run `pshenv schema` for the list", "unknown variable {name:?}"))?;
            let key = spec.env_key(env.prefix());
            let value = spec
                .lookup_json(&env, env.prefix())
                .ok_or_else(|| miette!("{key} is not set or could not be decoded"))?;
            match value {
                serde_json::Value::String(text) if spec.decoded.is_none() => {
                    writeln!(stdout, "{text}").into_diagnostic()?;
                }
                other => {
                    let json = serde_json::to_string_pretty(&other).into_diagnostic()?;
                    writeln!(stdout, "{json}").into_diagnostic()?;
                }
            }
        }
        Command::Schema => {
            let json = serde_json::to_string_pretty(schema::VARIABLES).into_diagnostic()?;
            writeln!(stdout, "{json}").into_diagnostic()?;
        }
        Command::Bind => {
            let listener = env.listener()?;
            let addr = listener.local_addr().into_diagnostic()?;
            writeln!(stdout, "{addr}").into_diagnostic()?;
        }
    }

    Ok(())
}
