use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: serve static content from confined directories",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML config file; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve a directory over HTTP
    Serve(ServeArgs),
    /// Resolve one request path and print its content
    Cat(CatArgs),
}

/// Where content comes from; shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Root directory
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Directory consulted when the root has no content (repeatable)
    #[arg(long = "fallback")]
    pub fallbacks: Vec<PathBuf>,
    /// Document served for directory requests
    #[arg(long)]
    pub default_file: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Do not serve the built-in welcome page
    #[arg(long)]
    pub no_welcome: bool,
}

#[derive(Args)]
pub struct CatArgs {
    /// Request path, e.g. `/` or `/docs/page.html`
    pub path: String,
    #[command(flatten)]
    pub source: SourceArgs,
}
