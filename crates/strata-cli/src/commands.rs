use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use strata_page::{ContentPage, PageConfig, PageError};
use strata_server::{ServerConfig, StrataServer};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Cat(args) => cmd_cat(config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => {
            let config = ServerConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            debug!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(ServerConfig::default()),
    }
}

fn apply_source(page: &mut PageConfig, source: SourceArgs) {
    if let Some(root) = source.root {
        page.root = root;
    }
    if !source.fallbacks.is_empty() {
        page.fallbacks = source.fallbacks;
    }
    if let Some(name) = source.default_file {
        page.default_file = name;
    }
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<ExitCode> {
    apply_source(&mut config.page, args.source);
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.no_welcome {
        config.page.welcome_page = false;
    }

    let server = StrataServer::new(config)?;
    println!(
        "{} Serving {} on {}",
        "✓".green().bold(),
        server.config().page.root.display().to_string().bold(),
        format!("http://{}", server.config().bind_addr).cyan(),
    );
    for dir in &server.config().page.fallbacks {
        println!("  Fallback: {}", dir.display().to_string().dimmed());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_cat(mut config: ServerConfig, args: CatArgs) -> anyhow::Result<ExitCode> {
    apply_source(&mut config.page, args.source);
    let page = config.page.build()?;
    let mut stdout = io::stdout().lock();
    if cat(&page, &args.path, &mut stdout)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Write the content at `path` to `out`. Returns `false` if there is none.
fn cat(page: &ContentPage, path: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    match page.handle(path) {
        Ok(content) => {
            out.write_all(&content)?;
            out.flush()?;
            Ok(true)
        }
        Err(PageError::NotFound(nf)) => {
            eprintln!("{} {}", "error:".red().bold(), nf.message.red());
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
