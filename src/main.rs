//! Pagesel CLI application entry point
//!
//! Opens an interactive session over a paginated collection where rows can be
//! checked page by page and the selection grown to "the first N records".
//!
//! # Usage
//!
//! ```bash
//! # Browse the remote collection (default command)
//! pagesel
//! pagesel browse
//!
//! # Browse 200 in-memory records, 10 per page
//! pagesel --offline 200 --page-size 10
//!
//! # Scripted session: select the first 30 records and print their ids
//! printf 'first 30\nq\n' | pagesel -q
//!
//! # Configuration
//! pagesel config path
//! pagesel config show
//!
//! # Shell completions
//! pagesel completions zsh > _pagesel
//! ```
//!
//! # Configuration
//!
//! The config file is created with defaults on first run in the user's config
//! directory (`~/.config/pagesel/config.toml` on Linux). `PAGESEL_*`
//! environment variables override it, e.g. `PAGESEL_CACHE__ENABLED=true`.

use pagesel::{
    PageSource, PageselError, SelectionManager,
    cli::{Cli, Commands, ConfigCommands, generate_completions},
    config::PageselConfig,
    output::{OutputWriter, StdoutWriter},
    session::{BrowseSession, DialoguerReader, LineReader, StdinReader},
    source::{CachedSource, HttpSource, MemorySource},
};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, PageselError>;

/// Install the log subscriber; `RUST_LOG` wins over `-v` and the config
fn init_tracing(cli: &Cli, config: &PageselConfig) {
    let directive = cli
        .verbosity_filter()
        .map(ToString::to_string)
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file named on the command line, or the default one
fn load_config(cli: &Cli) -> Result<PageselConfig> {
    let mut config = match &cli.config {
        Some(path) => PageselConfig::load_from(path)?,
        None => PageselConfig::load()?,
    };

    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.quiet = config.quiet || cli.quiet;
    Ok(config)
}

/// Build the page source the session will read from
fn build_source(cli: &Cli, config: &PageselConfig) -> Result<Box<dyn PageSource>> {
    let source: Box<dyn PageSource> = match cli.offline {
        Some(count) => {
            info!(count, "Using in-memory source");
            Box::new(MemorySource::synthetic(count))
        }
        None => {
            info!(base_url = %config.source.base_url, "Using HTTP source");
            Box::new(HttpSource::new(&config.source)?)
        }
    };

    if config.cache.enabled {
        debug!(
            max_pages = config.cache.max_pages,
            ttl = ?Duration::from_secs(config.cache.ttl_secs),
            "Page cache enabled"
        );
        return Ok(Box::new(CachedSource::from_config(source, &config.cache)));
    }
    Ok(source)
}

fn handle_config_command(
    cli: &Cli,
    config: &PageselConfig,
    command: &ConfigCommands,
) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match command {
        ConfigCommands::Path => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => PageselConfig::config_path()?,
            };
            writeln!(stdout, "{}", path.display())?;
        }
        ConfigCommands::Show => write!(stdout, "{}", config.to_toml()?)?,
    }
    Ok(())
}

async fn handle_browse_command(
    cli: &Cli,
    config: &PageselConfig,
    output: &dyn OutputWriter,
) -> Result<()> {
    let source = build_source(cli, config)?;
    let manager = SelectionManager::new(source, config.page_size);
    let interactive = io::stdin().is_terminal();

    let mut session = BrowseSession::new(manager, output, config.display.clone())
        .with_color(io::stdout().is_terminal())
        .with_ctrl_c_cancel(true);

    if interactive && !config.quiet {
        output.info("Type 'help' for commands, 'q' to finish");
    }

    let mut reader: Box<dyn LineReader> = if interactive {
        Box::new(DialoguerReader::new())
    } else {
        Box::new(StdinReader::stdin())
    };

    session.run(reader.as_mut()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(feature = "dynamic-completions")]
    pagesel::cli::init_dynamic_completions();

    let cli = Cli::parse_args();
    let command = cli.get_command();

    if let Commands::Completions { shell } = command {
        generate_completions(shell, &mut io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    init_tracing(&cli, &config);

    let output = StdoutWriter::new(config.quiet);
    let result = match &command {
        Commands::Config { command } => handle_config_command(&cli, &config, command),
        Commands::Browse => handle_browse_command(&cli, &config, &output).await,
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        output.error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}
