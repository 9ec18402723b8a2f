//! # SiteKit CLI (`sitekit`)
//!
//! Search, render, and build a static content site's article index, and
//! manage the site theme preference.
//!
//! ## Usage
//!
//! ```bash
//! sitekit --config ./config/sitekit.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sitekit search "<q>" [--tag <tag>]` | Rank the article index and print matches |
//! | `sitekit render "<q>" [--tag <tag>]` | Print the listing HTML for a query |
//! | `sitekit build` | Render site pages (partials, year, listing, code blocks) into the output directory |
//! | `sitekit theme show\|toggle\|set <theme>` | Inspect or change the theme preference |
//! | `sitekit dedent [file]` | Print a code block's copy text |
//! | `sitekit serve` | Start the HTTP server |

use anyhow::Context;
use clap::{Parser, Subcommand};
use sitekit_core::codeblock::copy_text;
use sitekit_core::search::SearchQuery;
use sitekit_core::theme::Theme;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sitekit::theme_store::{self, ThemeCommand};
use sitekit::{config, index_store, render, search, server, site_build};

/// SiteKit: article index search, rendering, and theme tooling for
/// static content sites.
#[derive(Parser)]
#[command(name = "sitekit", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/sitekit.toml")]
    config: PathBuf,

    /// Log at info level (default: warn). `RUST_LOG` overrides both.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the article index.
    ///
    /// Filters by tag, scores by query tokens (title 3, tags 2,
    /// description 1 by default), and prints matches with the
    /// total/shown counts.
    Search {
        /// Free-text query. Empty lists every article matching the tag.
        #[arg(default_value = "")]
        query: String,

        /// Tag filter (exact or substring, case- and accent-insensitive).
        #[arg(long, default_value = "")]
        tag: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the article listing HTML for a query.
    ///
    /// If the index cannot be loaded, the error alert markup is printed
    /// instead.
    Render {
        #[arg(default_value = "")]
        query: String,

        #[arg(long, default_value = "")]
        tag: String,
    },

    /// Render site pages into the output directory.
    Build,

    /// Inspect or change the theme preference.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Print the dedented copy text of a code block (reads stdin without a file).
    Dedent {
        file: Option<PathBuf>,
    },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
    /// Set the theme explicitly.
    Set {
        /// `light` or `dark`.
        theme: Theme,
    },
}

impl From<ThemeAction> for ThemeCommand {
    fn from(action: ThemeAction) -> Self {
        match action {
            ThemeAction::Show => ThemeCommand::Show,
            ThemeAction::Toggle => ThemeCommand::Toggle,
            ThemeAction::Set { theme } => ThemeCommand::Set(theme),
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Commands that don't require config
    match &cli.command {
        Commands::Dedent { file } => {
            let code = match file {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            print!("{}", copy_text(&code));
            return Ok(());
        }
        Commands::Theme { .. } => {
            // The preference file path has a default; a config is optional
            let cfg = if cli.config.exists() {
                config::load_config(&cli.config)?
            } else {
                config::Config::minimal()
            };
            if let Commands::Theme { action } = cli.command {
                theme_store::run_theme(&cfg, action.into())?;
            }
            return Ok(());
        }
        _ => {}
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query, tag, json } => {
            search::run_search(&cfg, &query, &tag, json).await?;
        }
        Commands::Render { query, tag } => {
            let load = index_store::load_index(&cfg).await;
            let html = render::render_listing(
                &load,
                &SearchQuery::new(&query, &tag),
                &cfg.search.weights(),
            );
            print!("{}", html);
        }
        Commands::Build => {
            site_build::run_build(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Dedent { .. } | Commands::Theme { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
