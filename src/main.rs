use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use anyhow::{Result, anyhow};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod app;
mod config;
mod error;
mod handler;
mod logging;
mod panel;
mod quran;
mod render;
mod tui;
mod ui;

use api::{Endpoints, HttpFetcher};
use app::App;
use config::Config;
use logging::{init_logging, LogConfig};
use render::{render_chapter, render_matches, Rendered};

#[derive(Parser)]
#[command(name = "quran")]
#[command(about = "Look up surahs and search ayahs using the alquran.cloud API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Write logs to this file instead of the default location
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive two-pane lookup (default)
    Tui,
    /// Print a surah by number
    Chapter {
        /// Surah number (1-114)
        #[arg(allow_negative_numbers = true)]
        number: String,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Search ayahs by keyword
    Search {
        /// Keyword or phrase
        term: String,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Show the config file location, optionally writing a default one
    Config {
        /// Write the default config if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };
    let config = Config::load_from(&config_path)?;

    let command = cli.command.unwrap_or(Commands::Tui);

    let log_config = LogConfig::from_verbosity(cli.verbose);
    let log_config = match command {
        Commands::Tui => {
            let log_file = match cli.log_file {
                Some(path) => path,
                None => config.resolved_log_file()?,
            };
            log_config.with_log_file(Some(log_file))
        }
        _ => log_config.with_log_file(cli.log_file),
    };
    init_logging(&log_config)?;

    match command {
        Commands::Tui => run_tui(&config).await,
        Commands::Chapter { number, format } => print_chapter(&config, &number, format).await,
        Commands::Search { term, format } => print_search(&config, &term, format).await,
        Commands::Config { init } => show_config(&config, &config_path, init),
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let mut app = App::new(config, Arc::new(HttpFetcher::new()), events.sender());
    tracing::info!("tui started");

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

async fn print_chapter(config: &Config, number: &str, format: Format) -> Result<()> {
    let fetcher = HttpFetcher::new();
    let endpoints = Endpoints::from_config(config);

    match quran::lookup_chapter(&fetcher, &endpoints, number).await {
        Ok(chapter) => {
            print_rendered(&render_chapter(&chapter), format)?;
            Ok(())
        }
        Err(e) => Err(anyhow!("{}", e.user_message())),
    }
}

async fn print_search(config: &Config, term: &str, format: Format) -> Result<()> {
    let fetcher = HttpFetcher::new();
    let endpoints = Endpoints::from_config(config);

    match quran::search_keyword(&fetcher, &endpoints, term).await {
        Ok(result) => {
            if !result.is_empty() {
                eprintln!("{} matches", result.len().to_string().bold());
            }
            print_rendered(&render_matches(&result), format)?;
            Ok(())
        }
        Err(e) => Err(anyhow!("{}", e.user_message())),
    }
}

fn print_rendered(rendered: &Rendered, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(rendered)?),
        Format::Html => println!("{}", rendered.to_html()),
        Format::Text if !std::io::stdout().is_terminal() => print!("{}", rendered.to_plain()),
        Format::Text => {
            if let Some(header) = &rendered.header {
                println!("\n{}", header.bold().green());
                println!("{}", "=".repeat(50).dimmed());
            }
            for line in &rendered.lines {
                println!("\n{}  {}", line.label.bold().yellow(), line.text);
            }
            if let Some(notice) = &rendered.notice {
                println!("{}", notice.red());
            }
        }
    }
    Ok(())
}

fn show_config(config: &Config, path: &std::path::Path, init: bool) -> Result<()> {
    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            config.save_to(path)?;
            println!("Wrote default config: {}", path.display());
        }
    } else {
        println!("{}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
