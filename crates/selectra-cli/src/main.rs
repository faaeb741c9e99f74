use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use selectra_core::{filter_options, load_options, Binding, ComboboxConfig};
use selectra_tui::app::App;
use selectra_tui::catalog::Catalog;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "selectra",
    about = "Creatable, filterable single-select picker for the terminal",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting SELECTRA_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a value interactively.
    Pick {
        /// Option list (.json array or .toml with [[options]]).
        #[arg(long)]
        options: PathBuf,
        /// Initially selected value.
        #[arg(long)]
        value: Option<String>,
        /// Run the widget in controlled mode.
        #[arg(long)]
        controlled: bool,
        /// Offer to create options that match nothing.
        #[arg(long)]
        creatable: bool,
        /// Write created options back to the option list.
        #[arg(long)]
        persist: bool,
        /// Config file to use instead of the standard one.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Simulated latency of the create call.
        #[arg(long, default_value = "0")]
        latency_ms: u64,
        /// Log file (defaults to the cache directory).
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Filter an option list without the TUI.
    Filter {
        #[arg(long)]
        options: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
    },

    /// Show the effective config.
    Config {
        /// Print only the config file path.
        #[arg(long)]
        path: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("SELECTRA_JSON").as_deref() == Ok("1");

    match cli.command {
        Commands::Pick {
            options,
            value,
            controlled,
            creatable,
            persist,
            config,
            latency_ms,
            log_file,
        } => {
            init_logging(log_file)?;

            let mut config = load_config(config.as_deref())?;
            config.creatable |= creatable;

            let items = load_options(&options)
                .with_context(|| format!("failed to load options from {}", options.display()))?;
            let mut catalog = Catalog::new(items).with_latency(Duration::from_millis(latency_ms));
            if persist {
                catalog = catalog.with_path(options.clone());
            }

            let binding = if controlled {
                Binding::controlled(value)
            } else {
                Binding::uncontrolled(value)
            };

            // Create calls are spawned onto this runtime from the event loop.
            let runtime = tokio::runtime::Runtime::new()?;
            let _guard = runtime.enter();

            let mut app = App::new(config, binding, Arc::new(catalog));
            selectra_tui::run_tui(&mut app)?;

            let selected = app.selected_option().cloned();
            tracing::info!(value = ?selected.as_ref().map(|o| &o.value), "picker closed");

            if json_output {
                print_json(&serde_json::json!({ "status": "ok", "data": selected }))?;
            } else if let Some(option) = selected {
                println!("{}", option.value);
            } else if let Some(value) = app.selected_value() {
                println!("{value}");
            }
        }

        Commands::Filter { options, query } => {
            let items = load_options(&options)
                .with_context(|| format!("failed to load options from {}", options.display()))?;
            let matches: Vec<_> = filter_options(&items, &query)
                .into_iter()
                .filter_map(|i| items.get(i))
                .collect();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": matches, "total": matches.len(), "query": query },
                }))?;
            } else if matches.is_empty() {
                println!("No options match \"{query}\".");
            } else {
                for option in &matches {
                    let disabled = if option.disabled { "  (disabled)" } else { "" };
                    println!("{value:<20}  {label}{disabled}", value = option.value, label = option.label);
                }
            }
        }

        Commands::Config { path } => {
            let config_path = ComboboxConfig::config_path();
            if path {
                println!("{}", config_path.display());
            } else {
                let config = ComboboxConfig::load()?;
                if json_output {
                    print_json(&serde_json::json!({
                        "status": "ok",
                        "data": config,
                        "meta": { "path": config_path },
                    }))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ComboboxConfig> {
    match path {
        Some(path) => ComboboxConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ComboboxConfig::load()?),
    }
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("selectra")
            .join("selectra.log"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("SELECTRA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_pick_flags() {
        let cli = Cli::parse_from([
            "selectra", "pick", "--options", "langs.json", "--creatable", "--latency-ms", "300",
        ]);
        match cli.command {
            Commands::Pick { options, creatable, latency_ms, controlled, .. } => {
                assert_eq!(options, PathBuf::from("langs.json"));
                assert!(creatable);
                assert!(!controlled);
                assert_eq!(latency_ms, 300);
            }
            _ => panic!("expected pick"),
        }
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = 0\ncreatable = true\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.debounce_ms, 0);
        assert!(config.creatable);
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
