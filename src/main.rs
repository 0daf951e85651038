//! iptv-settings
//!
//! Command-line front end for the layered IPTV configuration: inspect the
//! effective settings, edit the user file and bootstrap a config directory.

use anyhow::{Result, bail};
use clap::Parser;
use iptv_settings::cli::{Cli, Command};
use iptv_settings::config::{
    APP_PORT_ENV, ConfigStore, ConfigTier, CopyOutcome, LITE_ENV, get_resolution_value,
};
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn show(store: &ConfigStore, json: bool) -> Result<()> {
    let snapshot = serde_json::to_value(store.snapshot())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if let Some(fields) = snapshot.as_object() {
        for (key, value) in fields {
            match value {
                serde_json::Value::String(s) => println!("{} = {}", key, s),
                other => println!("{} = {}", key, other),
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // Loaded once and passed down by reference.
    let mut store = ConfigStore::load();
    debug!(files = ?store.loaded_files(), "Configuration loaded");

    match cli.command {
        Command::Show { json } => show(&store, json)?,
        Command::Get(args) => match store.get(&args.section, &args.key) {
            Some(value) => println!("{}", value),
            None => bail!("No value for [{}] {}", args.section, args.key),
        },
        Command::Set { key, value } => {
            store.set(&key.section, &key.key, value)?;
            let path = store.save()?;
            println!("Saved {}", path.display());
        }
        Command::Init => match store.copy() {
            CopyOutcome::Copied { files } => {
                for file in &files {
                    println!("{}", file.display());
                }
            }
            // Already reported to the user by `copy`
            CopyOutcome::Failed { .. } => {}
        },
        Command::Resolution { text } => println!("{}", get_resolution_value(&text)),
        Command::Paths => {
            println!("defaults: {}", store.default_config_path().display());
            println!("user:     {}", store.user_config_path().display());
            for (tier, path) in store.loaded_files() {
                println!("loaded ({}): {}", tier, path.display());
            }
            let env = store.env();
            if let Some(ref port) = env.app_port {
                println!("{}: {}={}", ConfigTier::Environment, APP_PORT_ENV, port);
            }
            if env.lite {
                println!("{}: {} set", ConfigTier::Environment, LITE_ENV);
            }
        }
    }

    Ok(())
}
