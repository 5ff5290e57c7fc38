//! confset - inspect and edit flat config files
//!
//! Loads a `key = value` file, applies overrides given in flag syntax,
//! prints the result and optionally writes it back.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use confset::observability::init_tracing;
use confset::ConfigSet;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// confset - inspect and edit flat config files
#[derive(Parser, Debug)]
#[command(name = "confset")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to load (a missing file counts as empty)
    file: Option<PathBuf>,

    /// Write the file back after applying overrides
    #[arg(short, long, requires = "file")]
    write: bool,

    /// Reject override keys that are not already in the file
    #[arg(long)]
    strict: bool,

    /// Print entries as JSON instead of the text listing
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CONFSET_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, env = "CONFSET_LOG_JSON")]
    log_json: bool,

    /// Overrides such as `-port=8080 -name value`, after `--`
    #[arg(last = true, allow_hyphen_values = true)]
    overrides: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !LOG_LEVELS.contains(&cli.log_level.to_lowercase().as_str()) {
        bail!(
            "invalid log level '{}', must be one of: {}",
            cli.log_level,
            LOG_LEVELS.join(", ")
        );
    }
    init_tracing(&cli.log_level, cli.log_json);

    let mut set = cli
        .file
        .as_ref()
        .map_or_else(ConfigSet::new, ConfigSet::with_file);

    if set.file().is_some() {
        let applied = set.try_load().context("failed to load config file")?;
        tracing::debug!(applied, "config file applied");
    }

    let mut set = set.strict(cli.strict);
    set.parse(cli.overrides.iter().cloned())
        .context("invalid override")?;
    if set.narg() > 0 {
        tracing::warn!(ignored = ?set.args(), "ignoring arguments after the overrides");
    }

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &set.entries())?;
        writeln!(stdout)?;
    } else {
        set.write_listing(&mut stdout)?;
    }

    if cli.write {
        let written = set.try_save().context("failed to write config file")?;
        tracing::info!(written, "config file written");
    }

    Ok(())
}
