//! Flat `key = value # comment` config files.
//!
//! Reading is deliberately simple: everything from the first `#` is dropped,
//! the rest must split into exactly two parts on `=`, both parts are trimmed
//! and one layer of double quotes is removed from the value. A `#` inside a
//! quoted value therefore still starts a comment, and a value containing `=`
//! makes the line unreadable. Writing emits `name=value # usage` for every
//! config and never quotes.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use crate::observability::spans;
use crate::registry::{Binding, ConfigSet};
use crate::{Error, Result};

/// Split a config line into its key and value.
///
/// Returns `None` for blank lines, comment-only lines and lines that do not
/// contain exactly one `=` before the comment.
#[must_use]
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let content = line.split_once('#').map_or(line, |(before, _)| before);

    let mut parts = content.split('=');
    let key = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    Some((key.trim(), value))
}

/// Render one config as a file line, without the trailing newline.
#[must_use]
pub fn render_line(binding: &Binding) -> String {
    format!("{}={} # {}", binding.name, binding.current(), binding.usage)
}

impl ConfigSet {
    /// Apply every `key = value` line from `reader`.
    ///
    /// Lines rejected by [`ConfigSet::set`] are logged and skipped. Each line
    /// is decoded on its own, with invalid UTF-8 replaced by U+FFFD, so a
    /// stray byte never affects the lines around it.
    /// Returns the number of lines applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if reading fails.
    pub fn read_from(&mut self, mut reader: impl BufRead) -> Result<usize> {
        let mut applied = 0;
        let mut raw = Vec::new();
        let mut number = 0usize;
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            number += 1;

            let bytes = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
            let line = String::from_utf8_lossy(bytes);
            let Some((key, value)) = parse_line(&line) else {
                continue;
            };
            match self.set(key, value) {
                Ok(()) => applied += 1,
                Err(err) => {
                    tracing::warn!(line = number, key, %err, "skipping config line");
                }
            }
        }
        Ok(applied)
    }

    /// Write every config, in name order, one line each.
    ///
    /// Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_to(&self, mut writer: impl Write) -> Result<usize> {
        for binding in self.formal.values() {
            writeln!(writer, "{}", render_line(binding))?;
        }
        writer.flush()?;
        Ok(self.formal.len())
    }

    /// Load the backing file.
    ///
    /// A file that does not exist counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFile`] if no file is attached and [`Error::Io`] if
    /// the file cannot be opened or read.
    pub fn try_load(&mut self) -> Result<usize> {
        let path = self.path.clone().ok_or(Error::NoFile)?;
        let _span = spans::file_span("load", &path).entered();
        tracing::info!("loading config");

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("config file does not exist");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let applied = self.read_from(BufReader::new(file))?;
        tracing::debug!(applied, "config loaded");
        Ok(applied)
    }

    /// Write every config to the backing file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFile`] if no file is attached and [`Error::Io`] if
    /// the file cannot be created or written.
    pub fn try_save(&self) -> Result<usize> {
        let path = self.path.as_ref().ok_or(Error::NoFile)?;
        let _span = spans::file_span("save", path).entered();
        tracing::info!("writing config");

        let written = self.write_to(BufWriter::new(File::create(path)?))?;
        tracing::debug!(written, "config saved");
        Ok(written)
    }

    /// Load the backing file, logging instead of returning failures.
    pub fn load(&mut self) {
        match self.try_load() {
            Ok(_) => {}
            Err(Error::NoFile) => tracing::info!("no file to load"),
            Err(err) => tracing::warn!(%err, "failed to load config"),
        }
    }

    /// Save to the backing file, logging instead of returning failures.
    pub fn save(&self) {
        match self.try_save() {
            Ok(_) => {}
            Err(Error::NoFile) => tracing::info!("no file to save"),
            Err(err) => tracing::warn!(%err, "failed to save config"),
        }
    }

    /// Write an aligned listing of every config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn write_listing(&self, mut writer: impl Write) -> Result<()> {
        for binding in self.formal.values() {
            writeln!(
                writer,
                "{:<20} = {} # {}",
                binding.name,
                binding.current(),
                binding.usage
            )?;
        }
        Ok(())
    }

    /// Print the listing to stdout.
    pub fn print(&self) {
        if let Err(err) = self.write_listing(io::stdout().lock()) {
            tracing::warn!(%err, "failed to print config");
        }
    }
}
