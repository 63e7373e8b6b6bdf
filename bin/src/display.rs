//! Display utilities and argument helpers for the nativefs CLI.

use anyhow::{Result, bail};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use nativefs_lib::Encoding;
use std::collections::HashMap;

/// Content encoding accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum EncodingArg {
    Utf8,
    Ascii,
    Base64,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Utf8 => Self::Utf8,
            EncodingArg::Ascii => Self::Ascii,
            EncodingArg::Base64 => Self::Base64,
        }
    }
}

/// Parses repeated `NAME<sep>VALUE` arguments into a map.
pub(crate) fn parse_pairs(pairs: &[String], separator: char) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once(separator) {
            Some((name, value)) => Ok((name.trim().to_string(), value.trim().to_string())),
            None => bail!("Expected NAME{separator}VALUE, got: {pair}"),
        })
        .collect()
}

/// Formats a byte count with a binary unit.
pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Creates a byte progress bar, hidden in quiet mode.
///
/// The bar starts as a spinner until the total size is known.
pub(crate) fn transfer_bar(quiet: bool, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {bytes} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message);
    pb
}

/// Switches `pb` to a bar once the total size is known.
pub(crate) fn set_total(pb: &ProgressBar, total: u64) {
    pb.set_length(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
}
