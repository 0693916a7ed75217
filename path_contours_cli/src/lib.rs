//! Offset and destructive clip effects applied to SVG documents.
//!
//! A run loads settings, parses the document, applies one effect to the selected elements and
//! writes the document back. Per-element problems are logged as warnings and the element is
//! skipped; everything else is an [error::Error] mapped to an exit code.
pub mod cli;
pub mod config;
pub mod document;
pub mod elements;
pub mod error;
pub mod ops;
pub mod output;
pub mod units;

use cli::{Cli, Command};
use config::Settings;
use document::Document;
use error::{Error, Result};
use log::info;
use output::{write_document, Destination};
use std::fs;

pub fn run(cli: &Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    match &cli.command {
        Command::Offset(args) => settings.apply_offset(args),
        Command::Clip(args) => settings.apply_common(&args.common),
    }
    settings.validate()?;

    let common = cli.command.common();
    let text = fs::read_to_string(&common.input).map_err(|source| Error::Read {
        path: common.input.clone(),
        source,
    })?;
    let mut doc = Document::parse(&text)?;

    match &cli.command {
        Command::Offset(args) => {
            let report = ops::offset::offset_elements(&mut doc, &args.common.ids, &settings)?;
            info!(
                "offset {} elements into {} paths, {} skipped",
                report.processed, report.polygons, report.skipped
            );
        }
        Command::Clip(args) => {
            let report = ops::clip::clip_elements(&mut doc, &args.common.ids, &settings)?;
            info!(
                "clipped {} elements, {} unchanged, {} skipped",
                report.clipped, report.unchanged, report.skipped
            );
        }
    }

    write_document(&doc, &Destination::from_args(common))
}
