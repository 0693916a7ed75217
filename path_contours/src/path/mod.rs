//! SVG path data: parsing into commands, decomposing into straight-edged sub-paths and encoding
//! geometry back into path data.
mod command;
pub mod encode;
mod flatten;
mod parser;

pub use command::*;
pub use flatten::*;

use thiserror::Error;

/// Non-fatal problem found while parsing or decomposing path data. The offending command (or
/// sub-path) is skipped and the rest of the data is still processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathDataIssue {
    #[error("unsupported path command '{letter}' at byte {offset}")]
    UnsupportedCommand { letter: char, offset: usize },
    #[error("path command '{letter}' at byte {offset} is missing arguments")]
    MissingArguments { letter: char, offset: usize },
    #[error("unexpected character '{ch}' at byte {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("path command '{letter}' at byte {offset} has an out of range number")]
    NonFiniteNumber { letter: char, offset: usize },
    #[error("number at byte {offset} has no command")]
    NumberWithoutCommand { offset: usize },
    #[error("path data starts with a drawing command, starting from the origin")]
    NoInitialMove,
    #[error("sub-path {index} has fewer than 2 distinct points and was dropped")]
    DegenerateSubPath { index: usize },
}
