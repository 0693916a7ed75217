use clap::{builder::BoolishValueParser, Args, Parser, Subcommand};
use path_contours::offset::{EndType, JoinType};
use std::path::PathBuf;

use crate::config::PathTypes;

/// Offset and destructive clip effects for SVG documents.
#[derive(Debug, Parser)]
#[command(name = "path-contours", version, about, long_about = None)]
pub struct Cli {
    /// JSON settings file, command line options take precedence
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create concentric offsets of the selected paths
    Offset(OffsetArgs),
    /// Clip the selected paths with the first selected closed path
    Clip(ClipArgs),
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Input SVG document
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Selected element id, repeat in selection order
    #[arg(long = "id", alias = "ids", value_name = "ID")]
    pub ids: Vec<String>,

    /// Curve flatness tolerance in user units
    #[arg(long, value_name = "F")]
    pub flatness: Option<f64>,

    /// Position equality tolerance in user units
    #[arg(long, value_name = "F")]
    pub tolerance: Option<f64>,

    /// Write the result to FILE instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input document
    #[arg(long, alias = "in_place")]
    pub in_place: bool,

    /// Active dialog tab, ignored
    #[arg(long, hide = true)]
    pub tab: Option<String>,
}

#[derive(Debug, Args)]
pub struct OffsetArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Unit of all offset lengths (px, pt, pc, mm, cm, m, in, ft, yd, Q)
    #[arg(long, value_name = "UNIT")]
    pub unit: Option<String>,

    /// Number of offsets
    #[arg(long, alias = "offset_count", value_name = "N")]
    pub offset_count: Option<usize>,

    /// Distance between consecutive offsets
    #[arg(long, value_name = "D", allow_hyphen_values = true)]
    pub offset: Option<f64>,

    /// Distance of the first offset
    #[arg(long, alias = "init_offset", value_name = "D", allow_hyphen_values = true)]
    pub init_offset: Option<f64>,

    /// Quadratic growth of the distance between offsets
    #[arg(long, alias = "offset_increase", value_name = "D", allow_hyphen_values = true)]
    pub offset_increase: Option<f64>,

    /// Corner join: square, round, miter (or 0, 1, 2)
    #[arg(long, aliases = ["join_type", "jointype"], value_name = "JOIN")]
    pub join_type: Option<JoinType>,

    /// End handling: closed-polygon, closed-line, open-butt, open-square, open-round (or 0..4)
    #[arg(long, aliases = ["end_type", "endtype"], value_name = "END")]
    pub end_type: Option<EndType>,

    /// Miter limit as a multiple of the offset distance
    #[arg(long, aliases = ["miter_limit", "miterlimit"], value_name = "F")]
    pub miter_limit: Option<f64>,

    /// Integer grid scale, a power of two
    #[arg(long, aliases = ["clipper_scale", "clipperscale"], value_name = "N")]
    pub clipper_scale: Option<u32>,

    /// Round join and cap tolerance in grid units
    #[arg(long, alias = "arc_tolerance", value_name = "F")]
    pub arc_tolerance: Option<f64>,

    /// Keep the source element
    #[arg(long, alias = "copy_org", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub copy_org: Option<bool>,

    /// One new element per offset polygon
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub individual: Option<bool>,

    /// Put new elements in a group
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub group: Option<bool>,

    /// Which elements to process by their last sub-path
    #[arg(long, alias = "path_types", value_enum, value_name = "TYPES")]
    pub path_types: Option<PathTypes>,
}

#[derive(Debug, Args)]
pub struct ClipArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Offset(args) => &args.common,
            Command::Clip(args) => &args.common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn host_style_options() {
        let cli = Cli::try_parse_from([
            "path-contours",
            "offset",
            "--id=path1",
            "--id=path2",
            "--tab=options",
            "--offset_count=3",
            "--offset=-1.5",
            "--jointype=1",
            "--endtype=open_round",
            "--copy_org=false",
            "--path_types=closed_paths",
            "drawing.svg",
        ])
        .unwrap();
        let Command::Offset(args) = cli.command else {
            panic!("expected offset");
        };
        assert_eq!(args.common.ids, vec!["path1", "path2"]);
        assert_eq!(args.offset_count, Some(3));
        assert_eq!(args.offset, Some(-1.5));
        assert_eq!(args.join_type, Some(JoinType::Round));
        assert_eq!(args.end_type, Some(EndType::OpenRound));
        assert_eq!(args.copy_org, Some(false));
        assert_eq!(args.path_types, Some(PathTypes::ClosedPaths));
    }

    #[test]
    fn output_conflicts_with_in_place() {
        let result = Cli::try_parse_from([
            "path-contours",
            "clip",
            "--output",
            "out.svg",
            "--in-place",
            "drawing.svg",
        ]);
        assert!(result.is_err());
    }
}
