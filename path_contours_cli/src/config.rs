//! Settings: built in defaults, overridden by an optional JSON file, overridden by command line
//! options.
use crate::{
    cli::{CommonArgs, OffsetArgs},
    error::{Error, Result},
    units::Unit,
};
use log::debug;
use path_contours::{
    clip::ClipOptions,
    offset::{EndType, JoinType, OffsetOptions, OffsetSeries},
    path::FlattenOptions,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Which elements the offset effect processes, decided by their last sub-path.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PathTypes {
    #[default]
    Both,
    #[serde(alias = "open_paths")]
    #[value(alias = "open_paths")]
    OpenPaths,
    #[serde(alias = "closed_paths")]
    #[value(alias = "closed_paths")]
    ClosedPaths,
}

impl PathTypes {
    pub fn accepts(self, last_closed: bool) -> bool {
        match self {
            PathTypes::Both => true,
            PathTypes::OpenPaths => !last_closed,
            PathTypes::ClosedPaths => last_closed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OffsetSettings {
    pub unit: String,
    pub offset_count: usize,
    pub offset: f64,
    pub init_offset: f64,
    pub offset_increase: f64,
    pub join_type: JoinType,
    pub end_type: EndType,
    pub miter_limit: f64,
    pub clipper_scale: u32,
    pub arc_tolerance: f64,
    pub copy_org: bool,
    pub individual: bool,
    pub group: bool,
    pub path_types: PathTypes,
}

impl Default for OffsetSettings {
    fn default() -> Self {
        OffsetSettings {
            unit: "mm".to_string(),
            offset_count: 1,
            offset: 1.0,
            init_offset: 1.0,
            offset_increase: 0.0,
            join_type: JoinType::Miter,
            end_type: EndType::OpenSquare,
            miter_limit: 3.0,
            clipper_scale: 1024,
            arc_tolerance: 0.25,
            copy_org: true,
            individual: true,
            group: true,
            path_types: PathTypes::Both,
        }
    }
}

impl OffsetSettings {
    pub fn unit(&self) -> Result<Unit> {
        self.unit.parse()
    }

    pub fn series(&self) -> OffsetSeries<f64> {
        OffsetSeries {
            count: self.offset_count,
            initial: self.init_offset,
            step: self.offset,
            increase: self.offset_increase,
        }
    }

    pub fn offset_options(&self, pos_equal_eps: f64) -> OffsetOptions<f64> {
        OffsetOptions {
            join_type: self.join_type,
            end_type: self.end_type,
            miter_limit: self.miter_limit,
            arc_tolerance: self.arc_tolerance,
            scale: f64::from(self.clipper_scale),
            pos_equal_eps,
        }
    }

    fn apply(&mut self, args: &OffsetArgs) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = &args.$field {
                    self.$field = v.clone();
                })*
            };
        }
        take!(
            unit,
            offset_count,
            offset,
            init_offset,
            offset_increase,
            join_type,
            end_type,
            miter_limit,
            clipper_scale,
            arc_tolerance,
            copy_org,
            individual,
            group,
            path_types
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Curve flatness tolerance in user units.
    pub flatness: f64,
    /// Position equality tolerance in user units.
    pub tolerance: f64,
    pub offset: OffsetSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            flatness: 0.1,
            tolerance: 1e-4,
            offset: OffsetSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, or the JSON file at `path` layered over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded settings from {path:?}: {settings:?}");
        Ok(settings)
    }

    pub fn apply_common(&mut self, args: &CommonArgs) {
        if let Some(flatness) = args.flatness {
            self.flatness = flatness;
        }
        if let Some(tolerance) = args.tolerance {
            self.tolerance = tolerance;
        }
    }

    pub fn apply_offset(&mut self, args: &OffsetArgs) {
        self.apply_common(&args.common);
        self.offset.apply(args);
    }

    /// Check all values, including the offset options, before any element is touched.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidSetting(format!("{name} must be positive, got {v}")))
            }
        };
        positive("flatness", self.flatness)?;
        positive("tolerance", self.tolerance)?;
        self.offset.unit()?;
        for (name, v) in [
            ("offset", self.offset.offset),
            ("init_offset", self.offset.init_offset),
            ("offset_increase", self.offset.offset_increase),
        ] {
            if !v.is_finite() {
                return Err(Error::InvalidSetting(format!("{name} must be finite")));
            }
        }
        if self.offset.offset_count == 0 {
            return Err(Error::InvalidSetting(
                "offset_count must be at least 1".to_string(),
            ));
        }
        self.offset.offset_options(self.tolerance).validate()?;
        Ok(())
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            flatness: self.flatness,
            pos_equal_eps: self.tolerance,
        }
    }

    pub fn clip_options(&self) -> ClipOptions<f64> {
        ClipOptions {
            pos_equal_eps: self.tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.offset.unit().unwrap(), Unit::Mm);
    }

    #[test]
    fn default_series_is_one_unit_offset() {
        let mut settings = Settings::default();
        assert_eq!(settings.offset.series().distances(1.0), vec![1.0]);
        settings.offset.offset_count = 3;
        assert_eq!(settings.offset.series().distances(2.0), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn file_then_command_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "flatness": 0.05, "offset": {{ "unit": "px", "join_type": "round", "offset_count": 4 }} }}"#
        )
        .unwrap();

        let mut settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.flatness, 0.05);
        assert_eq!(settings.offset.join_type, JoinType::Round);
        assert_eq!(settings.offset.clipper_scale, 1024);

        let cli = Cli::try_parse_from(["path-contours", "offset", "--offset-count", "2", "in.svg"])
            .unwrap();
        let Command::Offset(args) = &cli.command else {
            panic!("expected offset");
        };
        settings.apply_offset(args);
        assert_eq!(settings.offset.offset_count, 2);
        assert_eq!(settings.offset.unit, "px");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn invalid_settings() {
        let mut settings = Settings::default();
        settings.offset.unit = "parsec".to_string();
        assert!(matches!(settings.validate(), Err(Error::UnknownUnit(_))));

        let mut settings = Settings::default();
        settings.offset.clipper_scale = 1000;
        assert!(matches!(settings.validate(), Err(Error::Offset(_))));

        let mut settings = Settings::default();
        settings.tolerance = 0.0;
        assert!(matches!(settings.validate(), Err(Error::InvalidSetting(_))));
    }

    #[test]
    fn unknown_field_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "flatnes": 0.05 }}"#).unwrap();
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(Error::Config { .. })
        ));
    }
}
