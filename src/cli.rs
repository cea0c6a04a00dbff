use crate::config::{parse_ms, parse_section_areas, Options};
use crate::logging::LogLevel;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the simulated talk is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per event with its virtual time
    #[default]
    Timeline,
    /// Final markup after the run
    Html,
}

/// Puttanesca - dialogue reveal sequencer
#[derive(Parser, Debug, Default)]
#[command(name = "puttanesca")]
#[command(version)]
#[command(about = "Simulate the character-by-character reveal of a dialogue script", long_about = None)]
pub struct Cli {
    /// Dialogue script to play
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Configuration file (key = value)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma separated section areas (e.g. area1,area2)
    #[arg(short, long, value_name = "AREAS")]
    pub areas: Option<String>,

    /// Base wait unit in milliseconds
    #[arg(short, long = "normal-ms", value_name = "MS")]
    pub normal_ms: Option<String>,

    /// Log level (0-6)
    #[arg(short, long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<i32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Timeline)]
    pub format: OutputFormat,

    /// Skip to the end at this virtual time
    #[arg(long = "skip-at", value_name = "MS")]
    pub skip_at: Option<u64>,

    /// Close the talk at this virtual time
    #[arg(long = "close-at", value_name = "MS")]
    pub close_at: Option<u64>,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref areas) = self.areas {
            opts.section_areas = parse_section_areas(areas).context("Invalid section areas")?;
        }

        if let Some(ref ms) = self.normal_ms {
            opts.normal_ms = parse_ms(ms)?;
        }

        if let Some(level) = self.log_level {
            opts.log_level = LogLevel::from_i32(level);
        }

        opts.validate()?;
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "puttanesca",
            "talk.txt",
            "--areas",
            "left,right",
            "--format",
            "html",
            "--skip-at",
            "500",
        ])
        .unwrap();
        assert_eq!(cli.script, PathBuf::from("talk.txt"));
        assert_eq!(cli.areas.as_deref(), Some("left,right"));
        assert_eq!(cli.format, OutputFormat::Html);
        assert_eq!(cli.skip_at, Some(500));
        assert_eq!(cli.close_at, None);
    }

    #[test]
    fn test_script_is_required() {
        assert!(Cli::try_parse_from(["puttanesca"]).is_err());
    }

    #[test]
    fn test_merge_basic_options() {
        let cli = Cli {
            areas: Some("a, b ,c".to_string()),
            normal_ms: Some("100".to_string()),
            log_level: Some(5),
            ..Default::default()
        };

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.section_areas, vec!["a", "b", "c"]);
        assert_eq!(opts.normal_ms, 100);
        assert_eq!(opts.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_normal_ms() {
        let cli = Cli {
            normal_ms: Some("fast".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());

        let cli = Cli {
            normal_ms: Some("0".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }
}
