use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::logging::LogLevel;
use crate::sequencer::types::{SequencerError, SequencerResult, DEFAULT_ACTOR, DEFAULT_SECTION_AREAS};
use crate::sequencer::wait::{
    WaitTable, NORMAL_MS, SECTION_CLOSE_WAIT_MS, SHOW_CHAR_WAIT_MS, TALK_WAIT_MS,
};

/// Sequencer options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Base wait unit in milliseconds
    pub normal_ms: u64,
    /// Fade-in duration per character
    pub show_char_wait: u64,
    /// Section close animation duration
    pub section_close_wait: u64,
    /// Talk-level wait
    pub talk_wait: u64,
    /// Ordered display areas sections rotate through
    pub section_areas: Vec<String>,
    /// Actor for content appended with no open paragraph
    pub default_actor: String,
    /// Absolute start of playback; current clock time when unset
    pub start_time: Option<u64>,
    pub log_level: LogLevel,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            normal_ms: NORMAL_MS,
            show_char_wait: SHOW_CHAR_WAIT_MS,
            section_close_wait: SECTION_CLOSE_WAIT_MS,
            talk_wait: TALK_WAIT_MS,
            section_areas: DEFAULT_SECTION_AREAS.iter().map(|s| s.to_string()).collect(),
            default_actor: DEFAULT_ACTOR.to_string(),
            start_time: None,
            log_level: LogLevel::Warning,
        }
    }
}

impl Options {
    /// Check invariants the sequencer relies on
    pub fn validate(&self) -> SequencerResult<()> {
        if self.section_areas.is_empty() {
            return Err(SequencerError::NoSectionAreas);
        }
        if self.normal_ms == 0 {
            return Err(SequencerError::ZeroBaseUnit);
        }
        Ok(())
    }

    pub fn wait_table(&self) -> WaitTable {
        WaitTable {
            normal_ms: self.normal_ms,
            show_char_wait: self.show_char_wait,
            section_close_wait: self.section_close_wait,
            talk: self.talk_wait,
        }
    }

    pub fn with_section_areas(mut self, areas: &[&str]) -> Self {
        self.section_areas = areas.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Apply one `key = value` setting
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "normal_ms" => self.normal_ms = parse_ms(value)?,
            "show_char_wait" => self.show_char_wait = parse_ms(value)?,
            "section_close_wait" => self.section_close_wait = parse_ms(value)?,
            "talk_wait" => self.talk_wait = parse_ms(value)?,
            "section_areas" => self.section_areas = parse_section_areas(value)?,
            "default_actor" => self.default_actor = value.to_string(),
            "log_level" => {
                let level: i32 = value.parse().context("Invalid log level")?;
                self.log_level = LogLevel::from_i32(level);
            }
            _ => log::warn!("Ignoring unknown config key '{}'", key),
        }
        Ok(())
    }
}

/// Parse `key = value` lines. `#` starts a comment; lines without `=` are
/// skipped with a warning.
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for line in data.lines() {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => handler(key.trim_end(), value.trim_start()),
            None => log::warn!("Key without value: '{}'", line),
        }
    }
}

/// Load options from a property file. A missing path yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let mut options = Options::default();
    let Some(path) = path else {
        return Ok(options);
    };

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let mut first_error = None;
    parse_propfile(&data, &mut |key, value| {
        if let Err(e) = options.apply(key, value) {
            first_error.get_or_insert(e.context(format!("Bad value for '{}'", key)));
        }
    });
    if let Some(e) = first_error {
        return Err(e);
    }

    options.validate()?;
    Ok(options)
}

/// Parse a comma separated list of area classes
pub fn parse_section_areas(s: &str) -> Result<Vec<String>> {
    let areas: Vec<String> = s
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    if areas.is_empty() {
        anyhow::bail!("At least one section area is required");
    }
    Ok(areas)
}

/// Parse a millisecond value
pub fn parse_ms(s: &str) -> Result<u64> {
    s.trim().parse().context("Invalid millisecond value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert_eq!(opts.normal_ms, 120);
        assert_eq!(opts.section_areas, vec!["area1", "area2"]);
        assert_eq!(opts.default_actor, "default");
        assert!(opts.start_time.is_none());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let opts = Options::default().with_section_areas(&[]);
        assert_eq!(opts.validate(), Err(SequencerError::NoSectionAreas));

        let opts = Options {
            normal_ms: 0,
            ..Default::default()
        };
        assert_eq!(opts.validate(), Err(SequencerError::ZeroBaseUnit));
    }

    #[test]
    fn test_wait_table_follows_options() {
        let opts = Options {
            normal_ms: 100,
            show_char_wait: 50,
            ..Default::default()
        };
        let table = opts.wait_table();
        assert_eq!(table.normal_ms, 100);
        assert_eq!(table.show_char_wait, 50);
        assert_eq!(table.section_close_wait, 400);
    }

    #[test]
    fn test_parse_section_areas() {
        assert_eq!(
            parse_section_areas("left, right ,center").unwrap(),
            vec!["left", "right", "center"]
        );
        assert!(parse_section_areas(" , ").is_err());
    }

    #[test]
    fn test_parse_ms() {
        assert_eq!(parse_ms(" 250 ").unwrap(), 250);
        assert!(parse_ms("-1").is_err());
        assert!(parse_ms("abc").is_err());
    }

    #[test]
    fn test_parse_propfile() {
        let mut pairs = Vec::new();
        parse_propfile(
            "# header\nnormal_ms = 100  # inline\n\nbare\nsection_areas=a,b\n",
            &mut |k, v| pairs.push((k.to_string(), v.to_string())),
        );
        assert_eq!(
            pairs,
            vec![
                ("normal_ms".to_string(), "100".to_string()),
                ("section_areas".to_string(), "a,b".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_config_none_is_default() {
        assert_eq!(load_config(None).unwrap(), Options::default());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "normal_ms = 80").unwrap();
        writeln!(file, "section_areas = top, bottom").unwrap();
        writeln!(file, "default_actor = narrator").unwrap();
        writeln!(file, "log_level = 5").unwrap();
        writeln!(file, "colour = red").unwrap();

        let opts = load_config(Some(file.path())).unwrap();
        assert_eq!(opts.normal_ms, 80);
        assert_eq!(opts.section_areas, vec!["top", "bottom"]);
        assert_eq!(opts.default_actor, "narrator");
        assert_eq!(opts.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_load_config_bad_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "normal_ms = fast").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Some(Path::new("/nonexistent/puttanesca.cfg"))).is_err());
    }
}
