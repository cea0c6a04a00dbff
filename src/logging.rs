use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::sync::Once;

/// Log levels, numbered the way config files and the CLI spell them
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

static INIT: Once = Once::new();

/// Install the stderr logger. Later calls only change the level.
///
/// The backend accepts every level; filtering is left to
/// `log::max_level()` so the level can be raised after the first call.
pub fn init(level: LogLevel) {
    INIT.call_once(|| {
        let config = ConfigBuilder::new()
            .set_time_level(LevelFilter::Off)
            .set_target_level(LevelFilter::Debug)
            .build();
        if let Err(e) = TermLogger::init(
            LevelFilter::Trace,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ) {
            eprintln!("Logger already installed, keeping it: {}", e);
        }
    });
    log::set_max_level(level.to_level_filter());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_i32() {
        assert_eq!(LogLevel::from_i32(0), LogLevel::Nothing);
        assert_eq!(LogLevel::from_i32(1), LogLevel::User);
        assert_eq!(LogLevel::from_i32(2), LogLevel::Error);
        assert_eq!(LogLevel::from_i32(3), LogLevel::Warning);
        assert_eq!(LogLevel::from_i32(4), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(5), LogLevel::Debug);
        assert_eq!(LogLevel::from_i32(6), LogLevel::All);
    }

    #[test]
    fn test_log_level_invalid() {
        // Invalid values should default to Info
        assert_eq!(LogLevel::from_i32(100), LogLevel::Info);
        assert_eq!(LogLevel::from_i32(-1), LogLevel::Info);
    }

    #[test]
    fn test_log_level_as_i32() {
        assert_eq!(LogLevel::Nothing.as_i32(), 0);
        assert_eq!(LogLevel::Warning.as_i32(), 3);
        assert_eq!(LogLevel::All.as_i32(), 6);
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(LogLevel::Nothing.to_level_filter(), LevelFilter::Off);
        assert_eq!(LogLevel::User.to_level_filter(), LevelFilter::Error);
        assert_eq!(LogLevel::Warning.to_level_filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::All.to_level_filter(), LevelFilter::Trace);
    }

    #[test]
    fn test_init_is_repeatable() {
        init(LogLevel::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
        init(LogLevel::Error);
        assert_eq!(log::max_level(), LevelFilter::Error);
        log::error!("logging test message");
    }
}
