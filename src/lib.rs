// Puttanesca dialogue sequencer library

pub mod aglio;
pub mod cli;
pub mod config;
pub mod logging;
pub mod script;
pub mod sequencer;

pub use cli::Cli;
pub use config::Options;
pub use logging::LogLevel;
pub use sequencer::{Sequencer, SequencerError, SequencerRegistry, TalkEvent, TalkState};
