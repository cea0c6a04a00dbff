//! Core types for the dialogue sequencer

use std::fmt;

/// Error type for sequencer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    /// No section areas were configured
    #[error("Section area list is empty")]
    NoSectionAreas,
    /// The base wait unit must be positive
    #[error("Base wait unit must be positive")]
    ZeroBaseUnit,
    /// Section index does not exist in the current scrap
    #[error("Invalid section index: {0}")]
    InvalidSection(usize),
    /// The talk was already torn down
    #[error("Talk already closed")]
    TalkClosed,
}

/// Result type for sequencer operations
pub type SequencerResult<T> = Result<T, SequencerError>;

/// How a deferred was settled.
///
/// `Abandoned` is the normal way to drop a branch (closing a talk,
/// cancelling playback). It is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resolved,
    Abandoned,
}

impl Outcome {
    pub fn is_resolved(self) -> bool {
        self == Outcome::Resolved
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Resolved => write!(f, "resolved"),
            Outcome::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Lifecycle of one talk. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TalkState {
    /// Characters are being revealed
    #[default]
    Play,
    /// Every character is shown
    Played,
    /// Close requested, section close animations running
    Closing,
    /// Torn down
    Closed,
}

impl fmt::Display for TalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TalkState::Play => "play",
            TalkState::Played => "played",
            TalkState::Closing => "closing",
            TalkState::Closed => "close",
        };
        f.write_str(name)
    }
}

/// Something that happened while advancing the clock.
///
/// Hosts consume these in order to drive their own presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalkEvent {
    /// An entry became visible and started fading in
    CharShown { entry: usize, glyph: Option<char> },
    /// An emote marker was reached
    Emote { entry: usize, name: String },
    /// Fade-in of an entry finished
    FadeInComplete { entry: usize },
    /// The played deferred settled
    Played(Outcome),
    /// Close animation of a section started
    SectionCloseStarted { section: usize },
    /// Close animation of a section finished
    SectionClosed { section: usize },
    /// The talk was torn down and its scrap detached
    Closed,
}

impl fmt::Display for TalkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TalkEvent::CharShown {
                entry,
                glyph: Some(c),
            } => write!(f, "show #{} {:?}", entry, c),
            TalkEvent::CharShown { entry, glyph: None } => write!(f, "show #{}", entry),
            TalkEvent::Emote { entry, name } => write!(f, "emote #{} {}", entry, name),
            TalkEvent::FadeInComplete { entry } => write!(f, "faded #{}", entry),
            TalkEvent::Played(outcome) => write!(f, "played ({})", outcome),
            TalkEvent::SectionCloseStarted { section } => {
                write!(f, "section {} closing", section)
            }
            TalkEvent::SectionClosed { section } => write!(f, "section {} closed", section),
            TalkEvent::Closed => write!(f, "closed"),
        }
    }
}

/// Actor used when content is appended with no paragraph open
pub const DEFAULT_ACTOR: &str = "default";

/// Default rotation of display areas
pub const DEFAULT_SECTION_AREAS: [&str; 2] = ["area1", "area2"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencer_error_display() {
        assert_eq!(
            format!("{}", SequencerError::NoSectionAreas),
            "Section area list is empty"
        );
        assert_eq!(
            format!("{}", SequencerError::TalkClosed),
            "Talk already closed"
        );
        assert_eq!(
            format!("{}", SequencerError::InvalidSection(4)),
            "Invalid section index: 4"
        );
    }

    #[test]
    fn test_talk_event_display() {
        let shown = TalkEvent::CharShown {
            entry: 3,
            glyph: Some('a'),
        };
        assert_eq!(shown.to_string(), "show #3 'a'");
        assert_eq!(
            TalkEvent::Played(Outcome::Abandoned).to_string(),
            "played (abandoned)"
        );
        assert_eq!(
            TalkEvent::SectionClosed { section: 2 }.to_string(),
            "section 2 closed"
        );
    }

    #[test]
    fn test_talk_state_ordering() {
        assert!(TalkState::Play < TalkState::Played);
        assert!(TalkState::Played < TalkState::Closing);
        assert!(TalkState::Closing < TalkState::Closed);
        assert_eq!(TalkState::default(), TalkState::Play);
    }

    #[test]
    fn test_talk_state_display() {
        assert_eq!(TalkState::Closing.to_string(), "closing");
        assert_eq!(TalkState::Closed.to_string(), "close");
    }

    #[test]
    fn test_outcome() {
        assert!(Outcome::Resolved.is_resolved());
        assert!(!Outcome::Abandoned.is_resolved());
        assert_eq!(Outcome::Abandoned.to_string(), "abandoned");
    }
}
