//! Wait tiers and their millisecond values

use std::fmt;

/// Base unit every tier is a multiple of
pub const NORMAL_MS: u64 = 120;
/// Fade-in duration of one character
pub const SHOW_CHAR_WAIT_MS: u64 = 300;
/// Section close animation duration
pub const SECTION_CLOSE_WAIT_MS: u64 = 400;
/// Talk-level wait, long enough to mean "until told otherwise"
pub const TALK_WAIT_MS: u64 = 20_000;

/// Named delay tier attached to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitTier {
    A,
    B,
    C,
    D,
    E,
    Period,
    Section,
    Talk,
}

impl WaitTier {
    /// Attribute value (`data-wait-type`)
    pub fn name(self) -> &'static str {
        match self {
            WaitTier::A => "a",
            WaitTier::B => "b",
            WaitTier::C => "c",
            WaitTier::D => "d",
            WaitTier::E => "e",
            WaitTier::Period => "period",
            WaitTier::Section => "section",
            WaitTier::Talk => "talk",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "a" => Some(WaitTier::A),
            "b" => Some(WaitTier::B),
            "c" => Some(WaitTier::C),
            "d" => Some(WaitTier::D),
            "e" => Some(WaitTier::E),
            "period" => Some(WaitTier::Period),
            "section" => Some(WaitTier::Section),
            "talk" => Some(WaitTier::Talk),
            _ => None,
        }
    }

    /// Whether this tier can come out of character classification
    pub fn is_glyph_tier(self) -> bool {
        matches!(
            self,
            WaitTier::A | WaitTier::B | WaitTier::C | WaitTier::D | WaitTier::E
        )
    }
}

impl fmt::Display for WaitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Millisecond lookup for every tier plus the animation durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTable {
    pub normal_ms: u64,
    pub show_char_wait: u64,
    pub section_close_wait: u64,
    pub talk: u64,
}

impl Default for WaitTable {
    fn default() -> Self {
        Self {
            normal_ms: NORMAL_MS,
            show_char_wait: SHOW_CHAR_WAIT_MS,
            section_close_wait: SECTION_CLOSE_WAIT_MS,
            talk: TALK_WAIT_MS,
        }
    }
}

impl WaitTable {
    /// Table with a different base unit and default animation durations
    pub fn with_normal_ms(normal_ms: u64) -> Self {
        Self {
            normal_ms,
            ..Default::default()
        }
    }

    /// Delay of a tier in milliseconds
    pub fn ms(&self, tier: WaitTier) -> u64 {
        // Multipliers are in tenths of the base unit.
        let tenths = match tier {
            WaitTier::A => 10,
            WaitTier::C => 15,
            WaitTier::B => 30,
            WaitTier::D => 35,
            WaitTier::E => 45,
            WaitTier::Period | WaitTier::Section => 50,
            WaitTier::Talk => return self.talk,
        };
        let ms = u128::from(self.normal_ms) * tenths / 10;
        u64::try_from(ms).unwrap_or(u64::MAX)
    }

    /// Delay of an optional tier; untiered entries wait 0
    pub fn lookup(&self, tier: Option<WaitTier>) -> u64 {
        tier.map_or(0, |t| self.ms(t))
    }
}
