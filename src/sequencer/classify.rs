//! Punctuation classification of authored characters
//!
//! Each character is sorted into a punctuation class which in turn picks the
//! wait tier used to pace its reveal.

use super::wait::WaitTier;

/// Opening brackets and quotes (ASCII, full-width and half-width forms)
pub const START_CHARS: &str = "「『（(［[｛{〈《【〔“‘｢";

/// Closing brackets and all punctuation that adds a pause
pub const END_CHARS: &str = "」』）)］]｝}〉》】〕”’｣、，,､・…‥･！!。．.？?｡：:；;";

/// Comma class
pub const END1_CHARS: &str = "、，,､";

/// Middle dot and ellipsis class
pub const END2_CHARS: &str = "・…‥･";

/// Exclamation class
pub const END3_CHARS: &str = "！!";

/// Period and question class
pub const END4_CHARS: &str = "。．.？?｡";

/// Punctuation class of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctClass {
    Normal,
    Start,
    End,
    End1,
    End2,
    End3,
    End4,
}

/// Classify a character. First match wins; characters outside every set
/// have no class.
pub fn classify(c: char) -> Option<PunctClass> {
    if c == ' ' {
        return Some(PunctClass::Normal);
    }
    if START_CHARS.contains(c) {
        return Some(PunctClass::Start);
    }
    if END_CHARS.contains(c) {
        let class = if END1_CHARS.contains(c) {
            PunctClass::End1
        } else if END2_CHARS.contains(c) {
            PunctClass::End2
        } else if END3_CHARS.contains(c) {
            PunctClass::End3
        } else if END4_CHARS.contains(c) {
            PunctClass::End4
        } else {
            PunctClass::End
        };
        return Some(class);
    }
    None
}

/// Wait tier for a punctuation class. Missing classes pace like normal text.
pub fn wait_type_of_class(class: Option<PunctClass>) -> WaitTier {
    match class {
        Some(PunctClass::End) | Some(PunctClass::End1) => WaitTier::B,
        Some(PunctClass::End2) => WaitTier::C,
        Some(PunctClass::End3) => WaitTier::D,
        Some(PunctClass::End4) => WaitTier::E,
        _ => WaitTier::A,
    }
}

/// Wait tier for a character
pub fn wait_type_of(c: char) -> WaitTier {
    wait_type_of_class(classify(c))
}
