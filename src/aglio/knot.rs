//! Knot records appended by the dialogue tree builder

use std::collections::BTreeSet;

use crate::sequencer::Sequencer;

/// Order-independent set of tags
pub type TagSet = BTreeSet<String>;

/// Build a tag set from string slices
pub fn tag_set<S: AsRef<str>>(tags: &[S]) -> TagSet {
    tags.iter().map(|t| t.as_ref().to_string()).collect()
}

/// Payload of a knot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnotKind {
    /// One spoken line
    Sentence {
        actor: String,
        emotion: String,
        speech: String,
    },
    /// Section divider
    SepSection,
    /// Talk divider
    SepTalk,
    /// Branch point registered under a tag combination
    Quantum { tags: TagSet },
    /// Request to continue at the quantum with this combination
    Entangle { state: TagSet },
    /// Named vocabulary
    Terms { name: String, values: Vec<String> },
    /// Forced end of the previous entry
    End,
}

impl KnotKind {
    /// Short name of the variant
    pub fn name(&self) -> &'static str {
        match self {
            KnotKind::Sentence { .. } => "sentence",
            KnotKind::SepSection => "sepSection",
            KnotKind::SepTalk => "sepTalk",
            KnotKind::Quantum { .. } => "quantum",
            KnotKind::Entangle { .. } => "entangle",
            KnotKind::Terms { .. } => "terms",
            KnotKind::End => "end",
        }
    }
}

/// One authored record with its insertion index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knot {
    pub index: usize,
    pub kind: KnotKind,
}

/// Replay knots as authoring calls on a sequencer.
///
/// Stops at the first talk divider or end knot and returns how many knots
/// were consumed, including that divider.
pub fn author(knots: &[Knot], seq: &mut Sequencer) -> usize {
    for (consumed, knot) in knots.iter().enumerate() {
        match &knot.kind {
            KnotKind::Sentence {
                actor,
                emotion,
                speech,
            } => {
                seq.period(actor);
                if !emotion.is_empty() {
                    seq.emote(emotion);
                }
                seq.talk(speech);
            }
            KnotKind::SepSection => {
                seq.section(None);
            }
            KnotKind::SepTalk | KnotKind::End => return consumed + 1,
            KnotKind::Quantum { .. } | KnotKind::Entangle { .. } | KnotKind::Terms { .. } => {
                log::debug!("Skipping {} knot {} while authoring", knot.kind.name(), knot.index);
            }
        }
    }
    knots.len()
}
