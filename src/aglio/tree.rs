//! Append-only dialogue tree builder
//!
//! Knots are appended in authoring order and never change afterwards.
//! Quantum knots are also indexed by their tag combination so entangle
//! knots can be followed to them later.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::knot::{tag_set, Knot, KnotKind, TagSet};

/// Process-wide builder
pub static AGLIO: LazyLock<RwLock<Aglio>> = LazyLock::new(|| RwLock::new(Aglio::new()));

/// Ordered knot log plus the quantum tag index
#[derive(Debug, Default, Clone)]
pub struct Aglio {
    knots: Vec<Knot>,
    quanta: HashMap<TagSet, usize>,
}

impl Aglio {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: KnotKind) -> &mut Self {
        let index = self.knots.len();
        self.knots.push(Knot { index, kind });
        self
    }

    pub fn sentence(&mut self, actor: &str, emotion: &str, speech: &str) -> &mut Self {
        self.push(KnotKind::Sentence {
            actor: actor.to_string(),
            emotion: emotion.to_string(),
            speech: speech.to_string(),
        })
    }

    pub fn sep_section(&mut self) -> &mut Self {
        self.push(KnotKind::SepSection)
    }

    pub fn sep_talk(&mut self) -> &mut Self {
        self.push(KnotKind::SepTalk)
    }

    /// Close the prior entry, then register a branch point under `tags`
    pub fn quantum<S: AsRef<str>>(&mut self, tags: &[S]) -> &mut Self {
        if self.knots.last().is_some_and(|k| k.kind != KnotKind::End) {
            self.push(KnotKind::End);
        }
        let tags = tag_set(tags);
        let index = self.knots.len();
        if let Some(previous) = self.quanta.insert(tags.clone(), index) {
            log::debug!(
                "Quantum {:?} at knot {} replaces knot {}",
                tags,
                index,
                previous
            );
        }
        self.push(KnotKind::Quantum { tags })
    }

    /// Record a desired tag combination to branch into
    pub fn entangle<S: AsRef<str>>(&mut self, state: &[S]) -> &mut Self {
        self.push(KnotKind::Entangle {
            state: tag_set(state),
        })
    }

    /// Record a named vocabulary list
    pub fn terms<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> &mut Self {
        self.push(KnotKind::Terms {
            name: name.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        })
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn get(&self, index: usize) -> Option<&Knot> {
        self.knots.get(index)
    }

    /// Index of the most recent knot
    pub fn last_index(&self) -> Option<usize> {
        self.knots.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Quantum knot registered for exactly this tag combination
    pub fn lookup<S: AsRef<str>>(&self, tags: &[S]) -> Option<&Knot> {
        let index = *self.quanta.get(&tag_set(tags))?;
        self.knots.get(index)
    }

    /// Follow an entangle knot to its quantum target
    pub fn resolve(&self, entangle_index: usize) -> Option<&Knot> {
        match &self.knots.get(entangle_index)?.kind {
            KnotKind::Entangle { state } => {
                let index = *self.quanta.get(state)?;
                self.knots.get(index)
            }
            _ => None,
        }
    }

    /// Knots following the quantum registered under `tags`
    pub fn branch<S: AsRef<str>>(&self, tags: &[S]) -> &[Knot] {
        match self.lookup(tags) {
            Some(knot) => &self.knots[knot.index + 1..],
            None => &[],
        }
    }
}
