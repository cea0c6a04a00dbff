//! In-memory talk tree: scrap, sections, paragraphs and character entries
//!
//! A scrap owns its sections, a section owns its paragraphs, a paragraph
//! owns its entries. Document order is the depth-first order of that tree,
//! with each section's terminal entry after its paragraphs.

use super::classify::wait_type_of;
use super::wait::WaitTier;

/// What an entry displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// One authored character
    Glyph(char),
    /// Zero-width marker that fires an emote when reached
    Emote(String),
    /// End-of-paragraph or end-of-section pause
    Terminal,
}

/// One revealable entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharEntry {
    pub kind: EntryKind,
    /// Wait tier; `None` waits 0
    pub wait_type: Option<WaitTier>,
    /// Own delay assigned by `calc_wait`
    pub delay_ms: u64,
    /// Absolute reveal time relative to talk start
    pub timestamp: u64,
    pub visible: bool,
    /// Set while the fade-in animation runs
    pub fading: bool,
}

impl CharEntry {
    fn with_kind(kind: EntryKind, wait_type: Option<WaitTier>) -> Self {
        Self {
            kind,
            wait_type,
            delay_ms: 0,
            timestamp: 0,
            visible: true,
            fading: false,
        }
    }

    /// Character entry classified by punctuation
    pub fn glyph(c: char) -> Self {
        Self::with_kind(EntryKind::Glyph(c), Some(wait_type_of(c)))
    }

    pub fn emote(name: &str) -> Self {
        Self::with_kind(EntryKind::Emote(name.to_string()), None)
    }

    pub fn terminal(tier: WaitTier) -> Self {
        Self::with_kind(EntryKind::Terminal, Some(tier))
    }

    pub fn glyph_char(&self) -> Option<char> {
        match self.kind {
            EntryKind::Glyph(c) => Some(c),
            _ => None,
        }
    }

    pub fn emote_name(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Emote(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == EntryKind::Terminal
    }
}

/// Child of a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphNode {
    Char(CharEntry),
    LineBreak,
}

/// Entries spoken by one actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub actor: String,
    nodes: Vec<ParagraphNode>,
    closed: bool,
}

impl Paragraph {
    pub fn new(actor: &str) -> Self {
        Self {
            actor: actor.to_string(),
            nodes: Vec::new(),
            closed: false,
        }
    }

    pub fn push_entry(&mut self, entry: CharEntry) {
        self.nodes.push(ParagraphNode::Char(entry));
    }

    pub fn push_break(&mut self) {
        self.nodes.push(ParagraphNode::LineBreak);
    }

    /// Append the period pause and mark the paragraph closed
    pub fn close(&mut self) {
        if !self.closed {
            self.push_entry(CharEntry::terminal(WaitTier::Period));
            self.closed = true;
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn nodes(&self) -> &[ParagraphNode] {
        &self.nodes
    }

    pub fn entries(&self) -> impl Iterator<Item = &CharEntry> + '_ {
        self.nodes.iter().filter_map(|n| match n {
            ParagraphNode::Char(e) => Some(e),
            ParagraphNode::LineBreak => None,
        })
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut CharEntry> + '_ {
        self.nodes.iter_mut().filter_map(|n| match n {
            ParagraphNode::Char(e) => Some(e),
            ParagraphNode::LineBreak => None,
        })
    }

    /// Authored text of the paragraph
    pub fn text(&self) -> String {
        self.entries().filter_map(CharEntry::glyph_char).collect()
    }
}

/// Paragraphs displayed together in one area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Process-wide section number from the registry
    pub index: usize,
    pub area_class: String,
    paragraphs: Vec<Paragraph>,
    terminal: Option<CharEntry>,
}

impl Section {
    pub fn new(index: usize, area_class: &str) -> Self {
        Self {
            index,
            area_class: area_class.to_string(),
            paragraphs: Vec::new(),
            terminal: None,
        }
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Last paragraph if it is still open
    pub fn open_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.paragraphs.last_mut().filter(|p| !p.is_closed())
    }

    pub fn has_open_paragraph(&self) -> bool {
        self.paragraphs.last().is_some_and(|p| !p.is_closed())
    }

    /// Append the section pause. Returns false if already closed.
    pub fn close(&mut self) -> bool {
        if self.terminal.is_some() {
            return false;
        }
        if let Some(p) = self.open_paragraph_mut() {
            p.close();
        }
        self.terminal = Some(CharEntry::terminal(WaitTier::Section));
        true
    }

    pub fn is_closed(&self) -> bool {
        self.terminal.is_some()
    }

    /// Section pause entry, present once closed
    pub fn terminal(&self) -> Option<&CharEntry> {
        self.terminal.as_ref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CharEntry> + '_ {
        self.paragraphs
            .iter()
            .flat_map(|p| p.entries())
            .chain(self.terminal.iter())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut CharEntry> + '_ {
        self.paragraphs
            .iter_mut()
            .flat_map(|p| p.entries_mut())
            .chain(self.terminal.iter_mut())
    }
}

/// Root of one talk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scrap {
    /// `scrapN`, unique within the registry
    pub scrap_class: String,
    pub index: usize,
    sections: Vec<Section>,
}

impl Scrap {
    pub fn new(index: usize) -> Self {
        Self {
            scrap_class: format!("scrap{}", index),
            index,
            sections: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.iter().find(|s| s.index == index)
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.index == index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CharEntry> + '_ {
        self.sections.iter().flat_map(|s| s.entries())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut CharEntry> + '_ {
        self.sections.iter_mut().flat_map(|s| s.entries_mut())
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    /// Position of every entry, in document order
    pub fn entry_paths(&self) -> Vec<EntryPath> {
        let mut paths = Vec::new();
        for (section, s) in self.sections.iter().enumerate() {
            for (paragraph, p) in s.paragraphs.iter().enumerate() {
                for (node, n) in p.nodes.iter().enumerate() {
                    if let ParagraphNode::Char(_) = n {
                        paths.push(EntryPath {
                            section,
                            slot: EntrySlot::Node { paragraph, node },
                        });
                    }
                }
            }
            if s.terminal.is_some() {
                paths.push(EntryPath {
                    section,
                    slot: EntrySlot::Terminal,
                });
            }
        }
        paths
    }

    /// Entry at `path`, without walking the tree
    pub fn entry_at_mut(&mut self, path: EntryPath) -> Option<&mut CharEntry> {
        let section = self.sections.get_mut(path.section)?;
        match path.slot {
            EntrySlot::Node { paragraph, node } => {
                match section.paragraphs.get_mut(paragraph)?.nodes.get_mut(node)? {
                    ParagraphNode::Char(entry) => Some(entry),
                    ParagraphNode::LineBreak => None,
                }
            }
            EntrySlot::Terminal => section.terminal.as_mut(),
        }
    }
}

/// Where an entry sits inside its section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySlot {
    Node { paragraph: usize, node: usize },
    Terminal,
}

/// Stable address of one entry. Appending content never moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPath {
    /// Position of the section in the scrap, not its registry index
    pub section: usize,
    pub slot: EntrySlot,
}
