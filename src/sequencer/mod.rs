//! Dialogue reveal sequencer
//!
//! Turns authored dialogue into a timed, character-by-character reveal.
//!
//! # Architecture
//!
//! - Punctuation classification and wait tiers pace each character
//! - A scrap tree (sections, paragraphs, entries) holds authored content
//! - A virtual-clock timeline schedules reveals and close animations
//! - Deferreds signal the talk lifecycle to hosts
//! - Area records track the display regions sections rotate through
//! - A render step projects the tree onto markup
//!
//! # Thread Safety
//!
//! A sequencer is driven from one thread. Registries and promises are
//! shareable; their state is behind a `parking_lot` mutex.

pub mod area;
pub mod classify;
pub mod deferred;
pub mod registry;
pub mod render;
pub mod scrap;
pub mod talk;
pub mod timeline;
pub mod types;
pub mod wait;

pub use area::{next_section_area, AreaManager, SectionArea};
pub use classify::{classify, wait_type_of, PunctClass};
pub use deferred::{Deferred, Promise};
pub use registry::{ScrapArea, SequencerRegistry};
pub use render::RenderNode;
pub use scrap::{
    CharEntry, EntryKind, EntryPath, EntrySlot, Paragraph, ParagraphNode, Scrap, Section,
};
pub use talk::{Sequencer, WaitScope};
pub use timeline::Timeline;
pub use types::{Outcome, SequencerError, SequencerResult, TalkEvent, TalkState};
pub use wait::{WaitTable, WaitTier};
