//! Dialogue authoring dictionaries
//!
//! - [`Aglio`] keeps an ordered log of knots (sentences, dividers, branch
//!   points) that can be replayed into a sequencer
//! - [`AglioDic`] files conversation fragments and words under tag sets
//!   for random lookup

pub mod dic;
pub mod knot;
pub mod tree;

pub use dic::{AglioDic, ScrapEntry, WordEntry};
pub use knot::{author, tag_set, Knot, KnotKind, TagSet};
pub use tree::{Aglio, AGLIO};
