//! Shared bookkeeping for sequencers
//!
//! Talk and section counters and the shared scrap area live here instead of
//! in module globals, so independent registries can coexist. A process-wide
//! registry is still available through [`SequencerRegistry::global`].

use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};

/// Id of the shared parent of every scrap
pub const SCRAP_AREA_ID: &str = "scrapArea";

static GLOBAL_REGISTRY: LazyLock<SequencerRegistry> = LazyLock::new(SequencerRegistry::new);

/// Shared container every scrap is attached under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapArea {
    pub id: String,
    children: Vec<String>,
}

impl ScrapArea {
    fn new() -> Self {
        Self {
            id: SCRAP_AREA_ID.to_string(),
            children: Vec::new(),
        }
    }

    /// Scrap classes currently attached, oldest first
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn contains(&self, scrap_class: &str) -> bool {
        self.children.iter().any(|c| c == scrap_class)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    talk_index: usize,
    section_index: usize,
    scrap_area: Option<ScrapArea>,
}

/// Cloneable handle to one set of counters and one scrap area
#[derive(Debug, Clone, Default)]
pub struct SequencerRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl SequencerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    pub fn global() -> SequencerRegistry {
        GLOBAL_REGISTRY.clone()
    }

    /// Next talk number, starting at 1
    pub fn next_talk_index(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.talk_index += 1;
        inner.talk_index
    }

    /// Next section number, starting at 1
    pub fn next_section_index(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.section_index += 1;
        inner.section_index
    }

    /// Attach a scrap, creating the scrap area on first use
    pub fn attach_scrap(&self, scrap_class: &str) {
        let mut inner = self.inner.lock();
        let area = inner.scrap_area.get_or_insert_with(|| {
            log::debug!("Creating #{}", SCRAP_AREA_ID);
            ScrapArea::new()
        });
        if !area.contains(scrap_class) {
            area.children.push(scrap_class.to_string());
        }
    }

    /// Detach a scrap. The scrap area itself stays.
    pub fn detach_scrap(&self, scrap_class: &str) -> bool {
        let mut inner = self.inner.lock();
        let Some(area) = inner.scrap_area.as_mut() else {
            return false;
        };
        let before = area.children.len();
        area.children.retain(|c| c != scrap_class);
        area.children.len() != before
    }

    /// Snapshot of the scrap area, `None` until the first scrap attaches
    pub fn scrap_area(&self) -> Option<ScrapArea> {
        self.inner.lock().scrap_area.clone()
    }

    /// Whether two handles share state
    pub fn same_as(&self, other: &SequencerRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_monotonic() {
        let r = SequencerRegistry::new();
        assert_eq!(r.next_talk_index(), 1);
        assert_eq!(r.next_talk_index(), 2);
        assert_eq!(r.next_section_index(), 1);
        assert_eq!(r.next_talk_index(), 3);
    }

    #[test]
    fn test_registries_are_independent() {
        let a = SequencerRegistry::new();
        let b = SequencerRegistry::new();
        a.next_talk_index();
        assert_eq!(b.next_talk_index(), 1);
        assert!(!a.same_as(&b));
        assert!(a.same_as(&a.clone()));
    }

    #[test]
    fn test_scrap_area_is_lazy() {
        let r = SequencerRegistry::new();
        assert!(r.scrap_area().is_none());

        r.attach_scrap("scrap1");
        r.attach_scrap("scrap2");
        r.attach_scrap("scrap1");
        let area = r.scrap_area().unwrap();
        assert_eq!(area.id, "scrapArea");
        assert_eq!(area.children(), &["scrap1".to_string(), "scrap2".to_string()]);
    }

    #[test]
    fn test_detach_keeps_area() {
        let r = SequencerRegistry::new();
        assert!(!r.detach_scrap("scrap1"));
        r.attach_scrap("scrap1");
        assert!(r.detach_scrap("scrap1"));
        assert!(!r.detach_scrap("scrap1"));
        assert!(r.scrap_area().unwrap().children().is_empty());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(SequencerRegistry::global().same_as(&SequencerRegistry::global()));
    }
}
