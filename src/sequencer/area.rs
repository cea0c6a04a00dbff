//! Display areas sections rotate through

use super::types::{SequencerError, SequencerResult};

/// Successor of `current` in `areas`, wrapping to the first area.
/// Unknown areas fall back to the first one.
pub fn next_section_area<'a>(areas: &'a [String], current: &str) -> Option<&'a str> {
    let first = areas.first()?;
    let next = match areas.iter().position(|a| a == current) {
        Some(i) => &areas[(i + 1) % areas.len()],
        None => first,
    };
    Some(next.as_str())
}

/// Visibility class toggled on an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaVisibility {
    /// Created, not yet revealed
    #[default]
    Waiting,
    Shown,
    Hidden,
}

/// Open/close animation phase of an area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaPhase {
    #[default]
    Closed,
    Open,
    Closing,
}

/// One display region record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionArea {
    pub index: usize,
    pub area_class: String,
    visibility: AreaVisibility,
    phase: AreaPhase,
    attached: bool,
}

impl SectionArea {
    pub fn new(index: usize, area_class: &str) -> Self {
        Self {
            index,
            area_class: area_class.to_string(),
            visibility: AreaVisibility::Waiting,
            phase: AreaPhase::Closed,
            attached: true,
        }
    }

    pub fn show(&mut self) {
        self.visibility = AreaVisibility::Shown;
    }

    pub fn hide(&mut self) {
        self.visibility = AreaVisibility::Hidden;
    }

    pub fn open(&mut self) {
        self.phase = AreaPhase::Open;
    }

    /// Start the slide-up/fade-out animation
    pub fn close(&mut self) {
        self.phase = AreaPhase::Closing;
    }

    /// Drop the region after its close animation
    pub fn detach(&mut self) {
        self.phase = AreaPhase::Closed;
        self.visibility = AreaVisibility::Hidden;
        self.attached = false;
    }

    pub fn visibility(&self) -> AreaVisibility {
        self.visibility
    }

    pub fn phase(&self) -> AreaPhase {
        self.phase
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// CSS classes for the region
    pub fn classes(&self) -> Vec<&str> {
        let mut classes = vec!["section", self.area_class.as_str()];
        match self.visibility {
            AreaVisibility::Waiting => classes.push("waiting"),
            AreaVisibility::Hidden => classes.push("hidden"),
            AreaVisibility::Shown => {}
        }
        classes
    }
}

/// Rotates through the configured area classes and tracks their records
#[derive(Debug, Clone)]
pub struct AreaManager {
    areas: Vec<String>,
    current: Option<usize>,
    records: Vec<SectionArea>,
}

impl AreaManager {
    pub fn new(areas: Vec<String>) -> SequencerResult<Self> {
        if areas.is_empty() {
            return Err(SequencerError::NoSectionAreas);
        }
        Ok(Self {
            areas,
            current: None,
            records: Vec::new(),
        })
    }

    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    /// Area class most recently handed out
    pub fn current_area_class(&self) -> Option<&str> {
        self.current.map(|i| self.areas[i].as_str())
    }

    /// Advance the rotation and return the new area class
    pub fn next_area_class(&mut self) -> String {
        let next = match self.current_area_class() {
            Some(current) => next_section_area(&self.areas, current),
            None => self.areas.first().map(String::as_str),
        }
        .unwrap_or_default()
        .to_string();
        self.current = self.areas.iter().position(|a| *a == next);
        next
    }

    /// Create the record for a new section. Without an explicit class the
    /// rotation picks the next one.
    pub fn start_section(&mut self, area_class: Option<&str>, index: usize) -> &mut SectionArea {
        let class = match area_class {
            Some(class) => {
                self.current = self.areas.iter().position(|a| a == class);
                if self.current.is_none() {
                    log::debug!("Area '{}' is not in the rotation", class);
                }
                class.to_string()
            }
            None => self.next_area_class(),
        };
        self.records.push(SectionArea::new(index, &class));
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    pub fn records(&self) -> &[SectionArea] {
        &self.records
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut SectionArea> {
        self.records.iter_mut().find(|r| r.index == index)
    }
}
