//! The talk sequencer
//!
//! One [`Sequencer`] owns one scrap. Authoring calls (`section`, `period`,
//! `talk`, `emote`, `br`) build the scrap; `calc_wait` assigns every entry
//! its reveal time; `run` schedules the reveals on a virtual clock that the
//! host drives with `advance_to`/`advance_by`.
//!
//! # Lifecycle
//!
//! `play -> played -> closing -> close`, exposed through four deferreds:
//! - `play` resolves on `played()` (skip) and is abandoned on close
//! - `played` resolves when the last entry is revealed, and is abandoned
//!   whenever `play` is
//! - `closing` settles on `close()` (abandoned) or `finish()` (resolved);
//!   either way every registered section close animation runs
//! - `closed` resolves once those animations have all finished

use std::fmt;

use super::area::AreaManager;
use super::deferred::{Deferred, Promise};
use super::registry::SequencerRegistry;
use super::render::{self, RenderNode};
use super::scrap::{CharEntry, EntryPath, Paragraph, Scrap, Section};
use super::timeline::Timeline;
use super::types::{Outcome, SequencerError, SequencerResult, TalkEvent, TalkState};
use super::wait::WaitTable;
use crate::config::Options;

/// Subtree `calc_wait` walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitScope {
    /// Every section of the scrap on one timeline
    Scrap,
    /// One section, timed from zero
    Section(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Reveal { entry: usize, last: bool },
    FadeDone { entry: usize },
    SectionClosed { section: usize },
}

type EmoteHandler = Box<dyn FnMut(&str) + Send>;

/// Sequencer for one talk
pub struct Sequencer {
    registry: SequencerRegistry,
    options: Options,
    waits: WaitTable,
    scrap: Scrap,
    areas: AreaManager,
    /// Index of the section content is appended to
    current_section: Option<usize>,
    timeline: Timeline<Trigger>,
    start_time: Option<u64>,
    /// Entry positions fixed by `run`, indexed like the reveal triggers
    entry_paths: Vec<EntryPath>,

    play: Deferred,
    played: Deferred,
    closing: Deferred,
    closed: Deferred,

    /// Sections whose close animation runs on teardown
    close_animations: Vec<usize>,
    pending_closes: usize,

    emote_handler: Option<EmoteHandler>,
    events: Vec<TalkEvent>,
}

impl fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("scrap_class", &self.scrap.scrap_class)
            .field("state", &self.state())
            .field("now", &self.timeline.now())
            .field("current_section", &self.current_section)
            .field("close_animations", &self.close_animations)
            .finish()
    }
}

impl Sequencer {
    /// Create a talk and attach its scrap under the registry's scrap area
    pub fn new(registry: &SequencerRegistry, options: Options) -> SequencerResult<Self> {
        options.validate()?;
        let areas = AreaManager::new(options.section_areas.clone())?;
        let scrap = Scrap::new(registry.next_talk_index());
        registry.attach_scrap(&scrap.scrap_class);

        let play = Deferred::new();
        let played = Deferred::new();
        let forced = played.clone();
        play.promise().fail(move || {
            forced.reject();
        });

        log::debug!("{}: created", scrap.scrap_class);
        Ok(Self {
            registry: registry.clone(),
            waits: options.wait_table(),
            options,
            scrap,
            areas,
            current_section: None,
            timeline: Timeline::new(0),
            start_time: None,
            entry_paths: Vec::new(),
            play,
            played,
            closing: Deferred::new(),
            closed: Deferred::new(),
            close_animations: Vec::new(),
            pending_closes: 0,
            emote_handler: None,
            events: Vec::new(),
        })
    }

    /// Talk on the process-wide registry with default options
    pub fn with_defaults() -> SequencerResult<Self> {
        Self::new(&SequencerRegistry::global(), Options::default())
    }

    // Accessors

    pub fn scrap(&self) -> &Scrap {
        &self.scrap
    }

    pub fn scrap_class(&self) -> &str {
        &self.scrap.scrap_class
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &SequencerRegistry {
        &self.registry
    }

    pub fn areas(&self) -> &AreaManager {
        &self.areas
    }

    pub fn wait_table(&self) -> &WaitTable {
        &self.waits
    }

    pub fn current_section(&self) -> Option<usize> {
        self.current_section
    }

    /// Sections with a registered close animation
    pub fn close_animations(&self) -> &[usize] {
        &self.close_animations
    }

    /// Current virtual time
    pub fn now(&self) -> u64 {
        self.timeline.now()
    }

    /// Time of the earliest scheduled trigger
    pub fn next_due(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    /// Absolute start time chosen by `run`
    pub fn start_time(&self) -> Option<u64> {
        self.start_time
    }

    pub fn state(&self) -> TalkState {
        if !self.closed.is_pending() {
            TalkState::Closed
        } else if !self.closing.is_pending() {
            TalkState::Closing
        } else if !self.played.is_pending() {
            TalkState::Played
        } else {
            TalkState::Play
        }
    }

    pub fn play_promise(&self) -> Promise {
        self.play.promise()
    }

    pub fn played_promise(&self) -> Promise {
        self.played.promise()
    }

    pub fn closing_promise(&self) -> Promise {
        self.closing.promise()
    }

    pub fn closed_promise(&self) -> Promise {
        self.closed.promise()
    }

    /// Callback run with the emote name when an emote marker is revealed
    pub fn set_emote_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.emote_handler = Some(Box::new(handler));
    }

    // Authoring

    fn is_sealed(&self) -> bool {
        if self.closing.is_pending() {
            return false;
        }
        log::warn!("{}: ignoring authoring call after close", self.scrap.scrap_class);
        true
    }

    /// Close the current section and open a new one in `area_class`, or in
    /// the next area of the rotation.
    pub fn section(&mut self, area_class: Option<&str>) -> &mut Self {
        if self.is_sealed() {
            return self;
        }
        self.end_section();

        let index = self.registry.next_section_index();
        let record = self.areas.start_section(area_class, index);
        record.open();
        let class = record.area_class.clone();

        self.scrap.push_section(Section::new(index, &class));
        self.current_section = Some(index);
        self.close_animations.push(index);
        log::debug!(
            "{}: section {} in {}",
            self.scrap.scrap_class,
            index,
            class
        );
        self
    }

    /// Close the open paragraph and the current section. A second call with
    /// nothing appended in between does nothing.
    pub fn end_section(&mut self) -> &mut Self {
        if let Some(index) = self.current_section.take() {
            if let Some(section) = self.scrap.section_mut(index) {
                section.close();
            }
        }
        self
    }

    /// Close the open paragraph and start a new one spoken by `actor`
    pub fn period(&mut self, actor: &str) -> &mut Self {
        if self.is_sealed() {
            return self;
        }
        if self.current_section.is_none() {
            self.section(None);
        }
        self.end_period();
        if let Some(section) = self.current_section_mut() {
            section.push_paragraph(Paragraph::new(actor));
        }
        self
    }

    /// Close the open paragraph, if any
    pub fn end_period(&mut self) -> &mut Self {
        if let Some(paragraph) = self.open_paragraph_mut() {
            paragraph.close();
        }
        self
    }

    /// Append one entry per character of `text`
    pub fn talk(&mut self, text: &str) -> &mut Self {
        if self.is_sealed() {
            return self;
        }
        if let Some(paragraph) = self.ensure_paragraph() {
            for c in text.chars() {
                paragraph.push_entry(CharEntry::glyph(c));
            }
        }
        self
    }

    /// Append a zero-width emote marker
    pub fn emote(&mut self, name: &str) -> &mut Self {
        if self.is_sealed() {
            return self;
        }
        if let Some(paragraph) = self.ensure_paragraph() {
            paragraph.push_entry(CharEntry::emote(name));
        }
        self
    }

    /// Append a line break
    pub fn br(&mut self) -> &mut Self {
        if self.is_sealed() {
            return self;
        }
        if let Some(paragraph) = self.ensure_paragraph() {
            paragraph.push_break();
        }
        self
    }

    fn current_section_mut(&mut self) -> Option<&mut Section> {
        let index = self.current_section?;
        self.scrap.section_mut(index)
    }

    fn open_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.current_section_mut()?.open_paragraph_mut()
    }

    fn ensure_paragraph(&mut self) -> Option<&mut Paragraph> {
        let has_open = self
            .current_section
            .and_then(|i| self.scrap.section(i))
            .is_some_and(Section::has_open_paragraph);
        if !has_open {
            let actor = self.options.default_actor.clone();
            log::debug!(
                "{}: no open paragraph, opening one for '{}'",
                self.scrap.scrap_class,
                actor
            );
            self.period(&actor);
        }
        self.open_paragraph_mut()
    }

    // Timing

    /// Assign delays and absolute timestamps to every entry in `scope`, in
    /// document order, and hide them. Returns the total duration.
    pub fn calc_wait(&mut self, scope: WaitScope) -> SequencerResult<u64> {
        if !self.closing.is_pending() {
            return Err(SequencerError::TalkClosed);
        }
        let waits = self.waits;
        let mut time = 0u64;
        let mut assign = |entry: &mut CharEntry| {
            let ms = waits.lookup(entry.wait_type);
            entry.delay_ms = ms;
            entry.visible = false;
            entry.fading = false;
            time = time.saturating_add(ms);
            entry.timestamp = time;
        };

        match scope {
            WaitScope::Scrap => self.scrap.entries_mut().for_each(&mut assign),
            WaitScope::Section(index) => self
                .scrap
                .section_mut(index)
                .ok_or(SequencerError::InvalidSection(index))?
                .entries_mut()
                .for_each(&mut assign),
        }
        Ok(time)
    }

    /// End the current section and time the whole scrap. A torn down talk
    /// times as zero.
    pub fn close_scrap(&mut self) -> u64 {
        self.end_section();
        match self.calc_wait(WaitScope::Scrap) {
            Ok(total) => total,
            Err(e) => {
                log::warn!("{}: close_scrap: {}", self.scrap.scrap_class, e);
                0
            }
        }
    }

    /// Schedule every entry's reveal at `start_time + timestamp`.
    /// Returns the play promise.
    pub fn run(&mut self) -> Promise {
        if !self.closing.is_pending() {
            log::warn!("{}: run after close", self.scrap.scrap_class);
            return self.play.promise();
        }
        if self.start_time.is_some() {
            return self.play.promise();
        }

        let start = self.options.start_time.unwrap_or_else(|| self.timeline.now());
        self.start_time = Some(start);
        let indices: Vec<usize> = self.scrap.sections().iter().map(|s| s.index).collect();
        for index in indices {
            if let Some(area) = self.areas.record_mut(index) {
                area.show();
            }
        }

        self.entry_paths = self.scrap.entry_paths();
        let total = self.entry_paths.len();
        let times: Vec<u64> = self.scrap.entries().map(|e| e.timestamp).collect();
        for (entry, timestamp) in times.into_iter().enumerate() {
            self.timeline.schedule_at(
                start.saturating_add(timestamp),
                Trigger::Reveal {
                    entry,
                    last: entry + 1 == total,
                },
            );
        }
        log::debug!(
            "{}: run at {} with {} entries",
            self.scrap.scrap_class,
            start,
            total
        );

        if total == 0 {
            self.settle_played(Outcome::Resolved);
        } else if !self.play.is_pending() {
            self.flush_reveals();
        }
        self.play.promise()
    }

    /// Skip to the end: resolve `play` and reveal everything still pending.
    /// Returns false if `play` had already settled.
    pub fn played(&mut self) -> bool {
        if !self.play.resolve() {
            return false;
        }
        log::debug!("{}: play resolved", self.scrap.scrap_class);
        if self.start_time.is_some() {
            self.flush_reveals();
        }
        true
    }

    /// Request teardown, abandoning the talk
    pub fn close(&mut self) -> bool {
        self.settle_closing(Outcome::Abandoned)
    }

    /// Request teardown after normal completion
    pub fn finish(&mut self) -> bool {
        self.settle_closing(Outcome::Resolved)
    }

    fn settle_closing(&mut self, outcome: Outcome) -> bool {
        if !self.closing.settle(outcome) {
            return false;
        }
        log::debug!("{}: closing ({})", self.scrap.scrap_class, outcome);

        // Runs for either outcome. Abandoning `play` abandons `played`.
        let played_pending = self.played.is_pending();
        self.play.reject();
        self.played.reject();
        if played_pending {
            self.events.push(TalkEvent::Played(Outcome::Abandoned));
        }
        self.timeline
            .cancel_where(|t| matches!(t, Trigger::Reveal { .. } | Trigger::FadeDone { .. }));
        for entry in self.scrap.entries_mut() {
            entry.fading = false;
        }

        let now = self.timeline.now();
        let wait = self.waits.section_close_wait;
        self.pending_closes = self.close_animations.len();
        for &section in &self.close_animations {
            if let Some(area) = self.areas.record_mut(section) {
                area.close();
            }
            self.timeline
                .schedule_at(now.saturating_add(wait), Trigger::SectionClosed { section });
            self.events.push(TalkEvent::SectionCloseStarted { section });
        }
        if self.pending_closes == 0 {
            self.finish_teardown();
        }
        true
    }

    fn finish_teardown(&mut self) {
        if self.closed.resolve() {
            self.registry.detach_scrap(&self.scrap.scrap_class);
            self.events.push(TalkEvent::Closed);
            log::debug!("{}: closed", self.scrap.scrap_class);
        }
    }

    fn settle_played(&mut self, outcome: Outcome) {
        if self.played.settle(outcome) {
            self.events.push(TalkEvent::Played(outcome));
        }
    }

    fn flush_reveals(&mut self) {
        let pending = self
            .timeline
            .cancel_where(|t| matches!(t, Trigger::Reveal { .. }));
        for trigger in pending {
            if let Trigger::Reveal { entry, last } = trigger {
                self.reveal(entry, last);
            }
        }
    }

    fn reveal(&mut self, index: usize, last: bool) {
        let animate = self.play.is_pending() && self.closing.is_pending();
        let now = self.timeline.now();
        let fade = self.waits.show_char_wait;

        let mut emote = None;
        let path = self.entry_paths.get(index).copied();
        if let Some(entry) = path.and_then(|p| self.scrap.entry_at_mut(p)) {
            entry.visible = true;
            entry.fading = animate;
            self.events.push(TalkEvent::CharShown {
                entry: index,
                glyph: entry.glyph_char(),
            });
            if animate {
                emote = entry.emote_name().map(str::to_string);
            }
        }

        if animate {
            if let Some(name) = emote {
                if let Some(handler) = self.emote_handler.as_mut() {
                    handler(&name);
                }
                self.events.push(TalkEvent::Emote { entry: index, name });
            }
            self.timeline
                .schedule_at(now.saturating_add(fade), Trigger::FadeDone { entry: index });
        }

        if last {
            self.settle_played(Outcome::Resolved);
        }
    }

    fn fire(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Reveal { entry, last } => self.reveal(entry, last),
            Trigger::FadeDone { entry } => {
                let path = self.entry_paths.get(entry).copied();
                if let Some(e) = path.and_then(|p| self.scrap.entry_at_mut(p)) {
                    e.fading = false;
                }
                self.events.push(TalkEvent::FadeInComplete { entry });
            }
            Trigger::SectionClosed { section } => {
                if let Some(area) = self.areas.record_mut(section) {
                    area.detach();
                }
                self.events.push(TalkEvent::SectionClosed { section });
                self.pending_closes = self.pending_closes.saturating_sub(1);
                if self.pending_closes == 0 {
                    self.finish_teardown();
                }
            }
        }
    }

    /// Fire every trigger due up to `time` and return what happened,
    /// including events raised by `played`/`close` since the last call.
    pub fn advance_to(&mut self, time: u64) -> Vec<TalkEvent> {
        while let Some((_, trigger)) = self.timeline.pop_due(time) {
            self.fire(trigger);
        }
        self.timeline.set_now(time);
        self.take_events()
    }

    pub fn advance_by(&mut self, delta: u64) -> Vec<TalkEvent> {
        let target = self.timeline.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Run the clock until nothing is scheduled
    pub fn run_to_end(&mut self) -> Vec<TalkEvent> {
        let mut events = self.take_events();
        while let Some(due) = self.timeline.next_due() {
            events.extend(self.advance_to(due));
        }
        events
    }

    /// Drain events raised outside of clock advances
    pub fn take_events(&mut self) -> Vec<TalkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Project the scrap onto a markup tree
    pub fn render(&self) -> RenderNode {
        render::project(&self.scrap, &self.areas)
    }
}
