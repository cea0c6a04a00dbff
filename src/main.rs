use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use puttanesca::cli::{Cli, OutputFormat};
use puttanesca::config;
use puttanesca::logging::{self, LogLevel};
use puttanesca::script;
use puttanesca::sequencer::{Sequencer, SequencerRegistry, TalkEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Skip,
    Close,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging early so config warnings are seen
    let early_level = cli.log_level.map_or(LogLevel::Warning, LogLevel::from_i32);
    logging::init(early_level);

    let options = config::load_config(cli.config.as_deref())?;
    let options = cli.merge_into_options(options)?;
    logging::init(options.log_level);

    let text = fs::read_to_string(&cli.script)
        .with_context(|| format!("Failed to read script {}", cli.script.display()))?;
    let directives = script::parse_script(&text)
        .with_context(|| format!("Failed to parse script {}", cli.script.display()))?;

    let registry = SequencerRegistry::new();
    let mut seq = Sequencer::new(&registry, options)?;
    script::apply(&directives, &mut seq);
    let total = seq.close_scrap();
    log::info!(
        "{}: {} entries, {} ms",
        seq.scrap_class(),
        seq.scrap().entry_count(),
        total
    );

    let mut actions: Vec<(u64, Action)> = Vec::new();
    if let Some(at) = cli.skip_at {
        actions.push((at, Action::Skip));
    }
    if let Some(at) = cli.close_at {
        actions.push((at, Action::Close));
    }
    actions.sort_by_key(|(at, _)| *at);

    let mut timeline: Vec<(u64, TalkEvent)> = Vec::new();
    seq.run();
    record(&mut timeline, seq.now(), seq.take_events());

    for (at, action) in actions {
        drive_until(&mut seq, Some(at), &mut timeline);
        match action {
            Action::Skip => {
                seq.played();
            }
            Action::Close => {
                seq.close();
            }
        }
        record(&mut timeline, at, seq.take_events());
    }
    drive_until(&mut seq, None, &mut timeline);

    if cli.close_at.is_none() {
        seq.finish();
        record(&mut timeline, seq.now(), seq.take_events());
        drive_until(&mut seq, None, &mut timeline);
    }

    match cli.format {
        OutputFormat::Timeline => {
            for (at, event) in &timeline {
                println!("{:>8} {}", at, event);
            }
        }
        OutputFormat::Html => println!("{}", seq.render().to_html()),
    }
    Ok(())
}

/// Fire triggers one due time at a time up to `until`, or until nothing is
/// scheduled.
fn drive_until(seq: &mut Sequencer, until: Option<u64>, out: &mut Vec<(u64, TalkEvent)>) {
    while let Some(due) = seq.next_due() {
        if until.is_some_and(|limit| due > limit) {
            break;
        }
        let events = seq.advance_to(due);
        record(out, due, events);
    }
    if let Some(limit) = until {
        let events = seq.advance_to(limit);
        record(out, limit, events);
    }
}

fn record(out: &mut Vec<(u64, TalkEvent)>, at: u64, events: Vec<TalkEvent>) {
    out.extend(events.into_iter().map(|e| (at, e)));
}
