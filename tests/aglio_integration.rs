//! Dictionaries feeding sequencers.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serial_test::serial;

use puttanesca::aglio::{author, Aglio, AglioDic, KnotKind, AGLIO};
use puttanesca::sequencer::{Sequencer, SequencerRegistry, TalkEvent};
use puttanesca::Options;

#[test]
fn test_branch_replays_into_sequencer() {
    let mut aglio = Aglio::new();
    aglio
        .sentence("guide", "", "Which way?")
        .quantum(&["left"])
        .sentence("guide", "nervous", "Dark in here.")
        .sep_section()
        .sentence("you", "", "Keep going.")
        .sep_talk()
        .quantum(&["right"])
        .sentence("guide", "", "Sunlight!")
        .entangle(&["left"]);

    let target = aglio.resolve(aglio.last_index().unwrap()).unwrap();
    assert!(matches!(target.kind, KnotKind::Quantum { .. }));

    let registry = SequencerRegistry::new();
    let mut seq = Sequencer::new(&registry, Options::default()).unwrap();
    let consumed = author(aglio.branch(&["left"]), &mut seq);
    assert_eq!(consumed, 4);

    let sections = seq.scrap().sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].paragraphs()[0].text(), "Dark in here.");
    assert_eq!(sections[1].paragraphs()[0].actor, "you");

    let mut emotes = Vec::new();
    seq.close_scrap();
    seq.run();
    for event in seq.run_to_end() {
        if let TalkEvent::Emote { name, .. } = event {
            emotes.push(name);
        }
    }
    assert_eq!(emotes, vec!["nervous".to_string()]);
}

#[test]
fn test_dictionary_scrap_into_sequencer() {
    let mut dic = AglioDic::new();
    dic.word(&["name"], &["Ada"]);
    let greeting = dic.scrap(&["greet"], |seq| {
        seq.period("host").talk("Welcome.");
    });
    dic.scrap(&["greet", "late"], |seq| {
        seq.period("host").talk("You're late.");
    });

    let mut rng = StdRng::seed_from_u64(11);
    let picked = dic.select_scrap_with(&mut rng, &["late"]).unwrap();
    assert_eq!(picked.index, greeting + 1);
    assert_eq!(dic.next(picked.index).unwrap().index, greeting);

    let registry = SequencerRegistry::new();
    let mut seq = Sequencer::new(&registry, Options::default()).unwrap();
    picked.author(&mut seq);
    let name = dic.select_word_with(&mut rng, &["name"]).unwrap();
    seq.talk(name);
    assert_eq!(
        seq.scrap().sections()[0].paragraphs()[0].text(),
        "You're late.Ada"
    );
}

#[test]
#[serial]
fn test_global_builder() {
    let start = {
        let mut aglio = AGLIO.write();
        let start = aglio.len();
        aglio.sentence("narrator", "", "Once.").sep_talk();
        start
    };
    let aglio = AGLIO.read();
    assert_eq!(aglio.get(start).unwrap().kind.name(), "sentence");
    assert_eq!(aglio.last_index(), Some(start + 1));
}
