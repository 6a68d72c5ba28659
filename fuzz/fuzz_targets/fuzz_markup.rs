#![no_main]

use libfuzzer_sys::fuzz_target;
use tagsearch::index::build::index_reader;
use tagsearch::utils::{MarkupEvent, tokenize_bytes};

fuzz_target!(|data: &[u8]| {
    let mut events: Vec<MarkupEvent> = Vec::new();
    tokenize_bytes(data, &mut events);
    for event in &events {
        if let MarkupEvent::Word(word) = event {
            assert!(word.len() > 1);
            assert!(word.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    // Malformed document numbers must never abort indexing
    let indexer = index_reader(data, &Default::default()).unwrap();
    assert!(indexer.tree().check_invariants().is_ok());
});
