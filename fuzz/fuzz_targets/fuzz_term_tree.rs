#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagsearch::index::TermTree;
use tagsearch::index::writer::serialize;

#[derive(Arbitrary, Debug)]
struct Insert {
    term: String,
    doc: u32,
}

fuzz_target!(|inserts: Vec<Insert>| {
    let mut tree = TermTree::new();
    for insert in &inserts {
        tree.insert(&insert.term, insert.doc);
    }
    tree.check_invariants().unwrap();
    let terms = tree.iter().count();
    assert_eq!(terms, tree.len());

    let mut lookup = Vec::new();
    let mut postings = Vec::new();
    let summary = serialize(tree, &mut lookup, &mut postings).unwrap();
    assert_eq!(summary.terms, terms);
});
