//! Merge scenarios over whole catalogs: carrying old translations forward
//! against a fresh extraction, the way a catalog-update tool does.

use rstest::rstest;

use po_tools::po::{Entries, Entry, File, Location, MergeConfig, SortMode};

fn entry(id: &str, str_: &str) -> Entry {
    Entry {
        id: id.to_string(),
        str: str_.to_string(),
        ..Default::default()
    }
}

#[test]
fn test_update_scenario() {
    // The new extraction knows id1..id3; the old catalog carries a
    // translation for id1 and one string that is no longer extracted.
    let reference = File {
        name: "ref.po".to_string(),
        entries: Entries(vec![entry("id1", ""), entry("id2", ""), entry("id3", "")]),
    };
    let old = Entries(vec![
        entry("id1", "My translated string"),
        entry("obsolete string", "this is obsolete"),
    ]);

    let merged = reference.merge_with_config(
        MergeConfig {
            sort: SortMode::None,
            ..Default::default()
        },
        &[old.clone()],
    );

    assert_eq!(merged.entries.len(), 5);

    let carried = merged
        .entries
        .iter()
        .find(|e| e.id == "id1" && !e.str.is_empty())
        .expect("old translation carried into the result");
    assert!(!carried.obsolete);
    assert!(!carried.is_fuzzy());

    let retired = merged
        .entries
        .iter()
        .find(|e| e.id == "obsolete string")
        .expect("unknown entry kept for reference");
    assert!(retired.obsolete);

    // Everything the extraction still knows stays current.
    for e in merged.entries.iter().filter(|e| e.id.starts_with("id")) {
        assert!(!e.obsolete);
    }

    // Inputs are untouched.
    assert_eq!(reference.entries.len(), 3);
    assert_eq!(old.len(), 2);
}

#[test]
fn test_near_miss_is_flagged_not_retired() {
    let reference = File {
        name: "ref.po".to_string(),
        entries: Entries(vec![entry("You have %d apple", "")]),
    };
    let old = Entries(vec![entry("You have %s apple", "Tienes %s manzana")]);

    let merged = reference.merge(&[old]);
    let near = merged
        .entries
        .iter()
        .find(|e| e.id == "You have %s apple")
        .expect("present");
    assert!(near.is_fuzzy());
    assert!(!near.obsolete);
    assert_eq!(near.str, "Tienes %s manzana", "translation is kept, not discarded");
}

#[rstest]
#[case::all(SortMode::All)]
#[case::id(SortMode::Id)]
#[case::file(SortMode::File)]
#[case::line(SortMode::Line)]
#[case::fuzzy(SortMode::Fuzzy)]
#[case::obsolete(SortMode::Obsolete)]
fn test_merge_leaves_the_result_in_the_requested_order(#[case] mode: SortMode) {
    let located = |id: &str, file: &str, line: usize| Entry {
        id: id.to_string(),
        locations: vec![Location {
            file: file.to_string(),
            line,
        }],
        ..Default::default()
    };
    let reference = File {
        name: "ref.po".to_string(),
        entries: Entries(vec![
            located("zulu", "b.go", 9),
            located("alpha", "a.go", 2),
            located("mike", "a.go", 7),
        ]),
    };
    let extracted = Entries(vec![located("zulu but stale", "c.go", 1)]);

    let config = MergeConfig {
        sort: mode,
        ..Default::default()
    };
    let merged = reference.merge_with_config(config, &[extracted]);

    let sorted = match mode {
        SortMode::All => merged.entries.is_sorted(),
        SortMode::Id => merged.entries.is_sorted_by_id(),
        SortMode::File => merged.entries.is_sorted_by_file(),
        SortMode::Line => merged.entries.is_sorted_by_line(),
        SortMode::Fuzzy => merged.entries.is_sorted_by_fuzzy(),
        SortMode::Obsolete => merged.entries.is_sorted_by_obsolete(),
        SortMode::None => true,
    };
    assert!(sorted, "{:?} order holds after merge", mode);
}
