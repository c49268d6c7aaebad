use std::path::PathBuf;

use poetry_db::{LEMMAS_FILE, LoadMode, POEMS_FILE, PoetryData, load_lemmas};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("corpus")
}

#[test]
fn loads_poems_with_all_fields() {
    let data = PoetryData::load(fixture_dir()).expect("load fixtures");
    assert_eq!(data.poem_count(), 3);

    let second = &data.poems()[1];
    assert_eq!(second.id, 2);
    assert_eq!(second.display_title.as_deref(), Some("Светило солнце"));
    assert_eq!(second.in_cycle, Some(true));
    assert_eq!(second.cycle_name.as_deref(), Some("Времена года"));
    assert_eq!(second.section_name.as_deref(), Some("Ранние стихи"));
    assert_eq!(second.has_title, Some(false));
    assert_eq!(second.line_count(), 3);
    assert!(second.has_epigraph());
    assert!(second.has_dedication());
}

#[test]
fn keeps_dictionary_order_and_skips_malformed_records() {
    let data = PoetryData::load(fixture_dir()).expect("load fixtures");
    let lemmas = data.lemmas();
    let words: Vec<&str> = lemmas.iter().map(|(w, _)| w).collect();
    assert_eq!(
        words,
        vec!["дождя", "Дождём,", "дождём", "стали", "солнце", "Светило", "город"]
    );
    // `17` inside "город" and the string value of "спал".
    assert_eq!(lemmas.skipped(), 2);

    let (_, stali) = lemmas.iter().find(|(w, _)| *w == "стали").unwrap();
    assert_eq!(stali.len(), 2);
    assert_eq!(stali[1].normal_form.as_deref(), Some("сталь"));
}

#[test]
fn owned_and_mmap_modes_agree() {
    let mmap = PoetryData::load_with_mode(fixture_dir(), LoadMode::Mmap).unwrap();
    let owned = PoetryData::load_with_mode(fixture_dir(), LoadMode::Owned).unwrap();
    assert_eq!(mmap.poems(), owned.poems());
    assert_eq!(mmap.lemmas(), owned.lemmas());
}

#[test]
fn reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(POEMS_FILE), "[]").unwrap();
    let err = PoetryData::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains(LEMMAS_FILE));
}

#[test]
fn reports_unparseable_json_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(LEMMAS_FILE);
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    let err = load_lemmas(&path, LoadMode::Owned).unwrap_err();
    assert!(format!("{err:#}").contains("parse lemmas"));
}
