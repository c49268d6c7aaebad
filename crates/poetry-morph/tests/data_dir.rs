use std::env;
use std::path::PathBuf;

use poetry_db::{LoadMode, PoetryData};
use poetry_morph::{MorphDictionary, ReverseIndex, TokenizedCorpus, canonical_form, search_by_lemma};

fn data_dir() -> Option<PathBuf> {
    env::var("POETRY_DATA_DIR").ok().map(PathBuf::from)
}

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("poetry-db")
        .join("tests")
        .join("fixtures")
        .join("corpus")
}

fn ids(poems: &[&poetry_types::Poem]) -> Vec<u32> {
    poems.iter().map(|p| p.id).collect()
}

#[test]
fn searches_fixture_corpus_by_lemma() {
    let data = PoetryData::load_with_mode(fixture_dir(), LoadMode::Owned).expect("load fixtures");
    let dictionary = MorphDictionary::normalize(data.lemmas());
    let index = ReverseIndex::build(&dictionary);
    let corpus = TokenizedCorpus::new(data.poems());

    // "Дождём," and "дождём" collapse into one key with both analyses.
    assert_eq!(dictionary.get("дождём").map(<[_]>::len), Some(2));
    // The analysis of "город" without a lemma is kept but not indexed.
    assert!(dictionary.contains("город"));
    assert_eq!(index.skipped_entries(), 1);

    assert_eq!(ids(&corpus.search_by_lemma("дождь", &index)), vec![1, 3]);
    assert_eq!(ids(&corpus.search_by_lemma("сталь", &index)), vec![3]);
    assert_eq!(ids(&corpus.search_by_lemma("стать", &index)), vec![3]);
    assert_eq!(ids(&corpus.search_by_lemma("светить", &index)), vec![2]);
    assert!(corpus.search_by_lemma("снег", &index).is_empty());
}

#[test]
fn cached_search_matches_reference_on_real_data() {
    let Some(dir) = data_dir() else {
        eprintln!("skipping: POETRY_DATA_DIR not set");
        return;
    };
    let data = PoetryData::load_with_mode(&dir, LoadMode::Mmap).expect("load poetry data");
    let dictionary = MorphDictionary::normalize(data.lemmas());
    let index = ReverseIndex::build(&dictionary);
    let corpus = TokenizedCorpus::new(data.poems());

    let lemmas = data
        .lemmas()
        .iter()
        .flat_map(|(_, entries)| entries.iter().filter_map(|e| e.normal_form.as_deref()))
        .take(200);
    for lemma in lemmas {
        let reference = search_by_lemma(lemma, data.poems(), &index);
        let cached = corpus.search_by_lemma(lemma, &index);
        assert_eq!(ids(&reference), ids(&cached), "lemma {lemma}");
    }

    for (word, entries) in data.lemmas().iter().take(500) {
        let canonical = canonical_form(word);
        if canonical.is_empty() {
            continue;
        }
        for lemma in entries.iter().filter_map(|e| e.normal_form.as_deref()) {
            let forms = index.wordforms(lemma).expect("lemma indexed");
            assert!(forms.contains(&canonical), "{word} under {lemma}");
        }
    }
}
