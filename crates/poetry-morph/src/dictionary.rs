//! Canonical morphological dictionary and per-word analysis lookup.

use std::borrow::Cow;
use std::collections::HashMap;

use poetry_types::{MorphEntry, RawMorphDictionary};

use crate::tokenize::canonical_form;

/// Surface form → analyses, keyed by [`canonical_form`].
///
/// Immutable once built; share it behind an `Arc` or a plain reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorphDictionary {
    words: HashMap<String, Vec<MorphEntry>>,
}

impl MorphDictionary {
    /// Canonicalize every key of `raw`.
    ///
    /// Keys that collide after canonicalization are merged: analyses are
    /// concatenated in the order the raw keys appear in the input. Keys that
    /// canonicalize to nothing are dropped.
    pub fn normalize(raw: &RawMorphDictionary) -> Self {
        let mut words: HashMap<String, Vec<MorphEntry>> = HashMap::with_capacity(raw.len());
        for (word, analyses) in raw.iter() {
            let key = canonical_form(word);
            if key.is_empty() {
                continue;
            }
            words
                .entry(key)
                .or_default()
                .extend(analyses.iter().cloned());
        }
        Self { words }
    }

    /// Analyses for an already canonical surface form.
    pub fn get(&self, word: &str) -> Option<&[MorphEntry]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Analysis for a word as it appears in a poem (punctuation and case allowed).
    pub fn analyze(&self, word: &str) -> Analysis<'_> {
        let canonical = canonical_form(word);
        let entries = self
            .words
            .get(&canonical)
            .filter(|entries| !entries.is_empty())
            .map(Vec::as_slice);
        Analysis {
            word: canonical,
            entries,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MorphEntry])> + '_ {
        self.words
            .iter()
            .map(|(word, entries)| (word.as_str(), entries.as_slice()))
    }

    /// Number of canonical surface forms.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Total analyses across all surface forms.
    pub fn entry_count(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }
}

/// Free-function form of [`MorphDictionary::normalize`].
pub fn normalize(raw: &RawMorphDictionary) -> MorphDictionary {
    MorphDictionary::normalize(raw)
}

/// Result of looking up a clicked word.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis<'a> {
    word: String,
    entries: Option<&'a [MorphEntry]>,
}

impl<'a> Analysis<'a> {
    /// The canonical form that was looked up.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_available(&self) -> bool {
        self.entries.is_some()
    }

    /// Dictionary analyses, or the single "unavailable" placeholder.
    pub fn entries(&self) -> Cow<'a, [MorphEntry]> {
        match self.entries {
            Some(entries) => Cow::Borrowed(entries),
            None => Cow::Owned(vec![MorphEntry::unavailable()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &[&str])]) -> RawMorphDictionary {
        pairs
            .iter()
            .map(|(word, lemmas)| {
                let entries: Vec<MorphEntry> = lemmas.iter().map(|l| MorphEntry::new(*l)).collect();
                (*word, entries)
            })
            .collect()
    }

    fn lemmas(entries: &[MorphEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(|e| e.normal_form.as_deref())
            .collect()
    }

    #[test]
    fn canonicalizes_keys() {
        let dict = normalize(&raw(&[("Дождь,", &["дождь"])]));
        assert!(dict.contains("дождь"));
        assert!(!dict.contains("Дождь,"));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn merges_colliding_keys_in_input_order() {
        let dict = normalize(&raw(&[
            ("дождь", &["дождь"]),
            ("стали", &["стать"]),
            ("Дождь,", &["дождить"]),
            ("Стали!", &["сталь"]),
        ]));
        assert_eq!(dict.len(), 2);
        assert_eq!(lemmas(dict.get("дождь").unwrap()), vec!["дождь", "дождить"]);
        assert_eq!(lemmas(dict.get("стали").unwrap()), vec!["стать", "сталь"]);
    }

    #[test]
    fn normalizing_canonical_dictionary_is_a_no_op() {
        let once = normalize(&raw(&[
            ("Дождя", &["дождь"]),
            ("(дождём)", &["дождь"]),
            ("кое-кто", &["кое-кто"]),
        ]));
        let again: RawMorphDictionary = once
            .iter()
            .map(|(word, entries)| (word, entries.to_vec()))
            .collect();
        assert_eq!(normalize(&again), once);
    }

    #[test]
    fn drops_keys_that_are_only_punctuation() {
        let dict = normalize(&raw(&[("—", &["—"]), ("и", &["и"])]));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn analyze_canonicalizes_the_clicked_word() {
        let dict = normalize(&raw(&[("дождём", &["дождь"])]));
        let analysis = dict.analyze("Дождём,");
        assert!(analysis.is_available());
        assert_eq!(analysis.word(), "дождём");
        assert_eq!(lemmas(&analysis.entries()), vec!["дождь"]);
    }

    #[test]
    fn analyze_falls_back_to_placeholder() {
        let dict = normalize(&raw(&[("пусто", &[])]));
        for word in ["снег", "пусто"] {
            let analysis = dict.analyze(word);
            assert!(!analysis.is_available());
            assert_eq!(analysis.entries().as_ref(), &[MorphEntry::unavailable()]);
        }
    }
}
