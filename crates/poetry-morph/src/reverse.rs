//! Lemma → surface forms index.

use std::collections::{HashMap, HashSet};

use crate::dictionary::MorphDictionary;

/// Inverse of a [`MorphDictionary`]: lower-cased lemma → canonical surface forms.
///
/// A surface form with ambiguous analyses is listed under every lemma it
/// carries. Analyses without a `normal_form` are skipped and counted.
#[derive(Clone, Debug, Default)]
pub struct ReverseIndex {
    forms: HashMap<String, HashSet<String>>,
    sorted_lemmas: Vec<String>,
    skipped_entries: usize,
}

impl ReverseIndex {
    pub fn build(dictionary: &MorphDictionary) -> Self {
        let mut forms: HashMap<String, HashSet<String>> = HashMap::new();
        let mut skipped_entries = 0usize;
        for (word, entries) in dictionary.iter() {
            for entry in entries {
                let Some(normal_form) = entry.normal_form.as_deref() else {
                    skipped_entries += 1;
                    continue;
                };
                forms
                    .entry(normal_form.to_lowercase())
                    .or_default()
                    .insert(word.to_string());
            }
        }

        let mut sorted_lemmas: Vec<String> = forms.keys().cloned().collect();
        sorted_lemmas.sort_unstable();

        Self {
            forms,
            sorted_lemmas,
            skipped_entries,
        }
    }

    /// Surface forms of `lemma` (matched case-insensitively).
    ///
    /// `None` means the lemma has no known forms; that is a "no matches"
    /// answer, not a failure.
    pub fn wordforms(&self, lemma: &str) -> Option<&HashSet<String>> {
        self.forms
            .get(&lemma.to_lowercase())
            .filter(|forms| !forms.is_empty())
    }

    /// Up to `limit` lemmas starting with `prefix`, in sorted order.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<&str> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let prefix = prefix.to_lowercase();
        let start = self
            .sorted_lemmas
            .partition_point(|lemma| lemma.as_str() < prefix.as_str());
        self.sorted_lemmas[start..]
            .iter()
            .take_while(|lemma| lemma.starts_with(&prefix))
            .take(limit)
            .map(String::as_str)
            .collect()
    }

    pub fn lemma_count(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Analyses ignored because they had no lemma.
    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }
}

/// Free-function form of [`ReverseIndex::build`].
pub fn build_index(dictionary: &MorphDictionary) -> ReverseIndex {
    ReverseIndex::build(dictionary)
}
