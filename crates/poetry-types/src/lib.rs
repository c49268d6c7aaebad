//! Shared types for the poem corpus and its per-word morphological analysis.
//!
//! The shapes mirror the JSON files produced by the data-preparation
//! pipeline: `poems_minimal.json` (an array of [`Poem`]) and `lemmas.json`
//! (an object mapping surface forms to arrays of [`MorphEntry`], decoded as a
//! [`RawMorphDictionary`]).
//!
//! ```rust
//! use poetry_types::{Poem, RawMorphDictionary};
//!
//! let poem: Poem = serde_json::from_str(r#"{"id": 1, "text": "Шёл дождь\nи снег"}"#).unwrap();
//! assert_eq!(poem.line_count(), 2);
//!
//! let raw: RawMorphDictionary =
//!     serde_json::from_str(r#"{"Дождь,": [{"normal_form": "дождь"}]}"#).unwrap();
//! assert_eq!(raw.len(), 1);
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Lemma shown when a word has no analysis.
pub const UNAVAILABLE_LEMMA: &str = "Анализ недоступен";
/// Part of speech and grammeme placeholder for the unavailable analysis.
pub const UNAVAILABLE_TAG: &str = "N/A";

/// One morphological analysis of a surface word form.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MorphEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammeme: Option<String>,
}

impl MorphEntry {
    pub fn new(normal_form: impl Into<String>) -> Self {
        Self {
            normal_form: Some(normal_form.into()),
            pos: None,
            grammeme: None,
        }
    }

    pub fn with_tags(mut self, pos: impl Into<String>, grammeme: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self.grammeme = Some(grammeme.into());
        self
    }

    /// Placeholder analysis for words missing from the dictionary.
    pub fn unavailable() -> Self {
        Self::new(UNAVAILABLE_LEMMA).with_tags(UNAVAILABLE_TAG, UNAVAILABLE_TAG)
    }
}

/// A poem record from the corpus. Every text field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Poem {
    pub id: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub display_title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub lines: Option<Vec<String>>,
    #[serde(default)]
    pub epigraph: Option<String>,
    #[serde(default)]
    pub dedication: Option<String>,
    #[serde(default)]
    pub section_name: Option<String>,
    #[serde(default)]
    pub in_cycle: Option<bool>,
    #[serde(default)]
    pub cycle_has_title: Option<bool>,
    #[serde(default)]
    pub cycle_name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "hasTitle")]
    pub has_title: Option<bool>,
}

impl Poem {
    /// Number of verse lines: `lines` when present, otherwise the lines of `text`.
    pub fn line_count(&self) -> usize {
        match (&self.lines, &self.text) {
            (Some(lines), _) => lines.len(),
            (None, Some(text)) => text.lines().count(),
            (None, None) => 0,
        }
    }

    /// Poem body: `text`, or `lines` joined with newlines when `text` is absent.
    pub fn body(&self) -> Option<Cow<'_, str>> {
        match (&self.text, &self.lines) {
            (Some(text), _) => Some(Cow::Borrowed(text.as_str())),
            (None, Some(lines)) => Some(Cow::Owned(lines.join("\n"))),
            (None, None) => None,
        }
    }

    /// Present, non-empty text fields in search order:
    /// title, display title, body, epigraph, dedication.
    pub fn text_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields: Vec<Cow<'_, str>> = Vec::with_capacity(5);
        for field in [
            borrowed(&self.title),
            borrowed(&self.display_title),
            self.body(),
            borrowed(&self.epigraph),
            borrowed(&self.dedication),
        ]
        .into_iter()
        .flatten()
        {
            if !field.is_empty() {
                fields.push(field);
            }
        }
        fields
    }

    /// All text fields joined by a single space.
    pub fn searchable_text(&self) -> String {
        self.text_fields().join(" ")
    }

    pub fn has_epigraph(&self) -> bool {
        is_filled(&self.epigraph)
    }

    pub fn has_dedication(&self) -> bool {
        is_filled(&self.dedication)
    }
}

fn borrowed(field: &Option<String>) -> Option<Cow<'_, str>> {
    field.as_deref().map(Cow::Borrowed)
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// The morphological dictionary as shipped: surface forms in file order,
/// before canonicalization.
///
/// Decoding keeps the JSON object's key order and skips malformed records
/// (non-object analyses, non-array values) instead of failing the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMorphDictionary {
    entries: Vec<(String, Vec<MorphEntry>)>,
    skipped: usize,
}

impl RawMorphDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: impl Into<String>, analyses: Vec<MorphEntry>) {
        self.entries.push((word.into(), analyses));
    }

    /// Iterate surface forms and their analyses in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MorphEntry])> + '_ {
        self.entries
            .iter()
            .map(|(word, analyses)| (word.as_str(), analyses.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records dropped while decoding.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<W: Into<String>> FromIterator<(W, Vec<MorphEntry>)> for RawMorphDictionary {
    fn from_iter<I: IntoIterator<Item = (W, Vec<MorphEntry>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(w, a)| (w.into(), a)).collect(),
            skipped: 0,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnalyses {
    List(Vec<RawAnalysis>),
    Malformed(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnalysis {
    Entry(MorphEntry),
    Malformed(IgnoredAny),
}

struct RawDictionaryVisitor;

impl<'de> Visitor<'de> for RawDictionaryVisitor {
    type Value = RawMorphDictionary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from surface forms to arrays of analyses")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut dict = RawMorphDictionary {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
            skipped: 0,
        };
        while let Some((word, analyses)) = access.next_entry::<String, RawAnalyses>()? {
            let RawAnalyses::List(items) = analyses else {
                dict.skipped += 1;
                continue;
            };
            let mut kept = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    RawAnalysis::Entry(entry) => kept.push(entry),
                    RawAnalysis::Malformed(_) => dict.skipped += 1,
                }
            }
            dict.entries.push((word, kept));
        }
        Ok(dict)
    }
}

impl<'de> Deserialize<'de> for RawMorphDictionary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawDictionaryVisitor)
    }
}
