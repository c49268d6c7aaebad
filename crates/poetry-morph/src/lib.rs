//! Lemma search for a poem corpus.
//!
//! Four pieces, each a pure in-memory computation:
//! 1. [`tokenize`] splits text into canonical surface forms.
//! 2. [`normalize`] canonicalizes the raw per-word dictionary with the same
//!    rule, merging colliding keys in input order.
//! 3. [`build_index`] inverts it into lemma → surface forms.
//! 4. [`search_by_lemma`] / [`TokenizedCorpus`] keep the poems that mention
//!    any surface form of a lemma.
//!
//! The dictionary, index and tokenized corpus never change after they are
//! built, so they can be shared across threads without locking.
//!
//! # Example
//! ```
//! use poetry_morph::{TokenizedCorpus, build_index, normalize};
//! use poetry_types::{MorphEntry, Poem, RawMorphDictionary};
//!
//! let raw: RawMorphDictionary = [
//!     ("дождя", vec![MorphEntry::new("дождь")]),
//!     ("дождём", vec![MorphEntry::new("дождь")]),
//! ]
//! .into_iter()
//! .collect();
//! let index = build_index(&normalize(&raw));
//!
//! let corpus = vec![
//!     Poem { id: 1, text: Some("Шёл дождя".into()), ..Default::default() },
//!     Poem { id: 2, text: Some("Светило солнце".into()), ..Default::default() },
//! ];
//! let tokenized = TokenizedCorpus::new(&corpus);
//! let hits = tokenized.search_by_lemma("дождь", &index);
//! assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
//! ```
//!
//! For a runnable demo, see `cargo run -p poetry-morph --example lookup -- <data-dir> [--demo|<word>]`.

pub mod dictionary;
pub mod reverse;
pub mod search;
pub mod tokenize;

pub use dictionary::{Analysis, MorphDictionary, normalize};
pub use reverse::{ReverseIndex, build_index};
pub use search::{PoemTokens, TokenizedCorpus, matching_positions, search_by_lemma};
pub use tokenize::{PUNCTUATION, Token, canonical_form, is_punctuation, tokenize, tokens};
