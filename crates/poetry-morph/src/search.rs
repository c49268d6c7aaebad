//! Lemma search over a poem corpus.
//!
//! [`search_by_lemma`] tokenizes every poem on each call. [`TokenizedCorpus`]
//! does the tokenization once and answers repeated queries from the cached
//! tokens; both return the same poems in the same order.

use std::collections::HashSet;

use poetry_types::Poem;

use crate::reverse::ReverseIndex;
use crate::tokenize::{Token, tokenize};

/// Poems whose text contains a surface form of `query`, in corpus order.
///
/// Unknown lemmas produce an empty result.
pub fn search_by_lemma<'c>(query: &str, corpus: &'c [Poem], index: &ReverseIndex) -> Vec<&'c Poem> {
    let Some(wordforms) = index.wordforms(query) else {
        return Vec::new();
    };
    corpus
        .iter()
        .filter(|poem| {
            tokenize(&poem.searchable_text())
                .iter()
                .any(|token| wordforms.contains(token))
        })
        .collect()
}

/// Cached token sequence of one poem.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoemTokens {
    tokens: Vec<Token>,
}

impl PoemTokens {
    pub fn from_poem(poem: &Poem) -> Self {
        Self {
            tokens: tokenize(&poem.searchable_text()),
        }
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether any token is one of `wordforms`.
    pub fn mentions_any(&self, wordforms: &HashSet<String>) -> bool {
        self.tokens.iter().any(|token| wordforms.contains(token))
    }
}

/// Positions in `tokens` whose poem mentions any of `wordforms`.
pub fn matching_positions<'t>(
    tokens: &'t [PoemTokens],
    wordforms: &'t HashSet<String>,
) -> impl Iterator<Item = usize> + 't {
    tokens
        .iter()
        .enumerate()
        .filter(move |(_, poem)| poem.mentions_any(wordforms))
        .map(|(pos, _)| pos)
}

/// A corpus paired with its pre-computed tokens.
#[derive(Clone, Debug)]
pub struct TokenizedCorpus<'c> {
    poems: &'c [Poem],
    tokens: Vec<PoemTokens>,
}

impl<'c> TokenizedCorpus<'c> {
    pub fn new(poems: &'c [Poem]) -> Self {
        Self {
            poems,
            tokens: poems.iter().map(PoemTokens::from_poem).collect(),
        }
    }

    /// Same answer as [`search_by_lemma`] without re-tokenizing.
    pub fn search_by_lemma(&self, query: &str, index: &ReverseIndex) -> Vec<&'c Poem> {
        let poems = self.poems;
        self.positions(query, index)
            .into_iter()
            .map(|pos| &poems[pos])
            .collect()
    }

    /// Corpus positions matching `query`, ascending.
    pub fn positions(&self, query: &str, index: &ReverseIndex) -> Vec<usize> {
        match index.wordforms(query) {
            Some(wordforms) => matching_positions(&self.tokens, wordforms).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }

    /// Total cached tokens across the corpus.
    pub fn token_count(&self) -> usize {
        self.tokens.iter().map(PoemTokens::len).sum()
    }

    /// Release the borrow on the poems, keeping the per-poem tokens in corpus order.
    pub fn into_tokens(self) -> Vec<PoemTokens> {
        self.tokens
    }
}
