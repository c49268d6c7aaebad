use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use bitvec::prelude::*;
use poetry_db::{LoadMode, PoetryData};
use poetry_morph::{
    Analysis, MorphDictionary, PoemTokens, ReverseIndex, TokenizedCorpus, matching_positions,
};
use poetry_types::Poem;
use thiserror::Error;
use tracing::{debug, info, warn};

type BitSet = BitVec<usize, Lsb0>;

const FLAG_COUNT: usize = 6;

/// Per-poem boolean attributes kept as bitsets.
#[derive(Clone, Copy, Debug)]
enum Flag {
    InCycle,
    Standalone,
    CycleTitled,
    CycleUntitled,
    Epigraph,
    Dedication,
}

impl Flag {
    const ALL: [Flag; FLAG_COUNT] = [
        Flag::InCycle,
        Flag::Standalone,
        Flag::CycleTitled,
        Flag::CycleUntitled,
        Flag::Epigraph,
        Flag::Dedication,
    ];

    fn holds(self, poem: &Poem) -> bool {
        match self {
            Flag::InCycle => poem.in_cycle == Some(true),
            Flag::Standalone => poem.in_cycle == Some(false),
            Flag::CycleTitled => poem.cycle_has_title == Some(true),
            Flag::CycleUntitled => poem.cycle_has_title == Some(false),
            Flag::Epigraph => poem.has_epigraph(),
            Flag::Dedication => poem.has_dedication(),
        }
    }

    fn for_value(value: bool, yes: Flag, no: Flag) -> Flag {
        if value { yes } else { no }
    }
}

/// Read-only search structures over the poem corpus.
///
/// Built once at startup; every query intersects candidate bitsets so results
/// always come back in corpus order.
#[derive(Debug)]
pub struct PoemIndex {
    poems: Vec<Poem>,
    tokens: Vec<PoemTokens>,
    haystacks: Vec<Vec<String>>,
    line_counts: Vec<usize>,
    by_id: HashMap<u32, usize>,
    all: BitSet,
    flags: [BitSet; FLAG_COUNT],
    sections: BTreeMap<String, BitSet>,
    dictionary: MorphDictionary,
    reverse: ReverseIndex,
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to load poetry data: {0:#}")]
    Load(anyhow::Error),
}

/// Filters for [`PoemIndex::query`]. Every filter that is set must hold.
#[derive(Debug, Default)]
pub struct FilterParams<'a> {
    pub search: Option<&'a str>,
    pub lemma: Option<&'a str>,
    pub in_cycle: Option<bool>,
    pub cycle_has_title: Option<bool>,
    pub section: Option<&'a str>,
    pub min_lines: Option<usize>,
    pub max_lines: Option<usize>,
    pub has_epigraph: bool,
    pub has_dedication: bool,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub total: usize,
    pub items: Vec<&'a Poem>,
    pub has_more: bool,
}

impl QueryResult<'_> {
    fn empty() -> Self {
        Self {
            total: 0,
            items: Vec::new(),
            has_more: false,
        }
    }
}

impl PoemIndex {
    pub fn build_from_dir<P: AsRef<Path>>(path: P, mode: LoadMode) -> Result<Arc<Self>, IndexError> {
        let data = PoetryData::load_with_mode(path, mode).map_err(IndexError::Load)?;
        Ok(Self::build(data))
    }

    pub fn build(data: PoetryData) -> Arc<Self> {
        let (poems, raw) = data.into_parts();
        if raw.skipped() > 0 {
            warn!("skipped {} malformed dictionary records", raw.skipped());
        }

        let dictionary = MorphDictionary::normalize(&raw);
        let reverse = ReverseIndex::build(&dictionary);
        info!(
            "dictionary: {} surface forms from {} raw keys, {} analyses",
            dictionary.len(),
            raw.len(),
            dictionary.entry_count()
        );
        if reverse.skipped_entries() > 0 {
            warn!(
                "{} analyses without a lemma left out of the reverse index",
                reverse.skipped_entries()
            );
        }
        info!("reverse index: {} lemmas", reverse.lemma_count());

        let n = poems.len();
        let mut flags: [BitSet; FLAG_COUNT] =
            array_init::array_init(|_| bitvec![usize, Lsb0; 0; n]);
        let mut sections: BTreeMap<String, BitSet> = BTreeMap::new();
        let mut by_id = HashMap::with_capacity(n);
        let mut haystacks = Vec::with_capacity(n);
        let mut line_counts = Vec::with_capacity(n);

        for (idx, poem) in poems.iter().enumerate() {
            for flag in Flag::ALL {
                if flag.holds(poem) {
                    flags[flag as usize].set(idx, true);
                }
            }
            if let Some(section) = poem.section_name.as_deref().filter(|s| !s.is_empty()) {
                sections
                    .entry(section.to_string())
                    .or_insert_with(|| bitvec![usize, Lsb0; 0; n])
                    .set(idx, true);
            }
            if by_id.insert(poem.id, idx).is_some() {
                warn!("duplicate poem id {}; lookups return the later record", poem.id);
            }
            haystacks.push(
                poem.text_fields()
                    .iter()
                    .map(|field| field.to_lowercase())
                    .collect(),
            );
            line_counts.push(poem.line_count());
        }

        let corpus = TokenizedCorpus::new(&poems);
        info!(
            "indexed {} poems ({} tokens, {} sections)",
            corpus.len(),
            corpus.token_count(),
            sections.len()
        );
        let tokens = corpus.into_tokens();

        Arc::new(Self {
            poems,
            tokens,
            haystacks,
            line_counts,
            by_id,
            all: bitvec![usize, Lsb0; 1; n],
            flags,
            sections,
            dictionary,
            reverse,
        })
    }

    pub fn query(&self, params: FilterParams<'_>) -> QueryResult<'_> {
        let mut candidates = self.all.clone();

        let mut required = Vec::with_capacity(FLAG_COUNT);
        if let Some(value) = params.in_cycle {
            required.push(Flag::for_value(value, Flag::InCycle, Flag::Standalone));
        }
        if let Some(value) = params.cycle_has_title {
            required.push(Flag::for_value(value, Flag::CycleTitled, Flag::CycleUntitled));
        }
        if params.has_epigraph {
            required.push(Flag::Epigraph);
        }
        if params.has_dedication {
            required.push(Flag::Dedication);
        }
        for flag in required {
            candidates &= &self.flags[flag as usize];
            if candidates.not_any() {
                return QueryResult::empty();
            }
        }

        if let Some(section) = params.section {
            let Some(members) = self.sections.get(section) else {
                return QueryResult::empty();
            };
            candidates &= members;
        }

        if params.min_lines.is_some() || params.max_lines.is_some() {
            let min = params.min_lines.unwrap_or(0);
            let max = params.max_lines.unwrap_or(usize::MAX);
            retain(&mut candidates, |idx| {
                (min..=max).contains(&self.line_counts[idx])
            });
        }

        if let Some(needle) = params.search {
            let needle = needle.to_lowercase();
            retain(&mut candidates, |idx| {
                self.haystacks[idx].iter().any(|field| field.contains(&needle))
            });
        }

        if let Some(lemma) = params.lemma {
            candidates &= &self.lemma_candidates(lemma);
        }

        let total = candidates.count_ones();
        if total == 0 {
            return QueryResult::empty();
        }

        let offset = params
            .page
            .saturating_sub(1)
            .saturating_mul(params.page_size);
        let mut items = Vec::with_capacity(params.page_size.min(total));
        for idx in candidates.iter_ones().skip(offset).take(params.page_size) {
            if let Some(poem) = self.poems.get(idx) {
                items.push(poem);
            }
        }

        let has_more = offset + items.len() < total;

        QueryResult {
            total,
            items,
            has_more,
        }
    }

    fn lemma_candidates(&self, lemma: &str) -> BitSet {
        let mut hits = bitvec![usize, Lsb0; 0; self.poems.len()];
        let Some(wordforms) = self.reverse.wordforms(lemma) else {
            debug!("lemma {lemma:?}: no known wordforms");
            return hits;
        };
        debug!("lemma {lemma:?}: {} wordforms", wordforms.len());
        for idx in matching_positions(&self.tokens, wordforms) {
            hits.set(idx, true);
        }
        debug!("lemma {lemma:?}: {} poems", hits.count_ones());
        hits
    }

    pub fn poem(&self, id: u32) -> Option<&Poem> {
        self.by_id.get(&id).and_then(|idx| self.poems.get(*idx))
    }

    pub fn analyze(&self, word: &str) -> Analysis<'_> {
        self.dictionary.analyze(word)
    }

    pub fn suggest_lemmas(&self, prefix: &str, limit: usize) -> Vec<&str> {
        self.reverse.suggest(prefix, limit)
    }

    /// Distinct section names, sorted.
    pub fn sections(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.poems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poems.is_empty()
    }
}

fn retain(candidates: &mut BitSet, keep: impl Fn(usize) -> bool) {
    let dropped: Vec<usize> = candidates.iter_ones().filter(|idx| !keep(*idx)).collect();
    for idx in dropped {
        candidates.set(idx, false);
    }
}

/// Trim a free-text filter; blank input means "no filter".
pub fn parse_filter_text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
