//! Load the poem corpus and its morphological dictionary from a data directory.
//!
//! The data-preparation pipeline writes two JSON files side by side:
//! `poems_minimal.json` (an array of poems) and `lemmas.json` (surface form →
//! analyses). This crate reads both and hands back typed, read-only values.
//! Callers choose between memory-mapped files and owned buffers at runtime via
//! [`LoadMode`].
//!
//! # Example
//! ```no_run
//! use poetry_db::{LoadMode, PoetryData};
//!
//! # fn main() -> anyhow::Result<()> {
//! let data = PoetryData::load_with_mode("/path/to/public", LoadMode::Mmap)?;
//! println!("{} poems, {} dictionary keys", data.poem_count(), data.lemmas().len());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p poetry-db --example stats -- <data-dir>`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use poetry_types::{Poem, RawMorphDictionary};

/// Poem corpus file name inside the data directory.
pub const POEMS_FILE: &str = "poems_minimal.json";
/// Morphological dictionary file name inside the data directory.
pub const LEMMAS_FILE: &str = "lemmas.json";

/// Strategy for reading the JSON files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file (no intermediate copy).
    #[default]
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// The corpus and raw dictionary, exactly as shipped.
#[derive(Clone, Debug, Default)]
pub struct PoetryData {
    poems: Vec<Poem>,
    lemmas: RawMorphDictionary,
}

impl PoetryData {
    /// Load both files from `data_dir`, memory-mapping them.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(data_dir, LoadMode::Mmap)
    }

    /// Load both files choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(data_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = data_dir.as_ref();
        for name in [POEMS_FILE, LEMMAS_FILE] {
            let path = dir.join(name);
            if !path.exists() {
                anyhow::bail!("missing required data file: {}", path.display());
            }
        }

        let poems = load_poems(dir.join(POEMS_FILE), mode)?;
        let lemmas = load_lemmas(dir.join(LEMMAS_FILE), mode)?;
        Ok(Self { poems, lemmas })
    }

    /// Assemble from values already in memory.
    pub fn from_parts(poems: Vec<Poem>, lemmas: RawMorphDictionary) -> Self {
        Self { poems, lemmas }
    }

    pub fn into_parts(self) -> (Vec<Poem>, RawMorphDictionary) {
        (self.poems, self.lemmas)
    }

    pub fn poems(&self) -> &[Poem] {
        &self.poems
    }

    pub fn lemmas(&self) -> &RawMorphDictionary {
        &self.lemmas
    }

    pub fn poem_count(&self) -> usize {
        self.poems.len()
    }
}

/// Parse `poems_minimal.json`.
pub fn load_poems(path: impl AsRef<Path>, mode: LoadMode) -> Result<Vec<Poem>> {
    let path = path.as_ref();
    let buffer = load_file(path.to_path_buf(), mode)?;
    serde_json::from_slice(buffer.as_slice())
        .with_context(|| format!("parse poems from {}", path.display()))
}

/// Parse `lemmas.json`, keeping key order and skipping malformed records.
pub fn load_lemmas(path: impl AsRef<Path>, mode: LoadMode) -> Result<RawMorphDictionary> {
    let path = path.as_ref();
    let buffer = load_file(path.to_path_buf(), mode)?;
    serde_json::from_slice(buffer.as_slice())
        .with_context(|| format!("parse lemmas from {}", path.display()))
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            // SAFETY: the data files are read-only inputs that are not modified
            // while the process runs.
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}
