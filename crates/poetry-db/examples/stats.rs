use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use poetry_db::{LoadMode, PoetryData};

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p poetry-db --example stats -- <path-to-data-dir>")?;

    let data = PoetryData::load_with_mode(&data_dir, LoadMode::Mmap)
        .with_context(|| format!("loading poetry data from {}", data_dir.display()))?;

    let mut sections: BTreeMap<&str, usize> = BTreeMap::new();
    let mut line_total = 0usize;
    let mut in_cycle = 0usize;
    let mut with_epigraph = 0usize;
    let mut with_dedication = 0usize;
    for poem in data.poems() {
        line_total += poem.line_count();
        if poem.in_cycle == Some(true) {
            in_cycle += 1;
        }
        if poem.has_epigraph() {
            with_epigraph += 1;
        }
        if poem.has_dedication() {
            with_dedication += 1;
        }
        if let Some(section) = poem.section_name.as_deref() {
            *sections.entry(section).or_default() += 1;
        }
    }

    let analyses: usize = data.lemmas().iter().map(|(_, a)| a.len()).sum();

    println!("Data directory: {}", data_dir.display());
    println!("Poems        : {}", data.poem_count());
    println!("Lines        : {}", line_total);
    println!("In cycles    : {}", in_cycle);
    println!("Epigraphs    : {}", with_epigraph);
    println!("Dedications  : {}", with_dedication);
    println!("Dictionary keys: {}", data.lemmas().len());
    println!("Analyses     : {}", analyses);
    println!("Skipped records: {}", data.lemmas().skipped());
    for (section, count) in sections {
        println!("  {section}: {count}");
    }

    Ok(())
}
