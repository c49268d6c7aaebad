use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use poetry_db::{LoadMode, PoetryData};
use poetry_morph::{MorphDictionary, ReverseIndex, TokenizedCorpus};

const USAGE: &str =
    "usage: cargo run -p poetry-morph --example lookup -- <data-dir> [--demo | <word>]";

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let data_dir = args.next().map(PathBuf::from).context(USAGE)?;
    let next = args.next();
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let words: Vec<String> = match next.as_deref() {
        Some("--demo") => vec![
            "дождь".into(),
            "солнце".into(),
            "стали".into(),
            "Дождём,".into(),
        ],
        Some(word) => vec![word.to_string()],
        None => bail!(USAGE),
    };

    let data = PoetryData::load_with_mode(&data_dir, LoadMode::Mmap)
        .with_context(|| format!("loading poetry data from {}", data_dir.display()))?;
    let dictionary = MorphDictionary::normalize(data.lemmas());
    let index = ReverseIndex::build(&dictionary);
    let corpus = TokenizedCorpus::new(data.poems());

    println!("Data directory: {}", data_dir.display());
    println!(
        "{} surface forms, {} lemmas, {} poems ({} tokens)",
        dictionary.len(),
        index.lemma_count(),
        corpus.len(),
        corpus.token_count()
    );

    for word in words {
        println!("\nWord: {}", word);
        let analysis = dictionary.analyze(&word);
        for entry in analysis.entries().iter() {
            println!(
                "  {:<16} {:<6} {}",
                entry.normal_form.as_deref().unwrap_or("-"),
                entry.pos.as_deref().unwrap_or("-"),
                entry.grammeme.as_deref().unwrap_or("-")
            );
        }

        let Some(forms) = index.wordforms(&word) else {
            println!("  (not a known lemma)");
            continue;
        };
        let mut forms: Vec<&str> = forms.iter().map(String::as_str).collect();
        forms.sort_unstable();
        println!("  as lemma: {}", forms.join(", "));
        let hits = corpus.search_by_lemma(&word, &index);
        let ids: Vec<String> = hits.iter().map(|p| p.id.to_string()).collect();
        println!("  poems ({}): {}", hits.len(), ids.join(" "));
    }

    Ok(())
}
