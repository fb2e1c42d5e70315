use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ftsearch::{ScoringConfig, SearchEngine, SearchHit};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const SAMPLE_DOCS: [&str; 5] = [
    "A brilliant, festive study of JS Bach uses literature and painting to illuminate his 'dance-impregnated' music, writes Peter Conrad",
    "Fatima Bhutto on Malala Yousafzai's fearless and still-controversial memoir",
    "Grisham's sequel to A Time to Kill is a solid courtroom drama about racial prejudice marred by a flawless white hero, writes John O'Connell",
    "This strange repackaging of bits and pieces does the Man Booker winner no favours, says Sam Leith",
    "Another book with music related content music",
];

#[derive(Debug, Deserialize)]
struct InputDoc {
    #[serde(alias = "body")]
    text: String,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Index text documents in memory and run a ranked keyword query", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index documents from a file or directory, then search them
    Search {
        /// Input path (.txt, .json or .jsonl file, or a directory of them)
        #[arg(long)]
        input: String,
        /// Query string
        #[arg(long)]
        query: String,
        /// Maximum number of results to print
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        k: Option<u64>,
        /// Rank by plain TF-IDF, without the proximity adjustment
        #[arg(long, default_value_t = false)]
        no_proximity: bool,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Index the built-in sample corpus and search it
    Demo {
        #[arg(long, default_value = "music")]
        query: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { input, query, k, no_proximity, json } => {
            let mut engine = SearchEngine::with_config(ScoringConfig { proximity: !no_proximity });
            let docs = load_documents(Path::new(&input))?;
            ingest(&mut engine, docs.iter().map(String::as_str));
            let hits = match k {
                Some(k) => engine.search_top(&query, k as usize),
                None => engine.search(&query),
            };
            print_hits(&query, &hits, json)
        }
        Commands::Demo { query } => {
            let mut engine = SearchEngine::new();
            ingest(&mut engine, SAMPLE_DOCS.into_iter());
            print_hits(&query, &engine.search(&query), false)
        }
    }
}

fn ingest<'a>(engine: &mut SearchEngine, docs: impl Iterator<Item = &'a str>) {
    let mut submitted = 0usize;
    for doc in docs {
        engine.index(doc);
        submitted += 1;
    }
    tracing::info!(submitted, num_docs = engine.document_count(), num_terms = engine.term_count(), "ingested documents");
}

fn print_hits(query: &str, hits: &[SearchHit], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(hits)?);
        return Ok(());
    }
    println!("query: {query}");
    println!("{} documents found", hits.len());
    for hit in hits {
        println!("[{}] {:.4}  {}", hit.doc_id, hit.score, hit.text);
    }
    Ok(())
}

fn load_documents(input_path: &Path) -> Result<Vec<String>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && input_kind(p).is_some() {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input path not found: {}", input_path.display());
    }

    let mut docs = Vec::new();
    for file in files {
        let loaded = match input_kind(&file) {
            Some("jsonl") => load_jsonl(&file),
            Some("json") => load_json(&file),
            _ => load_lines(&file),
        }
        .with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), count = loaded.len(), "loaded documents");
        docs.extend(loaded);
    }
    Ok(docs)
}

fn input_kind(path: &Path) -> Option<&str> {
    path.extension()
        .and_then(|s| s.to_str())
        .filter(|ext| matches!(*ext, "txt" | "json" | "jsonl"))
}

fn load_lines(file: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(file)?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect())
}

fn load_jsonl(file: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(file)?);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)?;
        docs.push(doc.text);
    }
    Ok(docs)
}

fn load_json(file: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(|v| -> Result<String> { Ok(serde_json::from_value::<InputDoc>(v)?.text) })
            .collect(),
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value::<InputDoc>(json)?.text]),
        _ => Ok(Vec::new()),
    }
}
