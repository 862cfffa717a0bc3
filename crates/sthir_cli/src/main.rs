use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sthir_core::{
    hash::{duplicate_index, hash_indices},
    optimal_m_k, AccuracyReport, BuildConfig, SearchIndex, SourceDocument, SpectralBloom, TokenCounts,
};

#[derive(Parser)]
#[command(name = "sthir", about = "Spectral Bloom filter search indexes")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

/// Flags that override the optional JSON config.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// JSON file with `false_positive` / `chunk_size`
    #[arg(long)]
    config: Option<PathBuf>,
    /// Target false positive rate, in (0, 1]
    #[arg(short = 'e', long, value_parser = parse_false_positive)]
    false_positive: Option<f64>,
    /// Bits per counter, in [1, 10]
    #[arg(short = 's', long, value_parser = clap::value_parser!(u8).range(1..=10))]
    chunk_size: Option<u8>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build an index from tokenized documents (JSON array of {id, title, tokens})
    Build {
        #[arg(long)]
        docs: PathBuf,
        #[arg(long, default_value = "index.json")]
        output: PathBuf,
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Rank the indexed documents for a query
    Query {
        #[arg(long)]
        index: PathBuf,
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },

    Info {
        #[arg(long)]
        index: PathBuf,
    },

    /// Fully decode every bundle and check its shape
    Verify {
        #[arg(long)]
        index: PathBuf,
    },

    /// Measure count errors and false positives against a word list
    Evaluate {
        #[arg(long)]
        docs: PathBuf,
        /// One probe word per line
        #[arg(long)]
        dictionary: PathBuf,
        #[command(flatten)]
        build: BuildArgs,
    },

    /// Print the k hash indices of a word
    Hashes {
        #[arg(long)]
        word: String,
        #[arg(long)]
        k: usize,
        #[arg(long)]
        m: usize,
    },

    /// Print the tuple array to embed in a page
    Literal {
        #[arg(long)]
        index: PathBuf,
    },
}

fn parse_false_positive(s: &str) -> std::result::Result<f64, String> {
    let p: f64 = s.parse().map_err(|_| format!("{s} is not a floating-point literal"))?;
    if p > 0.0 && p <= 1.0 {
        Ok(p)
    } else {
        Err(format!("{p} not in range (0.0, 1.0]"))
    }
}

fn resolve_config(args: &BuildArgs) -> Result<BuildConfig> {
    let mut cfg = match &args.config {
        Some(p) => BuildConfig::load(p).with_context(|| format!("config {}", p.display()))?,
        None => BuildConfig::default(),
    };
    if let Some(p) = args.false_positive {
        cfg.false_positive = p;
    }
    if let Some(s) = args.chunk_size {
        cfg.chunk_size = s;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_docs(path: &Path) -> Result<Vec<SourceDocument>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let docs: Vec<SourceDocument> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    if let Some(d) = docs.iter().find(|d| d.tokens.is_empty()) {
        return Err(anyhow!("document {:?} has no tokens", d.id));
    }
    Ok(docs)
}

fn open_index(path: &Path) -> Result<SearchIndex> {
    SearchIndex::load(path).with_context(|| format!("load index {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Build { docs, output, build } => {
            let cfg = resolve_config(&build)?;
            let docs = read_docs(&docs)?;
            let idx = SearchIndex::build(&docs, &cfg)?;
            idx.save_atomic(&output)?;
            let chars: usize = idx.documents.iter().map(|b| b.encoded.chars().count()).sum();
            println!(
                "build: {} documents -> {} (p={}, chunk_size={}, {} symbols)",
                idx.documents.len(),
                output.display(),
                cfg.false_positive,
                cfg.chunk_size,
                chars
            );
        }
        Cmd::Query { index, words } => {
            let idx = open_index(&index)?;
            let hits = idx.search(&words.join(" "))?;
            if hits.is_empty() {
                println!("no matches");
            }
            for h in hits {
                println!("{:>6}  {}  ({})", h.score, h.title, h.document_id);
            }
        }
        Cmd::Info { index } => {
            let idx = open_index(&index)?;
            println!("version  : {}", idx.version);
            println!("generated: {}", idx.generated_at);
            println!("documents: {}", idx.documents.len());
            for b in &idx.documents {
                let counters = b.decode_counters()?;
                let nonzero = counters.iter().filter(|&&c| c != 0).count();
                let fill = nonzero as f64 / b.m as f64;
                println!(
                    "  {}  m={} k={} chunk={} bits={} tokens={} fill≈{:.2}  [{}]",
                    b.document_id,
                    b.m,
                    b.k,
                    b.chunk_size,
                    b.m * b.chunk_size as usize,
                    b.token_count,
                    fill,
                    b.title
                );
            }
        }
        Cmd::Verify { index } => {
            let s = fs::read_to_string(&index).with_context(|| format!("read {}", index.display()))?;
            let idx: SearchIndex = serde_json::from_str(&s)?;
            let mut ok = 0usize;
            let mut fail = 0usize;
            for b in &idx.documents {
                match b.decode_counters() {
                    Ok(_) => ok += 1,
                    Err(e) => {
                        eprintln!("verify: {}: {e}", b.document_id);
                        fail += 1;
                    }
                }
            }
            println!("verify: bundles ok={}, fail={}", ok, fail);
            if fail > 0 {
                bail!("{fail} corrupt bundle(s)");
            }
        }
        Cmd::Evaluate { docs, dictionary, build } => {
            let cfg = resolve_config(&build)?;
            let docs = read_docs(&docs)?;
            let dict_src = fs::read_to_string(&dictionary)
                .with_context(|| format!("read {}", dictionary.display()))?;
            let words: Vec<&str> = dict_src.lines().map(str::trim).filter(|w| !w.is_empty()).collect();
            println!("chunk_size={} false_positive={} dictionary={}", cfg.chunk_size, cfg.false_positive, words.len());
            for d in &docs {
                let counts = TokenCounts::from_tokens(&d.tokens);
                let (m, k) = optimal_m_k(counts.distinct(), cfg.false_positive)?;
                let f = SpectralBloom::build(&counts, m, k, cfg.chunk_size)?;
                let r = AccuracyReport::evaluate(&f, &counts, words.iter().copied())?;
                println!(
                    "{}  n={} m={} k={}  seen={} mismatches={} ({:.4})  unseen={} fp={} ({:.4}, expected {:.4})",
                    d.id,
                    counts.distinct(),
                    m,
                    k,
                    r.seen,
                    r.count_mismatches,
                    r.count_error_rate(),
                    r.unseen,
                    r.false_positives,
                    r.fp_rate(),
                    r.expected_false_positive
                );
            }
        }
        Cmd::Hashes { word, k, m } => {
            if k == 0 || m == 0 {
                bail!("k and m must both be at least 1");
            }
            let idx = hash_indices(&word, k, m)?;
            println!("{:?}", idx);
            if let Some(dup) = duplicate_index(&idx) {
                println!("duplicate index: {dup}");
            }
        }
        Cmd::Literal { index } => {
            let idx = open_index(&index)?;
            println!("{}", idx.to_literal()?);
        }
    }
    Ok(())
}
