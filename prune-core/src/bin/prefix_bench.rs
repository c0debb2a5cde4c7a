//! Prefix Query Benchmarking Tool
//!
//! This binary loads a `term,score` CSV file into a trie and measures how
//! fast it answers top-K prefix queries. It gives realistic numbers for
//! autocomplete workloads such as search-box suggestions.
//!
//! ## What It Benchmarks
//!
//! 1. **Build**: Inserting every record of the file
//! 2. **Pruned queries**: Top-K with score-based subtree pruning
//! 3. **Exhaustive queries**: The same queries visiting every match
//!
//! ## Usage
//!
//! ```bash
//! # Query every one- and two-letter prefix found in the file
//! ./target/release/prefix_bench /path/to/terms.csv
//!
//! # Query specific prefixes
//! ./target/release/prefix_bench /path/to/terms.csv fl flow "flower p"
//!
//! # Show load progress
//! RUST_LOG=prune_core=info ./target/release/prefix_bench /path/to/terms.csv
//! ```
//!
//! ## Tips for Accurate Results
//!
//! - Run with `--release` flag (this binary should be built in release mode)
//! - Use a large input file (1M+ terms) for stable measurements
//! - Consider using `taskset` to pin to a specific CPU core

use std::env;
use std::error::Error;
use std::hint::black_box;
use std::path::Path;
use std::time::{Duration, Instant};

use prune_core::{
    CsvProvider, Entry, Exhaustive, InputProvider, PruningPolicy, PruningTrie, ScorePruning,
    TrieConfig,
};
use tracing_subscriber::EnvFilter;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const K: usize = 10;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: prefix_bench <csv path> [prefix...]");
        std::process::exit(1);
    }

    let path = &args[1];

    println!("Loading file...");
    let entries = CsvProvider::term_score(b',').read_input(Path::new(path))?;

    let start = Instant::now();
    let mut trie = PruningTrie::with_config(TrieConfig::for_terms(entries.len(), 16));
    let (added, failed, _) =
        trie.insert_batch(entries.iter().map(|e| (e.term.as_str(), e.score)));
    let build = start.elapsed();

    let stats = trie.stats();
    println!(
        "Records:    {} inserted, {} failed",
        fmt_count(added as u64),
        fmt_count(failed as u64)
    );
    println!("Build time: {:.3} s", build.as_secs_f64());
    println!("Trie:       {}", stats);
    println!("Memory:     {}\n", fmt_bytes(stats.memory_usage_bytes() as u64));

    let prefixes: Vec<String> = if args.len() > 2 {
        args[2..].to_vec()
    } else {
        short_prefixes(&entries)
    };
    println!("Prefixes:   {}\n", fmt_count(prefixes.len() as u64));

    bench_queries("Pruned", &trie, &prefixes, &ScorePruning);
    bench_queries("Exhaustive", &trie, &prefixes, &Exhaustive);

    let metrics = trie.metrics();
    println!("Queries executed: {}", fmt_count(metrics.queries_executed));

    Ok(())
}

/// Every one- and two-char prefix of the loaded terms.
fn short_prefixes(entries: &[Entry]) -> Vec<String> {
    let mut prefixes: Vec<String> = entries
        .iter()
        .flat_map(|e| {
            let ends = e.term.char_indices().map(|(i, c)| i + c.len_utf8()).take(2);
            ends.map(move |end| e.term[..end].to_string())
        })
        .collect();
    prefixes.sort_unstable();
    prefixes.dedup();
    prefixes
}

fn bench_queries<P: PruningPolicy>(
    label: &str,
    trie: &PruningTrie,
    prefixes: &[String],
    policy: &P,
) {
    println!("=== {} ===", label);

    warmup(|| {
        for prefix in prefixes {
            black_box(trie.top_k_with(prefix, K, policy));
        }
    });

    let mut found = 0u64;
    let elapsed = measure(|| {
        let mut local = 0u64;
        for prefix in prefixes {
            local += black_box(trie.top_k_with(prefix, K, policy)).len() as u64;
        }
        found = local;
    });

    print_perf(label, prefixes.len(), elapsed, found);
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, queries: usize, elapsed: Duration, found: u64) {
    let secs = elapsed.as_secs_f64();

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Queries/sec : {}", fmt_count((queries as f64 / secs) as u64));
    println!("Results     : {}", fmt_count(found));
    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
