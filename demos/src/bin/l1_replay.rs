use anyhow::{Context, Result, bail};
use clap::Parser;
use l1_book::replay::{
    GeneratorConfig, count_out_of_order, generate_updates, load_csv, replay, write_csv,
};
use l1_book::{TopOfBook, setup_logger};
use std::path::PathBuf;
use tracing::info;

/// Replay an L1 tick file (or a generated feed) through a top-of-book store
#[derive(Parser, Debug)]
#[command(name = "l1-replay", about = "Replay L1 updates and report staleness and throughput")]
struct Cli {
    /// CSV file with columns seq,bid_px,bid_sz,ask_px,ask_sz
    #[arg(long, conflicts_with = "generate")]
    input: Option<PathBuf>,

    /// Generate this many synthetic updates instead of reading a file
    #[arg(long)]
    generate: Option<usize>,

    /// Out-of-order probability per generated update
    #[arg(long, default_value_t = 5e-4)]
    reorder: f64,

    /// Largest slip of a delayed update
    #[arg(long, default_value_t = 3)]
    max_gap: usize,

    /// Chance of growing a slip by one more position
    #[arg(long, default_value_t = 0.4)]
    gap_decay: f64,

    /// RNG seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Write the generated updates to this CSV file
    #[arg(long, requires = "generate")]
    write: Option<PathBuf>,

    /// Replay this many times, resetting the book in between
    #[arg(long, default_value_t = 1)]
    rounds: usize,

    /// Print the results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    setup_logger();
    let cli = Cli::parse();

    let updates = match (&cli.input, cli.generate) {
        (Some(path), _) => {
            load_csv(path).with_context(|| format!("loading {}", path.display()))?
        }
        (None, Some(count)) => {
            let config = GeneratorConfig {
                count,
                reorder_rate: cli.reorder,
                max_gap: cli.max_gap,
                gap_decay: cli.gap_decay,
                seed: cli.seed,
            };
            if !(0.0..=1.0).contains(&config.reorder_rate)
                || !(0.0..=1.0).contains(&config.gap_decay)
            {
                bail!("--reorder and --gap-decay must be probabilities in [0, 1]");
            }

            let updates = generate_updates(&config);
            let summary = count_out_of_order(&updates);
            info!(
                "Generated {} updates - out-of-order: {} ({:.4}%), avg lag {:.2} seqs",
                updates.len(),
                summary.count,
                100.0 * summary.count as f64 / updates.len().max(1) as f64,
                summary.average_lag
            );

            if let Some(path) = &cli.write {
                write_csv(path, &updates)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            updates
        }
        (None, None) => bail!("either --input or --generate is required"),
    };

    let mut book = TopOfBook::new();
    for round in 1..=cli.rounds.max(1) {
        book.reset();
        let stats = replay(&book, &updates).context("replaying updates")?;
        info!("Round {} finished in {:?}", round, stats.elapsed);

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("\n{stats}");
        }
    }

    Ok(())
}
