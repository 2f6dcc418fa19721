//! mtbed: stream sorted BED tracks against a file of loci
//!
//! Usage: mtbed <COMMAND> [OPTIONS]

use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

use multitrack_bed::bed::BedError;
use multitrack_bed::commands::{count_loci, ScanCommand};
use multitrack_bed::config::{CoordinatorConfig, RetentionPolicy};

#[derive(Parser)]
#[command(name = "mtbed")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "Multitrack BED: classify sorted interval tracks against a file of loci", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk every track alongside the loci and report what each locus saw
    Scan {
        /// Loci (anchor) BED file
        #[arg(short = 'a', long = "loci")]
        anchor: PathBuf,

        /// Chromosome order file (chromosome name in the first column)
        #[arg(short = 'g', long, required_unless_present = "chroms")]
        genome: Option<PathBuf>,

        /// Chromosome order as a comma-separated list (ignored with -g)
        #[arg(long, value_delimiter = ',')]
        chroms: Vec<String>,

        /// Track BED files, in track index order
        #[arg(short = 't', long = "track", required = true, num_args = 1..)]
        tracks: Vec<PathBuf>,

        /// Keep records that only partially overlap a locus
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        retain_partial: bool,

        /// Keep records on the locus chromosome that end before the locus
        #[arg(long)]
        retain_prior: bool,

        /// Keep records on chromosomes that no locus touched
        #[arg(long)]
        retain_skipped_chrs: bool,

        /// Keep records left on a chromosome after its last locus
        #[arg(long)]
        retain_remainder: bool,

        /// Keep records on chromosomes after the last locus
        #[arg(long)]
        retain_remaining_chrs: bool,

        /// Write every classified record instead of per-locus counts
        #[arg(long)]
        records: bool,

        /// Drain the tracks after the last locus and report the leftovers
        #[arg(long = "final")]
        final_flush: bool,

        /// Print scan statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Count the loci in a BED file
    Count {
        /// Loci (anchor) BED file
        #[arg(short = 'a', long = "loci")]
        anchor: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            anchor,
            genome,
            chroms,
            tracks,
            retain_partial,
            retain_prior,
            retain_skipped_chrs,
            retain_remainder,
            retain_remaining_chrs,
            records,
            final_flush,
            stats,
        } => {
            let policy = RetentionPolicy::new()
                .with_retain_partial(retain_partial)
                .with_retain_prior(retain_prior)
                .with_retain_skipped_chrs(retain_skipped_chrs)
                .with_retain_remainder(retain_remainder)
                .with_retain_remaining_chrs(retain_remaining_chrs);

            let mut config = CoordinatorConfig::new()
                .with_anchor(anchor)
                .with_chrom_order(chroms)
                .with_tracks(tracks)
                .with_policy(policy);
            if let Some(path) = genome {
                config = config.with_chrom_order_file(path);
            }

            let cmd = ScanCommand::new()
                .with_records(records)
                .with_final_flush(final_flush);
            run_scan(config, cmd, stats)
        }

        Commands::Count { anchor } => run_count(anchor),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_scan(config: CoordinatorConfig, cmd: ScanCommand, stats: bool) -> Result<(), BedError> {
    let mut coordinator = config.open()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    let result = cmd.run(&mut coordinator, &mut handle);
    coordinator.close();
    let result = result?;

    if stats {
        eprintln!("Scan stats: {}", result);
    }

    Ok(())
}

fn run_count(anchor: PathBuf) -> Result<(), BedError> {
    println!("{}", count_loci(&anchor)?);
    Ok(())
}
