//! CLI entry point for posannot.
//!
//! Reads a GTF and a position table, and writes the table back out with
//! GENE, LOCATION_IN_GENE and OTHER_LOCATION columns.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use std::path::PathBuf;
use std::str::FromStr;

use posannot::config::{BuildMode, Config};
use posannot::matcher::classify_rows;
use posannot::output::write_annotated_file;
use posannot::parser::{parse_gtf, read_positions};

/// Genomic position annotation tool.
///
/// Annotates positions in a table with the gene, exon/intron and UTR/codon
/// context from the canonical transcripts of a GTF file.
#[derive(Parser, Debug)]
#[command(name = "posannot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GTF annotation file (plain or .gz)
    #[arg(short = 'g', long = "input-gtf", default_value = "input.gtf")]
    gtf: PathBuf,

    /// Position table with CHROM and POSITION columns (.csv or tab-separated)
    #[arg(short = 'i', long = "input", default_value = "input.tsv")]
    input: PathBuf,

    /// Output table (.csv or tab-separated)
    #[arg(short = 'o', long = "output", default_value = "output.tsv")]
    output: PathBuf,

    /// Run the bundled synthetic example (no external data)
    #[arg(long = "example")]
    example: bool,

    /// Directory with the example files, relative to the working directory
    #[arg(long = "demo-dir", default_value = "demos")]
    demo_dir: PathBuf,

    /// Index build mode: two-pass or streaming (same result; two-pass matches features after reading the file)
    #[arg(short = 'm', long = "mode", default_value = "two-pass")]
    mode: String,

    /// Column holding the chromosome
    #[arg(long = "chrom-column", default_value = "CHROM")]
    chrom_column: String,

    /// Column holding the 1-based position
    #[arg(long = "position-column", default_value = "POSITION")]
    position_column: String,

    /// GTF tag for gene ID
    #[arg(short = 'G', long = "gene", default_value = "gene_id")]
    gene_tag: String,

    /// GTF tag for transcript ID
    #[arg(short = 'T', long = "transcript", default_value = "transcript_id")]
    transcript_tag: String,

    /// Tag value marking the canonical transcript
    #[arg(long = "canonical-marker", default_value = "Ensembl_canonical")]
    canonical_marker: String,

    /// Look for the canonical marker in every repeated tag, not only the last
    #[arg(long = "any-tag")]
    any_tag: bool,

    /// Number of worker threads (0 = auto-detect)
    #[arg(long = "threads", short = 'j', default_value = "0")]
    threads: usize,

    /// Hide the progress bar
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Resolve input/output paths, switching to the demo files for `--example`.
fn resolve_paths(args: &Args) -> (PathBuf, PathBuf, PathBuf) {
    if args.example {
        let base = &args.demo_dir;
        return (
            base.join("toy.gtf"),
            base.join("toy.tsv"),
            base.join("toy_output.tsv"),
        );
    }
    (args.gtf.clone(), args.input.clone(), args.output.clone())
}

fn build_config(args: &Args) -> Result<Config> {
    let build_mode = BuildMode::from_str(&args.mode)
        .context("Mode can only be one of the following: two-pass or streaming")?;

    Ok(Config {
        gene_id_tag: args.gene_tag.clone(),
        transcript_id_tag: args.transcript_tag.clone(),
        canonical_marker: args.canonical_marker.clone(),
        match_any_tag: args.any_tag,
        build_mode,
        chrom_column: args.chrom_column.clone(),
        position_column: args.position_column.clone(),
        ..Config::default()
    })
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if quiet {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    } else if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} rows [{elapsed_precise}<{eta_precise}]")
    {
        bar.set_style(style);
    }
    bar
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let args = Args::parse();
    let (gtf_path, input_path, output_path) = resolve_paths(&args);

    // Validate inputs
    if !gtf_path.exists() {
        bail!("GTF not found: {}", gtf_path.display());
    }
    if !input_path.exists() {
        bail!("Input table not found: {}", input_path.display());
    }

    let config = build_config(&args)?;

    let num_threads = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;

    info!("Reading position table: {}", input_path.display());
    let table = read_positions(&input_path, &config)?;

    info!("Parsing GTF file: {}", gtf_path.display());
    let index = parse_gtf(&gtf_path, &config)?;

    let bar = progress_bar(table.len(), args.quiet);
    let annotations = pool.install(|| classify_rows(&index, &table.rows, || bar.inc(1)))?;
    bar.finish_and_clear();

    write_annotated_file(&output_path, &table, &annotations)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}
