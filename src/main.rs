use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tagsearch::index::build::build_index;
use tagsearch::index::stats::dump_index;
use tagsearch::index::{IndexReader, IndexWriter, LookupStrategy};
use tagsearch::output;
use tagsearch::query::QueryExecutor;
use tagsearch::utils::Config;
use termcolor::ColorChoice;

#[derive(Parser)]
#[command(name = "tagsearch")]
#[command(about = "Ranked search over tagged document collections")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding lookup.bin and postings.bin
    #[arg(short, long, default_value = ".", global = true)]
    dir: PathBuf,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scan the lookup table instead of binary searching it
    #[arg(long, global = true)]
    linear: bool,

    /// When to color result lines
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a tagged collection file
    Index {
        /// Collection file
        file: PathBuf,
    },
    /// Print every term in the index with its postings
    Dump,
    /// Answer queries read from stdin, one per line
    Search {
        /// Lookup table (defaults to the one in --dir)
        #[arg(requires = "postings")]
        lookup: Option<PathBuf>,

        /// Postings file
        postings: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.linear {
        config.lookup_strategy = LookupStrategy::Linear;
    }
    let color = output::color_choice(cli.color.into());

    match cli.command {
        Some(Commands::Index { file }) => {
            run_index(&file, &cli.dir, &config)?;
        }
        Some(Commands::Dump) => {
            run_dump(&cli.dir, &config)?;
        }
        Some(Commands::Search {
            lookup: Some(lookup),
            postings: Some(postings),
        }) => {
            run_search(&lookup, &postings, &config, color)?;
        }
        Some(Commands::Search { .. }) | None => {
            run_search(
                &config.lookup_path(&cli.dir),
                &config.postings_path(&cli.dir),
                &config,
                color,
            )?;
        }
    }

    Ok(())
}

fn run_index(file: &Path, dir: &Path, config: &Config) -> Result<()> {
    let writer = IndexWriter::with_files(config.lookup_path(dir), config.postings_path(dir));
    let report = build_index(file, &writer, config)?;

    println!(
        "Indexed {} documents: {} unique terms, {} postings",
        report.documents, report.summary.terms, report.summary.postings
    );
    println!(
        "Index stored at: {} ({} bytes), {} ({} bytes)",
        writer.lookup_path().display(),
        report.summary.lookup_bytes,
        writer.postings_path().display(),
        report.summary.postings_bytes
    );
    if report.bad_docnos > 0 {
        eprintln!("({} document numbers were not recognized)", report.bad_docnos);
    }
    Ok(())
}

fn run_dump(dir: &Path, config: &Config) -> Result<()> {
    let reader = IndexReader::open_files(&config.lookup_path(dir), &config.postings_path(dir))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    dump_index(&reader, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_search(lookup: &Path, postings: &Path, config: &Config, color: ColorChoice) -> Result<()> {
    let reader = IndexReader::open_files(lookup, postings)?.with_strategy(config.lookup_strategy);
    debug!(
        "serving {} terms from {} via {:?}",
        reader.term_count(),
        reader.lookup_path().display(),
        reader.strategy()
    );

    let executor = QueryExecutor::new(&reader);
    let mut out = output::stdout(color);

    for line in io::stdin().lock().lines() {
        let line = line.context("Error getting input")?;
        let results = executor.search(&line)?;
        output::print_results(&mut out, &results, &config.id_prefix)?;
        out.flush()?;
    }

    Ok(())
}
