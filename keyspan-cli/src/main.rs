use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use keyspan::{BuiltIndex, IndexBuilder};

/// How many sample keys to print after a build, so the operator can verify
/// their delimiter and column choices parsed sensibly.
const SAMPLE_KEYS: usize = 3;

#[derive(Debug, Parser)]
#[command(
    name = "keyspan",
    version,
    about = "Generate a byte-span index for a delimited text file"
)]
struct Args {
    /// The data file to be indexed.
    source: PathBuf,

    /// Which column to use in building the categories (1-based index).
    key_col: usize,

    /// The number of header rows to exclude from indexing.
    #[arg(short = 'S', long = "skip-lines", default_value_t = 0)]
    skip_lines: u64,

    /// The character used to distinguish between fields.
    #[arg(short, long, default_value_t = '\t')]
    delimiter: char,

    /// The name of the index file to be written.
    #[arg(short = 'o', long = "index-name")]
    index_name: Option<PathBuf>,
}

fn run(args: &Args) -> keyspan::Result<BuiltIndex> {
    let mut builder = IndexBuilder::new();
    builder.delimiter(args.delimiter).skip_lines(args.skip_lines);
    if let Some(ref path) = args.index_name {
        builder.index_path(path);
    }
    builder.index(&args.source, args.key_col)
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(built) => {
            info!("indexed {}", args.source.display());
            println!(
                "Indexing complete. To verify your delimiter and parsing \
                 options, here are {} sample values from the index:",
                SAMPLE_KEYS.min(built.keys().len())
            );
            for key in built.keys().iter().take(SAMPLE_KEYS) {
                println!("- {}", key);
            }
            println!("Index written to: {}", built.index_path().display());
        }
        Err(err) => {
            eprintln!("keyspan: {}", err);
            process::exit(1);
        }
    }
}
