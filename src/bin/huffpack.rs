//! huffpack CLI - Huffman file compression tool
//!
//! A command-line interface for the huffpack library.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};

use huffpack::{ByteOrder, FileStats, Options};

/// Lossless file compression with Huffman coding.
#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into the archive OUTPUT
    Compress {
        /// File to compress
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Archive to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Restore the archive INPUT into OUTPUT
    Decompress {
        /// Archive to read
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// File to create
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        #[command(flatten)]
        format: FormatArgs,
    },
    /// Compare the sizes of an original file and its archive
    Stats {
        /// Original file
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,
        /// Compressed file
        #[arg(value_name = "COMPRESSED")]
        compressed: PathBuf,
    },
    /// Print the Huffman code table for a file
    Codes {
        /// File to analyze
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Byte order of header fields (must match when decompressing)
    #[arg(long, value_enum, default_value = "native")]
    byte_order: ByteOrderArg,

    /// I/O buffer size in bytes
    #[arg(
        long,
        default_value = "65536",
        value_parser = clap::value_parser!(u32).range(1..=(1 << 26))
    )]
    buffer_size: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ByteOrderArg {
    /// Byte order of this machine
    Native,
    /// Little-endian (portable)
    Little,
    /// Big-endian
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Native => ByteOrder::Native,
            ByteOrderArg::Little => ByteOrder::Little,
            ByteOrderArg::Big => ByteOrder::Big,
        }
    }
}

impl FormatArgs {
    fn to_options(&self) -> Options {
        Options {
            buffer_size: self.buffer_size as usize,
            byte_order: self.byte_order.into(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Compress {
            input,
            output,
            format,
        } => {
            let start = Instant::now();
            let stats = huffpack::compress_with_options(&input, &output, &format.to_options())?;
            let elapsed = start.elapsed();

            println!(
                "Compressed {:?} -> {:?} in {:.2?}",
                input, output, elapsed
            );
            println!(
                "  {} distinct bytes, longest code {} bits",
                stats.symbol_count, stats.max_code_length
            );
            print_stats(&stats.file_stats());
        }
        Command::Decompress {
            input,
            output,
            format,
        } => {
            let start = Instant::now();
            let stats =
                huffpack::decompress_with_options(&input, &output, &format.to_options())?;
            let elapsed = start.elapsed();

            if !stats.is_complete() {
                eprintln!(
                    "Warning: payload ended after {} of {} bytes",
                    stats.decoded_size, stats.original_size
                );
            }
            println!(
                "Decompressed {:?} -> {:?} ({}) in {:.2?}",
                input,
                output,
                format_size(stats.decoded_size),
                elapsed
            );
        }
        Command::Stats {
            original,
            compressed,
        } => {
            print_stats(&huffpack::file_stats(&original, &compressed)?);
        }
        Command::Codes { input } => {
            let codes = huffpack::code_table_for(&input)?;
            print!("{codes}");
            println!(
                "{} symbols, longest code {} bits",
                codes.len(),
                codes.max_length()
            );
        }
    }

    Ok(())
}

fn print_stats(stats: &FileStats) {
    println!("  Original size:     {}", format_size(stats.original_size));
    println!("  Compressed size:   {}", format_size(stats.compressed_size));
    println!("  Compression ratio: {:.2}", stats.ratio());
    println!("  Space saved:       {:.2}%", stats.space_saved_percent());
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
