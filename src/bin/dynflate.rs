use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use dynflate::{DecodeConfig, GzipHeader, MemberDecoder};

#[derive(Parser, Debug)]
#[command(name = "dynflate")]
#[command(about = "Decompress gzip files coded with dynamic Huffman DEFLATE blocks")]
#[command(version)]
struct Args {
    /// Input gzip file
    #[arg(default_value = "FAQ.txt.gz")]
    input: PathBuf,

    /// Output file (defaults to the filename stored in the gzip header,
    /// else the input path with its .gz suffix removed)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write decoded bytes to stdout
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Skip CRC32 and ISIZE verification of the gzip trailer
    #[arg(long)]
    no_verify: bool,

    /// Show decoding statistics
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = DecodeConfig { verify_checksums: !args.no_verify, ..Default::default() };

    let input = BufReader::new(File::open(&args.input)?);
    let decoder = MemberDecoder::with_config(input, &config)?;

    if args.verbose {
        let header = decoder.header();
        if let Some(name) = header.filename.as_deref() {
            eprintln!("Stored filename:    {}", name);
        }
        if header.mtime != 0 {
            eprintln!("Modification time:  {}", header.mtime);
        }
    }

    let start = Instant::now();

    let (stats, destination) = if args.stdout {
        let stdout = io::stdout().lock();
        (decoder.decode_to(BufWriter::new(stdout))?, None)
    } else {
        let path = resolve_output_path(&args, decoder.header())?;
        let output = BufWriter::new(File::create(&path)?);
        (decoder.decode_to(output)?, Some(path))
    };

    let elapsed = start.elapsed();

    if !args.quiet && args.verbose {
        if let Some(path) = &destination {
            eprintln!("Output written to:  {}", path.display());
        }
        eprintln!("Decompression complete:");
        eprintln!("  Input bytes:      {}", stats.input_bytes);
        eprintln!("  Output bytes:     {}", stats.output_bytes);
        eprintln!("  DEFLATE blocks:   {}", stats.blocks_decoded);
        if stats.input_bytes > 0 {
            eprintln!(
                "  Ratio:            {:.2}x",
                stats.output_bytes as f64 / stats.input_bytes as f64
            );
        }
        eprintln!("  Time:             {:.2?}", elapsed);
        eprintln!(
            "  Throughput:       {:.1} MB/s",
            stats.output_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }

    Ok(())
}

/// Pick the output path: an explicit --output wins, then the filename
/// stored in the header (final component only, placed next to the
/// input), then the input path with its .gz suffix stripped.
fn resolve_output_path(args: &Args, header: &GzipHeader) -> Result<PathBuf, String> {
    if let Some(path) = &args.output {
        return Ok(path.clone());
    }

    if let Some(name) = header.filename.as_deref() {
        if let Some(base) = Path::new(name).file_name() {
            let dir = args.input.parent().unwrap_or_else(|| Path::new(""));
            return Ok(dir.join(base));
        }
    }

    if args.input.extension().is_some_and(|ext| ext == "gz") {
        return Ok(args.input.with_extension(""));
    }

    Err(format!(
        "cannot determine output filename for {} (no name in header); use --output",
        args.input.display()
    ))
}
