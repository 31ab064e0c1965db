//! rustysvg - convert SVG files to semantic JSON trees
//!
//! `rustysvg icon.svg icon.json` converts one file. Given a directory, every
//! `*.svg` below it is converted in parallel into the same relative layout
//! under OUTPUT; files that fail are logged and skipped.

use clap::Parser;
use rustysvg::batch::{self, BatchOptions};
use rustysvg::{ConvertOptions, NormalizeOptions, ParserMode, ProjectOptions, SvgConverter, TagCase};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rustysvg", version, about = "Convert SVG markup to a semantic JSON tree")]
struct Cli {
    /// SVG file, or a directory to convert recursively
    input: PathBuf,

    /// JSON file, or the output directory when INPUT is a directory
    output: PathBuf,

    /// Emit a `parsererror` tree for malformed markup instead of failing
    #[arg(long)]
    lenient: bool,

    /// Keep element names as written instead of lowercasing them
    #[arg(long)]
    preserve_case: bool,

    /// Accept documents whose root element is not `svg`
    #[arg(long)]
    accept_foreign_roots: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Collapse whitespace runs in the input before converting
    #[arg(long)]
    collapse_whitespace: bool,
}

impl Cli {
    fn converter(&self) -> SvgConverter<ParserMode> {
        let mode = if self.lenient { ParserMode::Lenient } else { ParserMode::Strict };
        let options = ConvertOptions {
            normalize: NormalizeOptions {
                accept_foreign_roots: self.accept_foreign_roots,
            },
            project: ProjectOptions {
                tag_case: if self.preserve_case { TagCase::Preserve } else { TagCase::Lower },
            },
        };
        SvgConverter::with_options(mode, options)
    }

    fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            pretty: self.pretty,
            collapse_whitespace: self.collapse_whitespace,
        }
    }
}

fn run(cli: &Cli) -> rustysvg::Result<()> {
    let converter = cli.converter();
    let options = cli.batch_options();

    if cli.input.is_dir() {
        let report = batch::convert_all(&converter, &cli.input, &cli.output, &options);
        println!(
            "Converted {} of {} SVG files into {} ({} failed)",
            report.converted.len(),
            report.total(),
            cli.output.display(),
            report.failed.len()
        );
    } else {
        batch::convert_file(&converter, &cli.input, &cli.output, &options)?;
        println!("Successfully parsed {} to {}", cli.input.display(), cli.output.display());
    }
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
