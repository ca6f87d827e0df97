//! doxml: convert Doxygen-style C header comments into XML doc comments.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `doxml < z3_api.h` prints the rendered comments
//! - **file mode**: `doxml -o out/ include/*.h` writes one file per header
//!
//! Both modes build the symbol catalog from every input before rendering
//! the first comment.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use doxml::header;
use doxml::model::Corpus;
use doxml::render::{self, RenderOptions};
use doxml::{NameStyle, ParseOptions, Pipeline, SymbolConvention};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "doxml",
    about = "Convert Doxygen-style C header comments into XML documentation comments"
)]
struct Cli {
    /// Input headers (glob patterns and directories supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: xml (default), json
    #[arg(short = 'f', long, default_value = "xml")]
    format: String,

    /// Spaces written before each `///`
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// How callable references and see-also entries are named
    #[arg(long, value_enum, default_value_t = Naming::Keep)]
    naming: Naming,

    /// Prefix removed before pascal-casing names
    #[arg(long, default_value = "Z3_")]
    strip_prefix: String,

    /// Only `#ident` tokens starting with this prefix are references
    #[arg(long)]
    symbol_prefix: Option<String>,

    /// Callable rendered as plain text instead of a cref.
    /// Can be specified multiple times.
    #[arg(long)]
    plain_ref: Vec<String>,

    /// Accept a corpus that declares no value constants
    #[arg(long)]
    allow_empty_catalog: bool,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Naming {
    Keep,
    Pascal,
}

impl Cli {
    fn name_style(&self) -> NameStyle {
        match self.naming {
            Naming::Keep => NameStyle::Keep,
            Naming::Pascal => NameStyle::Pascal {
                strip_prefix: self.strip_prefix.clone(),
            },
        }
    }

    fn parse_options(&self) -> ParseOptions {
        let convention = match &self.symbol_prefix {
            Some(prefix) => SymbolConvention::with_prefix(prefix.as_str()),
            None => SymbolConvention::any(),
        };
        ParseOptions { convention }
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: " ".repeat(self.indent),
            plain_refs: self.plain_ref.iter().cloned().collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stderr keeps stdout clean for rendered output in stdin mode
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read one header from stdin, write rendered comments to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let corpus = header::scan(&input, "<stdin>").context("failed to scan stdin")?;
    let pipeline = Pipeline::build(&corpus, cli.parse_options(), cli.allow_empty_catalog)
        .context("failed to build symbol catalog")?;

    let renderer = render::create_renderer(&cli.format, cli.render_options(), cli.name_style())?;
    let documented = pipeline.document_all(&corpus.entities);
    print!("{}", renderer.render(&documented)?);
    Ok(())
}

/// file mode: scan every header, build one catalog, then write one output
/// file per header that has documented entities.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    // Fail on a bad format before touching the filesystem.
    let renderer = render::create_renderer(&cli.format, cli.render_options(), cli.name_style())?;
    let ext = renderer.file_extension();

    let input_files = expand_globs(&cli.files)?;

    // Catalog phase: every file is scanned before any comment is parsed.
    let mut corpus = Corpus::default();
    let mut per_file: Vec<(PathBuf, Corpus)> = Vec::new();
    for path in &input_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let origin = path.to_string_lossy();
        let scanned = header::scan(&content, &origin)
            .with_context(|| format!("failed to scan {}", path.display()))?;
        corpus.constants.extend(scanned.constants.iter().cloned());
        per_file.push((path.clone(), scanned));
    }
    let pipeline = Pipeline::build(&corpus, cli.parse_options(), cli.allow_empty_catalog)
        .context("failed to build symbol catalog")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for (path, scanned) in per_file {
        // Skip headers with no documented declarations
        if scanned.entities.is_empty() {
            continue;
        }
        let documented = pipeline.document_all(&scanned.entities);
        let name = derive_output_name(&path.to_string_lossy());
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        let output = renderer.render(&documented)?;
        fs::write(&out_path, &output)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

/// File extensions recognized as headers.
const SUPPORTED_EXTENSIONS: &[&str] = &["h", "hpp", "hh"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for header files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a header path.
/// "include/z3_api.h" → "z3_api"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit(['/', '\\']).next().unwrap_or(source);
    SUPPORTED_EXTENSIONS
        .iter()
        .find_map(|ext| filename.strip_suffix(&format!(".{ext}")))
        .unwrap_or(filename)
        .to_string()
}
