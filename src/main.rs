//! docx2epub - Word document to EPUB converter

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docx2epub::{ConvertOptions, Converter, CoverAsset, DocumentInput, SegmentStrategy};

#[derive(Parser)]
#[command(name = "docx2epub")]
#[command(version, about = "Convert Word documents to EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    docx2epub Roman.docx                    Write Roman.epub next to the input
    docx2epub Roman.docx out.epub -c a.png  Embed a cover image
    docx2epub Roman.docx --chapters         Show detected chapters as JSON")]
struct Cli {
    /// Input document (DOCX, or HTML to skip DOCX conversion)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output EPUB file [default: INPUT with .epub extension]
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Cover image (png, jpg, jpeg, gif, webp)
    #[arg(short, long, value_name = "IMAGE")]
    cover: Option<PathBuf>,

    /// Book title [default: input file name]
    #[arg(short, long)]
    title: Option<String>,

    /// Book author
    #[arg(short, long)]
    author: Option<String>,

    /// Book language code
    #[arg(short, long)]
    language: Option<String>,

    /// How chapter boundaries are detected
    #[arg(short, long, value_enum, default_value_t = SegmentStrategy::Headings)]
    strategy: SegmentStrategy,

    /// Print detected chapters as JSON instead of writing an EPUB
    #[arg(long)]
    chapters: bool,

    /// Suppress output messages
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let input = read_input(&cli.input)?;

    let mut options = ConvertOptions::new().with_strategy(cli.strategy);
    if let Some(title) = &cli.title {
        options = options.with_title(title);
    }
    if let Some(author) = &cli.author {
        options = options.with_author(author);
    }
    if let Some(language) = &cli.language {
        options = options.with_language(language);
    }
    let converter = Converter::new().with_options(options);

    if cli.chapters {
        let chapters = converter.chapters(&input).map_err(|e| e.to_string())?;
        let json = serde_json::to_string_pretty(&chapters).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let cover = cli.cover.as_deref().map(read_cover).transpose()?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_file_name(input.epub_file_name()));

    let epub = converter
        .convert(&input, cover.as_ref())
        .map_err(|e| e.to_string())?;
    fs::write(&output, &epub).map_err(|e| format!("{}: {e}", output.display()))?;

    if !cli.quiet {
        println!(
            "Converted {} -> {} ({} bytes)",
            cli.input.display(),
            output.display(),
            epub.len()
        );
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<DocumentInput, String> {
    let data = fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    DocumentInput::new(file_name(path), data).map_err(|e| e.to_string())
}

fn read_cover(path: &Path) -> Result<CoverAsset, String> {
    let data = fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    CoverAsset::new(&file_name(path), data).map_err(|e| e.to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
