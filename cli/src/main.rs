//! santa-extract CLI - document text extraction tool

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;

use santa_extract::detect::{file_type_from_path, sniff_file_type};
use santa_extract::ocr::DEFAULT_OCR_LANGUAGE;
use santa_extract::{
    ErrorMode, ErrorResponse, ExtractionResult, Extractor, OcrConfig, OcrEngine, PdfOptions,
    TesseractOcr, OCR_DPI, SPARSE_TEXT_THRESHOLD, SUPPORTED_FILE_TYPES,
};

/// Files above this size are rejected unless configured otherwise.
const DEFAULT_MAX_FILE_SIZE_MB: u64 = 50;

#[derive(Parser)]
#[command(name = "santa-extract")]
#[command(author = "santa-ai")]
#[command(version)]
#[command(about = "Extract LLM-ready text from PDF, DOCX and text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a document
    Extract(ExtractArgs),

    /// Check whether the OCR tools are installed
    Check {
        /// Output a JSON status object
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Input document
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// File type (pdf, docx, doc, txt, text, md, markdown); defaults to the file extension
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    file_type: Option<String>,

    /// Print the JSON response envelope instead of plain text
    #[arg(long)]
    json: bool,

    /// Output compact JSON
    #[arg(long, requires = "json")]
    compact: bool,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Disable OCR for sparse PDF pages
    #[arg(long, env = "SANTA_NO_OCR")]
    no_ocr: bool,

    /// Pages with fewer text-layer characters than this are sent to OCR
    #[arg(long, env = "SANTA_SPARSE_THRESHOLD", default_value_t = SPARSE_TEXT_THRESHOLD)]
    sparse_threshold: usize,

    /// Rendering resolution for OCR
    #[arg(long, env = "SANTA_OCR_DPI", default_value_t = OCR_DPI)]
    dpi: u32,

    /// Timeout in seconds for each OCR tool invocation
    #[arg(long, env = "SANTA_OCR_TIMEOUT", default_value_t = 60)]
    ocr_timeout: u64,

    /// Tesseract language(s), e.g. "eng" or "eng+deu"
    #[arg(long, env = "SANTA_OCR_LANG", default_value = DEFAULT_OCR_LANGUAGE)]
    ocr_lang: String,

    /// Reject files larger than this many megabytes
    #[arg(long, env = "SANTA_MAX_FILE_SIZE_MB", default_value_t = DEFAULT_MAX_FILE_SIZE_MB)]
    max_size_mb: u64,

    /// Fail on unreadable PDF pages instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Disable table detection in PDFs
    #[arg(long, env = "SANTA_NO_TABLES")]
    no_tables: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(args) => cmd_extract(&args),
        Commands::Check { json } => cmd_check(json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(args: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    match run_extract(args) {
        Ok(result) => {
            let rendered = if args.json {
                to_json(&result.into_response(), args.compact)?
            } else {
                print_summary(&result);
                result.text
            };
            write_output(args.output.as_deref(), &rendered)
        }
        Err(e) if args.json => {
            // Failures still produce a response envelope on stdout
            println!("{}", to_json(&ErrorResponse::new(&e), args.compact)?);
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionResult, Box<dyn std::error::Error>> {
    check_file_size(&args.input, args.max_size_mb)?;
    let data = fs::read(&args.input)?;

    let file_type = resolve_file_type(args.file_type.as_deref(), &args.input, &data)?;
    log::debug!("Extracting {} as {}", args.input.display(), file_type);

    let mut pdf_options = PdfOptions::new()
        .with_sparse_threshold(args.sparse_threshold)
        .with_ocr_dpi(args.dpi)
        .with_tables(!args.no_tables);
    if args.strict {
        pdf_options = pdf_options.with_error_mode(ErrorMode::Strict);
    }

    let mut extractor = Extractor::new().with_pdf_options(pdf_options);
    if !args.no_ocr {
        let config = OcrConfig::new()
            .with_timeout(Duration::from_secs(args.ocr_timeout))
            .with_language(args.ocr_lang.as_str());
        extractor = extractor.with_ocr(Arc::new(TesseractOcr::new(config)));
    }

    Ok(extractor.extract(&data, &file_type)?)
}

/// Reject oversized inputs before reading them.
fn check_file_size(path: &Path, max_size_mb: u64) -> Result<(), Box<dyn std::error::Error>> {
    let size = fs::metadata(path)?.len();
    if size > max_size_mb.saturating_mul(1024 * 1024) {
        return Err(format!("File exceeds {}MB limit.", max_size_mb).into());
    }
    Ok(())
}

/// Pick the file type: explicit flag, then extension, then content sniffing.
fn resolve_file_type(
    explicit: Option<&str>,
    path: &Path,
    data: &[u8],
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(file_type) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(file_type.to_string());
    }
    if let Some(file_type) = file_type_from_path(path) {
        return Ok(file_type);
    }
    if let Some(file_type) = sniff_file_type(data) {
        log::info!("No file extension, detected {} from content", file_type);
        return Ok(file_type.to_string());
    }
    Err("Cannot determine file type. Provide --type or a filename with an extension.".into())
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

fn print_summary(result: &ExtractionResult) {
    let meta = &result.metadata;
    let pages = meta
        .page_count
        .map(|p| format!(", {} pages", p))
        .unwrap_or_default();
    eprintln!(
        "{} {} chars{} via {} in {} ms{}",
        "Extracted".green(),
        meta.char_count,
        pages,
        meta.extraction_method.cyan(),
        meta.extraction_time_ms,
        if meta.table_count > 0 {
            format!(", {} tables", meta.table_count)
        } else {
            String::new()
        }
    );
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", content)?;
    }
    Ok(())
}

fn cmd_check(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ocr = TesseractOcr::detect();

    if json {
        let status = serde_json::json!({
            "status": "ok",
            "service": "santa-extract",
            "ocr_available": ocr.is_available(),
            "supported_file_types": SUPPORTED_FILE_TYPES,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "OCR Tools".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "pdftoppm".bold(), ocr.config().pdftoppm.display());
    println!("{}: {}", "tesseract".bold(), ocr.config().tesseract.display());
    if ocr.is_available() {
        println!("{}: {}", "OCR".bold(), "available".green());
    } else {
        println!("{}: {}", "OCR".bold(), "unavailable".yellow());
        println!("Sparse PDF pages will keep their text layer.");
    }
    println!();
    println!("{}: {}", "File types".bold(), SUPPORTED_FILE_TYPES.join(", "));

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "santa-extract".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document text extraction tool (PDF, DOCX, text)");
    println!();
    println!("License: MIT");
}
