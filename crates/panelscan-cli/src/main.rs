// CLI tool has numeric conversions for progress display and page geometry.
// These are safe because:
// - Page counts and pixel coordinates are well within representable ranges
// - Timings use f64 which handles all cases
#![allow(
    clippy::cast_possible_truncation, // pixel coords, page counts - safe ranges
    clippy::cast_sign_loss,           // lengths/counts are always non-negative
    clippy::cast_precision_loss,      // f32/f64 sufficient for display purposes
    clippy::too_many_lines,           // CLI handlers are necessarily large
)]

//! Panelscan CLI - panel schedule extraction tool
//!
//! A command-line interface for extracting symbol and text rows from
//! rasterized panel-schedule PDFs.

mod debug_images;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use panelscan_backend::{ExtractorConfig, ScheduleExtractor};
use panelscan_core::{
    FixedBandSegmenter, PageClassifier, RowPolicy, RowSegmenter, TemplateLibrary,
};
use panelscan_ocr::TesseractRecognizer;

use crate::debug_images::DebugImageWriter;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "panelscan",
    about = "Extract panel schedule rows from PDF documents",
    long_about = "Extract structured rows from electrical panel-schedule PDFs.\n\
                  \n\
                  Each page is rasterized, segmented into rows along its ruling lines,\n\
                  matched against a directory of symbol template images and OCR'd for\n\
                  the description, protection and cable columns. Output is JSON.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract all rows from a panel schedule PDF
    #[command(long_about = "Extract all rows from a panel schedule PDF.\n\
                      \n\
                      Requires the pdfium shared library and Tesseract language data.\n\
                      Symbol templates are read from the --templates directory, one\n\
                      image file per symbol, named after the symbol.")]
    Extract {
        /// Input PDF path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        options: ClassifyOptions,

        #[command(flatten)]
        raster: RasterOptions,
    },

    /// Classify a single pre-rasterized page image
    #[command(long_about = "Classify a single pre-rasterized page image.\n\
                      \n\
                      Reads a PNG or JPEG page image directly, with no PDF rendering\n\
                      involved, and runs row segmentation, symbol matching and OCR on\n\
                      it. The page number recorded in the output is set with\n\
                      --page-number. Page numbers start at 1.")]
    Page {
        /// Page image path (PNG or JPEG)
        #[arg(value_name = "IMAGE")]
        input: PathBuf,

        /// Page number to report in the output record
        #[arg(long, value_name = "N", default_value_t = 1)]
        page_number: usize,

        /// Output file path (default: stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        options: ClassifyOptions,
    },

    /// List the symbol templates in a template directory
    #[command(long_about = "List the symbol templates in a template directory.\n\
                      \n\
                      Shows each template with its cleaned mask size. Blank templates\n\
                      (no ink left after cleaning) are flagged; they never match.")]
    Templates {
        /// Template directory
        #[arg(long, value_name = "DIR", default_value = "templates")]
        templates: PathBuf,
    },
}

/// Options shared by the extract and page commands.
#[derive(clap::Args, Debug)]
struct ClassifyOptions {
    /// Template directory with one image per symbol
    #[arg(long, value_name = "DIR", default_value = "templates")]
    templates: PathBuf,

    /// Tesseract language codes (e.g. "eng", "fin+eng")
    #[arg(long, value_name = "LANG", default_value = "eng")]
    lang: String,

    /// Use the fixed reference row grid instead of detected ruling lines
    #[arg(long)]
    fixed_rows: bool,

    /// Emit only rows that carry at least one recognized symbol
    #[arg(long)]
    symbol_rows_only: bool,

    /// Write annotated debug images to this directory
    #[arg(long, value_name = "DIR")]
    debug_dir: Option<PathBuf>,
}

/// PDF rendering options, only meaningful for the extract command.
#[derive(clap::Args, Debug)]
struct RasterOptions {
    /// Rendering resolution in DPI
    #[arg(long, value_name = "N", default_value_t = 300.0)]
    dpi: f32,

    /// Directory holding the pdfium shared library
    #[arg(long, value_name = "DIR")]
    pdfium_dir: Option<PathBuf>,
}

impl ClassifyOptions {
    fn to_config(&self) -> ExtractorConfig {
        let mut config = ExtractorConfig::default().with_template_dir(&self.templates);
        config.ocr.language = self.lang.clone();
        if self.fixed_rows {
            config.classifier.segmenter = RowSegmenter::Fixed(FixedBandSegmenter::default());
        }
        if self.symbol_rows_only {
            config.classifier.row_policy = RowPolicy::SymbolRowsOnly;
        }
        config
    }

    /// Creates the debug directory and the observer writing into it.
    fn debug_observer(&self) -> Result<Option<Box<DebugImageWriter>>> {
        let Some(dir) = &self.debug_dir else {
            return Ok(None);
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create debug directory {}", dir.display()))?;
        Ok(Some(Box::new(DebugImageWriter::new(dir.clone()))))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(verbosity.log_filter()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    match args.command {
        Commands::Extract {
            input,
            output,
            pretty,
            options,
            raster,
        } => run_extract(&input, output.as_deref(), pretty, &options, &raster, verbosity),
        Commands::Page {
            input,
            page_number,
            output,
            pretty,
            options,
        } => run_page(&input, page_number, output.as_deref(), pretty, &options, verbosity),
        Commands::Templates { templates } => run_templates(&templates),
    }
}

fn run_extract(
    input: &Path,
    output: Option<&Path>,
    pretty: bool,
    options: &ClassifyOptions,
    raster: &RasterOptions,
    verbosity: Verbosity,
) -> Result<()> {
    let mut config = options.to_config();
    config.raster.dpi = raster.dpi;
    config.raster.pdfium_dir = raster.pdfium_dir.clone();
    let extractor = match options.debug_observer()? {
        Some(observer) => ScheduleExtractor::with_observer(config, observer),
        None => ScheduleExtractor::new(config),
    }
    .context("failed to initialize extraction engines")?;

    let spinner = verbosity
        .should_show_output()
        .then(|| spinner(format!("Extracting {}...", input.display())));
    let start = Instant::now();
    let result = extractor.extract_file(input);
    let elapsed = start.elapsed();
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let json = if pretty {
        result.to_json_pretty()?
    } else {
        result.to_json()?
    };
    write_output(output, &json)?;

    if verbosity.is_verbose() {
        eprintln!(
            "{} Extraction completed in {:.2}s",
            "Info:".blue().bold(),
            elapsed.as_secs_f64()
        );
    }
    if !result.is_success() {
        eprintln!(
            "{} could not process {}",
            "Error:".red().bold(),
            input.display()
        );
        std::process::exit(1);
    }
    if verbosity.should_show_output() {
        eprintln!(
            "{} {} page(s), {} row(s)",
            "Done:".green().bold(),
            result.total_pages,
            result.total_rows
        );
    }
    Ok(())
}

fn run_page(
    input: &Path,
    page_number: usize,
    output: Option<&Path>,
    pretty: bool,
    options: &ClassifyOptions,
    verbosity: Verbosity,
) -> Result<()> {
    if page_number == 0 {
        bail!("page numbers start at 1");
    }

    let image = image::open(input)
        .with_context(|| format!("failed to read page image {}", input.display()))?;

    let config = options.to_config();
    let ocr = TesseractRecognizer::new(config.ocr.clone())
        .context("failed to initialize Tesseract")?;
    let templates = TemplateLibrary::load(&config.template_dir);
    let mut classifier = PageClassifier::new(config.classifier.clone());
    if let Some(observer) = options.debug_observer()? {
        classifier = classifier.with_observer(observer);
    }

    let spinner = verbosity
        .should_show_output()
        .then(|| spinner(format!("Classifying {}...", input.display())));
    let record = classifier.classify_page(page_number, &image, &templates, &ocr);
    if let Some(s) = spinner {
        s.finish_and_clear();
    }

    let json = if pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    write_output(output, &json)?;

    if verbosity.should_show_output() {
        eprintln!(
            "{} page {} has {} row(s)",
            "Done:".green().bold(),
            page_number,
            record.row_count()
        );
    }
    Ok(())
}

fn run_templates(dir: &Path) -> Result<()> {
    let library = TemplateLibrary::load(dir);
    if library.is_empty() {
        println!("No templates found in {}", dir.display());
        return Ok(());
    }

    println!("{} template(s) in {}:", library.len(), dir.display());
    for template in library.iter() {
        let (width, height) = template.dimensions();
        if template.is_blank() {
            println!(
                "  {:<20} {}x{} {}",
                template.name().cyan(),
                width,
                height,
                "(blank, never matches)".yellow()
            );
        } else {
            println!("  {:<20} {}x{}", template.name().cyan(), width, height);
        }
    }
    Ok(())
}

fn write_output(output: Option<&Path>, json: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let s = ProgressBar::new_spinner();
    s.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("template is compile-time constant")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    s.set_message(message);
    s.enable_steady_tick(std::time::Duration::from_millis(80));
    s
}
