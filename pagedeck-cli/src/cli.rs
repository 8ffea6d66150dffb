//! Command-line argument definitions.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pagedeck::assemble::CompressionLevel;

/// Edit the page sequence of PDF documents.
#[derive(Debug, Parser)]
#[command(
    name = "pagedeck",
    version,
    about = "Edit the page sequence of PDF documents",
    long_about = "Reorder, rotate, extract, remove, and splice PDF pages, \
                  or combine whole documents. Every command reads its inputs, \
                  rebuilds the page sequence, and writes a fresh output PDF."
)]
pub struct Cli {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overwrite the output file if it already exists
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Compression level for the output: none, standard, maximum
    #[arg(long, global = true, default_value = "standard")]
    pub compression: CompressionLevel,

    /// Title to set on the output document
    #[arg(long, global = true)]
    pub title: Option<String>,

    /// Author to set on the output document
    #[arg(long, global = true)]
    pub author: Option<String>,

    /// Subject to set on the output document
    #[arg(long, global = true)]
    pub subject: Option<String>,

    /// Keywords to set on the output document (comma-separated)
    #[arg(long, global = true)]
    pub keywords: Option<String>,
}

/// One subcommand per engine operation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Combine multiple PDFs into a single document
    Merge {
        /// Input files or glob patterns, in merge order
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract selected pages into a new document
    Extract {
        /// Input PDF file
        input: PathBuf,

        /// Pages to extract, e.g. "1-3,5"
        #[arg(short, long)]
        pages: String,

        /// Output file path (default: <input>-extracted.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove selected pages from the document
    Remove {
        /// Input PDF file
        input: PathBuf,

        /// Pages to remove, e.g. "2,5-7"
        #[arg(short, long)]
        pages: String,

        /// Output file path (default: <input>-pages-removed.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reorder pages by an explicit page-number list
    Reorder {
        /// Input PDF file
        input: PathBuf,

        /// Complete new page order, e.g. "3,1,2,4"
        #[arg(long)]
        order: String,

        /// Output file path (default: <input>-reordered.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rotate pages clockwise
    Rotate {
        /// Input PDF file
        input: PathBuf,

        /// Degrees to rotate: a multiple of 90, negative for counter-clockwise
        #[arg(short, long, allow_negative_numbers = true)]
        degrees: i64,

        /// Pages to rotate, e.g. "2,4-6" (default: all pages)
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file path (default: <input>-rotated.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert blank pages
    InsertBlank {
        /// Input PDF file
        input: PathBuf,

        /// Insert after this page number, 0 for before the first page; repeatable
        #[arg(long = "after", value_name = "PAGE", required = true)]
        after: Vec<usize>,

        /// Blank page width in points (default: size of the first page)
        #[arg(long, requires = "height")]
        width: Option<f32>,

        /// Blank page height in points
        #[arg(long, requires = "width")]
        height: Option<f32>,

        /// Output file path (default: <input>-blank-pages.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert other PDFs into the main document at page anchors
    Insert {
        /// Main PDF file
        input: PathBuf,

        /// An insertion as PAGE:FILE, e.g. --at 3:appendix.pdf; repeatable.
        /// PAGE is a page number of the main document as it is now; 0
        /// inserts before the first page.
        #[arg(long = "at", value_name = "PAGE:FILE", required = true)]
        at: Vec<String>,

        /// Output file path (default: <input>-with-inserts.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show facts about a PDF
    Info {
        /// Input PDF file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Validate flag combinations clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.quiet && self.verbose {
            bail!("Cannot use both --quiet and --verbose");
        }

        if let Command::Insert { at, .. } = &self.command {
            for spec in at {
                parse_insert_spec(spec)
                    .with_context(|| format!("invalid --at value '{spec}'"))?;
            }
        }

        Ok(())
    }
}

/// Parse an insertion spec of the form `PAGE:FILE`.
pub fn parse_insert_spec(spec: &str) -> Result<(usize, PathBuf)> {
    let Some((page, file)) = spec.split_once(':') else {
        bail!("expected PAGE:FILE, e.g. 3:appendix.pdf");
    };

    let anchor: usize = page
        .trim()
        .parse()
        .with_context(|| format!("'{page}' is not a page number"))?;

    let file = file.trim();
    if file.is_empty() {
        bail!("missing file path after ':'");
    }

    Ok((anchor, PathBuf::from(file)))
}

/// Derive a default output path next to the input: `report.pdf` with
/// suffix `rotated` becomes `report-rotated.pdf`.
pub fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}-{suffix}.pdf"))
}
