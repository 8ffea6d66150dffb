//! pagedeck - edit the page sequence of PDF documents.
//!
//! Each subcommand opens its inputs, rebuilds the page sequence through the
//! engine, and writes a fresh output PDF.

mod cli;
mod report;
mod utils;

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::{Cli, Command, default_output, parse_insert_spec};
use crate::report::Reporter;
use pagedeck::assemble::{AssembleOptions, Assembler, OutputMetadata};
use pagedeck::document::{DocumentHandle, DocumentRegistry};
use pagedeck::error::PagedeckError;
use pagedeck::input::{PageSelection, parse_order};
use pagedeck::io::{DocumentReader, OutputWriter};
use pagedeck::ops;
use pagedeck::page::PageSize;
use pagedeck::sequence::PageSequence;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }

    let reporter = Reporter::new(cli.quiet, cli.verbose);

    if let Err(err) = run(cli, &reporter).await {
        reporter.error(&err.to_string());
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli, reporter: &Reporter) -> Result<(), PagedeckError> {
    let assembler = Assembler::with_options(AssembleOptions {
        compression: cli.compression,
        metadata: OutputMetadata::new(cli.title, cli.author, cli.subject, cli.keywords),
    });
    let force = cli.force;

    match cli.command {
        Command::Merge { inputs, output } => {
            let paths = utils::collect_paths_for_patterns(&inputs)?;
            if paths.is_empty() {
                return Err(PagedeckError::invalid_operation(
                    "no input files matched the given patterns",
                ));
            }

            reporter.info(&format!("Opening {} file(s)...", paths.len()));
            let reader = DocumentReader::new();
            let workers = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            let (results, stats) = reader.open_all(&paths, workers).await;

            if stats.failure_count > 0 {
                reporter.warning(&format!("{} file(s) failed to open", stats.failure_count));
            }

            let mut registry = DocumentRegistry::new();
            let mut sequences = Vec::with_capacity(results.len());
            for result in results {
                let opened = result?;
                sequences.push(PageSequence::from_document(&opened.handle));
                registry.insert(opened.handle);
            }

            reporter.detail("Input pages", &stats.total_pages.to_string());
            reporter.detail("Input size", &stats.format_total_size());

            let combined = ops::merge(&sequences)?;
            write_output(&assembler, &combined, &registry, &output, force, reporter).await
        }

        Command::Extract {
            input,
            pages,
            output,
        } => {
            let handle = open_single(&input, reporter).await?;
            let selection = PageSelection::parse(&pages)?;
            let indices = selection.to_indices(handle.page_count())?;

            let sequence = PageSequence::from_document(&handle);
            let extracted = ops::extract(&sequence, &indices)?;

            let mut registry = DocumentRegistry::new();
            registry.insert(handle);

            let output = output.unwrap_or_else(|| default_output(&input, "extracted"));
            write_output(&assembler, &extracted, &registry, &output, force, reporter).await
        }

        Command::Remove {
            input,
            pages,
            output,
        } => {
            let handle = open_single(&input, reporter).await?;
            let selection = PageSelection::parse(&pages)?;
            let indices = selection.to_indices(handle.page_count())?;

            let sequence = PageSequence::from_document(&handle);
            let remaining = ops::remove_at(&sequence, &indices)?;

            let mut registry = DocumentRegistry::new();
            registry.insert(handle);

            let output = output.unwrap_or_else(|| default_output(&input, "pages-removed"));
            write_output(&assembler, &remaining, &registry, &output, force, reporter).await
        }

        Command::Reorder {
            input,
            order,
            output,
        } => {
            let handle = open_single(&input, reporter).await?;
            let order = parse_order(&order)?;

            let sequence = PageSequence::from_document(&handle);
            let reordered = ops::apply_permutation(&sequence, &order)?;

            let mut registry = DocumentRegistry::new();
            registry.insert(handle);

            let output = output.unwrap_or_else(|| default_output(&input, "reordered"));
            write_output(&assembler, &reordered, &registry, &output, force, reporter).await
        }

        Command::Rotate {
            input,
            degrees,
            pages,
            output,
        } => {
            let handle = open_single(&input, reporter).await?;
            let sequence = PageSequence::from_document(&handle);

            let rotated = match pages {
                Some(pages) => {
                    let selection = PageSelection::parse(&pages)?;
                    let indices = selection.to_indices(handle.page_count())?;
                    let mut sequence = sequence;
                    for index in indices {
                        sequence = ops::rotate_by(&sequence, index, degrees)?;
                    }
                    sequence
                }
                None => ops::rotate_all(&sequence, degrees)?,
            };

            let mut registry = DocumentRegistry::new();
            registry.insert(handle);

            let output = output.unwrap_or_else(|| default_output(&input, "rotated"));
            write_output(&assembler, &rotated, &registry, &output, force, reporter).await
        }

        Command::InsertBlank {
            input,
            after,
            width,
            height,
            output,
        } => {
            let handle = open_single(&input, reporter).await?;
            let size = match (width, height) {
                (Some(width), Some(height)) => Some(PageSize::new(width, height)),
                _ => None,
            };

            // Anchors address the original page numbering. Inserting from
            // the back keeps the earlier anchors valid.
            let mut anchors = after;
            anchors.sort_unstable_by(|a, b| b.cmp(a));

            let mut sequence = PageSequence::from_document(&handle);
            for anchor in anchors {
                sequence = ops::insert_blank_at(&sequence, anchor, size)?;
            }

            let mut registry = DocumentRegistry::new();
            registry.insert(handle);

            let output = output.unwrap_or_else(|| default_output(&input, "blank-pages"));
            write_output(&assembler, &sequence, &registry, &output, force, reporter).await
        }

        Command::Insert { input, at, output } => {
            let mut specs = Vec::with_capacity(at.len());
            for spec in &at {
                let parsed = parse_insert_spec(spec).map_err(|e| {
                    PagedeckError::invalid_operation(format!("invalid --at value '{spec}': {e:#}"))
                })?;
                specs.push(parsed);
            }

            let main_handle = open_single(&input, reporter).await?;
            let sequence = PageSequence::from_document(&main_handle);

            let reader = DocumentReader::new();
            let mut inserts: Vec<(usize, DocumentHandle)> = Vec::with_capacity(specs.len());
            for (anchor, file) in specs {
                let opened = reader.open(&file).await?;
                reporter.info(&format!(
                    "Inserting {} ({} page(s)) after page {anchor}",
                    file.display(),
                    opened.handle.page_count()
                ));
                inserts.push((anchor, opened.handle));
            }

            let pairs: Vec<(usize, &DocumentHandle)> = inserts
                .iter()
                .map(|(anchor, handle)| (*anchor, handle))
                .collect();
            let spliced = ops::splice_documents_at(&sequence, &pairs)?;

            let mut registry = DocumentRegistry::new();
            registry.insert(main_handle);
            for (_, handle) in inserts {
                registry.insert(handle);
            }

            let output = output.unwrap_or_else(|| default_output(&input, "with-inserts"));
            write_output(&assembler, &spliced, &registry, &output, force, reporter).await
        }

        Command::Info { input, json } => {
            let reader = DocumentReader::new();
            let opened = reader.open(&input).await?;
            let summary = opened.handle.summary();

            if json {
                let rendered = serde_json::to_string_pretty(&summary)
                    .map_err(|e| PagedeckError::other(e.to_string()))?;
                println!("{rendered}");
            } else {
                println!("{}", input.display());
                println!("  Pages:   {}", summary.page_count);
                println!("  Size:    {} bytes", summary.byte_length);
                if let Some((major, minor)) = summary.version {
                    println!("  Version: {major}.{minor}");
                }
                println!("  Objects: {}", summary.object_count);
                if reporter.is_verbose() {
                    for (number, size) in summary.page_sizes.iter().enumerate() {
                        println!(
                            "  Page {}: {:.2} x {:.2} pt",
                            number + 1,
                            size.width,
                            size.height
                        );
                    }
                }
            }
            Ok(())
        }
    }
}

/// Open one input file, reporting its page count.
async fn open_single(path: &Path, reporter: &Reporter) -> Result<DocumentHandle, PagedeckError> {
    let reader = DocumentReader::new();
    let opened = reader.open(path).await?;
    reporter.info(&format!(
        "{}: {} page(s)",
        path.display(),
        opened.handle.page_count()
    ));
    Ok(opened.handle)
}

/// Serialize a sequence and write it, honoring overwrite protection.
async fn write_output(
    assembler: &Assembler,
    sequence: &PageSequence,
    registry: &DocumentRegistry,
    output: &Path,
    force: bool,
    reporter: &Reporter,
) -> Result<(), PagedeckError> {
    let writer = OutputWriter::new();

    if !force && writer.exists(output).await {
        return Err(PagedeckError::OutputExists {
            path: output.to_path_buf(),
        });
    }

    let bytes = assembler.serialize(sequence, registry).await?;
    let stats = writer.save_with_stats(&bytes, output).await?;

    reporter.success(&format!(
        "Wrote {} ({} page(s), {})",
        output.display(),
        sequence.len(),
        stats.format_file_size()
    ));
    reporter.detail(
        "Write time",
        &format!("{:.2}s", stats.write_time.as_secs_f64()),
    );

    Ok(())
}
