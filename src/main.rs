//! photograde CLI — batch evaluation round-trip from the command line.
//!
//! Usage:
//!   photograde template <IMAGES>...   Write the CSV score-sheet template
//!   photograde sheet <IMAGES>...      Render the PDF contact sheet
//!   photograde merge <IMAGES>...      Normalize a filled sheet against a batch
//!   photograde pack <IMAGES>...       Export the scored ZIP archive

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use photograde::batch::ImageBatch;
use photograde::scores::{self, ScoreSheet};
use photograde::sheet::{GridOptions, SheetOptions, pdf::render_contact_sheet_file};
use photograde::{Result, export};

#[derive(Parser)]
#[command(
    name = "photograde",
    about = "Image evaluation round-trips: contact sheets, score CSVs, scored exports",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the empty CSV score sheet for a batch
    Template {
        /// Image files, or a single directory of images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Output CSV path
        #[arg(short, long, default_value = "scores.csv")]
        output: PathBuf,
    },

    /// Render the paginated PDF contact sheet
    Sheet {
        /// Image files, or a single directory of images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Filled score CSV to print under each thumbnail
        #[arg(short, long)]
        scores: Option<PathBuf>,

        /// Output PDF path
        #[arg(short, long, default_value = "review.pdf")]
        output: PathBuf,

        /// Grid columns per page
        #[arg(long, default_value = "2")]
        columns: usize,

        /// Grid rows per page
        #[arg(long, default_value = "4")]
        rows: usize,

        /// Sheet title shown in the page header
        #[arg(long, default_value = "Image evaluation sheet")]
        title: String,

        /// Instruction text for the evaluator (first page header)
        #[arg(long)]
        notes: Option<String>,

        /// External TTF font for captions beyond ASCII
        #[arg(long)]
        font: Option<PathBuf>,
    },

    /// Join a filled score sheet onto a batch and write the normalized CSV
    Merge {
        /// Image files, or a single directory of images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Filled score CSV
        #[arg(short, long)]
        scores: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "merged.csv")]
        output: PathBuf,
    },

    /// Export the batch as a ZIP with scores embedded in entry names
    Pack {
        /// Image files, or a single directory of images
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Filled score CSV; without it entries keep empty score slots
        #[arg(short, long)]
        scores: Option<PathBuf>,

        /// Output ZIP path
        #[arg(short, long, default_value = "scored_images.zip")]
        output: PathBuf,

        /// Character budget for the comment slot of entry names
        #[arg(long, default_value = "30")]
        max_comment: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Template { images, output } => {
            let batch = load_batch(&images)?;
            scores::write_template(BufWriter::new(File::create(&output)?), &batch)?;
            println!(
                "Wrote template for {} images to '{}'",
                batch.len(),
                output.display()
            );
        }
        Commands::Sheet {
            images,
            scores,
            output,
            columns,
            rows,
            title,
            notes,
            font,
        } => {
            let batch = load_batch(&images)?;
            let sheet = scores.map(|p| scores::load_scores(&p)).transpose()?;
            let opts = SheetOptions {
                title,
                notes,
                grid: GridOptions {
                    columns,
                    rows,
                    ..GridOptions::default()
                },
                font,
                ..SheetOptions::default()
            };
            render_contact_sheet_file(&output, &batch, sheet.as_ref(), &opts)?;
            println!(
                "Wrote contact sheet for {} images to '{}'",
                batch.len(),
                output.display()
            );
        }
        Commands::Merge {
            images,
            scores,
            output,
        } => {
            let batch = load_batch(&images)?;
            let sheet = scores::load_scores(&scores)?;
            let matched = matched_count(&sheet, &batch);
            scores::write_merged(BufWriter::new(File::create(&output)?), &batch, &sheet)?;
            println!(
                "Matched {}/{} images ({} sheet rows); wrote '{}'",
                matched,
                batch.len(),
                sheet.len(),
                output.display()
            );
        }
        Commands::Pack {
            images,
            scores,
            output,
            max_comment,
        } => {
            let batch = load_batch(&images)?;
            let sheet = scores.map(|p| scores::load_scores(&p)).transpose()?;
            export::write_archive_file(&output, &batch, sheet.as_ref(), max_comment)?;
            println!("Packed {} images into '{}'", batch.len(), output.display());
        }
    }
    Ok(())
}

/// A single directory argument loads its contents; anything else is
/// treated as an explicit file list.
fn load_batch(paths: &[PathBuf]) -> Result<ImageBatch> {
    if let [single] = paths
        && single.is_dir()
    {
        return ImageBatch::from_dir(single);
    }
    ImageBatch::from_files(paths)
}

fn matched_count(sheet: &ScoreSheet, batch: &ImageBatch) -> usize {
    sheet.attach(batch).iter().flatten().count()
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if verbose {
        "photograde=debug"
    } else {
        "photograde=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
