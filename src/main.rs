use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

#[derive(Parser)]
#[command(name = "sideby", version, about = "Combine pairs of portrait photos into landscape images for a photo frame")]
struct Cli {
    /// Directories containing JPEG images
    #[arg(required_unless_present = "file_list")]
    inputs: Vec<PathBuf>,

    /// Text file listing one image path per line
    #[arg(long)]
    file_list: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Frame width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Width of the black bar between the two photos
    #[arg(long, default_value_t = 0)]
    bar: u32,

    /// Regenerate composites that already exist
    #[arg(long)]
    overwrite: bool,

    /// Delete existing sideby-*.jpg files in the output directory first
    #[arg(long)]
    delete: bool,

    /// Pair photos in random order instead of by date
    #[arg(long)]
    shuffle: bool,

    /// Search input directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Remove composites that were not produced by this run
    #[arg(long)]
    mirror: bool,

    /// Log every skipped file and date fallback
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let options = sideby_core::ProcessOptions {
        inputs: cli.inputs,
        file_list: cli.file_list,
        output: cli.output,
        frame_width: cli.width,
        frame_height: cli.height,
        middle_bar_width: cli.bar,
        overwrite_existing: cli.overwrite,
        delete_existing: cli.delete,
        randomise_sorting: cli.shuffle,
        recursive: cli.recursive,
        mirror_mode: cli.mirror,
    };

    let pb = if cli.verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}")?);

    let result = sideby_core::process(&options, &|stage, current, total, message| {
        pb.set_length(total);
        pb.set_position(current + 1);
        pb.set_message(format!("{}: {}", stage, message));
    });
    pb.finish_and_clear();
    let result = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    eprintln!(
        "Done! {} composites generated, {} skipped ({} existing, {} failed, {} duplicates, {} unpaired) from {} images ({:.2}s)",
        result.generated,
        result.skipped(),
        result.skipped_existing,
        result.failed,
        result.duplicates_skipped,
        result.unpaired,
        result.images_found,
        t_total.elapsed().as_secs_f64()
    );
    if result.cleaned > 0 || result.mirrored > 0 || result.delete_failed > 0 {
        eprintln!(
            "Removed {} old and {} stale composites ({} could not be deleted)",
            result.cleaned, result.mirrored, result.delete_failed
        );
    }

    Ok(())
}
