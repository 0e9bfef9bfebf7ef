use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gridmerge_core::{MergeSet, OUTPUT_FILENAME};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "gridmerge",
    about = "Merge Space Engineers script fragments into one code-editor file"
)]
struct Cli {
    /// Folder containing the .cs fragment files
    #[arg(default_value = ".")]
    folder: PathBuf,

    /// Output file path (defaults to the reserved name inside the folder)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit the deduplicated using directives and type aliases
    #[arg(long)]
    emit_usings: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    tracing::info!(folder = %cli.folder.display(), "merging script fragments");

    let merge_set = MergeSet::build(&cli.folder)
        .with_context(|| format!("merging fragments in {}", cli.folder.display()))?;

    let output = cli
        .output
        .unwrap_or_else(|| cli.folder.join(OUTPUT_FILENAME));
    merge_set
        .write(&output, cli.emit_usings)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "Merged {} fragments into {}",
        merge_set.fragments().len(),
        output.display()
    );

    Ok(())
}

/// Logs go to stderr so the merged program path on stdout stays clean.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
