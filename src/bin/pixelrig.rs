use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use pixelrig::{CompileLayout, FailurePolicy, LayoutConfig, LayoutSources};

/// Compile a vehicle's LED skeleton into fixture placements and output maps.
#[derive(Parser, Debug)]
#[command(name = "pixelrig", version)]
struct Cli {
    /// Directory holding vertexes.txt, edges.txt, panels.txt and
    /// striping-instructions.txt.
    #[arg(long)]
    resources: PathBuf,

    /// Layout constants as JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the layout JSON. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Leave out fixtures that fail to compile instead of aborting.
    #[arg(long)]
    skip_invalid: bool,
}

fn main() -> anyhow::Result<()> {
    // Default: WARN for everything, INFO for pixelrig.
    // Override with RUST_LOG env var (e.g. RUST_LOG=pixelrig=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("pixelrig=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let text = read(path)?;
            LayoutConfig::from_json_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if cli.skip_invalid {
        config.failure_policy = FailurePolicy::SkipAndReport;
    }

    let sources = LayoutSources {
        vertices: read(&cli.resources.join("vertexes.txt"))?,
        edges: read(&cli.resources.join("edges.txt"))?,
        panels: read(&cli.resources.join("panels.txt"))?,
        stripes: read(&cli.resources.join("striping-instructions.txt"))?,
    };

    let layout = CompileLayout::new(&sources, &config)
        .execute()
        .context("compile layout")?;
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;

    match &cli.output {
        Some(path) => fs::write(path, json).with_context(|| format!("write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("write stdout")?;
        }
    }
    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
