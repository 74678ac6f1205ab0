use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use charmviz::app::Visualizer;
use charmviz::assets::{HandleAllocator, IconDirectory};
use charmviz::bundle::BundleFile;
use charmviz::config::Config;
use charmviz::render::RecordingSubmitter;
use charmviz::rotation::Spin;

/// Force-directed 3D layout for application bundles.
#[derive(Parser)]
#[command(name = "charmviz")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the layout headless and export node positions as JSON
    Layout {
        /// Bundle file (.yaml)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Frames to simulate
        #[arg(short, long, default_value = "100")]
        frames: u64,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for initial placement
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Run the full pipeline against a recording backend and print the
    /// draw calls of every frame
    Render {
        /// Bundle file (.yaml)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Directory of `<charm>.svg` / `<charm>.png` icons
        #[arg(short, long)]
        icons: Option<PathBuf>,

        /// Frames to run
        #[arg(short, long, default_value = "1")]
        frames: u64,

        /// Seed for initial placement
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if seed.is_some() {
        config.simulation.seed = seed;
    }
    Ok(config)
}

async fn layout(
    config: Config,
    bundle: &Path,
    frames: u64,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let mut viz = Visualizer::new(config);
    viz.load_bundle(&BundleFile::new(bundle))
        .await
        .with_context(|| format!("failed to load bundle {}", bundle.display()))?;
    viz.load_icons(None, &mut HandleAllocator::new()).await?;

    // Nothing is drawn; the submitter only absorbs the frames
    let mut spin = Spin::from_config(&viz.config().render);
    let mut submitter = RecordingSubmitter::new();
    for _ in 0..frames {
        submitter.reset();
        viz.tick(&mut spin, &mut submitter)?;
    }

    let scene = viz.scene().context("visualizer has no scene")?;
    let json = serde_json::to_string_pretty(&scene.positions())?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), frames, "layout written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn render(
    config: Config,
    bundle: &Path,
    icons: Option<&Path>,
    frames: u64,
) -> anyhow::Result<()> {
    let mut viz = Visualizer::new(config);
    viz.load_bundle(&BundleFile::new(bundle))
        .await
        .with_context(|| format!("failed to load bundle {}", bundle.display()))?;

    let icons = icons.map(IconDirectory::new);
    let report = viz
        .load_icons(icons.as_ref(), &mut HandleAllocator::new())
        .await?;
    println!(
        "icons: {} loaded, {} missing, {} rejected",
        report.loaded, report.missing, report.rejected
    );

    let mut spin = Spin::from_config(&viz.config().render);
    let mut submitter = RecordingSubmitter::new();
    for _ in 0..frames {
        submitter.reset();
        let stats = viz.tick(&mut spin, &mut submitter)?;
        info!(
            frame = stats.frame,
            draw_calls = stats.render.draw_calls,
            "frame rendered"
        );
        println!("frame {}", stats.frame);
        print!("{}", submitter.summary());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Layout {
            bundle,
            frames,
            output,
            seed,
        } => {
            let config = load_config(cli.config.as_deref(), seed)?;
            layout(config, &bundle, frames, output.as_deref()).await?;
        }
        Commands::Render {
            bundle,
            icons,
            frames,
            seed,
        } => {
            let config = load_config(cli.config.as_deref(), seed)?;
            render(config, &bundle, icons.as_deref(), frames).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_layout_subcommand() {
        let cli = Cli::try_parse_from([
            "charmviz", "layout", "--bundle", "b.yaml", "--frames", "5", "--seed", "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Layout {
                bundle,
                frames,
                output,
                seed,
            } => {
                assert_eq!(bundle, PathBuf::from("b.yaml"));
                assert_eq!(frames, 5);
                assert!(output.is_none());
                assert_eq!(seed, Some(7));
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn cli_parses_render_subcommand_with_globals() {
        let cli = Cli::try_parse_from([
            "charmviz", "render", "--bundle", "b.yaml", "--icons", "icons", "--config", "c.yaml",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        assert!(cli.verbose);
        match cli.command {
            Commands::Render { icons, frames, .. } => {
                assert_eq!(icons, Some(PathBuf::from("icons")));
                assert_eq!(frames, 1);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["charmviz"]).is_err());
    }

    #[test]
    fn seed_flag_overrides_config() {
        let config = load_config(None, Some(5)).unwrap();
        assert_eq!(config.simulation.seed, Some(5));
        let config = load_config(None, None).unwrap();
        assert_eq!(config.simulation.seed, None);
    }
}
