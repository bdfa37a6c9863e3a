/// Encore - interactive playlist player
use clap::Parser;
use encore_playback::FileTrackLoader;
use encore_shell::{build_player, Shell, ShellConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Play text tracks from an interactive shell", long_about = None)]
struct Cli {
    /// Configuration file path (default: encore.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Track files to add to the playlist
    tracks: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ShellConfig::load(cli.config.as_deref())?;

    // Initialize tracing (stderr, so it does not mix with track output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let player = build_player(&config, &cli.tracks)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    Shell::new(&player, &FileTrackLoader).run(stdin.lock(), &mut stdout)?;

    Ok(())
}
