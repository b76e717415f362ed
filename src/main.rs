mod automation;
mod capture;
mod config;
mod error;
mod matching;
mod scanner;
mod shell;
mod targets;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use automation::{EnigoPointer, MouseButton};
use capture::XcapScreen;
use config::{load_icon_groups, load_settings};
use scanner::{ScanMode, Scanner};
use shell::Shell;

#[derive(Parser)]
#[command(name = "icon-clicker")]
#[command(about = "Finds reference icons in a screen region and clicks them")]
#[command(version)]
struct Cli {
    /// Scan settings (region, tolerance, strides, timing)
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Icon groups to search for
    #[arg(long, default_value = "icons.json")]
    icons: PathBuf,

    /// Where `save` writes new icons
    #[arg(long, default_value = "icons")]
    icons_dir: PathBuf,

    /// Mouse button to click with, overriding the settings file
    #[arg(long, value_parser = parse_button)]
    button: Option<MouseButton>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start scanning right away instead of opening the prompt
    Scan {
        /// Icon group name from the icons file
        group: String,

        /// Capture and click for every icon in turn instead of stopping at
        /// the first one found
        #[arg(long)]
        per_target: bool,
    },
}

fn parse_button(name: &str) -> Result<MouseButton, String> {
    Ok(MouseButton::from_name(name))
}

fn scan_mode(per_target: bool) -> ScanMode {
    if per_target {
        ScanMode::PerTarget
    } else {
        ScanMode::SingleHit
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.settings)?;
    if let Some(button) = cli.button {
        settings.button = button;
    }
    log::debug!("Scan settings: {:?}", settings);

    let pointer = EnigoPointer::new().context("cannot open the input backend")?;
    let screen = XcapScreen::new();

    match cli.command {
        None => {
            let stdin = io::stdin();
            Shell::new(settings, cli.icons, cli.icons_dir, screen, pointer, io::stdout())
                .run(stdin.lock())
        }
        Some(Commands::Scan { group, per_target }) => {
            let mode = scan_mode(per_target);
            let groups = load_icon_groups(&cli.icons)?;
            let targets = targets::load_targets(&groups, &group);
            if targets.is_empty() {
                bail!("no usable icons for '{}' in {}", group, cli.icons.display());
            }
            Scanner::new(&settings, &targets, mode, screen, pointer)
                .run()
                .with_context(|| format!("'{group}' scan stopped"))
        }
    }
}
