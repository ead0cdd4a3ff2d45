//! tree_morph: interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use tree_morph::{run, AppConfig};

#[derive(Debug, Parser)]
#[command(name = "tree_morph", about = "Gesture-driven chaos/formed ornament tree")]
struct Args {
    /// TOML config file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with gesture control off (Space and G still work).
    #[arg(long)]
    no_gesture: bool,

    /// Fixed layout seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tree_morph=info".parse()?)
                .add_directive("hand_gesture=info".parse()?)
                .add_directive("ornament_field=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None       => AppConfig::default(),
    }
    .with_env_overrides();
    if args.no_gesture {
        cfg.gesture.enabled = false;
    }
    if args.seed.is_some() {
        cfg.field.seed = args.seed;
    }
    cfg.validate()?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Tree Morph   open hand: chaos   fist/pinch: tree      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Hand source: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Hand source: keyboard simulation  (use --features leap for hardware)");
    println!();

    run(cfg)?;
    Ok(())
}
