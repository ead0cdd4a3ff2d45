//! field_sim: headless driver for the ornament field.
//!
//! Runs the engine for a fixed number of frames toward one mode and prints
//! how far the population has converged.

use clap::{Parser, ValueEnum};
use ornament_field::{Category, FieldConfig, FieldEngine, TimeBase, TransformBuffer, TreeMode};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Formed,
    Chaos,
}

impl From<ModeArg> for TreeMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Formed => TreeMode::Formed,
            ModeArg::Chaos  => TreeMode::Chaos,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "field_sim", about = "Headless ornament field simulation")]
struct Args {
    /// Frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Target mode for the whole run.
    #[arg(long, value_enum, default_value_t = ModeArg::Formed)]
    mode: ModeArg,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    #[arg(long)]
    seed: Option<u64>,

    /// Convert per-frame rates to frame-rate independent ones (60 Hz reference).
    #[arg(long)]
    per_second: bool,

    /// Print a progress line every N frames (0 disables).
    #[arg(long, default_value_t = 120)]
    report_every: u64,

    /// Distance counted as "arrived".
    #[arg(long, default_value_t = 0.05)]
    epsilon: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ornament_field=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mode = TreeMode::from(args.mode);

    let mut cfg = FieldConfig { seed: args.seed, ..FieldConfig::default() };
    if args.per_second {
        cfg.time_base = TimeBase::PerSecond { reference_hz: 60.0 };
    }
    let mut engine = FieldEngine::new(&cfg)?;
    let mut buffer = TransformBuffer::with_capacity(engine.population().len(), engine.foliage().len());

    println!();
    println!("  field_sim  {} frames → {}  (dt {:.4}s, {:?})", args.frames, mode.name(), args.dt, cfg.time_base);
    println!("  ──────────────────────────────────────────────────────────");

    for frame in 1..=args.frames {
        engine.tick(mode, args.dt);
        engine.write_buffer(&mut buffer);
        if args.report_every > 0 && frame % args.report_every == 0 {
            let stats = engine.stats();
            println!(
                "  frame {:>6}  t={:>7.2}s  progress {:>5.3}  arrived {:>5.1}%  frozen {}",
                frame,
                stats.elapsed,
                stats.progress,
                arrived_fraction(&engine, mode, args.epsilon) * 100.0,
                stats.frozen,
            );
        }
    }

    println!();
    println!("  {:<8} {:>6} {:>10} {:>10}", "category", "count", "mean dist", "arrived");
    for category in Category::ALL {
        let range = engine.population().range(category);
        if range.is_empty() {
            continue;
        }
        let (sum, hits) = range.clone().fold((0.0_f32, 0_usize), |(sum, hits), i| {
            let d = distance_to_destination(&engine, i, mode);
            (sum + d, hits + usize::from(d < args.epsilon))
        });
        println!(
            "  {:<8} {:>6} {:>10.4} {:>9.1}%",
            category.name(),
            range.len(),
            sum / range.len() as f32,
            hits as f32 / range.len() as f32 * 100.0,
        );
    }
    println!();
    Ok(())
}

/// Cascades chase a moving point while formed, so they are measured against
/// the cone surface height band rather than a fixed target.
fn distance_to_destination(engine: &FieldEngine, i: usize, mode: TreeMode) -> f32 {
    let inst = &engine.population().instances()[i];
    let live = &engine.population().live()[i];
    match mode {
        TreeMode::Chaos => live.position.distance(inst.chaos_position()),
        TreeMode::Formed if inst.flow_angle().is_some() => {
            let cone = engine.population().cone();
            let y    = live.position.y;
            if y >= cone.y_offset && y <= cone.top_y() { 0.0 } else { (y - y.clamp(cone.y_offset, cone.top_y())).abs() }
        }
        TreeMode::Formed => live.position.distance(inst.target_position()),
    }
}

fn arrived_fraction(engine: &FieldEngine, mode: TreeMode, epsilon: f32) -> f32 {
    let n = engine.population().len();
    if n == 0 {
        return 1.0;
    }
    let hits = (0..n).filter(|&i| distance_to_destination(engine, i, mode) < epsilon).count();
    hits as f32 / n as f32
}
