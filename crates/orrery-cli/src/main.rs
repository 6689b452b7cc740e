use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glam::DVec3;
use orrery_core::{normalized_distance, visual_radius, Catalog};
use orrery_engine::{
    CameraMode, FrameSnapshot, JsonLinesSink, Orrery, OrreryConfig, RenderSink, FOCUS_TIME_SCALE,
};
use orrery_sim::{summarize_validation, validate_range, SolarSystem};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orrery")]
#[command(about = "Animated solar system hierarchy with a focus camera")]
struct Cli {
    /// Body catalog (JSON); the built-in solar system if omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the bodies in the catalog
    Bodies {
        /// Print the catalog as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show every body's world position after a number of simulated days
    Positions {
        #[arg(short, long, default_value = "0")]
        days: f64,
    },

    /// Run the clock and report one body's position as time advances
    TimeSim {
        /// Simulated days per real second
        #[arg(long, default_value = "1")]
        scale: f64,
        /// Real seconds to simulate
        #[arg(long, default_value = "10")]
        duration: f64,
        /// Frames per real second
        #[arg(long, default_value = "60")]
        fps: f64,
        #[arg(long, default_value = "Earth")]
        body: String,
        /// Sleep between reports like a live display
        #[arg(long)]
        realtime: bool,
    },

    /// Replay a camera focus transition frame by frame
    ///
    /// Spinning bodies only lock when simulated time runs slowly; at 1 day/s
    /// the camera keeps chasing Jupiter without ever arriving.
    Focus {
        #[arg(short, long)]
        target: String,
        #[arg(long, default_value = "240")]
        frames: u64,
        /// Simulated days per real second [default: 0.01, slow enough to lock]
        #[arg(long)]
        scale: Option<f64>,
        /// Switch to this target part-way through
        #[arg(long)]
        retarget: Option<String>,
        /// Frame at which the retarget happens
        #[arg(long, default_value = "20")]
        retarget_at: u64,
        /// Print every Nth frame
        #[arg(long, default_value = "10")]
        every: u64,
        /// Emit JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check composed moon positions against a direct computation
    Validate {
        #[arg(long, default_value = "50")]
        samples: usize,
        /// Simulated days covered by the samples
        #[arg(long, default_value = "3650")]
        span: f64,
    },

    /// Drive the full frame loop headless
    ///
    /// With --focus the clock defaults to 0.01 days/s so spinning bodies can
    /// lock; pass --scale to override.
    Run {
        #[arg(long, default_value = "600")]
        frames: u64,
        #[arg(long, default_value = "60")]
        fps: f64,
        /// Focus on this body from the first frame
        #[arg(long)]
        focus: Option<String>,
        /// Simulated days per real second; the config's rate unless focusing
        #[arg(long)]
        scale: Option<f64>,
        /// Write every frame as a JSON line to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FocusRow<'a> {
    frame: u64,
    mode: CameraMode,
    target: Option<&'a str>,
    position: DVec3,
    pivot: DVec3,
    body_distance: Option<f64>,
}

/// Counts frames and remembers the last one
#[derive(Default)]
struct SummarySink {
    frames: u64,
    locked_frames: u64,
    last: Option<FrameSnapshot>,
}

impl RenderSink for SummarySink {
    fn present(&mut self, frame: &FrameSnapshot) -> orrery_engine::EngineResult<()> {
        self.frames += 1;
        if frame.camera.mode == CameraMode::Locked {
            self.locked_frames += 1;
        }
        self.last = Some(frame.clone());
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_ref())?;
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Bodies { json } => {
            if json {
                println!("{}", catalog.to_json_pretty()?);
                return Ok(());
            }

            println!(
                "{:<14} {:<7} {:<10} {:>12} {:>10} {:>10} {:>8} {:>6}  {}",
                "Body", "Kind", "Orbits", "Dist (Mkm)", "Period (d)", "Day (h)", "Radius", "Focus", "Label"
            );
            for body in catalog.iter() {
                println!(
                    "{:<14} {:<7} {:<10} {:>12.4} {:>10} {:>10.2} {:>8.3} {:>6}  {}",
                    body.name,
                    body.kind.name(),
                    body.orbits.as_deref().unwrap_or("-"),
                    body.distance,
                    body.period.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".into()),
                    body.day_length,
                    visual_radius(body.radius),
                    if catalog.is_traversable(&body.name) { "yes" } else { "no" },
                    body.label(),
                );
            }
        }

        Commands::Positions { days } => {
            let mut system = SolarSystem::with_layout(catalog, config.layout.clone());
            system.update(days);

            println!("World positions at day {:.3}:", days);
            println!(
                "{:<14} {:>12} {:>12} {:>12} {:>10} {:>10}",
                "Body", "X", "Y", "Z", "Dist", "Orbit"
            );
            for state in system.snapshot().bodies {
                let orbit = system
                    .catalog()
                    .get(&state.name)
                    .map(|b| normalized_distance(b.distance))
                    .unwrap_or(0.0);
                println!(
                    "{:<14} {:>12.4} {:>12.4} {:>12.4} {:>10.4} {:>10.4}",
                    state.name,
                    state.position.x,
                    state.position.y,
                    state.position.z,
                    state.position.length(),
                    orbit,
                );
            }
        }

        Commands::TimeSim { scale, duration, fps, body, realtime } => {
            if fps <= 0.0 {
                bail!("--fps must be positive, got {}", fps);
            }
            let mut orrery = Orrery::new(catalog, &config).context("Failed to build orrery")?;
            if orrery.system().body_position(&body).is_none() {
                bail!("Unknown body: {}", body);
            }
            orrery.set_time_scale(scale);

            let dt = 1.0 / fps;
            let frames = (duration * fps).round() as u64;
            let report_every = (fps.round() as u64).max(1);

            for frame in 1..=frames {
                orrery.step(dt);
                if frame % report_every != 0 && frame != frames {
                    continue;
                }

                let pos = orrery.system().body_position(&body).unwrap_or(DVec3::ZERO);
                println!(
                    "{}  day {:>10.3}: {} at ({:>8.3}, {:>8.3}, {:>8.3})",
                    orrery.clock().epoch(),
                    orrery.clock().days(),
                    body,
                    pos.x,
                    pos.y,
                    pos.z
                );

                if realtime {
                    std::thread::sleep(std::time::Duration::from_secs(1));
                }
            }
        }

        Commands::Focus { target, frames, scale, retarget, retarget_at, every, json } => {
            let mut orrery = Orrery::new(catalog, &config).context("Failed to build orrery")?;
            orrery.set_time_scale(scale.unwrap_or(FOCUS_TIME_SCALE));
            let outcome = orrery.set_focus_target(Some(&target));
            tracing::info!("Focus {} -> {:?}", target, outcome);

            let dt = 1.0 / 60.0;
            let every = every.max(1);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();

            if !json {
                writeln!(
                    out,
                    "{:>6} {:<14} {:<10} {:>10} {:>10} {:>10} {:>10}",
                    "Frame", "Mode", "Target", "Cam X", "Cam Y", "Cam Z", "Body dist"
                )?;
            }

            for frame in 1..=frames {
                if frame == retarget_at {
                    if let Some(next) = retarget.as_deref() {
                        let outcome = orrery.set_focus_target(Some(next));
                        tracing::info!("Retarget {} -> {:?} at frame {}", next, outcome, frame);
                    }
                }
                orrery.step(dt);

                if frame % every != 0 && frame != frames {
                    continue;
                }

                let pose = *orrery.pose();
                let target = orrery.camera().target();
                let row = FocusRow {
                    frame,
                    mode: orrery.mode(),
                    target,
                    position: pose.position,
                    pivot: pose.target,
                    body_distance: target
                        .and_then(|t| orrery.system().body_position(t))
                        .map(|p| p.distance(pose.position)),
                };

                if json {
                    serde_json::to_writer(&mut out, &row)?;
                    writeln!(out)?;
                } else {
                    writeln!(
                        out,
                        "{:>6} {:<14} {:<10} {:>10.4} {:>10.4} {:>10.4} {:>10}",
                        row.frame,
                        format!("{:?}", row.mode),
                        row.target.unwrap_or("-"),
                        row.position.x,
                        row.position.y,
                        row.position.z,
                        row.body_distance.map(|d| format!("{:.4}", d)).unwrap_or_else(|| "-".into()),
                    )?;
                }
            }
        }

        Commands::Validate { samples, span } => {
            let mut system = SolarSystem::with_layout(catalog, config.layout.clone());
            println!("Validating moon placement over {} days ({} samples)", span, samples);

            let results = validate_range(&mut system, span, samples);
            let summary = summarize_validation(&results);

            println!("\n{:<12} {:>10} {:>15} {:>15}", "Body", "Points", "Mean error", "Max error");
            for s in &summary {
                println!("{:<12} {:>10} {:>15.3e} {:>15.3e}", s.body, s.num_points, s.mean_error, s.max_error);
            }

            let worst = summary.iter().map(|s| s.max_error).fold(0.0, f64::max);
            if worst > 1e-6 {
                bail!("Composed positions drift from the direct computation by {:.3e}", worst);
            }
        }

        Commands::Run { frames, fps, focus, scale, json } => {
            if fps <= 0.0 {
                bail!("--fps must be positive, got {}", fps);
            }
            let mut orrery = Orrery::new(catalog, &config).context("Failed to build orrery")?;
            match (scale, focus.is_some()) {
                (Some(scale), _) => orrery.set_time_scale(scale),
                (None, true) => orrery.set_time_scale(FOCUS_TIME_SCALE),
                (None, false) => {}
            }
            if let Some(name) = focus.as_deref() {
                let outcome = orrery.set_focus_target(Some(name));
                tracing::info!("Focus {} -> {:?}", name, outcome);
            }

            let dt = 1.0 / fps;
            if json {
                let mut sink = JsonLinesSink::new(std::io::stdout().lock());
                for _ in 0..frames {
                    orrery.update(dt, &mut sink)?;
                }
                sink.into_inner().flush()?;
            } else {
                let mut sink = SummarySink::default();
                for _ in 0..frames {
                    orrery.update(dt, &mut sink)?;
                }

                println!("Frames rendered: {}", sink.frames);
                println!("Frames locked:   {}", sink.locked_frames);
                if let Some(last) = &sink.last {
                    println!("Simulated days:  {:.3}", last.days);
                    println!("Date:            {}", last.epoch);
                    println!("Camera mode:     {:?}", last.camera.mode);
                    println!("Focus:           {}", last.focus.label);
                    let p = last.camera.pose.position;
                    println!("Camera:          ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
                }
            }
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<OrreryConfig> {
    match path {
        Some(path) => OrreryConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(OrreryConfig::default()),
    }
}
