//! Headless ringworld driver.
//!
//! Loads `config.ron` (CLI flags override it), generates the ring, then flies a
//! scripted observer along the inner surface so proximity upgrades fire. The
//! config file is polled while running; edits regenerate the ring when
//! `ring.auto_update` is set.
//!
//! Run with `cargo run -p ringworld-app -- --segments 36 --duration 20`.

mod flight;

use std::path::Path;
use std::time::{Duration, Instant};

use clap::Parser;
use ringworld_config::{CliArgs, Config};
use ringworld_segments::{
    HeadlessScene, HostMode, LogProgress, RingLifecycleController, plan,
};
use ringworld_terrain::NoiseTerrainSampler;
use tracing::{error, info, warn};

use crate::flight::{FixedStep, RingFlight};

/// Seconds between polls of `config.ron`.
const RELOAD_INTERVAL: f64 = 2.0;

type Controller = RingLifecycleController<NoiseTerrainSampler, HeadlessScene>;

#[derive(Parser, Debug)]
#[command(name = "ringworld", about = "Ringworld segment generator")]
struct AppArgs {
    #[command(flatten)]
    ring: CliArgs,

    /// Seconds to fly the observer before exiting.
    #[arg(long, default_value_t = 30.0)]
    duration: f64,

    /// Observer speed along the ring, in meters per second.
    #[arg(long, default_value_t = 400.0)]
    speed: f64,

    /// Observer height above the ring floor, in meters.
    #[arg(long, default_value_t = 50.0)]
    altitude: f64,

    /// Skip real-time pacing and simulate as fast as possible.
    #[arg(long)]
    fast: bool,
}

fn sampler_for(config: &Config) -> Option<NoiseTerrainSampler> {
    match plan(&config.ring) {
        Ok(p) => Some(NoiseTerrainSampler::new(&config.terrain, p.circumference)),
        Err(e) => {
            error!("{e}");
            None
        }
    }
}

/// Poll the config file and push any change into the controller.
fn reload_config(controller: &mut Controller, file_config: &mut Config, dir: &Path, args: &CliArgs) {
    let fresh = match file_config.reload(dir) {
        Ok(Some(fresh)) => fresh,
        Ok(None) => return,
        Err(e) => {
            warn!("Config reload failed: {e}");
            return;
        }
    };
    *file_config = fresh.clone();

    let mut config = fresh;
    config.apply_cli_overrides(args);
    if let Err(e) = config.validated() {
        error!("Rejected config change: {e}");
        return;
    }
    let Some(sampler) = sampler_for(&config) else {
        return;
    };
    controller.replace_sampler(sampler);
    match controller.apply_config(config, HostMode::Editing) {
        Ok(Some(outcome)) => info!(
            created = outcome.created,
            "Regenerated {} segments after config change",
            outcome.created
        ),
        Ok(None) => info!("Config staged; it takes effect at the next generation"),
        Err(e) => error!("Rejected config change: {e}"),
    }
}

fn main() {
    let args = AppArgs::parse();

    let config_dir = args
        .ring
        .config
        .clone()
        .unwrap_or_else(ringworld_config::default_config_dir);

    let file_config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = file_config.clone();
    config.apply_cli_overrides(&args.ring);

    let log_dir = config_dir.join("logs");
    ringworld_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let Some(sampler) = sampler_for(&config) else {
        std::process::exit(1);
    };
    let generate_on_start = config.ring.generate_on_start;
    let radius = config.ring.radius_m;

    let mut controller = match RingLifecycleController::new(config, sampler, HeadlessScene::new()) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    if generate_on_start {
        let mut progress = LogProgress::every(10);
        match controller.generate_with_progress(&mut progress) {
            Ok(outcome) => info!(
                created = outcome.created,
                textures = outcome.textures_exported,
                "Ring ready: {} segments",
                outcome.created
            ),
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        }
    } else {
        info!("generate_on_start is off; flying over an empty ring");
    }

    run(&mut controller, file_config, &config_dir, &args, radius);
}

fn run(controller: &mut Controller, mut file_config: Config, dir: &Path, args: &AppArgs, radius: f64) {
    let mut flight = RingFlight::new(radius, args.altitude, args.speed);
    let mut stepper = FixedStep::new();
    let mut upgrades = 0usize;
    let mut next_reload = RELOAD_INTERVAL;
    let mut previous = Instant::now();

    info!(
        duration = args.duration,
        speed = args.speed,
        "Flying observer along the ring"
    );

    while stepper.total_sim_time() < args.duration {
        let frame_time = if args.fast {
            flight::FIXED_DT
        } else {
            std::thread::sleep(Duration::from_secs_f64(flight::FIXED_DT));
            let now = Instant::now();
            let elapsed = now.duration_since(previous).as_secs_f64();
            previous = now;
            elapsed
        };

        let mut reload_due = false;
        stepper.step(frame_time, |dt, sim_time| {
            flight.advance(dt);
            if let Some(upgrade) = controller.advance(dt, Some(flight.position())) {
                upgrades += 1;
                info!(
                    index = upgrade.index,
                    heading = flight.degrees(),
                    "Upgraded segment {} from LOD {} to {}",
                    upgrade.index,
                    upgrade.from_lod,
                    upgrade.to_lod
                );
            }
            if sim_time >= next_reload {
                next_reload += RELOAD_INTERVAL;
                reload_due = true;
            }
        });

        if reload_due {
            reload_config(controller, &mut file_config, dir, &args.ring);
        }
    }

    let scheduler = controller.scheduler();
    info!(
        upgrades,
        live = controller.registry().len(),
        ticks = scheduler.clock().ticks_run(),
        dropped = scheduler.clock().ticks_dropped(),
        bytes = controller.registry().geometry_bytes(),
        "Flight finished after {:.1}s",
        stepper.total_sim_time()
    );
}
