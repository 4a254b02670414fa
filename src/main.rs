use std::{env, fs};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use snake_land::error::{Error, ErrorConversion, Result};
use snake_land::snake::{self, InitialLength};
use snake_land::snake_control::Template;
use snake_land::terrain::{Hills, Terrain};
use snake_land::{GrowthEvent, Herd, Point, Seconds, Tuning};

const DT: Seconds = 1. / 60.;
const TICKS: usize = 60 * 60;
const SUMMARY_EVERY: usize = 60 * 10;
const NUM_WANDERERS: usize = 6;
const NUM_PICKUPS: usize = 40;
const WORLD_RADIUS: f32 = 40.;
const PICKUP_REACH: f32 = 1.5;
/// Snakes further out than this have escaped the bounds push and start over
const ESCAPE_RADIUS: f32 = 2. * WORLD_RADIUS;

fn load_tuning(path: Option<String>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = fs::read_to_string(&path)
        .map_err(Error::from)
        .with_trace_step(format!("read {path}"))?;
    let tuning: Tuning = serde_json::from_str(&json)
        .map_err(Error::from)
        .with_trace_step(format!("parse {path}"))?;
    tuning
        .validate()
        .map_err(Error::from)
        .with_trace_step("validate tuning")?;
    Ok(tuning)
}

fn random_ground_point(rng: &mut impl Rng) -> Point {
    let angle = rng.gen_range(0. ..std::f32::consts::TAU);
    let radius = WORLD_RADIUS * rng.gen::<f32>().sqrt();
    Point::X.rotate_around(Point::UP, angle) * radius
}

fn spawn_herd(tuning: &Tuning, terrain: &impl Terrain, rng: &mut StdRng) -> Result<Herd> {
    let mut herd = Herd::new();

    for i in 0..NUM_WANDERERS {
        let seed = rng.gen();
        let builder = snake::Builder::default()
            .pos(random_ground_point(rng))
            .len(InitialLength::Uniform { min: 4, max: 16 })
            .tuning(tuning.clone())
            .controller(Template::Wander {
                seed,
                erraticness: 20.,
                bounds_radius: Some(WORLD_RADIUS),
            });
        herd.spawn(builder, terrain, rng)
            .with_trace_step(format!("spawn wanderer {i}"))?;
    }

    let builder = snake::Builder::default()
        .pos(Point::ZERO)
        .facing(Point::X)
        .len(InitialLength::Fixed(10))
        .tuning(tuning.clone())
        .controller(Template::demo_polygon_pattern(Point::X, 6, 90));
    herd.spawn(builder, terrain, rng)
        .with_trace_step("spawn patrol")?;

    Ok(herd)
}

fn run() -> Result {
    let tuning = load_tuning(env::args().nth(1)).with_trace_step("load_tuning")?;
    let terrain = Hills { amplitude: 1.5, wavelength: 30. };
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut herd = spawn_herd(&tuning, &terrain, &mut rng).with_trace_step("run")?;
    let mut pickups = (0..NUM_PICKUPS)
        .map(|_| random_ground_point(&mut rng))
        .collect::<Vec<_>>();

    for tick in 1..=TICKS {
        herd.tick(DT, &terrain);

        for snake in herd.iter_mut() {
            if snake.head_position().flattened().magnitude() > ESCAPE_RADIUS {
                warn!(snake = %snake.id(), "escaped, restarting at the origin");
                let facing = -snake.facing();
                snake.restart(Point::ZERO, facing, &terrain);
            }
        }

        // a pickup is eaten by the closest head within reach and respawns elsewhere
        for pickup in &mut pickups {
            let Some((id, distance)) = herd.closest_head(*pickup) else {
                continue;
            };
            if distance < PICKUP_REACH {
                herd.apply(id, GrowthEvent::AddLength(1));
                *pickup = random_ground_point(&mut rng);
            }
        }

        if tick % SUMMARY_EVERY == 0 {
            info!(seconds = tick as f32 * DT, "tick");
            herd.log_summary();
        }
    }

    for snake in herd.iter() {
        info!(
            snake = %snake.id(),
            active_len = snake.active_len(),
            target_len = snake.target_len(),
            scale = snake.scale(),
            "final"
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        warn!("{}", err);
        std::process::exit(1);
    }
}
