use glam::Vec2;
use tracing_subscriber::EnvFilter;

use alpheratz_core::{DeferredColliders, FloorSpan, SpanWorld};
use alpheratz_player::{
    FrameDriver, InputSample, Player, PlayerConfig, PlayerEvent, ScriptedInput,
};

/// Fixed simulation step (60 Hz).
const DT: f32 = 1.0 / 60.0;
/// Tick at which the demo hazard hits the player.
const HURT_TICK: u64 = 150;
/// Tick at which the player lands on a hazard.
const STOMP_TICK: u64 = 330;

struct Args {
    ticks: u64,
    seed: Option<u64>,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: 480,
        seed: None,
        json: false,
    };
    for arg in std::env::args().skip(1) {
        if let Some(v) = arg.strip_prefix("--ticks=") {
            match v.parse() {
                Ok(n) => args.ticks = n,
                Err(_) => tracing::warn!("Ignoring invalid --ticks value {v:?}"),
            }
        } else if let Some(v) = arg.strip_prefix("--seed=") {
            args.seed = v.parse().ok();
        } else if arg == "--json" {
            args.json = true;
        } else {
            tracing::warn!("Unknown argument {arg:?}");
        }
    }
    args
}

/// Walk right, hop a gap, duck, take a hit, then stomp a hazard.
fn demo_script() -> ScriptedInput {
    ScriptedInput::new()
        .at(0, InputSample::walk(1.0))
        .at(40, InputSample::walk(1.0).with_jump(true))
        .at(60, InputSample::walk(1.0))
        .at(90, InputSample::idle())
        .at(100, InputSample::duck())
        .at(130, InputSample::idle())
        .at(260, InputSample::walk(-1.0))
        .at(300, InputSample::walk(-1.0).with_jump(true))
        .at(305, InputSample::walk(-1.0))
        .at(360, InputSample::idle())
}

fn demo_world() -> SpanWorld {
    SpanWorld::new(
        Vec2::ZERO,
        vec![
            FloorSpan::new(-200.0, 40.0, 0.0),
            FloorSpan::new(70.0, 400.0, 0.0),
            FloorSpan::new(120.0, 180.0, -30.0),
        ],
    )
    .with_fall_limit(600.0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args();
    let config = PlayerConfig::load();

    let mut player = match args.seed {
        Some(seed) => Player::with_seed(config, seed),
        None => Player::new(config),
    };
    player.subscribe(|event: &PlayerEvent| match event {
        PlayerEvent::StateChanged { from, to } => tracing::info!("{from} -> {to}"),
        other => tracing::info!(?other, "Player event"),
    });

    let mut driver = FrameDriver::new(player, demo_world(), demo_script(), DeferredColliders::new());

    for tick in 0..args.ticks {
        if tick == HURT_TICK && driver.hurt_default() {
            tracing::info!(tick, "Player hit");
        }
        if tick == STOMP_TICK {
            driver.hazard_defeated();
        }
        let report = driver.tick(DT);
        if args.json {
            match serde_json::to_string(&driver.player().snapshot()) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to encode snapshot: {e}"),
            }
        } else {
            tracing::debug!(
                tick = report.tick,
                state = %report.state,
                x = driver.motion().position().x,
                y = driver.motion().position().y,
                "Frame"
            );
        }
    }

    let snapshot = driver.player().snapshot();
    let position = driver.motion().position();
    tracing::info!(
        ticks = driver.ticks(),
        state = %snapshot.state,
        x = position.x,
        y = position.y,
        invincible = snapshot.invincible,
        "Simulation finished"
    );
    if !args.json {
        println!("{snapshot}");
    }
}
