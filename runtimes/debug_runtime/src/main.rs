// Debug Runtime - headless locomotion harness for testing and automation
//
// Drives the teleport locomotion manager through a canned controller
// script without a window or headset attached, and emits a JSON trace of
// the rig state so scripts (or people) can inspect exactly what the state
// machine did frame by frame.

use std::cell::Cell;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use engine::profile;
use serde::Serialize;
use tracing::info;

use dinovr::scenes::PlaygroundBuilder;
use dinovr::{
    FadeEffect, LocomotionCallbacks, LocomotionConfig, LocomotionEffect, SlideEffect, SnapEffect,
    TeleportState, Time,
};

mod script;

#[derive(Parser)]
#[command(name = "debug_runtime")]
#[command(about = "Headless locomotion harness for testing and automation")]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value = "450")]
    frames: u32,

    /// Simulated frame rate in Hz
    #[arg(long, default_value = "90.0")]
    fps: f32,

    /// Transition effect: snap, slide, or fade
    #[arg(short, long, default_value = "fade")]
    effect: String,

    /// Optional locomotion config overrides (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit one JSON trace line per frame instead of just the summary
    #[arg(long)]
    trace: bool,
}

#[derive(Serialize)]
struct TraceFrame {
    frame: u32,
    time: f32,
    state: &'static str,
    rig: [f32; 3],
    yaw: f32,
    guide_valid: bool,
    fade_opacity: f32,
}

#[derive(Serialize)]
struct RunSummary {
    frames: u32,
    teleports: u32,
    final_rig: [f32; 3],
    final_yaw: f32,
}

fn parse_effect(name: &str) -> anyhow::Result<Box<dyn LocomotionEffect>> {
    match name {
        "snap" => Ok(Box::new(SnapEffect)),
        "slide" => Ok(Box::<SlideEffect>::default()),
        "fade" => Ok(Box::<FadeEffect>::default()),
        other => bail!("unknown transition effect: {}", other),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LocomotionConfig> {
    match path {
        Some(path) => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        None => Ok(LocomotionConfig::default()),
    }
}

fn state_name(state: TeleportState) -> &'static str {
    match state {
        TeleportState::Idle => "idle",
        TeleportState::Selecting => "selecting",
        TeleportState::Transitioning => "transitioning",
    }
}

fn main() -> anyhow::Result<()> {
    engine::logging::init_logging("DINOVR_LOG");

    let args = Args::parse();
    if args.fps <= 0.0 {
        bail!("fps must be positive");
    }

    let config = load_config(args.config.as_ref())?;
    let effect = parse_effect(&args.effect)?;

    // A platform smaller than the pen, so the scripted long-range aim has
    // something to overshoot.
    let mut scene = PlaygroundBuilder::new()
        .with_config(config)
        .with_floor(6.0, 0.0)
        .build(effect);

    info!(
        "simulating {} frames at {} Hz with the {} effect",
        args.frames, args.fps, args.effect
    );

    let teleports = Rc::new(Cell::new(0u32));
    let counter = teleports.clone();
    scene.manager.set_callbacks(LocomotionCallbacks {
        on_end_transition: Some(Box::new(move || counter.set(counter.get() + 1))),
        ..LocomotionCallbacks::default()
    });

    let delta = Duration::from_secs_f32(1.0 / args.fps);
    let mut time = Time::default();

    profile!("simulation", {
        for frame in 0..args.frames {
            time = time.step(delta);
            let input = script::input_for_time(time.total_seconds());
            scene.manager.update(&time, &input, &mut scene.rig);

            if args.trace {
                let row = TraceFrame {
                    frame,
                    time: time.total_seconds(),
                    state: state_name(scene.manager.state()),
                    rig: scene.rig.position.into(),
                    yaw: scene.rig.yaw.0,
                    guide_valid: scene.manager.guide().is_valid(),
                    fade_opacity: scene.rig.fade_opacity,
                };
                println!("{}", serde_json::to_string(&row)?);
            }
        }
    });

    let summary = RunSummary {
        frames: args.frames,
        teleports: teleports.get(),
        final_rig: scene.rig.position.into(),
        final_yaw: scene.rig.yaw.0,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
