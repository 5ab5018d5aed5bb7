//! Headless transition driver.
//!
//! Replays a JSON script of style updates through a `TransitionController`
//! and prints the sampled output style once per simulated frame:
//!
//! ```text
//! rune-tween demos/fade.json
//! {"frame":1,"state":"running","style":{"opacity":0.16}}
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rune_config::RuneConfig;
use rune_transition::{ControllerState, EngineOptions, Style, TransitionController};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct Script {
    /// Overrides the configured frame interval.
    #[serde(default)]
    frame_ms: Option<f32>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    style: Style,
    /// Frames to simulate after applying `style`.
    #[serde(default)]
    frames: u32,
}

#[derive(Debug, Serialize)]
struct Frame {
    frame: u64,
    state: ControllerState,
    style: Style,
}

fn load_script(path: &Path) -> Result<Script> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse script {}", path.display()))
}

fn script_path(config: &RuneConfig) -> Result<PathBuf> {
    if let Some(arg) = std::env::args_os().nth(1) {
        return Ok(PathBuf::from(arg));
    }
    match &config.demo.script {
        Some(path) => Ok(path.clone()),
        None => bail!("usage: rune-tween <SCRIPT> (or set RUNE_DEMO_SCRIPT / [demo] script)"),
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = RuneConfig::load();
    let path = script_path(&config)?;
    let script = load_script(&path)?;
    let frame_ms = script.frame_ms.unwrap_or(config.demo.frame_ms).max(0.0);
    log::info!(
        "replaying {} step(s) from {} at {frame_ms}ms per frame",
        script.steps.len(),
        path.display()
    );

    let mut controller = TransitionController::new(EngineOptions::from_config(&config));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frame = 0u64;

    for (index, step) in script.steps.iter().enumerate() {
        controller.apply(&step.style);
        log::debug!("step {index}: controller {}", controller.state());

        for _ in 0..step.frames {
            controller.tick(frame_ms);
            frame += 1;

            let line = Frame {
                frame,
                state: controller.state(),
                style: controller.output().sample(),
            };
            serde_json::to_writer(&mut out, &line).context("failed to write frame")?;
            writeln!(out).context("failed to write frame")?;
        }

        for event in controller.drain_events() {
            log::debug!("{event:?}");
        }
    }

    controller.teardown();
    out.flush().context("failed to flush output")?;
    Ok(())
}
