#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless arena round.

mod autopilot;
mod headless;
mod telemetry;

use std::{cell::RefCell, fmt, fs, path::PathBuf, rc::Rc, time::Duration};

use anyhow::{bail, Context, Result as AnyResult};
use arena_core::{Command, Event, GameConfig, RoundState, Skin, WeaponType};
use arena_rendering::{Color, Hud, Presentation, RenderingBackend, Scene, Viewport};
use arena_world::{self as world, query, World};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use crate::headless::HeadlessBackend;

const CLEAR_COLOR: Color = Color::new(0.05, 0.05, 0.08, 1.0);

/// Runs one arena round with an autopilot in place of a human player.
#[derive(Debug, Parser)]
#[command(name = "arena", version, about)]
struct Args {
    /// Seed for the simulation's random generator; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    /// Frame delta in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Player skin index (0 crimson, 1 violet, 2 azure, 3 gold).
    #[arg(long)]
    skin: Option<u8>,
    /// Weapon equipped at the start of the round.
    #[arg(long, value_enum, default_value_t = WeaponArg::Pistol)]
    weapon: WeaponArg,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WeaponArg {
    Pistol,
    Shotgun,
    Beam,
}

impl From<WeaponArg> for WeaponType {
    fn from(weapon: WeaponArg) -> Self {
        match weapon {
            WeaponArg::Pistol => WeaponType::Pistol,
            WeaponArg::Shotgun => WeaponType::Shotgun,
            WeaponArg::Beam => WeaponType::Beam,
        }
    }
}

/// Final numbers printed once the round stops.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct RoundSummary {
    frames: u64,
    state: RoundState,
    hp: f32,
    kills: u32,
    bots_alive: usize,
}

impl RoundSummary {
    fn capture(world: &World, frames: u64) -> Self {
        Self {
            frames,
            state: query::round_state(world),
            hp: query::player_hp(world),
            kills: query::player_kills(world),
            bots_alive: query::bots_alive(world),
        }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RoundState::Playing => "PLAYING",
            RoundState::Won => "WON",
            RoundState::Lost => "LOST",
        };
        writeln!(f, "state:      {state}")?;
        writeln!(f, "hp:         {:.1}", self.hp)?;
        writeln!(f, "kills:      {}", self.kills)?;
        writeln!(f, "bots alive: {}", self.bots_alive)?;
        write!(f, "frames:     {}", self.frames)
    }
}

/// Entry point for the arena command-line interface.
fn main() -> AnyResult<()> {
    let args = Args::parse();
    telemetry::init(&args.log_level);

    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    let skin = match args.skin {
        Some(index) => match Skin::from_index(index) {
            Some(skin) => Some(skin),
            None => bail!("skin index {index} is out of range (expected 0-3)"),
        },
        None => None,
    };

    info!(seed = config.rng_seed, frames = args.frames, "starting headless round");
    let mut world = World::with_config(config);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::EquipWeapon {
            weapon: args.weapon.into(),
        },
        &mut events,
    );
    if let Some(skin) = skin {
        world::apply(&mut world, Command::SelectSkin { skin }, &mut events);
        world::apply(&mut world, Command::InitRound, &mut events);
    }
    log_events(&mut events);

    let summary = Rc::new(RefCell::new(RoundSummary::capture(&world, 0)));
    let mut scene = Scene::default();
    refresh_scene(&world, &mut scene);
    let presentation = Presentation::new("Arena", CLEAR_COLOR, Viewport::default(), scene);

    let backend = HeadlessBackend::new(args.frames, Duration::from_millis(args.dt_ms));
    let sink = Rc::clone(&summary);
    let mut frames = 0;
    // No input device is attached; the autopilot drives every frame.
    backend.run(presentation, move |dt, _device, scene| {
        let input = autopilot::steer(&world);
        world::apply(
            &mut world,
            Command::Input {
                frame: input.to_input_frame(),
            },
            &mut events,
        );
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        log_events(&mut events);

        frames += 1;
        refresh_scene(&world, scene);
        *sink.borrow_mut() = RoundSummary::capture(&world, frames);
        !query::round_state(&world).is_terminal()
    })?;

    let summary = *summary.borrow();
    println!("{summary}");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> AnyResult<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GameConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn refresh_scene(world: &World, scene: &mut Scene) {
    query::drawables(world, &mut scene.drawables);
    scene.camera = query::camera(world);
    let kill_feed = query::kill_feed(world);
    scene.hud = Hud {
        hp: query::player_hp(world),
        bots_alive: query::bots_alive(world),
        ultimate_progress: query::ultimate_progress(world),
        ultimate_active: query::ultimate_active(world),
        kill_feed_alpha: kill_feed.is_active().then(|| kill_feed.alpha()),
        round: query::round_state(world),
    };
}

fn log_events(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        debug!(?event, "world event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::try_parse_from(["arena"]).expect("defaults parse");
        assert_eq!(args.frames, 3_600);
        assert_eq!(args.dt_ms, 16);
        assert_eq!(args.weapon, WeaponArg::Pistol);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn arguments_accept_every_flag() {
        let args = Args::try_parse_from([
            "arena",
            "--seed",
            "9",
            "--frames",
            "10",
            "--dt-ms",
            "33",
            "--skin",
            "3",
            "--weapon",
            "shotgun",
            "--log-level",
            "debug",
        ])
        .expect("flags parse");
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.skin, Some(3));
        assert_eq!(WeaponType::from(args.weapon), WeaponType::Shotgun);
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn missing_config_file_is_reported() {
        let path = PathBuf::from("/definitely/not/here.toml");
        let error = load_config(Some(&path)).expect_err("missing file");
        assert!(error.to_string().contains("failed to read config"));
    }

    #[test]
    fn scene_mirrors_the_world() {
        let world = World::with_seed(5);
        let mut scene = Scene::default();
        refresh_scene(&world, &mut scene);

        assert_eq!(scene.hud.hp, 100.0);
        assert_eq!(scene.hud.bots_alive, query::bots_alive(&world));
        assert_eq!(scene.hud.kill_feed_alpha, None);
        assert_eq!(scene.camera, query::camera(&world));
        assert!(!scene.drawables.is_empty());
    }
}
