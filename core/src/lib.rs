#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened during the frame. Presentation layers never touch simulation state
//! directly: they read [`Drawable`] snapshots and [`CameraParams`] instead.

pub mod config;

use std::time::Duration;

pub use config::{
    BotTuning, CameraTuning, ConfigError, GameConfig, KillFeedTuning, MapTuning, ParticleTuning,
    PlayerTuning, TimingTuning, WeaponTuning, ZoneTuning,
};
pub use glam::Vec3;

/// Vectors shorter than this are treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1.0e-4;

/// Facing used when the player fires without any movement intention.
pub const DEFAULT_FACING: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Normalises the vector, yielding [`Vec3::ZERO`] for near-zero input.
///
/// Callers must treat a zero result as "no movement" or substitute a default
/// facing of their own.
#[must_use]
pub fn direction_or_zero(vector: Vec3) -> Vec3 {
    let length = vector.length();
    if length.is_finite() && length > DIRECTION_EPSILON {
        vector / length
    } else {
        Vec3::ZERO
    }
}

/// Reports whether two circles on the ground plane overlap.
///
/// Only the `x` and `z` components participate; height is ignored.
#[must_use]
pub fn circles_overlap(a: Vec3, a_radius: f32, b: Vec3, b_radius: f32) -> bool {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    let reach = a_radius + b_radius;
    dx * dx + dz * dz < reach * reach
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the map, resets every combatant and spawns a fresh set of bots.
    InitRound,
    /// Selects the player's skin variant and re-applies its base stats.
    SelectSkin {
        /// Skin that should be worn from now on.
        skin: Skin,
    },
    /// Selects the weapon the player fires while the ultimate is inactive.
    EquipWeapon {
        /// Weapon to equip.
        weapon: WeaponType,
    },
    /// Delivers one frame of player input. Ignored unless the round is playing.
    Input {
        /// Raw input sampled by the adapter.
        frame: InputFrame,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new round began.
    RoundStarted {
        /// Number of bots that were spawned.
        bots: usize,
    },
    /// A fire request was issued.
    ShotFired {
        /// Weapon that was fired.
        weapon: WeaponType,
        /// Whether the player pulled the trigger.
        by_player: bool,
        /// Number of projectiles that obtained a pool slot.
        projectiles: usize,
    },
    /// The player started a dash.
    DashTriggered,
    /// The player activated the ultimate ability.
    UltimateTriggered,
    /// A bot projectile struck the player.
    PlayerHit {
        /// Damage applied before clamping.
        damage: f32,
    },
    /// A bot died from a player projectile.
    BotKilled {
        /// Identifier of the bot that died.
        bot: BotId,
        /// Whether the bot had been upgraded to boss mode.
        boss: bool,
    },
    /// Boss mode was applied to every surviving bot.
    BossModeActivated {
        /// Number of bots that were upgraded.
        bots: usize,
    },
    /// The round reached a terminal state.
    RoundEnded {
        /// Terminal state the round settled in.
        state: RoundState,
    },
}

/// One frame of player input as sampled by an adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Horizontal joystick axis, expected in `-1.0..=1.0`.
    pub axis_x: f32,
    /// Vertical joystick axis, expected in `-1.0..=1.0`.
    pub axis_y: f32,
    /// Whether the fire button is held.
    pub fire: bool,
    /// Whether the dash button was pressed.
    pub dash: bool,
    /// Whether the ultimate button was pressed.
    pub ultimate: bool,
}

impl InputFrame {
    /// Returns a copy with both axes clamped to `-1.0..=1.0`.
    ///
    /// Non-finite axes are treated as centred.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            axis_x: clamp_axis(self.axis_x),
            axis_y: clamp_axis(self.axis_y),
            ..self
        }
    }

    /// Movement intention on the ground plane derived from the axes.
    #[must_use]
    pub fn move_direction(&self) -> Vec3 {
        Vec3::new(self.axis_x, 0.0, self.axis_y)
    }
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Identifier of a bot, equal to the index of its pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BotId(u32);

impl BotId {
    /// Creates a new bot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Pool slot addressed by the identifier.
    #[must_use]
    pub const fn slot(&self) -> usize {
        self.0 as usize
    }
}

/// Non-owning reference to a combatant a bot may target.
///
/// The referenced combatant can die or be recycled between frames, so every
/// holder must re-validate it before use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetRef {
    /// The player.
    Player,
    /// Another bot.
    Bot(BotId),
}

/// Weapons available to combatants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeaponType {
    /// Single standard-speed projectile.
    #[default]
    Pistol,
    /// Three standard-speed pellets fanned around the aim direction.
    Shotgun,
    /// Single fast, heavy projectile fired while the ultimate is active.
    Beam,
}

impl WeaponType {
    /// Number of projectiles a single trigger pull requests.
    #[must_use]
    pub const fn projectile_count(self) -> usize {
        match self {
            Self::Pistol | Self::Beam => 1,
            Self::Shotgun => 3,
        }
    }
}

/// States of the per-bot decision machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BotState {
    /// Standing still with nothing to do.
    Idle,
    /// Wandering toward a random nearby destination.
    #[default]
    Roam,
    /// Closing in on a target outside attack range.
    Chase,
    /// Standing still and firing at a target inside attack range.
    Attack,
    /// Running directly away from the nearest threat.
    Flee,
}

/// Lifecycle of a single round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundState {
    /// The round is in progress.
    #[default]
    Playing,
    /// Every bot died while the player survived.
    Won,
    /// The player died.
    Lost,
}

impl RoundState {
    /// Reports whether the state only leaves through an explicit reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Player appearance variants, each altering exactly one base stat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Skin {
    /// Red variant with a 25% weapon damage bonus.
    #[default]
    Crimson,
    /// Purple variant with a 20% movement speed bonus.
    Violet,
    /// Blue variant with a one second dash cooldown.
    Azure,
    /// Gold variant with fifty extra hit points.
    Gold,
}

impl Skin {
    /// All skins in selection order.
    pub const ALL: [Skin; 4] = [Self::Crimson, Self::Violet, Self::Azure, Self::Gold];

    /// Resolves a skin from its zero-based selection index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Crimson),
            1 => Some(Self::Violet),
            2 => Some(Self::Azure),
            3 => Some(Self::Gold),
            _ => None,
        }
    }

    /// Zero-based selection index of the skin.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Crimson => 0,
            Self::Violet => 1,
            Self::Azure => 2,
            Self::Gold => 3,
        }
    }

    /// Body colour associated with the skin.
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Crimson => Rgb::new(1.0, 0.2, 0.2),
            Self::Violet => Rgb::new(0.5, 0.0, 0.5),
            Self::Azure => Rgb::new(0.2, 0.2, 1.0),
            Self::Gold => Rgb::new(1.0, 0.8, 0.0),
        }
    }
}

/// Linear RGB colour with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    /// Red channel.
    pub red: f32,
    /// Green channel.
    pub green: f32,
    /// Blue channel.
    pub blue: f32,
}

impl Rgb {
    /// Opaque white.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Creates a colour from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32) -> Self {
        Self { red, green, blue }
    }
}

/// Category of a drawable, letting renderers pick meshes or materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// Static wall block.
    Wall,
    /// Ultimate aura beneath the player.
    Aura,
    /// The player.
    Player,
    /// A bot, alive or dead.
    Bot,
    /// A projectile in flight.
    Bullet,
    /// A cosmetic particle.
    Particle,
}

/// World transform and appearance of one active object, ready for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drawable {
    /// What the object represents.
    pub kind: DrawableKind,
    /// World-space position of the object's centre.
    pub position: Vec3,
    /// Non-uniform scale applied to a unit cube.
    pub scale: Vec3,
    /// Base colour.
    pub color: Rgb,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

/// Camera parameters produced by every tick for the external renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraParams {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub focus: Vec3,
    /// Up vector.
    pub up: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 25.0, 18.0),
            focus: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// Static geometry that blocks movement.
pub trait Obstacles {
    /// Reports whether a square of side `2 * radius` centred at `position`
    /// overlaps any obstacle.
    fn collides(&self, position: Vec3, radius: f32) -> bool;
}

/// Converts a tick duration into simulation seconds.
#[must_use]
pub fn seconds(dt: Duration) -> f32 {
    dt.as_secs_f32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_vectors_normalise_to_zero() {
        assert_eq!(direction_or_zero(Vec3::new(0.00005, 0.0, 0.0)), Vec3::ZERO);
        assert_eq!(direction_or_zero(Vec3::new(f32::NAN, 0.0, 1.0)), Vec3::ZERO);

        let unit = direction_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((unit.length() - 1.0).abs() < 1.0e-6);
        assert!((unit.x - 0.6).abs() < 1.0e-6);
    }

    #[test]
    fn circle_overlap_ignores_height_and_is_strict() {
        let origin = Vec3::ZERO;
        assert!(circles_overlap(origin, 0.5, Vec3::new(1.0, 9.0, 0.0), 1.0));
        assert!(!circles_overlap(origin, 0.5, Vec3::new(1.5, 0.0, 0.0), 1.0));
    }

    #[test]
    fn input_axes_are_clamped() {
        let frame = InputFrame {
            axis_x: 3.0,
            axis_y: f32::NEG_INFINITY,
            fire: true,
            ..InputFrame::default()
        }
        .clamped();

        assert_eq!(frame.axis_x, 1.0);
        assert_eq!(frame.axis_y, 0.0);
        assert!(frame.fire);
    }

    #[test]
    fn skin_indices_round_trip() {
        for skin in Skin::ALL {
            assert_eq!(Skin::from_index(skin.index()), Some(skin));
        }
        assert_eq!(Skin::from_index(4), None);
    }

    #[test]
    fn shotgun_requests_three_projectiles() {
        assert_eq!(WeaponType::Shotgun.projectile_count(), 3);
        assert_eq!(WeaponType::Pistol.projectile_count(), 1);
        assert_eq!(WeaponType::Beam.projectile_count(), 1);
    }

    #[test]
    fn only_playing_is_non_terminal() {
        assert!(!RoundState::Playing.is_terminal());
        assert!(RoundState::Won.is_terminal());
        assert!(RoundState::Lost.is_terminal());
    }
}
