//! Tuning surface for every adjustable constant of the simulation.
//!
//! Each section implements [`Default`] with the reference values and
//! deserialises with `#[serde(default)]`, so a TOML file only needs to name the
//! knobs it overrides.

use serde::Deserialize;
use thiserror::Error;

use crate::WeaponType;

/// Aggregated tuning knobs for a round.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the single generator behind every random decision.
    pub rng_seed: u64,
    /// Map generation and collision parameters.
    pub map: MapTuning,
    /// Player base stats and ability timings.
    pub player: PlayerTuning,
    /// Bot pool, stats and decision thresholds.
    pub bots: BotTuning,
    /// Projectile pool, speeds and damage table.
    pub weapons: WeaponTuning,
    /// Shrinking safe-zone parameters.
    pub zone: ZoneTuning,
    /// Delta-time clamping and slow motion.
    pub timing: TimingTuning,
    /// Cosmetic particle pool.
    pub particles: ParticleTuning,
    /// Kill-feed notification timing.
    pub kill_feed: KillFeedTuning,
    /// Camera placement and shake strengths.
    pub camera: CameraTuning,
}

impl GameConfig {
    /// Parses a configuration from TOML, filling omitted knobs with defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the simulation cannot operate with at all.
    ///
    /// Capacity mismatches are accepted on purpose: a pool smaller than its
    /// spawn demand silently under-delivers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.size < 6 {
            return Err(ConfigError::Invalid {
                field: "map.size",
                reason: "the map needs at least six cells per side",
            });
        }
        if !(self.map.cell_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "map.cell_size",
                reason: "cells must have a positive size",
            });
        }
        if !(self.timing.min_dt > 0.0) || self.timing.min_dt > self.timing.max_dt {
            return Err(ConfigError::Invalid {
                field: "timing.min_dt",
                reason: "the delta-time clamp must satisfy 0 < min_dt <= max_dt",
            });
        }
        if self.bots.fire_interval_min > self.bots.fire_interval_max {
            return Err(ConfigError::Invalid {
                field: "bots.fire_interval_min",
                reason: "the randomised fire interval range is inverted",
            });
        }
        if !(self.bots.spawn_extent > 0.0) {
            return Err(ConfigError::Invalid {
                field: "bots.spawn_extent",
                reason: "bots need a positive spawn area",
            });
        }
        Ok(())
    }
}

/// Errors raised while loading a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The source was not valid TOML for the configuration schema.
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but cannot drive the simulation.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending knob.
        field: &'static str,
        /// Human readable explanation.
        reason: &'static str,
    },
}

/// Map generation and collision parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapTuning {
    /// Number of cells along each side of the square grid.
    pub size: u32,
    /// Side length of one cell in world units.
    pub cell_size: f32,
    /// Number of random 2x2 blocks placed per round.
    pub wall_blocks: u32,
    /// Half-width, in cells, of the square around the centre kept free of blocks.
    pub spawn_clearing: u32,
    /// Squared distance from the player beyond which walls are not emitted for drawing.
    pub cull_distance_sq: f32,
}

impl Default for MapTuning {
    fn default() -> Self {
        Self {
            size: 50,
            cell_size: 4.0,
            wall_blocks: 40,
            spawn_clearing: 2,
            cull_distance_sq: 2_500.0,
        }
    }
}

/// Player base stats and ability timings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Maximum hit points before skin bonuses.
    pub base_hp: f32,
    /// Movement speed in units per second before skin bonuses.
    pub base_speed: f32,
    /// Movement speed while dashing.
    pub dash_speed: f32,
    /// Weapon damage stat before skin bonuses.
    pub base_damage: f32,
    /// Length of a dash in seconds.
    pub dash_duration: f32,
    /// Seconds between dashes before skin bonuses.
    pub dash_cooldown: f32,
    /// Length of the ultimate in seconds.
    pub ultimate_duration: f32,
    /// Seconds between ultimates, counted after the ultimate ends.
    pub ultimate_cooldown: f32,
    /// Hit points restored when the ultimate activates.
    pub ultimate_heal: f32,
    /// Collision radius.
    pub radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_hp: 100.0,
            base_speed: 8.0,
            dash_speed: 25.0,
            base_damage: 15.0,
            dash_duration: 0.2,
            dash_cooldown: 2.0,
            ultimate_duration: 5.0,
            ultimate_cooldown: 20.0,
            ultimate_heal: 30.0,
            radius: 1.0,
        }
    }
}

/// Bot pool, stats and decision thresholds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotTuning {
    /// Fixed number of bot slots.
    pub pool_capacity: usize,
    /// Bots requested per round; silently capped by the pool.
    pub spawn_count: usize,
    /// Maximum hit points.
    pub hp: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Collision radius of a normal bot.
    pub radius: f32,
    /// Collision radius of a boss.
    pub boss_radius: f32,
    /// Distance within which bots notice other combatants.
    pub awareness_radius: f32,
    /// Distance within which bots stop and shoot.
    pub attack_range: f32,
    /// Fraction of max hit points below which bots flee.
    pub flee_fraction: f32,
    /// Seconds between roam destination picks.
    pub roam_interval: f32,
    /// Distance of each roam destination.
    pub roam_distance: f32,
    /// Alive count at or below which the survivors become bosses.
    pub boss_threshold: usize,
    /// Fire interval stat; bosses fire at this interval after scaling.
    pub fire_interval: f32,
    /// Lower bound of the randomised interval used by normal bots.
    pub fire_interval_min: f32,
    /// Upper bound of the randomised interval used by normal bots.
    pub fire_interval_max: f32,
    /// Half-width of the square bots spawn in.
    pub spawn_extent: f32,
    /// Bots never spawn with both coordinates closer than this to the centre.
    pub spawn_exclusion: f32,
    /// Placement attempts before the last candidate is accepted.
    pub spawn_attempts: u32,
}

impl Default for BotTuning {
    fn default() -> Self {
        Self {
            pool_capacity: 40,
            spawn_count: 30,
            hp: 100.0,
            speed: 7.0,
            radius: 1.0,
            boss_radius: 1.5,
            awareness_radius: 25.0,
            attack_range: 8.0,
            flee_fraction: 0.3,
            roam_interval: 3.0,
            roam_distance: 10.0,
            boss_threshold: 3,
            fire_interval: 0.5,
            fire_interval_min: 1.0,
            fire_interval_max: 2.0,
            spawn_extent: 50.0,
            spawn_exclusion: 5.0,
            spawn_attempts: 10,
        }
    }
}

/// Projectile pool, speeds and damage table.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Fixed number of projectile slots.
    pub pool_capacity: usize,
    /// Seconds a projectile stays in flight.
    pub lifetime: f32,
    /// Speed of pistol and shotgun projectiles.
    pub standard_speed: f32,
    /// Speed of beam projectiles.
    pub beam_speed: f32,
    /// Lateral blend applied to the two outer shotgun pellets.
    pub shotgun_spread: f32,
    /// Forward blend applied to the two outer shotgun pellets.
    pub shotgun_forward: f32,
    /// Collision radius of a projectile.
    pub bullet_radius: f32,
    /// Damage of a pistol hit on a bot.
    pub pistol_damage: f32,
    /// Damage of a shotgun pellet hit on a bot.
    pub shotgun_damage: f32,
    /// Damage of a beam hit on a bot.
    pub beam_damage: f32,
    /// Multiplier on player hits while the ultimate is active.
    pub ultimate_multiplier: f32,
    /// Damage of any bot projectile hitting the player.
    pub enemy_hit_damage: f32,
    /// Player refire delay for the pistol.
    pub pistol_interval: f32,
    /// Player refire delay for the shotgun.
    pub shotgun_interval: f32,
    /// Player refire delay for the beam.
    pub beam_interval: f32,
}

impl WeaponTuning {
    /// Base damage dealt to a bot by one projectile of the weapon.
    #[must_use]
    pub fn damage(&self, weapon: WeaponType) -> f32 {
        match weapon {
            WeaponType::Pistol => self.pistol_damage,
            WeaponType::Shotgun => self.shotgun_damage,
            WeaponType::Beam => self.beam_damage,
        }
    }

    /// Travel speed of projectiles fired by the weapon.
    #[must_use]
    pub fn speed(&self, weapon: WeaponType) -> f32 {
        match weapon {
            WeaponType::Beam => self.beam_speed,
            WeaponType::Pistol | WeaponType::Shotgun => self.standard_speed,
        }
    }

    /// Delay before the player may fire the weapon again.
    #[must_use]
    pub fn player_interval(&self, weapon: WeaponType) -> f32 {
        match weapon {
            WeaponType::Pistol => self.pistol_interval,
            WeaponType::Shotgun => self.shotgun_interval,
            WeaponType::Beam => self.beam_interval,
        }
    }
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            pool_capacity: 100,
            lifetime: 1.5,
            standard_speed: 30.0,
            beam_speed: 60.0,
            shotgun_spread: 0.15,
            shotgun_forward: 0.9,
            bullet_radius: 0.5,
            pistol_damage: 20.0,
            shotgun_damage: 10.0,
            beam_damage: 50.0,
            ultimate_multiplier: 2.0,
            enemy_hit_damage: 5.0,
            pistol_interval: 0.3,
            shotgun_interval: 0.6,
            beam_interval: 0.1,
        }
    }
}

/// Shrinking safe-zone parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    /// Radius at round start.
    pub start_radius: f32,
    /// Radius the zone never shrinks below.
    pub min_radius: f32,
    /// Shrink rate in units per simulated second.
    pub shrink_speed: f32,
    /// Damage per simulated second dealt to the player outside the zone.
    pub damage_per_second: f32,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            start_radius: 100.0,
            min_radius: 15.0,
            shrink_speed: 1.0,
            damage_per_second: 5.0,
        }
    }
}

/// Delta-time clamping and slow motion.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    /// Longest tick the simulation accepts; longer ticks are clamped.
    pub max_dt: f32,
    /// Shortest tick the simulation accepts; shorter or negative ticks are raised.
    pub min_dt: f32,
    /// Factor applied to the simulation delta while slow motion runs.
    pub slow_motion_scale: f32,
    /// Slow-motion length after any kill.
    pub kill_slow_motion: f32,
    /// Slow-motion length after a boss kill.
    pub boss_kill_slow_motion: f32,
    /// Delta used to scale input movement before the first tick.
    pub initial_input_dt: f32,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            min_dt: 0.001,
            slow_motion_scale: 0.2,
            kill_slow_motion: 0.2,
            boss_kill_slow_motion: 1.0,
            initial_input_dt: 0.016,
        }
    }
}

/// Cosmetic particle pool.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    /// Fixed number of particle slots.
    pub pool_capacity: usize,
    /// Seconds a particle lives; also its starting opacity.
    pub life: f32,
    /// Particles emitted when a boss dies.
    pub boss_burst: usize,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            pool_capacity: 100,
            life: 0.8,
            boss_burst: 20,
        }
    }
}

/// Kill-feed notification timing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct KillFeedTuning {
    /// Seconds the notification stays up.
    pub duration: f32,
    /// Length of the linear fade at the end of the notification.
    pub fade: f32,
}

impl Default for KillFeedTuning {
    fn default() -> Self {
        Self {
            duration: 2.0,
            fade: 0.5,
        }
    }
}

/// Camera placement and shake strengths.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Eye height above the player.
    pub height: f32,
    /// Eye offset behind the player along `+z`.
    pub distance: f32,
    /// Jitter amplitude per unit of shake.
    pub jitter: f32,
    /// Shake applied when a dash starts.
    pub dash_shake: f32,
    /// Shake applied when the ultimate starts.
    pub ultimate_shake: f32,
    /// Shake applied when the player fires.
    pub shot_shake: f32,
    /// Shake applied when the player is hit.
    pub hit_shake: f32,
    /// Shake applied when a boss dies.
    pub boss_kill_shake: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            height: 25.0,
            distance: 18.0,
            jitter: 0.2,
            dash_shake: 0.3,
            ultimate_shake: 0.5,
            shot_shake: 0.1,
            hit_shake: 0.15,
            boss_kill_shake: 1.0,
        }
    }
}
