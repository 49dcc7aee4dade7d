#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the arena.
//!
//! The world owns the map, the player, and the fixed pools of bots,
//! projectiles and particles, together with the single random generator every
//! stochastic decision draws from. Adapters mutate it exclusively through
//! [`apply`] and read it through the [`query`] module.

mod bot;
mod combat;
mod kill_feed;
mod map;
mod particles;
mod player;
mod pool;
mod weapons;

use std::time::Duration;

use arena_core::{
    circles_overlap, seconds, BotId, BotState, BotTuning, CameraParams, Command, Event,
    GameConfig, InputFrame, Rgb, RoundState, Skin, TargetRef, Vec3, DEFAULT_FACING,
};
use arena_system_bot_ai::{AiTuning, BotAi, Candidate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

pub use bot::Bot;
pub use combat::{Body, Combatant, DamageOutcome, CORPSE_COLOR, CORPSE_HEIGHT};
pub use kill_feed::KillFeed;
pub use map::{ArenaMap, Cell};
pub use particles::Particles;
pub use player::{Ability, Player};
pub use pool::Pool;
pub use weapons::{Armory, Bullet};

/// Axis magnitude below which input does not move the player.
const MOVE_DEADZONE: f32 = 0.01;
/// Axis magnitude below which shots use the default facing.
const AIM_DEADZONE: f32 = 0.1;
/// Bots only fire along directions longer than this.
const BOT_AIM_MIN: f32 = 0.01;

const HIT_COLOR: Rgb = Rgb::new(1.0, 0.0, 0.0);
const BOSS_BURST_COLOR: Rgb = Rgb::new(0.5, 0.0, 0.0);

/// Kills resolved during one tick.
#[derive(Clone, Copy, Debug, Default)]
struct KillTally {
    kills: usize,
    boss_kills: usize,
}

/// Represents the authoritative arena world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    rng: ChaCha8Rng,
    ai: BotAi,
    map: ArenaMap,
    player: Player,
    bots: Pool<Bot>,
    armory: Armory,
    particles: Particles,
    kill_feed: KillFeed,
    round: RoundState,
    zone_radius: f32,
    camera: CameraParams,
    camera_shake: f32,
    slow_motion: f32,
    last_dt: f32,
    bots_alive: usize,
    boss_mode: bool,
    kill_event: bool,
    candidates: Vec<Candidate>,
    tick_index: u64,
}

impl World {
    /// Creates a world with the reference tuning and a first round in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a world with the reference tuning and the provided seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(GameConfig {
            rng_seed: seed,
            ..GameConfig::default()
        })
    }

    /// Creates a world from an explicit configuration and starts the first round.
    ///
    /// Pools are sized once here and never grow afterwards.
    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            ai: BotAi::new(AiTuning::from(&config.bots)),
            map: ArenaMap::new(&config.map),
            player: Player::new(&config.player, Skin::default()),
            bots: Pool::with_capacity(config.bots.pool_capacity),
            armory: Armory::new(&config.weapons),
            particles: Particles::new(&config.particles),
            kill_feed: KillFeed::default(),
            round: RoundState::Playing,
            zone_radius: config.zone.start_radius,
            camera: CameraParams::default(),
            camera_shake: 0.0,
            slow_motion: 0.0,
            last_dt: config.timing.initial_input_dt,
            bots_alive: 0,
            boss_mode: false,
            kill_event: false,
            candidates: Vec::with_capacity(config.bots.pool_capacity + 1),
            tick_index: 0,
            config,
        };
        let mut events = Vec::new();
        world.init_round(&mut events);
        world
    }

    /// Reports whether a bot died since the previous call, then clears the flag.
    pub fn consume_kill_event(&mut self) -> bool {
        std::mem::take(&mut self.kill_event)
    }

    /// Reports whether anything fired since the previous call, then clears the flag.
    pub fn consume_shot_event(&mut self) -> bool {
        self.armory.consume_shot_event()
    }

    fn init_round(&mut self, out_events: &mut Vec<Event>) {
        self.player.reset(&self.config.player);
        self.bots.release_all();
        self.armory.clear();
        self.particles.clear();
        self.kill_feed.clear();
        self.kill_event = false;
        self.boss_mode = false;
        self.slow_motion = 0.0;
        self.camera_shake = 0.0;
        self.zone_radius = self.config.zone.start_radius;
        self.round = RoundState::Playing;

        let blocks = self.map.generate(&self.config.map, &mut self.rng);
        let spawned = self.spawn_bots(self.config.bots.spawn_count);
        self.bots_alive = spawned;
        self.update_camera();

        debug!(
            seed = self.config.rng_seed,
            blocks,
            bots = spawned,
            skin = ?self.player.skin(),
            "round started"
        );
        out_events.push(Event::RoundStarted { bots: spawned });
    }

    fn spawn_bots(&mut self, count: usize) -> usize {
        let tuning = &self.config.bots;
        let mut spawned = 0;
        for _ in 0..count {
            let Some((_, bot)) = self.bots.acquire() else {
                debug!(requested = count, spawned, "bot pool exhausted");
                break;
            };
            bot.reset(tuning, &mut self.rng);
            let radius = bot.radius(tuning);
            bot.body.position = spawn_point(&self.map, tuning, radius, &mut self.rng);
            spawned += 1;
        }
        spawned
    }

    fn handle_input(&mut self, frame: InputFrame, out_events: &mut Vec<Event>) {
        if self.round != RoundState::Playing || self.player.is_dead() {
            return;
        }

        let frame = frame.clamped();
        let intent = frame.move_direction();
        self.player.set_input(frame.axis_x, frame.axis_y);

        if intent.length() > MOVE_DEADZONE {
            // Scaled by the previous tick's delta: input runs one frame behind.
            let next = self.player.position() + intent * self.player.current_speed() * self.last_dt;
            if !self.map.collides(next, self.config.player.radius) {
                self.player.set_position(next);
            }
        }

        if frame.dash && self.player.trigger_dash(&self.config.player) {
            self.add_shake(self.config.camera.dash_shake);
            trace!("dash triggered");
            out_events.push(Event::DashTriggered);
        }

        if frame.ultimate && self.player.trigger_ultimate(&self.config.player) {
            self.add_shake(self.config.camera.ultimate_shake);
            debug!(hp = self.player.combat().hp(), "ultimate triggered");
            out_events.push(Event::UltimateTriggered);
        }

        if frame.fire && self.player.ready_to_fire() {
            let aim = if intent.length() < AIM_DEADZONE {
                DEFAULT_FACING
            } else {
                intent
            };
            let weapon = self.player.active_weapon();
            let projectiles = self.armory.fire(
                self.player.position(),
                aim,
                true,
                weapon,
                &self.config.weapons,
            );
            self.player
                .start_refire(self.config.weapons.player_interval(weapon));
            self.add_shake(self.config.camera.shot_shake);
            out_events.push(Event::ShotFired {
                weapon,
                by_player: true,
                projectiles,
            });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let timing = &self.config.timing;
        let real_dt = seconds(dt).max(timing.min_dt).min(timing.max_dt);
        let mut sim_dt = real_dt;
        if self.slow_motion > 0.0 {
            sim_dt *= timing.slow_motion_scale;
            self.slow_motion = (self.slow_motion - real_dt).max(0.0);
        }
        self.last_dt = real_dt;
        self.tick_index = self.tick_index.saturating_add(1);

        if self.round == RoundState::Playing {
            self.advance_zone(sim_dt);
            self.player.update(sim_dt, &self.config.player);
            self.armory.update(sim_dt);
            self.kill_feed.update(sim_dt, self.config.kill_feed.fade);
            self.advance_bots(sim_dt, out_events);
            self.check_boss_mode(out_events);
            let tally = self.resolve_hits(out_events);
            self.particles.update(sim_dt);
            self.apply_kill_feedback(tally);
            self.bots_alive = self.count_alive();
            self.check_round_end(out_events);
        }

        self.camera_shake = (self.camera_shake - real_dt).max(0.0);
        self.update_camera();
    }

    fn advance_zone(&mut self, dt: f32) {
        let zone = &self.config.zone;
        if self.zone_radius > zone.min_radius {
            self.zone_radius = (self.zone_radius - zone.shrink_speed * dt).max(zone.min_radius);
        }
        if self.player.position().length() > self.zone_radius {
            let _ = self.player.take_damage(zone.damage_per_second * dt);
        }
    }

    fn advance_bots(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let tuning = &self.config.bots;

        self.candidates.clear();
        if !self.player.is_dead() {
            self.candidates.push(Candidate {
                target: TargetRef::Player,
                position: self.player.position(),
            });
        }
        for (index, bot) in self.bots.iter() {
            if !bot.is_dead() {
                self.candidates.push(Candidate {
                    target: TargetRef::Bot(bot_id(index)),
                    position: bot.position(),
                });
            }
        }

        for index in 0..self.bots.capacity() {
            let Some(bot) = self.bots.get_mut(index) else {
                continue;
            };
            if bot.is_dead() {
                continue;
            }

            let id = bot_id(index);
            bot.combat.cool_down(dt);
            bot.animate(dt);

            let sense = bot.sense(id, tuning);
            let position = self.ai.step(
                &mut bot.mind,
                &sense,
                &self.candidates,
                &self.map,
                &mut self.rng,
                dt,
            );
            bot.body.position = position;
            if let Some(entry) = self
                .candidates
                .iter_mut()
                .find(|candidate| candidate.target == TargetRef::Bot(id))
            {
                entry.position = position;
            }

            if bot.mind.state != BotState::Attack || !bot.combat.ready_to_fire() {
                continue;
            }
            // Targets are handles; resolve against this tick's live set.
            let Some(target) = bot.mind.target.and_then(|target| {
                self.candidates
                    .iter()
                    .find(|candidate| candidate.target == target)
            }) else {
                continue;
            };
            let aim = target.position - position;
            if aim.length() <= BOT_AIM_MIN {
                continue;
            }

            let weapon = bot.combat.weapon;
            let projectiles = self
                .armory
                .fire(position, aim, false, weapon, &self.config.weapons);
            bot.combat.fire_timer = if bot.is_boss() {
                bot.combat.fire_interval
            } else {
                sample_between(
                    &mut self.rng,
                    tuning.fire_interval_min,
                    tuning.fire_interval_max,
                )
            };
            out_events.push(Event::ShotFired {
                weapon,
                by_player: false,
                projectiles,
            });
        }
    }

    fn check_boss_mode(&mut self, out_events: &mut Vec<Event>) {
        if self.boss_mode {
            return;
        }
        let alive = self.count_alive();
        if alive == 0 || alive > self.config.bots.boss_threshold {
            return;
        }

        self.boss_mode = true;
        let mut upgraded = 0;
        for (_, bot) in self.bots.iter_mut() {
            if !bot.is_dead() && bot.activate_boss_mode() {
                upgraded += 1;
            }
        }
        debug!(bots = upgraded, "boss mode activated");
        out_events.push(Event::BossModeActivated { bots: upgraded });
    }

    fn resolve_hits(&mut self, out_events: &mut Vec<Event>) -> KillTally {
        let weapons = &self.config.weapons;
        let bot_tuning = &self.config.bots;
        let mut tally = KillTally::default();

        for index in 0..self.armory.bullets().capacity() {
            let Some(bullet) = self.armory.bullets().get(index) else {
                continue;
            };
            let (position, from_player, weapon) =
                (bullet.position(), bullet.from_player(), bullet.weapon());

            if from_player {
                let mut damage = weapons.damage(weapon);
                if self.player.ultimate().is_active() {
                    damage *= weapons.ultimate_multiplier;
                }

                let struck = self.bots.iter_mut().find(|(_, bot)| {
                    !bot.is_dead()
                        && circles_overlap(
                            position,
                            weapons.bullet_radius,
                            bot.position(),
                            bot.radius(bot_tuning),
                        )
                });
                let Some((bot_index, bot)) = struck else {
                    continue;
                };
                self.armory.release(index);
                if bot.take_damage(damage) != DamageOutcome::Killed {
                    continue;
                }

                let boss = bot.is_boss();
                let corpse = bot.position();
                self.player.record_kill();
                self.kill_feed.trigger(self.config.kill_feed.duration);
                let life = self.config.particles.life;
                if boss {
                    tally.boss_kills += 1;
                    let _ = self.particles.spawn_burst(
                        corpse,
                        BOSS_BURST_COLOR,
                        life,
                        self.config.particles.boss_burst,
                        &mut self.rng,
                    );
                } else {
                    let _ = self
                        .particles
                        .spawn_effect(corpse, HIT_COLOR, life, &mut self.rng);
                }
                tally.kills += 1;
                debug!(bot = bot_index, boss, "bot killed");
                out_events.push(Event::BotKilled {
                    bot: bot_id(bot_index),
                    boss,
                });
            } else if !self.player.is_dead()
                && circles_overlap(
                    position,
                    weapons.bullet_radius,
                    self.player.position(),
                    self.config.player.radius,
                )
            {
                let damage = weapons.enemy_hit_damage;
                let _ = self.player.take_damage(damage);
                self.armory.release(index);
                let _ = self.particles.spawn_effect(
                    self.player.position(),
                    HIT_COLOR,
                    self.config.particles.life,
                    &mut self.rng,
                );
                self.camera_shake = self.camera_shake.max(self.config.camera.hit_shake);
                out_events.push(Event::PlayerHit { damage });
            }
        }

        tally
    }

    fn apply_kill_feedback(&mut self, tally: KillTally) {
        if tally.kills == 0 {
            return;
        }
        let timing = &self.config.timing;
        self.kill_event = true;
        self.slow_motion = self.slow_motion.max(timing.kill_slow_motion);
        if tally.boss_kills > 0 {
            self.slow_motion = self.slow_motion.max(timing.boss_kill_slow_motion);
            self.camera_shake = self.camera_shake.max(self.config.camera.boss_kill_shake);
        }
    }

    fn check_round_end(&mut self, out_events: &mut Vec<Event>) {
        let next = if self.player.is_dead() {
            RoundState::Lost
        } else if self.bots_alive == 0 {
            RoundState::Won
        } else {
            return;
        };
        self.round = next;
        debug!(
            state = ?next,
            kills = self.player.combat().kills,
            ticks = self.tick_index,
            "round ended"
        );
        out_events.push(Event::RoundEnded { state: next });
    }

    fn count_alive(&self) -> usize {
        self.bots.iter().filter(|(_, bot)| !bot.is_dead()).count()
    }

    fn add_shake(&mut self, amount: f32) {
        self.camera_shake = self.camera_shake.max(amount);
    }

    fn update_camera(&mut self) {
        let tuning = &self.config.camera;
        let amplitude = tuning.jitter * self.camera_shake;
        let (jitter_x, jitter_z) = if amplitude > 0.0 {
            (
                self.rng.gen_range(-1.0..1.0) * amplitude,
                self.rng.gen_range(-1.0..1.0) * amplitude,
            )
        } else {
            (0.0, 0.0)
        };
        let focus = self.player.position();
        self.camera = CameraParams {
            eye: focus + Vec3::new(jitter_x, tuning.height, tuning.distance + jitter_z),
            focus,
            up: Vec3::Y,
        };
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::InitRound => world.init_round(out_events),
        Command::SelectSkin { skin } => world.player.select_skin(skin),
        Command::EquipWeapon { weapon } => world.player.equip(weapon),
        Command::Input { frame } => world.handle_input(frame, out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
    }
}

fn bot_id(index: usize) -> BotId {
    BotId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Uniform sample in `low..high`, or `low` when the range is empty.
fn sample_between<R>(rng: &mut R, low: f32, high: f32) -> f32
where
    R: Rng + ?Sized,
{
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Picks a bot spawn point outside the central exclusion square and clear of
/// walls. After the last attempt the final candidate is taken as is.
fn spawn_point<R>(map: &ArenaMap, tuning: &BotTuning, radius: f32, rng: &mut R) -> Vec3
where
    R: Rng + ?Sized,
{
    let extent = tuning.spawn_extent;
    let exclusion = tuning.spawn_exclusion;
    let attempts = tuning.spawn_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let candidate = Vec3::new(
            sample_between(rng, -extent, extent),
            0.0,
            sample_between(rng, -extent, extent),
        );
        let near_centre = candidate.x.abs() < exclusion && candidate.z.abs() < exclusion;
        if attempt >= attempts || (!near_centre && !map.collides(candidate, radius)) {
            return candidate;
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arena_core::{
        BotId, CameraParams, Drawable, DrawableKind, GameConfig, Rgb, RoundState, Vec3,
    };

    use super::{ArenaMap, Bot, Bullet, KillFeed, Player, Pool, World};

    const WALL_COLOR: Rgb = Rgb::new(0.4, 0.4, 0.5);

    /// Current lifecycle state of the round.
    #[must_use]
    pub fn round_state(world: &World) -> RoundState {
        world.round
    }

    /// Read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Player hit points.
    #[must_use]
    pub fn player_hp(world: &World) -> f32 {
        world.player.combat().hp()
    }

    /// Player position on the ground plane.
    #[must_use]
    pub fn player_position(world: &World) -> Vec3 {
        world.player.position()
    }

    /// Bots the player killed this round.
    #[must_use]
    pub fn player_kills(world: &World) -> u32 {
        world.player.combat().kills
    }

    /// Living bots as of the end of the latest tick.
    #[must_use]
    pub fn bots_alive(world: &World) -> usize {
        world.bots_alive
    }

    /// Ultimate readiness in `0.0..=1.0`.
    #[must_use]
    pub fn ultimate_progress(world: &World) -> f32 {
        world.player.ultimate_progress(&world.config.player)
    }

    /// Whether the ultimate is running.
    #[must_use]
    pub fn ultimate_active(world: &World) -> bool {
        world.player.ultimate().is_active()
    }

    /// Kill notification state.
    #[must_use]
    pub fn kill_feed(world: &World) -> &KillFeed {
        &world.kill_feed
    }

    /// Camera placement computed by the latest tick.
    #[must_use]
    pub fn camera(world: &World) -> CameraParams {
        world.camera
    }

    /// Remaining camera shake strength.
    #[must_use]
    pub fn camera_shake(world: &World) -> f32 {
        world.camera_shake
    }

    /// Remaining slow-motion time in real seconds.
    #[must_use]
    pub fn slow_motion(world: &World) -> f32 {
        world.slow_motion
    }

    /// Current safe-zone radius.
    #[must_use]
    pub fn zone_radius(world: &World) -> f32 {
        world.zone_radius
    }

    /// Whether the surviving bots were upgraded this round.
    #[must_use]
    pub fn boss_mode(world: &World) -> bool {
        world.boss_mode
    }

    /// Read-only access to the wall grid.
    #[must_use]
    pub fn map(world: &World) -> &ArenaMap {
        &world.map
    }

    /// Bot occupying the slot named by `id`, if active.
    #[must_use]
    pub fn bot(world: &World, id: BotId) -> Option<&Bot> {
        world.bots.get(id.slot())
    }

    /// Active bots, dead or alive, in pool order.
    pub fn bots(world: &World) -> impl Iterator<Item = (BotId, &Bot)> {
        world
            .bots
            .iter()
            .map(|(index, bot)| (super::bot_id(index), bot))
    }

    /// Read-only access to the projectile pool.
    #[must_use]
    pub fn bullets(world: &World) -> &Pool<Bullet> {
        world.armory.bullets()
    }

    /// Number of live particles.
    #[must_use]
    pub fn particle_count(world: &World) -> usize {
        world.particles.active_count()
    }

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Collects render snapshots of every visible object into `out`.
    ///
    /// The buffer is cleared first so callers can reuse it every frame.
    /// Walls farther from the player than the cull distance are skipped.
    /// Order: walls, aura, player, bots, particles, projectiles.
    pub fn drawables(world: &World, out: &mut Vec<Drawable>) {
        out.clear();

        let centre = world.player.position();
        let cull = world.config.map.cull_distance_sq;
        let wall_scale = Vec3::splat(world.map.cell_size());
        out.extend(
            world
                .map
                .walls()
                .iter()
                .filter(|wall| {
                    let dx = wall.x - centre.x;
                    let dz = wall.z - centre.z;
                    dx * dx + dz * dz < cull
                })
                .map(|wall| Drawable {
                    kind: DrawableKind::Wall,
                    position: *wall,
                    scale: wall_scale,
                    color: WALL_COLOR,
                    alpha: 1.0,
                }),
        );

        out.extend(world.player.aura());
        out.push(world.player.body().drawable(DrawableKind::Player));
        out.extend(
            world
                .bots
                .iter()
                .map(|(_, bot)| bot.body().drawable(DrawableKind::Bot)),
        );
        out.extend(world.particles.drawables());
        out.extend(world.armory.drawables());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{DrawableKind, WeaponType};

    fn quiet_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.bots.spawn_count = 0;
        config
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn input(world: &mut World, frame: InputFrame) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Input { frame }, &mut events);
        events
    }

    /// Places a single bot at `position` in slot zero and keeps the round alive
    /// with a second, distant bot. Boss mode is disabled.
    fn world_with_target(position: Vec3) -> World {
        let mut config = GameConfig::default();
        config.bots.spawn_count = 2;
        config.bots.boss_threshold = 0;
        let mut world = World::with_config(config);
        if let Some(bot) = world.bots.get_mut(0) {
            bot.body.position = position;
        }
        if let Some(bot) = world.bots.get_mut(1) {
            bot.body.position = Vec3::new(40.0, 0.0, 40.0);
        }
        world
    }

    #[test]
    fn new_world_starts_a_playing_round() {
        let world = World::new();
        assert_eq!(query::round_state(&world), RoundState::Playing);
        assert_eq!(query::bots_alive(&world), 30);
        assert_eq!(query::player_hp(&world), 100.0);
        assert_eq!(query::zone_radius(&world), 100.0);
        assert!(!world.map.collides(Vec3::ZERO, 1.0));
    }

    #[test]
    fn empty_round_is_won_on_the_first_tick() {
        let mut world = World::with_config(quiet_config());
        let events = tick(&mut world, 16);
        assert_eq!(query::round_state(&world), RoundState::Won);
        assert!(events.contains(&Event::RoundEnded {
            state: RoundState::Won
        }));

        let frozen = query::zone_radius(&world);
        let _ = tick(&mut world, 16);
        assert_eq!(query::zone_radius(&world), frozen);
    }

    #[test]
    fn delta_time_is_clamped() {
        let mut world = World::new();
        let _ = tick(&mut world, 5_000);
        assert_eq!(world.last_dt, 0.1);
        assert!((query::zone_radius(&world) - 99.9).abs() < 1.0e-4);

        let _ = tick(&mut world, 0);
        assert_eq!(world.last_dt, 0.001);
    }

    #[test]
    fn input_moves_by_the_previous_tick_delta() {
        let mut world = World::new();
        let _ = tick(&mut world, 50);
        let _ = input(
            &mut world,
            InputFrame {
                axis_x: 1.0,
                ..InputFrame::default()
            },
        );
        let speed = world.player.current_speed();
        assert!((query::player_position(&world).x - speed * 0.05).abs() < 1.0e-5);
    }

    #[test]
    fn firing_without_movement_uses_the_default_facing() {
        let mut world = World::with_config(quiet_config());
        let events = input(
            &mut world,
            InputFrame {
                fire: true,
                ..InputFrame::default()
            },
        );
        assert_eq!(
            events,
            vec![Event::ShotFired {
                weapon: WeaponType::Pistol,
                by_player: true,
                projectiles: 1,
            }]
        );
        let (_, bullet) = query::bullets(&world).iter().next().expect("bullet");
        assert!(bullet.velocity().z < 0.0);
        assert_eq!(bullet.velocity().x, 0.0);
        assert!(world.consume_shot_event());
        assert!(!world.consume_shot_event());

        let again = input(
            &mut world,
            InputFrame {
                fire: true,
                ..InputFrame::default()
            },
        );
        assert!(again.is_empty(), "refire delay blocks the second shot");
    }

    #[test]
    fn player_bullet_kills_bot_and_triggers_feedback() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -3.0));
        if let Some(bot) = world.bots.get_mut(0) {
            let _ = bot.take_damage(85.0);
        }
        let _ = input(
            &mut world,
            InputFrame {
                fire: true,
                ..InputFrame::default()
            },
        );

        let mut killed = false;
        for _ in 0..10 {
            let events = tick(&mut world, 16);
            if events.iter().any(|event| {
                matches!(event, Event::BotKilled { bot, boss: false } if bot.get() == 0)
            }) {
                killed = true;
                break;
            }
        }

        assert!(killed);
        assert_eq!(query::player_kills(&world), 1);
        assert!(query::kill_feed(&world).is_active());
        assert_eq!(query::kill_feed(&world).alpha(), 1.0);
        assert!(world.consume_kill_event());
        assert!(!world.consume_kill_event());
        assert!(query::slow_motion(&world) > 0.0);
        let corpse = query::bot(&world, BotId::new(0)).expect("corpse stays in its slot");
        assert!(corpse.is_dead());
        assert_eq!(corpse.body().color, CORPSE_COLOR);
    }

    #[test]
    fn bullet_stops_at_the_first_bot_it_hits() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -3.0));
        let _ = world.bots.acquire().map(|(_, bot)| {
            *bot = Bot::default();
            bot.body.position = Vec3::new(0.0, 0.0, -3.0);
        });
        let _ = input(
            &mut world,
            InputFrame {
                fire: true,
                ..InputFrame::default()
            },
        );
        for _ in 0..10 {
            let _ = tick(&mut world, 16);
        }

        let damaged = query::bots(&world)
            .filter(|(_, bot)| bot.combat().hp() < bot.combat().max_hp())
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn boss_mode_triggers_once_at_the_threshold() {
        let mut config = GameConfig::default();
        config.bots.spawn_count = 3;
        let mut world = World::with_config(config);

        let events = tick(&mut world, 16);
        assert!(events.contains(&Event::BossModeActivated { bots: 3 }));
        assert!(query::bots(&world).all(|(_, bot)| bot.is_boss()));
        assert_eq!(
            query::bots(&world)
                .map(|(_, bot)| bot.combat().max_hp())
                .collect::<Vec<_>>(),
            vec![200.0; 3]
        );

        let later = tick(&mut world, 16);
        assert!(!later
            .iter()
            .any(|event| matches!(event, Event::BossModeActivated { .. })));
    }

    #[test]
    fn boss_kill_applies_long_slow_motion_and_heavy_shake() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -3.0));
        if let Some(bot) = world.bots.get_mut(0) {
            let _ = bot.activate_boss_mode();
            let _ = bot.take_damage(190.0);
        }
        let _ = input(
            &mut world,
            InputFrame {
                fire: true,
                ..InputFrame::default()
            },
        );

        let mut boss_killed = false;
        for _ in 0..10 {
            let events = tick(&mut world, 16);
            if events.contains(&Event::BotKilled {
                bot: BotId::new(0),
                boss: true,
            }) {
                boss_killed = true;
                break;
            }
        }

        assert!(boss_killed);
        assert_eq!(query::slow_motion(&world), 1.0);
        assert!(query::camera_shake(&world) > 0.9);
        assert!(query::particle_count(&world) >= 20);
    }

    #[test]
    fn zone_damage_kills_the_player_and_loses_the_round() {
        let mut config = quiet_config();
        config.bots.spawn_count = 1;
        config.zone.start_radius = 0.0;
        config.zone.min_radius = 0.0;
        config.zone.damage_per_second = 10_000.0;
        let mut world = World::with_config(config);
        if let Some(bot) = world.bots.get_mut(0) {
            bot.body.position = Vec3::new(40.0, 0.0, 40.0);
        }

        let _ = input(
            &mut world,
            InputFrame {
                axis_x: 1.0,
                ..InputFrame::default()
            },
        );
        let events = tick(&mut world, 16);
        assert_eq!(query::round_state(&world), RoundState::Lost);
        assert!(events.contains(&Event::RoundEnded {
            state: RoundState::Lost
        }));

        let ignored = input(
            &mut world,
            InputFrame {
                fire: true,
                dash: true,
                ..InputFrame::default()
            },
        );
        assert!(ignored.is_empty());
    }

    #[test]
    fn bots_in_attack_range_shoot_the_player() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -5.0));
        let events = tick(&mut world, 16);

        assert_eq!(
            query::bot(&world, BotId::new(0)).map(Bot::state),
            Some(BotState::Attack)
        );
        assert!(events.contains(&Event::ShotFired {
            weapon: WeaponType::Pistol,
            by_player: false,
            projectiles: 1,
        }));
        let timer = world.bots.get(0).map(|bot| bot.combat.fire_timer);
        assert!(timer.is_some_and(|timer| (1.0..2.0).contains(&timer)));
    }

    #[test]
    fn bot_shots_do_not_raise_the_shot_flag() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -5.0));
        let events = tick(&mut world, 16);

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ShotFired { by_player: false, .. })));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::ShotFired { by_player: true, .. })));
        assert!(!world.consume_shot_event());
    }

    /// Aims one player shot at a bot left with 60 hit points.
    fn shot_at_weakened_bot(ultimate: bool) -> World {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -3.0));
        if let Some(bot) = world.bots.get_mut(0) {
            let _ = bot.take_damage(40.0);
        }
        let _ = input(
            &mut world,
            InputFrame {
                fire: true,
                ultimate,
                ..InputFrame::default()
            },
        );
        world
    }

    fn target_hp(world: &World) -> f32 {
        world.bots.get(0).map_or(f32::NAN, |bot| bot.combat().hp())
    }

    #[test]
    fn ultimate_doubles_player_damage() {
        // The beam alone deals 50, so only the doubled hit can finish the bot.
        let mut world = shot_at_weakened_bot(true);
        for _ in 0..10 {
            let _ = tick(&mut world, 16);
        }
        assert_eq!(target_hp(&world), 0.0);
        assert_eq!(query::player_kills(&world), 1);

        let mut world = shot_at_weakened_bot(false);
        for _ in 0..10 {
            let _ = tick(&mut world, 16);
        }
        assert_eq!(target_hp(&world), 40.0);
        assert_eq!(query::player_kills(&world), 0);
    }

    #[test]
    fn slow_motion_scales_the_simulation_but_decays_in_real_time() {
        let mut world = shot_at_weakened_bot(true);
        let mut killed = false;
        for _ in 0..10 {
            if tick(&mut world, 16)
                .iter()
                .any(|event| matches!(event, Event::BotKilled { .. }))
            {
                killed = true;
                break;
            }
        }
        assert!(killed);
        assert_eq!(query::slow_motion(&world), 0.2);

        let zone = query::zone_radius(&world);
        let _ = tick(&mut world, 100);
        assert!((zone - query::zone_radius(&world) - 0.02).abs() < 1.0e-4);
        assert!((query::slow_motion(&world) - 0.1).abs() < 1.0e-6);
    }

    #[test]
    fn enemy_hits_damage_the_player_and_shake_the_camera() {
        let mut world = world_with_target(Vec3::new(0.0, 0.0, -5.0));
        let start = query::player_hp(&world);

        let mut hit = false;
        for _ in 0..30 {
            if tick(&mut world, 16)
                .iter()
                .any(|event| matches!(event, Event::PlayerHit { .. }))
            {
                hit = true;
                break;
            }
        }

        assert!(hit);
        assert!((query::player_hp(&world) - (start - 5.0)).abs() < 1.0e-3);
        assert!(query::camera_shake(&world) > 0.0);
    }

    #[test]
    fn init_round_keeps_skin_and_weapon_choices() {
        let mut world = World::with_config(quiet_config());
        let mut events = Vec::new();
        apply(&mut world, Command::SelectSkin { skin: Skin::Gold }, &mut events);
        apply(
            &mut world,
            Command::EquipWeapon {
                weapon: WeaponType::Shotgun,
            },
            &mut events,
        );
        apply(&mut world, Command::InitRound, &mut events);

        assert_eq!(events, vec![Event::RoundStarted { bots: 0 }]);
        assert_eq!(query::player_hp(&world), 150.0);
        assert_eq!(query::player(&world).equipped(), WeaponType::Shotgun);
    }

    #[test]
    fn camera_follows_the_player_from_above_and_behind() {
        let mut world = World::with_config(quiet_config());
        let _ = tick(&mut world, 16);
        let camera = query::camera(&world);
        assert_eq!(camera.focus, query::player_position(&world));
        assert_eq!(camera.eye, camera.focus + Vec3::new(0.0, 25.0, 18.0));
        assert_eq!(camera.up, Vec3::Y);
    }

    #[test]
    fn drawables_cull_distant_walls_and_reuse_the_buffer() {
        let mut config = quiet_config();
        config.map.size = 20;
        let world = World::with_config(config);
        let stale = world.player.body().drawable(DrawableKind::Particle);
        let mut drawables = vec![stale; 3];
        query::drawables(&world, &mut drawables);

        let count = |kind: DrawableKind| {
            drawables
                .iter()
                .filter(|drawable| drawable.kind == kind)
                .count()
        };
        // Border cells sit 40 units out; the corners are beyond the cull radius.
        assert!(count(DrawableKind::Wall) > 0);
        assert!(count(DrawableKind::Wall) < world.map.walls().len());
        assert_eq!(count(DrawableKind::Player), 1);
        assert_eq!(count(DrawableKind::Particle), 0);
        assert_eq!(count(DrawableKind::Aura), 0);
    }
}
