//! Projectile pool and the fire patterns of each weapon.

use arena_core::{direction_or_zero, Drawable, DrawableKind, Rgb, Vec3, WeaponTuning, WeaponType};
use tracing::trace;

use crate::combat::Body;
use crate::pool::Pool;

const BEAM_COLOR: Rgb = Rgb::new(0.0, 1.0, 1.0);
const PLAYER_BULLET_COLOR: Rgb = Rgb::new(1.0, 1.0, 0.0);
const ENEMY_BULLET_COLOR: Rgb = Rgb::new(1.0, 0.0, 0.0);
const BEAM_SCALE: Vec3 = Vec3::new(0.5, 0.5, 3.0);
const BULLET_SCALE: f32 = 0.2;

/// A projectile in flight.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bullet {
    pub(crate) body: Body,
    velocity: Vec3,
    life: f32,
    from_player: bool,
    weapon: WeaponType,
}

impl Bullet {
    fn launch(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        from_player: bool,
        weapon: WeaponType,
        tuning: &WeaponTuning,
    ) {
        let (color, scale) = match (from_player, weapon) {
            (true, WeaponType::Beam) => (BEAM_COLOR, BEAM_SCALE),
            (true, _) => (PLAYER_BULLET_COLOR, Vec3::splat(BULLET_SCALE)),
            (false, _) => (ENEMY_BULLET_COLOR, Vec3::splat(BULLET_SCALE)),
        };
        self.body = Body {
            position: origin,
            scale,
            color,
            alpha: 1.0,
        };
        self.velocity = direction * tuning.speed(weapon);
        self.life = tuning.lifetime;
        self.from_player = from_player;
        self.weapon = weapon;
    }

    /// Moves the projectile; returns `false` once its lifetime is spent.
    fn advance(&mut self, dt: f32) -> bool {
        self.body.position += self.velocity * dt;
        self.life -= dt;
        self.life > 0.0
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Seconds of flight left.
    #[must_use]
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Whether the player fired it.
    #[must_use]
    pub fn from_player(&self) -> bool {
        self.from_player
    }

    /// Weapon that fired it.
    #[must_use]
    pub fn weapon(&self) -> WeaponType {
        self.weapon
    }
}

/// Owner of the projectile pool.
#[derive(Clone, Debug)]
pub struct Armory {
    bullets: Pool<Bullet>,
    shot_event: bool,
}

impl Armory {
    /// Allocates the projectile pool.
    #[must_use]
    pub fn new(tuning: &WeaponTuning) -> Self {
        Self {
            bullets: Pool::with_capacity(tuning.pool_capacity),
            shot_event: false,
        }
    }

    /// Fires `weapon` from `origin` along `direction` and returns how many
    /// projectiles obtained a slot.
    ///
    /// The shotgun fans three pellets: the aim direction plus one blended to
    /// each side. A zero direction fires nothing. An exhausted pool drops
    /// pellets silently. Only player shots raise the shot flag, even when every
    /// pellet was dropped.
    pub fn fire(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        from_player: bool,
        weapon: WeaponType,
        tuning: &WeaponTuning,
    ) -> usize {
        let aim = direction_or_zero(Vec3::new(direction.x, 0.0, direction.z));
        if aim == Vec3::ZERO {
            return 0;
        }
        if from_player {
            self.shot_event = true;
        }

        let spawned = match weapon {
            WeaponType::Pistol | WeaponType::Beam => {
                usize::from(self.spawn(origin, aim, from_player, weapon, tuning))
            }
            WeaponType::Shotgun => {
                let forward = tuning.shotgun_forward;
                let spread = tuning.shotgun_spread;
                let left = Vec3::new(
                    aim.x * forward + aim.z * spread,
                    0.0,
                    aim.z * forward - aim.x * spread,
                );
                let right = Vec3::new(
                    aim.x * forward - aim.z * spread,
                    0.0,
                    aim.z * forward + aim.x * spread,
                );
                [aim, direction_or_zero(left), direction_or_zero(right)]
                    .into_iter()
                    .filter(|pellet| *pellet != Vec3::ZERO)
                    .map(|pellet| usize::from(self.spawn(origin, pellet, from_player, weapon, tuning)))
                    .sum()
            }
        };

        if spawned < weapon.projectile_count() {
            trace!(?weapon, spawned, "projectile pool exhausted");
        }
        spawned
    }

    /// Places one projectile; returns `false` when the pool is full.
    pub fn spawn(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        from_player: bool,
        weapon: WeaponType,
        tuning: &WeaponTuning,
    ) -> bool {
        match self.bullets.acquire() {
            Some((_, bullet)) => {
                bullet.launch(origin, direction, from_player, weapon, tuning);
                true
            }
            None => false,
        }
    }

    /// Moves every projectile and frees those whose lifetime ran out.
    pub fn update(&mut self, dt: f32) {
        for index in 0..self.bullets.capacity() {
            let expired = match self.bullets.get_mut(index) {
                Some(bullet) => !bullet.advance(dt),
                None => continue,
            };
            if expired {
                self.bullets.release(index);
            }
        }
    }

    /// Reports whether anything fired since the previous call, then clears the flag.
    pub fn consume_shot_event(&mut self) -> bool {
        std::mem::take(&mut self.shot_event)
    }

    /// Frees every projectile and clears the shot flag.
    pub fn clear(&mut self) {
        self.bullets.release_all();
        self.shot_event = false;
    }

    /// Read access to the projectile pool.
    #[must_use]
    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    /// Frees one projectile slot.
    pub(crate) fn release(&mut self, index: usize) {
        self.bullets.release(index);
    }

    /// Iterates active projectile drawables.
    pub(crate) fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.bullets
            .iter()
            .map(|(_, bullet)| bullet.body.drawable(DrawableKind::Bullet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armory(capacity: usize) -> (Armory, WeaponTuning) {
        let tuning = WeaponTuning {
            pool_capacity: capacity,
            ..WeaponTuning::default()
        };
        (Armory::new(&tuning), tuning)
    }

    #[test]
    fn shotgun_fans_three_unit_pellets_around_the_aim() {
        let (mut armory, tuning) = armory(10);
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let fired = armory.fire(Vec3::ZERO, forward, true, WeaponType::Shotgun, &tuning);
        assert_eq!(fired, 3);

        let velocities: Vec<Vec3> = armory
            .bullets()
            .iter()
            .map(|(_, bullet)| bullet.velocity() / tuning.standard_speed)
            .collect();
        assert_eq!(velocities[0], forward);
        for side in &velocities[1..] {
            assert!((side.length() - 1.0).abs() < 1.0e-5);
            assert!(side.dot(forward) > 0.95);
        }
        assert!((velocities[1].x + velocities[2].x).abs() < 1.0e-5, "pellets mirror each other");
    }

    #[test]
    fn exhausted_pool_under_delivers_without_error() {
        let (mut armory, tuning) = armory(2);
        let fired = armory.fire(Vec3::ZERO, Vec3::X, true, WeaponType::Shotgun, &tuning);
        assert_eq!(fired, 2);
        assert!(armory.consume_shot_event());

        let more = armory.fire(Vec3::ZERO, Vec3::X, false, WeaponType::Pistol, &tuning);
        assert_eq!(more, 0);
        assert_eq!(armory.bullets().active_count(), 2);
    }

    #[test]
    fn zero_direction_fires_nothing() {
        let (mut armory, tuning) = armory(4);
        assert_eq!(
            armory.fire(Vec3::ZERO, Vec3::ZERO, true, WeaponType::Pistol, &tuning),
            0
        );
        assert!(!armory.consume_shot_event());
    }

    #[test]
    fn shot_event_is_consumed_once() {
        let (mut armory, tuning) = armory(4);
        let _ = armory.fire(Vec3::ZERO, Vec3::Z, true, WeaponType::Pistol, &tuning);
        assert!(armory.consume_shot_event());
        assert!(!armory.consume_shot_event());
    }

    #[test]
    fn enemy_shots_leave_the_shot_flag_alone() {
        let (mut armory, tuning) = armory(4);
        let fired = armory.fire(Vec3::ZERO, Vec3::X, false, WeaponType::Pistol, &tuning);
        assert_eq!(fired, 1);
        assert!(!armory.consume_shot_event());
    }

    #[test]
    fn beam_travels_faster_and_looks_different() {
        let (mut armory, tuning) = armory(4);
        let _ = armory.fire(Vec3::ZERO, Vec3::X, true, WeaponType::Beam, &tuning);
        let (_, beam) = armory.bullets().iter().next().expect("beam in flight");
        assert_eq!(beam.velocity(), Vec3::X * tuning.beam_speed);
        assert_eq!(beam.body.color, BEAM_COLOR);
        assert_eq!(beam.weapon(), WeaponType::Beam);
        assert!(beam.from_player());
    }

    #[test]
    fn projectiles_expire_after_their_lifetime() {
        let (mut armory, tuning) = armory(4);
        let _ = armory.fire(Vec3::ZERO, Vec3::X, false, WeaponType::Pistol, &tuning);

        armory.update(1.0);
        let (_, bullet) = armory.bullets().iter().next().expect("still flying");
        assert!((bullet.position().x - tuning.standard_speed).abs() < 1.0e-3);
        assert!((bullet.life() - 0.5).abs() < 1.0e-6);

        armory.update(0.6);
        assert_eq!(armory.bullets().active_count(), 0);
    }
}
