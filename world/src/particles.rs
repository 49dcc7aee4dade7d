//! Cosmetic particle bursts.

use arena_core::{Drawable, DrawableKind, ParticleTuning, Rgb, Vec3};
use rand::Rng;

use crate::combat::Body;
use crate::pool::Pool;

const PARTICLE_SCALE: f32 = 0.3;

#[derive(Clone, Copy, Debug, Default)]
struct Particle {
    body: Body,
    velocity: Vec3,
    life: f32,
}

/// Fixed pool of short-lived particles.
#[derive(Clone, Debug)]
pub struct Particles {
    pool: Pool<Particle>,
}

impl Particles {
    /// Allocates the particle pool.
    #[must_use]
    pub fn new(tuning: &ParticleTuning) -> Self {
        Self {
            pool: Pool::with_capacity(tuning.pool_capacity),
        }
    }

    /// Emits one particle with a random upward velocity.
    ///
    /// Returns `false` without touching the generator when the pool is full.
    pub fn spawn_effect<R>(&mut self, position: Vec3, color: Rgb, life: f32, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        let Some((_, particle)) = self.pool.acquire() else {
            return false;
        };
        let vx = f32::from(rng.gen_range(-10i8..10)) * 0.2;
        let vy = f32::from(rng.gen_range(0u8..10)) * 0.3 + 1.0;
        let vz = f32::from(rng.gen_range(-10i8..10)) * 0.2;
        *particle = Particle {
            body: Body {
                position,
                scale: Vec3::splat(PARTICLE_SCALE),
                color,
                alpha: 1.0,
            },
            velocity: Vec3::new(vx, vy, vz),
            life,
        };
        true
    }

    /// Emits up to `count` particles and returns how many found a slot.
    pub fn spawn_burst<R>(
        &mut self,
        position: Vec3,
        color: Rgb,
        life: f32,
        count: usize,
        rng: &mut R,
    ) -> usize
    where
        R: Rng + ?Sized,
    {
        (0..count)
            .take_while(|_| self.spawn_effect(position, color, life, &mut *rng))
            .count()
    }

    /// Moves particles, fades them with their remaining life and frees the spent ones.
    pub fn update(&mut self, dt: f32) {
        for index in 0..self.pool.capacity() {
            let spent = match self.pool.get_mut(index) {
                Some(particle) => {
                    particle.body.position += particle.velocity * dt;
                    particle.life -= dt;
                    particle.body.alpha = particle.life.clamp(0.0, 1.0);
                    particle.life <= 0.0
                }
                None => continue,
            };
            if spent {
                self.pool.release(index);
            }
        }
    }

    /// Frees every particle.
    pub fn clear(&mut self) {
        self.pool.release_all();
    }

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Iterates live particle drawables.
    pub(crate) fn drawables(&self) -> impl Iterator<Item = Drawable> + '_ {
        self.pool
            .iter()
            .map(|(_, particle)| particle.body.drawable(DrawableKind::Particle))
    }
}
