//! AI-driven combatants living in the bot pool.

use arena_core::{BotId, BotState, BotTuning, Rgb, TargetRef, Vec3};
use arena_system_bot_ai::{BotMind, BotSense};
use rand::Rng;

use crate::combat::{Body, Combatant, DamageOutcome};

const BOSS_COLOR: Rgb = Rgb::new(0.5, 0.0, 0.0);
const BOSS_SCALE: f32 = 1.3;
const BOSS_HP_FACTOR: f32 = 2.0;
const BOSS_SPEED_FACTOR: f32 = 1.5;
const BOSS_FIRE_FACTOR: f32 = 0.7;

/// A bot slot. Stale after release; [`Bot::reset`] overwrites every field.
#[derive(Clone, Debug, Default)]
pub struct Bot {
    pub(crate) body: Body,
    pub(crate) combat: Combatant,
    pub(crate) mind: BotMind,
    boss: bool,
    anim_phase: f32,
}

impl Bot {
    /// Restores full health and base stats with a fresh random colour.
    pub(crate) fn reset<R>(&mut self, tuning: &BotTuning, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let mut channel = || f32::from(rng.gen_range(0u8..10)) / 10.0;
        let color = Rgb::new(channel(), channel(), channel());

        self.body = Body {
            color,
            ..Body::default()
        };
        self.combat = Combatant::new(tuning.hp, tuning.speed);
        self.combat.fire_interval = tuning.fire_interval;
        self.mind = BotMind::default();
        self.boss = false;
        self.anim_phase = 0.0;
    }

    /// Upgrades the bot to a boss. Applying it twice changes nothing.
    ///
    /// Doubles max hit points and refills them, speeds the bot up, shortens
    /// its fire interval and recolours it.
    pub fn activate_boss_mode(&mut self) -> bool {
        if self.boss {
            return false;
        }
        self.boss = true;
        self.combat.restore(self.combat.max_hp() * BOSS_HP_FACTOR);
        self.combat.speed *= BOSS_SPEED_FACTOR;
        self.combat.fire_interval *= BOSS_FIRE_FACTOR;
        self.body.color = BOSS_COLOR;
        self.body.scale = Vec3::splat(BOSS_SCALE);
        true
    }

    /// Applies damage, laying the body down on death.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.combat.take_damage(amount);
        if outcome == DamageOutcome::Killed {
            self.body.lay_down();
        }
        outcome
    }

    /// Collision radius against projectiles and walls.
    #[must_use]
    pub fn radius(&self, tuning: &BotTuning) -> f32 {
        if self.boss {
            tuning.boss_radius
        } else {
            tuning.radius
        }
    }

    /// Breathing bob applied to living bots.
    pub(crate) fn animate(&mut self, dt: f32) {
        self.anim_phase += dt * 10.0;
        let bounce = self.anim_phase.sin() * 0.05;
        let base = if self.boss { BOSS_SCALE } else { 1.0 };
        self.body.scale = Vec3::new(base - bounce * 0.5, base + bounce, base - bounce * 0.5);
    }

    /// Snapshot handed to the decision machine.
    pub(crate) fn sense(&self, id: BotId, tuning: &BotTuning) -> BotSense {
        BotSense {
            id,
            position: self.body.position,
            hp: self.combat.hp(),
            max_hp: self.combat.max_hp(),
            speed: self.combat.speed,
            radius: self.radius(tuning),
        }
    }

    /// World-space position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Visual body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Hit points and weapon stats.
    #[must_use]
    pub fn combat(&self) -> &Combatant {
        &self.combat
    }

    /// Whether hit points have reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.combat.is_dead()
    }

    /// Whether boss mode has been applied.
    #[must_use]
    pub fn is_boss(&self) -> bool {
        self.boss
    }

    /// Current decision state.
    #[must_use]
    pub fn state(&self) -> BotState {
        self.mind.state
    }

    /// Target chosen on the latest tick.
    #[must_use]
    pub fn target(&self) -> Option<TargetRef> {
        self.mind.target
    }
}
