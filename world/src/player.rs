//! The player combatant: skins, dash, ultimate and squash-and-stretch.

use arena_core::{Drawable, DrawableKind, PlayerTuning, Rgb, Skin, Vec3, WeaponType};

use crate::combat::{Body, Combatant, DamageOutcome};

const DASH_STRETCH: Vec3 = Vec3::new(0.7, 0.7, 1.4);
const ULTIMATE_SCALE: f32 = 1.5;
const AURA_SCALE: Vec3 = Vec3::new(1.8, 0.1, 1.8);
const AURA_COLOR: Rgb = Rgb::new(0.0, 1.0, 1.0);
const MIN_SCALE: f32 = 0.1;
const BOUNCE: f32 = 0.1;
const BOUNCE_RATE: f32 = 15.0;
const MOVING_STIFFNESS: f32 = 10.0;
const IDLE_STIFFNESS: f32 = 5.0;

/// A timed ability with a cooldown that only runs while the ability is idle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ability {
    active: bool,
    remaining: f32,
    cooldown: f32,
}

impl Ability {
    /// Whether the ability is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds left on the running ability.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Seconds until the ability may trigger again.
    #[must_use]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Starts the ability if its cooldown has elapsed.
    fn trigger(&mut self, duration: f32, cooldown: f32) -> bool {
        if self.cooldown > 0.0 {
            return false;
        }
        self.active = true;
        self.remaining = duration;
        self.cooldown = cooldown;
        true
    }

    /// Advances the timers; returns `true` on the tick the ability ends.
    fn advance(&mut self, dt: f32) -> bool {
        if self.active {
            self.remaining = (self.remaining - dt).max(0.0);
            if self.remaining <= 0.0 {
                self.active = false;
                return true;
            }
        } else if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
        false
    }
}

/// The player-controlled combatant.
#[derive(Clone, Debug)]
pub struct Player {
    body: Body,
    combat: Combatant,
    skin: Skin,
    equipped: WeaponType,
    dash: Ability,
    ultimate: Ability,
    aura: Body,
    dash_cooldown: f32,
    current_speed: f32,
    input: Vec3,
    anim_phase: f32,
}

impl Player {
    /// Creates a player at the origin wearing `skin`.
    #[must_use]
    pub fn new(tuning: &PlayerTuning, skin: Skin) -> Self {
        let mut player = Self {
            body: Body::default(),
            combat: Combatant::default(),
            skin,
            equipped: WeaponType::Pistol,
            dash: Ability::default(),
            ultimate: Ability::default(),
            aura: Body {
                color: AURA_COLOR,
                scale: AURA_SCALE,
                alpha: 0.0,
                ..Body::default()
            },
            dash_cooldown: tuning.dash_cooldown,
            current_speed: tuning.base_speed,
            input: Vec3::ZERO,
            anim_phase: 0.0,
        };
        player.reset(tuning);
        player
    }

    /// Returns the player to the origin at full health with idle abilities.
    ///
    /// The skin and the equipped weapon survive the reset.
    pub fn reset(&mut self, tuning: &PlayerTuning) {
        self.body = Body::default();
        self.combat = Combatant::new(tuning.base_hp, tuning.base_speed);
        self.combat.weapon = self.equipped;
        self.dash = Ability::default();
        self.ultimate = Ability::default();
        self.aura.alpha = 0.0;
        self.input = Vec3::ZERO;
        self.anim_phase = 0.0;
        self.apply_skin(tuning);
    }

    /// Changes the skin; its stats apply from the next [`Player::reset`].
    pub fn select_skin(&mut self, skin: Skin) {
        self.skin = skin;
    }

    /// Changes the weapon fired while the ultimate is idle.
    pub fn equip(&mut self, weapon: WeaponType) {
        self.equipped = weapon;
        self.combat.weapon = weapon;
    }

    fn apply_skin(&mut self, tuning: &PlayerTuning) {
        self.combat.speed = tuning.base_speed;
        self.combat.weapon_damage = tuning.base_damage;
        self.dash_cooldown = tuning.dash_cooldown;
        let mut max_hp = tuning.base_hp;

        match self.skin {
            Skin::Crimson => self.combat.weapon_damage *= 1.25,
            Skin::Violet => self.combat.speed *= 1.2,
            Skin::Azure => self.dash_cooldown = 1.0,
            Skin::Gold => max_hp += 50.0,
        }

        self.combat.restore(max_hp);
        self.current_speed = self.combat.speed;
        self.body.color = self.skin.color();
    }

    /// Records the latest movement axes for the squash animation.
    pub fn set_input(&mut self, axis_x: f32, axis_y: f32) {
        self.input = Vec3::new(axis_x, 0.0, axis_y);
    }

    /// Starts a dash if the cooldown allows; speed switches immediately.
    pub fn trigger_dash(&mut self, tuning: &PlayerTuning) -> bool {
        if self.is_dead() || !self.dash.trigger(tuning.dash_duration, self.dash_cooldown) {
            return false;
        }
        self.current_speed = tuning.dash_speed;
        self.body.scale = DASH_STRETCH;
        true
    }

    /// Starts the ultimate if the cooldown allows, healing and showing the aura.
    pub fn trigger_ultimate(&mut self, tuning: &PlayerTuning) -> bool {
        if self.is_dead()
            || !self
                .ultimate
                .trigger(tuning.ultimate_duration, tuning.ultimate_cooldown)
        {
            return false;
        }
        self.combat.heal(tuning.ultimate_heal);
        self.body.scale = Vec3::splat(ULTIMATE_SCALE);
        self.aura.alpha = 1.0;
        true
    }

    /// Advances ability timers, the refire timer and the body animation.
    pub fn update(&mut self, dt: f32, tuning: &PlayerTuning) {
        if self.is_dead() {
            return;
        }

        let _ = self.dash.advance(dt);
        self.current_speed = if self.dash.is_active() {
            tuning.dash_speed
        } else {
            self.combat.speed
        };

        if self.ultimate.advance(dt) {
            self.aura.alpha = 0.0;
        }

        self.combat.cool_down(dt);
        self.animate(dt);
    }

    /// Springs the body scale toward its rest pose. Trigger poses (dash
    /// stretch, ultimate swell) relax through the same spring.
    fn animate(&mut self, dt: f32) {
        if self.dash.is_active() {
            self.body.scale = DASH_STRETCH;
        } else if self.input.length() > 0.1 {
            self.anim_phase += dt * BOUNCE_RATE;
            let bounce = self.anim_phase.sin() * BOUNCE;
            let target = Vec3::new(1.0 - bounce * 0.5, 1.0 + bounce, 1.0 - bounce * 0.5);
            self.body.scale = self
                .body
                .scale
                .lerp(target, (MOVING_STIFFNESS * dt).min(1.0));
        } else {
            self.anim_phase = 0.0;
            self.body.scale = self
                .body
                .scale
                .lerp(Vec3::ONE, (IDLE_STIFFNESS * dt).min(1.0));
        }
        self.body.scale = self.body.scale.max(Vec3::splat(MIN_SCALE));

        if self.ultimate.is_active() {
            self.aura.position = Vec3::new(self.body.position.x, 0.05, self.body.position.z);
            self.aura.scale = AURA_SCALE;
            self.aura.alpha = 0.4 + (self.ultimate.remaining() * 8.0).sin() * 0.3;
        }
    }

    /// Applies damage, laying the body down on death.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        let outcome = self.combat.take_damage(amount);
        if outcome == DamageOutcome::Killed {
            self.body.lay_down();
            self.aura.alpha = 0.0;
        }
        outcome
    }

    /// Credits a kill.
    pub fn record_kill(&mut self) {
        self.combat.kills += 1;
    }

    /// Moves the player without collision checks.
    pub fn set_position(&mut self, position: Vec3) {
        self.body.position = position;
    }

    /// Blocks firing for `delay` seconds.
    pub fn start_refire(&mut self, delay: f32) {
        self.combat.fire_timer = delay;
    }

    /// Whether the refire timer has elapsed.
    #[must_use]
    pub fn ready_to_fire(&self) -> bool {
        self.combat.ready_to_fire()
    }

    /// Weapon fired by the next trigger pull: the beam while the ultimate runs.
    #[must_use]
    pub fn active_weapon(&self) -> WeaponType {
        if self.ultimate.is_active() {
            WeaponType::Beam
        } else {
            self.equipped
        }
    }

    /// Ultimate readiness in `0.0..=1.0`; exactly `1.0` once the cooldown is over.
    #[must_use]
    pub fn ultimate_progress(&self, tuning: &PlayerTuning) -> f32 {
        let cooldown = self.ultimate.cooldown();
        if cooldown <= 0.0 {
            return 1.0;
        }
        (1.0 - cooldown / tuning.ultimate_cooldown).clamp(0.0, 1.0)
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

    /// Worn skin.
    #[must_use]
    pub fn skin(&self) -> Skin {
        self.skin
    }

    /// Weapon fired while the ultimate is idle.
    #[must_use]
    pub fn equipped(&self) -> WeaponType {
        self.equipped
    }

    /// Dash timers.
    #[must_use]
    pub fn dash(&self) -> &Ability {
        &self.dash
    }

    /// Ultimate timers.
    #[must_use]
    pub fn ultimate(&self) -> &Ability {
        &self.ultimate
    }

    /// Cooldown the next dash will start, after skin bonuses.
    #[must_use]
    pub fn dash_cooldown(&self) -> f32 {
        self.dash_cooldown
    }

    /// Movement speed applied to input this frame.
    #[must_use]
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Render snapshot of the aura, present only while the ultimate runs.
    #[must_use]
    pub fn aura(&self) -> Option<Drawable> {
        self.ultimate
            .is_active()
            .then(|| self.aura.drawable(DrawableKind::Aura))
    }
}
