//! State shared by every fighting entity: a visual body and a hit-point pool.

use arena_core::{Drawable, DrawableKind, Rgb, Vec3, WeaponType};

/// Colour every corpse is tinted with.
pub const CORPSE_COLOR: Rgb = Rgb::new(0.2, 0.2, 0.2);

/// Height a corpse is flattened to.
pub const CORPSE_HEIGHT: f32 = 0.2;

/// Transform and appearance of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// World-space centre.
    pub position: Vec3,
    /// Per-axis scale of the unit cube.
    pub scale: Vec3,
    /// Base colour.
    pub color: Rgb,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            color: Rgb::WHITE,
            alpha: 1.0,
        }
    }
}

impl Body {
    /// Render snapshot of the body.
    #[must_use]
    pub fn drawable(&self, kind: DrawableKind) -> Drawable {
        Drawable {
            kind,
            position: self.position,
            scale: self.scale,
            color: self.color,
            alpha: self.alpha,
        }
    }

    /// Greys out and flattens the body.
    pub fn lay_down(&mut self) {
        self.color = CORPSE_COLOR;
        self.scale.y = CORPSE_HEIGHT;
    }
}

/// What a call to [`Combatant::take_damage`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed: the amount was not positive or the combatant was dead.
    Ignored,
    /// Hit points dropped but stayed above zero.
    Wounded,
    /// Hit points reached zero on this call.
    Killed,
}

/// Hit points, movement speed and weapon stats.
///
/// Hit points always stay within `0.0..=max_hp`, and the combatant is dead
/// exactly when they are zero. Death is terminal until the owner resets it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Combatant {
    hp: f32,
    max_hp: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Weapon damage stat.
    pub weapon_damage: f32,
    /// Weapon fired when the trigger is pulled.
    pub weapon: WeaponType,
    /// Nominal delay between shots.
    pub fire_interval: f32,
    /// Seconds until the next shot is allowed.
    pub fire_timer: f32,
    /// Kills credited to this combatant.
    pub kills: u32,
}

impl Default for Combatant {
    fn default() -> Self {
        Self::new(100.0, 5.0)
    }
}

impl Combatant {
    /// Creates a combatant at full health.
    #[must_use]
    pub fn new(max_hp: f32, speed: f32) -> Self {
        let max_hp = max_hp.max(0.0);
        Self {
            hp: max_hp,
            max_hp,
            speed,
            weapon_damage: 10.0,
            weapon: WeaponType::Pistol,
            fire_interval: 0.5,
            fire_timer: 0.0,
            kills: 0,
        }
    }

    /// Current hit points.
    #[must_use]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Whether hit points have reached zero.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Whether the combatant still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// Replaces the maximum and refills hit points to it.
    pub fn restore(&mut self, max_hp: f32) {
        self.max_hp = max_hp.max(0.0);
        self.hp = self.max_hp;
    }

    /// Subtracts hit points, clamping at zero. Dead combatants ignore damage.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }
        self.hp = (self.hp - amount).max(0.0);
        if self.is_dead() {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    /// Adds hit points up to the maximum. The dead stay dead.
    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() || !(amount > 0.0) {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Advances the refire timer.
    pub fn cool_down(&mut self, dt: f32) {
        if self.fire_timer > 0.0 {
            self.fire_timer = (self.fire_timer - dt).max(0.0);
        }
    }

    /// Whether the refire timer has run out.
    #[must_use]
    pub fn ready_to_fire(&self) -> bool {
        self.fire_timer <= 0.0
    }
}
