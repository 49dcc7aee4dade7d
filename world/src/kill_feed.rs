//! Transient "enemy eliminated" notification.

/// Countdown with a linear fade at its tail.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KillFeed {
    active: bool,
    remaining: f32,
    alpha: f32,
}

impl KillFeed {
    /// Shows the notification at full opacity for `duration` seconds.
    pub fn trigger(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
        self.alpha = 1.0;
    }

    /// Counts down; opacity falls linearly to zero over the final `fade` seconds.
    pub fn update(&mut self, dt: f32, fade: f32) {
        if !self.active {
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.active = false;
            self.alpha = 0.0;
            return;
        }
        if self.remaining < fade {
            self.alpha = (self.remaining / fade).clamp(0.0, 1.0);
        }
    }

    /// Hides the notification immediately.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the notification is showing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current opacity in `0.0..=1.0`.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Seconds left on screen.
    #[must_use]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
