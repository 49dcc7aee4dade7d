#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure per-bot decision machine.
//!
//! The system never owns combatants. The world hands it a [`BotSense`]
//! snapshot of the thinking bot, a list of live [`Candidate`] targets in
//! iteration order (player first, then bots in pool order) and the static
//! [`Obstacles`] of the arena. The bot's persistent [`BotMind`] is updated in
//! place and the resolved position is returned for the world to commit.

use std::f32::consts::TAU;

use arena_core::{direction_or_zero, BotId, BotState, BotTuning, Obstacles, TargetRef, Vec3};
use rand::Rng;
use tracing::trace;

/// Directions shorter than this do not produce movement.
const MOVE_THRESHOLD: f32 = 0.1;

/// Decision thresholds consumed by [`BotAi`].
#[derive(Clone, Debug, PartialEq)]
pub struct AiTuning {
    /// Distance within which combatants are noticed. Strict: a candidate at
    /// exactly this distance is ignored.
    pub awareness_radius: f32,
    /// Distance below which a bot stops and shoots.
    pub attack_range: f32,
    /// Fraction of max hit points below which a bot flees.
    pub flee_fraction: f32,
    /// Seconds a roam destination is pursued before a new one is picked.
    pub roam_interval: f32,
    /// Distance between a bot and each freshly picked roam destination.
    pub roam_distance: f32,
}

impl From<&BotTuning> for AiTuning {
    fn from(tuning: &BotTuning) -> Self {
        Self {
            awareness_radius: tuning.awareness_radius,
            attack_range: tuning.attack_range,
            flee_fraction: tuning.flee_fraction,
            roam_interval: tuning.roam_interval,
            roam_distance: tuning.roam_distance,
        }
    }
}

impl Default for AiTuning {
    fn default() -> Self {
        Self::from(&BotTuning::default())
    }
}

/// Decision state a bot carries between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotMind {
    /// Current state of the machine.
    pub state: BotState,
    /// Seconds until the current roam leg expires; zero forces re-evaluation.
    pub state_timer: f32,
    /// Target chosen on the most recent tick. Never trusted across ticks.
    pub target: Option<TargetRef>,
    /// Roam destination.
    pub destination: Vec3,
}

impl Default for BotMind {
    fn default() -> Self {
        Self {
            state: BotState::Roam,
            state_timer: 0.0,
            target: None,
            destination: Vec3::ZERO,
        }
    }
}

/// Snapshot of the thinking bot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BotSense {
    /// Identifier of the bot, used to skip itself while scanning.
    pub id: BotId,
    /// Current position.
    pub position: Vec3,
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Collision radius used against obstacles.
    pub radius: f32,
}

/// A live combatant that may be targeted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Handle of the combatant.
    pub target: TargetRef,
    /// Position of the combatant this tick.
    pub position: Vec3,
}

/// Result of a target scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Acquisition {
    /// Handle of the nearest combatant.
    pub target: TargetRef,
    /// Its position.
    pub position: Vec3,
    /// Its distance from the scanning bot.
    pub distance: f32,
}

/// Stateless controller applying the decision rules to one bot at a time.
#[derive(Clone, Debug, Default)]
pub struct BotAi {
    tuning: AiTuning,
}

impl BotAi {
    /// Creates a controller with the provided thresholds.
    #[must_use]
    pub fn new(tuning: AiTuning) -> Self {
        Self { tuning }
    }

    /// Thresholds used by the controller.
    #[must_use]
    pub fn tuning(&self) -> &AiTuning {
        &self.tuning
    }

    /// Picks the nearest candidate inside the awareness radius.
    ///
    /// Ties keep the earliest candidate in iteration order.
    #[must_use]
    pub fn acquire(&self, me: &BotSense, candidates: &[Candidate]) -> Option<Acquisition> {
        let mut best: Option<Acquisition> = None;
        let mut best_distance = self.tuning.awareness_radius;

        for candidate in candidates {
            if candidate.target == TargetRef::Bot(me.id) {
                continue;
            }

            let distance = (candidate.position - me.position).length();
            if distance < best_distance {
                best_distance = distance;
                best = Some(Acquisition {
                    target: candidate.target,
                    position: candidate.position,
                    distance,
                });
            }
        }

        best
    }

    /// Resolves the next state. Later rules override earlier ones:
    /// low health always flees, a target means attack or chase, and an idle
    /// bot only returns to roaming once its timer has run out.
    #[must_use]
    pub fn decide(
        &self,
        mind: &BotMind,
        me: &BotSense,
        acquired: Option<&Acquisition>,
    ) -> BotState {
        if me.hp < me.max_hp * self.tuning.flee_fraction {
            return BotState::Flee;
        }

        match acquired {
            Some(acquisition) if acquisition.distance < self.tuning.attack_range => {
                BotState::Attack
            }
            Some(_) => BotState::Chase,
            None if mind.state_timer <= 0.0 => BotState::Roam,
            None => mind.state,
        }
    }

    /// Runs one tick for a bot and returns its resolved position.
    ///
    /// Movement that would end inside an obstacle is rejected: the position
    /// stays put and the state timer drops to zero so the bot re-plans on the
    /// next tick. Attacking bots never move.
    pub fn step<O, R>(
        &self,
        mind: &mut BotMind,
        me: &BotSense,
        candidates: &[Candidate],
        obstacles: &O,
        rng: &mut R,
        dt: f32,
    ) -> Vec3
    where
        O: Obstacles + ?Sized,
        R: Rng + ?Sized,
    {
        mind.state_timer = (mind.state_timer - dt).max(0.0);

        let acquired = self.acquire(me, candidates);
        mind.target = acquired.map(|acquisition| acquisition.target);

        let next_state = self.decide(mind, me, acquired.as_ref());
        if next_state != mind.state {
            trace!(bot = me.id.get(), from = ?mind.state, to = ?next_state, "bot state changed");
            mind.state = next_state;
        }

        let heading = match mind.state {
            BotState::Idle => Vec3::ZERO,
            BotState::Roam => {
                if mind.state_timer <= 0.0 {
                    mind.state_timer = self.tuning.roam_interval;
                    let angle = rng.gen_range(0.0..TAU);
                    mind.destination = me.position
                        + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.tuning.roam_distance;
                }
                mind.destination - me.position
            }
            BotState::Chase | BotState::Attack => acquired
                .map(|acquisition| acquisition.position - me.position)
                .unwrap_or(Vec3::ZERO),
            BotState::Flee => acquired
                .map(|acquisition| me.position - acquisition.position)
                .unwrap_or(Vec3::ZERO),
        };

        if mind.state == BotState::Attack || heading.length() <= MOVE_THRESHOLD {
            return me.position;
        }

        let next = me.position + direction_or_zero(heading) * me.speed * dt;
        if obstacles.collides(next, me.radius) {
            mind.state_timer = 0.0;
            return me.position;
        }
        next
    }
}
