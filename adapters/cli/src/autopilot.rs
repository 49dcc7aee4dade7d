//! Scripted stand-in for a human player.

use arena_core::direction_or_zero;
use arena_rendering::FrameInput;
use arena_world::{query, World};

/// Bots closer than this trigger a dash.
const DASH_RANGE: f32 = 6.0;

/// The ultimate is saved until a bot is this close.
const ULTIMATE_RANGE: f32 = 12.0;

/// Heads for the nearest live bot, firing the whole way.
///
/// Movement doubles as aim, so walking at a bot also shoots at it. With no
/// bot left the autopilot stands still.
pub(crate) fn steer(world: &World) -> FrameInput {
    let position = query::player_position(world);
    let nearest = query::bots(world)
        .filter(|(_, bot)| !bot.is_dead())
        .map(|(_, bot)| bot.position() - position)
        .min_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));
    let Some(offset) = nearest else {
        return FrameInput::default();
    };

    let distance = offset.length();
    let direction = direction_or_zero(offset);
    FrameInput {
        axis_x: direction.x,
        axis_y: direction.z,
        fire: true,
        dash: distance < DASH_RANGE,
        ultimate: distance < ULTIMATE_RANGE && query::ultimate_progress(world) >= 1.0,
    }
}
