use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use arena_core::{BotId, BotState, Command, Event, InputFrame, RoundState, WeaponType};
use arena_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_snapshots() {
    let first = replay(7, scripted_commands());
    let second = replay(7, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn different_seeds_produce_different_rounds() {
    let first = replay(7, scripted_commands());
    let second = replay(8, scripted_commands());

    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::with_seed(seed);
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let bots = query::bots(&world)
        .map(|(id, bot)| BotRecord {
            id,
            position: bits3(bot.position().to_array()),
            hp: bot.combat().hp().to_bits(),
            state: bot.state(),
            boss: bot.is_boss(),
        })
        .collect();

    let walls = query::map(&world)
        .walls()
        .iter()
        .map(|wall| bits3(wall.to_array()))
        .collect();

    ReplayOutcome {
        round: query::round_state(&world),
        player: bits3(query::player_position(&world).to_array()),
        player_hp: query::player_hp(&world).to_bits(),
        zone: query::zone_radius(&world).to_bits(),
        camera: bits3(query::camera(&world).eye.to_array()),
        bots,
        walls,
        events: log,
    }
}

fn scripted_commands() -> Vec<Command> {
    let frame = |axis_x: f32, axis_y: f32, fire: bool| Command::Input {
        frame: InputFrame {
            axis_x,
            axis_y,
            fire,
            ..InputFrame::default()
        },
    };
    let tick = || Command::Tick {
        dt: Duration::from_millis(16),
    };

    let mut commands = vec![Command::EquipWeapon {
        weapon: WeaponType::Shotgun,
    }];
    for step in 0..240 {
        let axis = if step % 60 < 30 { 1.0 } else { -1.0 };
        commands.push(frame(axis, 0.5, step % 5 == 0));
        if step == 100 {
            commands.push(Command::Input {
                frame: InputFrame {
                    dash: true,
                    ultimate: true,
                    ..InputFrame::default()
                },
            });
        }
        commands.push(tick());
    }
    commands
}

fn bits3(values: [f32; 3]) -> [u32; 3] {
    values.map(f32::to_bits)
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    round: RoundState,
    player: [u32; 3],
    player_hp: u32,
    zone: u32,
    camera: [u32; 3],
    bots: Vec<BotRecord>,
    walls: Vec<[u32; 3]>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct BotRecord {
    id: BotId,
    position: [u32; 3],
    hp: u32,
    state: BotState,
    boss: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    RoundStarted { bots: usize },
    ShotFired { weapon: WeaponType, by_player: bool, projectiles: usize },
    DashTriggered,
    UltimateTriggered,
    PlayerHit { damage: u32 },
    BotKilled { bot: BotId, boss: bool },
    BossModeActivated { bots: usize },
    RoundEnded { state: RoundState },
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match event {
            Event::RoundStarted { bots } => Self::RoundStarted { bots: *bots },
            Event::ShotFired {
                weapon,
                by_player,
                projectiles,
            } => Self::ShotFired {
                weapon: *weapon,
                by_player: *by_player,
                projectiles: *projectiles,
            },
            Event::DashTriggered => Self::DashTriggered,
            Event::UltimateTriggered => Self::UltimateTriggered,
            Event::PlayerHit { damage } => Self::PlayerHit {
                damage: damage.to_bits(),
            },
            Event::BotKilled { bot, boss } => Self::BotKilled {
                bot: *bot,
                boss: *boss,
            },
            Event::BossModeActivated { bots } => Self::BossModeActivated { bots: *bots },
            Event::RoundEnded { state } => Self::RoundEnded { state: *state },
        }
    }
}
