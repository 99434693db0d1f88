use glam::Vec2;
use platformer::behavior::{BehaviorMode, ClapMode};
use platformer::config::{EnemyKind, GameConfig};
use platformer::game::World;
use platformer::input_system::{Control, InputSource, InputState};
use platformer::wave::WAVE_LIFETIME;

/// Holds one control for the first `frames` queries, then releases it.
struct Scripted {
    control: Control,
    frames: std::cell::Cell<u32>,
}

impl InputSource for Scripted {
    fn is_pressed(&self, control: Control) -> bool {
        if control != self.control {
            return false;
        }
        let left = self.frames.get();
        if left == 0 {
            return false;
        }
        if control == Control::Jump {
            self.frames.set(left - 1);
        }
        true
    }
}

fn config_from_json(json: &str) -> GameConfig {
    let config: GameConfig = serde_json::from_str(json).unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn test_partial_config_builds_world() {
    let config = config_from_json(
        r#"{
            "level": {
                "player": [0.0, -1.0],
                "enemies": [{ "kind": "Clap", "position": [4.0, -1.0] }]
            }
        }"#,
    );
    assert_eq!(config.level.enemies[0].kind, EnemyKind::Clap);

    let world = World::from_config(&config);

    assert_eq!(world.enemies().len(), 1);
    assert_eq!(world.entities().len(), 3);
    assert_eq!(world.position(world.player()), Vec2::new(0.0, -1.0));
}

#[test]
fn test_default_level_stays_consistent() {
    let config = GameConfig::default();
    let mut world = World::from_config(&config);
    world.teleport(world.player(), Vec2::new(0.0, -1.0));

    for _ in 0..240 {
        world.update(config.time_step, &InputState::NONE);

        for view in world.snapshot() {
            if let Some(state) = view.behavior {
                assert!(state.timer >= 0.0, "{} timer {}", view.name, state.timer);
            }
        }
        for wave in world.waves() {
            assert!(wave.timer <= WAVE_LIFETIME);
        }
    }
}

#[test]
fn test_player_walks_on_ground() {
    let config = config_from_json(r#"{ "level": { "player": [0.0, -1.0], "enemies": [] } }"#);
    let mut world = World::from_config(&config);
    for _ in 0..30 {
        world.update(config.time_step, &InputState::NONE);
    }
    let start = world.position(world.player());

    let input = Scripted {
        control: Control::MoveRight,
        frames: std::cell::Cell::new(u32::MAX),
    };
    for _ in 0..60 {
        world.update(config.time_step, &input);
    }

    let player = world.view(world.player());
    assert!(player.position.x > start.x + 0.5);
    assert!(player.on_ground);
    assert!(player.face_right);
}

#[test]
fn test_held_jump_goes_higher_than_tap() {
    fn peak(jump_frames: u32) -> f32 {
        let config = config_from_json(r#"{ "level": { "player": [0.0, -1.0], "enemies": [] } }"#);
        let mut world = World::from_config(&config);
        for _ in 0..30 {
            world.update(config.time_step, &InputState::NONE);
        }
        let input = Scripted {
            control: Control::Jump,
            frames: std::cell::Cell::new(jump_frames),
        };
        let mut highest = f32::MAX;
        for _ in 0..90 {
            world.update(config.time_step, &input);
            highest = highest.min(world.position(world.player()).y);
        }
        highest
    }

    // Smaller y is higher.
    assert!(peak(20) < peak(1));
}

#[test]
fn test_clap_sleeps_again_when_player_leaves() {
    let config = config_from_json(
        r#"{
            "level": {
                "player": [0.0, -1.0],
                "enemies": [{ "kind": "Clap", "position": [3.0, -1.0] }]
            }
        }"#,
    );
    let mut world = World::from_config(&config);
    let enemy = world.enemies()[0];
    for _ in 0..35 {
        world.update(config.time_step, &InputState::NONE);
    }
    assert_eq!(
        world.behavior(enemy).unwrap().mode(),
        BehaviorMode::Clap(ClapMode::Awake)
    );

    world.teleport(world.player(), Vec2::new(-30.0, -1.0));
    world.update(config.time_step, &InputState::NONE);

    let behavior = world.behavior(enemy).unwrap();
    assert_eq!(behavior.mode(), BehaviorMode::Clap(ClapMode::Asleep));
    assert_eq!(behavior.timer(), 0.5);
}
