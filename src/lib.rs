//! Simulation core of a small 2D platformer.
//!
//! A [`game::World`] owns a rapier2d physics world, a player, a ground slab and
//! a handful of enemies driven by state machines. Each call to
//! [`game::World::update`] runs one fixed step: enemy behaviors, player control,
//! wave aging, then physics. Rendering and windowing live behind the `sdl`
//! feature.
//!
//! ```no_run
//! use platformer::config::GameConfig;
//! use platformer::game::World;
//! use platformer::input_system::InputState;
//!
//! let config = GameConfig::default();
//! let mut world = World::from_config(&config);
//! for _ in 0..60 {
//!     world.update(config.time_step, &InputState::right());
//! }
//! println!("player at {:?}", world.position(world.player()));
//! ```

pub mod animation;
pub mod behavior;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod config;
pub mod entity;
pub mod game;
pub mod input_system;
pub mod logging;
pub mod physics;
pub mod player;
pub mod render;
pub mod wave;
