// Game module - the simulated world and how it is built
//
// This module contains:
// - world.rs: World struct, the per-tick update and read access
// - constructors.rs: Player, ground and enemy factories
// - types.rs: Read-only views handed to rendering

pub mod constructors;
pub mod types;
pub mod world;

pub use types::*;
pub use world::World;
