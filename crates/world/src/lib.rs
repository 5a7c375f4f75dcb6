#![warn(missing_docs)]
//! Chunk-streamed world simulation: terrain, inventory, floaters, and collision.

mod chunk;
mod collision;
mod config;
mod draw;
mod error;
mod floater;
mod game;
mod generator;
mod input;
mod inventory;
mod map;
mod player;
mod storage;

pub use chunk::*;
pub use collision::*;
pub use config::*;
pub use draw::*;
pub use error::*;
pub use floater::*;
pub use game::*;
pub use generator::*;
pub use input::*;
pub use inventory::*;
pub use map::*;
pub use player::*;
pub use storage::*;
