//! This is a plugin for Bevy game engine to rasterise a plane into an obstacle-aware navigation grid and steer actors along A* paths across it
//!

pub mod bundle;
pub mod error;
pub mod navigation;
pub mod plugin;

pub mod prelude;
