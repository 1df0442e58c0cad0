pub mod ai;
pub mod animation;
pub mod audio;
pub mod combat;
pub mod compute;
pub mod config;
pub mod dialogue;
pub mod effects;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod player;
pub mod state;
pub mod timer;
