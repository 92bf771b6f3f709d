//! Roadgen - Procedural road networks grown by L-systems over noise terrain

pub mod core;
pub mod math;
pub mod terrain;
pub mod grammar;
pub mod turtle;
pub mod graph;
pub mod constraint;
pub mod network;
