//! Visions domain layer: entities, prompts, credential gate, session state machine

pub mod controller;
pub mod entities;
pub mod gate;
pub mod prompt;
pub mod state;
