//! ANYO Flappy Bird: a gravity-and-flap arcade game for the terminal.
//!
//! The simulation (`game`, `bird`, `obstacle`, `scoring`) is independent of
//! the terminal. It is driven by explicit timestamps through a cancellable
//! frame request and persists its best score through an injected store.

pub mod bird;
pub mod config;
pub mod frame;
pub mod game;
pub mod input;
pub mod notify;
pub mod obstacle;
pub mod render;
pub mod scoring;
pub mod sound;
pub mod store;

pub use config::{Config, Tuning};
pub use game::{DeathCause, Game, GameEvent, Phase};
pub use store::{FileStore, HighScoreStore, MemoryStore};
