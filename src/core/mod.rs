//! Core rules.
//!
//! Immutable configuration and pure rule functions shared by the game,
//! ledger and network layers.

pub mod config;
pub mod title;

// Re-export core types
pub use config::{ConfigError, Difficulty, DifficultySettings, GameConfig, TitleTier};
pub use title::{display_title, title_for, THE_ONE};
