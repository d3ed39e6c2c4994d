//! Xiangqi practice against the engine.
//!
//! # Modules
//!
//! - [`controller`] - interaction state machine for one game
//! - [`dispatch`] - engine searches on tokio's blocking pool
//! - [`commentary`] - best-effort remarks on the player's moves
//! - [`session`] - session host tying the controller to rating and review
//! - [`config`] - TOML configuration

pub mod commentary;
pub mod config;
pub mod controller;
pub mod dispatch;
mod error;
pub mod session;

pub use config::{ConfigError, PracticeConfig};
pub use controller::{
    AiOutcome, AiReply, AiRequest, ClickOutcome, ConfirmKind, Controller, ControllerState,
    FinishedGame, PlayerResult, PressOutcome, ENGINE, HUMAN,
};
pub use error::PracticeError;
pub use session::{GameReport, PracticeSession};
