//! Nearby discovery session runner.
//!
//! Wires the discovery controller to its collaborators:
//! - HTTP category and place repositories
//! - A simulated device location
//! - Console presenters, notifier and navigator
//!
//! and drives one scripted session from the command line.

pub mod app;
pub mod config;
pub mod console;
pub mod error;

pub use app::{metrics_snapshot, Application, SessionPlan, SessionReport};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
