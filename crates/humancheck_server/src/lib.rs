//! HTTP service hosting are-you-human verification challenges.
//!
//! # Architecture
//!
//! - **Session**: one challenge per session, owned exclusively; the
//!   oracle's delayed board reply is the only scheduled work, modeled as
//!   a single cancellable task.
//! - **Server**: axum routes mapping the session manager onto JSON.
//! - **Config / CLI**: TOML file with defaults, bind overrides on the
//!   command line.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod session;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use server::router;
pub use session::{SessionManager, SessionView};
