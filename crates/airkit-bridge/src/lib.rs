//! Bridges an environmental sensor's metrics feed into a smart-home accessory.
//!
//! This crate wires the [`airkit_core`] bridge loop to a concrete deployment:
//! - TOML configuration with CLI overrides
//! - an HTTP accessory surface serving the published characteristics
//! - process lifecycle (startup order, ctrl-c, cooperative shutdown)
//!
//! # Configuration
//!
//! The bridge reads configuration from `~/.config/airkit/bridge.toml`:
//!
//! ```toml
//! [sensor]
//! host = "http://0.0.0.0"
//! port = 1006
//! poll_interval = 5
//!
//! [accessory]
//! bind = "127.0.0.1:51826"
//! name = "SCD-41"
//! ```
//!
//! Every key is optional; missing keys fall back to the defaults above.
//!
//! # HTTP Endpoints
//!
//! - `GET /accessory` - accessory identity and current characteristics
//! - `GET /health` - liveness check

pub mod config;
pub mod server;

pub use config::{Config, ConfigError, ValidationError, default_config_path};
pub use server::{AccessoryInfo, AccessoryServer};
