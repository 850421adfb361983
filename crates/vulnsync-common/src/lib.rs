//! vulnsync Common Library
//!
//! Shared infrastructure for the vulnsync workspace members.
//!
//! # Overview
//!
//! - **Logging**: centralized `tracing` configuration used by every
//!   vulnsync binary (console and rotating-file output, text or JSON
//!   format, environment overrides)
//!
//! # Example
//!
//! ```no_run
//! use vulnsync_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;
