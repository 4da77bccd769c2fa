//! # CLI Module
//!
//! Command-line entry points for the `treeroute` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Start the demo route table on an HTTP listener:
//!
//! ```bash
//! treeroute serve --addr 0.0.0.0:8080
//! ```
//!
//! The address defaults to `TREEROUTE_ADDR`, then `127.0.0.1:8080`.
//! Logging follows the `TREEROUTE_LOG_*` variables.
//!
//! ### `routes`
//!
//! Print every registered `(method, pattern)` pair of the demo table:
//!
//! ```bash
//! treeroute routes
//! ```

mod commands;
mod demo;


pub use commands::{run, run_cli, Cli, Commands};
pub use demo::{demo_engine, DEMO_ADMIN_TOKEN};
