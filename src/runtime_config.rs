//! # Runtime Configuration Module
//!
//! Environment-driven settings for the coroutine runtime and the listener.
//!
//! ## Environment Variables
//!
//! ### `TREEROUTE_STACK_SIZE`
//!
//! Stack size for the coroutines `may` spawns per connection. Accepts:
//! - Decimal: `65536`
//! - Hexadecimal: `0x10000`
//!
//! Default: `0x10000` (64 KB). Deep handler chains and the recovery
//! middleware's backtrace capture both need stack; too small a value
//! overflows.
//!
//! ### `TREEROUTE_ADDR`
//!
//! Listen address. Default: `127.0.0.1:8080`.
//!
//! ## Usage
//!
//! ```rust
//! use treeroute::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! println!("Listening on {} with {} byte stacks", config.addr, config.stack_size);
//! ```

use std::env;
use tracing::{info, warn};

/// Default coroutine stack size in bytes
pub const DEFAULT_STACK_SIZE: usize = 0x10000;

/// Default listen address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    pub addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal size
#[must_use]
pub fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to the defaults with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("TREEROUTE_STACK_SIZE") {
            Ok(val) => parse_size(&val).unwrap_or_else(|| {
                warn!(value = %val, "Invalid TREEROUTE_STACK_SIZE, using default");
                DEFAULT_STACK_SIZE
            }),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        let addr = env::var("TREEROUTE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        RuntimeConfig { stack_size, addr }
    }

    /// Push the coroutine settings into the global `may` config.
    ///
    /// Must run before the server starts to affect its coroutines.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        info!(stack_size = self.stack_size, "Coroutine stack size configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_hex_and_decimal() {
        assert_eq!(parse_size("0x4000"), Some(0x4000));
        assert_eq!(parse_size("0X10"), Some(16));
        assert_eq!(parse_size("32768"), Some(32768));
        assert_eq!(parse_size(" 64 "), Some(64));
        assert_eq!(parse_size("0xZZ"), None);
        assert_eq!(parse_size("big"), None);
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.stack_size, 0x10000);
        assert_eq!(config.addr, "127.0.0.1:8080");
    }
}
