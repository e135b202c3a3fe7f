//! # Observability
//!
//! Mappings report what they do through `tracing` events: factory calls,
//! domain broadcasts and algebra results at `debug`, recoverable oddities
//! such as an empty operand at `warn`. Nothing is printed until the
//! application installs a subscriber, usually with [`init_logging`].
//!
//! ```rust,ignore
//! use phymap_core::observe::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development());
//!
//! tracing::info!(mappings = 3, "Channel model ready");
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
