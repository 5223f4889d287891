//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Workflow steps produce:
//!     → logging.rs (structured log events, one span per run)
//!
//! Consumers:
//!     → stderr (pretty for operators, JSON for automation)
//! ```
//!
//! # Design Decisions
//! - Structured fields (address, txid, step) rather than formatted strings
//! - `RUST_LOG` overrides the configured filter

pub mod logging;

pub use logging::init_logging;
